use crate::consts::MAX_RANDOM_SEED;
use crate::error::{MultiviewError, Result};

/// A non-negative request seed is used as is; a negative one is replaced
/// by a random seed in `[0, MAX_RANDOM_SEED]`.
pub fn resolve_seed(seed: i64) -> Result<u64> {
    if seed >= 0 {
        Ok(seed as u64)
    } else {
        random_seed(MAX_RANDOM_SEED)
    }
}

/// Uniform seed in `[0, max]` from the OS CSPRNG.
///
/// Rejection sampling discards the top partial bucket so no value is more
/// likely than another.
pub fn random_seed(max: u32) -> Result<u64> {
    let range = max as u64 + 1;
    let limit = (u32::MAX as u64 + 1) / range * range;
    loop {
        let mut buf = [0u8; 4];
        getrandom::fill(&mut buf).map_err(|e| {
            MultiviewError::Io(std::io::Error::other(format!("OS random source failed: {e}")))
        })?;
        let value = u32::from_be_bytes(buf) as u64;
        if value < limit {
            return Ok(value % range);
        }
    }
}
