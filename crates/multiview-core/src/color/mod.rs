pub mod calibrate;
pub mod stats;
