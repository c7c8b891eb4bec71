pub mod artifacts;
pub mod image_io;
