pub mod backend;
pub mod color;
pub mod consts;
pub mod editor;
pub mod enhance;
pub mod error;
pub mod filters;
pub mod frame;
pub mod io;
pub mod lighting;
pub mod pipeline;
pub mod validate;
pub mod views;
