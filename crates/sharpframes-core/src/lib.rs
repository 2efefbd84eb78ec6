pub mod color;
pub mod consts;
pub mod error;
pub mod extract;
pub mod frame;
pub mod io;
pub mod manifest;
pub mod pipeline;
pub mod quality;
pub mod scan;
pub mod segment;
pub mod select;
pub mod source;
