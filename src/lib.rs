pub mod args;
pub mod driver;
pub mod escape;
pub mod ffmpeg;
pub mod scan;
