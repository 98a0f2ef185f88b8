//! FrameSink implementations

mod log;
mod memory;
mod png_dir;

pub use log::LogSink;
pub use memory::{MemoryBuffer, MemorySink};
pub use png_dir::PngDirectorySink;
