//! Input readers for text to summarize.

pub mod reader;

pub use reader::{FileReader, MAX_INPUT_BYTES, read_file, read_stdin, read_stream};
