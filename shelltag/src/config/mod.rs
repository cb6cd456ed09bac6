//! Various configuration options to control shelltag

mod parse_options;
mod write_options;

pub use parse_options::{ParseOptions, ParsingMode};
pub use write_options::WriteOptions;
