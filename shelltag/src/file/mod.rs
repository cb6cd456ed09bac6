//! Reading and saving the tags of an MP3 file

mod id3_file;

pub use id3_file::{Id3File, RemoveOutcome};
