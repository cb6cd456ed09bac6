//! Read, edit, and write the ID3 tags of MP3 files.
//!
//! # Supported tags
//!
//! * ID3v1 and ID3v1.1, the 128 byte block at the end of a file
//! * ID3v2.2, ID3v2.3, and ID3v2.4, at the start of a file
//!
//! `ID3v2` tags of every version are held in their `ID3v2.4` form. Writing an older version
//! folds multi-value frames and splits dates, see [`downgrade_v23`](id3::v2::downgrade_v23).
//!
//! # Examples
//!
//! ## Editing a file
//!
//! [`Id3File`](file::Id3File) works with friendly field names such as `"ARTIST"`, see
//! [`field`] for the full list.
//!
//! ```rust,no_run
//! # fn main() -> shelltag::error::Result<()> {
//! use shelltag::config::{ParseOptions, WriteOptions};
//! use shelltag::file::Id3File;
//!
//! let mut file = Id3File::read("test.mp3", ParseOptions::new())?;
//!
//! // Multiple values are separated by '\'
//! file.add_field("ARTIST", "Foo\\Bar")?;
//! file.add_field("YEAR", "1992-05-01")?;
//!
//! println!("{}", file.summary());
//!
//! // ID3v2.4 tags stay ID3v2.4, and older tags are written as ID3v2.3
//! file.save(WriteOptions::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Working with frames
//!
//! ```rust,no_run
//! # fn main() -> shelltag::error::Result<()> {
//! use shelltag::config::ParseOptions;
//! use shelltag::file::Id3File;
//! use shelltag::id3::v2::FrameKey;
//!
//! let file = Id3File::read_strict("test.mp3", ParseOptions::new())?;
//!
//! // Every TXXX frame, no matter the description
//! let key = FrameKey::id("TXXX")?;
//! for frame in file.query(&key)? {
//! 	println!("{frame:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Encoding a single frame
//!
//! ```rust
//! # fn main() -> shelltag::error::Result<()> {
//! use shelltag::TextEncoding;
//! use shelltag::id3::v2::{
//! 	Frame, FrameId, Id3v2Version, TextInformationFrame, decode_frame, encode_frame,
//! };
//!
//! let frame = Frame::Text(TextInformationFrame::new(
//! 	FrameId::new("TIT2")?,
//! 	TextEncoding::Latin1,
//! 	vec![String::from("Foo")],
//! ));
//!
//! let bytes = encode_frame(&frame, Id3v2Version::V3)?;
//! assert_eq!(decode_frame(&bytes, Id3v2Version::V3)?, frame);
//! # Ok(())
//! # }
//! ```
//!
//! # Important notes
//!
//! ID3 has plenty of quirks between versions. Be sure to read the module documentation of
//! [`id3::v1`] and [`id3::v2`].
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod error;
pub mod field;
pub mod file;
pub mod id3;
pub(crate) mod macros;
pub mod picture;
mod util;

pub use util::text::TextEncoding;
