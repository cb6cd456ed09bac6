use crate::config::WriteOptions;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::frame::content::verify_encoding;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{
	TextDecodeOptions, TextEncoding, decode_text, decode_text_values, encode_text_values,
};

use std::borrow::Cow;
use std::io::Read;

use byteorder::ReadBytesExt;

const FRAME_ID: FrameId = FrameId::Valid(Cow::Borrowed("COMM"));

/// An `ID3v2` comment frame
///
/// Similar to `TXXX` and `WXXX` frames, comments are told apart by their descriptions, and
/// additionally by their languages.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommentFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the description and comment text
	pub encoding: TextEncoding,
	/// ISO-639-2 language code (3 bytes)
	pub language: [u8; 3],
	/// Unique content description
	pub description: String,
	/// The comment values
	pub values: Vec<String>,
}

impl CommentFrame {
	/// The language used when none is specified
	pub const DEFAULT_LANGUAGE: [u8; 3] = *b"eng";
	/// The language used when it is unknown
	pub const UNKNOWN_LANGUAGE: [u8; 3] = *b"XXX";

	/// Create a new [`CommentFrame`]
	pub fn new(
		encoding: TextEncoding,
		language: [u8; 3],
		description: String,
		values: Vec<String>,
	) -> Self {
		Self {
			header: FrameHeader::new(FRAME_ID, FrameFlags::default()),
			encoding,
			language,
			description,
			values,
		}
	}

	/// Read a [`CommentFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Unable to decode the text
	/// * The frame ends before the language
	///
	/// ID3v2.2:
	///
	/// * The encoding is not [`TextEncoding::Latin1`] or [`TextEncoding::UTF16`]
	pub fn parse(
		content: &mut &[u8],
		frame_flags: FrameFlags,
		version: Id3v2Version,
	) -> Result<Option<Self>> {
		let Ok(encoding_byte) = content.read_u8() else {
			return Ok(None);
		};

		let encoding = verify_encoding(encoding_byte, version)?;

		let mut language = [0; 3];
		content
			.read_exact(&mut language)
			.map_err(|_| Id3v2Error::new(Id3v2ErrorKind::BadFrameLength))?;

		if language.iter().any(|c| !c.is_ascii_alphabetic()) {
			log::warn!("Comment has an invalid language {language:?}, replacing with \"XXX\"");
			language = Self::UNKNOWN_LANGUAGE;
		}

		let description = decode_text(
			content,
			TextDecodeOptions::new().encoding(encoding).terminated(true),
		)?
		.content;
		let values = decode_text_values(content, encoding)?;

		Ok(Some(Self {
			header: FrameHeader::new(FRAME_ID, frame_flags),
			encoding,
			language,
			description,
			values,
		}))
	}

	/// Convert a [`CommentFrame`] to a byte vec
	///
	/// NOTE: This does not include a frame header
	///
	/// # Errors
	///
	/// * `language` contains invalid characters (Only `'a'..='z'` and `'A'..='Z'` allowed)
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		if self.language.iter().any(|c| !c.is_ascii_alphabetic()) {
			return Err(Id3v2Error::new(Id3v2ErrorKind::InvalidLanguage(self.language)).into());
		}

		let encoding = self.encoding.for_version(version);

		let mut bytes = vec![encoding as u8];
		bytes.extend(self.language);
		bytes.extend(encoding.encode(
			&self.description,
			true,
			write_options.lossy_text_encoding,
		)?);
		bytes.extend(encode_text_values(
			&self.values,
			encoding,
			write_options.lossy_text_encoding,
		)?);

		Ok(bytes)
	}
}
