use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::verify_encoding;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{
	TextDecodeOptions, TextEncoding, decode_text, decode_text_values, encode_text_values,
};

use std::borrow::Cow;

use byteorder::ReadBytesExt;

const FRAME_ID: FrameId = FrameId::Valid(Cow::Borrowed("TXXX"));

/// An extended `ID3v2` text frame
///
/// This is used in the `TXXX` frame, where the frames
/// are told apart by descriptions, rather than their [`FrameId`]s.
/// This means for each `ExtendedTextFrame` in the tag, the description
/// must be unique.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtendedTextFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the description and values
	pub encoding: TextEncoding,
	/// Unique content description
	pub description: String,
	/// The values of the frame
	pub values: Vec<String>,
}

impl ExtendedTextFrame {
	/// Create a new [`ExtendedTextFrame`]
	pub fn new(encoding: TextEncoding, description: String, values: Vec<String>) -> Self {
		let header = FrameHeader::new(FRAME_ID, FrameFlags::default());
		Self {
			header,
			encoding,
			description,
			values,
		}
	}

	/// Read an [`ExtendedTextFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Unable to decode the description or values
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
		let description = decode_text(
			content,
			TextDecodeOptions::new().encoding(encoding).terminated(true),
		)?
		.content;

		let values = decode_text_values(content, encoding)?;

		Ok(Some(ExtendedTextFrame {
			header: FrameHeader::new(FRAME_ID, frame_flags),
			encoding,
			description,
			values,
		}))
	}

	/// Convert an [`ExtendedTextFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = self.encoding.for_version(version);

		let mut bytes = vec![encoding as u8];
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
