use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::verify_encoding;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::borrow::Cow;

use byteorder::ReadBytesExt;

const FRAME_ID: FrameId = FrameId::Valid(Cow::Borrowed("WXXX"));

/// An extended `ID3v2` URL frame
///
/// This is used in the `WXXX` frame, where the frames
/// are told apart by descriptions, rather than their [`FrameId`]s.
/// This means for each `ExtendedUrlFrame` in the tag, the description
/// must be unique.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtendedUrlFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the description
	pub encoding: TextEncoding,
	/// Unique content description
	pub description: String,
	/// The URL, always [`TextEncoding::Latin1`]
	pub content: String,
}

impl ExtendedUrlFrame {
	/// Create a new [`ExtendedUrlFrame`]
	pub fn new(encoding: TextEncoding, description: String, content: String) -> Self {
		let header = FrameHeader::new(FRAME_ID, FrameFlags::default());
		Self {
			header,
			encoding,
			description,
			content,
		}
	}

	/// Read an [`ExtendedUrlFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Unable to decode the description or URL
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
		let url = decode_text(
			content,
			TextDecodeOptions::new().encoding(TextEncoding::Latin1),
		)?
		.content;

		Ok(Some(ExtendedUrlFrame {
			header: FrameHeader::new(FRAME_ID, frame_flags),
			encoding,
			description,
			content: url,
		}))
	}

	/// Convert an [`ExtendedUrlFrame`] to a byte vec
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
		bytes.extend(TextEncoding::Latin1.encode(
			&self.content,
			false,
			write_options.lossy_text_encoding,
		)?);

		Ok(bytes)
	}
}
