use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::content::verify_encoding;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextEncoding, decode_text_values, encode_text_values};

use byteorder::ReadBytesExt;

/// An `ID3v2` text frame
///
/// Text frames may hold multiple values. In `ID3v2.4` these are separated by the encoding's null
/// terminator. Older versions only allow a single value per frame, see
/// [`downgrade_v23`](crate::id3::v2::downgrade_v23) for how values are folded when a tag is
/// written as `ID3v2.3`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextInformationFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the text
	pub encoding: TextEncoding,
	/// The values of the frame
	pub values: Vec<String>,
}

impl TextInformationFrame {
	/// Create a new [`TextInformationFrame`]
	pub fn new(id: FrameId, encoding: TextEncoding, values: Vec<String>) -> Self {
		let header = FrameHeader::new(id, FrameFlags::default());
		Self {
			header,
			encoding,
			values,
		}
	}

	/// Get the ID for the frame
	pub fn id(&self) -> &FrameId {
		&self.header.id
	}

	/// Read a [`TextInformationFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Unable to decode the text
	///
	/// ID3v2.2:
	///
	/// * The encoding is not [`TextEncoding::Latin1`] or [`TextEncoding::UTF16`]
	pub fn parse(
		content: &mut &[u8],
		id: FrameId,
		frame_flags: FrameFlags,
		version: Id3v2Version,
	) -> Result<Option<Self>> {
		let Ok(encoding_byte) = content.read_u8() else {
			return Ok(None);
		};

		let encoding = verify_encoding(encoding_byte, version)?;
		let values = decode_text_values(content, encoding)?;

		Ok(Some(TextInformationFrame {
			header: FrameHeader::new(id, frame_flags),
			encoding,
			values,
		}))
	}

	/// Convert a [`TextInformationFrame`] to a byte vec
	///
	/// The values are written as they are, joining them for older versions is up to the caller.
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = self.encoding.for_version(version);

		let mut content = vec![encoding as u8];
		content.extend(encode_text_values(
			&self.values,
			encoding,
			write_options.lossy_text_encoding,
		)?);

		Ok(content)
	}
}

#[cfg(test)]
mod tests {
	use crate::config::WriteOptions;
	use crate::id3::v2::{FrameFlags, FrameId, Id3v2Version, TextInformationFrame};
	use crate::util::text::TextEncoding;

	fn frame(encoding: TextEncoding, values: &[&str]) -> TextInformationFrame {
		TextInformationFrame::new(
			FrameId::new("TPE1").unwrap(),
			encoding,
			values.iter().map(|v| (*v).to_string()).collect(),
		)
	}

	#[test_log::test]
	fn multiple_values_v4() {
		let expected = frame(TextEncoding::UTF8, &["Foo", "Bar"]);

		let bytes = expected
			.as_bytes(Id3v2Version::V4, WriteOptions::default())
			.unwrap();
		assert_eq!(bytes, b"\x03Foo\0Bar");

		let parsed = TextInformationFrame::parse(
			&mut &bytes[..],
			FrameId::new("TPE1").unwrap(),
			FrameFlags::default(),
			Id3v2Version::V4,
		)
		.unwrap()
		.unwrap();
		assert_eq!(parsed, expected);
	}

	#[test_log::test]
	fn utf8_substituted_for_v3() {
		let bytes = frame(TextEncoding::UTF8, &["Foo"])
			.as_bytes(Id3v2Version::V3, WriteOptions::default())
			.unwrap();

		assert_eq!(bytes[0], TextEncoding::UTF16 as u8);

		let parsed = TextInformationFrame::parse(
			&mut &bytes[..],
			FrameId::new("TPE1").unwrap(),
			FrameFlags::default(),
			Id3v2Version::V3,
		)
		.unwrap()
		.unwrap();
		assert_eq!(parsed.values, ["Foo"]);
	}

	#[test_log::test]
	fn v2_rejects_utf8() {
		let parsed = TextInformationFrame::parse(
			&mut &b"\x03Foo"[..],
			FrameId::new("TPE1").unwrap(),
			FrameFlags::default(),
			Id3v2Version::V2,
		);
		assert!(parsed.is_err());
	}

	#[test_log::test]
	fn empty_value_survives() {
		let expected = frame(TextEncoding::Latin1, &[""]);
		let bytes = expected
			.as_bytes(Id3v2Version::V4, WriteOptions::default())
			.unwrap();

		let parsed = TextInformationFrame::parse(
			&mut &bytes[..],
			FrameId::new("TPE1").unwrap(),
			FrameFlags::default(),
			Id3v2Version::V4,
		)
		.unwrap()
		.unwrap();
		assert_eq!(parsed, expected);
	}
}
