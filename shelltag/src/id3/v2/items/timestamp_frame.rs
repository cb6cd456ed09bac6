use crate::config::ParsingMode;
use crate::error::Result;
use crate::id3::v2::frame::content::verify_encoding;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId, Timestamp};
use crate::macros::err;
use crate::util::text::{TextEncoding, decode_text_values, encode_text_values};

use byteorder::ReadBytesExt;

/// An `ID3v2` timestamp frame
///
/// Used for `TDEN`, `TDOR`, `TDRC`, `TDRL`, and `TDTG`. Like other text frames, these may hold
/// multiple values.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TimestampFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the timestamps
	pub encoding: TextEncoding,
	/// The timestamps
	pub timestamps: Vec<Timestamp>,
}

impl TimestampFrame {
	/// Create a new [`TimestampFrame`]
	pub fn new(id: FrameId, encoding: TextEncoding, timestamps: Vec<Timestamp>) -> Self {
		Self {
			header: FrameHeader::new(id, FrameFlags::default()),
			encoding,
			timestamps,
		}
	}

	/// Get the ID for the frame
	pub fn id(&self) -> &FrameId {
		&self.header.id
	}

	/// Read a [`TimestampFrame`]
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// Values that aren't valid timestamps are dropped, unless using [`ParsingMode::Strict`].
	///
	/// # Errors
	///
	/// * Unable to decode the text
	/// * The text is not ASCII
	/// * [`ParsingMode::Strict`] and a value is not a valid timestamp
	pub fn parse(
		content: &mut &[u8],
		id: FrameId,
		frame_flags: FrameFlags,
		version: Id3v2Version,
		parse_mode: ParsingMode,
	) -> Result<Option<Self>> {
		let Ok(encoding_byte) = content.read_u8() else {
			return Ok(None);
		};

		let encoding = verify_encoding(encoding_byte, version)?;
		let values = decode_text_values(content, encoding)?;

		let mut timestamps = Vec::with_capacity(values.len());
		for value in values {
			if !value.is_ascii() {
				err!(BadTimestamp("Timestamp contains non-ASCII characters"))
			}

			match Timestamp::parse(&value, parse_mode) {
				Ok(Some(timestamp)) => timestamps.push(timestamp),
				Ok(None) => {},
				Err(e) if parse_mode == ParsingMode::Strict => return Err(e),
				Err(_) => log::warn!("{id}: Dropping invalid timestamp \"{value}\""),
			}
		}

		Ok(Some(TimestampFrame {
			header: FrameHeader::new(id, frame_flags),
			encoding,
			timestamps,
		}))
	}

	/// Convert a [`TimestampFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * A timestamp is invalid, see [`Timestamp::verify`]
	pub fn as_bytes(&self, version: Id3v2Version) -> Result<Vec<u8>> {
		let mut values = Vec::with_capacity(self.timestamps.len());
		for timestamp in &self.timestamps {
			timestamp.verify()?;
			values.push(timestamp.to_string());
		}

		// Timestamps are always ASCII
		let encoding = self.encoding.for_version(version);

		let mut content = vec![encoding as u8];
		content.extend(encode_text_values(&values, encoding, false)?);

		Ok(content)
	}
}
