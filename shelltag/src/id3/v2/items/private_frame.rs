use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::borrow::Cow;
use std::io::Read;

const FRAME_ID: FrameId = FrameId::Valid(Cow::Borrowed("PRIV"));

/// An `ID3v2` private frame
///
/// This frame is used to contain information from a software producer that
/// its program uses and does not fit into the other frames.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PrivateFrame {
	pub(crate) header: FrameHeader,
	/// A URL containing an email address, or a link to a location where an email can be found,
	/// that belongs to the organisation responsible for the frame
	pub owner: String,
	/// Binary data
	pub private_data: Vec<u8>,
}

impl PrivateFrame {
	/// Create a new [`PrivateFrame`]
	pub fn new(owner: String, private_data: Vec<u8>) -> Self {
		Self {
			header: FrameHeader::new(FRAME_ID, FrameFlags::default()),
			owner,
			private_data,
		}
	}

	/// Read a [`PrivateFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Failure to read from `content`
	pub fn parse(content: &mut &[u8], frame_flags: FrameFlags) -> Result<Option<Self>> {
		if content.is_empty() {
			return Ok(None);
		}

		let owner = decode_text(
			content,
			TextDecodeOptions::new()
				.encoding(TextEncoding::Latin1)
				.terminated(true),
		)?
		.content;

		let mut private_data = Vec::new();
		content.read_to_end(&mut private_data)?;

		Ok(Some(PrivateFrame {
			header: FrameHeader::new(FRAME_ID, frame_flags),
			owner,
			private_data,
		}))
	}

	/// Convert a [`PrivateFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the owner is not valid Latin-1
	pub fn as_bytes(&self, write_options: WriteOptions) -> Result<Vec<u8>> {
		let Self {
			owner,
			private_data,
			..
		} = self;

		let mut content = Vec::with_capacity(owner.len() + private_data.len() + 1);
		content.extend(TextEncoding::Latin1.encode(
			owner,
			true,
			write_options.lossy_text_encoding,
		)?);
		content.extend_from_slice(private_data);

		Ok(content)
	}
}

#[cfg(test)]
mod tests {
	use crate::config::WriteOptions;
	use crate::id3::v2::{FrameFlags, PrivateFrame};

	const ENCODED: &[u8] = b"foo@bar.com\0some data";

	fn expected() -> PrivateFrame {
		PrivateFrame::new(
			String::from("foo@bar.com"),
			String::from("some data").into_bytes(),
		)
	}

	#[test_log::test]
	fn priv_decode() {
		let parsed_priv = PrivateFrame::parse(&mut &ENCODED[..], FrameFlags::default())
			.unwrap()
			.unwrap();

		assert_eq!(parsed_priv, expected());
	}

	#[test_log::test]
	fn priv_encode() {
		let encoded = expected().as_bytes(WriteOptions::default()).unwrap();
		assert_eq!(encoded, ENCODED);
	}

	#[test_log::test]
	fn priv_empty() {
		assert!(
			PrivateFrame::parse(&mut &[][..], FrameFlags::default())
				.unwrap()
				.is_none()
		);
	}
}
