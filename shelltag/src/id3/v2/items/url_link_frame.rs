use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

/// An `ID3v2` URL frame
///
/// URLs are always [`TextEncoding::Latin1`], and a frame only holds a single URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UrlLinkFrame {
	pub(crate) header: FrameHeader,
	pub(crate) content: String,
}

impl UrlLinkFrame {
	/// Create a new [`UrlLinkFrame`]
	pub fn new(id: FrameId, content: impl Into<String>) -> Self {
		UrlLinkFrame {
			header: FrameHeader::new(id, FrameFlags::default()),
			content: content.into(),
		}
	}

	/// Get the ID for the frame
	pub fn id(&self) -> &FrameId {
		&self.header.id
	}

	/// Read an [`UrlLinkFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Unable to decode the text as [`TextEncoding::Latin1`]
	pub fn parse(content: &mut &[u8], id: FrameId, frame_flags: FrameFlags) -> Result<Option<Self>> {
		let url = decode_text(
			content,
			TextDecodeOptions::new()
				.encoding(TextEncoding::Latin1)
				.terminated(true),
		)?;
		if url.bytes_read == 0 {
			return Ok(None);
		}

		Ok(Some(UrlLinkFrame {
			header: FrameHeader::new(id, frame_flags),
			content: url.content,
		}))
	}

	/// Convert an [`UrlLinkFrame`] to a byte vec
	///
	/// An empty URL is written as a lone terminator, so the frame isn't empty.
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the URL is not Latin-1
	pub fn as_bytes(&self, write_options: WriteOptions) -> Result<Vec<u8>> {
		Ok(TextEncoding::Latin1.encode(
			&self.content,
			self.content.is_empty(),
			write_options.lossy_text_encoding,
		)?)
	}

	/// Get the URL of the frame
	pub fn url(&self) -> &str {
		&self.content
	}

	/// Change the URL of the frame
	///
	/// This will return a `bool` indicating whether or not the URL provided is Latin-1
	pub fn set_url(&mut self, url: impl Into<String>) -> bool {
		let url = url.into();
		if TextEncoding::verify_latin1(&url) {
			self.content = url;
			return true;
		}

		false
	}
}
