use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};

/// A binary fallback for all unknown `ID3v2` frames
///
/// The content is kept exactly as it was read, so these frames survive a save untouched.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct BinaryFrame {
	pub(crate) header: FrameHeader,
	/// The binary data
	pub data: Vec<u8>,
}

impl BinaryFrame {
	/// Create a new [`BinaryFrame`]
	pub fn new(id: FrameId, data: Vec<u8>) -> Self {
		Self {
			header: FrameHeader::new(id, FrameFlags::default()),
			data,
		}
	}

	/// Get the ID for the frame
	pub fn id(&self) -> &FrameId {
		&self.header.id
	}

	/// Get the flags for the frame
	pub fn flags(&self) -> FrameFlags {
		self.header.flags
	}

	/// Read a [`BinaryFrame`]
	///
	/// NOTE: This will exhaust `content`
	pub fn parse(content: &mut &[u8], id: FrameId, frame_flags: FrameFlags) -> Self {
		let data = std::mem::take(content).to_vec();

		BinaryFrame {
			header: FrameHeader::new(id, frame_flags),
			data,
		}
	}
}
