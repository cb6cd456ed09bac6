pub(super) mod content;
pub(super) mod header;
pub(super) mod read;

use super::items::{
	AttachedPictureFrame, BinaryFrame, CommentFrame, ExtendedTextFrame, ExtendedUrlFrame,
	PrivateFrame, TextInformationFrame, TimestampFrame, UrlLinkFrame,
};
use crate::config::{ParseOptions, WriteOptions};
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::Id3v2Version;
use crate::util::text::TextEncoding;
use header::FrameId;

macro_rules! define_frames {
	(
		$(#[$meta:meta])*
		pub enum Frame {
			$(
				$(#[$field_meta:meta])+
				$variant:ident($type:ty),
			)*
		}
	) => {
		$(#[$meta])*
		pub enum Frame {
			$(
				$(#[$field_meta])+
				$variant($type),
			)*
		}

		impl Frame {
			/// Get the ID of the frame
			pub fn id(&self) -> &FrameId {
				match self {
					$(
						Frame::$variant(frame) => &frame.header.id,
					)*
				}
			}

			/// Get the flags for the frame
			pub fn flags(&self) -> FrameFlags {
				match self {
					$(
						Frame::$variant(frame) => frame.header.flags,
					)*
				}
			}

			/// Set the flags for the frame
			pub fn set_flags(&mut self, flags: FrameFlags) {
				match self {
					$(
						Frame::$variant(frame) => frame.header.flags = flags,
					)*
				}
			}

			/// Used for errors in write::frame::verify_frame
			pub(crate) fn name(&self) -> &'static str {
				match self {
					$(
						Frame::$variant(_) => stringify!($variant),
					)*
				}
			}
		}

		$(
			impl From<$type> for Frame {
				fn from(value: $type) -> Self {
					Frame::$variant(value)
				}
			}
		)*
	}
}

define_frames! {
	/// Represents an `ID3v2` frame
	///
	/// Frames are always held with their `ID3v2.4` IDs, no matter the version of the tag they
	/// were read from. See [`upgrade_v2`](crate::id3::v2::upgrade_v2) and
	/// [`upgrade_v3`](crate::id3::v2::upgrade_v3).
	#[derive(Clone, Debug, PartialEq, Eq)]
	pub enum Frame {
		/// Represents a "T..." (excluding TXXX and the timestamp frames) frame
		Text(TextInformationFrame),
		/// Represents a "W..." (excluding WXXX) frame
		Url(UrlLinkFrame),
		/// Represents a timestamp for the "TDEN", "TDOR", "TDRC", "TDRL", and "TDTG" frames
		Timestamp(TimestampFrame),
		/// Represents a "TXXX" frame
		UserText(ExtendedTextFrame),
		/// Represents a "WXXX" frame
		UserUrl(ExtendedUrlFrame),
		/// Represents a "COMM" frame
		Comment(CommentFrame),
		/// Represents an "APIC" or "PIC" frame
		Picture(AttachedPictureFrame),
		/// Represents a "PRIV" frame
		Private(PrivateFrame),
		/// Binary data
		///
		/// NOTES:
		///
		/// * This is used for all frames without a dedicated variant
		/// * This is used for **all** frames with an ID of [`FrameId::Outdated`]
		/// * This is used for encrypted frames, their content is kept as-is
		Binary(BinaryFrame),
	}
}

impl Frame {
	/// Extract the string from the [`FrameId`]
	pub fn id_str(&self) -> &str {
		self.id().as_str()
	}

	/// The key used to decide which frames replace one another in a tag
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::id3::v2::{ExtendedTextFrame, Frame, FrameKey};
	/// use shelltag::TextEncoding;
	///
	/// let frame = Frame::UserText(ExtendedTextFrame::new(
	/// 	TextEncoding::UTF8,
	/// 	String::from("ALBUM ARTIST"),
	/// 	vec![String::from("Foo")],
	/// ));
	///
	/// assert_eq!(frame.key(), FrameKey::UserText(String::from("ALBUM ARTIST")));
	/// ```
	pub fn key(&self) -> FrameKey {
		match self {
			Frame::UserText(f) => FrameKey::UserText(f.description.clone()),
			Frame::UserUrl(f) => FrameKey::UserUrl(f.description.clone()),
			Frame::Comment(f) => FrameKey::Comment {
				language: f.language,
				description: f.description.clone(),
			},
			Frame::Picture(f) => FrameKey::Picture(f.description.clone()),
			Frame::Private(f) => FrameKey::Private {
				owner: f.owner.clone(),
				data: f.private_data.clone(),
			},
			Frame::Text(_) | Frame::Url(_) | Frame::Timestamp(_) | Frame::Binary(_) => {
				FrameKey::Id(self.id().clone())
			},
		}
	}

	/// The text values of the frame, if it carries any
	///
	/// Timestamps are rendered with their [`Display`](std::fmt::Display) implementation.
	pub fn text_values(&self) -> Option<Vec<String>> {
		match self {
			Frame::Text(f) => Some(f.values.clone()),
			Frame::UserText(f) => Some(f.values.clone()),
			Frame::Comment(f) => Some(f.values.clone()),
			Frame::Timestamp(f) => Some(f.timestamps.iter().map(ToString::to_string).collect()),
			Frame::Url(f) => Some(vec![f.content.clone()]),
			Frame::UserUrl(f) => Some(vec![f.content.clone()]),
			Frame::Picture(_) | Frame::Private(_) | Frame::Binary(_) => None,
		}
	}

	/// Whether the frame has no content
	pub(crate) fn is_empty(&self) -> bool {
		match self {
			Frame::Text(f) => f.values.iter().all(String::is_empty),
			Frame::UserText(f) => f.values.iter().all(String::is_empty),
			Frame::Comment(f) => f.values.iter().all(String::is_empty),
			Frame::Timestamp(f) => f.timestamps.is_empty(),
			Frame::Url(f) => f.content.is_empty(),
			Frame::UserUrl(f) => f.content.is_empty(),
			Frame::Picture(f) => f.data.is_empty(),
			Frame::Private(f) => f.private_data.is_empty(),
			Frame::Binary(f) => f.data.is_empty(),
		}
	}

	/// Move UTF-16 text to UTF-8, leaving Latin-1 alone
	///
	/// Frames added through [`Id3File`](crate::file::Id3File) are normalized this way. Older
	/// versions get UTF-16 back when written.
	pub(crate) fn normalize_encoding(&mut self) {
		let encoding = match self {
			Frame::Text(f) => &mut f.encoding,
			Frame::UserText(f) => &mut f.encoding,
			Frame::UserUrl(f) => &mut f.encoding,
			Frame::Comment(f) => &mut f.encoding,
			Frame::Picture(f) => &mut f.encoding,
			Frame::Timestamp(f) => &mut f.encoding,
			Frame::Url(_) | Frame::Private(_) | Frame::Binary(_) => return,
		};

		if matches!(*encoding, TextEncoding::UTF16 | TextEncoding::UTF16BE) {
			*encoding = TextEncoding::UTF8;
		}
	}

	/// The frame content, excluding the header
	pub(crate) fn as_bytes(
		&self,
		version: Id3v2Version,
		write_options: WriteOptions,
	) -> Result<Vec<u8>> {
		Ok(match self {
			Frame::Text(frame) => frame.as_bytes(version, write_options)?,
			Frame::Url(frame) => frame.as_bytes(write_options)?,
			Frame::Timestamp(frame) => frame.as_bytes(version)?,
			Frame::UserText(frame) => frame.as_bytes(version, write_options)?,
			Frame::UserUrl(frame) => frame.as_bytes(version, write_options)?,
			Frame::Comment(frame) => frame.as_bytes(version, write_options)?,
			Frame::Picture(frame) => frame.as_bytes(version, write_options)?,
			Frame::Private(frame) => frame.as_bytes(write_options)?,
			Frame::Binary(frame) => frame.data.clone(),
		})
	}
}

/// Identifies a frame, or a set of frames, within a tag
///
/// Frames that share a key replace each other when inserted into an
/// [`Id3v2Tag`](crate::id3::v2::Id3v2Tag). [`FrameKey::Id`] matches every frame with the ID,
/// so it can be used to remove or query all `TXXX` frames at once, for example.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FrameKey {
	/// Every frame with this ID
	Id(FrameId),
	/// A "TXXX" frame with this description
	UserText(String),
	/// A "WXXX" frame with this description
	UserUrl(String),
	/// A "COMM" frame with this language and description
	#[allow(missing_docs)]
	Comment {
		language: [u8; 3],
		description: String,
	},
	/// An "APIC" frame with this description
	Picture(String),
	/// A "PRIV" frame with this owner and content
	#[allow(missing_docs)]
	Private { owner: String, data: Vec<u8> },
}

impl FrameKey {
	/// Create a [`FrameKey::Id`] from an ID string
	///
	/// # Errors
	///
	/// See [`FrameId::new`]
	pub fn id(id: &str) -> Result<Self> {
		Ok(Self::Id(FrameId::new(id.to_owned())?))
	}

	/// Whether `frame` falls under this key
	pub fn matches(&self, frame: &Frame) -> bool {
		match (self, frame) {
			(FrameKey::Id(id), frame) => frame.id() == id,
			(FrameKey::UserText(desc), Frame::UserText(f)) => f.description == *desc,
			(FrameKey::UserUrl(desc), Frame::UserUrl(f)) => f.description == *desc,
			(
				FrameKey::Comment {
					language,
					description,
				},
				Frame::Comment(f),
			) => f.language == *language && f.description == *description,
			(FrameKey::Picture(desc), Frame::Picture(f)) => f.description == *desc,
			(FrameKey::Private { owner, data }, Frame::Private(f)) => {
				f.owner == *owner && f.private_data == *data
			},
			_ => false,
		}
	}
}

/// Various flags to describe the content of an item
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct FrameFlags {
	/// Preserve frame on tag edit
	pub tag_alter_preservation: bool,
	/// Preserve frame on file edit
	pub file_alter_preservation: bool,
	/// Item cannot be written to
	pub read_only: bool,
	/// The group identifier the frame belongs to
	///
	/// All frames with the same group identifier byte belong to the same group.
	pub grouping_identity: Option<u8>,
	/// Frame is zlib compressed
	///
	/// Compressed frames are inflated when read, and written uncompressed. The flag only
	/// survives on encrypted frames, whose content can't be touched.
	pub compression: bool,
	/// Frame encryption method symbol
	///
	/// NOTE: Since the encryption method is unknown, encrypted frames are kept as
	/// [`BinaryFrame`]s.
	pub encryption: Option<u8>,
	/// Frame is unsynchronised (`ID3v2.4` only)
	///
	/// In short, this makes all "0xFF X (X >= 0xE0)" combinations into "0xFF 0x00 X" to avoid confusion
	/// with the MPEG frame header, which is often identified by its "frame sync" (11 set bits).
	///
	/// NOTE: Unsynchronised data is read, but never written.
	pub unsynchronisation: bool,
	/// Frame has a data length indicator
	///
	/// The data length indicator is the size of the frame if the flags were all zeroed out.
	/// This is usually used in combination with `compression` and `encryption`.
	pub data_length_indicator: Option<u32>,
}

impl FrameFlags {
	/// Parse the flags from an ID3v2.4 frame
	///
	/// NOTE: If any of the following flags are set, they will be set to `Some(0)`:
	/// * `grouping_identity`
	/// * `encryption`
	/// * `data_length_indicator`
	pub fn parse_id3v24(flags: u16) -> Self {
		FrameFlags {
			tag_alter_preservation: flags & 0x4000 == 0x4000,
			file_alter_preservation: flags & 0x2000 == 0x2000,
			read_only: flags & 0x1000 == 0x1000,
			grouping_identity: (flags & 0x0040 == 0x0040).then_some(0),
			compression: flags & 0x0008 == 0x0008,
			encryption: (flags & 0x0004 == 0x0004).then_some(0),
			unsynchronisation: flags & 0x0002 == 0x0002,
			data_length_indicator: (flags & 0x0001 == 0x0001).then_some(0),
		}
	}

	/// Parse the flags from an ID3v2.3 frame
	///
	/// NOTE: If any of the following flags are set, they will be set to `Some(0)`:
	/// * `grouping_identity`
	/// * `encryption`
	/// * `data_length_indicator` (implied by `compression`)
	pub fn parse_id3v23(flags: u16) -> Self {
		let compression = flags & 0x0080 == 0x0080;
		FrameFlags {
			tag_alter_preservation: flags & 0x8000 == 0x8000,
			file_alter_preservation: flags & 0x4000 == 0x4000,
			read_only: flags & 0x2000 == 0x2000,
			grouping_identity: (flags & 0x0020 == 0x0020).then_some(0),
			compression,
			encryption: (flags & 0x0040 == 0x0040).then_some(0),
			unsynchronisation: false,
			data_length_indicator: compression.then_some(0),
		}
	}

	/// Get the ID3v2.4 byte representation of the flags
	pub fn as_id3v24_bytes(&self) -> u16 {
		let mut flags = 0;

		if self.tag_alter_preservation {
			flags |= 0x4000
		}

		if self.file_alter_preservation {
			flags |= 0x2000
		}

		if self.read_only {
			flags |= 0x1000
		}

		if self.grouping_identity.is_some() {
			flags |= 0x0040
		}

		if self.compression {
			flags |= 0x0008
		}

		if self.encryption.is_some() {
			flags |= 0x0004
		}

		if self.unsynchronisation {
			flags |= 0x0002
		}

		if self.data_length_indicator.is_some() {
			flags |= 0x0001
		}

		flags
	}

	/// Get the ID3v2.3 byte representation of the flags
	pub fn as_id3v23_bytes(&self) -> u16 {
		let mut flags = 0;

		if self.tag_alter_preservation {
			flags |= 0x8000
		}

		if self.file_alter_preservation {
			flags |= 0x4000
		}

		if self.read_only {
			flags |= 0x2000
		}

		if self.grouping_identity.is_some() {
			flags |= 0x0020
		}

		if self.compression {
			flags |= 0x0080
		}

		if self.encryption.is_some() {
			flags |= 0x0040
		}

		flags
	}

	/// The flags that describe content as it is written
	///
	/// Content is never compressed or unsynchronised on write, so those flags (and the data length
	/// indicator that goes with them) are only kept for encrypted frames, whose content is opaque.
	pub(crate) fn for_write(self) -> Self {
		if self.encryption.is_some() {
			return self;
		}

		Self {
			compression: false,
			unsynchronisation: false,
			data_length_indicator: None,
			..self
		}
	}
}

/// Decode a single frame, header included
///
/// IDs are lifted to their `ID3v2.4` counterparts, so a `TT2` frame from an `ID3v2.2` tag
/// decodes to a `TIT2` frame.
///
/// # Errors
///
/// * `raw` does not start with a frame header
/// * The frame's size exceeds the size of `raw`
/// * The frame content is malformed
///
/// # Examples
///
/// ```rust
/// use shelltag::id3::v2::{Frame, Id3v2Version, decode_frame};
///
/// # fn main() -> shelltag::error::Result<()> {
/// let raw = [b'T', b'T', b'2', 0, 0, 4, 0, b'F', b'o', b'o'];
/// let frame = decode_frame(&raw, Id3v2Version::V2)?;
///
/// assert_eq!(frame.id_str(), "TIT2");
/// assert_eq!(frame.text_values(), Some(vec![String::from("Foo")]));
/// # Ok(()) }
/// ```
pub fn decode_frame(raw: &[u8], version: Id3v2Version) -> Result<Frame> {
	let mut reader = raw;
	let Some(header) = header::read_header(&mut reader, version) else {
		return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
	};

	let Some(content) = reader.get(..header.size as usize) else {
		return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
	};

	match read::decode_frame_content(header, content, version, false, ParseOptions::new())? {
		Some(frame) => Ok(frame),
		None => Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into()),
	}
}

/// Encode a single frame, header included
///
/// The frame is written as-is for the requested version, no frames are merged or split. For
/// `ID3v2.2`, the ID is mapped to its 3 character counterpart.
///
/// # Errors
///
/// * The frame has no `ID3v2.2` ID (`ErrorKind::InvalidFrame`)
/// * The frame's content doesn't match its ID
/// * The content is too large for the frame's size field
///
/// # Examples
///
/// ```rust
/// use shelltag::id3::v2::{Frame, FrameId, Id3v2Version, TextInformationFrame, encode_frame};
/// use shelltag::TextEncoding;
///
/// # fn main() -> shelltag::error::Result<()> {
/// let frame = Frame::Text(TextInformationFrame::new(
/// 	FrameId::new("TIT2")?,
/// 	TextEncoding::Latin1,
/// 	vec![String::from("Foo")],
/// ));
///
/// let raw = encode_frame(&frame, Id3v2Version::V2)?;
/// assert_eq!(raw, [b'T', b'T', b'2', 0, 0, 4, 0, b'F', b'o', b'o']);
/// # Ok(()) }
/// ```
pub fn encode_frame(frame: &Frame, version: Id3v2Version) -> Result<Vec<u8>> {
	let mut out = Vec::new();
	crate::id3::v2::write::frame::write_single_frame(
		&mut out,
		frame,
		version,
		WriteOptions::default(),
	)?;
	Ok(out)
}
