use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::FrameFlags;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::id3::v2::util::upgrade::{upgrade_v2, upgrade_v3};

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// An ID3v2 frame header
///
/// These are rarely constructed by hand. Usually they are created in the background
/// when making a new [`Frame`](crate::id3::v2::Frame).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct FrameHeader {
	pub(crate) id: FrameId,
	pub flags: FrameFlags,
}

impl FrameHeader {
	/// Create a new [`FrameHeader`]
	///
	/// NOTE: Once the header is created, the ID becomes immutable.
	pub const fn new(id: FrameId, flags: FrameFlags) -> Self {
		Self { id, flags }
	}

	/// Get the ID of the frame
	pub const fn id(&self) -> &FrameId {
		&self.id
	}
}

/// An `ID3v2` frame ID
#[derive(PartialEq, Clone, Debug, Eq, Hash)]
pub enum FrameId {
	/// A 4 character `ID3v2.3/4` frame ID
	Valid(Cow<'static, str>),
	/// An `ID3v2.2` ID that has no `ID3v2.4` counterpart
	///
	/// These frames are kept as [`BinaryFrame`](crate::id3::v2::BinaryFrame)s and can only be
	/// written back to an `ID3v2.2` tag.
	Outdated(Cow<'static, str>),
}

impl FrameId {
	/// Attempts to create a `FrameId` from an ID string
	///
	/// NOTE: This will not upgrade IDs.
	///
	/// # Errors
	///
	/// * `id` contains invalid characters (must be 'A'..='Z' and '0'..='9')
	/// * `id` is an invalid length (must be 3 or 4)
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::id3::v2::FrameId;
	///
	/// # fn main() -> shelltag::error::Result<()> {
	/// assert!(FrameId::new("TPE1")?.is_valid());
	/// assert!(FrameId::new("TP1")?.is_outdated());
	/// assert!(FrameId::new("tpe1").is_err());
	/// # Ok(()) }
	/// ```
	pub fn new<I>(id: I) -> Result<Self>
	where
		I: Into<Cow<'static, str>>,
	{
		Self::new_cow(id.into())
	}

	pub(crate) fn new_cow(id: Cow<'static, str>) -> Result<Self> {
		Self::verify_id(&id)?;

		match id.len() {
			3 => Ok(FrameId::Outdated(id)),
			4 => Ok(FrameId::Valid(id)),
			_ => Err(
				Id3v2Error::new(Id3v2ErrorKind::BadFrameId(id.into_owned().into_bytes())).into(),
			),
		}
	}

	/// Whether this frame ID is an `ID3v2.2` ID that couldn't be upgraded
	pub fn is_outdated(&self) -> bool {
		matches!(self, FrameId::Outdated(_))
	}

	/// Whether this frame ID is a 4 character ID
	pub fn is_valid(&self) -> bool {
		matches!(self, FrameId::Valid(_))
	}

	/// Extracts the string from the ID
	pub fn as_str(&self) -> &str {
		match self {
			FrameId::Valid(v) | FrameId::Outdated(v) => v,
		}
	}

	fn verify_id(id_str: &str) -> Result<()> {
		if id_str
			.bytes()
			.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
		{
			return Ok(());
		}

		Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameId(id_str.as_bytes().to_vec())).into())
	}

	/// Decode an on-disk ID, lifting it into the `ID3v2.4` namespace
	///
	/// Some taggers write `ID3v2.3` frame headers with `ID3v2.2` IDs, these arrive with a length
	/// of 3 and are upgraded as `ID3v2.2` IDs.
	pub(crate) fn from_raw(raw: &[u8], version: Id3v2Version) -> Result<Self> {
		let id_str = std::str::from_utf8(raw)
			.map_err(|_| Id3v2Error::new(Id3v2ErrorKind::BadFrameId(raw.to_vec())))?;

		let upgraded = match (version, raw.len()) {
			(_, 3) => upgrade_v2(id_str),
			(Id3v2Version::V3, _) => upgrade_v3(id_str),
			_ => None,
		};

		match upgraded {
			Some(id) => Ok(FrameId::Valid(Cow::Borrowed(id))),
			None => Self::new_cow(Cow::Owned(id_str.to_owned())),
		}
	}
}

impl Display for FrameId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<FrameId> for Cow<'static, str> {
	fn from(id: FrameId) -> Self {
		match id {
			FrameId::Valid(v) | FrameId::Outdated(v) => v,
		}
	}
}

/// A frame header as it appears on disk, before its ID and flags are interpreted
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawFrameHeader<'a> {
	pub(crate) id: &'a [u8],
	pub(crate) size: u32,
	pub(crate) flags: u16,
}

impl RawFrameHeader<'_> {
	pub(crate) fn id_lossy(&self) -> String {
		String::from_utf8_lossy(self.id).into_owned()
	}
}

/// Read the next frame header from `content`
///
/// Returns `None` once padding (or the end of the tag) is reached.
pub(crate) fn read_header<'a>(
	content: &mut &'a [u8],
	version: Id3v2Version,
) -> Option<RawFrameHeader<'a>> {
	let header_len = match version {
		Id3v2Version::V2 => 6,
		Id3v2Version::V3 | Id3v2Version::V4 => 10,
	};

	if content.len() < header_len {
		return None;
	}

	let (header, rest) = content.split_at(header_len);

	// Assume we just started reading padding
	if header[0] == 0 {
		return None;
	}

	*content = rest;

	let raw = match version {
		// V2 doesn't store flags
		Id3v2Version::V2 => RawFrameHeader {
			id: &header[..3],
			size: u32::from_be_bytes([0, header[3], header[4], header[5]]),
			flags: 0,
		},
		Id3v2Version::V3 | Id3v2Version::V4 => {
			let mut size = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);
			if version == Id3v2Version::V4 {
				size = size.unsynch();
			}

			// For some reason, some apps make v3 tags with v2 frame IDs.
			// The actual frame header is v3 though
			let id_end = if header[3] == 0 && version == Id3v2Version::V3 {
				log::warn!("Found a v2 frame ID in a v3 tag, attempting to upgrade");
				3
			} else {
				4
			};

			RawFrameHeader {
				id: &header[..id_end],
				size,
				flags: u16::from_be_bytes([header[8], header[9]]),
			}
		},
	};

	Some(raw)
}
