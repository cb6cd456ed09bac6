use crate::error::Result;
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::macros::{err, id3v2_err};

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};

/// The ID3v2 version
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum Id3v2Version {
	/// ID3v2.2
	V2,
	/// ID3v2.3
	V3,
	/// ID3v2.4
	V4,
}

impl Id3v2Version {
	/// The major version number, as stored in the tag header
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::id3::v2::Id3v2Version;
	///
	/// assert_eq!(Id3v2Version::V3.major(), 3);
	/// ```
	pub fn major(self) -> u8 {
		match self {
			Self::V2 => 2,
			Self::V3 => 3,
			Self::V4 => 4,
		}
	}

	/// The version as a `(2, major, 0)` tuple
	pub fn as_tuple(self) -> (u8, u8, u8) {
		(2, self.major(), 0)
	}
}

/// Flags that apply to the entire tag
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Id3v2TagFlags {
	/// Whether or not all frames are unsynchronised. See [`FrameFlags::unsynchronisation`](crate::id3::v2::FrameFlags::unsynchronisation)
	///
	/// NOTE: Tags are never written unsynchronised, and this is cleared once a tag is read.
	pub unsynchronisation: bool,
	/// Whether the tag had an extended header
	///
	/// NOTE: The extended header is skipped when reading, and never written. Like
	/// `unsynchronisation`, this is cleared once a tag is read.
	pub extended_header: bool,
	/// Indicates if the tag is in an experimental stage
	pub experimental: bool,
	/// Indicates that the tag includes a footer (`ID3v2.4` only)
	///
	/// A footer will be created if the tag is written
	pub footer: bool,
}

impl Id3v2TagFlags {
	/// Get the **ID3v2.4** byte representation of the flags, as they are written
	pub fn as_id3v24_byte(&self) -> u8 {
		let mut byte = 0;

		if self.experimental {
			byte |= 0x20;
		}

		if self.footer {
			byte |= 0x10;
		}

		byte
	}

	/// Get the **ID3v2.3** byte representation of the flags, as they are written
	pub fn as_id3v23_byte(&self) -> u8 {
		let mut byte = 0;

		if self.experimental {
			byte |= 0x20;
		}

		byte
	}
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Id3v2Header {
	pub version: Id3v2Version,
	pub flags: Id3v2TagFlags,
	/// The size of the tag contents (**DOES NOT INCLUDE THE HEADER/FOOTER**)
	pub size: u32,
}

impl Id3v2Header {
	pub(crate) const LEN: u32 = 10;

	pub(crate) fn parse<R>(bytes: &mut R) -> Result<Self>
	where
		R: Read,
	{
		log::debug!("Parsing ID3v2 header");

		let mut header = [0; Self::LEN as usize];
		bytes.read_exact(&mut header)?;

		Self::parse_bytes(header)
	}

	pub(crate) fn parse_bytes(header: [u8; 10]) -> Result<Self> {
		if &header[..3] != b"ID3" {
			err!(NoTag);
		}

		// Version is stored as [major, minor], but here we don't care about minor revisions unless there's an error.
		let version = match header[3] {
			2 => Id3v2Version::V2,
			3 => Id3v2Version::V3,
			4 => Id3v2Version::V4,
			major => err!(UndefinedVersion(major, header[4])),
		};

		let flags = header[5];

		// Compression was a flag only used in ID3v2.2 (bit 2).
		// At the time ID3v2.2 was published, a compression scheme wasn't decided.
		// The recommendation is to ignore the tag in this case.
		if version == Id3v2Version::V2 && flags & 0x40 == 0x40 {
			return Err(id3v2_err!(V2Compression));
		}

		let is_v2 = version == Id3v2Version::V2;
		let flags_parsed = Id3v2TagFlags {
			unsynchronisation: flags & 0x80 == 0x80,
			extended_header: !is_v2 && flags & 0x40 == 0x40,
			experimental: !is_v2 && flags & 0x20 == 0x20,
			footer: version == Id3v2Version::V4 && flags & 0x10 == 0x10,
		};

		let size = BigEndian::read_u32(&header[6..]).unsynch();

		Ok(Id3v2Header {
			version,
			flags: flags_parsed,
			size,
		})
	}

	/// The total size of the tag, including the header and footer
	pub(crate) fn full_tag_size(&self) -> u32 {
		self.size + Self::LEN + if self.flags.footer { Self::LEN } else { 0 }
	}
}
