//! ID3 specific items
//!
//! ID3 does things differently than other tags, making working with them a little more effort than other formats.
//! Check the other modules for important notes and/or warnings.
//!
//! An MP3 file may carry an ID3v2 tag at its very start, an ID3v1 tag in its final 128 bytes,
//! or both. See [`locate`].

pub mod v1;
pub mod v2;

use crate::config::ParseOptions;
use crate::error::Result;
use crate::macros::err;
use v1::constants::{ID3V1_TAG_MARKER, ID3V1_TAG_SIZE};
use v1::Id3v1Tag;
use v2::header::Id3v2Header;
use v2::Id3v2Tag;

use std::io::{Cursor, Read, Seek, SeekFrom};
use std::ops::Range;

/// The byte ranges of the tags in a file
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagLocations {
	/// The ID3v2 tag, header and footer included. This always starts at 0.
	pub v2: Option<Range<u64>>,
	/// The 128 byte ID3v1 block at the end of the file
	pub v1: Option<Range<u64>>,
}

impl TagLocations {
	/// Whether neither tag was found
	pub fn is_empty(&self) -> bool {
		self.v2.is_none() && self.v1.is_none()
	}

	/// The range of the file outside of the tags
	pub(crate) fn audio(&self, file_len: u64) -> Range<u64> {
		let start = self.v2.as_ref().map_or(0, |v2| v2.end);
		let end = self.v1.as_ref().map_or(file_len, |v1| v1.start);
		start..end.max(start)
	}
}

/// Find the ID3v2 and ID3v1 tags in a file's content
///
/// Only the leading 10 bytes and the trailing 128 bytes are inspected.
///
/// # Errors
///
/// * The ID3v2 header reports an unsupported version (`ErrorKind::UndefinedVersion`)
/// * The ID3v2 tag claims to be larger than the file (`ErrorKind::SizeMismatch`)
///
/// # Examples
///
/// ```rust
/// use shelltag::id3::locate;
///
/// # fn main() -> shelltag::error::Result<()> {
/// let mut file = vec![b'I', b'D', b'3', 4, 0, 0, 0, 0, 0, 0];
/// file.extend([0xFF, 0xFB, 0x90, 0x00]);
///
/// let locations = locate(&file)?;
/// assert_eq!(locations.v2, Some(0..10));
/// assert_eq!(locations.v1, None);
/// # Ok(()) }
/// ```
pub fn locate(file_bytes: &[u8]) -> Result<TagLocations> {
	locate_in(&mut Cursor::new(file_bytes))
}

pub(crate) fn locate_in<R>(data: &mut R) -> Result<TagLocations>
where
	R: Read + Seek,
{
	let file_len = data.seek(SeekFrom::End(0))?;
	data.rewind()?;

	let v2 = find_id3v2(data, file_len)?;
	let v1 = find_id3v1(data, file_len)?;

	// A tag-only file may end in something that looks like an ID3v1 block
	let v1 = v1.filter(|v1| v2.as_ref().is_none_or(|v2| v1.start >= v2.end));

	Ok(TagLocations { v2, v1 })
}

fn find_id3v2<R>(data: &mut R, file_len: u64) -> Result<Option<Range<u64>>>
where
	R: Read + Seek,
{
	log::debug!("Searching for an ID3v2 tag");

	if file_len < u64::from(Id3v2Header::LEN) {
		return Ok(None);
	}

	let mut header = [0; Id3v2Header::LEN as usize];
	data.read_exact(&mut header)?;

	if header[..3] != *b"ID3" {
		return Ok(None);
	}

	let header = Id3v2Header::parse_bytes(header)?;
	let end = u64::from(header.full_tag_size());
	if end > file_len {
		log::warn!("ID3v2 tag claims to be {end} bytes, but the file is only {file_len} bytes");
		err!(SizeMismatch);
	}

	log::debug!(
		"Found an ID3v2.{} tag, size: {end}",
		header.version.major()
	);

	Ok(Some(0..end))
}

fn find_id3v1<R>(data: &mut R, file_len: u64) -> Result<Option<Range<u64>>>
where
	R: Read + Seek,
{
	log::debug!("Searching for an ID3v1 tag");

	// Reader is too small to contain an ID3v1 tag
	let Some(start) = file_len.checked_sub(ID3V1_TAG_SIZE as u64) else {
		return Ok(None);
	};

	data.seek(SeekFrom::Start(start))?;

	let mut id3v1_header = [0; 3];
	data.read_exact(&mut id3v1_header)?;

	// No ID3v1 tag found
	if id3v1_header != ID3V1_TAG_MARKER {
		return Ok(None);
	}

	log::debug!("Found an ID3v1 tag");
	Ok(Some(start..file_len))
}

/// Read the tags found by [`locate_in`]
pub(crate) fn read_tags<R>(
	data: &mut R,
	locations: &TagLocations,
	parse_options: ParseOptions,
) -> Result<(Option<Id3v2Tag>, Option<Id3v1Tag>)>
where
	R: Read + Seek,
{
	let mut id3v2 = None;
	if locations.v2.is_some() {
		data.rewind()?;
		let header = Id3v2Header::parse(data)?;
		id3v2 = Some(v2::read::parse_id3v2(data, header, parse_options)?);
	}

	let mut id3v1 = None;
	if let Some(range) = &locations.v1 {
		data.seek(SeekFrom::Start(range.start))?;

		let mut block = [0; ID3V1_TAG_SIZE];
		data.read_exact(&mut block)?;

		id3v1 = Some(Id3v1Tag::parse(block, parse_options.parsing_mode)?);
	}

	Ok((id3v2, id3v1))
}

#[cfg(test)]
mod tests {
	use super::{TagLocations, locate};
	use crate::error::ErrorKind;

	const AUDIO: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];

	fn v1_block() -> Vec<u8> {
		let mut block = vec![0; 128];
		block[..3].copy_from_slice(b"TAG");
		block
	}

	#[test_log::test]
	fn no_tags() {
		let locations = locate(&AUDIO).unwrap();
		assert!(locations.is_empty());
		assert_eq!(locations.audio(4), 0..4);

		assert!(locate(&[]).unwrap().is_empty());
	}

	#[test_log::test]
	fn both_tags() {
		let mut file = b"ID3\x03\x00\x00\x00\x00\x00\x05\x00\x00\x00\x00\x00".to_vec();
		file.extend(AUDIO);
		file.extend(v1_block());

		let locations = locate(&file).unwrap();
		assert_eq!(
			locations,
			TagLocations {
				v2: Some(0..15),
				v1: Some(19..147),
			}
		);
		assert_eq!(locations.audio(147), 15..19);
	}

	#[test_log::test]
	fn footer_included() {
		let mut file = b"ID3\x04\x00\x10\x00\x00\x00\x00".to_vec();
		file.extend(b"3DI\x04\x00\x10\x00\x00\x00\x00");
		file.extend(AUDIO);

		assert_eq!(locate(&file).unwrap().v2, Some(0..20));
	}

	#[test_log::test]
	fn v1_inside_v2_ignored() {
		let mut body = vec![0; 128];
		body[..3].copy_from_slice(b"TAG");

		let mut file = b"ID3\x04\x00\x00\x00\x00\x01\x00".to_vec();
		file.extend(body);

		let locations = locate(&file).unwrap();
		assert_eq!(locations.v2, Some(0..138));
		assert_eq!(locations.v1, None);
	}

	#[test_log::test]
	fn bad_version() {
		let mut file = b"ID3\x05\x00\x00\x00\x00\x00\x00".to_vec();
		file.extend(AUDIO);

		let err = locate(&file).unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::UndefinedVersion(5, 0)));
	}

	#[test_log::test]
	fn truncated_v2() {
		let file = b"ID3\x04\x00\x00\x00\x00\x01\x00\x00".to_vec();
		let err = locate(&file).unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::SizeMismatch));
	}
}
