//! Builders for synthetic MP3 files
//!
//! No audio assets ship with the crate, so files are put together from a couple of MPEG frame
//! headers and hand-built tags.

#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

/// Two MPEG-1 Layer III frame headers with some zeroed "audio"
pub const AUDIO: [u8; 16] = [
	0xFF, 0xFB, 0x90, 0x64, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFB, 0x90, 0x64, 0x00, 0x00, 0x00, 0x00,
];

fn synchsafe(size: usize) -> [u8; 4] {
	let size = u32::try_from(size).unwrap();
	assert!(size < 1 << 28);

	[
		((size >> 21) & 0x7F) as u8,
		((size >> 14) & 0x7F) as u8,
		((size >> 7) & 0x7F) as u8,
		(size & 0x7F) as u8,
	]
}

/// An `ID3v2.3` frame header and its content
pub fn v23_frame(id: &str, content: &[u8]) -> Vec<u8> {
	let mut frame = id.as_bytes().to_vec();
	frame.extend(u32::try_from(content.len()).unwrap().to_be_bytes());
	frame.extend([0, 0]);
	frame.extend(content);
	frame
}

/// An `ID3v2.4` frame header and its content
pub fn v24_frame(id: &str, content: &[u8]) -> Vec<u8> {
	let mut frame = id.as_bytes().to_vec();
	frame.extend(synchsafe(content.len()));
	frame.extend([0, 0]);
	frame.extend(content);
	frame
}

/// An `ID3v2.2` frame header and its content
pub fn v22_frame(id: &str, content: &[u8]) -> Vec<u8> {
	let mut frame = id.as_bytes().to_vec();
	frame.extend(&u32::try_from(content.len()).unwrap().to_be_bytes()[1..]);
	frame.extend(content);
	frame
}

/// Latin-1 text frame content
pub fn latin1_text(text: &str) -> Vec<u8> {
	let mut content = vec![0];
	content.extend(text.as_bytes());
	content
}

/// A full `ID3v2.{major}` tag holding `frames`
pub fn id3v2(major: u8, frames: &[Vec<u8>]) -> Vec<u8> {
	let body = frames.concat();

	let mut tag = b"ID3".to_vec();
	tag.extend([major, 0, 0]);
	tag.extend(synchsafe(body.len()));
	tag.extend(body);
	tag
}

/// A 128 byte `ID3v1.1` block
pub fn id3v1(title: &str, artist: &str, year: &str, track: u8, genre: u8) -> Vec<u8> {
	fn field(value: &str, size: usize) -> Vec<u8> {
		let mut field = value.as_bytes().to_vec();
		field.resize(size, 0);
		field
	}

	let mut tag = b"TAG".to_vec();
	tag.extend(field(title, 30));
	tag.extend(field(artist, 30));
	tag.extend(field("", 30));
	tag.extend(field(year, 4));
	tag.extend(field("", 28));
	tag.extend([0, track, genre]);

	assert_eq!(tag.len(), 128);
	tag
}

/// Write the parts of a file out to a temporary file
pub fn temp_mp3(parts: &[&[u8]]) -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	for part in parts {
		file.write_all(part).unwrap();
	}

	file.flush().unwrap();
	file
}

/// The current content of a temporary file
pub fn content(file: &NamedTempFile) -> Vec<u8> {
	std::fs::read(file.path()).unwrap()
}
