use super::frame::header::read_header;
use super::frame::read::decode_frame_content;
use super::header::{Id3v2Header, Id3v2TagFlags, Id3v2Version};
use super::tag::Id3v2Tag;
use super::transcode::merge_v23_dates;
use super::util::synchsafe::{SynchsafeInteger, UnsynchronizedStream};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::{FrameDecodeError, Result};
use crate::id3::v2::Frame;
use crate::macros::{id3v2_err, parse_mode_choice, try_vec};

use std::io::Read;

pub(crate) fn parse_id3v2<R>(
	bytes: &mut R,
	header: Id3v2Header,
	parse_options: ParseOptions,
) -> Result<Id3v2Tag>
where
	R: Read,
{
	log::debug!(
		"Parsing ID3v2 tag, size: {}, version: {:?}",
		header.size,
		header.version
	);

	let mut tag_bytes = try_vec![0; header.size as usize];
	bytes.read_exact(&mut tag_bytes)?;

	// ID3v2.4 unsynchronises frame by frame, earlier versions unsynchronise the entire tag
	if header.flags.unsynchronisation && header.version != Id3v2Version::V4 {
		let mut unsynchronised = Vec::with_capacity(tag_bytes.len());
		UnsynchronizedStream::new(&tag_bytes[..]).read_to_end(&mut unsynchronised)?;
		tag_bytes = unsynchronised;
	}

	let mut content = &tag_bytes[..];
	if header.flags.extended_header {
		skip_extended_header(&mut content, header.version)?;
	}

	let mut tag = Id3v2Tag::new(header.version);
	// Both only describe how the tag was stored
	tag.set_flags(Id3v2TagFlags {
		unsynchronisation: false,
		extended_header: false,
		..header.flags
	});

	read_all_frames_into_tag(&mut tag, content, tag_bytes.len(), header, parse_options)?;

	if header.version != Id3v2Version::V4 {
		merge_v23_dates(&mut tag);
	}

	Ok(tag)
}

// The extended header only holds a CRC and restrictions, neither of which are kept
fn skip_extended_header(content: &mut &[u8], version: Id3v2Version) -> Result<()> {
	let Some(size_bytes) = content.get(..4) else {
		return Err(id3v2_err!(BadExtendedHeaderSize));
	};

	let size = u32::from_be_bytes([size_bytes[0], size_bytes[1], size_bytes[2], size_bytes[3]]);

	// ID3v2.3 doesn't include the size itself, ID3v2.4 does (and is synchsafe)
	let (size, min_size) = match version {
		Id3v2Version::V4 => (size.unsynch() as usize, 6),
		_ => (size as usize + 4, 10),
	};

	if size < min_size || size >= content.len() {
		return Err(id3v2_err!(BadExtendedHeaderSize));
	}

	log::trace!("Skipping extended header of size {size}");
	*content = &content[size..];

	Ok(())
}

fn read_all_frames_into_tag(
	tag: &mut Id3v2Tag,
	mut content: &[u8],
	tag_size: usize,
	header: Id3v2Header,
	parse_options: ParseOptions,
) -> Result<()> {
	let version = header.version;

	loop {
		let offset = (tag_size - content.len()) as u64;

		let Some(raw_header) = read_header(&mut content, version) else {
			log::trace!("Reached padding at offset {offset}");
			break;
		};

		let id = raw_header.id_lossy();
		let size = raw_header.size as usize;

		let (frame_content, rest) = if size <= content.len() {
			content.split_at(size)
		} else {
			// The frame runs past the tag, nothing after it can be trusted
			record_error(
				tag,
				FrameDecodeError::new(id, offset, id3v2_err!(BadFrameLength)),
				parse_options.parsing_mode,
			)?;
			break;
		};

		content = rest;

		let frame = match decode_frame_content(
			raw_header,
			frame_content,
			version,
			header.flags.unsynchronisation,
			parse_options,
		) {
			Ok(Some(frame)) => frame,
			// Empty frames, or pictures that weren't requested
			Ok(None) => continue,
			Err(err) => {
				record_error(
					tag,
					FrameDecodeError::new(id, offset, err),
					parse_options.parsing_mode,
				)?;
				continue;
			},
		};

		insert_frame(tag, frame);
	}

	Ok(())
}

fn record_error(tag: &mut Id3v2Tag, err: FrameDecodeError, parse_mode: ParsingMode) -> Result<()> {
	parse_mode_choice!(
		parse_mode,
		STRICT: return Err(err.into()),
		RELAXED: log::warn!("Skipping frame: {err}"),
		DEFAULT: {
			log::warn!("Skipping frame: {err}");
			tag.decode_errors.push(err);
		}
	);

	Ok(())
}

fn insert_frame(tag: &mut Id3v2Tag, frame: Frame) {
	// Frames without a dedicated type may legitimately repeat (GEOB, UFID, ...)
	if let Frame::Binary(_) = frame {
		tag.frames.push(frame);
		return;
	}

	let frame_value_is_empty = frame.is_empty();
	if let Some(replaced_frame) = tag.insert(frame) {
		// Duplicate frames are not allowed. But if this occurs we try
		// to keep the frame with the non-empty content. Superfluous,
		// duplicate frames that follow the first frame are often empty.
		if frame_value_is_empty && !replaced_frame.is_empty() {
			log::warn!(
				"Restoring non-empty frame with ID \"{id}\" that has been replaced by an empty \
				 frame with the same ID",
				id = replaced_frame.id()
			);
			drop(tag.insert(replaced_frame));
		} else {
			log::warn!(
				"Replaced frame with ID \"{id}\" by a frame with the same ID",
				id = replaced_frame.id()
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::parse_id3v2;
	use crate::config::{ParseOptions, ParsingMode};
	use crate::error::ErrorKind;
	use crate::id3::v2::header::Id3v2Header;
	use crate::id3::v2::{FrameId, Id3v2Tag, Id3v2Version, Timestamp};

	fn read(bytes: &[u8], parsing_mode: ParsingMode) -> crate::error::Result<Id3v2Tag> {
		let mut reader = bytes;
		let header = Id3v2Header::parse(&mut reader)?;
		parse_id3v2(
			&mut reader,
			header,
			ParseOptions::new().parsing_mode(parsing_mode),
		)
	}

	fn build_tag(version: u8, flags: u8, body: &[u8]) -> Vec<u8> {
		let mut out = vec![b'I', b'D', b'3', version, 0, flags];
		out.extend((body.len() as u32).to_be_bytes().map(|b| b & 0x7F));
		out.extend_from_slice(body);
		out
	}

	#[test_log::test]
	fn zero_size_id3v2() {
		let tag = read(&build_tag(4, 0, &[]), ParsingMode::Strict).unwrap();
		assert!(tag.is_empty());
	}

	#[test_log::test]
	fn padding_only() {
		let tag = read(&build_tag(3, 0, &[0; 64]), ParsingMode::Strict).unwrap();
		assert!(tag.is_empty());
	}

	#[test_log::test]
	fn bad_frame_id_otherwise_valid() {
		let mut body = Vec::new();
		body.extend(b"T+T2\x00\x00\x00\x04\x00\x00\x00Foo");
		body.extend(b"TPE1\x00\x00\x00\x04\x00\x00\x00Bar");

		let tag = read(&build_tag(4, 0, &body), ParsingMode::BestAttempt).unwrap();
		assert_eq!(tag.len(), 1);
		assert_eq!(
			tag.get_texts(&FrameId::new("TPE1").unwrap()),
			Some(vec![String::from("Bar")])
		);

		let errors = tag.decode_errors();
		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].id(), "T+T2");
		assert_eq!(errors[0].offset(), 0);

		let err = read(&build_tag(4, 0, &body), ParsingMode::Strict).unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::FrameDecode(_)));

		let tag = read(&build_tag(4, 0, &body), ParsingMode::Relaxed).unwrap();
		assert_eq!(tag.len(), 1);
		assert!(tag.decode_errors().is_empty());
	}

	#[test_log::test]
	fn frame_past_end_of_tag() {
		let mut body = Vec::new();
		body.extend(b"TPE1\x00\x00\x00\x04\x00\x00\x00Bar");
		body.extend(b"TIT2\x00\x00\x00\x7F\x00\x00\x00Foo");

		let tag = read(&build_tag(3, 0, &body), ParsingMode::BestAttempt).unwrap();
		assert_eq!(tag.len(), 1);
		assert_eq!(tag.decode_errors()[0].id(), "TIT2");
		assert_eq!(tag.decode_errors()[0].offset(), 14);
	}

	#[test_log::test]
	fn v23_extended_header() {
		let mut body = Vec::new();
		// Size (excluding itself), flags, padding size
		body.extend(b"\x00\x00\x00\x06\x00\x00\x00\x00\x00\x00");
		body.extend(b"TPE1\x00\x00\x00\x04\x00\x00\x00Bar");

		let tag = read(&build_tag(3, 0x40, &body), ParsingMode::Strict).unwrap();
		assert!(!tag.flags().extended_header);
		assert_eq!(tag.len(), 1);
	}

	#[test_log::test]
	fn v23_unsynchronised_tag() {
		// Sizes describe the content after unsynchronisation is undone
		let body = b"PRIV\x00\x00\x00\x04\x00\x00a\x00\xFF\x00\xE0";

		let tag = read(&build_tag(3, 0x80, body), ParsingMode::Strict).unwrap();
		let Some(crate::id3::v2::Frame::Private(private)) = tag.iter().next() else {
			panic!("Expected a PRIV frame");
		};

		assert_eq!(private.private_data, [0xFF, 0xE0]);
	}

	#[test_log::test]
	fn v23_dates_merged() {
		let mut body = Vec::new();
		body.extend(b"TYER\x00\x00\x00\x05\x00\x00\x001992");
		body.extend(b"TDAT\x00\x00\x00\x05\x00\x00\x000305");
		body.extend(b"TIME\x00\x00\x00\x05\x00\x00\x001420");

		let tag = read(&build_tag(3, 0, &body), ParsingMode::Strict).unwrap();
		assert_eq!(tag.original_version(), Id3v2Version::V3);
		assert_eq!(tag.len(), 1);

		let Some(crate::id3::v2::Frame::Timestamp(tdrc)) = tag.iter().next() else {
			panic!("Expected a TDRC frame");
		};

		assert_eq!(
			tdrc.timestamps,
			[Timestamp {
				year: 1992,
				month: Some(5),
				day: Some(3),
				hour: Some(14),
				minute: Some(20),
				second: None,
			}]
		);
	}

	#[test_log::test]
	fn duplicate_empty_frame_ignored() {
		let mut body = Vec::new();
		body.extend(b"TIT2\x00\x00\x00\x04\x00\x00\x00Foo");
		body.extend(b"TIT2\x00\x00\x00\x01\x00\x00\x00");

		let tag = read(&build_tag(4, 0, &body), ParsingMode::Strict).unwrap();
		assert_eq!(tag.len(), 1);
		assert_eq!(
			tag.get_texts(&FrameId::new("TIT2").unwrap()),
			Some(vec![String::from("Foo")])
		);
	}
}
