pub(super) mod frame;

use super::header::Id3v2Version;
use super::transcode::downgrade_v23;
use super::util::synchsafe::SynchsafeInteger;
use super::{Frame, Id3v2Tag};
use crate::config::WriteOptions;
use crate::macros::{err, try_vec};
use crate::error::Result;

use std::borrow::Cow;

/// Encode `tag` as an `ID3v2.{version}` tag, header, padding, and footer included
///
/// An empty tag encodes to nothing, so writing it strips the tag.
pub(crate) fn create_tag(
	tag: &Id3v2Tag,
	version: Id3v2Version,
	write_options: WriteOptions,
) -> Result<Vec<u8>> {
	// We are stripping the tag
	if tag.is_empty() {
		return Ok(Vec::new());
	}

	log::debug!("Writing ID3v2.{} tag", version.major());

	let frames: Cow<'_, [Frame]> = match version {
		Id3v2Version::V4 => Cow::Borrowed(&tag.frames),
		Id3v2Version::V3 | Id3v2Version::V2 => Cow::Owned(downgrade_v23(tag)),
	};

	let flags = tag.flags();
	let has_footer = flags.footer && version == Id3v2Version::V4;
	let tag_flags = match version {
		Id3v2Version::V4 => flags.as_id3v24_byte(),
		Id3v2Version::V3 => flags.as_id3v23_byte(),
		// Only the unsynchronisation and compression flags exist
		Id3v2Version::V2 => 0,
	};

	let mut id3v2 = Vec::new();
	id3v2.extend(b"ID3");
	id3v2.extend([version.major(), 0, tag_flags]);
	// The size is filled in once the frames are written
	id3v2.extend([0; 4]);

	let mut frame_count = 0;
	for frame in frames.iter() {
		if frame::id_for_version(frame, version).is_none() {
			log::warn!(
				"Discarding frame: {}, not supported in ID3v2.{}",
				frame.id_str(),
				version.major()
			);
			continue;
		}

		if version == Id3v2Version::V2 && frame.flags().encryption.is_some() {
			log::warn!(
				"Discarding frame: {}, encrypted frames are not supported in ID3v2.2",
				frame.id_str()
			);
			continue;
		}

		frame::write_single_frame(&mut id3v2, frame, version, write_options)?;
		frame_count += 1;
	}

	log::debug!("Wrote {frame_count} frame(s)");

	let mut len = id3v2.len() - 10;

	// https://mutagen-specs.readthedocs.io/en/latest/id3/id3v2.4.0-structure.html#padding:
	//
	// "[A tag] MUST NOT have any padding when a tag footer is added to the tag"
	let padding_len = write_options.preferred_padding.unwrap_or(0) as usize;
	if !has_footer {
		len += padding_len;
	}

	let Ok(len) = u32::try_from(len) else {
		err!(TooMuchData);
	};

	// Go back to the start and write the final size
	id3v2[6..10].copy_from_slice(&len.synch()?.to_be_bytes());

	if has_footer {
		log::trace!("Footer requested, not padding tag");

		// The footer is the same as the header, but with the identifier reversed
		let mut footer = [0; 10];
		footer[..3].copy_from_slice(b"3DI");
		footer[3..].copy_from_slice(&id3v2[3..10]);
		id3v2.extend(footer);

		return Ok(id3v2);
	}

	if padding_len == 0 {
		log::trace!("No padding requested, writing tag as-is");
		return Ok(id3v2);
	}

	log::trace!("Padding tag with {} bytes", padding_len);
	id3v2.extend(try_vec![0; padding_len]);

	Ok(id3v2)
}

#[cfg(test)]
mod tests {
	use super::create_tag;
	use crate::config::{ParseOptions, WriteOptions};
	use crate::id3::v2::header::Id3v2Header;
	use crate::id3::v2::read::parse_id3v2;
	use crate::id3::v2::{
		AttachedPictureFrame, CommentFrame, ExtendedTextFrame, ExtendedUrlFrame, Frame, FrameId,
		Id3v2Tag, Id3v2TagFlags, Id3v2Version, PrivateFrame, TextInformationFrame, Timestamp,
		TimestampFrame, UrlLinkFrame,
	};
	use crate::picture::{MimeType, PictureType};
	use crate::util::text::TextEncoding;

	fn read(bytes: &[u8]) -> Id3v2Tag {
		let mut reader = bytes;
		let header = Id3v2Header::parse(&mut reader).unwrap();
		parse_id3v2(&mut reader, header, ParseOptions::new()).unwrap()
	}

	fn text(id: &'static str, values: &[&str]) -> Frame {
		Frame::Text(TextInformationFrame::new(
			FrameId::new(id).unwrap(),
			TextEncoding::UTF16,
			values.iter().map(|v| (*v).to_owned()).collect(),
		))
	}

	// Single values only, so the tag survives every version
	fn every_frame_kind(version: Id3v2Version) -> Id3v2Tag {
		let mut tag = Id3v2Tag::new(version);
		tag.insert(text("TIT2", &["Foo title"]));
		tag.insert(text("TPE1", &["Bar artist"]));
		tag.insert(Frame::Timestamp(TimestampFrame::new(
			FrameId::new("TDRC").unwrap(),
			TextEncoding::UTF16,
			vec![Timestamp {
				year: 1992,
				month: Some(5),
				day: Some(3),
				hour: Some(14),
				minute: Some(20),
				second: None,
			}],
		)));
		tag.insert(Frame::Url(UrlLinkFrame::new(
			FrameId::new("WOAR").unwrap(),
			"https://example.com",
		)));
		tag.insert(Frame::UserText(ExtendedTextFrame::new(
			TextEncoding::UTF16,
			String::from("FOO"),
			vec![String::from("Bar")],
		)));
		tag.insert(Frame::UserUrl(ExtendedUrlFrame::new(
			TextEncoding::Latin1,
			String::from("BAZ"),
			String::from("https://example.org"),
		)));
		tag.insert(Frame::Comment(CommentFrame::new(
			TextEncoding::UTF16,
			*b"eng",
			String::new(),
			vec![String::from("Qux comment")],
		)));
		tag.insert(Frame::Picture(AttachedPictureFrame::new(
			TextEncoding::Latin1,
			Some(MimeType::Png),
			PictureType::CoverFront,
			String::from("cover"),
			vec![0x89, b'P', b'N', b'G'],
		)));
		tag
	}

	#[test_log::test]
	fn round_trip_every_version() {
		for version in [Id3v2Version::V2, Id3v2Version::V3, Id3v2Version::V4] {
			let tag = every_frame_kind(version);
			let bytes = create_tag(&tag, version, WriteOptions::default()).unwrap();

			assert_eq!(&bytes[..5], &[b'I', b'D', b'3', version.major(), 0]);
			assert_eq!(read(&bytes), tag, "ID3v2.{} round trip", version.major());
		}
	}

	#[test_log::test]
	fn private_frames_skipped_for_v2() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V2);
		tag.insert(text("TIT2", &["Foo"]));
		tag.insert(Frame::Private(PrivateFrame::new(String::from("owner"), vec![1])));

		let bytes = create_tag(&tag, Id3v2Version::V2, WriteOptions::default()).unwrap();
		let read_back = read(&bytes);
		assert_eq!(read_back.len(), 1);
	}

	#[test_log::test]
	fn multi_value_v23() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V3);
		tag.insert(text("TPE1", &["Foo", "Bar"]));

		let bytes = create_tag(&tag, Id3v2Version::V3, WriteOptions::default()).unwrap();
		assert_eq!(
			read(&bytes).get_texts(&FrameId::new("TPE1").unwrap()),
			Some(vec![String::from("Foo/Bar")])
		);

		let bytes = create_tag(&tag, Id3v2Version::V4, WriteOptions::default()).unwrap();
		assert_eq!(
			read(&bytes).get_texts(&FrameId::new("TPE1").unwrap()),
			Some(vec![String::from("Foo"), String::from("Bar")])
		);
	}

	#[test_log::test]
	fn padding() {
		let mut tag = Id3v2Tag::default();
		tag.insert(text("TIT2", &["Foo"]));

		let unpadded = create_tag(&tag, Id3v2Version::V4, WriteOptions::new().preferred_padding(0))
			.unwrap();
		let padded = create_tag(&tag, Id3v2Version::V4, WriteOptions::default()).unwrap();

		assert_eq!(padded.len(), unpadded.len() + 1024);
		assert!(padded[unpadded.len()..].iter().all(|b| *b == 0));
		assert_eq!(read(&padded), read(&unpadded));
	}

	#[test_log::test]
	fn footer() {
		let mut tag = Id3v2Tag::default();
		tag.set_flags(Id3v2TagFlags {
			footer: true,
			..Id3v2TagFlags::default()
		});
		tag.insert(text("TIT2", &["Foo"]));

		let bytes = create_tag(&tag, Id3v2Version::V4, WriteOptions::default()).unwrap();
		let (header, footer) = (&bytes[..10], &bytes[bytes.len() - 10..]);

		assert_eq!(&footer[..3], b"3DI");
		assert_eq!(&header[3..], &footer[3..]);
		// No padding with a footer
		assert_eq!(bytes.len(), 10 + (10 + 1 + 8) + 10);
	}

	#[test_log::test]
	fn empty_tag_strips() {
		let bytes = create_tag(&Id3v2Tag::default(), Id3v2Version::V4, WriteOptions::default());
		assert!(bytes.unwrap().is_empty());
	}
}
