#![allow(missing_docs)]

mod util;

use shelltag::TextEncoding;
use shelltag::config::{ParseOptions, WriteOptions};
use shelltag::error::ErrorKind;
use shelltag::file::Id3File;
use shelltag::id3::v2::{
	Frame, FrameId, Id3v2Version, TextInformationFrame, decode_frame, encode_frame,
};

use util::{AUDIO, content, id3v2, latin1_text, temp_mp3, v23_frame};

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
	haystack.windows(needle.len()).any(|window| window == needle)
}

fn no_padding() -> WriteOptions {
	WriteOptions::new().preferred_padding(0)
}

#[test_log::test]
fn v23_dates_merged() {
	let v2 = id3v2(3, &[
		v23_frame("TYER", &latin1_text("1992")),
		v23_frame("TDAT", &latin1_text("0105")),
		v23_frame("TIME", &latin1_text("1230")),
	]);
	let temp = temp_mp3(&[&v2, &AUDIO]);

	let file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	assert_eq!(file.get_field("YEAR").unwrap(), "1992-05-01T12:30");
	assert_eq!(file.id3v2().unwrap().len(), 1);
}

#[test_log::test]
fn v23_dates_split() {
	let v2 = id3v2(3, &[v23_frame("TYER", &latin1_text("1992"))]);
	let temp = temp_mp3(&[&v2, &AUDIO]);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	file.add_field("YEAR", "1992-05-01T12:30").unwrap();
	file.save(no_padding()).unwrap();

	let saved = content(&temp);
	assert!(contains(&saved, b"TYER"));
	assert!(contains(&saved, b"TDAT"));
	assert!(contains(&saved, b"TIME"));
	assert!(!contains(&saved, b"TDRC"));

	let file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	assert_eq!(file.get_field("YEAR").unwrap(), "1992-05-01T12:30");
}

#[test_log::test]
fn cleared_year_kept() {
	for version in [Id3v2Version::V3, Id3v2Version::V4] {
		let temp = temp_mp3(&[&AUDIO]);

		let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
		file.create(false, Some(version));
		file.add_field("YEAR", "1992").unwrap();
		file.clear_field("YEAR").unwrap();
		file.clear_field("ORIGYEAR").unwrap();
		assert_eq!(file.get_field("YEAR").unwrap(), "");
		file.save(no_padding()).unwrap();

		let file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
		assert_eq!(file.get_field("YEAR").unwrap(), "", "{version:?}");
		assert_eq!(file.get_field("ORIGYEAR").unwrap(), "", "{version:?}");
	}
}

#[test_log::test]
fn v24_keeps_recording_time() {
	let temp = temp_mp3(&[&AUDIO]);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	file.create(false, Some(Id3v2Version::V4));
	file.add_field("YEAR", "1992-05-01T12:30").unwrap();
	file.add_field("ORIGYEAR", "1990").unwrap();
	file.save(no_padding()).unwrap();

	let saved = content(&temp);
	assert!(contains(&saved, b"TDRC"));
	assert!(contains(&saved, b"TDOR"));
	assert!(!contains(&saved, b"TYER"));
	assert!(!contains(&saved, b"TORY"));
}

#[test_log::test]
fn v24_only_frames_dropped() {
	let v2 = id3v2(3, &[v23_frame("TIT2", &latin1_text("Foo"))]);
	let temp = temp_mp3(&[&v2, &AUDIO]);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	file.add_field("MOOD", "Happy").unwrap();
	file.add_field("ORIGYEAR", "1990-03").unwrap();
	file.save(no_padding()).unwrap();

	let saved = content(&temp);
	assert!(!contains(&saved, b"TMOO"));
	assert!(contains(&saved, b"TORY"));

	let file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	let err = file.get_field("MOOD").unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::FieldNotFound(_)));
	assert_eq!(file.get_field("ORIGYEAR").unwrap(), "1990");
	assert_eq!(file.get_field("TITLE").unwrap(), "Foo");
}

#[test_log::test]
fn involved_people_merged() {
	let temp = temp_mp3(&[&AUDIO]);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	file.create(false, Some(Id3v2Version::V3));
	file.add_field("INVOLVEDPEOPLE", "Producer").unwrap();
	file.add_field("MUSICIANCREDITS", "Guitar").unwrap();
	file.save(no_padding()).unwrap();

	let saved = content(&temp);
	assert!(contains(&saved, b"IPLS"));
	assert!(!contains(&saved, b"TIPL"));
	assert!(!contains(&saved, b"TMCL"));

	let file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	assert!(file.get_field("MUSICIANCREDITS").is_err());
	assert!(file.get_field("INVOLVEDPEOPLE").is_ok());
}

#[test_log::test]
fn utf8_becomes_utf16() {
	let temp = temp_mp3(&[&AUDIO]);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	file.create(false, Some(Id3v2Version::V3));
	file.add_field("TITLE", "Fóó").unwrap();
	file.save(no_padding()).unwrap();

	let file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	let title_key = shelltag::field::TITLE.key();
	let Some(Frame::Text(title)) = file.query(&title_key).unwrap().next() else {
		panic!("Expected a text frame");
	};

	assert_eq!(title.encoding, TextEncoding::UTF16);
	assert_eq!(title.values, ["Fóó"]);
}

#[test_log::test]
fn single_frame_every_version() {
	let frame = Frame::Text(TextInformationFrame::new(
		FrameId::new("TALB").unwrap(),
		TextEncoding::Latin1,
		vec![String::from("Foo")],
	));

	let v2 = encode_frame(&frame, Id3v2Version::V2).unwrap();
	assert_eq!(&v2[..3], b"TAL");
	assert_eq!(decode_frame(&v2, Id3v2Version::V2).unwrap(), frame);

	let v3 = encode_frame(&frame, Id3v2Version::V3).unwrap();
	assert_eq!(&v3[..4], b"TALB");
	assert_eq!(decode_frame(&v3, Id3v2Version::V3).unwrap(), frame);

	let v4 = encode_frame(&frame, Id3v2Version::V4).unwrap();
	assert_eq!(decode_frame(&v4, Id3v2Version::V4).unwrap(), frame);
}
