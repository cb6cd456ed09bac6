#![allow(missing_docs)]

mod util;

use shelltag::config::{ParseOptions, WriteOptions};
use shelltag::error::ErrorKind;
use shelltag::file::Id3File;
use shelltag::id3::locate;
use shelltag::id3::v2::Id3v2Version;

use util::{AUDIO, content, id3v1, id3v2, latin1_text, temp_mp3, v22_frame, v24_frame};

fn no_padding() -> WriteOptions {
	WriteOptions::new().preferred_padding(0)
}

fn both_tags() -> (Vec<u8>, Vec<u8>) {
	let v2 = id3v2(4, &[
		v24_frame("TIT2", &latin1_text("Foo title")),
		v24_frame("TPE1", &latin1_text("Bar artist")),
	]);
	let v1 = id3v1("Foo title", "Bar artist", "1992", 3, 90);
	(v2, v1)
}

#[test_log::test]
fn read_both_tags() {
	let (v2, v1) = both_tags();
	let temp = temp_mp3(&[&v2, &AUDIO, &v1]);

	let file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	assert!(file.has_tag());
	assert_eq!(file.version(), Some((2, 4, 0)));
	assert_eq!(file.get_field("TITLE").unwrap(), "Foo title");

	let id3v1 = file.id3v1().unwrap();
	assert_eq!(id3v1.year, Some(1992));
	assert_eq!(id3v1.track_number, Some(3));
	assert_eq!(id3v1.genre_name(), Some("Avantgarde"));

	let locations = file.tag_locations();
	assert_eq!(locations.v2, Some(0..v2.len() as u64));
	let end = (v2.len() + AUDIO.len() + v1.len()) as u64;
	assert_eq!(locations.v1, Some(end - 128..end));
}

#[test_log::test]
fn audio_untouched() {
	let (v2, v1) = both_tags();
	let temp = temp_mp3(&[&v2, &AUDIO, &v1]);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	file.add_field("ALBUM", "A much longer album name than before").unwrap();
	file.save(WriteOptions::default()).unwrap();

	let saved = content(&temp);
	let locations = locate(&saved).unwrap();

	let v2_end = locations.v2.unwrap().end as usize;
	let v1_start = locations.v1.unwrap().start as usize;
	assert_eq!(&saved[v2_end..v1_start], AUDIO);
	assert_eq!(file.tag_locations(), &locate(&saved).unwrap());
}

#[test_log::test]
fn save_idempotent() {
	let (v2, v1) = both_tags();
	let temp = temp_mp3(&[&v2, &AUDIO, &v1]);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	file.save(no_padding()).unwrap();
	let first = content(&temp);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	file.save(no_padding()).unwrap();
	let second = content(&temp);

	assert_eq!(first, second);
}

#[test_log::test]
fn delete_v2_only() {
	let (v2, v1) = both_tags();
	let temp = temp_mp3(&[&v2, &AUDIO, &v1]);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	file.delete_all(false, true).unwrap();
	assert_eq!(file.version(), Some((1, 1, 0)));
	file.save(WriteOptions::default()).unwrap();

	assert_eq!(content(&temp), [&AUDIO[..], &v1].concat());
}

#[test_log::test]
fn delete_v1_only() {
	let (v2, v1) = both_tags();
	let temp = temp_mp3(&[&v2, &AUDIO, &v1]);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	file.delete_all(true, false).unwrap();
	file.save(no_padding()).unwrap();

	let saved = content(&temp);
	let locations = locate(&saved).unwrap();
	assert!(locations.v1.is_none());
	assert!(saved.ends_with(&AUDIO));

	let file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	assert_eq!(file.get_field("ARTIST").unwrap(), "Bar artist");
}

#[test_log::test]
fn delete_everything() {
	let (v2, v1) = both_tags();
	let temp = temp_mp3(&[&v2, &AUDIO, &v1]);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	file.delete_all(true, true).unwrap();
	assert!(!file.has_tag());
	file.save(WriteOptions::default()).unwrap();
	assert_eq!(content(&temp), AUDIO);

	// Nothing left to write or strip
	let err = file.save(WriteOptions::default()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::NoTag));
}

#[test_log::test]
fn v1_comment_kept() {
	let mut v1 = id3v1("Foo", "Bar", "1992", 0, 0);
	v1[97..127].copy_from_slice(&[b'a'; 30]);
	let temp = temp_mp3(&[&AUDIO, &v1]);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	assert_eq!(file.get_field("COMMENT").unwrap(), "a".repeat(30));
	file.save(WriteOptions::default()).unwrap();

	assert_eq!(content(&temp), [&AUDIO[..], &v1].concat());

	let file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	assert_eq!(file.get_field("COMMENT").unwrap(), "a".repeat(30));
	let err = file.get_field("TRACK").unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::FieldNotFound(_)));
}

#[test_log::test]
fn create_v1_only() {
	let temp = temp_mp3(&[&AUDIO]);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	file.create(false, None);
	file.add_field("TITLE", "Foo").unwrap();
	file.save(WriteOptions::default()).unwrap();

	let saved = content(&temp);
	assert_eq!(saved.len(), AUDIO.len() + 128);
	assert_eq!(&saved[AUDIO.len()..AUDIO.len() + 3], b"TAG");

	let file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	assert!(file.id3v2().is_none());
	assert_eq!(file.get_field("TITLE").unwrap(), "Foo");
}

#[test_log::test]
fn create_replaces_tags() {
	let (v2, v1) = both_tags();
	let temp = temp_mp3(&[&v2, &AUDIO, &v1]);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	file.create(false, Some(Id3v2Version::V3));
	file.save(no_padding()).unwrap();

	let file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	assert_eq!(file.version(), Some((2, 3, 0)));
	assert!(file.id3v1().is_none());
	assert_eq!(file.get_field("ARTIST").unwrap(), " ");
	assert!(file.get_field("TITLE").is_err());
}

#[test_log::test]
fn v22_saved_as_v23() {
	let v2 = id3v2(2, &[
		v22_frame("TT2", &latin1_text("Foo title")),
		v22_frame("TYE", &latin1_text("1992")),
	]);
	let temp = temp_mp3(&[&v2, &AUDIO]);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	assert_eq!(file.version(), Some((2, 2, 0)));
	assert_eq!(file.get_field("YEAR").unwrap(), "1992");

	file.save(no_padding()).unwrap();
	assert_eq!(file.version(), Some((2, 3, 0)));

	let saved = content(&temp);
	assert_eq!(saved[3], 3);

	let file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	assert_eq!(file.version(), Some((2, 3, 0)));
	assert_eq!(file.get_field("TITLE").unwrap(), "Foo title");
	assert_eq!(file.get_field("YEAR").unwrap(), "1992");
}

#[test_log::test]
fn padding_reused() {
	let temp = temp_mp3(&[&AUDIO]);

	let mut file = Id3File::read(temp.path(), ParseOptions::new()).unwrap();
	file.create(false, Some(Id3v2Version::V4));
	file.save(WriteOptions::new().preferred_padding(512)).unwrap();

	let saved = content(&temp);
	let v2 = locate(&saved).unwrap().v2.unwrap();
	assert!(saved[..v2.end as usize].ends_with(&[0; 512]));
	assert_eq!(&saved[v2.end as usize..], AUDIO);
}

#[test_log::test]
fn undefined_version() {
	let mut v2 = id3v2(4, &[v24_frame("TIT2", &latin1_text("Foo"))]);
	v2[3] = 5;
	let temp = temp_mp3(&[&v2, &AUDIO]);

	let err = Id3File::read(temp.path(), ParseOptions::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::UndefinedVersion(5, 0)));
}

#[test_log::test]
fn tag_larger_than_file() {
	let mut v2 = id3v2(4, &[v24_frame("TIT2", &latin1_text("Foo"))]);
	v2[9] = 0x7F;
	let temp = temp_mp3(&[&v2]);

	let err = Id3File::read(temp.path(), ParseOptions::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::SizeMismatch));
}

#[test_log::test]
fn missing_file() {
	let dir = tempfile::tempdir().unwrap();

	let err = Id3File::read(dir.path().join("missing.mp3"), ParseOptions::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::Io(_)));
}
