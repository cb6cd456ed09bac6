//! Conversions between tag versions
//!
//! Frames are always held in their `ID3v2.4` form. Older versions can only hold a single value
//! per frame, and lack some frames entirely, so writing them is lossy.

use super::frame::Frame;
use super::items::{TextInformationFrame, Timestamp, TimestampFrame};
use super::tag::Id3v2Tag;
use super::FrameId;
use crate::id3::v1::tag::{TEXT_FIELD_LEN, comment_len, fit_field, parse_genre};
use crate::id3::v1::Id3v1Tag;

use std::borrow::Cow;

/// The separator used to fold multiple values into one for `ID3v2.3`
pub const V23_MULTI_VALUE_SEPARATOR: &str = "/";

// These are all frames from ID3v2.4
const FRAMES_TO_DISCARD: &[&str] = &[
	"ASPI", "EQU2", "RVA2", "SEEK", "SIGN", "TDEN", "TDRL", "TDTG", "TMOO", "TPRO", "TSOA", "TSOP",
	"TSOT", "TSST",
];

const RECORDING_TIME_ID: FrameId = FrameId::Valid(Cow::Borrowed("TDRC"));
const YEAR_ID: FrameId = FrameId::Valid(Cow::Borrowed("TYER"));
const DATE_ID: FrameId = FrameId::Valid(Cow::Borrowed("TDAT"));
const TIME_ID: FrameId = FrameId::Valid(Cow::Borrowed("TIME"));
const ORIGINAL_YEAR_ID: FrameId = FrameId::Valid(Cow::Borrowed("TORY"));
const INVOLVED_PEOPLE_ID: FrameId = FrameId::Valid(Cow::Borrowed("IPLS"));

const TITLE_ID: FrameId = FrameId::Valid(Cow::Borrowed("TIT2"));
const ARTIST_ID: FrameId = FrameId::Valid(Cow::Borrowed("TPE1"));
const ALBUM_ID: FrameId = FrameId::Valid(Cow::Borrowed("TALB"));
const TRACK_ID: FrameId = FrameId::Valid(Cow::Borrowed("TRCK"));
const GENRE_ID: FrameId = FrameId::Valid(Cow::Borrowed("TCON"));

/// Fold a tag's frames into their `ID3v2.3` form
///
/// * Frames that only exist in `ID3v2.4` are discarded
/// * Text, `TXXX`, and `COMM` frames with multiple values have them joined with `"/"`
/// * Timestamp frames keep only their first value. `TDRC` is split into `TYER`, `TDAT`, and
///   `TIME`, and `TDOR` becomes `TORY`
/// * `TIPL` and `TMCL` are merged into a single `IPLS` frame
///
/// This never fails, anything that can't be represented is dropped with a warning. The same
/// frames are used for `ID3v2.2`, with their IDs mapped when written.
///
/// # Examples
///
/// ```rust
/// use shelltag::TextEncoding;
/// use shelltag::id3::v2::{Frame, FrameId, Id3v2Tag, TextInformationFrame, downgrade_v23};
///
/// # fn main() -> shelltag::error::Result<()> {
/// let mut tag = Id3v2Tag::default();
/// tag.insert(Frame::Text(TextInformationFrame::new(
/// 	FrameId::new("TPE1")?,
/// 	TextEncoding::UTF8,
/// 	vec![String::from("Foo"), String::from("Bar")],
/// )));
///
/// let frames = downgrade_v23(&tag);
/// assert_eq!(frames[0].text_values(), Some(vec![String::from("Foo/Bar")]));
/// # Ok(()) }
/// ```
pub fn downgrade_v23(tag: &Id3v2Tag) -> Vec<Frame> {
	let mut frames = Vec::with_capacity(tag.len());
	let mut ipls: Option<TextInformationFrame> = None;

	for frame in tag {
		let id = frame.id_str();
		if FRAMES_TO_DISCARD.contains(&id) {
			log::warn!("Discarding frame: {id}, not supported in ID3v2.3");
			continue;
		}

		match frame {
			Frame::Timestamp(f) => downgrade_timestamp(f, &mut frames),
			// TIPL (Involved people list) and TMCL (Musician credits list) are
			// both key-value pairs. ID3v2.3 does not distinguish between the two,
			// so we must merge them into a single IPLS frame.
			Frame::Text(f) if id == "TIPL" || id == "TMCL" => match &mut ipls {
				Some(ipls) => ipls.values.extend(f.values.iter().cloned()),
				None => {
					let mut f = f.clone();
					f.header.id = INVOLVED_PEOPLE_ID;
					ipls = Some(f);
				},
			},
			Frame::Text(f) => {
				let mut f = f.clone();
				f.values = fold_values(id, &f.values);
				frames.push(Frame::Text(f));
			},
			Frame::UserText(f) => {
				let mut f = f.clone();
				f.values = fold_values(id, &f.values);
				frames.push(Frame::UserText(f));
			},
			Frame::Comment(f) => {
				let mut f = f.clone();
				f.values = fold_values(id, &f.values);
				frames.push(Frame::Comment(f));
			},
			_ => frames.push(frame.clone()),
		}
	}

	if let Some(ipls) = ipls {
		frames.push(Frame::Text(ipls));
	}

	frames
}

pub(crate) fn fold_values(id: &str, values: &[String]) -> Vec<String> {
	if values.len() < 2 {
		return values.to_vec();
	}

	log::debug!("{id}: Joining {} values for ID3v2.3", values.len());
	vec![values.join(V23_MULTI_VALUE_SEPARATOR)]
}

fn downgrade_timestamp(frame: &TimestampFrame, out: &mut Vec<Frame>) {
	let id = frame.id().as_str();

	let Some(timestamp) = frame.timestamps.first() else {
		// A cleared date stays present, with no value
		let year_id = match id {
			"TDOR" => ORIGINAL_YEAR_ID,
			"TDRC" => YEAR_ID,
			_ => {
				log::warn!("Discarding frame: {id}, not supported in ID3v2.3");
				return;
			},
		};

		let mut text = TextInformationFrame::new(year_id, frame.encoding, Vec::new());
		text.header.flags = frame.header.flags;
		out.push(Frame::Text(text));
		return;
	};

	if frame.timestamps.len() > 1 {
		log::warn!(
			"{id}: ID3v2.3 only supports a single timestamp, discarding {} value(s)",
			frame.timestamps.len() - 1
		);
	}

	if timestamp.verify().is_err() {
		log::warn!("Discarding frame: {id}, invalid timestamp");
		return;
	}

	let mut push_text = |id: FrameId, value: String| {
		let mut text = TextInformationFrame::new(id, frame.encoding, vec![value]);
		text.header.flags = frame.header.flags;
		out.push(Frame::Text(text));
	};

	match id {
		// TORY (Original release year) is the only component of TDOR
		// that is supported in ID3v2.3
		"TDOR" => push_text(ORIGINAL_YEAR_ID, format!("{:04}", timestamp.year)),
		// TDRC (Recording time) gets split into three frames: TYER, TDAT, and TIME
		"TDRC" => {
			push_text(YEAR_ID, format!("{:04}", timestamp.year));

			if let (Some(month), Some(day)) = (timestamp.month, timestamp.day) {
				push_text(DATE_ID, format!("{day:02}{month:02}"));

				if let (Some(hour), Some(minute)) = (timestamp.hour, timestamp.minute) {
					push_text(TIME_ID, format!("{hour:02}{minute:02}"));
				}
			}
		},
		_ => log::warn!("Discarding frame: {id}, not supported in ID3v2.3"),
	}
}

/// Merge the `TDAT` and `TIME` frames of an `ID3v2.2`/`ID3v2.3` tag into `TDRC`
///
/// By this point `TYER` was already upgraded to a year-only `TDRC`. `TDAT` ("DDMM") and
/// `TIME` ("HHMM") are only merged if they are well formed, otherwise they are left as-is.
pub(crate) fn merge_v23_dates(tag: &mut Id3v2Tag) {
	let Some(Frame::Timestamp(recording_time)) = tag.get(&RECORDING_TIME_ID) else {
		return;
	};

	let Some(year_only) = recording_time
		.timestamps
		.first()
		.filter(|t| t.month.is_none())
		.copied()
	else {
		return;
	};

	let Some((day, month)) = two_part_value(tag, &DATE_ID) else {
		return;
	};

	let mut merged = Timestamp {
		month: Some(month),
		day: Some(day),
		..year_only
	};

	let time = two_part_value(tag, &TIME_ID);
	if let Some((hour, minute)) = time {
		merged.hour = Some(hour);
		merged.minute = Some(minute);
	}

	if merged.verify().is_err() {
		log::warn!("TDAT/TIME frames contain an invalid date, keeping them separate");
		return;
	}

	log::debug!("Merging TDAT/TIME frames into TDRC: {merged}");

	for frame in &mut tag.frames {
		if let Frame::Timestamp(f) = frame {
			if f.header.id == RECORDING_TIME_ID {
				if let Some(first) = f.timestamps.first_mut() {
					*first = merged;
				}
				break;
			}
		}
	}

	tag.frames
		.retain(|f| f.id() != &DATE_ID && (time.is_none() || f.id() != &TIME_ID));
}

// Reads "DDMM" and "HHMM" style values
fn two_part_value(tag: &Id3v2Tag, id: &FrameId) -> Option<(u8, u8)> {
	let Some(Frame::Text(frame)) = tag.get(id) else {
		return None;
	};

	let value = frame.values.first()?.trim();
	if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
		log::warn!("{id}: Expected 4 digits, found {value:?}");
		return None;
	}

	let first = value[..2].parse().ok()?;
	let second = value[2..].parse().ok()?;
	Some((first, second))
}

/// Build an `ID3v1` tag from the content of an `ID3v2` tag
///
/// * The title, artist, and album come from `TIT2`, `TPE1`, and `TALB`
/// * The year comes from `TDRC`
/// * The comment is the first `COMM` frame without a description, or the first `COMM` frame
/// * The track number is the leading number of `TRCK` ("3/12" is track 3)
/// * The genre is looked up by name in [`GENRES`](crate::id3::v1::GENRES), falling back to
///   [`UNKNOWN_GENRE`](crate::id3::v1::UNKNOWN_GENRE). Numeric genres such as "(17)" are understood
///   as well.
///
/// Fields are shrunk to fit, see [`Id3v1Tag`].
///
/// # Examples
///
/// ```rust
/// use shelltag::TextEncoding;
/// use shelltag::id3::v2::{Frame, FrameId, Id3v2Tag, TextInformationFrame, derive_v1};
///
/// # fn main() -> shelltag::error::Result<()> {
/// let mut tag = Id3v2Tag::default();
/// tag.insert(Frame::Text(TextInformationFrame::new(
/// 	FrameId::new("TCON")?,
/// 	TextEncoding::UTF8,
/// 	vec![String::from("Hard Rock")],
/// )));
///
/// let v1 = derive_v1(&tag);
/// assert_eq!(v1.genre, Some(79));
/// # Ok(()) }
/// ```
pub fn derive_v1(tag: &Id3v2Tag) -> Id3v1Tag {
	let text = |id: &FrameId, size: usize| {
		let value = tag.get_texts(id)?.join(V23_MULTI_VALUE_SEPARATOR);
		(!value.is_empty()).then(|| fit_field(&value, size))
	};

	let year = tag.iter().find_map(|frame| match frame {
		Frame::Timestamp(f) if f.header.id == RECORDING_TIME_ID => {
			f.timestamps.first().map(|t| t.year).filter(|y| *y <= 9999)
		},
		_ => None,
	});

	let track_number = tag.get_texts(&TRACK_ID).and_then(|values| {
		let value = values.first()?;
		let number = value.split('/').next()?.trim();
		number.parse::<u8>().ok().filter(|n| *n != 0)
	});

	let comments = tag.iter().filter_map(|frame| match frame {
		Frame::Comment(f) => Some(f),
		_ => None,
	});
	let comment = comments
		.clone()
		.find(|f| f.description.is_empty())
		.or_else(|| comments.clone().next())
		.map(|f| f.values.join(V23_MULTI_VALUE_SEPARATOR))
		.filter(|value| !value.is_empty())
		.map(|value| fit_field(&value, comment_len(track_number)));

	let genre = tag
		.get_texts(&GENRE_ID)
		.and_then(|values| values.first().map(|genre| parse_genre(genre)));

	Id3v1Tag {
		title: text(&TITLE_ID, TEXT_FIELD_LEN),
		artist: text(&ARTIST_ID, TEXT_FIELD_LEN),
		album: text(&ALBUM_ID, TEXT_FIELD_LEN),
		year,
		comment,
		track_number,
		genre,
	}
}

#[cfg(test)]
mod tests {
	use super::{derive_v1, downgrade_v23, merge_v23_dates};
	use crate::id3::v1::UNKNOWN_GENRE;
	use crate::id3::v2::{
		CommentFrame, ExtendedTextFrame, Frame, FrameId, Id3v2Tag, Id3v2Version,
		TextInformationFrame, Timestamp, TimestampFrame,
	};
	use crate::util::text::TextEncoding;

	fn text(id: &'static str, values: &[&str]) -> Frame {
		Frame::Text(TextInformationFrame::new(
			FrameId::new(id).unwrap(),
			TextEncoding::UTF8,
			values.iter().map(|v| (*v).to_owned()).collect(),
		))
	}

	fn timestamps(id: &'static str, timestamps: Vec<Timestamp>) -> Frame {
		Frame::Timestamp(TimestampFrame::new(
			FrameId::new(id).unwrap(),
			TextEncoding::UTF8,
			timestamps,
		))
	}

	fn ids(frames: &[Frame]) -> Vec<&str> {
		frames.iter().map(Frame::id_str).collect()
	}

	#[test_log::test]
	fn multiple_values_are_joined() {
		let mut tag = Id3v2Tag::default();
		tag.insert(text("TPE1", &["Foo", "Bar"]));
		tag.insert(Frame::UserText(ExtendedTextFrame::new(
			TextEncoding::UTF8,
			String::from("FOO"),
			vec![String::from("a"), String::from("b")],
		)));
		tag.insert(Frame::Comment(CommentFrame::new(
			TextEncoding::UTF8,
			*b"eng",
			String::new(),
			vec![String::from("c"), String::from("d")],
		)));

		let frames = downgrade_v23(&tag);
		assert_eq!(frames[0].text_values(), Some(vec![String::from("Foo/Bar")]));
		assert_eq!(frames[1].text_values(), Some(vec![String::from("a/b")]));
		assert_eq!(frames[2].text_values(), Some(vec![String::from("c/d")]));
	}

	#[test_log::test]
	fn v24_only_frames_discarded() {
		let mut tag = Id3v2Tag::default();
		tag.insert(text("TIT2", &["Foo"]));
		tag.insert(text("TMOO", &["Calm"]));
		tag.insert(timestamps("TDRL", vec![Timestamp::from_year(2000)]));
		tag.insert(text("TSOP", &["Bar"]));

		assert_eq!(ids(&downgrade_v23(&tag)), ["TIT2"]);
	}

	#[test_log::test]
	fn recording_time_split() {
		let mut tag = Id3v2Tag::default();
		tag.insert(timestamps(
			"TDRC",
			vec![
				Timestamp {
					year: 1992,
					month: Some(5),
					day: Some(3),
					hour: Some(14),
					minute: Some(20),
					second: Some(1),
				},
				Timestamp::from_year(2000),
			],
		));
		tag.insert(timestamps("TDOR", vec![Timestamp::from_year(1990)]));

		let frames = downgrade_v23(&tag);
		assert_eq!(ids(&frames), ["TYER", "TDAT", "TIME", "TORY"]);
		assert_eq!(frames[0].text_values(), Some(vec![String::from("1992")]));
		assert_eq!(frames[1].text_values(), Some(vec![String::from("0305")]));
		assert_eq!(frames[2].text_values(), Some(vec![String::from("1420")]));
		assert_eq!(frames[3].text_values(), Some(vec![String::from("1990")]));
	}

	#[test_log::test]
	fn empty_dates_kept() {
		let mut tag = Id3v2Tag::default();
		tag.insert(timestamps("TDRC", Vec::new()));
		tag.insert(timestamps("TDOR", Vec::new()));

		let frames = downgrade_v23(&tag);
		assert_eq!(ids(&frames), ["TYER", "TORY"]);
		assert!(frames.iter().all(|f| f.text_values() == Some(Vec::new())));
	}

	#[test_log::test]
	fn year_only_recording_time() {
		let mut tag = Id3v2Tag::default();
		tag.insert(timestamps("TDRC", vec![Timestamp::from_year(1992)]));

		assert_eq!(ids(&downgrade_v23(&tag)), ["TYER"]);
	}

	#[test_log::test]
	fn involved_people_merged() {
		let mut tag = Id3v2Tag::default();
		tag.insert(text("TIPL", &["producer", "Foo"]));
		tag.insert(text("TIT2", &["Title"]));
		tag.insert(text("TMCL", &["guitar", "Bar"]));

		let frames = downgrade_v23(&tag);
		assert_eq!(ids(&frames), ["TIT2", "IPLS"]);
		assert_eq!(
			frames[1].text_values(),
			Some(vec![
				String::from("producer"),
				String::from("Foo"),
				String::from("guitar"),
				String::from("Bar"),
			])
		);
	}

	#[test_log::test]
	fn dates_merged() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V3);
		tag.insert(timestamps("TDRC", vec![Timestamp::from_year(1992)]));
		tag.insert(text("TDAT", &["0305"]));
		tag.insert(text("TIME", &["1420"]));

		merge_v23_dates(&mut tag);

		assert_eq!(tag.len(), 1);
		assert_eq!(
			tag.get_texts(&FrameId::new("TDRC").unwrap()),
			Some(vec![String::from("1992-05-03T14:20")])
		);
	}

	#[test_log::test]
	fn bad_date_not_merged() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V3);
		tag.insert(timestamps("TDRC", vec![Timestamp::from_year(1992)]));
		tag.insert(text("TDAT", &["3405"]));

		merge_v23_dates(&mut tag);

		assert_eq!(tag.len(), 2);
		assert_eq!(
			tag.get_texts(&FrameId::new("TDRC").unwrap()),
			Some(vec![String::from("1992")])
		);
	}

	#[test_log::test]
	fn v1_from_v2() {
		let mut tag = Id3v2Tag::default();
		tag.insert(text("TIT2", &["A title that is far too long to fit in ID3v1"]));
		tag.insert(text("TPE1", &["Foo", "Bar"]));
		tag.insert(text("TRCK", &["3/12"]));
		tag.insert(text("TCON", &["(17)"]));
		tag.insert(timestamps("TDRC", vec![Timestamp::from_year(1992)]));
		tag.insert(Frame::Comment(CommentFrame::new(
			TextEncoding::UTF8,
			*b"eng",
			String::from("Other"),
			vec![String::from("Not this one")],
		)));
		tag.insert(Frame::Comment(CommentFrame::new(
			TextEncoding::UTF8,
			*b"eng",
			String::new(),
			vec![String::from("This one")],
		)));

		let v1 = derive_v1(&tag);
		assert_eq!(v1.title.as_deref(), Some("A title that is far too long t"));
		assert_eq!(v1.artist.as_deref(), Some("Foo/Bar"));
		assert_eq!(v1.album, None);
		assert_eq!(v1.year, Some(1992));
		assert_eq!(v1.comment.as_deref(), Some("This one"));
		assert_eq!(v1.track_number, Some(3));
		assert_eq!(v1.genre, Some(17));
	}

	#[test_log::test]
	fn v1_comment_length() {
		let comment = |value: String| {
			Frame::Comment(CommentFrame::new(
				TextEncoding::UTF8,
				*b"eng",
				String::new(),
				vec![value],
			))
		};

		let mut tag = Id3v2Tag::default();
		tag.insert(comment("b".repeat(40)));
		assert_eq!(derive_v1(&tag).comment, Some("b".repeat(30)));

		tag.insert(text("TRCK", &["5"]));
		assert_eq!(derive_v1(&tag).comment, Some("b".repeat(28)));
	}

	#[test_log::test]
	fn v1_unknown_genre() {
		let mut tag = Id3v2Tag::default();
		tag.insert(text("TCON", &["Not a genre"]));
		tag.insert(text("TRCK", &["0"]));

		let v1 = derive_v1(&tag);
		assert_eq!(v1.genre, Some(UNKNOWN_GENRE));
		assert_eq!(v1.track_number, None);
	}
}
