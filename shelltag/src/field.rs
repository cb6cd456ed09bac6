//! Friendly field names
//!
//! Fields such as `"ARTIST"` or `"YEAR"` are resolved to frames through a static table of
//! [`FieldDescriptor`]s. Names are matched case-insensitively. Names that aren't in the table
//! are stored as `TXXX` frames, with the upper-cased name as the description.

use crate::config::ParsingMode;
use crate::error::Result;
use crate::id3::v2::{
	CommentFrame, ExtendedTextFrame, Frame, FrameId, FrameKey, Id3v2Version, TextInformationFrame,
	Timestamp, TimestampFrame, UrlLinkFrame, fold_values,
};
use crate::macros::err;
use crate::util::text::TextEncoding;

use std::borrow::Cow;

/// The separator for multiple values in a field's text form, `"Foo\Bar"`
pub const FIELD_VALUE_SEPARATOR: char = '\\';

/// The kind of frame a field is stored in
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
	/// A text frame (`T...`)
	Text,
	/// A timestamp frame (`TDRC`, `TDOR`, ...)
	Timestamp,
	/// A URL frame (`W...`), which only holds a single value
	Url,
	/// A `TXXX` frame with a fixed description
	UserText(&'static str),
	/// A `COMM` frame with a fixed language and description
	#[allow(missing_docs)]
	Comment {
		language: [u8; 3],
		description: &'static str,
	},
	/// An `APIC` frame
	///
	/// Pictures carry binary data, they can only be added as frames.
	Picture,
	/// A `PRIV` frame
	///
	/// Like pictures, these can only be added as frames.
	Private,
}

/// Describes how a field maps to a frame
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
	/// The upper-case field name
	pub name: &'static str,
	/// The `ID3v2.4` frame ID
	pub id: &'static str,
	/// The kind of frame
	pub kind: FieldKind,
	/// Whether the field is stored as Latin-1 rather than UTF-8
	///
	/// These are all numeric fields.
	pub latin1_only: bool,
}

macro_rules! fields {
	(@latin1) => { false };
	(@latin1 latin1) => { true };
	(
		$($ident:ident: $name:literal => $id:literal, $kind:expr $(, $latin1:ident)?;)+
	) => {
		paste::paste! {
			$(
				#[doc = "The `" $name "` field, stored in `" $id "`"]
				pub const [<$ident:upper>]: FieldDescriptor = FieldDescriptor {
					name: $name,
					id: $id,
					kind: $kind,
					latin1_only: fields!(@latin1 $($latin1)?),
				};
			)+

			/// Every known field
			pub static FIELDS: &[FieldDescriptor] = &[$([<$ident:upper>]),+];
		}
	};
}

const ENGLISH: [u8; 3] = *b"eng";

fields! {
	// Timestamps
	encoding_time: "ENCODINGTIME" => "TDEN", FieldKind::Timestamp;
	orig_year: "ORIGYEAR" => "TDOR", FieldKind::Timestamp;
	year: "YEAR" => "TDRC", FieldKind::Timestamp;
	release_time: "RELEASETIME" => "TDRL", FieldKind::Timestamp;
	tagging_time: "TAGGINGTIME" => "TDTG", FieldKind::Timestamp;

	// URLs
	www_commercial_info: "WWWCOMMERCIALINFO" => "WCOM", FieldKind::Url;
	www_copyright: "WWWCOPYRIGHT" => "WCOP", FieldKind::Url;
	www_audio_file: "WWWAUDIOFILE" => "WOAF", FieldKind::Url;
	www_artist: "WWWARTIST" => "WOAR", FieldKind::Url;
	www_audio_source: "WWWAUDIOSOURCE" => "WOAS", FieldKind::Url;
	www_radio_page: "WWWRADIOPAGE" => "WORS", FieldKind::Url;
	www_payment: "WWWPAYMENT" => "WPAY", FieldKind::Url;
	www_publisher: "WWWPUBLISHER" => "WPUB", FieldKind::Url;

	// Text
	album: "ALBUM" => "TALB", FieldKind::Text;
	bpm: "BPM" => "TBPM", FieldKind::Text, latin1;
	composer: "COMPOSER" => "TCOM", FieldKind::Text;
	genre: "GENRE" => "TCON", FieldKind::Text;
	copyright: "COPYRIGHT" => "TCOP", FieldKind::Text;
	encoded_by: "ENCODEDBY" => "TENC", FieldKind::Text;
	lyricist: "LYRICIST" => "TEXT", FieldKind::Text;
	file_type: "FILETYPE" => "TFLT", FieldKind::Text;
	involved_people: "INVOLVEDPEOPLE" => "TIPL", FieldKind::Text;
	content_group: "CONTENTGROUP" => "TIT1", FieldKind::Text;
	title: "TITLE" => "TIT2", FieldKind::Text;
	subtitle: "SUBTITLE" => "TIT3", FieldKind::Text;
	initial_key: "INITIALKEY" => "TKEY", FieldKind::Text;
	language: "LANGUAGE" => "TLAN", FieldKind::Text;
	length: "LENGTH" => "TLEN", FieldKind::Text, latin1;
	musician_credits: "MUSICIANCREDITS" => "TMCL", FieldKind::Text;
	media_type: "MEDIATYPE" => "TMED", FieldKind::Text;
	mood: "MOOD" => "TMOO", FieldKind::Text;
	orig_album: "ORIGALBUM" => "TOAL", FieldKind::Text;
	orig_filename: "ORIGFILENAME" => "TOFN", FieldKind::Text;
	orig_lyricist: "ORIGLYRICIST" => "TOLY", FieldKind::Text;
	orig_artist: "ORIGARTIST" => "TOPE", FieldKind::Text;
	file_owner: "FILEOWNER" => "TOWN", FieldKind::Text;
	artist: "ARTIST" => "TPE1", FieldKind::Text;
	band: "BAND" => "TPE2", FieldKind::Text;
	conductor: "CONDUCTOR" => "TPE3", FieldKind::Text;
	mix_artist: "MIXARTIST" => "TPE4", FieldKind::Text;
	disc_number: "DISCNUMBER" => "TPOS", FieldKind::Text, latin1;
	publisher: "PUBLISHER" => "TPUB", FieldKind::Text;
	track: "TRACK" => "TRCK", FieldKind::Text, latin1;
	net_radio_station: "NETRADIOSTATION" => "TRSN", FieldKind::Text;
	net_radio_owner: "NETRADIOOWNER" => "TRSO", FieldKind::Text;
	band_sort_order: "BANDSORTORDER" => "TSO2", FieldKind::Text;
	album_sort_order: "ALBUMSORTORDER" => "TSOA", FieldKind::Text;
	composer_sort_order: "COMPOSERSORTORDER" => "TSOC", FieldKind::Text;
	artist_sort_order: "ARTISTSORTORDER" => "TSOP", FieldKind::Text;
	title_sort_order: "TITLESORTORDER" => "TSOT", FieldKind::Text;
	isrc: "ISRC" => "TSRC", FieldKind::Text;
	encoder_settings: "ENCODERSETTINGS" => "TSSE", FieldKind::Text;
	set_subtitle: "SETSUBTITLE" => "TSST", FieldKind::Text;

	// User defined
	album_artist: "ALBUM ARTIST" => "TXXX", FieldKind::UserText("ALBUM ARTIST");
	performer: "PERFORMER" => "TXXX", FieldKind::UserText("PERFORMER");
	replaygain_album_gain: "REPLAYGAIN_ALBUM_GAIN" => "TXXX", FieldKind::UserText("replaygain_album_gain");
	replaygain_album_peak: "REPLAYGAIN_ALBUM_PEAK" => "TXXX", FieldKind::UserText("replaygain_album_peak");
	replaygain_track_gain: "REPLAYGAIN_TRACK_GAIN" => "TXXX", FieldKind::UserText("replaygain_track_gain");
	replaygain_track_peak: "REPLAYGAIN_TRACK_PEAK" => "TXXX", FieldKind::UserText("replaygain_track_peak");
	custom: "CUSTOM" => "TXXX", FieldKind::UserText("");

	comment: "COMMENT" => "COMM", FieldKind::Comment { language: ENGLISH, description: "" };
	picture: "PICTURE" => "APIC", FieldKind::Picture;
	private: "PRIVATE" => "PRIV", FieldKind::Private;
}

/// The only fields an `ID3v1` tag can hold
pub const V1_FIELDS: [&str; 7] = ["TITLE", "ARTIST", "ALBUM", "YEAR", "COMMENT", "TRACK", "GENRE"];

/// Find the [`FieldDescriptor`] for a name, ignoring case
///
/// # Examples
///
/// ```rust
/// use shelltag::field::{self, FieldKind};
///
/// let year = field::lookup("year").unwrap();
/// assert_eq!(year.id, "TDRC");
/// assert_eq!(year.kind, FieldKind::Timestamp);
///
/// assert!(field::lookup("NOT A FIELD").is_none());
/// ```
pub fn lookup(name: &str) -> Option<&'static FieldDescriptor> {
	let name = name.trim();
	FIELDS.iter().find(|field| field.name.eq_ignore_ascii_case(name))
}

/// Whether `name` is one of the [`V1_FIELDS`]
pub fn is_v1_field(name: &str) -> bool {
	let name = name.trim();
	V1_FIELDS.iter().any(|field| field.eq_ignore_ascii_case(name))
}

impl FieldDescriptor {
	/// The frame ID for the field
	pub fn frame_id(&self) -> FrameId {
		FrameId::Valid(Cow::Borrowed(self.id))
	}

	/// The key of the frame(s) holding the field
	pub fn key(&self) -> FrameKey {
		match self.kind {
			FieldKind::UserText(description) => FrameKey::UserText(description.to_owned()),
			FieldKind::Comment {
				language,
				description,
			} => FrameKey::Comment {
				language,
				description: description.to_owned(),
			},
			_ => FrameKey::Id(self.frame_id()),
		}
	}

	/// The encoding new frames are created with
	pub fn encoding(&self) -> TextEncoding {
		if self.latin1_only {
			TextEncoding::Latin1
		} else {
			TextEncoding::UTF8
		}
	}

	/// Build the frame for a field's text form
	///
	/// `value` is split on [`FIELD_VALUE_SEPARATOR`]. Tags older than `ID3v2.4` only hold a
	/// single value per frame, so the values are joined (or, for timestamps, only the first is
	/// kept).
	pub(crate) fn build_frame(&self, value: &str, version: Id3v2Version) -> Result<Frame> {
		let values = value
			.split(FIELD_VALUE_SEPARATOR)
			.map(str::to_owned)
			.collect::<Vec<_>>();
		let values = match version {
			Id3v2Version::V4 => values,
			Id3v2Version::V2 | Id3v2Version::V3 => fold_values(self.id, &values),
		};

		let frame = match self.kind {
			FieldKind::Text => Frame::Text(TextInformationFrame::new(
				self.frame_id(),
				self.encoding(),
				values,
			)),
			// Only the text form of the first value survives a fold
			FieldKind::Timestamp => {
				let mut timestamps = Vec::new();
				for value in value.split(FIELD_VALUE_SEPARATOR) {
					if let Some(timestamp) = Timestamp::parse(value, ParsingMode::BestAttempt)? {
						timestamps.push(timestamp);
					}
				}

				if version != Id3v2Version::V4 && timestamps.len() > 1 {
					log::warn!(
						"{}: ID3v2.{} only supports a single timestamp, discarding {} value(s)",
						self.name,
						version.major(),
						timestamps.len() - 1
					);
					timestamps.truncate(1);
				}

				Frame::Timestamp(TimestampFrame::new(
					self.frame_id(),
					TextEncoding::Latin1,
					timestamps,
				))
			},
			FieldKind::Url => Frame::Url(UrlLinkFrame::new(self.frame_id(), value)),
			FieldKind::UserText(description) => Frame::UserText(ExtendedTextFrame::new(
				self.encoding(),
				description.to_owned(),
				values,
			)),
			FieldKind::Comment {
				language,
				description,
			} => Frame::Comment(CommentFrame::new(
				self.encoding(),
				language,
				description.to_owned(),
				values,
			)),
			FieldKind::Picture | FieldKind::Private => {
				err!(InvalidFrame(format!(
					"{} holds binary data and can't be set from text",
					self.name
				)))
			},
		};

		Ok(frame)
	}
}

/// Build the `TXXX` frame for a name that isn't in [`FIELDS`]
pub(crate) fn custom_frame(name: &str, value: &str, version: Id3v2Version) -> Frame {
	let values = value
		.split(FIELD_VALUE_SEPARATOR)
		.map(str::to_owned)
		.collect::<Vec<_>>();
	let values = match version {
		Id3v2Version::V4 => values,
		Id3v2Version::V2 | Id3v2Version::V3 => fold_values("TXXX", &values),
	};

	Frame::UserText(ExtendedTextFrame::new(
		TextEncoding::UTF8,
		custom_description(name),
		values,
	))
}

/// The `TXXX` description used for a name that isn't in [`FIELDS`]
pub(crate) fn custom_description(name: &str) -> String {
	name.trim().to_uppercase()
}
