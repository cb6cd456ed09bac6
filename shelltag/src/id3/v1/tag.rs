use super::constants::{GENRES, UNKNOWN_GENRE};
use crate::config::WriteOptions;
use crate::error::Result;

use std::io::Write;

/// The fixed field sizes of an ID3v1 tag
pub(crate) const TEXT_FIELD_LEN: usize = 30;
/// ID3v1.1 takes the last 2 bytes of the comment for a null byte and the track number
pub(crate) const COMMENT_LEN_V11: usize = 28;

/// The room left for the comment, which depends on whether there is a track number to store
pub(crate) fn comment_len(track_number: Option<u8>) -> usize {
	match track_number {
		Some(track) if track != 0 => COMMENT_LEN_V11,
		_ => TEXT_FIELD_LEN,
	}
}

/// ID3v1 is a severely limited format, with each field
/// being incredibly small in size. All fields have been
/// commented with their maximum sizes and any other additional
/// restrictions.
///
/// Attempting to write a field greater than the maximum size
/// will **not** error, it will just be shrunk. Characters outside of Latin-1 are written as `?`.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Id3v1Tag {
	/// Track title, 30 bytes max
	pub title: Option<String>,
	/// Track artist, 30 bytes max
	pub artist: Option<String>,
	/// Album title, 30 bytes max
	pub album: Option<String>,
	/// Release year (max 9999)
	pub year: Option<u16>,
	/// A short comment
	///
	/// The number of bytes differs between versions, but not much.
	/// A V1 tag has 30 bytes available.
	/// A V1.1 tag, however, only has 28 bytes available, the rest holds the track number.
	///
	/// **shelltag** writes a V1.1 tag when there is a track number, and a V1 tag otherwise.
	pub comment: Option<String>,
	/// The track number, 1 byte max
	///
	/// Issues:
	///
	/// * The track number **cannot** be 0. Many readers
	/// look for a null byte at the end of the comment to differentiate
	/// between V1 and V1.1.
	/// * A V1 tag may have been read, which does *not* have a track number.
	pub track_number: Option<u8>,
	/// The track's genre, 1 byte max
	///
	/// ID3v1 has a predefined set of genres, see [`GENRES`](crate::id3::v1::GENRES).
	/// This byte should be an index to a genre.
	pub genre: Option<u8>,
}

impl Id3v1Tag {
	/// Create a new empty `ID3v1Tag`
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::id3::v1::Id3v1Tag;
	///
	/// let id3v1_tag = Id3v1Tag::new();
	/// assert!(id3v1_tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether every field is empty
	pub fn is_empty(&self) -> bool {
		self.title.is_none()
			&& self.artist.is_none()
			&& self.album.is_none()
			&& self.year.is_none()
			&& self.comment.is_none()
			&& self.track_number.is_none()
			&& self.genre.is_none()
	}

	/// The name of the genre, if it is a valid index into [`GENRES`]
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::id3::v1::Id3v1Tag;
	///
	/// let mut tag = Id3v1Tag::new();
	/// tag.genre = Some(90);
	/// assert_eq!(tag.genre_name(), Some("Avantgarde"));
	///
	/// tag.genre = Some(255);
	/// assert_eq!(tag.genre_name(), None);
	/// ```
	pub fn genre_name(&self) -> Option<&'static str> {
		self.genre.and_then(|g| GENRES.get(usize::from(g)).copied())
	}

	/// Set the genre from its name
	///
	/// The lookup is case-insensitive. Names that don't appear in [`GENRES`] set the genre to
	/// [`UNKNOWN_GENRE`](crate::id3::v1::UNKNOWN_GENRE).
	pub fn set_genre_name(&mut self, genre: &str) {
		self.genre = Some(genre_index(genre));
	}

	/// Encode the tag into its 128 byte form
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and a field is not valid Latin-1
	pub fn dump_to<W: Write>(&self, writer: &mut W, write_options: WriteOptions) -> Result<()> {
		let tag = super::write::encode(self, write_options)?;
		writer.write_all(&tag)?;

		Ok(())
	}
}

/// Find the index of a genre, or [`UNKNOWN_GENRE`]
pub(crate) fn genre_index(genre: &str) -> u8 {
	GENRES
		.iter()
		.position(|g| g.eq_ignore_ascii_case(genre.trim()))
		.and_then(|i| u8::try_from(i).ok())
		.unwrap_or(UNKNOWN_GENRE)
}

/// Read a genre from `ID3v2` text, either a genre name or an index
pub(crate) fn parse_genre(genre: &str) -> u8 {
	let genre = genre.trim();

	// "(17)" and "(17)Rock" are common in ID3v2.3 tags, along with a bare "17"
	let numeric = genre
		.strip_prefix('(')
		.and_then(|rest| rest.split_once(')'))
		.map_or(genre, |(number, _)| number);

	if let Ok(index) = numeric.parse::<u8>() {
		if usize::from(index) < GENRES.len() {
			return index;
		}
	}

	let index = genre_index(genre);
	if index == UNKNOWN_GENRE {
		log::debug!("Genre {genre:?} has no ID3v1 counterpart");
	}

	index
}

/// Shrink a value to fit a fixed size field
///
/// Characters outside of Latin-1 become `?`, and the result is cut at `size` *bytes* of its
/// Latin-1 form.
pub(crate) fn fit_field(value: &str, size: usize) -> String {
	let fitted = value
		.chars()
		.map(|c| if u32::from(c) <= 0xFF { c } else { '?' })
		.take(size)
		.collect::<String>();

	if fitted.chars().count() < value.chars().count() {
		log::warn!("ID3v1: Truncating \"{value}\" to {size} bytes");
	}

	fitted
}

#[cfg(test)]
mod tests {
	use super::{fit_field, genre_index, parse_genre};

	#[test_log::test]
	fn fit_field_counts_latin1_bytes() {
		// 'é' is two bytes in UTF-8, but one in Latin-1
		let value = "é".repeat(40);
		assert_eq!(fit_field(&value, 30), "é".repeat(30));

		assert_eq!(fit_field("Foo ♥ Bar", 30), "Foo ? Bar");
	}

	#[test_log::test]
	fn genre_lookup() {
		assert_eq!(genre_index("Avantgarde"), 90);
		assert_eq!(genre_index("avantgarde"), 90);
		assert_eq!(genre_index("Not a genre"), 255);
	}

	#[test_log::test]
	fn genre_from_text() {
		assert_eq!(parse_genre("(17)Rock"), 17);
		assert_eq!(parse_genre("17"), 17);
		assert_eq!(parse_genre("Avantgarde"), 90);
		assert_eq!(parse_genre("200"), 255);
	}
}
