
use super::frame::{Frame, FrameKey};
use super::header::{Id3v2TagFlags, Id3v2Version};
use crate::config::WriteOptions;
use crate::error::{FrameDecodeError, Result};
use crate::id3::v2::FrameId;

use std::io::Write;

pub(crate) const ATTACHED_PICTURE_ID: &str = "APIC";

/// An `ID3v2` tag
///
/// ## Versions
///
/// Frames are always held in their `ID3v2.4` form, with `ID3v2.4` IDs. The version the tag
/// was read as is kept in [`Id3v2Tag::original_version`], and decides the version it is
/// written back as.
///
/// ## Frame keys
///
/// Frames are identified by a [`FrameKey`]. Most frames may only appear once per ID, but some
/// (`TXXX`, `WXXX`, `COMM`, `APIC`, `PRIV`) are told apart by their descriptions or contents.
/// See [`Frame::key`].
///
/// ## Decode errors
///
/// Frames that fail to decode are skipped, and recorded in [`Id3v2Tag::decode_errors`].
#[derive(Debug)]
pub struct Id3v2Tag {
	flags: Id3v2TagFlags,
	pub(crate) original_version: Id3v2Version,
	pub(crate) frames: Vec<Frame>,
	pub(crate) decode_errors: Vec<FrameDecodeError>,
}

// Decode errors describe how the tag was read, not its content
impl PartialEq for Id3v2Tag {
	fn eq(&self, other: &Self) -> bool {
		self.flags == other.flags
			&& self.original_version == other.original_version
			&& self.frames == other.frames
	}
}

impl IntoIterator for Id3v2Tag {
	type Item = Frame;
	type IntoIter = std::vec::IntoIter<Self::Item>;

	fn into_iter(self) -> Self::IntoIter {
		self.frames.into_iter()
	}
}

impl<'a> IntoIterator for &'a Id3v2Tag {
	type Item = &'a Frame;
	type IntoIter = std::slice::Iter<'a, Frame>;

	fn into_iter(self) -> Self::IntoIter {
		self.frames.iter()
	}
}

impl Default for Id3v2Tag {
	fn default() -> Self {
		Self::new(Id3v2Version::V4)
	}
}

impl Id3v2Tag {
	/// Create a new empty `Id3v2Tag`
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::id3::v2::{Id3v2Tag, Id3v2Version};
	///
	/// let id3v2_tag = Id3v2Tag::new(Id3v2Version::V3);
	/// assert!(id3v2_tag.is_empty());
	/// assert_eq!(id3v2_tag.original_version(), Id3v2Version::V3);
	/// ```
	pub fn new(version: Id3v2Version) -> Self {
		Self {
			flags: Id3v2TagFlags::default(),
			original_version: version,
			frames: Vec::new(),
			decode_errors: Vec::new(),
		}
	}

	/// Returns the [`Id3v2TagFlags`]
	pub fn flags(&self) -> &Id3v2TagFlags {
		&self.flags
	}

	/// Restrict the tag's flags
	pub fn set_flags(&mut self, flags: Id3v2TagFlags) {
		self.flags = flags
	}

	/// The original version of the tag
	///
	/// This is here, since the tag is upgraded to `ID3v2.4`, but a `v2.2` or `v2.3`
	/// tag may have been read.
	pub fn original_version(&self) -> Id3v2Version {
		self.original_version
	}

	/// The frames that could not be decoded while reading the tag
	pub fn decode_errors(&self) -> &[FrameDecodeError] {
		&self.decode_errors
	}

	/// The number of frames in the tag
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Whether the tag has no frames
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Returns an iterator over the frames
	pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
		self.frames.iter()
	}
}

impl Id3v2Tag {
	/// Gets the first [`Frame`] with an id
	pub fn get(&self, id: &FrameId) -> Option<&Frame> {
		self.frames.iter().find(|f| f.id() == id)
	}

	/// Gets all of the text values for a frame
	///
	/// See [`Frame::text_values`]. `TXXX` frames should be looked up with
	/// [`Id3v2Tag::get_user_text`].
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::TextEncoding;
	/// use shelltag::id3::v2::{Frame, FrameId, Id3v2Tag, TextInformationFrame};
	///
	/// # fn main() -> shelltag::error::Result<()> {
	/// let title_id = FrameId::new("TIT2")?;
	///
	/// let mut tag = Id3v2Tag::default();
	/// tag.insert(Frame::Text(TextInformationFrame::new(
	/// 	title_id.clone(),
	/// 	TextEncoding::UTF8,
	/// 	vec![String::from("Foo"), String::from("Bar")],
	/// )));
	///
	/// assert_eq!(
	/// 	tag.get_texts(&title_id),
	/// 	Some(vec![String::from("Foo"), String::from("Bar")])
	/// );
	/// # Ok(()) }
	/// ```
	pub fn get_texts(&self, id: &FrameId) -> Option<Vec<String>> {
		self.get(id).and_then(Frame::text_values)
	}

	/// Gets the values of a user-defined text frame (`TXXX`) by its description
	pub fn get_user_text(&self, description: &str) -> Option<&[String]> {
		self.frames.iter().find_map(|frame| match frame {
			Frame::UserText(f) if f.description == description => Some(f.values.as_slice()),
			_ => None,
		})
	}

	/// Inserts a [`Frame`]
	///
	/// This will replace any frame with the same [`FrameKey`], keeping its position in the tag.
	/// The replaced frame is returned.
	pub fn insert(&mut self, frame: Frame) -> Option<Frame> {
		let key = frame.key();

		let Some(pos) = self.frames.iter().position(|f| key.matches(f)) else {
			self.frames.push(frame);
			return None;
		};

		let replaced = std::mem::replace(&mut self.frames[pos], frame);

		// There should only ever be one, but tags built by hand may have duplicates
		let mut idx = 0;
		self.frames.retain(|f| {
			let keep = idx <= pos || !key.matches(f);
			idx += 1;
			keep
		});

		Some(replaced)
	}

	/// Removes every [`Frame`] that falls under `key`
	///
	/// The removed frames are returned, in the order they appeared in the tag. This is not an
	/// error if nothing matches, the returned `Vec` will simply be empty.
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::TextEncoding;
	/// use shelltag::id3::v2::{ExtendedTextFrame, Frame, FrameKey, Id3v2Tag};
	///
	/// # fn main() -> shelltag::error::Result<()> {
	/// let mut tag = Id3v2Tag::default();
	/// for description in ["FOO", "BAR"] {
	/// 	tag.insert(Frame::UserText(ExtendedTextFrame::new(
	/// 		TextEncoding::UTF8,
	/// 		String::from(description),
	/// 		vec![String::from("Some value")],
	/// 	)));
	/// }
	///
	/// // Only the "FOO" frame
	/// let removed = tag.remove(&FrameKey::UserText(String::from("FOO")));
	/// assert_eq!(removed.len(), 1);
	///
	/// // Every remaining TXXX frame
	/// let removed = tag.remove(&FrameKey::id("TXXX")?);
	/// assert_eq!(removed.len(), 1);
	/// assert!(tag.is_empty());
	/// # Ok(()) }
	/// ```
	pub fn remove(&mut self, key: &FrameKey) -> Vec<Frame> {
		let (removed, kept) = std::mem::take(&mut self.frames)
			.into_iter()
			.partition(|f| key.matches(f));

		self.frames = kept;
		removed
	}

	/// Returns every [`Frame`] that falls under `key`
	pub fn query<'a>(&'a self, key: &'a FrameKey) -> impl Iterator<Item = &'a Frame> + 'a {
		self.frames.iter().filter(move |f| key.matches(f))
	}

	/// Retains [`Frame`]s by evaluating the predicate
	pub fn retain<P>(&mut self, predicate: P)
	where
		P: FnMut(&Frame) -> bool,
	{
		self.frames.retain(predicate)
	}

	/// Remove all frames
	pub fn clear(&mut self) {
		self.frames.clear();
	}

	/// Encode the tag, header included
	///
	/// The tag is written as its [`original_version`](Id3v2Tag::original_version). Frames are
	/// folded to fit `ID3v2.3` and `ID3v2.2`, see [`downgrade_v23`](crate::id3::v2::downgrade_v23).
	///
	/// # Errors
	///
	/// * A frame could not be encoded
	/// * The tag is too large for its size field
	pub fn dump_to<W: Write>(&self, writer: &mut W, write_options: WriteOptions) -> Result<()> {
		let bytes = super::write::create_tag(self, self.original_version, write_options)?;
		writer.write_all(&bytes)?;

		Ok(())
	}
}
