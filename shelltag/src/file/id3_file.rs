use crate::config::{ParseOptions, ParsingMode, WriteOptions};
use crate::error::{ErrorKind, Result, ShelltagError};
use crate::field::{self, FIELD_VALUE_SEPARATOR, FieldKind};
use crate::id3::v1::Id3v1Tag;
use crate::id3::v1::tag::{TEXT_FIELD_LEN, comment_len, fit_field, parse_genre};
use crate::id3::v2::{
	Frame, FrameKey, Id3v2Tag, Id3v2Version, TextInformationFrame, Timestamp,
	V23_MULTI_VALUE_SEPARATOR, derive_v1,
};
use crate::id3::{TagLocations, locate, locate_in, read_tags};
use crate::macros::err;
use crate::util::text::TextEncoding;

use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The result of [`Id3File::remove_field`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
	/// This many frames (or `ID3v1` fields) were removed
	Removed(usize),
	/// The field wasn't set
	NothingRemoved,
}

impl RemoveOutcome {
	fn from_count(count: usize) -> Self {
		match count {
			0 => Self::NothingRemoved,
			n => Self::Removed(n),
		}
	}
}

/// An MP3 file and its ID3 tags
///
/// The tags are read into memory by [`Id3File::read`], and nothing touches the file again until
/// [`Id3File::save`].
///
/// A file may carry an `ID3v2` tag, an `ID3v1` tag, both, or neither. When both are present,
/// the `ID3v2` tag is the one that gets edited, and the `ID3v1` tag is rebuilt from it on save.
///
/// # Examples
///
/// ```rust,no_run
/// use shelltag::config::{ParseOptions, WriteOptions};
/// use shelltag::file::Id3File;
///
/// # fn main() -> shelltag::error::Result<()> {
/// let mut file = Id3File::read("song.mp3", ParseOptions::new())?;
///
/// file.add_field("ARTIST", "Foo\\Bar")?;
/// assert_eq!(file.get_field("artist")?, "Foo\\Bar");
///
/// file.save(WriteOptions::default())?;
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct Id3File {
	path: PathBuf,
	id3v2: Option<Id3v2Tag>,
	id3v1: Option<Id3v1Tag>,
	// Where the tags were the last time the file was read or written
	on_disk: TagLocations,
}

impl Id3File {
	/// Read the tags of the file at `path`
	///
	/// A file without tags is not an error, see [`Id3File::has_tag`] and [`Id3File::read_strict`].
	///
	/// # Errors
	///
	/// * The file could not be opened or read
	/// * The `ID3v2` header is invalid, or reports an unsupported version
	/// * The `ID3v2` tag claims to be larger than the file
	pub fn read<P>(path: P, parse_options: ParseOptions) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();
		log::debug!("Reading tags from {}", path.display());

		let mut file = File::open(path)?;
		let on_disk = locate_in(&mut file)?;
		let (id3v2, id3v1) = read_tags(&mut file, &on_disk, parse_options)?;

		Ok(Self {
			path: path.to_path_buf(),
			id3v2,
			id3v1,
			on_disk,
		})
	}

	/// Same as [`Id3File::read`], but a file without tags is an error
	///
	/// # Errors
	///
	/// * See [`Id3File::read`]
	/// * The file has neither an `ID3v1` nor an `ID3v2` tag (`ErrorKind::NoTag`)
	pub fn read_strict<P>(path: P, parse_options: ParseOptions) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let file = Self::read(path, parse_options)?;
		if !file.has_tag() {
			err!(NoTag);
		}

		Ok(file)
	}

	/// The path the file was read from, and will be saved to
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Whether the file has an `ID3v1` or `ID3v2` tag
	pub fn has_tag(&self) -> bool {
		self.id3v2.is_some() || self.id3v1.is_some()
	}

	/// The `ID3v2` tag, if there is one
	pub fn id3v2(&self) -> Option<&Id3v2Tag> {
		self.id3v2.as_ref()
	}

	/// A mutable reference to the `ID3v2` tag, if there is one
	pub fn id3v2_mut(&mut self) -> Option<&mut Id3v2Tag> {
		self.id3v2.as_mut()
	}

	/// The `ID3v1` tag, if there is one
	///
	/// NOTE: With an `ID3v2` tag present, this is replaced on save. See [`Id3File::save`].
	pub fn id3v1(&self) -> Option<&Id3v1Tag> {
		self.id3v1.as_ref()
	}

	/// A mutable reference to the `ID3v1` tag, if there is one
	pub fn id3v1_mut(&mut self) -> Option<&mut Id3v1Tag> {
		self.id3v1.as_mut()
	}

	/// Where the tags were found on disk
	///
	/// This reflects the file after the last read or save, not the tags in memory.
	pub fn tag_locations(&self) -> &TagLocations {
		&self.on_disk
	}

	/// The version of the tag as a `(major, minor, revision)` tuple
	///
	/// This is the `ID3v2` version if there is an `ID3v2` tag, `(1, 1, 0)` for a lone `ID3v1`
	/// tag, and `None` with no tags.
	pub fn version(&self) -> Option<(u8, u8, u8)> {
		match (&self.id3v2, &self.id3v1) {
			(Some(id3v2), _) => Some(id3v2.original_version().as_tuple()),
			(None, Some(_)) => Some((1, 1, 0)),
			(None, None) => None,
		}
	}

	/// Replace the tags with blank ones
	///
	/// The new tags hold an artist of `" "`, so they are never empty (and stripped) on save.
	/// `v2 = None` means an `ID3v1` tag only, regardless of `v1`.
	///
	/// Nothing is written until [`Id3File::save`], the old tags are stripped from the file then.
	pub fn create(&mut self, v1: bool, v2: Option<Id3v2Version>) {
		const BLANK_ARTIST: &str = " ";

		self.id3v2 = v2.map(|version| {
			let mut tag = Id3v2Tag::new(version);
			tag.insert(Frame::Text(TextInformationFrame::new(
				field::ARTIST.frame_id(),
				TextEncoding::UTF8,
				vec![String::from(BLANK_ARTIST)],
			)));
			tag
		});

		self.id3v1 = (v1 || v2.is_none()).then(|| Id3v1Tag {
			artist: Some(String::from(BLANK_ARTIST)),
			..Id3v1Tag::default()
		});
	}

	/// Set a field from its text form
	///
	/// `name` is looked up in [`FIELDS`](crate::field::FIELDS), ignoring case. Names that aren't
	/// there are stored in a `TXXX` frame, described by the upper-cased name.
	///
	/// Multiple values are separated by `\`. For `ID3v2.3` and older, they are folded into one
	/// (see [`downgrade_v23`](crate::id3::v2::downgrade_v23)).
	///
	/// # Errors
	///
	/// * There is no tag (`ErrorKind::NoTag`)
	/// * The tag is `ID3v1`, and `name` is not one of the [`V1_FIELDS`](crate::field::V1_FIELDS)
	///   (`ErrorKind::InvalidFrame`)
	/// * The field holds binary data, such as `PICTURE` (`ErrorKind::InvalidFrame`)
	/// * The value isn't a valid timestamp or track number, for fields that need one
	pub fn add_field(&mut self, name: &str, value: &str) -> Result<()> {
		match (&mut self.id3v2, &mut self.id3v1) {
			(Some(id3v2), _) => {
				let version = id3v2.original_version();
				let frame = match field::lookup(name) {
					Some(descriptor) => descriptor.build_frame(value, version)?,
					None => field::custom_frame(name, value, version),
				};

				log::debug!("Setting {}: {value:?}", frame.id_str());
				id3v2.insert(frame);
			},
			(None, Some(id3v1)) => set_v1_field(id3v1, name, value)?,
			(None, None) => err!(NoTag),
		}

		Ok(())
	}

	/// Get a field in its text form
	///
	/// Multiple values are joined with `\`.
	///
	/// # Errors
	///
	/// * There is no tag (`ErrorKind::NoTag`)
	/// * The field is known, but not set (`ErrorKind::FieldNotFound`)
	/// * The field is unknown and no `TXXX` frame carries its name (`ErrorKind::InvalidFrame`)
	/// * The tag is `ID3v1`, and `name` is not one of the [`V1_FIELDS`](crate::field::V1_FIELDS)
	/// * The field holds binary data, such as `PICTURE` (`ErrorKind::InvalidFrame`)
	pub fn get_field(&self, name: &str) -> Result<String> {
		let separator = FIELD_VALUE_SEPARATOR.to_string();

		let id3v2 = match (&self.id3v2, &self.id3v1) {
			(Some(id3v2), _) => id3v2,
			(None, Some(id3v1)) => return get_v1_field(id3v1, name),
			(None, None) => err!(NoTag),
		};

		let Some(descriptor) = field::lookup(name) else {
			let description = field::custom_description(name);
			return match id3v2.get_user_text(&description) {
				Some(values) => Ok(values.join(&separator)),
				None => err!(InvalidFrame(format!("Unknown field: {description}"))),
			};
		};

		if matches!(descriptor.kind, FieldKind::Picture | FieldKind::Private) {
			err!(InvalidFrame(format!(
				"{} holds binary data and has no text form",
				descriptor.name
			)));
		}

		let key = descriptor.key();
		match id3v2.query(&key).find_map(Frame::text_values) {
			Some(values) => Ok(values.join(&separator)),
			None => err!(FieldNotFound(descriptor.name.to_owned())),
		}
	}

	/// Set a field to the empty value
	///
	/// Unlike [`Id3File::remove_field`], an `ID3v2` frame is kept (or created) with no content.
	///
	/// # Errors
	///
	/// See [`Id3File::add_field`]
	pub fn clear_field(&mut self, name: &str) -> Result<()> {
		self.add_field(name, "")
	}

	/// Remove every frame holding a field
	///
	/// `PICTURE` and `PRIVATE` remove every `APIC` or `PRIV` frame. Use [`Id3File::remove`] to
	/// pick out a single one.
	///
	/// # Errors
	///
	/// * There is no tag (`ErrorKind::NoTag`)
	/// * The tag is `ID3v1`, and `name` is not one of the [`V1_FIELDS`](crate::field::V1_FIELDS)
	pub fn remove_field(&mut self, name: &str) -> Result<RemoveOutcome> {
		match (&mut self.id3v2, &mut self.id3v1) {
			(Some(id3v2), _) => {
				let key = match field::lookup(name) {
					Some(descriptor) => descriptor.key(),
					None => FrameKey::UserText(field::custom_description(name)),
				};

				let removed = id3v2.remove(&key).len();
				log::debug!("Removed {removed} frame(s) for {name}");
				Ok(RemoveOutcome::from_count(removed))
			},
			(None, Some(id3v1)) => remove_v1_field(id3v1, name),
			(None, None) => err!(NoTag),
		}
	}

	/// Insert a frame into the `ID3v2` tag
	///
	/// This replaces any frame with the same [`FrameKey`], which is returned.
	///
	/// UTF-16 text is moved to UTF-8 on the way in (Latin-1 text is left alone). Older versions
	/// are written as UTF-16 regardless.
	///
	/// # Errors
	///
	/// * There is no tag (`ErrorKind::NoTag`)
	/// * The tag is `ID3v1`, which has no frames (`ErrorKind::InvalidFrame`)
	pub fn add(&mut self, mut frame: Frame) -> Result<Option<Frame>> {
		frame.normalize_encoding();
		Ok(self.frames_mut()?.insert(frame))
	}

	/// Remove every frame that falls under `key`
	///
	/// # Errors
	///
	/// See [`Id3File::add`]
	pub fn remove(&mut self, key: &FrameKey) -> Result<Vec<Frame>> {
		Ok(self.frames_mut()?.remove(key))
	}

	/// Every frame that falls under `key`
	///
	/// # Errors
	///
	/// See [`Id3File::add`]
	pub fn query<'a>(&'a self, key: &'a FrameKey) -> Result<impl Iterator<Item = &'a Frame> + 'a> {
		let id3v2 = match (&self.id3v2, &self.id3v1) {
			(Some(id3v2), _) => id3v2,
			(None, Some(_)) => err!(InvalidFrame(String::from("ID3v1 tags have no frames"))),
			(None, None) => err!(NoTag),
		};

		Ok(id3v2.query(key))
	}

	fn frames_mut(&mut self) -> Result<&mut Id3v2Tag> {
		match (&mut self.id3v2, &self.id3v1) {
			(Some(id3v2), _) => Ok(id3v2),
			(None, Some(_)) => err!(InvalidFrame(String::from("ID3v1 tags have no frames"))),
			(None, None) => err!(NoTag),
		}
	}

	/// Drop the chosen tags
	///
	/// They are stripped from the file on [`Id3File::save`].
	///
	/// # Errors
	///
	/// * There is no tag (`ErrorKind::NoTag`)
	pub fn delete_all(&mut self, v1: bool, v2: bool) -> Result<()> {
		if !self.has_tag() {
			err!(NoTag);
		}

		if v1 {
			self.id3v1 = None;
		}

		if v2 {
			self.id3v2 = None;
		}

		Ok(())
	}

	/// Write the tags back to the file
	///
	/// * A lone `ID3v1` tag is written as-is, and any `ID3v2` tag on disk is stripped
	/// * `ID3v2.2` and `ID3v2.3` tags are written as `ID3v2.3`, `ID3v2.4` tags as `ID3v2.4`
	/// * With both tags present, the `ID3v1` tag is rebuilt from the `ID3v2` tag, see
	///   [`derive_v1`]
	/// * Tags that were deleted, or are empty, are stripped
	///
	/// The audio data is left untouched. The new content goes to a temporary file in the same
	/// directory, which then replaces the original.
	///
	/// # Errors
	///
	/// * There are no tags, and none to strip from the file (`ErrorKind::NoTag`)
	/// * The file could not be read, or replaced
	/// * A tag could not be encoded, see [`WriteOptions`]
	pub fn save(&mut self, write_options: WriteOptions) -> Result<()> {
		if !self.has_tag() && self.on_disk.is_empty() {
			err!(NoTag);
		}

		let content = std::fs::read(&self.path)?;

		// The file may have changed since it was read
		let on_disk = locate(&content)?;
		let audio = on_disk.audio(content.len() as u64);
		let audio = &content[audio.start as usize..audio.end as usize];

		let mut id3v2_version = None;
		let mut id3v2_bytes = Vec::new();
		if let Some(id3v2) = &self.id3v2 {
			let version = match id3v2.original_version() {
				Id3v2Version::V4 => Id3v2Version::V4,
				Id3v2Version::V2 | Id3v2Version::V3 => Id3v2Version::V3,
			};

			id3v2_bytes = crate::id3::v2::write::create_tag(id3v2, version, write_options)?;
			id3v2_version = Some(version);

			if let Some(id3v1) = &mut self.id3v1 {
				log::debug!("Rebuilding the ID3v1 tag from the ID3v2 tag");
				*id3v1 = derive_v1(id3v2);
			}
		}

		let mut id3v1_bytes = Vec::new();
		if let Some(id3v1) = self.id3v1.as_ref().filter(|tag| !tag.is_empty()) {
			id3v1.dump_to(&mut id3v1_bytes, write_options)?;
		}

		log::debug!(
			"Saving {}: {} byte ID3v2 tag, {} bytes of audio, {} byte ID3v1 tag",
			self.path.display(),
			id3v2_bytes.len(),
			audio.len(),
			id3v1_bytes.len()
		);

		let dir = match self.path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};

		let permissions = std::fs::metadata(&self.path)?.permissions();

		let mut temp = tempfile::NamedTempFile::new_in(dir)?;
		temp.write_all(&id3v2_bytes)?;
		temp.write_all(audio)?;
		temp.write_all(&id3v1_bytes)?;
		temp.flush()?;
		temp.as_file().set_permissions(permissions)?;
		temp.persist(&self.path)?;

		let id3v2_len = id3v2_bytes.len() as u64;
		let total_len = id3v2_len + audio.len() as u64 + id3v1_bytes.len() as u64;
		self.on_disk = TagLocations {
			v2: (id3v2_len > 0).then_some(0..id3v2_len),
			v1: (!id3v1_bytes.is_empty()).then_some(total_len - id3v1_bytes.len() as u64..total_len),
		};

		// Keep the tags in line with what is now on disk
		if let Some(version) = id3v2_version {
			if let Some(id3v2) = &mut self.id3v2 {
				id3v2.original_version = version;
			}
		}
		self.id3v2 = self.id3v2.take().filter(|tag| !tag.is_empty());
		self.id3v1 = self.id3v1.take().filter(|tag| !tag.is_empty());

		Ok(())
	}

	/// A one line description of the file and its fields
	///
	/// ```text
	/// [INFO] FILENAME=song.mp3; VERSION=(2, 4, 0) TITLE=Foo; ARTIST=Bar\Baz; TXXX=MOOD=Happy
	/// ```
	pub fn summary(&self) -> String {
		let mut summary = format!("[INFO] FILENAME={}; ", self.path.display());

		let Some(version) = self.version() else {
			return summary;
		};

		let _ = write!(summary, "VERSION={version:?} ");

		for descriptor in field::FIELDS {
			// Listed along with the rest of the TXXX frames
			if matches!(descriptor.kind, FieldKind::UserText(_)) {
				continue;
			}

			if let Ok(value) = self.get_field(descriptor.name) {
				let _ = write!(summary, "{}={value}; ", descriptor.name);
			}
		}

		let Some(id3v2) = &self.id3v2 else {
			return summary;
		};

		for frame in id3v2 {
			let _ = match frame {
				Frame::UserText(f) => write!(
					summary,
					"TXXX={}={} ",
					f.description,
					f.values.join(&FIELD_VALUE_SEPARATOR.to_string())
				),
				Frame::Private(f) => write!(
					summary,
					"PRIV={} ({} bytes) ",
					f.owner,
					f.private_data.len()
				),
				Frame::Picture(f) => write!(
					summary,
					"APIC={} ({:?}, {} bytes) ",
					f.description,
					f.pic_type,
					f.data.len()
				),
				_ => continue,
			};
		}

		summary
	}
}

fn get_v1_field(tag: &Id3v1Tag, name: &str) -> Result<String> {
	let name = name.trim().to_ascii_uppercase();
	let value = match name.as_str() {
		"TITLE" => tag.title.clone(),
		"ARTIST" => tag.artist.clone(),
		"ALBUM" => tag.album.clone(),
		"YEAR" => tag.year.map(|year| year.to_string()),
		"COMMENT" => tag.comment.clone(),
		"TRACK" => tag.track_number.map(|track| track.to_string()),
		"GENRE" => tag.genre_name().map(String::from),
		_ => err!(InvalidFrame(format!("{name} is not an ID3v1 field"))),
	};

	value.ok_or_else(|| ShelltagError::new(ErrorKind::FieldNotFound(name)))
}

fn set_v1_field(tag: &mut Id3v1Tag, name: &str, value: &str) -> Result<()> {
	let name = name.trim().to_ascii_uppercase();
	if !field::is_v1_field(&name) {
		err!(InvalidFrame(format!("{name} is not an ID3v1 field")));
	}

	let values = value.split(FIELD_VALUE_SEPARATOR).collect::<Vec<_>>();
	let joined = values.join(V23_MULTI_VALUE_SEPARATOR);
	let first = values.first().copied().unwrap_or_default().trim();

	let text = |size| (!joined.is_empty()).then(|| fit_field(&joined, size));
	match name.as_str() {
		"TITLE" => tag.title = text(TEXT_FIELD_LEN),
		"ARTIST" => tag.artist = text(TEXT_FIELD_LEN),
		"ALBUM" => tag.album = text(TEXT_FIELD_LEN),
		"COMMENT" => tag.comment = text(comment_len(tag.track_number)),
		"YEAR" => {
			tag.year = Timestamp::parse(first, ParsingMode::BestAttempt)?.map(|t| t.year);
		},
		"TRACK" => {
			tag.track_number = match first.split('/').next().map(str::trim) {
				None | Some("") => None,
				Some(number) => match number.parse::<u8>() {
					Ok(track) if track != 0 => Some(track),
					_ => err!(InvalidFrame(format!(
						"{first:?} is not a valid ID3v1 track number (1-255)"
					))),
				},
			};
		},
		// "GENRE"
		_ => tag.genre = (!first.is_empty()).then(|| parse_genre(first)),
	}

	Ok(())
}

fn remove_v1_field(tag: &mut Id3v1Tag, name: &str) -> Result<RemoveOutcome> {
	let name = name.trim().to_ascii_uppercase();
	let removed = match name.as_str() {
		"TITLE" => tag.title.take().is_some(),
		"ARTIST" => tag.artist.take().is_some(),
		"ALBUM" => tag.album.take().is_some(),
		"YEAR" => tag.year.take().is_some(),
		"COMMENT" => tag.comment.take().is_some(),
		"TRACK" => tag.track_number.take().is_some(),
		"GENRE" => tag.genre.take().is_some(),
		_ => err!(InvalidFrame(format!("{name} is not an ID3v1 field"))),
	};

	Ok(RemoveOutcome::from_count(usize::from(removed)))
}
