//! Contains the errors that can arise within shelltag
//!
//! The primary error is [`ShelltagError`]. The type of error is determined by [`ErrorKind`],
//! which can be extended at any time.

pub use crate::util::text::TextEncodingError;

use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};

/// Alias for `Result<T, ShelltagError>`
pub type Result<T> = std::result::Result<T, ShelltagError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// Tag presence
	/// The file carries neither an ID3v1 nor an ID3v2 tag, and the operation needs one
	NoTag,
	/// The tag reports a version outside of the supported set (1.x, 2.2, 2.3, 2.4)
	UndefinedVersion(u8, u8),

	// Field/frame level errors
	/// A single frame failed to decode
	///
	/// While reading a tag this is recorded rather than returned, see
	/// [`Id3v2Tag::decode_errors`](crate::id3::v2::Id3v2Tag::decode_errors).
	FrameDecode(FrameDecodeError),
	/// The requested field or frame is not valid for the active tag version
	InvalidFrame(String),
	/// The field is known, but no frame exists for it in the tag
	FieldNotFound(String),

	// Data related errors
	/// Attempting to read/write an abnormally large amount of data
	TooMuchData,
	/// Expected the data to be a different size than provided
	SizeMismatch,
	/// Errors that arise while decoding text
	TextDecode(&'static str),
	/// Errors that arise while encoding text
	TextEncode(TextEncodingError),
	/// Arises when decoding OR encoding a problematic [`Timestamp`](crate::id3::v2::Timestamp)
	BadTimestamp(&'static str),
	/// Errors that arise while reading/writing ID3v2 tags
	Id3v2(Id3v2Error),

	// Conversions for external errors
	/// Unable to convert bytes to a String
	StringFromUtf8(std::string::FromUtf8Error),
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
	/// Failure to replace the original file with the rewritten one
	Persist(tempfile::PersistError),
	/// Failure to allocate enough memory
	Alloc(TryReserveError),
}

/// The types of errors that can occur while interacting with ID3v2 tags
#[derive(Debug)]
#[non_exhaustive]
pub enum Id3v2ErrorKind {
	// Header
	/// Arises when a compressed ID3v2.2 tag is encountered
	///
	/// At the time ID3v2.2 was published, a compression scheme wasn't decided.
	/// As such, it is recommended to ignore the tag entirely.
	V2Compression,
	/// Arises when an extended header has an invalid size (must be >= 6 bytes and less than the total tag size)
	BadExtendedHeaderSize,

	// Frame
	/// Arises when a frame ID contains invalid characters (must be within `'A'..'Z'` or `'0'..'9'`)
	/// or if the ID is too short/long.
	BadFrameId(Vec<u8>),
	/// Arises when a frame's size runs past the end of the tag
	BadFrameLength,
	/// Arises when reading a compressed or encrypted frame with no data length indicator
	MissingDataLengthIndicator,
	/// Arises when a text encoding other than Latin-1 or UTF-16 appear in an ID3v2.2 tag
	V2InvalidTextEncoding,
	/// Arises when a frame starts with an unknown text encoding byte
	BadTextEncoding(u8),
	/// Arises when an invalid picture format is parsed. Only applicable to [`Id3v2Version::V2`](crate::id3::v2::Id3v2Version::V2)
	BadPictureFormat(String),

	// Compression
	#[cfg(feature = "id3v2_compression_support")]
	/// Arises when a compressed frame is unable to be decompressed
	Decompression(std::io::Error),
	#[cfg(not(feature = "id3v2_compression_support"))]
	/// Arises when a compressed frame is encountered, but support is disabled
	CompressedFrameEncountered,

	// Writing
	/// Arises when attempting to write an invalid Frame (Bad `FrameId`/`Frame` variant pairing)
	BadFrame(String, &'static str),
	/// Arises when attempting to write a [`CommentFrame`](crate::id3::v2::CommentFrame) with an invalid language
	InvalidLanguage([u8; 3]),
}

impl Display for Id3v2ErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			// Header
			Self::V2Compression => write!(f, "Encountered a compressed ID3v2.2 tag"),
			Self::BadExtendedHeaderSize => {
				write!(f, "Found an extended header with an invalid size")
			},

			// Frame
			Self::BadFrameId(frame_id) => write!(f, "Failed to parse a frame ID: 0x{frame_id:x?}"),
			Self::BadFrameLength => write!(
				f,
				"Frame isn't long enough to extract the necessary information"
			),
			Self::MissingDataLengthIndicator => write!(
				f,
				"Encountered a compressed or encrypted frame without a data length indicator"
			),
			Self::V2InvalidTextEncoding => {
				write!(f, "ID3v2.2 only supports Latin-1 and UTF-16 encodings")
			},
			Self::BadTextEncoding(byte) => write!(f, "Found an unknown text encoding ({byte})"),
			Self::BadPictureFormat(format) => {
				write!(f, "Picture: Found unexpected format \"{format}\"")
			},

			// Compression
			#[cfg(feature = "id3v2_compression_support")]
			Self::Decompression(err) => write!(f, "Failed to decompress frame: {err}"),
			#[cfg(not(feature = "id3v2_compression_support"))]
			Self::CompressedFrameEncountered => write!(
				f,
				"Encountered a compressed ID3v2 frame, support is disabled"
			),

			// Writing
			Self::BadFrame(frame_id, frame_value) => write!(
				f,
				"Attempted to write an invalid frame. ID: \"{frame_id}\", Value: \"{frame_value}\"",
			),
			Self::InvalidLanguage(lang) => write!(
				f,
				"Invalid frame language found: {lang:?} (expected 3 ascii characters)"
			),
		}
	}
}

/// An error that arises while interacting with an ID3v2 tag
pub struct Id3v2Error {
	kind: Id3v2ErrorKind,
}

impl Id3v2Error {
	/// Create a new `Id3v2Error` from an [`Id3v2ErrorKind`]
	#[must_use]
	pub const fn new(kind: Id3v2ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`Id3v2ErrorKind`]
	pub fn kind(&self) -> &Id3v2ErrorKind {
		&self.kind
	}
}

impl Debug for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ID3v2: {:?}", self.kind)
	}
}

impl Display for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ID3v2: {}", self.kind)
	}
}

/// A single frame that could not be decoded
///
/// Carries the frame identifier (as far as it could be read) and the offset of the frame
/// header, relative to the start of the frame data (after the tag header).
pub struct FrameDecodeError {
	id: String,
	offset: u64,
	reason: Box<ShelltagError>,
}

impl FrameDecodeError {
	/// Create a `FrameDecodeError`
	pub fn new(id: impl Into<String>, offset: u64, reason: ShelltagError) -> Self {
		Self {
			id: id.into(),
			offset,
			reason: Box::new(reason),
		}
	}

	/// The identifier of the offending frame
	///
	/// This will be empty if the header itself could not be read.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// The offset of the frame header
	pub fn offset(&self) -> u64 {
		self.offset
	}

	/// The underlying error
	pub fn reason(&self) -> &ShelltagError {
		&self.reason
	}
}

impl Debug for FrameDecodeError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FrameDecodeError")
			.field("id", &self.id)
			.field("offset", &self.offset)
			.field("reason", &self.reason)
			.finish()
	}
}

impl Display for FrameDecodeError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"Frame \"{}\" at offset {}: {}",
			self.id, self.offset, self.reason
		)
	}
}

/// Errors that could occur within shelltag
pub struct ShelltagError {
	pub(crate) kind: ErrorKind,
}

impl ShelltagError {
	/// Create a `ShelltagError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::error::{ErrorKind, ShelltagError};
	///
	/// let no_tag = ShelltagError::new(ErrorKind::NoTag);
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::error::{ErrorKind, ShelltagError};
	///
	/// let no_tag = ShelltagError::new(ErrorKind::NoTag);
	/// if let ErrorKind::NoTag = no_tag.kind() {
	/// 	println!("Create a tag first");
	/// }
	/// ```
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}
}

impl std::error::Error for ShelltagError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self.kind {
			ErrorKind::Io(ref err) => Some(err),
			ErrorKind::Persist(ref err) => Some(err),
			ErrorKind::StringFromUtf8(ref err) => Some(err),
			ErrorKind::FrameDecode(ref err) => Some(&*err.reason),
			_ => None,
		}
	}
}

impl Debug for ShelltagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<Id3v2Error> for ShelltagError {
	fn from(input: Id3v2Error) -> Self {
		Self {
			kind: ErrorKind::Id3v2(input),
		}
	}
}

impl From<FrameDecodeError> for ShelltagError {
	fn from(input: FrameDecodeError) -> Self {
		Self {
			kind: ErrorKind::FrameDecode(input),
		}
	}
}

impl From<TextEncodingError> for ShelltagError {
	fn from(input: TextEncodingError) -> Self {
		Self {
			kind: ErrorKind::TextEncode(input),
		}
	}
}

impl From<std::io::Error> for ShelltagError {
	fn from(input: std::io::Error) -> Self {
		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl From<tempfile::PersistError> for ShelltagError {
	fn from(input: tempfile::PersistError) -> Self {
		Self {
			kind: ErrorKind::Persist(input),
		}
	}
}

impl From<std::string::FromUtf8Error> for ShelltagError {
	fn from(input: std::string::FromUtf8Error) -> Self {
		Self {
			kind: ErrorKind::StringFromUtf8(input),
		}
	}
}

impl From<std::collections::TryReserveError> for ShelltagError {
	fn from(input: TryReserveError) -> Self {
		Self {
			kind: ErrorKind::Alloc(input),
		}
	}
}

impl Display for ShelltagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::StringFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::Io(ref err) => write!(f, "{err}"),
			ErrorKind::Persist(ref err) => write!(f, "Unable to replace the original file: {err}"),
			ErrorKind::Alloc(ref err) => write!(f, "{err}"),

			ErrorKind::NoTag => write!(f, "ID3 tag does not exist, create a tag first"),
			ErrorKind::UndefinedVersion(major, minor) => {
				write!(f, "Unsupported tag version (v2.{major}.{minor})")
			},
			ErrorKind::FrameDecode(ref err) => write!(f, "{err}"),
			ErrorKind::InvalidFrame(ref name) => {
				write!(f, "Invalid frame: {name}")
			},
			ErrorKind::FieldNotFound(ref name) => write!(f, "\"{name}\" does not exist in the tag"),
			ErrorKind::TextDecode(message) => write!(f, "Text decoding: {message}"),
			ErrorKind::TextEncode(ref message) => write!(f, "Text encoding: {message}"),
			ErrorKind::BadTimestamp(message) => {
				write!(f, "Encountered an invalid timestamp: {message}")
			},
			ErrorKind::Id3v2(ref id3v2_err) => write!(f, "{id3v2_err}"),

			ErrorKind::TooMuchData => write!(
				f,
				"Attempted to read/write an abnormally large amount of data"
			),
			ErrorKind::SizeMismatch => write!(
				f,
				"Encountered an invalid item size, either too big or too small to be valid"
			),
		}
	}
}
