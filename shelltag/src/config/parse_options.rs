/// Options to control how shelltag parses a tag
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ParseOptions {
	pub(crate) parsing_mode: ParsingMode,
	pub(crate) read_pictures: bool,
}

impl Default for ParseOptions {
	/// The default implementation for `ParseOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// ParseOptions {
	/// 	parsing_mode: ParsingMode::BestAttempt,
	/// 	read_pictures: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl ParseOptions {
	/// Default parsing mode
	pub const DEFAULT_PARSING_MODE: ParsingMode = ParsingMode::BestAttempt;

	/// Creates a new `ParseOptions`, alias for `Default` implementation
	///
	/// See also: [`ParseOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::config::ParseOptions;
	///
	/// let parsing_options = ParseOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			parsing_mode: Self::DEFAULT_PARSING_MODE,
			read_pictures: true,
		}
	}

	/// The parsing mode to use, see [`ParsingMode`] for details
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::config::{ParseOptions, ParsingMode};
	///
	/// // By default, `parsing_mode` is ParsingMode::BestAttempt. Here, we need absolute correctness.
	/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
	/// ```
	pub fn parsing_mode(&mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		*self
	}

	/// Whether or not to read attached pictures (`APIC`)
	///
	/// Skipped pictures are **not** carried over when the tag is saved.
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::config::ParseOptions;
	///
	/// // Only printing the text fields, pictures can stay on disk
	/// let parsing_options = ParseOptions::new().read_pictures(false);
	/// ```
	pub fn read_pictures(&mut self, read_pictures: bool) -> Self {
		self.read_pictures = read_pictures;
		*self
	}
}

/// The parsing strictness mode
///
/// This can be set with [`ParseOptions::parsing_mode`].
///
/// # Examples
///
/// ```rust,no_run
/// use shelltag::config::{ParseOptions, ParsingMode};
/// use shelltag::file::Id3File;
///
/// # fn main() -> shelltag::error::Result<()> {
/// // We only want to read well-formed inputs
/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
/// let file = Id3File::read("foo.mp3", parsing_options)?;
/// # Ok(()) }
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[non_exhaustive]
pub enum ParsingMode {
	/// Will eagerly error on invalid input
	///
	/// ## Examples of behavior
	///
	/// * A single malformed frame - The parser will error and the entire tag is discarded
	/// * A timestamp with spaces instead of zeros - The frame is treated as malformed
	Strict,
	/// Default mode, less eager to error on recoverably malformed input
	///
	/// NOTE: A readable input does *not* necessarily make it writeable.
	///
	/// ## Examples of behavior
	///
	/// * A single malformed frame - The frame is recorded as a decode error and skipped
	/// * A timestamp with spaces instead of zeros - The spaces are read as zeros
	#[default]
	BestAttempt,
	/// Least eager to error, may produce invalid/partial output
	///
	/// ## Examples of behavior
	///
	/// * A single malformed frame - The frame is skipped without being recorded
	/// * A frame with an invalid identifier - The frame is skipped
	Relaxed,
}
