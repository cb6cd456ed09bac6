/// Options to control how shelltag writes a tag
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) preferred_padding: Option<u32>,
	pub(crate) lossy_text_encoding: bool,
}

impl WriteOptions {
	/// Default preferred padding size in bytes
	pub const DEFAULT_PREFERRED_PADDING: u32 = 1024;

	/// Creates a new `WriteOptions`, alias for `Default` implementation
	///
	/// See also: [`WriteOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::config::WriteOptions;
	///
	/// let write_options = WriteOptions::new();
	/// ```
	pub const fn new() -> Self {
		Self {
			preferred_padding: Some(Self::DEFAULT_PREFERRED_PADDING),
			lossy_text_encoding: true,
		}
	}

	/// Set the preferred padding size in bytes
	///
	/// The ID3v2 tag will be followed by this many zero bytes. A tag with a footer is never padded.
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::config::WriteOptions;
	///
	/// // I really don't want my files rewritten, so I'll double the padding size!
	/// let options = WriteOptions::new().preferred_padding(2048);
	///
	/// // ...Or I don't want padding under any circumstances!
	/// let options = WriteOptions::new().preferred_padding(0);
	/// ```
	pub fn preferred_padding(mut self, preferred_padding: u32) -> Self {
		match preferred_padding {
			0 => self.preferred_padding = None,
			_ => self.preferred_padding = Some(preferred_padding),
		}
		self
	}

	/// Whether to replace characters that do not fit in Latin-1 with `?`
	///
	/// This affects ID3v1 fields and any ID3v2 frame stored as Latin-1. If set to `false`,
	/// such characters cause an error instead.
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::config::WriteOptions;
	///
	/// // I'd rather know when my titles are getting mangled
	/// let options = WriteOptions::new().lossy_text_encoding(false);
	/// ```
	pub fn lossy_text_encoding(mut self, lossy_text_encoding: bool) -> Self {
		self.lossy_text_encoding = lossy_text_encoding;
		self
	}
}

impl Default for WriteOptions {
	/// The default implementation for `WriteOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// WriteOptions {
	///     preferred_padding: 1024,
	///     lossy_text_encoding: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}
