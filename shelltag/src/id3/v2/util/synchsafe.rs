//! Synchsafe integers and unsynchronized content
//!
//! Unsynchronisation inserts a `0x00` after every `0xFF` so that no false MPEG frame sync
//! (`0xFF 0xE0` and above) appears inside a tag. See [`FrameFlags::unsynchronisation`](crate::id3::v2::FrameFlags::unsynchronisation).

use crate::error::Result;
use crate::macros::err;

use std::io::Read;

/// A reader that undoes unsynchronisation, dropping the `0x00` that follows each `0xFF`
///
/// # Examples
///
/// ```rust
/// use std::io::{Cursor, Read};
/// use shelltag::id3::v2::util::synchsafe::UnsynchronizedStream;
///
/// fn main() -> shelltag::error::Result<()> {
/// // The content has two `0xFF 0x00` pairs, which will be removed
/// let content = [0xFF, 0x00, 0x1A, 0xFF, 0x00, 0x15];
///
/// let mut unsynchronized_reader = UnsynchronizedStream::new(Cursor::new(content));
///
/// let mut unsynchronized_content = Vec::new();
/// unsynchronized_reader.read_to_end(&mut unsynchronized_content)?;
///
/// // All null bytes following `0xFF` have been removed
/// assert_eq!(unsynchronized_content, [0xFF, 0x1A, 0xFF, 0x15]);
/// # Ok(()) }
/// ```
pub struct UnsynchronizedStream<R> {
	reader: R,
	// Same buffer size as `BufReader`
	buf: [u8; 8 * 1024],
	bytes_available: usize,
	pos: usize,
	encountered_ff: bool,
}

impl<R> UnsynchronizedStream<R> {
	/// Create a new [`UnsynchronizedStream`]
	pub fn new(reader: R) -> Self {
		Self {
			reader,
			buf: [0; 8 * 1024],
			bytes_available: 0,
			pos: 0,
			encountered_ff: false,
		}
	}

	/// Extract the reader, discarding the [`UnsynchronizedStream`]
	pub fn into_inner(self) -> R {
		self.reader
	}
}

impl<R: Read> Read for UnsynchronizedStream<R> {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		let dest_len = buf.len();
		if dest_len == 0 {
			return Ok(0);
		}

		let mut dest_pos = 0;
		loop {
			if dest_pos == dest_len {
				break;
			}

			if self.pos >= self.bytes_available {
				self.bytes_available = self.reader.read(&mut self.buf)?;
				self.pos = 0;
			}

			// Exhausted the reader
			if self.bytes_available == 0 {
				break;
			}

			if self.encountered_ff {
				self.encountered_ff = false;

				// Only skip the next byte if this is valid unsynchronization
				// Otherwise just continue as normal
				if self.buf[self.pos] == 0 {
					self.pos += 1;
					continue;
				}
			}

			let current_byte = self.buf[self.pos];
			buf[dest_pos] = current_byte;
			dest_pos += 1;
			self.pos += 1;

			if current_byte == 0xFF {
				self.encountered_ff = true;
			}
		}

		Ok(dest_pos)
	}
}

/// An integer that can be converted to and from synchsafe variants
///
/// ID3v2.4 frame sizes, the tag size of every version, and data length indicators are stored
/// with the most significant bit of every byte cleared.
pub trait SynchsafeInteger: Sized {
	/// Create a synchsafe integer
	///
	/// # Errors
	///
	/// `self` doesn't fit in 28 bits
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// # fn main() -> shelltag::error::Result<()> {
	/// // Maximum value we can represent in a synchsafe u32
	/// let unsynch_number = 0xFFF_FFFF_u32;
	/// let synch_number = unsynch_number.synch()?;
	///
	/// // Each byte should have 7 set bits and an MSB of 0
	/// assert_eq!(synch_number, 0b01111111_01111111_01111111_01111111_u32);
	///
	/// // One bit too many
	/// assert!(0x1000_0000_u32.synch().is_err());
	/// # Ok(()) }
	/// ```
	fn synch(self) -> Result<Self>;

	/// Unsynchronise a synchsafe integer
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// // The size field of a 257 byte tag
	/// let synch_number = 0x0000_0201_u32;
	/// assert_eq!(synch_number.unsynch(), 257);
	/// ```
	fn unsynch(self) -> Self;
}

impl SynchsafeInteger for u32 {
	fn synch(self) -> Result<Self> {
		// 7 bits are available per byte
		const MAXIMUM_INTEGER: u32 = 0x0FFF_FFFF;

		if self > MAXIMUM_INTEGER {
			err!(TooMuchData);
		}

		Ok((self & 0x7F)
			| ((self & (0x7F << 7)) << 1)
			| ((self & (0x7F << 14)) << 2)
			| ((self & (0x7F << 21)) << 3))
	}

	fn unsynch(self) -> Self {
		((self & 0x7F00_0000) >> 3)
			| ((self & 0x7F_0000) >> 2)
			| ((self & 0x7F00) >> 1)
			| (self & 0x7F)
	}
}

#[cfg(test)]
mod tests {
	use crate::id3::v2::util::synchsafe::{SynchsafeInteger, UnsynchronizedStream};
	use std::io::{Cursor, Read};

	const UNSYNCHRONIZED_CONTENT: &[u8] =
		&[0xFF, 0x00, 0x00, 0xFF, 0x12, 0xB0, 0x05, 0xFF, 0x00, 0x00];
	const EXPECTED: &[u8] = &[0xFF, 0x00, 0xFF, 0x12, 0xB0, 0x05, 0xFF, 0x00];

	#[test_log::test]
	fn unsynchronized_stream() {
		let reader = Cursor::new(UNSYNCHRONIZED_CONTENT);
		let mut unsynchronized_reader = UnsynchronizedStream::new(reader);

		let mut final_content = Vec::new();
		unsynchronized_reader
			.read_to_end(&mut final_content)
			.unwrap();

		assert_eq!(final_content, EXPECTED);
	}

	#[test_log::test]
	fn unsynchronized_stream_large() {
		// Create a buffer >10k to force a buffer reset
		let reader = Cursor::new(UNSYNCHRONIZED_CONTENT.repeat(1000));
		let mut unsynchronized_reader = UnsynchronizedStream::new(reader);

		let mut final_content = Vec::new();
		unsynchronized_reader
			.read_to_end(&mut final_content)
			.unwrap();

		// UNSYNCHRONIZED_CONTENT * 1000 should equal EXPECTED * 1000
		assert_eq!(final_content, EXPECTED.repeat(1000));
	}

	#[test_log::test]
	fn unsynchronized_stream_should_not_replace_unrelated() {
		const ORIGINAL_CONTENT: &[u8] = &[0xFF, 0x1A, 0xFF, 0xC0, 0x10, 0x01];

		let reader = Cursor::new(ORIGINAL_CONTENT);
		let mut unsynchronized_reader = UnsynchronizedStream::new(reader);

		let mut final_content = Vec::new();
		unsynchronized_reader
			.read_to_end(&mut final_content)
			.unwrap();

		assert_eq!(final_content, ORIGINAL_CONTENT);
	}

	#[test_log::test]
	fn synch_roundtrip() {
		for n in [0_u32, 1, 0x7F, 0x80, 0x3FFF, 0x4000, 1024, 0xFFF_FFFF] {
			let synched = n.synch().unwrap();
			assert_eq!(synched & 0x8080_8080, 0, "{n:#x} produced a non synchsafe value");
			assert_eq!(synched.unsynch(), n);
		}
	}

	#[test_log::test]
	fn synch_too_large() {
		assert!(0x1000_0000_u32.synch().is_err());
		assert!(u32::MAX.synch().is_err());
	}
}
