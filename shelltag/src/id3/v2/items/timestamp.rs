use crate::config::ParsingMode;
use crate::error::{ErrorKind, Result, ShelltagError};
use crate::macros::err;

use std::fmt::Display;
use std::str::FromStr;

/// A subset of the ISO 8601 timestamp format, as used by `TDRC` and friends
///
/// Every segment after the year is optional, but a segment can only be present if the one
/// before it is.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[allow(missing_docs)]
pub struct Timestamp {
	pub year: u16,
	pub month: Option<u8>,
	pub day: Option<u8>,
	pub hour: Option<u8>,
	pub minute: Option<u8>,
	pub second: Option<u8>,
}

impl PartialOrd for Timestamp {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Timestamp {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.year
			.cmp(&other.year)
			.then(self.month.cmp(&other.month))
			.then(self.day.cmp(&other.day))
			.then(self.hour.cmp(&other.hour))
			.then(self.minute.cmp(&other.minute))
			.then(self.second.cmp(&other.second))
	}
}

impl Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:04}", self.year)?;

		let Some(month) = self.month else {
			return Ok(());
		};
		write!(f, "-{month:02}")?;

		let Some(day) = self.day else {
			return Ok(());
		};
		write!(f, "-{day:02}")?;

		let Some(hour) = self.hour else {
			return Ok(());
		};
		write!(f, "T{hour:02}")?;

		let Some(minute) = self.minute else {
			return Ok(());
		};
		write!(f, ":{minute:02}")?;

		if let Some(second) = self.second {
			write!(f, ":{second:02}")?;
		}

		Ok(())
	}
}

impl FromStr for Timestamp {
	type Err = ShelltagError;

	fn from_str(s: &str) -> Result<Self> {
		Timestamp::parse(s, ParsingMode::BestAttempt)?
			.ok_or_else(|| ShelltagError::new(ErrorKind::BadTimestamp("Timestamp is empty")))
	}
}

impl Timestamp {
	/// The maximum length of a timestamp in bytes
	pub const MAX_LENGTH: usize = 19;

	/// A timestamp with only the year set
	pub const fn from_year(year: u16) -> Self {
		Self {
			year,
			month: None,
			day: None,
			hour: None,
			minute: None,
			second: None,
		}
	}

	/// Parse a [`Timestamp`] from a string such as `2024-06-03T14:08:49`
	///
	/// Returns `None` if `text` is empty.
	///
	/// NOTES:
	///
	/// * When not using [`ParsingMode::Strict`], surrounding whitespace is ignored, and segments
	///   are allowed to be a single digit or padded with a space (`2024-6-3`, `2024- 6- 3`)
	/// * A segment that can't be read ends the timestamp, unless using [`ParsingMode::Strict`]
	///
	/// # Errors
	///
	/// * The year is not 4 digits
	/// * A segment contains non-digit characters
	/// * [`ParsingMode::Strict`] and the timestamp is malformed in any way
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::config::ParsingMode;
	/// use shelltag::id3::v2::Timestamp;
	///
	/// # fn main() -> shelltag::error::Result<()> {
	/// let timestamp = Timestamp::parse("1992-05", ParsingMode::Strict)?.unwrap();
	/// assert_eq!(timestamp.year, 1992);
	/// assert_eq!(timestamp.month, Some(5));
	/// assert_eq!(timestamp.day, None);
	/// # Ok(()) }
	/// ```
	pub fn parse(text: &str, parse_mode: ParsingMode) -> Result<Option<Self>> {
		let mut content = text.as_bytes();
		if parse_mode != ParsingMode::Strict {
			content = content.trim_ascii();
		}

		if content.is_empty() {
			if parse_mode == ParsingMode::Strict {
				err!(BadTimestamp("Timestamp is empty"))
			}

			return Ok(None);
		}

		if content.len() > Self::MAX_LENGTH {
			err!(BadTimestamp("Timestamp is too long"))
		}

		// It is valid for a timestamp to contain no separators, but this will lower our tolerance
		// for common mistakes. The "T" separator is ignored here because it is always required.
		let has_separators = content.iter().any(|&b| b == b'-' || b == b':');

		let reader = &mut content;

		let Some((year, 4)) = Self::segment::<4>(reader, None, parse_mode)? else {
			err!(BadTimestamp(
				"Encountered an invalid year length (should be 4 digits)"
			))
		};

		let mut timestamp = Timestamp::from_year(year);

		let date_sep = has_separators.then_some(b'-');
		let time_sep = has_separators.then_some(b':');
		let segments: [(&mut Option<u8>, Option<u8>); 5] = [
			(&mut timestamp.month, date_sep),
			(&mut timestamp.day, date_sep),
			(&mut timestamp.hour, Some(b'T')),
			(&mut timestamp.minute, time_sep),
			(&mut timestamp.second, time_sep),
		];

		for (field, sep) in segments {
			match Self::segment::<2>(reader, sep, parse_mode)? {
				Some((value, _)) => *field = Some(value as u8),
				None => break,
			}
		}

		if !reader.is_empty() && parse_mode == ParsingMode::Strict {
			err!(BadTimestamp("Timestamp has trailing content"))
		}

		Ok(Some(timestamp))
	}

	// Returns the parsed number and the number of bytes it occupied
	fn segment<const SIZE: usize>(
		content: &mut &[u8],
		sep: Option<u8>,
		parse_mode: ParsingMode,
	) -> Result<Option<(u16, usize)>> {
		if content.is_empty() {
			return Ok(None);
		}

		if let Some(sep) = sep {
			if content[0] != sep {
				if parse_mode == ParsingMode::Strict {
					err!(BadTimestamp("Expected a separator"))
				}

				return Ok(None);
			}

			*content = &content[1..];
		}

		let mut num = None;
		let mut byte_count = 0;
		for &b in content.iter().take(SIZE) {
			// Timestamps in the wild pad with spaces instead of zeros (" 6" rather than "06")
			if b == b' ' && parse_mode != ParsingMode::Strict {
				byte_count += 1;
				continue;
			}

			if !b.is_ascii_digit() {
				// Or leave the digit out entirely ("6"), which eats into the next separator
				if sep.is_some() && matches!(b, b'-' | b'T' | b':') && parse_mode != ParsingMode::Strict
				{
					break;
				}

				err!(BadTimestamp(
					"Timestamp segment contains non-digit characters"
				))
			}

			num = Some(num.unwrap_or(0) * 10 + u16::from(b - b'0'));
			byte_count += 1;
		}

		if parse_mode == ParsingMode::Strict && byte_count != SIZE {
			err!(BadTimestamp("Timestamp segment is too short"))
		}

		let Some(parsed_num) = num else {
			return Ok(None);
		};

		*content = &content[byte_count..];
		Ok(Some((parsed_num, byte_count)))
	}

	/// Check that every segment is within its limits
	///
	/// # Errors
	///
	/// * A segment exceeds its limit (month > 12, day > 31, ...)
	/// * A segment is set without the segment before it
	pub fn verify(&self) -> Result<()> {
		fn verify_field(field: Option<u8>, limit: u8, parent_present: bool) -> bool {
			match field {
				Some(field) => parent_present && field <= limit,
				None => true,
			}
		}

		if self.year > 9999
			|| !verify_field(self.month, 12, true)
			|| !verify_field(self.day, 31, self.month.is_some())
			|| !verify_field(self.hour, 23, self.day.is_some())
			|| !verify_field(self.minute, 59, self.hour.is_some())
			|| !verify_field(self.second, 59, self.minute.is_some())
		{
			err!(BadTimestamp(
				"Timestamp contains segment(s) that exceed their limits"
			))
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::Timestamp;
	use crate::config::ParsingMode;

	fn expected() -> Timestamp {
		// 2024-06-03T14:08:49
		Timestamp {
			year: 2024,
			month: Some(6),
			day: Some(3),
			hour: Some(14),
			minute: Some(8),
			second: Some(49),
		}
	}

	#[test_log::test]
	fn timestamp_decode() {
		let parsed = Timestamp::parse("2024-06-03T14:08:49", ParsingMode::Strict).unwrap();
		assert_eq!(parsed, Some(expected()));
	}

	#[test_log::test]
	fn timestamp_encode() {
		assert_eq!(expected().to_string(), "2024-06-03T14:08:49");
		assert_eq!(Timestamp::from_year(1992).to_string(), "1992");
	}

	#[test_log::test]
	fn timestamp_decode_no_zero() {
		let parsed = Timestamp::parse("2024-6-3T14:8:49", ParsingMode::BestAttempt).unwrap();
		assert_eq!(parsed, Some(expected()));

		assert!(Timestamp::parse("2024-6-3T14:8:49", ParsingMode::Strict).is_err());
	}

	#[test_log::test]
	fn timestamp_decode_space_padding() {
		let parsed = Timestamp::parse("2024- 6- 3T14: 8:49", ParsingMode::BestAttempt).unwrap();
		assert_eq!(parsed, Some(expected()));
	}

	#[test_log::test]
	fn timestamp_decode_no_separators() {
		let parsed = Timestamp::parse("20240603T140849", ParsingMode::BestAttempt).unwrap();
		assert_eq!(parsed, Some(expected()));
	}

	#[test_log::test]
	fn timestamp_decode_partial() {
		let parsed = Timestamp::parse("1992", ParsingMode::Strict).unwrap();
		assert_eq!(parsed, Some(Timestamp::from_year(1992)));

		let parsed = Timestamp::parse("1992-05-1x", ParsingMode::BestAttempt);
		assert!(parsed.is_err());
	}

	#[test_log::test]
	fn timestamp_decode_empty() {
		assert_eq!(Timestamp::parse("", ParsingMode::BestAttempt).unwrap(), None);
		assert_eq!(Timestamp::parse("  ", ParsingMode::Relaxed).unwrap(), None);
		assert!(Timestamp::parse("", ParsingMode::Strict).is_err());
	}

	#[test_log::test]
	fn timestamp_bad_year() {
		assert!(Timestamp::parse("92", ParsingMode::BestAttempt).is_err());
		assert!(Timestamp::parse("abcd", ParsingMode::BestAttempt).is_err());
	}

	#[test_log::test]
	fn timestamp_verify() {
		assert!(expected().verify().is_ok());

		let bad_month = Timestamp {
			month: Some(13),
			..Timestamp::from_year(2024)
		};
		assert!(bad_month.verify().is_err());

		let orphaned_day = Timestamp {
			day: Some(3),
			..Timestamp::from_year(2024)
		};
		assert!(orphaned_day.verify().is_err());
	}
}
