use super::constants::{ID3V1_TAG_MARKER, UNKNOWN_GENRE};
use super::tag::{Id3v1Tag, TEXT_FIELD_LEN, comment_len};
use crate::config::WriteOptions;
use crate::error::Result;
use crate::util::text::latin1_encode;

use std::io::Write;

use byteorder::WriteBytesExt;

pub(crate) fn encode(tag: &Id3v1Tag, write_options: WriteOptions) -> Result<Vec<u8>> {
	fn resize_string(
		value: Option<&str>,
		size: usize,
		write_options: WriteOptions,
	) -> Result<Vec<u8>> {
		let mut field = vec![0; size];

		if let Some(val) = value {
			for (dest, b) in field
				.iter_mut()
				.zip(latin1_encode(val, write_options.lossy_text_encoding))
			{
				*dest = b?;
			}
		}

		Ok(field)
	}

	let mut writer = Vec::with_capacity(128);

	writer.write_all(&ID3V1_TAG_MARKER)?;

	let title = resize_string(tag.title.as_deref(), TEXT_FIELD_LEN, write_options)?;
	writer.write_all(&title)?;

	let artist = resize_string(tag.artist.as_deref(), TEXT_FIELD_LEN, write_options)?;
	writer.write_all(&artist)?;

	let album = resize_string(tag.album.as_deref(), TEXT_FIELD_LEN, write_options)?;
	writer.write_all(&album)?;

	let mut year = [0; 4];
	if let Some(year_num) = tag.year {
		let mut year_num = std::cmp::min(year_num, 9999);

		for digit in year.iter_mut().rev() {
			*digit = b'0' + (year_num % 10) as u8;
			year_num /= 10;
		}
	}

	writer.write_all(&year)?;

	let comment_len = comment_len(tag.track_number);
	let comment = resize_string(tag.comment.as_deref(), comment_len, write_options)?;
	writer.write_all(&comment)?;

	// ID3v1.1
	if comment_len < TEXT_FIELD_LEN {
		writer.write_u8(0)?;
		writer.write_u8(tag.track_number.unwrap_or(0))?;
	}

	writer.write_u8(tag.genre.unwrap_or(UNKNOWN_GENRE))?;

	Ok(writer)
}
