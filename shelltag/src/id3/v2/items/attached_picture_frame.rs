use crate::config::WriteOptions;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::frame::content::verify_encoding;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::macros::err;
use crate::picture::{MimeType, PictureType};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use std::borrow::Cow;
use std::io::Read;

use byteorder::ReadBytesExt;

const FRAME_ID: FrameId = FrameId::Valid(Cow::Borrowed("APIC"));

/// An `ID3v2` attached picture frame
///
/// This is used for both `APIC` (`ID3v2.3`/`ID3v2.4`) and `PIC` (`ID3v2.2`) frames. `PIC`
/// frames describe the image with a 3 character format (such as `PNG` or `JPG`) rather than a
/// MIME type, see [`MimeType::from_id3v22_format`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttachedPictureFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the description
	pub encoding: TextEncoding,
	/// The picture's MIME type, if known
	pub mime_type: Option<MimeType>,
	/// The picture type
	pub pic_type: PictureType,
	/// The picture's description
	///
	/// This is unique among the pictures of a tag.
	pub description: String,
	/// The image data
	pub data: Vec<u8>,
}

impl AttachedPictureFrame {
	/// Create a new [`AttachedPictureFrame`]
	pub fn new(
		encoding: TextEncoding,
		mime_type: Option<MimeType>,
		pic_type: PictureType,
		description: String,
		data: Vec<u8>,
	) -> Self {
		Self {
			header: FrameHeader::new(FRAME_ID, FrameFlags::default()),
			encoding,
			mime_type,
			pic_type,
			description,
			data,
		}
	}

	/// Get an [`AttachedPictureFrame`] from ID3v2 A/PIC bytes
	///
	/// NOTE: This expects *only* the frame content
	///
	/// # Errors
	///
	/// * There isn't enough data present
	/// * The description can't be decoded
	///
	/// ID3v2.2:
	///
	/// * The encoding is not [`TextEncoding::Latin1`] or [`TextEncoding::UTF16`]
	pub fn parse(
		content: &mut &[u8],
		frame_flags: FrameFlags,
		version: Id3v2Version,
	) -> Result<Option<Self>> {
		let Ok(encoding_byte) = content.read_u8() else {
			return Ok(None);
		};

		let encoding = verify_encoding(encoding_byte, version)?;

		let mime_type = if version == Id3v2Version::V2 {
			let mut format = [0; 3];
			content
				.read_exact(&mut format)
				.map_err(|_| Id3v2Error::new(Id3v2ErrorKind::BadFrameLength))?;

			Some(MimeType::from_id3v22_format(format))
		} else {
			let mime_type_str = decode_text(
				content,
				TextDecodeOptions::new()
					.encoding(TextEncoding::Latin1)
					.terminated(true),
			)?
			.content;

			(!mime_type_str.is_empty()).then(|| MimeType::from_str(&mime_type_str))
		};

		let pic_type = PictureType::from_u8(
			content
				.read_u8()
				.map_err(|_| Id3v2Error::new(Id3v2ErrorKind::BadFrameLength))?,
		);

		let description = decode_text(
			content,
			TextDecodeOptions::new().encoding(encoding).terminated(true),
		)?
		.content;

		let mut data = Vec::new();
		content.read_to_end(&mut data)?;

		Ok(Some(Self {
			header: FrameHeader::new(FRAME_ID, frame_flags),
			encoding,
			mime_type,
			pic_type,
			description,
			data,
		}))
	}

	/// Convert an [`AttachedPictureFrame`] to a ID3v2 A/PIC byte Vec
	///
	/// NOTE: This does not include the frame header
	///
	/// # Errors
	///
	/// * Too much data was provided
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	///
	/// ID3v2.2:
	///
	/// * The MIME type has no 3 character format (see [`MimeType::as_id3v22_format`])
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = self.encoding.for_version(version);

		let mut data = vec![encoding as u8];

		if version == Id3v2Version::V2 {
			let format = self
				.mime_type
				.as_ref()
				.and_then(MimeType::as_id3v22_format)
				.ok_or_else(|| {
					let mime_type = self.mime_type.as_ref().map(MimeType::as_str);
					Id3v2Error::new(Id3v2ErrorKind::BadPictureFormat(
						mime_type.unwrap_or_default().to_owned(),
					))
				})?;

			data.extend(format);
		} else {
			if let Some(mime_type) = &self.mime_type {
				data.extend(mime_type.as_str().as_bytes());
			}
			data.push(0);
		}

		data.push(self.pic_type.as_u8());
		data.extend(encoding.encode(
			&self.description,
			true,
			write_options.lossy_text_encoding,
		)?);
		data.extend(&self.data);

		if data.len() as u64 > u64::from(u32::MAX) {
			err!(TooMuchData);
		}

		Ok(data)
	}
}
