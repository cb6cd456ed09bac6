use super::Frame;
use super::content::parse_content;
use super::header::RawFrameHeader;
use crate::config::{ParseOptions, ParsingMode};
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::tag::ATTACHED_PICTURE_ID;
use crate::id3::v2::util::synchsafe::{SynchsafeInteger, UnsynchronizedStream};
use crate::id3::v2::{BinaryFrame, FrameFlags, FrameHeader, FrameId};

use std::io::Read;

/// Decode the content of a single frame
///
/// `content` is exactly `header.size` bytes. `tag_unsynchronised` is the `ID3v2.4` tag-level flag,
/// which applies to every frame.
///
/// Returns `None` for frames that are skipped (empty, or pictures when they aren't wanted).
pub(crate) fn decode_frame_content(
	header: RawFrameHeader<'_>,
	content: &[u8],
	version: Id3v2Version,
	tag_unsynchronised: bool,
	parse_options: ParseOptions,
) -> Result<Option<Frame>> {
	// Buffers for the unsynchronised and decompressed content, which must outlive `content`
	let unsynchronised;
	let decompressed;
	let mut content = content;

	// The ID will be upgraded to ID3v2.4 past this point, so they can all be treated the same
	let id = FrameId::from_raw(header.id, version)?;
	let mut flags = match version {
		Id3v2Version::V2 => FrameFlags::default(),
		Id3v2Version::V3 => FrameFlags::parse_id3v23(header.flags),
		Id3v2Version::V4 => FrameFlags::parse_id3v24(header.flags),
	};

	if tag_unsynchronised && version == Id3v2Version::V4 {
		flags.unsynchronisation = true;
	}

	if !parse_options.read_pictures && id.as_str() == ATTACHED_PICTURE_ID {
		log::trace!("Skipping picture frame");
		return Ok(None);
	}

	if content.is_empty() {
		if parse_options.parsing_mode == ParsingMode::Strict {
			return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
		}

		log::debug!("Encountered a zero length frame, skipping");
		return Ok(None);
	}

	read_extra_bytes(&mut content, &mut flags, version)?;

	// Frames must have at least 1 byte, *after* all of the additional data flags can provide
	if content.is_empty() {
		return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
	}

	// The flags are applied in the order:
	//
	// unsynchronisation -> compression -> encryption
	if flags.unsynchronisation {
		let mut buf = Vec::new();
		UnsynchronizedStream::new(content).read_to_end(&mut buf)?;
		unsynchronised = buf;
		content = &unsynchronised;
	}

	// Nothing further we can do with encrypted frames
	if flags.encryption.is_some() {
		if flags.data_length_indicator.is_none() {
			return Err(Id3v2Error::new(Id3v2ErrorKind::MissingDataLengthIndicator).into());
		}

		return Ok(Some(Frame::Binary(BinaryFrame {
			header: FrameHeader::new(id, flags),
			data: content.to_vec(),
		})));
	}

	if flags.compression {
		decompressed = decompress(content)?;
		content = &decompressed;
	}

	parse_content(
		&mut content,
		id,
		flags.for_write(),
		version,
		parse_options.parsing_mode,
	)
}

// Group identifier, encryption method, and data length indicator, in on-disk order
fn read_extra_bytes(
	content: &mut &[u8],
	flags: &mut FrameFlags,
	version: Id3v2Version,
) -> Result<()> {
	fn take<const N: usize>(content: &mut &[u8]) -> Result<[u8; N]> {
		let mut bytes = [0; N];
		content
			.read_exact(&mut bytes)
			.map_err(|_| Id3v2Error::new(Id3v2ErrorKind::BadFrameLength))?;
		Ok(bytes)
	}

	match version {
		Id3v2Version::V2 => {},
		Id3v2Version::V3 => {
			if flags.compression {
				log::trace!("Reading decompressed size");
				flags.data_length_indicator = Some(u32::from_be_bytes(take::<4>(content)?));
			}

			if let Some(method) = flags.encryption.as_mut() {
				log::trace!("Reading encryption method symbol");
				*method = take::<1>(content)?[0];
			}

			if let Some(group) = flags.grouping_identity.as_mut() {
				log::trace!("Reading group identifier");
				*group = take::<1>(content)?[0];
			}
		},
		Id3v2Version::V4 => {
			if let Some(group) = flags.grouping_identity.as_mut() {
				log::trace!("Reading group identifier");
				*group = take::<1>(content)?[0];
			}

			if let Some(method) = flags.encryption.as_mut() {
				log::trace!("Reading encryption method symbol");
				*method = take::<1>(content)?[0];
			}

			// Writers rarely follow the ID3v2.4 rules here, so while a data length indicator is
			// *written* for compressed frames, the flag **isn't always set**
			if flags.data_length_indicator.is_some() || flags.compression {
				log::trace!("Reading data length indicator");
				let len = u32::from_be_bytes(take::<4>(content)?).unsynch();
				flags.data_length_indicator = Some(len);
			}
		},
	}

	Ok(())
}

#[cfg(feature = "id3v2_compression_support")]
fn decompress(content: &[u8]) -> Result<Vec<u8>> {
	let mut decompressed = Vec::new();
	flate2::read::ZlibDecoder::new(content)
		.read_to_end(&mut decompressed)
		.map_err(|e| Id3v2Error::new(Id3v2ErrorKind::Decompression(e)))?;

	Ok(decompressed)
}

#[cfg(not(feature = "id3v2_compression_support"))]
fn decompress(_: &[u8]) -> Result<Vec<u8>> {
	Err(Id3v2Error::new(Id3v2ErrorKind::CompressedFrameEncountered).into())
}

#[cfg(test)]
mod tests {
	use super::decode_frame_content;
	use crate::config::{ParseOptions, ParsingMode};
	use crate::id3::v2::frame::header::RawFrameHeader;
	use crate::id3::v2::{Frame, Id3v2Version};

	fn raw(id: &'static [u8], flags: u16, content: &[u8]) -> RawFrameHeader<'static> {
		RawFrameHeader {
			id,
			size: content.len() as u32,
			flags,
		}
	}

	#[test_log::test]
	fn grouped_v4_frame() {
		// Grouping byte, then an ISO-8859-1 "Foo"
		let content = [0x7A, 0x00, b'F', b'o', b'o'];
		let frame = decode_frame_content(
			raw(b"TIT2", 0x0040, &content),
			&content,
			Id3v2Version::V4,
			false,
			ParseOptions::new(),
		)
		.unwrap()
		.unwrap();

		assert_eq!(frame.flags().grouping_identity, Some(0x7A));
		assert_eq!(frame.text_values(), Some(vec![String::from("Foo")]));
	}

	#[test_log::test]
	fn encrypted_frame_is_binary() {
		// Encryption method, then the data length indicator, then the opaque content
		let content = [0x81, 0x00, 0x00, 0x00, 0x03, 0xDE, 0xAD, 0xBE];
		let frame = decode_frame_content(
			raw(b"TIT2", 0x0005, &content),
			&content,
			Id3v2Version::V4,
			false,
			ParseOptions::new(),
		)
		.unwrap()
		.unwrap();

		let Frame::Binary(binary) = frame else {
			panic!("Expected a binary frame");
		};

		assert_eq!(binary.flags().encryption, Some(0x81));
		assert_eq!(binary.flags().data_length_indicator, Some(3));
		assert_eq!(binary.data, [0xDE, 0xAD, 0xBE]);
	}

	#[test_log::test]
	fn unsynchronised_frame() {
		let frame = decode_frame_content(
			raw(b"PRIV", 0x0000, &[]),
			&[0x00, b'a', 0x00, 0xFF, 0x00, 0xE0][..],
			Id3v2Version::V4,
			true,
			ParseOptions::new(),
		)
		.unwrap()
		.unwrap();

		let Frame::Private(private) = frame else {
			panic!("Expected a private frame");
		};

		assert_eq!(private.owner, "");
		assert_eq!(private.private_data, [b'a', 0x00, 0xFF, 0xE0]);
	}

	#[test_log::test]
	fn empty_frame() {
		let relaxed = decode_frame_content(
			raw(b"TIT2", 0, &[]),
			&[],
			Id3v2Version::V4,
			false,
			ParseOptions::new(),
		);
		assert!(relaxed.unwrap().is_none());

		let strict = decode_frame_content(
			raw(b"TIT2", 0, &[]),
			&[],
			Id3v2Version::V4,
			false,
			ParseOptions::new().parsing_mode(ParsingMode::Strict),
		);
		assert!(strict.is_err());
	}

	#[test_log::test]
	fn skip_pictures() {
		let content = [0x00, b'i', b'm', b'a', b'g', b'e', b'/', b'p', b'n', b'g', 0, 3, 0, 1];
		let frame = decode_frame_content(
			raw(b"APIC", 0, &content),
			&content,
			Id3v2Version::V4,
			false,
			ParseOptions::new().read_pictures(false),
		);
		assert!(frame.unwrap().is_none());
	}

	#[cfg(feature = "id3v2_compression_support")]
	#[test_log::test]
	fn compressed_v3_frame() {
		use flate2::Compression;
		use flate2::write::ZlibEncoder;
		use std::io::Write;

		let text = [0x00, b'F', b'o', b'o'];
		let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
		encoder.write_all(&text).unwrap();

		let mut content = (text.len() as u32).to_be_bytes().to_vec();
		content.extend(encoder.finish().unwrap());

		let frame = decode_frame_content(
			raw(b"TALB", 0x0080, &content),
			&content,
			Id3v2Version::V3,
			false,
			ParseOptions::new(),
		)
		.unwrap()
		.unwrap();

		assert_eq!(frame.id_str(), "TALB");
		assert_eq!(frame.text_values(), Some(vec![String::from("Foo")]));
		// Written back uncompressed
		assert!(!frame.flags().compression);
	}
}
