use crate::config::WriteOptions;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::frame::FrameFlags;
use crate::id3::v2::frame::content::TIMESTAMP_FRAMES;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::id3::v2::util::upgrade::downgrade_v4_to_v2;
use crate::id3::v2::Frame;
use crate::macros::err;

use byteorder::{BigEndian, WriteBytesExt};

/// The ID a frame is written with in a tag of `version`
///
/// Returns `None` if the frame has no counterpart in that version.
pub(in crate::id3::v2) fn id_for_version(frame: &Frame, version: Id3v2Version) -> Option<&str> {
	let id = frame.id();
	let id_str = id.as_str();

	// Outdated IDs are only known to ID3v2.2
	if id.is_outdated() {
		return (version == Id3v2Version::V2).then_some(id_str);
	}

	match version {
		Id3v2Version::V4 => Some(id_str),
		Id3v2Version::V3 => Some(match id_str {
			"TDRC" => "TYER",
			"TDOR" => "TORY",
			"TIPL" => "IPLS",
			_ => id_str,
		}),
		Id3v2Version::V2 => match id_str {
			"TDRC" | "TYER" => Some("TYE"),
			"TDOR" | "TORY" => Some("TOR"),
			"IPLS" => Some("IPL"),
			_ => downgrade_v4_to_v2(id_str),
		},
	}
}

/// Write a single frame, header included
///
/// # Errors
///
/// * The frame has no ID in `version` (`ErrorKind::InvalidFrame`)
/// * The frame's variant doesn't match its ID
/// * The content is too large for the frame's size field
pub(crate) fn write_single_frame(
	out: &mut Vec<u8>,
	frame: &Frame,
	version: Id3v2Version,
	write_options: WriteOptions,
) -> Result<()> {
	let Some(id) = id_for_version(frame, version) else {
		err!(InvalidFrame(format!(
			"{} has no ID3v2.{} counterpart",
			frame.id_str(),
			version.major()
		)));
	};

	verify_frame(frame)?;

	let mut flags = frame.flags().for_write();
	// Content is held as-is after reading, even for encrypted frames
	flags.unsynchronisation = false;

	if version == Id3v2Version::V2 && (flags.encryption.is_some() || flags.compression) {
		err!(InvalidFrame(format!(
			"{} is encrypted, which ID3v2.2 cannot represent",
			frame.id_str()
		)));
	}

	let content = frame.as_bytes(version, write_options)?;
	let extra = extra_bytes(flags, version)?;

	let Ok(len) = u32::try_from(content.len() + extra.len()) else {
		err!(TooMuchData);
	};

	log::trace!("Writing frame {id} ({len} bytes)");

	write_frame_header(out, id, len, flags, version)?;
	out.extend(extra);
	out.extend(content);

	Ok(())
}

fn verify_frame(frame: &Frame) -> Result<()> {
	match (frame.id().as_str(), frame) {
		("APIC", Frame::Picture(_))
		| ("COMM", Frame::Comment(_))
		| ("TXXX", Frame::UserText(_))
		| ("WXXX", Frame::UserUrl(_))
		| (_, Frame::Binary(_))
		| ("PRIV", Frame::Private(_))
		| ("IPLS", Frame::Text(_)) => Ok(()),
		(id, Frame::Timestamp(_)) if TIMESTAMP_FRAMES.contains(&id) => Ok(()),
		(id, Frame::Text(_)) if id.starts_with('T') && id != "TXXX" => Ok(()),
		(id, Frame::Url(_)) if id.starts_with('W') && id != "WXXX" => Ok(()),
		(id, frame_value) => Err(Id3v2Error::new(Id3v2ErrorKind::BadFrame(
			id.to_string(),
			frame_value.name(),
		))
		.into()),
	}
}

// Data length indicator, encryption method, and group identifier, in on-disk order
fn extra_bytes(flags: FrameFlags, version: Id3v2Version) -> Result<Vec<u8>> {
	let mut extra = Vec::new();

	match version {
		Id3v2Version::V2 => {},
		Id3v2Version::V3 => {
			if flags.compression {
				let Some(len) = flags.data_length_indicator else {
					return Err(Id3v2Error::new(Id3v2ErrorKind::MissingDataLengthIndicator).into());
				};

				extra.write_u32::<BigEndian>(len)?;
			}

			extra.extend(flags.encryption);
			extra.extend(flags.grouping_identity);
		},
		Id3v2Version::V4 => {
			extra.extend(flags.grouping_identity);
			extra.extend(flags.encryption);

			if let Some(len) = flags.data_length_indicator {
				extra.write_u32::<BigEndian>(len.synch()?)?;
			}
		},
	}

	Ok(extra)
}

fn write_frame_header(
	out: &mut Vec<u8>,
	id: &str,
	len: u32,
	flags: FrameFlags,
	version: Id3v2Version,
) -> Result<()> {
	out.extend(id.as_bytes());

	match version {
		Id3v2Version::V2 => {
			if len > 0x00FF_FFFF {
				err!(TooMuchData);
			}

			out.write_u24::<BigEndian>(len)?;
		},
		Id3v2Version::V3 => {
			out.write_u32::<BigEndian>(len)?;
			out.write_u16::<BigEndian>(flags.as_id3v23_bytes())?;
		},
		Id3v2Version::V4 => {
			out.write_u32::<BigEndian>(len.synch()?)?;
			out.write_u16::<BigEndian>(flags.as_id3v24_bytes())?;
		},
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::write_single_frame;
	use crate::config::WriteOptions;
	use crate::id3::v2::{
		BinaryFrame, Frame, FrameFlags, FrameId, Id3v2Version, PrivateFrame, TextInformationFrame,
		decode_frame,
	};
	use crate::util::text::TextEncoding;

	fn encode(frame: &Frame, version: Id3v2Version) -> crate::error::Result<Vec<u8>> {
		let mut out = Vec::new();
		write_single_frame(&mut out, frame, version, WriteOptions::default())?;
		Ok(out)
	}

	fn title() -> Frame {
		Frame::Text(TextInformationFrame::new(
			FrameId::new("TIT2").unwrap(),
			TextEncoding::Latin1,
			vec![String::from("Foo")],
		))
	}

	#[test_log::test]
	fn header_per_version() {
		assert_eq!(
			encode(&title(), Id3v2Version::V4).unwrap(),
			b"TIT2\x00\x00\x00\x04\x00\x00\x00Foo"
		);
		assert_eq!(
			encode(&title(), Id3v2Version::V3).unwrap(),
			b"TIT2\x00\x00\x00\x04\x00\x00\x00Foo"
		);
		assert_eq!(
			encode(&title(), Id3v2Version::V2).unwrap(),
			b"TT2\x00\x00\x04\x00Foo"
		);
	}

	#[test_log::test]
	fn synchsafe_frame_size() {
		let frame = Frame::Private(PrivateFrame::new(String::from("foo"), vec![1; 200]));

		let v4 = encode(&frame, Id3v2Version::V4).unwrap();
		// 4 bytes of owner + 200 bytes of data = 204 (0xCC) => 0x014C synchsafe
		assert_eq!(&v4[4..8], &[0, 0, 0x01, 0x4C]);

		let v3 = encode(&frame, Id3v2Version::V3).unwrap();
		assert_eq!(&v3[4..8], &[0, 0, 0, 0xCC]);
	}

	#[test_log::test]
	fn no_v2_counterpart() {
		let frame = Frame::Private(PrivateFrame::new(String::from("foo"), vec![1]));
		assert!(encode(&frame, Id3v2Version::V2).is_err());
	}

	#[test_log::test]
	fn outdated_only_written_to_v2() {
		let frame = Frame::Binary(BinaryFrame::new(FrameId::new("XYZ").unwrap(), vec![1, 2]));

		assert_eq!(encode(&frame, Id3v2Version::V2).unwrap(), b"XYZ\x00\x00\x02\x01\x02");
		assert!(encode(&frame, Id3v2Version::V4).is_err());
	}

	#[test_log::test]
	fn mismatched_variant() {
		let frame = Frame::Binary(BinaryFrame::new(FrameId::new("TIT2").unwrap(), vec![0, 1]));
		assert!(encode(&frame, Id3v2Version::V4).is_ok());

		let frame = Frame::Text(TextInformationFrame::new(
			FrameId::new("WOAR").unwrap(),
			TextEncoding::Latin1,
			vec![String::from("Foo")],
		));
		assert!(encode(&frame, Id3v2Version::V4).is_err());
	}

	#[test_log::test]
	fn grouped_frame_round_trip() {
		let mut frame = title();
		frame.set_flags(FrameFlags {
			grouping_identity: Some(7),
			..FrameFlags::default()
		});

		for version in [Id3v2Version::V3, Id3v2Version::V4] {
			let bytes = encode(&frame, version).unwrap();
			// Group byte, then the content
			assert_eq!(&bytes[10..], b"\x07\x00Foo");

			let decoded = decode_frame(&bytes, version).unwrap();
			assert_eq!(decoded, frame);
		}
	}

	#[test_log::test]
	fn encrypted_frame_kept() {
		let mut frame = Frame::Binary(BinaryFrame::new(FrameId::new("TIT2").unwrap(), vec![9; 4]));
		frame.set_flags(FrameFlags {
			encryption: Some(0x80),
			data_length_indicator: Some(10),
			..FrameFlags::default()
		});

		let bytes = encode(&frame, Id3v2Version::V4).unwrap();
		// Encryption method, then the data length indicator
		assert_eq!(&bytes[10..15], &[0x80, 0, 0, 0, 10]);
		assert_eq!(decode_frame(&bytes, Id3v2Version::V4).unwrap(), frame);

		assert!(encode(&frame, Id3v2Version::V2).is_err());
	}
}
