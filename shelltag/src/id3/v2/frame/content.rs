use crate::config::ParsingMode;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::items::{
	AttachedPictureFrame, CommentFrame, ExtendedTextFrame, ExtendedUrlFrame, PrivateFrame,
	TextInformationFrame, TimestampFrame, UrlLinkFrame,
};
use crate::id3::v2::{BinaryFrame, Frame, FrameFlags, FrameId};
use crate::util::text::TextEncoding;

/// The frames holding an ISO 8601 timestamp
pub(crate) const TIMESTAMP_FRAMES: &[&str] = &["TDEN", "TDOR", "TDRC", "TDRL", "TDTG"];

#[rustfmt::skip]
pub(super) fn parse_content(
	content: &mut &[u8],
	id: FrameId,
	flags: FrameFlags,
	version: Id3v2Version,
	parse_mode: ParsingMode,
) -> Result<Option<Frame>> {
	log::trace!("Parsing frame content for ID: {}", id);

	if id.is_outdated() {
		return Ok(Some(Frame::Binary(BinaryFrame::parse(content, id, flags))));
	}

	Ok(match id.as_str() {
		// The ID was previously upgraded, but the content remains unchanged, so version is necessary
		"APIC" => AttachedPictureFrame::parse(content, flags, version)?.map(Frame::Picture),
		"TXXX" => ExtendedTextFrame::parse(content, flags, version)?.map(Frame::UserText),
		"WXXX" => ExtendedUrlFrame::parse(content, flags, version)?.map(Frame::UserUrl),
		"COMM" => CommentFrame::parse(content, flags, version)?.map(Frame::Comment),
		"PRIV" => PrivateFrame::parse(content, flags)?.map(Frame::Private),
		i if TIMESTAMP_FRAMES.contains(&i) => TimestampFrame::parse(content, id, flags, version, parse_mode)?.map(Frame::Timestamp),
		i if i.starts_with('T') => TextInformationFrame::parse(content, id, flags, version)?.map(Frame::Text),
		i if i.starts_with('W') => UrlLinkFrame::parse(content, id, flags)?.map(Frame::Url),
		// GEOB, USLT, POPM, and any unknown frames
		_ => Some(Frame::Binary(BinaryFrame::parse(content, id, flags))),
	})
}

pub(in crate::id3::v2) fn verify_encoding(
	encoding: u8,
	version: Id3v2Version,
) -> Result<TextEncoding> {
	if version == Id3v2Version::V2 && (encoding != 0 && encoding != 1) {
		return Err(Id3v2Error::new(Id3v2ErrorKind::V2InvalidTextEncoding).into());
	}

	match TextEncoding::from_u8(encoding) {
		None => Err(Id3v2Error::new(Id3v2ErrorKind::BadTextEncoding(encoding)).into()),
		Some(e) => Ok(e),
	}
}
