//! Picture types and MIME types for `APIC` frames

use std::fmt::{Display, Formatter};

/// MIME types for pictures.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum MimeType {
	/// PNG image
	Png,
	/// JPEG image
	Jpeg,
	/// TIFF image
	Tiff,
	/// BMP image
	Bmp,
	/// GIF image
	Gif,
	/// Some unknown MIME type
	Unknown(String),
}

impl MimeType {
	/// Get a `MimeType` from a string
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::picture::MimeType;
	///
	/// let jpeg_mimetype_str = "image/jpeg";
	/// assert_eq!(MimeType::from_str(jpeg_mimetype_str), MimeType::Jpeg);
	/// ```
	#[must_use]
	#[allow(clippy::should_implement_trait)] // Infallible in contrast to FromStr
	pub fn from_str(mime_type: &str) -> Self {
		match &*mime_type.to_lowercase() {
			"image/jpeg" | "image/jpg" => Self::Jpeg,
			"image/png" => Self::Png,
			"image/tiff" => Self::Tiff,
			"image/bmp" => Self::Bmp,
			"image/gif" => Self::Gif,
			_ => Self::Unknown(mime_type.to_owned()),
		}
	}

	/// Get a &str from a `MimeType`
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::picture::MimeType;
	///
	/// let jpeg_mimetype = MimeType::Jpeg;
	/// assert_eq!(jpeg_mimetype.as_str(), "image/jpeg")
	/// ```
	#[must_use]
	pub fn as_str(&self) -> &str {
		match self {
			MimeType::Jpeg => "image/jpeg",
			MimeType::Png => "image/png",
			MimeType::Tiff => "image/tiff",
			MimeType::Bmp => "image/bmp",
			MimeType::Gif => "image/gif",
			MimeType::Unknown(unknown) => unknown,
		}
	}

	/// Get a `MimeType` from an `ID3v2.2` `PIC` image format
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::picture::MimeType;
	///
	/// assert_eq!(MimeType::from_id3v22_format(*b"JPG"), MimeType::Jpeg);
	/// assert_eq!(
	/// 	MimeType::from_id3v22_format(*b"-->"),
	/// 	MimeType::Unknown(String::from("-->"))
	/// );
	/// ```
	pub fn from_id3v22_format(format: [u8; 3]) -> Self {
		match format.to_ascii_uppercase().as_slice() {
			b"PNG" => Self::Png,
			b"JPG" => Self::Jpeg,
			b"TIF" => Self::Tiff,
			b"BMP" => Self::Bmp,
			b"GIF" => Self::Gif,
			_ => Self::Unknown(String::from_utf8_lossy(&format).into_owned()),
		}
	}

	/// Get the `ID3v2.2` `PIC` image format for the `MimeType`
	///
	/// Returns `None` for unknown MIME types that aren't exactly 3 bytes long.
	///
	/// # Examples
	///
	/// ```rust
	/// use shelltag::picture::MimeType;
	///
	/// assert_eq!(MimeType::Png.as_id3v22_format(), Some(*b"PNG"));
	/// assert_eq!(MimeType::from_str("image/webp").as_id3v22_format(), None);
	/// ```
	pub fn as_id3v22_format(&self) -> Option<[u8; 3]> {
		match self {
			MimeType::Png => Some(*b"PNG"),
			MimeType::Jpeg => Some(*b"JPG"),
			MimeType::Tiff => Some(*b"TIF"),
			MimeType::Bmp => Some(*b"BMP"),
			MimeType::Gif => Some(*b"GIF"),
			MimeType::Unknown(unknown) => unknown.as_bytes().try_into().ok(),
		}
	}
}

impl Display for MimeType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The picture type, according to ID3v2 APIC
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[non_exhaustive]
pub enum PictureType {
	#[default]
	Other,
	Icon,
	OtherIcon,
	CoverFront,
	CoverBack,
	Leaflet,
	Media,
	LeadArtist,
	Artist,
	Conductor,
	Band,
	Composer,
	Lyricist,
	RecordingLocation,
	DuringRecording,
	DuringPerformance,
	ScreenCapture,
	BrightFish,
	Illustration,
	BandLogo,
	PublisherLogo,
	Undefined(u8),
}

impl PictureType {
	/// Get a `u8` from a `PictureType` according to ID3v2 APIC
	pub fn as_u8(&self) -> u8 {
		match self {
			Self::Other => 0,
			Self::Icon => 1,
			Self::OtherIcon => 2,
			Self::CoverFront => 3,
			Self::CoverBack => 4,
			Self::Leaflet => 5,
			Self::Media => 6,
			Self::LeadArtist => 7,
			Self::Artist => 8,
			Self::Conductor => 9,
			Self::Band => 10,
			Self::Composer => 11,
			Self::Lyricist => 12,
			Self::RecordingLocation => 13,
			Self::DuringRecording => 14,
			Self::DuringPerformance => 15,
			Self::ScreenCapture => 16,
			Self::BrightFish => 17,
			Self::Illustration => 18,
			Self::BandLogo => 19,
			Self::PublisherLogo => 20,
			Self::Undefined(i) => *i,
		}
	}

	/// Get a `PictureType` from a u8 according to ID3v2 APIC
	///
	/// Values outside of the defined range are kept as [`PictureType::Undefined`], so they
	/// survive being written back.
	pub fn from_u8(byte: u8) -> Self {
		match byte {
			0 => Self::Other,
			1 => Self::Icon,
			2 => Self::OtherIcon,
			3 => Self::CoverFront,
			4 => Self::CoverBack,
			5 => Self::Leaflet,
			6 => Self::Media,
			7 => Self::LeadArtist,
			8 => Self::Artist,
			9 => Self::Conductor,
			10 => Self::Band,
			11 => Self::Composer,
			12 => Self::Lyricist,
			13 => Self::RecordingLocation,
			14 => Self::DuringRecording,
			15 => Self::DuringPerformance,
			16 => Self::ScreenCapture,
			17 => Self::BrightFish,
			18 => Self::Illustration,
			19 => Self::BandLogo,
			20 => Self::PublisherLogo,
			i => Self::Undefined(i),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{MimeType, PictureType};

	#[test_log::test]
	fn id3v22_formats() {
		assert_eq!(MimeType::from_id3v22_format(*b"png"), MimeType::Png);
		assert_eq!(MimeType::from_id3v22_format(*b"JPG"), MimeType::Jpeg);
		assert_eq!(
			MimeType::from_id3v22_format(*b"WEB"),
			MimeType::Unknown(String::from("WEB"))
		);
		assert_eq!(MimeType::Gif.as_id3v22_format(), Some(*b"GIF"));
	}

	#[test_log::test]
	fn picture_type_preserved() {
		for byte in 0..=u8::MAX {
			assert_eq!(PictureType::from_u8(byte).as_u8(), byte);
		}
	}
}
