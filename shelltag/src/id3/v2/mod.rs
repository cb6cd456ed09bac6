//! ID3v2 items and utilities
//!
//! ## Important notes
//!
//! Tags of every version are held in their `ID3v2.4` form. See:
//!
//! * [`Id3v2Tag`]
//! * [`Frame`]
//! * [`downgrade_v23`] and [`derive_v1`] for the lossy conversions to older versions

mod frame;
pub(crate) mod header;
mod items;
pub(crate) mod read;
pub(crate) mod tag;
mod transcode;
pub mod util;
pub(crate) mod write;

// Exports

pub use header::{Id3v2TagFlags, Id3v2Version};
pub use util::upgrade::{upgrade_v2, upgrade_v3};

pub use tag::Id3v2Tag;

pub use items::*;

pub use frame::header::{FrameHeader, FrameId};
pub use frame::{Frame, FrameFlags, FrameKey, decode_frame, encode_frame};

pub use transcode::{V23_MULTI_VALUE_SEPARATOR, derive_v1, downgrade_v23};
pub(crate) use transcode::fold_values;
