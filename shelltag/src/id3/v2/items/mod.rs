mod attached_picture_frame;
mod binary_frame;
mod comment_frame;
mod extended_text_frame;
mod extended_url_frame;
mod private_frame;
mod text_information_frame;
mod timestamp;
mod timestamp_frame;
mod url_link_frame;

pub use attached_picture_frame::AttachedPictureFrame;
pub use binary_frame::BinaryFrame;
pub use comment_frame::CommentFrame;
pub use extended_text_frame::ExtendedTextFrame;
pub use extended_url_frame::ExtendedUrlFrame;
pub use private_frame::PrivateFrame;
pub use text_information_frame::TextInformationFrame;
pub use timestamp::Timestamp;
pub use timestamp_frame::TimestampFrame;
pub use url_link_frame::UrlLinkFrame;
