pub mod rank;
pub mod row;
pub mod upload;

pub use rank::*;
pub use upload::{decode_upload, UploadError};
