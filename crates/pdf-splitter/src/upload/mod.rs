//! Remote upload of produced files

mod rclone;

use std::path::Path;

use crate::error::Result;

pub use rclone::RcloneUploader;

/// Something that can publish a local file and hand back a shareable link
#[cfg_attr(test, mockall::automock)]
pub trait Uploader {
    /// Upload `path`, returning its remote link
    fn upload(&self, path: &Path) -> Result<String>;
}
