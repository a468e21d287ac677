//! Uploads through the `rclone` command line tool

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use crate::config::UploadConfig;
use crate::error::{Error, Result};

use super::Uploader;

/// Copies files to an rclone remote and asks rclone for a public link
#[derive(Debug, Clone)]
pub struct RcloneUploader {
    binary: String,
    remote: String,
}

impl RcloneUploader {
    /// Create an uploader for `remote` (e.g. `drive:reports/2024`)
    pub fn new(binary: impl Into<String>, remote: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            remote: remote.into(),
        }
    }

    /// Build from configuration; `None` when no remote is configured
    pub fn from_config(config: &UploadConfig) -> Option<Self> {
        config
            .remote
            .as_ref()
            .map(|remote| Self::new(config.rclone_binary.clone(), remote.clone()))
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Remote path of an uploaded file
    pub fn remote_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.remote.trim_end_matches('/'), file_name)
    }

    /// Run rclone, returning trimmed stdout
    fn run<I, S>(&self, file: &str, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| Error::upload_failed(file, format!("cannot run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::upload_failed(
                file,
                format!("{} exited with {}: {}", self.binary, output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Uploader for RcloneUploader {
    fn upload(&self, path: &Path) -> Result<String> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| Error::upload_failed(path.display().to_string(), "path has no file name"))?;

        tracing::debug!("rclone copy {} {}", path.display(), self.remote);
        self.run(&file_name, [OsStr::new("copy"), path.as_os_str(), OsStr::new(&self.remote)])?;

        let link = self.run(&file_name, ["link".to_string(), self.remote_path(&file_name)])?;
        if link.is_empty() {
            return Err(Error::upload_failed(file_name, "rclone returned no link"));
        }
        Ok(link)
    }
}
