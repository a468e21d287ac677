//! Filesystem-safe output names

use std::collections::HashSet;

/// Reduce an identifier to a safe file stem
///
/// ASCII alphanumerics, `-`, `_` and `.` are kept; anything else becomes `_`.
/// Leading/trailing dots and underscores are trimmed so the result can never
/// be a relative path component like `..`.
pub fn sanitize_file_stem(raw: &str, fallback: &str) -> String {
    let replaced: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = replaced.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        if raw == fallback {
            return "output".to_string();
        }
        return sanitize_file_stem(fallback, fallback);
    }
    trimmed.to_string()
}

/// Hands out unique file names within one run
#[derive(Debug)]
pub struct FileNamer {
    extension: String,
    used: HashSet<String>,
}

impl FileNamer {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            used: HashSet::new(),
        }
    }

    /// `stem.ext`, then `stem-2.ext`, `stem-3.ext`, ...
    pub fn next(&mut self, stem: &str) -> String {
        let mut counter = 1usize;
        loop {
            let candidate = if counter == 1 {
                format!("{}.{}", stem, self.extension)
            } else {
                format!("{}-{}.{}", stem, counter, self.extension)
            };
            // Case-insensitive filesystems treat these as the same file
            if self.used.insert(candidate.to_lowercase()) {
                return candidate;
            }
            counter += 1;
        }
    }
}
