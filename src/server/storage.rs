use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::image_pipeline::{AnalysisResult, Result};

static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("Invalid regex pattern"));

const FALLBACK_FILENAME: &str = "upload";

/// Turns a client-supplied name into a flat, ASCII-only file name.
///
/// Path separators become spaces, whitespace runs collapse to `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped and leading or trailing `.`/`_` are
/// trimmed, so the result can never leave the directory it is joined onto.
pub fn sanitize_filename(name: &str) -> String {
    let ascii: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_ascii_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = DISALLOWED_CHARS.replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(['.', '_']);

    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Where uploads and rendered overlays are kept.
#[derive(Debug, Clone)]
pub struct StorageDirs {
    uploads: PathBuf,
    outputs: PathBuf,
}

impl StorageDirs {
    /// Creates both directories if needed.
    pub fn provision(uploads: impl Into<PathBuf>, outputs: impl Into<PathBuf>) -> Result<Self> {
        let dirs = Self {
            uploads: uploads.into(),
            outputs: outputs.into(),
        };
        std::fs::create_dir_all(&dirs.uploads)?;
        std::fs::create_dir_all(&dirs.outputs)?;
        debug!(
            uploads = %dirs.uploads.display(),
            outputs = %dirs.outputs.display(),
            "Storage directories ready"
        );
        Ok(dirs)
    }

    pub fn uploads(&self) -> &Path {
        &self.uploads
    }

    pub fn outputs(&self) -> &Path {
        &self.outputs
    }

    /// `filename` must already be sanitized.
    pub fn save_upload(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.uploads.join(filename);
        std::fs::write(&path, data)?;
        Ok(path)
    }

    pub fn save_overlays(
        &self,
        filename: &str,
        result: &AnalysisResult,
    ) -> Result<(PathBuf, PathBuf)> {
        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_FILENAME);
        result.write_overlays(&self.outputs, stem)
    }
}
