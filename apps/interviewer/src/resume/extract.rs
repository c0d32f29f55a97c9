//! Document text extraction for uploaded résumés.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("extraction task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Extracts plain text from a résumé file.
///
/// `.pdf` files go through `pdf-extract` on a blocking thread; anything else
/// is read as UTF-8 text (lossily).
pub async fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let path = path.to_path_buf();
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    let text = if is_pdf {
        let bytes = tokio::fs::read(&path).await.map_err(|source| ExtractError::Io {
            path: path.clone(),
            source,
        })?;
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await?
            .map_err(|e| ExtractError::Pdf(e.to_string()))?
    } else {
        let bytes = tokio::fs::read(&path).await.map_err(|source| ExtractError::Io {
            path: path.clone(),
            source,
        })?;
        String::from_utf8_lossy(&bytes).into_owned()
    };

    Ok(normalize_text(&text))
}

/// Tolerant wrapper around [`extract_text`]: failures are logged and yield "".
pub async fn extract_text_or_empty(path: &Path) -> String {
    match extract_text(path).await {
        Ok(text) => {
            info!("Extracted {} characters from {}", text.len(), path.display());
            text
        }
        Err(e) => {
            warn!("Text extraction failed ({e}); continuing with an empty résumé");
            String::new()
        }
    }
}

/// Drops blank lines and trailing whitespace, one page line per output line.
fn normalize_text(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
