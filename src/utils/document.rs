//! Source document loading.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Read a research document as UTF-8 text.
///
/// Accepts `.md`, `.markdown`, `.txt`, and files without an extension. A leading byte-order mark is dropped.
pub fn read_document(path: &Path) -> Result<String> {
    if !path.exists() {
        bail!("Document file '{}' does not exist", path.display());
    }
    if !path.is_file() {
        bail!("'{}' is not a file", path.display());
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "md" | "markdown" | "txt" | "" => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read file '{}'", path.display()))?;
            Ok(text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text))
        }
        _ => bail!("Unsupported file type: .{}\nCurrently supported: .md, .markdown, .txt, and files without extension", extension),
    }
}
