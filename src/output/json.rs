//! JSON output writer

use crate::output::results::CategoryResults;
use crate::LedgerError;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;

/// Renders results as pretty JSON with four-space indentation
///
/// Non-ASCII characters are written literally.
pub fn render_json(results: &CategoryResults) -> Result<Vec<u8>, LedgerError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    results.serialize(&mut serializer)?;
    Ok(buf)
}

/// Writes results to `path`, creating parent directories as needed
///
/// The document goes to a sibling temporary file first and is renamed into place, so
/// a reader never sees a partially written file.
pub fn write_json(results: &CategoryResults, path: &Path) -> Result<(), LedgerError> {
    let rendered = render_json(results)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| LedgerError::Output(format!("Invalid output path: {}", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, rendered)?;
    std::fs::rename(&tmp_path, path)?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
