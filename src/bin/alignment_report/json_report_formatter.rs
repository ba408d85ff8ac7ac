use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use massalign::Report;

/// Pretty-printed alignment report, newline-terminated. Missing parent
/// directories are created.
pub fn write_report(path: &Path, report: &Report) -> Result<(), String> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|err| {
            format!("Cannot create report directory '{}': {err}", dir.display())
        })?;
    }

    let file = File::create(path)
        .map_err(|err| format!("Cannot create report '{}': {err}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, report).map_err(|err| {
        format!(
            "Cannot serialize report for '{}' against '{}': {err}",
            report.meta.source_path, report.meta.target_path
        )
    })?;
    writeln!(out)
        .and_then(|()| out.flush())
        .map_err(|err| format!("Cannot write report '{}': {err}", path.display()))
}
