use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Writes `value` as pretty-printed JSON to `path`, creating missing parent
/// directories.
///
/// The document goes to a temp file in the same directory first and is then
/// renamed over `path`, so a crash never leaves a truncated file behind.
pub(crate) fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));
    let mut writer = BufWriter::new(std::fs::File::create(&tmp_path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Reads a JSON document from `path`.
pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
