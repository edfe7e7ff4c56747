use std::fs;
use std::io;
use std::path::Path;
use uuid::Uuid;

/// Writes `contents` to a uniquely named sibling and renames it over `path`,
/// so readers never observe a half-written file.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let temp = parent.join(format!(".filekit-{}.tmp", Uuid::new_v4()));

    fs::write(&temp, contents)?;
    if let Err(e) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(e);
    }

    Ok(())
}
