use camino::Utf8Path;
use std::fs;
use std::io;

/// Write `contents` to `path` atomically: write to a sibling temp file,
/// then rename over the destination. Readers never observe a half-written
/// file.
pub fn write_atomic(path: &Utf8Path, contents: &str) -> io::Result<()> {
    let parent = path.parent().unwrap_or(Utf8Path::new("."));
    fs::create_dir_all(parent)?;
    let tmp_name = format!(".{}.tmp-{}", path.file_name().unwrap_or("lockfile"), std::process::id());
    let tmp_path = parent.join(tmp_name);
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Atomically publish a directory: build it under `staging`, then rename
/// into `dest`. Used by the fetcher to materialize a cache entry without
/// ever exposing a partial clone at its final path.
pub fn rename_into_place(staging: &Utf8Path, dest: &Utf8Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(staging, dest)
}
