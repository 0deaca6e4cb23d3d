//! Read-only filesystem view abstraction.
//!
//! Every component that walks a bundle (the ingot resolver, the output
//! resolver, temper) does so through this trait rather than touching
//! `std::fs` directly, so cache entries, ingot search paths, and plain
//! directories on disk are all interchangeable.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;

/// A read-only view of a directory tree, rooted somewhere on disk.
pub trait BundleFs {
    /// Absolute root this view is rooted at.
    fn root(&self) -> &Utf8Path;

    /// Read a file at a path relative to `root()`.
    fn read_to_string(&self, rel: &Utf8Path) -> io::Result<String>;

    /// Whether a relative path exists (file or directory).
    fn exists(&self, rel: &Utf8Path) -> bool;

    /// Recursively list regular files under a relative directory, in
    /// lexicographic order.
    fn walk_files(&self, rel: &Utf8Path) -> io::Result<Vec<Utf8PathBuf>>;
}

/// A `BundleFs` backed directly by the local filesystem.
#[derive(Debug, Clone)]
pub struct DirBundleFs {
    root: Utf8PathBuf,
}

impl DirBundleFs {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn abs(&self, rel: &Utf8Path) -> Utf8PathBuf {
        self.root.join(rel)
    }
}

impl BundleFs for DirBundleFs {
    fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn read_to_string(&self, rel: &Utf8Path) -> io::Result<String> {
        fs::read_to_string(self.abs(rel))
    }

    fn exists(&self, rel: &Utf8Path) -> bool {
        self.abs(rel).exists()
    }

    fn walk_files(&self, rel: &Utf8Path) -> io::Result<Vec<Utf8PathBuf>> {
        let mut out = Vec::new();
        walk_dir_sorted(&self.abs(rel), rel, &mut out)?;
        out.sort();
        Ok(out)
    }
}

fn walk_dir_sorted(abs_dir: &Utf8Path, rel_dir: &Utf8Path, out: &mut Vec<Utf8PathBuf>) -> io::Result<()> {
    if !abs_dir.exists() {
        return Ok(());
    }
    let mut entries: Vec<_> = fs::read_dir(abs_dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let child_rel = rel_dir.join(name.as_ref());
        let child_abs = abs_dir.join(name.as_ref());
        if entry.file_type()?.is_dir() {
            walk_dir_sorted(&child_abs, &child_rel, out)?;
        } else {
            out.push(child_rel);
        }
    }
    Ok(())
}
