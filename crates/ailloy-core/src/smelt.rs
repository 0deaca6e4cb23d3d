//! `smelt`: package the bundle at a project root into a deterministic
//! `.tar.gz` archive, using `tar::Builder` for the archive and
//! `flate2::write::GzEncoder` for compression — this crate's only
//! consumer of either, see DESIGN.md for why they're new dependencies
//! here.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use flate2::write::GzEncoder;
use flate2::Compression;

use ailloy_manifest::BundleFs;

use crate::error::AilloyError;

/// Walk every `BundleFs` entry under the bundle root in lexicographic
/// order (already guaranteed by `walk_files`) and tar+gzip them into one
/// archive. Two runs over an unchanged bundle produce byte-identical
/// output: file order is deterministic and `tar::Builder` writes mtimes
/// as zero unless told otherwise, which we rely on here.
pub fn smelt(fs: &dyn BundleFs, dest: &Utf8Path) -> Result<Utf8PathBuf, AilloyError> {
    let files = fs.walk_files(Utf8Path::new("")).map_err(|e| AilloyError::io(Utf8PathBuf::from("."), e))?;

    let archive_file = std::fs::File::create(dest).map_err(|e| AilloyError::io(dest.to_path_buf(), e))?;
    let encoder = GzEncoder::new(archive_file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for rel in &files {
        let contents = fs.read_to_string(rel).map_err(|e| AilloyError::io(rel.clone(), e))?;
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(0);
        header.set_cksum();
        builder
            .append_data(&mut header, rel.as_str(), contents.as_bytes())
            .map_err(|e| AilloyError::io(rel.clone(), e))?;
    }

    let encoder = builder.into_inner().map_err(|e| AilloyError::io(dest.to_path_buf(), e))?;
    encoder.finish().map_err(|e| AilloyError::io(dest.to_path_buf(), e))?;
    Ok(dest.to_path_buf())
}
