//! Content-addressed bundle cache, advisory fetch locks, and the
//! project-local lockfile.

mod atomic;
mod cache;
mod error;
mod lockfile;

pub use atomic::write_atomic;
pub use cache::{cache_entry_path, fetch, ref_label, FetchLock, GitCloner, ProcessGitCloner};
pub use error::{CacheError, LockfileError};
pub use lockfile::{default_lockfile_path, LockEntry, LockFile};
