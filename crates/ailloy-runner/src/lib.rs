//! Abstract, argv-only process execution. Owns the boundary between the
//! core and the `git`/`gh` binaries: nothing outside this crate ever calls
//! `std::process::Command` directly for those tools.

mod command_spec;
mod error;
mod process;

pub use command_spec::CommandSpec;
pub use error::RunnerError;
pub use process::{NativeRunner, ProcessOutput, ProcessRunner};
