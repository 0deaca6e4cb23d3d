//! Composes the leaf crates (`ailloy-manifest`, `ailloy-flux`,
//! `ailloy-template`, `ailloy-reference`, `ailloy-cache`, `ailloy-foundry`,
//! `ailloy-temper`, `ailloy-wizard`, `ailloy-runner`) into the operations
//! behind each CLI verb: `cast`, `forge`, `temper`, `anneal`, `quench`,
//! `recast`, `smelt`, and `foundry add/list/remove/update/search`.

mod bundle;
pub mod config;
pub mod error;
mod flux_scope;
mod foundry_ops;
mod ingot;
mod ops;
mod output;
mod scaffold;
mod smelt;

pub use bundle::{lock_entry_for, resolve_bundle, ResolvedBundle};
pub use config::{home_dir, FoundryRegistryEntry, GlobalConfig};
pub use error::{error_to_exit_code, AilloyError};
pub use flux_scope::build_flux_scope;
pub use foundry_ops::{foundry_add, foundry_list, foundry_remove, foundry_search, foundry_update};
pub use ingot::FsIngotResolver;
pub use ops::{cast, forge, quench, recast, render_bundle, CastReport, FluxOverrides, IngotSearchDirs, RecastChange, RenderedFile};
pub use output::resolve_output;
pub use scaffold::new_bundle;
pub use smelt::smelt;

pub use ailloy_temper::{temper, Diagnostic, Severity, ValidationResult};
pub use ailloy_wizard::WizardEngine;
