//! Manifest and schema data model, and the YAML loader for mold and ingot
//! manifests (bundle descriptor parsing, flux schema/defaults loading).

mod error;
mod fs_view;
mod loader;
mod model;

pub use error::ManifestError;
pub use fs_view::{BundleFs, DirBundleFs};
pub use loader::{load_flux_defaults, load_flux_schema, load_ingot, load_mold};
pub use model::{
    Author, DiscoverSpec, FileSpec, FluxType, FluxVar, IngotManifest, MoldManifest, OutputCategory,
    OutputSpec, ResolvedFile, API_VERSION,
};
