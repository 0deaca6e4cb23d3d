//! The flux value tree: a dotted-path tagged-variant tree plus
//! the layering pipeline that composes it for one operation.

mod error;
mod layering;
mod tree;
mod yaml;

pub use error::FluxError;
pub use layering::{layer, schema_defaults};
pub use tree::FluxTree;
pub use yaml::parse_inline_override;
