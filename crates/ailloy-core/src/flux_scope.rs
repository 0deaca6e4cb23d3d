//! Adapts `ailloy-manifest`'s `FluxVar` schema into `ailloy-flux`'s
//! decoupled `schema_defaults`/`layer` shape, and parses the
//! `-f/--values` and `--set` CLI inputs into the same layers.

use ailloy_flux::{layer, parse_inline_override, schema_defaults, FluxTree};
use ailloy_manifest::{load_flux_defaults, BundleFs, FluxVar};

use crate::error::AilloyError;

/// Build the effective flux scope for one operation: schema defaults from
/// `flux_schema`, the mold's own `flux.yaml`, `overlay_yaml` files in the
/// order given, then `inline_overrides` (`name=value` strings from
/// `--set`), last writer wins at every layer.
pub fn build_flux_scope(
    fs: &dyn BundleFs,
    flux_schema: &[FluxVar],
    overlay_yaml: &[String],
    inline_overrides: &[String],
) -> Result<FluxTree, AilloyError> {
    let defaults = schema_defaults(
        flux_schema
            .iter()
            .filter_map(|var| var.default.as_ref().map(|d| (var.name.clone(), d.clone()))),
    );
    let mold_flux = load_flux_defaults(fs)?;

    let overlays = overlay_yaml
        .iter()
        .map(|raw| FluxTree::from_yaml(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let overrides = inline_overrides
        .iter()
        .map(|raw| parse_inline_override(raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(layer(defaults, mold_flux, overlays, overrides))
}
