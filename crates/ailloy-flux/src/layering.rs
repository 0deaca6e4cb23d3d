use crate::tree::FluxTree;

/// Build the schema-defaults layer from `(dotted_name,
/// default_string)` pairs. Kept decoupled from the manifest crate's
/// `FluxVar` type so this crate has no dependency on manifest parsing;
/// `ailloy-core` adapts `FluxVar` lists into this shape.
pub fn schema_defaults(defaults: impl IntoIterator<Item = (String, String)>) -> FluxTree {
    let mut tree = FluxTree::empty_map();
    for (name, raw) in defaults {
        tree.set_path(&name, FluxTree::coerce_default(&raw));
    }
    tree
}

/// Compose the effective `FluxValues` for one operation by applying, in
/// order, the schema defaults, the mold's own `flux.yaml`, the overlay
/// files (left to right), and finally the inline overrides.
pub fn layer(
    defaults: FluxTree,
    mold_flux: FluxTree,
    overlays: impl IntoIterator<Item = FluxTree>,
    inline_overrides: impl IntoIterator<Item = (String, FluxTree)>,
) -> FluxTree {
    let mut tree = defaults;
    tree.deep_merge(mold_flux);
    for overlay in overlays {
        tree.deep_merge(overlay);
    }
    for (path, value) in inline_overrides {
        tree.set_path(&path, value);
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::parse_inline_override;

    #[test]
    fn layering_is_monotonic_last_writer_wins() {
        let defaults = schema_defaults([("org".to_string(), "fallback".to_string())]);
        let mold_flux = FluxTree::from_yaml("org: a\n").unwrap();
        let overlay_a = FluxTree::from_yaml("org: b\n").unwrap();
        let (path, value) = parse_inline_override("org=c").unwrap();

        let result = layer(defaults, mold_flux, [overlay_a], [(path, value)]);
        assert_eq!(result.get_path("org").unwrap().as_str(), Some("c"));
    }

    #[test]
    fn nested_maps_merge_deeply() {
        let a = FluxTree::from_yaml("project:\n  org: acme\n  id: 1\n").unwrap();
        let b = FluxTree::from_yaml("project:\n  id: 2\n").unwrap();
        let result = layer(FluxTree::empty_map(), a, [b], []);
        assert_eq!(result.get_path("project.org").unwrap().as_str(), Some("acme"));
        assert_eq!(result.get_path("project.id").unwrap(), &FluxTree::Int(2));
    }

    #[test]
    fn lists_replace_not_concatenate() {
        let a = FluxTree::from_yaml("tags:\n  - a\n  - b\n").unwrap();
        let b = FluxTree::from_yaml("tags:\n  - c\n").unwrap();
        let result = layer(FluxTree::empty_map(), a, [b], []);
        match result.get_path("tags").unwrap() {
            FluxTree::List(items) => assert_eq!(items.len(), 1),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn undefined_path_is_none() {
        let tree = FluxTree::empty_map();
        assert!(tree.get_path("missing.path").is_none());
    }
}
