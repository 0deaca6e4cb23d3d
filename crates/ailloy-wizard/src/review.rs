//! Review section: printed after all data groups, listing
//! every non-empty bound value as `<dotted-name>: <value>`.

use ailloy_flux::FluxTree;
use ailloy_manifest::FluxVar;

/// One line of the review section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewLine {
    pub name: String,
    pub value: String,
}

/// Walk `schema` in declaration order and collect a review line for every
/// variable currently bound to a non-empty value.
pub fn review_lines(schema: &[FluxVar], flux: &FluxTree) -> Vec<ReviewLine> {
    schema
        .iter()
        .filter_map(|var| {
            let value = flux.get_path(&var.name)?;
            if value.is_empty_leaf() {
                return None;
            }
            Some(ReviewLine {
                name: var.name.clone(),
                value: value.display_value(),
            })
        })
        .collect()
}

/// Render the review section the way it is presented to the operator.
pub fn render_review(schema: &[FluxVar], flux: &FluxTree) -> String {
    review_lines(schema, flux)
        .into_iter()
        .map(|line| format!("{}: {}", line.name, line.value))
        .collect::<Vec<_>>()
        .join("\n")
}
