use ailloy_flux::FluxTree;
use ailloy_manifest::FluxVar;

/// Variables sharing a dotted-path prefix,
/// in the order they first appeared in the schema.
#[derive(Debug, Clone)]
pub struct FormGroup {
    pub prefix: String,
    /// Name of the `enabled` boolean sibling, if this group has one; the
    /// rest of `fields` then form a conditional sub-group hidden while it
    /// is false.
    pub enabled_by: Option<String>,
    pub fields: Vec<FluxVar>,
}

impl FormGroup {
    /// Fields gated behind `enabled_by`, excluding the `enabled` field
    /// itself. Empty when this group has no conditional gate.
    pub fn conditional_fields(&self) -> Vec<&FluxVar> {
        match &self.enabled_by {
            Some(enabled_name) => self.fields.iter().filter(|f| &f.name != enabled_name).collect(),
            None => Vec::new(),
        }
    }

    /// Whether the conditional sub-group should currently be shown.
    pub fn is_conditional_group_visible(&self, flux: &FluxTree) -> bool {
        match &self.enabled_by {
            Some(enabled_name) => flux.get_path(enabled_name).and_then(FluxTree::as_bool).unwrap_or(false),
            None => true,
        }
    }
}

fn group_prefix(dotted_name: &str) -> String {
    dotted_name.rsplit_once('.').map(|(prefix, _)| prefix.to_string()).unwrap_or_default()
}

/// Group a flux schema into form groups, preserving first-appearance order.
pub fn group_variables(schema: &[FluxVar]) -> Vec<FormGroup> {
    let mut groups: Vec<FormGroup> = Vec::new();

    for var in schema {
        let prefix = group_prefix(&var.name);
        match groups.iter_mut().find(|g| g.prefix == prefix) {
            Some(group) => group.fields.push(var.clone()),
            None => groups.push(FormGroup {
                prefix,
                enabled_by: None,
                fields: vec![var.clone()],
            }),
        }
    }

    for group in &mut groups {
        let enabled_field = group.fields.iter().find(|f| {
            f.var_type == ailloy_manifest::FluxType::Bool && group_prefix(&f.name) == group.prefix && f.name.rsplit('.').next() == Some("enabled")
        });
        group.enabled_by = enabled_field.map(|f| f.name.clone());
    }

    groups
}
