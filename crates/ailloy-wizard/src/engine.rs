//! Ties the form groups, the flux scope, and the dependent discovery
//! protocol together into one reactive session.

use ailloy_flux::FluxTree;
use ailloy_manifest::FluxVar;
use ailloy_template::TemplateEngine;

use crate::discovery::{self, DiscoverOption, DiscoverRunner};
use crate::error::WizardError;
use crate::form::{group_variables, FormGroup};
use crate::review::{review_lines, ReviewLine};

/// A headless wizard session: schema plus the flux scope being built up.
/// Rendering the groups as an actual terminal form is the caller's job —
/// this type only owns the reactive state machine.
pub struct WizardEngine {
    schema: Vec<FluxVar>,
    groups: Vec<FormGroup>,
    flux: FluxTree,
    template_engine: TemplateEngine,
}

impl WizardEngine {
    pub fn new(schema: Vec<FluxVar>, initial: FluxTree) -> Self {
        let groups = group_variables(&schema);
        WizardEngine {
            schema,
            groups,
            flux: initial,
            template_engine: TemplateEngine::new(),
        }
    }

    pub fn groups(&self) -> &[FormGroup] {
        &self.groups
    }

    pub fn schema(&self) -> &[FluxVar] {
        &self.schema
    }

    pub fn flux(&self) -> &FluxTree {
        &self.flux
    }

    pub fn set_value(&mut self, name: &str, value: FluxTree) {
        self.flux.set_path(name, value);
    }

    /// Variables whose `discover` binding set includes `changed_name` —
    /// these, and only these, must re-run their option-producing callback.
    pub fn affected_by(&self, changed_name: &str) -> Vec<&FluxVar> {
        self.schema
            .iter()
            .filter(|var| {
                var.discover
                    .as_ref()
                    .map(|d| discovery::binding_set(d).contains(changed_name))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Produce (or re-produce) the option list for a `discover`-backed
    /// select field.
    pub fn options_for(&self, field: &str, runner: &dyn DiscoverRunner) -> Result<Vec<DiscoverOption>, WizardError> {
        let var = self
            .schema
            .iter()
            .find(|v| v.name == field)
            .ok_or_else(|| WizardError::Discovery { field: field.to_string(), message: "no such field".to_string() })?;
        let discover = var
            .discover
            .as_ref()
            .ok_or_else(|| WizardError::Discovery { field: field.to_string(), message: "field has no discover spec".to_string() })?;
        discovery::produce_options(field, discover, &self.flux, &self.template_engine, runner)
    }

    /// Accept a discovery selection: binds the field to the option's value
    /// and propagates any `also_sets` extras.
    pub fn apply_selection(&mut self, field: &str, option: &DiscoverOption) {
        self.set_value(field, FluxTree::Str(option.value.clone()));
        if let Some(discover) = self.schema.iter().find(|v| v.name == field).and_then(|v| v.discover.as_ref()) {
            discovery::apply_also_sets(discover, option, &mut self.flux);
        }
    }

    pub fn review(&self) -> Vec<ReviewLine> {
        review_lines(&self.schema, &self.flux)
    }

    /// An abort anywhere returns this to the caller without mutating any
    /// file. The engine itself never touches the filesystem, so there is
    /// nothing to undo here.
    pub fn abort(&self) -> WizardError {
        WizardError::Aborted
    }

    pub fn into_flux(self) -> FluxTree {
        self.flux
    }
}
