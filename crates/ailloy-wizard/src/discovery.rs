//! The dependent discovery protocol: a `discover`-backed
//! select widget expands its command template against the wizard's
//! current flux scope, lazily, and only once every binding it references
//! is filled in.

use std::collections::BTreeSet;

use ailloy_flux::FluxTree;
use ailloy_manifest::DiscoverSpec;
use ailloy_template::TemplateEngine;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::WizardError;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{(.*?)\}\}").unwrap());
static DOTTED_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)").unwrap());

/// One line of a discovery runner's output, split on `|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverOption {
    pub label: String,
    pub value: String,
    pub extras: Vec<String>,
}

impl DiscoverOption {
    fn waiting(missing: &[String]) -> Self {
        DiscoverOption {
            label: format!("(waiting — fill in {} first)", missing.join(", ")),
            value: String::new(),
            extras: Vec::new(),
        }
    }
}

/// Abstract discovery runner. Kept free of any
/// concrete process-spawning mechanism so the wizard never depends on how
/// a host actually shells out.
pub trait DiscoverRunner {
    fn run(&self, expanded_command: &str) -> Result<Vec<u8>, String>;
}

/// The dotted paths a `discover` command's raw (unexpanded) template text
/// references — a widget's reactive binding set, recomputed whenever one
/// of those paths changes.
pub fn binding_set(discover: &DiscoverSpec) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    for capture in TAG.captures_iter(&discover.command) {
        let content = capture.get(1).unwrap().as_str();
        for m in DOTTED_PATH.find_iter(content) {
            paths.insert(m.as_str().trim_start_matches('.').to_string());
        }
    }
    paths
}

fn missing_bindings(discover: &DiscoverSpec, flux: &FluxTree) -> Vec<String> {
    binding_set(discover)
        .into_iter()
        .filter(|path| match flux.get_path(path) {
            None => true,
            Some(value) => value.is_empty_leaf(),
        })
        .collect()
}

/// Produce the option list for a `discover`-backed select widget. Expands
/// `discover.command` against `flux` and invokes `runner`, but only once
/// every path `discover.command` references is non-empty; otherwise
/// returns a single waiting placeholder and never touches `runner`.
pub fn produce_options(
    field: &str,
    discover: &DiscoverSpec,
    flux: &FluxTree,
    engine: &TemplateEngine,
    runner: &dyn DiscoverRunner,
) -> Result<Vec<DiscoverOption>, WizardError> {
    let missing = missing_bindings(discover, flux);
    if !missing.is_empty() {
        return Ok(vec![DiscoverOption::waiting(&missing)]);
    }

    let expanded = engine.render(field, &discover.command, flux.to_json())?;
    let output = runner.run(expanded.trim()).map_err(|message| WizardError::Discovery {
        field: field.to_string(),
        message,
    })?;
    Ok(parse_discovery_output(&String::from_utf8_lossy(&output)))
}

fn parse_discovery_output(text: &str) -> Vec<DiscoverOption> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut fields = line.split('|').map(str::trim);
            let label = fields.next().unwrap_or_default().to_string();
            let value = fields.next().unwrap_or_default().to_string();
            let extras = fields.map(str::to_string).collect();
            DiscoverOption { label, value, extras }
        })
        .collect()
}

/// Propagate a selection's extra columns into the flux tree at the
/// dotted-path names named by `also_sets`.
pub fn apply_also_sets(discover: &DiscoverSpec, option: &DiscoverOption, flux: &mut FluxTree) {
    for (path, index) in &discover.also_sets {
        if let Some(extra) = option.extras.get(*index) {
            flux.set_path(path, FluxTree::coerce_default(extra));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discover(command: &str, also_sets: &[(&str, usize)]) -> DiscoverSpec {
        DiscoverSpec {
            command: command.to_string(),
            prompt: None,
            also_sets: also_sets.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    struct FakeRunner {
        output: &'static str,
    }

    impl DiscoverRunner for FakeRunner {
        fn run(&self, _expanded_command: &str) -> Result<Vec<u8>, String> {
            Ok(self.output.as_bytes().to_vec())
        }
    }

    #[test]
    fn binding_set_collects_dotted_paths_from_raw_template() {
        let d = discover("gh label list --repo {{.project.org}}/{{.project.repo}}", &[]);
        let paths = binding_set(&d);
        assert!(paths.contains("project.org"));
        assert!(paths.contains("project.repo"));
    }

    #[test]
    fn missing_binding_yields_waiting_placeholder_without_invoking_runner() {
        let d = discover("gh label list --repo {{.project.repo}}", &[]);
        let flux = FluxTree::empty_map();
        let engine = TemplateEngine::new();
        let runner = FakeRunner { output: "should not be called" };
        let options = produce_options("labels", &d, &flux, &engine, &runner).unwrap();
        assert_eq!(options.len(), 1);
        assert!(options[0].label.starts_with("(waiting"));
        assert_eq!(options[0].value, "");
    }

    #[test]
    fn complete_bindings_invoke_runner_and_parse_output_lines() {
        let d = discover("gh label list --repo {{.project.repo}}", &[("labels.color", 0)]);
        let mut flux = FluxTree::empty_map();
        flux.set_path("project.repo", FluxTree::Str("acme/widgets".into()));
        let engine = TemplateEngine::new();
        let runner = FakeRunner { output: "bug | bug | red\nfeature | feature | green\n" };
        let options = produce_options("labels", &d, &flux, &engine, &runner).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].label, "bug");
        assert_eq!(options[0].value, "bug");
        assert_eq!(options[0].extras, vec!["red"]);
    }

    #[test]
    fn apply_also_sets_propagates_extra_columns() {
        let d = discover("noop", &[("labels.color", 0)]);
        let option = DiscoverOption {
            label: "bug".into(),
            value: "bug".into(),
            extras: vec!["red".into()],
        };
        let mut flux = FluxTree::empty_map();
        apply_also_sets(&d, &option, &mut flux);
        assert_eq!(flux.get_path("labels.color").and_then(FluxTree::as_str), Some("red"));
    }

    #[test]
    fn unrelated_binding_changes_do_not_affect_missing_check() {
        let d = discover("gh label list --repo {{.project.repo}}", &[]);
        let mut flux = FluxTree::empty_map();
        flux.set_path("project.repo", FluxTree::Str("acme/widgets".into()));
        flux.set_path("unrelated.field", FluxTree::Str("".into()));
        assert!(missing_bindings(&d, &flux).is_empty());
    }
}
