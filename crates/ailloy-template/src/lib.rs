//! Template engine: a strict mustache-plus-actions subset,
//! implemented on top of `tera::Tera` rather than a hand-rolled
//! interpreter.

mod engine;
mod error;
mod translate;

pub use engine::{IngotResolver, TemplateEngine};
pub use error::TemplateError;

#[cfg(test)]
mod tests {
    use super::*;
    use ailloy_flux::FluxTree;
    use serde_json::Value;
    use std::sync::Mutex;

    #[test]
    fn renders_plain_accessor() {
        let mut flux = FluxTree::empty_map();
        flux.set_path("who", FluxTree::Str("universe".into()));

        let engine = TemplateEngine::new();
        let out = engine.render("hello.md", "# Hello {{.who}}", flux.to_json()).unwrap();
        assert_eq!(out, "# Hello universe");
    }

    #[test]
    fn undefined_path_renders_as_empty_string() {
        let flux = FluxTree::empty_map();
        let engine = TemplateEngine::new();
        let out = engine.render("t.md", "[{{.missing.path}}]", flux.to_json()).unwrap();
        assert_eq!(out, "[]");
    }

    #[test]
    fn if_else_end_and_range_expand() {
        let mut flux = FluxTree::empty_map();
        flux.set_path("ok", FluxTree::Bool(true));
        flux.set_path(
            "items",
            FluxTree::List(vec![FluxTree::Str("a".into()), FluxTree::Str("b".into())]),
        );

        let engine = TemplateEngine::new();
        let template = "{{if .ok}}yes{{else}}no{{end}}:{{range .items}}{{.}},{{end}}";
        let out = engine.render("t.md", template, flux.to_json()).unwrap();
        assert_eq!(out, "yes:a,b,");
    }

    #[test]
    fn default_callable_falls_back_on_empty() {
        let flux = FluxTree::empty_map();
        let engine = TemplateEngine::new();
        let out = engine.render("t.md", r#"{{default "anon" .name}}"#, flux.to_json()).unwrap();
        assert_eq!(out, "anon");
    }

    #[test]
    fn ingot_callable_invokes_resolver() {
        struct FakeResolver {
            calls: Mutex<usize>,
        }
        impl IngotResolver for FakeResolver {
            fn resolve_ingot(&self, name: &str, flux_json: &Value) -> Result<String, TemplateError> {
                *self.calls.lock().unwrap() += 1;
                let url = flux_json.get("ci").and_then(|c| c.get("url")).and_then(Value::as_str).unwrap_or("");
                Ok(format!("![{name}]({url})"))
            }
        }

        let mut flux = FluxTree::empty_map();
        flux.set_path("ci.url", FluxTree::Str("https://example.com/badge.svg".into()));

        let resolver = std::sync::Arc::new(FakeResolver { calls: Mutex::new(0) });
        let engine = TemplateEngine::new();
        let out = engine
            .render_with_resolver("t.md", r#"{{ingot "badge"}}"#, flux.to_json(), Some(resolver.clone()))
            .unwrap();
        assert_eq!(out, "![badge](https://example.com/badge.svg)");
        assert_eq!(*resolver.calls.lock().unwrap(), 1);
    }

    #[test]
    fn ingot_purity_same_scope_same_output() {
        struct EchoResolver;
        impl IngotResolver for EchoResolver {
            fn resolve_ingot(&self, name: &str, flux_json: &Value) -> Result<String, TemplateError> {
                Ok(format!("{name}:{flux_json}"))
            }
        }
        let mut flux = FluxTree::empty_map();
        flux.set_path("x", FluxTree::Str("1".into()));
        let resolver = std::sync::Arc::new(EchoResolver);
        let engine = TemplateEngine::new();
        let a = engine
            .render_with_resolver("t.md", r#"{{ingot "x"}}"#, flux.to_json(), Some(resolver.clone()))
            .unwrap();
        let b = engine
            .render_with_resolver("t.md", r#"{{ingot "x"}}"#, flux.to_json(), Some(resolver))
            .unwrap();
        assert_eq!(a, b);
    }
}
