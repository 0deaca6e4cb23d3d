use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tera::{Tera, Value};

use crate::error::TemplateError;
use crate::translate::translate;

/// Satisfies the `ingot "name"` callable. Implemented by
/// `ailloy-core`, which has access to the bundle's ingot search path; kept
/// as a trait here so this crate never depends on manifest/bundle types.
pub trait IngotResolver: Send + Sync {
    fn resolve_ingot(&self, name: &str, flux_json: &Value) -> Result<String, TemplateError>;
}

struct IngotFn {
    resolver: Option<Arc<dyn IngotResolver>>,
    context: Arc<Mutex<Value>>,
}

impl tera::Function for IngotFn {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let name = args
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| tera::Error::msg("ingot: missing `name` argument"))?;
        let resolver = self
            .resolver
            .as_ref()
            .ok_or_else(|| tera::Error::msg("ingot: no ingot resolver configured"))?;
        let ctx = self.context.lock().expect("flux context mutex poisoned");
        resolver
            .resolve_ingot(name, &ctx)
            .map(Value::String)
            .map_err(|e| tera::Error::msg(e.to_string()))
    }
}

struct ContainsFn;

impl tera::Function for ContainsFn {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let needle = args.get("needle").and_then(Value::as_str).unwrap_or_default();
        let found = match args.get("haystack") {
            Some(Value::String(s)) => s.contains(needle),
            Some(Value::Array(items)) => items.iter().any(|v| v.as_str() == Some(needle)),
            _ => false,
        };
        Ok(Value::Bool(found))
    }
}

/// Thin wrapper over `tera::Tera` that expands a mustache-plus-actions
/// grammar. The engine is pure aside from what the `ingot` callable
/// does: rendering the same template against the same flux values
/// twice produces the same output.
#[derive(Default)]
pub struct TemplateEngine {
    shared_context: Arc<Mutex<Value>>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `source` (file name `file`, used only for diagnostics) against
    /// a flux context already converted to JSON, with no `ingot` resolver
    /// available — a bare accessor/control-flow render.
    pub fn render(&self, file: &str, source: &str, flux_json: Value) -> Result<String, TemplateError> {
        self.render_with_resolver(file, source, flux_json, None)
    }

    /// Render `source` against a flux context, with `ingot_resolver`
    /// backing the `ingot "name"` callable.
    ///
    /// A fresh `Tera` instance is built per call rather than cached: molds
    /// render a handful of small files per operation, and a fresh instance
    /// means registered functions can close cleanly over this call's flux
    /// context without any reentrancy hazard from `ingot` recursively
    /// rendering another template through the same engine.
    pub fn render_with_resolver(
        &self,
        file: &str,
        source: &str,
        flux_json: Value,
        ingot_resolver: Option<Arc<dyn IngotResolver>>,
    ) -> Result<String, TemplateError> {
        let translated = translate(source, file)?;

        let mut tera = Tera::default();
        tera.add_raw_template(file, &translated)
            .map_err(|e| TemplateError::syntax(file, 0, e.to_string()))?;

        *self.shared_context.lock().expect("flux context mutex poisoned") = flux_json.clone();

        tera.register_function(
            "ingot",
            IngotFn {
                resolver: ingot_resolver,
                context: Arc::clone(&self.shared_context),
            },
        );
        tera.register_function("contains", ContainsFn);

        let mut context = tera::Context::new();
        if let Value::Object(map) = &flux_json {
            for (key, value) in map {
                context.insert(key, value);
            }
        }

        tera.render(file, &context).map_err(|e| TemplateError::Callable {
            file: file.to_string(),
            offset: 0,
            message: "template rendering failed".to_string(),
            cause: Box::new(e),
        })
    }
}
