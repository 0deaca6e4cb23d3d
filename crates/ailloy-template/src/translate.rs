//! Translates a mustache-plus-actions grammar into Tera's native syntax
//! so the rest of the engine can lean on `tera::Tera` rather than
//! hand-rolling an interpreter.
//!
//! The source grammar nests everything — `if`, `else`, `end`, `range` —
//! inside `{{ }}` delimiters, Go-template style, and accessors use a
//! leading dot (`.a.b.c`). Tera instead uses `{% %}` for statements and
//! bare identifiers for accessors, and binds the loop variable by name
//! inside `{% for %}`. This module rewrites one grammar into the other;
//! it never touches anything outside a `{{ }}` tag.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::TemplateError;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{(.*?)\}\}").unwrap());
static DOTTED_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(^|[\s(,])\.([A-Za-z_][A-Za-z0-9_.]*)").unwrap());
static BARE_DOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(^|[\s(,])\.(\s|\)|,|$)").unwrap());

#[derive(Clone, Copy, PartialEq, Eq)]
enum Block {
    If,
    Range,
}

pub fn translate(source: &str, file: &str) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(source.len());
    let mut last_end = 0;
    let mut stack: Vec<(Block, String)> = Vec::new();

    for capture in TAG.captures_iter(source) {
        let whole = capture.get(0).unwrap();
        out.push_str(&source[last_end..whole.start()]);
        last_end = whole.end();

        let content = capture.get(1).unwrap().as_str().trim();
        let loop_var = stack.last().map(|(_, v)| v.as_str());

        if let Some(rest) = content.strip_prefix("if ") {
            stack.push((Block::If, String::new()));
            let condition = default_if_simple_path(rewrite_expr(rest.trim(), loop_var), "false");
            out.push_str(&format!("{{% if {condition} %}}"));
        } else if content == "else" {
            out.push_str("{% else %}");
        } else if content == "end" {
            match stack.pop() {
                Some((Block::If, _)) => out.push_str("{% endif %}"),
                Some((Block::Range, _)) => out.push_str("{% endfor %}"),
                None => {
                    return Err(TemplateError::syntax(file, whole.start(), "unmatched `end`"));
                }
            }
        } else if let Some(rest) = content.strip_prefix("range ") {
            let loop_var_name = format!("__ailloy_item{}", stack.len());
            let list_expr = default_if_simple_path(rewrite_expr(rest.trim(), loop_var), "[]");
            stack.push((Block::Range, loop_var_name.clone()));
            out.push_str(&format!("{{% for {loop_var_name} in {list_expr} %}}"));
        } else {
            out.push_str("{{ ");
            out.push_str(&translate_expression(content, loop_var));
            out.push_str(" }}");
        }
    }
    out.push_str(&source[last_end..]);

    if !stack.is_empty() {
        return Err(TemplateError::syntax(file, source.len(), "unclosed `if`/`range` block"));
    }

    Ok(out)
}

/// A bare identifier or dotted path, with no operators or literals —
/// the only shape safe to blanket-wrap in a `default` filter.
fn is_simple_path(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn default_if_simple_path(expr: String, fallback: &str) -> String {
    if is_simple_path(&expr) {
        format!("{expr} | default(value={fallback})")
    } else {
        expr
    }
}

/// Rewrite leading-dot dotted paths into bare Tera accessors. Inside a
/// `range` body the nearest enclosing loop variable stands in for a
/// top-level `.`; outside any range, `.` refers to the render root.
fn rewrite_expr(expr: &str, loop_var: Option<&str>) -> String {
    let root = loop_var.unwrap_or("");
    let with_paths = DOTTED_PATH.replace_all(expr, |caps: &regex::Captures| {
        let boundary = &caps[1];
        let path = &caps[2];
        if root.is_empty() {
            format!("{boundary}{path}")
        } else {
            format!("{boundary}{root}.{path}")
        }
    });
    BARE_DOT
        .replace_all(&with_paths, |caps: &regex::Captures| {
            let boundary = &caps[1];
            let tail = &caps[2];
            if root.is_empty() {
                format!("{boundary}{tail}")
            } else {
                format!("{boundary}{root}{tail}")
            }
        })
        .into_owned()
}

/// Recognize the fixed-arity built-in callables textually and
/// translate them into Tera function/filter syntax; anything else is
/// treated as a plain accessor expression.
fn translate_expression(content: &str, loop_var: Option<&str>) -> String {
    if let Some(rest) = content.strip_prefix("ingot ") {
        let name = rest.trim();
        return format!("ingot(name={name})");
    }
    if let Some(rest) = content.strip_prefix("default ") {
        if let Some((fallback, value_expr)) = split_quoted_then_rest(rest) {
            let value = rewrite_expr(value_expr.trim(), loop_var);
            return format!("{value} | default(value={fallback})");
        }
    }
    if let Some(rest) = content.strip_prefix("upper ") {
        return format!("{} | default(value=\"\") | upper", rewrite_expr(rest.trim(), loop_var));
    }
    if let Some(rest) = content.strip_prefix("lower ") {
        return format!("{} | default(value=\"\") | lower", rewrite_expr(rest.trim(), loop_var));
    }
    if let Some(rest) = content.strip_prefix("title ") {
        return format!("{} | default(value=\"\") | title", rewrite_expr(rest.trim(), loop_var));
    }
    if let Some(rest) = content.strip_prefix("contains ") {
        if let Some((needle, haystack_expr)) = split_quoted_then_rest(rest) {
            let haystack = rewrite_expr(haystack_expr.trim(), loop_var);
            return format!("contains(needle={needle}, haystack={haystack} | default(value=\"\"))");
        }
    }
    // Plain accessor: per the engine's contract, an undefined dotted path
    // evaluates to an empty string rather than erroring.
    default_if_simple_path(rewrite_expr(content, loop_var), "\"\"")
}

/// Split `"quoted literal" rest` into `(quoted literal including quotes,
/// rest)`.
fn split_quoted_then_rest(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if !s.starts_with('"') {
        return None;
    }
    let end = s[1..].find('"')? + 2;
    Some((&s[..end], s[end..].trim_start()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_plain_accessor() {
        let out = translate("# Hello {{.who}}", "t").unwrap();
        assert_eq!(out, "# Hello {{ who | default(value=\"\") }}");
    }

    #[test]
    fn translates_if_else_end() {
        let out = translate("{{if .ok}}yes{{else}}no{{end}}", "t").unwrap();
        assert_eq!(out, "{% if ok | default(value=false) %}yes{% else %}no{% endif %}");
    }

    #[test]
    fn translates_range_with_bare_dot_body() {
        let out = translate("{{range .items}}- {{.}}\n{{end}}", "t").unwrap();
        assert_eq!(
            out,
            "{% for __ailloy_item0 in items | default(value=[]) %}- {{ __ailloy_item0 | default(value=\"\") }}\n{% endfor %}"
        );
    }

    #[test]
    fn translates_range_with_field_access() {
        let out = translate("{{range .items}}{{.name}}{{end}}", "t").unwrap();
        assert_eq!(
            out,
            "{% for __ailloy_item0 in items | default(value=[]) %}{{ __ailloy_item0.name | default(value=\"\") }}{% endfor %}"
        );
    }

    #[test]
    fn translates_ingot_callable() {
        let out = translate(r#"{{ingot "badge"}}"#, "t").unwrap();
        assert_eq!(out, r#"{{ ingot(name="badge") }}"#);
    }

    #[test]
    fn translates_default_callable() {
        let out = translate(r#"{{default "x" .some.value}}"#, "t").unwrap();
        assert_eq!(out, r#"{{ some.value | default(value="x") }}"#);
    }

    #[test]
    fn translates_contains_callable() {
        let out = translate(r#"{{contains "needle" .list}}"#, "t").unwrap();
        assert_eq!(out, r#"{{ contains(needle="needle", haystack=list | default(value="")) }}"#);
    }

    #[test]
    fn rejects_unmatched_end() {
        assert!(translate("{{end}}", "t").is_err());
    }

    #[test]
    fn rejects_unclosed_block() {
        assert!(translate("{{if .x}}no end", "t").is_err());
    }
}
