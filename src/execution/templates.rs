//! Template resolution
//!
//! Two placeholder grammars coexist: init commands use named `${name}`
//! placeholders bound at scaffold time, and framework test commands carry a
//! single `^` marker bound to the test-name filter at stage-execution time.
//! Resolution is pure: same template and bindings always yield the same
//! string, and an unbound placeholder is an error, never a pass-through.
//!
//! Bound values are interpolated into a shell command line without escaping,
//! so every value is validated against a conservative allow-list first.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

use crate::types::{Result, TemplateError};

/// Marker in framework command templates where the test-name filter goes
pub const MARKER: char = '^';

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([A-Za-z0-9_]+)\}").expect("placeholder regex is valid"))
}

/// Check a binding value against the shell-safety allow-list
///
/// Values travel into `sh -c` unescaped; anything outside
/// `[A-Za-z0-9._/-]` (or leading with `-`) is rejected.
fn is_safe_binding_value(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('-')
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '-'))
}

fn ensure_safe(placeholder: &str, value: &str) -> Result<()> {
    if is_safe_binding_value(value) {
        Ok(())
    } else {
        Err(TemplateError::UnsafeValue {
            placeholder: placeholder.to_string(),
            value: value.to_string(),
        }
        .into())
    }
}

/// Resolve every `${name}` placeholder in `template` from `bindings`
pub fn resolve(template: &str, bindings: &HashMap<String, String>) -> Result<String> {
    let re = placeholder_re();

    for caps in re.captures_iter(template) {
        let name = &caps[1];
        match bindings.get(name) {
            None => {
                return Err(TemplateError::UnboundPlaceholder {
                    name: name.to_string(),
                    template: template.to_string(),
                }
                .into());
            }
            Some(value) => ensure_safe(name, value)?,
        }
    }

    let resolved = re
        .replace_all(template, |caps: &regex::Captures| {
            bindings[&caps[1]].clone()
        })
        .into_owned();

    debug!(template = %template, resolved = %resolved, "Resolved command template");
    Ok(resolved)
}

/// Resolve the `^` marker to the given test-name filter
///
/// An empty filter is legal and means "all tests". A template without the
/// marker resolves to itself, so resolution is total over any stored command.
pub fn resolve_marker(template: &str, filter: &str) -> Result<String> {
    if !filter.is_empty() {
        ensure_safe("^", filter)?;
    }
    Ok(template.replace(MARKER, filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_named_placeholder() {
        let resolved = resolve(
            "mkdir ${name} && cd ${name} && npm init -y",
            &bindings(&[("name", "demo")]),
        )
        .unwrap();
        assert_eq!(resolved, "mkdir demo && cd demo && npm init -y");
    }

    #[test]
    fn test_resolve_without_placeholders_is_identity() {
        let resolved = resolve("gradle init", &bindings(&[])).unwrap();
        assert_eq!(resolved, "gradle init");
    }

    #[test]
    fn test_unbound_placeholder_is_an_error() {
        let result = resolve("go mod init ${name}", &bindings(&[]));
        match result {
            Err(crate::types::Error::Template(TemplateError::UnboundPlaceholder {
                name, ..
            })) => assert_eq!(name, "name"),
            other => panic!("Expected UnboundPlaceholder, got: {:?}", other),
        }
    }

    #[test]
    fn test_unsafe_binding_is_rejected() {
        let result = resolve(
            "go mod init ${name}",
            &bindings(&[("name", "demo; rm -rf /")]),
        );
        match result {
            Err(crate::types::Error::Template(TemplateError::UnsafeValue { value, .. })) => {
                assert!(value.contains("rm -rf"));
            }
            other => panic!("Expected UnsafeValue, got: {:?}", other),
        }
    }

    #[test]
    fn test_shell_metacharacters_rejected() {
        for bad in [
            "a$(whoami)",
            "a`id`",
            "a&&b c",
            "a|b",
            "a>b",
            "a\"b",
            "a'b",
            "a b",
            "-rf",
            "",
        ] {
            assert!(!is_safe_binding_value(bad), "accepted unsafe value: {bad:?}");
        }
        for good in ["demo", "my-feature", "a_b.c", "sub/dir", "v1.0.0"] {
            assert!(is_safe_binding_value(good), "rejected safe value: {good:?}");
        }
    }

    #[test]
    fn test_resolve_marker() {
        let resolved = resolve_marker("go test -run \"^\"", "stage_unit_").unwrap();
        assert_eq!(resolved, "go test -run \"stage_unit_\"");
    }

    #[test]
    fn test_resolve_marker_empty_filter_means_all_tests() {
        let resolved = resolve_marker("pytest -k \"^\"", "").unwrap();
        assert_eq!(resolved, "pytest -k \"\"");
    }

    #[test]
    fn test_resolve_marker_without_marker_is_identity() {
        let resolved = resolve_marker("cargo test", "stage_unit_").unwrap();
        assert_eq!(resolved, "cargo test");
    }

    #[test]
    fn test_resolve_marker_unsafe_filter_rejected() {
        let result = resolve_marker("jest ^", "x; reboot");
        assert!(matches!(
            result,
            Err(crate::types::Error::Template(TemplateError::UnsafeValue { .. }))
        ));
    }

    #[test]
    fn test_stage_substitution_is_deterministic() {
        let first = resolve_marker("jest ^", "stage_unit_").unwrap();
        let second = resolve_marker("jest ^", "stage_unit_").unwrap();
        assert_eq!(first, second);
    }
}
