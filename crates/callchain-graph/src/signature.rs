//! Method signature labels and their grammar.
//!
//! A label looks like `ClassName.methodName(paramTypes)  (packageName)`,
//! optionally followed by a usage annotation `(3 usages)` before the package
//! and an `[Override]` marker at the very end. Anonymous classes use a
//! context description in place of the class name, for example
//! `Anonymous in run() in Worker.call()  (com.example)`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[expect(clippy::expect_used, reason = "label pattern is a compile-time constant")]
static LABEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(.+?)\.([A-Za-z0-9_<>$]+)\((.*?)\)(?:\s*\(\s*(\d+)\s+usages\s*\))?\s+\(([A-Za-z0-9_.]*)\)(\[Override\])?$",
    )
    .expect("label pattern should compile")
});

/// Opaque identity of a callable unit.
///
/// Equality is plain string equality, so two references to the same overload
/// produce the same signature regardless of the call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodSignature(String);

impl MethodSignature {
    /// Wraps an already formatted label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Formats a label from its parts using the canonical layout.
    #[must_use]
    pub fn format(class_name: &str, method_name: &str, params: &[&str], package: &str) -> Self {
        let joined = params.join(", ");
        Self(format!("{class_name}.{method_name}({joined})  ({package})"))
    }

    /// Builds the class portion used for methods declared in anonymous
    /// classes.
    ///
    /// `outer_method` is the enclosing method, when there is one, and
    /// `outer_class` the enclosing named class.
    #[must_use]
    pub fn anonymous_class(outer_method: Option<&str>, outer_class: Option<&str>) -> String {
        match (outer_method, outer_class) {
            (Some(method), class) => {
                format!("Anonymous in {method}() in {}", class.unwrap_or_default())
            }
            (None, Some(class)) => format!("Anonymous in {class}"),
            (None, None) => String::from("Anonymous"),
        }
    }

    /// Returns the raw label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the label into its components.
    ///
    /// Returns `None` when the label does not follow the grammar.
    #[must_use]
    pub fn parse(&self) -> Option<ParsedLabel> {
        ParsedLabel::parse(&self.0)
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MethodSignature {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MethodSignature {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Components extracted from a method label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLabel {
    /// Class name or anonymous context description.
    pub class_name: String,
    /// Method name.
    pub method_name: String,
    /// HTML-escaped parameter list; a single space when empty.
    pub params: String,
    /// Package name, possibly empty.
    pub package_name: String,
    /// Usage count annotation, when present.
    pub usages: Option<u32>,
    /// Whether the label carried the `[Override]` marker.
    pub is_override: bool,
}

impl ParsedLabel {
    /// Parses a raw label, returning `None` on grammar mismatch.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        let captures = LABEL_PATTERN.captures(label.trim())?;
        let text = |index: usize| {
            captures
                .get(index)
                .map_or("", |capture| capture.as_str())
                .trim()
        };

        Some(Self {
            class_name: text(1).to_owned(),
            method_name: text(2).to_owned(),
            params: escape_params(text(3)),
            package_name: text(5).to_owned(),
            usages: captures
                .get(4)
                .and_then(|capture| capture.as_str().parse().ok()),
            is_override: captures.get(6).is_some(),
        })
    }

    /// Placeholder used when a label cannot be parsed.
    #[must_use]
    pub fn degraded(label: &str) -> Self {
        Self {
            class_name: String::from(UNKNOWN_CLASS),
            method_name: label.to_owned(),
            params: String::new(),
            package_name: String::new(),
            usages: None,
            is_override: false,
        }
    }
}

/// Class name assigned to nodes whose label could not be parsed.
pub const UNKNOWN_CLASS: &str = "UnknownClass";

/// Escapes angle brackets so generic parameter types survive HTML labels.
///
/// An empty list becomes a single space to keep rendered labels non-empty.
fn escape_params(raw: &str) -> String {
    let escaped = raw.replace('<', "&lt;").replace('>', "&gt;");
    if escaped.is_empty() {
        String::from(" ")
    } else {
        escaped
    }
}
