//! Per-recipient message personalization.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static BRACED_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("placeholder pattern is valid")
});

/// How placeholders are recognized in a message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateMode {
    /// Bare field names are placeholders. One left-to-right pass over the
    /// template replaces every occurrence, preferring the longest name at
    /// each position. Substituted values are not rescanned.
    #[default]
    Literal,
    /// Placeholders are written `{{fieldName}}`.
    Braced,
    /// Bare field names, but each match restarts from the untouched template
    /// and replaces only the first occurrence, so only the last matching
    /// field survives. Kept for byte-compatible output with older clients.
    Legacy,
}

impl TemplateMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::Braced => "braced",
            Self::Legacy => "legacy",
        }
    }
}

impl FromStr for TemplateMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "braced" => Ok(Self::Braced),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!(
                "unknown template mode {other:?} (expected literal, braced or legacy)"
            )),
        }
    }
}

/// Substitute `fields` into `template`. Never fails; unknown placeholders stay as-is.
///
/// `fields` is ordered; the order only matters for [`TemplateMode::Legacy`].
pub fn render(mode: TemplateMode, template: &str, fields: &[(String, String)]) -> String {
    match mode {
        TemplateMode::Literal => render_literal(template, fields),
        TemplateMode::Braced => render_braced(template, fields),
        TemplateMode::Legacy => render_legacy(template, fields),
    }
}

fn render_literal(template: &str, fields: &[(String, String)]) -> String {
    let mut names = fields
        .iter()
        .filter(|(name, _)| !name.is_empty())
        .collect::<Vec<_>>();
    if names.is_empty() {
        return template.to_owned();
    }
    // Longest first so `firstName` wins over a `first` field at the same spot.
    names.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(ch) = rest.chars().next() {
        match names.iter().find(|(name, _)| rest.starts_with(name.as_str())) {
            Some((name, value)) => {
                rendered.push_str(value);
                rest = &rest[name.len()..];
            }
            None => {
                rendered.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }
    rendered
}

fn render_braced(template: &str, fields: &[(String, String)]) -> String {
    BRACED_PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            fields
                .iter()
                .find(|(name, _)| name == &caps[1])
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_owned())
        })
        .into_owned()
}

fn render_legacy(template: &str, fields: &[(String, String)]) -> String {
    let mut rendered = template.to_owned();
    for (name, value) in fields {
        if !name.is_empty() && rendered.contains(name.as_str()) {
            rendered = template.replacen(name.as_str(), value, 1);
        }
    }
    rendered
}
