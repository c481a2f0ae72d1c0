//! Regex-driven color palettes for series names.
//!
//! Each series name is tested against an ordered list of pattern rules. The
//! **last** rule whose pattern occurs anywhere in the name wins, and only the
//! matched substring(s) are replaced by the rule's color, so a name the pattern
//! covers only partially keeps its unmatched remainder. Names matching no rule
//! are returned unchanged, which the renderer later rejects as an invalid color.

use crate::error::Result;
use crate::models::{TidyFrame, WideFrame};
use indexmap::IndexMap;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Series name -> color specifier, in dataset column order.
pub type Palette = IndexMap<String, String>;

/// Uncompiled rule, as stored in configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleSpec {
    pub pattern: String,
    pub color: String,
}

impl RuleSpec {
    pub fn new(pattern: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            color: color.into(),
        }
    }
}

/// Aged / young / mature controls.
pub const AY_COLOR: &str = "#9FADAD";
/// Old.
pub const OLD_COLOR: &str = "#F57171";
/// Treated.
pub const TREATED_COLOR: &str = "#539DC2";
/// Other treatments.
pub const OTHER_TREATMENT_COLOR: &str = "#009900";
/// `m` treatments; overrides the `m` branch of the first rule.
pub const M_TREATMENT_COLOR: &str = "#BA55D3";

/// The five default rules, in application order.
pub fn default_rule_specs() -> Vec<RuleSpec> {
    vec![
        RuleSpec::new("[a|y|m]..?.?", AY_COLOR),
        RuleSpec::new("o..?.?", OLD_COLOR),
        RuleSpec::new("[b|c|d|e|f]..?.?", TREATED_COLOR),
        RuleSpec::new("[r|s]..?.?", OTHER_TREATMENT_COLOR),
        RuleSpec::new("m..?.?", M_TREATMENT_COLOR),
    ]
}

/// A compiled pattern -> color rule.
#[derive(Debug, Clone)]
pub struct PatternColorRule {
    regex: Regex,
    color: String,
}

impl PatternColorRule {
    pub fn new(pattern: &str, color: impl Into<String>) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            color: color.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    fn apply(&self, name: &str) -> String {
        self.regex
            .replace_all(name, NoExpand(&self.color))
            .into_owned()
    }
}

/// Ordered rule list evaluated with last-match-wins semantics.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<PatternColorRule>,
}

static DEFAULT_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::compile(&default_rule_specs())
        .unwrap_or_else(|e| panic!("built-in palette rule is invalid: {e}"))
});

impl Default for RuleSet {
    fn default() -> Self {
        DEFAULT_RULES.clone()
    }
}

impl RuleSet {
    pub fn new(rules: Vec<PatternColorRule>) -> Self {
        Self { rules }
    }

    /// Compile rule specs in order; a malformed pattern is an error.
    pub fn compile(specs: &[RuleSpec]) -> Result<Self> {
        let rules = specs
            .iter()
            .map(|s| PatternColorRule::new(&s.pattern, s.color.clone()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Parse a JSON array of `{ "pattern": ..., "color": ... }` objects.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let specs: Vec<RuleSpec> = serde_json::from_str(s)?;
        Self::compile(&specs)
    }

    pub fn rules(&self) -> &[PatternColorRule] {
        &self.rules
    }

    /// Index of the last rule whose pattern occurs in `name`.
    pub fn winning_rule(&self, name: &str) -> Option<usize> {
        self.rules.iter().rposition(|r| r.matches(name))
    }

    /// Resolve one name to its color string (or the name itself if unmatched).
    pub fn resolve_name(&self, name: &str) -> String {
        match self.winning_rule(name) {
            Some(idx) => self.rules[idx].apply(name),
            None => {
                log::warn!("series {:?} matches no palette rule; kept as-is", name);
                name.to_string()
            }
        }
    }

    /// Map each column name to a color, preserving column order.
    pub fn resolve_wide<S: AsRef<str>>(&self, columns: &[S]) -> Palette {
        columns
            .iter()
            .map(|c| (c.as_ref().to_string(), self.resolve_name(c.as_ref())))
            .collect()
    }

    /// Colors aligned positionally to the category levels.
    pub fn resolve_tidy<S: AsRef<str>>(&self, levels: &[S]) -> Vec<String> {
        levels
            .iter()
            .map(|l| self.resolve_name(l.as_ref()))
            .collect()
    }
}

/// `resolve_wide` with the default rules over a frame's columns.
pub fn resolve_wide(frame: &WideFrame) -> Palette {
    RuleSet::default().resolve_wide(&frame.column_names())
}

/// `resolve_tidy` with the default rules over a frame's category levels.
pub fn resolve_tidy(frame: &TidyFrame) -> Vec<String> {
    RuleSet::default().resolve_tidy(frame.levels())
}
