use std::ops::RangeInclusive;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Literal used by rules that carry concrete values (acceptance, inclusion).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Text(value)
    }
}

/// Options of an acceptance rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Acceptance {
    /// Value that counts as accepted.
    #[serde(default = "default_accept")]
    pub accept: Literal,
    /// Whether a missing value passes the rule.
    #[serde(default = "default_allow_nil")]
    pub allow_nil: bool,
}

impl Default for Acceptance {
    fn default() -> Self {
        Self {
            accept: default_accept(),
            allow_nil: default_allow_nil(),
        }
    }
}

fn default_accept() -> Literal {
    Literal::Bool(true)
}

fn default_allow_nil() -> bool {
    true
}

/// Options of a length rule. `is` takes priority over the bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Length {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<usize>,
}

impl Length {
    pub fn exactly(len: usize) -> Self {
        Self {
            is: Some(len),
            ..Self::default()
        }
    }

    pub fn at_least(minimum: usize) -> Self {
        Self {
            minimum: Some(minimum),
            ..Self::default()
        }
    }

    pub fn at_most(maximum: usize) -> Self {
        Self {
            maximum: Some(maximum),
            ..Self::default()
        }
    }

    pub fn within(range: RangeInclusive<usize>) -> Self {
        Self {
            is: None,
            minimum: Some(*range.start()),
            maximum: Some(*range.end()),
        }
    }
}

/// Numeric bounds. `less_than`/`greater_than` are exclusive, `_or_equal` inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Numericality {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub less_than: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub less_than_or_equal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greater_than: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greater_than_or_equal: Option<f64>,
}

impl Numericality {
    pub fn less_than(bound: f64) -> Self {
        Self {
            less_than: Some(bound),
            ..Self::default()
        }
    }

    pub fn less_than_or_equal(bound: f64) -> Self {
        Self {
            less_than_or_equal: Some(bound),
            ..Self::default()
        }
    }

    pub fn greater_than(bound: f64) -> Self {
        Self {
            greater_than: Some(bound),
            ..Self::default()
        }
    }

    pub fn greater_than_or_equal(bound: f64) -> Self {
        Self {
            greater_than_or_equal: Some(bound),
            ..Self::default()
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.less_than.is_none()
            && self.less_than_or_equal.is_none()
            && self.greater_than.is_none()
            && self.greater_than_or_equal.is_none()
    }
}

/// Attribute-local validation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    Presence,
    Acceptance(Acceptance),
    Format { pattern: String },
    InclusionOf { candidates: Vec<Literal> },
    Length(Length),
    Numericality(Numericality),
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Presence => "presence",
            Rule::Acceptance(_) => "acceptance",
            Rule::Format { .. } => "format",
            Rule::InclusionOf { .. } => "inclusion_of",
            Rule::Length(_) => "length",
            Rule::Numericality(_) => "numericality",
        }
    }

    pub fn format(pattern: impl Into<String>) -> Self {
        Rule::Format {
            pattern: pattern.into(),
        }
    }

    pub fn inclusion_of<I, L>(candidates: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        Rule::InclusionOf {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

/// A rule together with the attribute it constrains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AttributeRule {
    pub attribute: String,
    pub rule: Rule,
}

impl AttributeRule {
    pub fn new(attribute: impl Into<String>, rule: Rule) -> Self {
        Self {
            attribute: attribute.into(),
            rule,
        }
    }
}
