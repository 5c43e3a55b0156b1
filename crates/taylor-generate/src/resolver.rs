use std::collections::HashMap;

use taylor_core::{
    Acceptance, EntityType, Length, Literal, Numericality, Rule, SchemaCatalog, SchemaProvider,
    StorageKind,
};

/// Semantic kind an attribute is synthesized as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticKind {
    String,
    Text,
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    Time,
    DateTime,
    Association(EntityType),
    Virtual,
    Unknown,
}

impl From<StorageKind> for SemanticKind {
    fn from(kind: StorageKind) -> Self {
        match kind {
            StorageKind::String => SemanticKind::String,
            StorageKind::Text => SemanticKind::Text,
            StorageKind::Integer => SemanticKind::Integer,
            StorageKind::Float => SemanticKind::Float,
            StorageKind::Decimal => SemanticKind::Decimal,
            StorageKind::Boolean => SemanticKind::Boolean,
            StorageKind::Date => SemanticKind::Date,
            StorageKind::Time => SemanticKind::Time,
            StorageKind::Datetime => SemanticKind::DateTime,
            StorageKind::Virtual => SemanticKind::Virtual,
            // Declared as a relation but without a resolvable target.
            StorageKind::Association | StorageKind::Unknown => SemanticKind::Unknown,
        }
    }
}

/// One constrained attribute with its kind and the rules naming it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAttribute {
    pub name: String,
    pub kind: SemanticKind,
    pub rules: Vec<Rule>,
    pub scale: Option<u32>,
}

impl ResolvedAttribute {
    pub fn rule_set(&self) -> RuleSet<'_> {
        RuleSet::new(&self.rules)
    }
}

/// Lookup view over the rules of one attribute. Each accessor returns the
/// first rule of its kind.
#[derive(Debug, Clone, Copy)]
pub struct RuleSet<'a> {
    rules: &'a [Rule],
}

impl<'a> RuleSet<'a> {
    pub fn new(rules: &'a [Rule]) -> Self {
        Self { rules }
    }

    pub fn presence(&self) -> bool {
        self.rules.iter().any(|rule| matches!(rule, Rule::Presence))
    }

    pub fn acceptance(&self) -> Option<&'a Acceptance> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::Acceptance(options) => Some(options),
            _ => None,
        })
    }

    pub fn format(&self) -> Option<&'a str> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::Format { pattern } => Some(pattern.as_str()),
            _ => None,
        })
    }

    pub fn inclusion(&self) -> Option<&'a [Literal]> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::InclusionOf { candidates } => Some(candidates.as_slice()),
            _ => None,
        })
    }

    pub fn length(&self) -> Option<&'a Length> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::Length(options) => Some(options),
            _ => None,
        })
    }

    pub fn numericality(&self) -> Option<&'a Numericality> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::Numericality(options) => Some(options),
            _ => None,
        })
    }
}

/// Constrained attributes of an entity type, in first-reference order.
///
/// Entity types without schema introspection resolve to an empty list.
pub fn resolve_attributes<S>(catalog: &S, entity: &EntityType) -> Vec<ResolvedAttribute>
where
    S: SchemaCatalog + ?Sized,
{
    match catalog.schema(entity) {
        Some(provider) => constrained_attributes(provider),
        None => Vec::new(),
    }
}

/// Group a provider's rules by attribute and resolve each attribute's kind.
pub fn constrained_attributes(provider: &dyn SchemaProvider) -> Vec<ResolvedAttribute> {
    let mut resolved: Vec<ResolvedAttribute> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for attribute_rule in provider.validation_rules() {
        if let Some(&idx) = index.get(&attribute_rule.attribute) {
            resolved[idx].rules.push(attribute_rule.rule);
            continue;
        }
        let name = attribute_rule.attribute;
        index.insert(name.clone(), resolved.len());
        resolved.push(ResolvedAttribute {
            kind: semantic_kind(provider, &name),
            scale: provider.numeric_scale(&name),
            rules: vec![attribute_rule.rule],
            name,
        });
    }

    resolved
}

fn semantic_kind(provider: &dyn SchemaProvider, attribute: &str) -> SemanticKind {
    if let Some(target) = provider.association_target(attribute) {
        return SemanticKind::Association(target);
    }
    provider
        .storage_kind(attribute)
        .map(SemanticKind::from)
        .unwrap_or(SemanticKind::Virtual)
}
