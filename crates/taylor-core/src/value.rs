use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::rules::Literal;

/// Attribute value. `E` is the instance type produced by the entity
/// constructor, carried by association attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<E> {
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(DateTime<Utc>),
    Entity(Box<E>),
}

impl<E> Value<E> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::DateTime(_) => "datetime",
            Value::Entity(_) => "entity",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric view of any numeric variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            Value::Decimal(value) => value.to_f64(),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(value) => Some(*value),
            Value::DateTime(value) => Some(value.date_naive()),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&E> {
        match self {
            Value::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn into_entity(self) -> Option<E> {
        match self {
            Value::Entity(entity) => Some(*entity),
            _ => None,
        }
    }

    /// Whether this value equals a rule literal. Integers and floats compare numerically.
    pub fn matches_literal(&self, literal: &Literal) -> bool {
        match (self, literal) {
            (Value::Bool(left), Literal::Bool(right)) => left == right,
            (Value::Text(left), Literal::Text(right)) => left == right,
            (Value::Int(left), Literal::Int(right)) => left == right,
            (_, Literal::Int(right)) => self.as_f64() == Some(*right as f64),
            (_, Literal::Float(right)) => self.as_f64() == Some(*right),
            _ => false,
        }
    }
}

impl<E> From<&Literal> for Value<E> {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Bool(value) => Value::Bool(*value),
            Literal::Int(value) => Value::Int(*value),
            Literal::Float(value) => Value::Float(*value),
            Literal::Text(value) => Value::Text(value.clone()),
        }
    }
}

impl<E> From<bool> for Value<E> {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl<E> From<i64> for Value<E> {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl<E> From<f64> for Value<E> {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl<E> From<Decimal> for Value<E> {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl<E> From<&str> for Value<E> {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl<E> From<String> for Value<E> {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<E> From<NaiveDate> for Value<E> {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl<E> From<NaiveTime> for Value<E> {
    fn from(value: NaiveTime) -> Self {
        Value::Time(value)
    }
}

impl<E> From<DateTime<Utc>> for Value<E> {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

/// Attribute name to value mapping that preserves insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSet<E> {
    entries: Vec<(String, Value<E>)>,
}

impl<E> Default for AttributeSet<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> AttributeSet<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value<E>>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a value, keeping the original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value<E>>) -> Option<Value<E>> {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Insert only when the key is absent. Returns whether the value was stored.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: Value<E>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, value));
        true
    }

    pub fn get(&self, name: &str) -> Option<&Value<E>> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Value<E>> {
        let idx = self.position(name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value<E>)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == name)
    }
}

impl<E> IntoIterator for AttributeSet<E> {
    type Item = (String, Value<E>);
    type IntoIter = std::vec::IntoIter<(String, Value<E>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<E, K: Into<String>> FromIterator<(K, Value<E>)> for AttributeSet<E> {
    fn from_iter<I: IntoIterator<Item = (K, Value<E>)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_and_replaces_in_place() {
        let mut set: AttributeSet<()> = AttributeSet::new()
            .with("name", "Jonas")
            .with("amount", 3_i64);
        set.insert("name", "Ada");

        let keys: Vec<&str> = set.keys().collect();
        assert_eq!(keys, vec!["name", "amount"]);
        assert_eq!(set.get("name").and_then(Value::as_str), Some("Ada"));
    }

    #[test]
    fn insert_if_absent_never_overwrites() {
        let mut set: AttributeSet<()> = AttributeSet::new().with("name", "Jonas");
        assert!(!set.insert_if_absent("name", Value::from("other")));
        assert!(set.insert_if_absent("amount", Value::Int(1)));
        assert_eq!(set.get("name").and_then(Value::as_str), Some("Jonas"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn literals_compare_numerically() {
        let value: Value<()> = Value::Float(2.0);
        assert!(value.matches_literal(&Literal::Int(2)));
        assert!(!value.matches_literal(&Literal::Text("2".to_string())));
    }
}
