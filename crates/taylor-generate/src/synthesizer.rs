//! Value synthesis per semantic kind.
//!
//! Each kind walks its rules in a fixed precedence and the first rule that
//! yields a value wins. A kind with no applicable rule has no opinion and the
//! attribute stays unset.

use std::str::FromStr;

use chrono::{Local, Utc};
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use taylor_core::{EntityType, Length, Numericality, Value};

use crate::randomizer::{alpha_string, pattern_string};
use crate::resolver::{ResolvedAttribute, RuleSet, SemanticKind};

/// Width of the fallback numeric interval.
pub const NUMERIC_SPAN: i64 = 100_000;
const PRESENCE_MIN_LEN: usize = 4;
const PRESENCE_MAX_LEN: usize = 10;
const MINIMUM_LENGTH_SLACK: usize = 8;

/// Outcome of synthesizing one attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Synthesis<E> {
    Value(Value<E>),
    /// Generate an instance of the target entity type and use it as the value.
    Associate(EntityType),
    NoOpinion,
}

impl<E> From<Option<Value<E>>> for Synthesis<E> {
    fn from(value: Option<Value<E>>) -> Self {
        match value {
            Some(value) => Synthesis::Value(value),
            None => Synthesis::NoOpinion,
        }
    }
}

/// Synthesize a value for a resolved attribute.
pub fn synthesize<E>(attribute: &ResolvedAttribute, rng: &mut dyn RngCore) -> Synthesis<E> {
    let rules = attribute.rule_set();
    match &attribute.kind {
        SemanticKind::String | SemanticKind::Text => string(&rules, rng).into(),
        SemanticKind::Integer => integer(&rules, rng).into(),
        SemanticKind::Float => float(&rules, rng).map(Value::Float).into(),
        SemanticKind::Decimal => decimal(&rules, attribute.scale, rng).into(),
        SemanticKind::Boolean => Synthesis::Value(boolean(&rules, rng)),
        SemanticKind::Date => temporal(&rules, || Value::Date(Local::now().date_naive())).into(),
        SemanticKind::Time => temporal(&rules, || Value::Time(Local::now().time())).into(),
        SemanticKind::DateTime => temporal(&rules, || Value::DateTime(Utc::now())).into(),
        SemanticKind::Association(target) => Synthesis::Associate(target.clone()),
        SemanticKind::Virtual => virtual_value(&rules, rng).into(),
        SemanticKind::Unknown => Synthesis::NoOpinion,
    }
}

/// Kind a virtual attribute is synthesized as, inferred from its rules.
pub fn infer_virtual_kind(rules: &RuleSet<'_>) -> Option<SemanticKind> {
    if rules.inclusion().is_some() || rules.format().is_some() || rules.length().is_some() {
        Some(SemanticKind::String)
    } else if rules.numericality().is_some() {
        Some(SemanticKind::Integer)
    } else if rules.acceptance().is_some() {
        Some(SemanticKind::Boolean)
    } else if rules.presence() {
        Some(SemanticKind::String)
    } else {
        None
    }
}

fn virtual_value<E>(rules: &RuleSet<'_>, rng: &mut dyn RngCore) -> Option<Value<E>> {
    match infer_virtual_kind(rules)? {
        SemanticKind::Integer => integer(rules, rng),
        SemanticKind::Boolean => Some(boolean(rules, rng)),
        _ => string(rules, rng),
    }
}

fn string<E>(rules: &RuleSet<'_>, rng: &mut dyn RngCore) -> Option<Value<E>> {
    if let Some(candidates) = rules.inclusion()
        && let Some(candidate) = candidates.choose(&mut *rng)
    {
        return Some(Value::from(candidate));
    }
    if let Some(pattern) = rules.format()
        && let Some(text) = pattern_string(pattern, rng)
    {
        return Some(Value::Text(text));
    }
    if let Some((min, max)) = rules.length().and_then(length_bounds) {
        return Some(Value::Text(alpha_string(min, max, rng)));
    }
    if rules.presence() {
        return Some(Value::Text(alpha_string(PRESENCE_MIN_LEN, PRESENCE_MAX_LEN, rng)));
    }
    None
}

/// Inclusive length interval described by a length rule.
pub fn length_bounds(length: &Length) -> Option<(usize, usize)> {
    match (length.is, length.minimum, length.maximum) {
        (Some(is), _, _) => Some((is, is)),
        (None, Some(minimum), Some(maximum)) => Some((minimum, maximum.max(minimum))),
        (None, Some(minimum), None) => Some((minimum, minimum + MINIMUM_LENGTH_SLACK)),
        (None, None, Some(maximum)) => Some((maximum.min(1), maximum)),
        (None, None, None) => None,
    }
}

fn integer<E>(rules: &RuleSet<'_>, rng: &mut dyn RngCore) -> Option<Value<E>> {
    let (min, max) = match rules.numericality() {
        Some(numericality) => integer_bounds(numericality),
        None if rules.presence() => (0, NUMERIC_SPAN - 1),
        None => return None,
    };
    Some(Value::Int(rng.random_range(min..=max)))
}

/// Inclusive integer interval for a numericality rule. The first bound in
/// `less_than`, `less_than_or_equal`, `greater_than`, `greater_than_or_equal`
/// order decides.
pub fn integer_bounds(numericality: &Numericality) -> (i64, i64) {
    if let Some(bound) = numericality.less_than {
        below((bound.ceil() as i64).saturating_sub(1))
    } else if let Some(bound) = numericality.less_than_or_equal {
        below(bound.floor() as i64)
    } else if let Some(bound) = numericality.greater_than {
        let min = (bound.floor() as i64).saturating_add(1);
        (min, min.saturating_add(NUMERIC_SPAN - 1))
    } else if let Some(bound) = numericality.greater_than_or_equal {
        let min = bound.ceil() as i64;
        (min, min.saturating_add(NUMERIC_SPAN))
    } else {
        (0, NUMERIC_SPAN - 1)
    }
}

/// Interval ending at `max`: starts at zero, or reaches below zero for negative caps.
fn below(max: i64) -> (i64, i64) {
    if max >= 0 {
        (0, max)
    } else {
        (max.saturating_sub(NUMERIC_SPAN - 1), max)
    }
}

fn float(rules: &RuleSet<'_>, rng: &mut dyn RngCore) -> Option<f64> {
    let span = NUMERIC_SPAN as f64;
    let Some(numericality) = rules.numericality() else {
        return rules.presence().then(|| rng.random_range(0.0..span));
    };

    let value = if let Some(bound) = numericality.less_than {
        let min = if bound > 0.0 { 0.0 } else { bound - span };
        rng.random_range(min..bound)
    } else if let Some(bound) = numericality.less_than_or_equal {
        let min = if bound >= 0.0 { 0.0 } else { bound - span };
        rng.random_range(min..=bound)
    } else if let Some(bound) = numericality.greater_than {
        // 1 - [0, 1) lands in (0, 1], keeping the lower bound exclusive.
        let offset = span * (1.0 - rng.random::<f64>());
        let value = bound + offset;
        if value > bound { value } else { bound + span }
    } else if let Some(bound) = numericality.greater_than_or_equal {
        rng.random_range(bound..=bound + span)
    } else {
        rng.random_range(0.0..span)
    };
    Some(value)
}

fn decimal<E>(rules: &RuleSet<'_>, scale: Option<u32>, rng: &mut dyn RngCore) -> Option<Value<E>> {
    let exact = exact_decimal(float(rules, rng)?)?;
    let Some(scale) = scale else {
        return Some(Value::Decimal(exact));
    };
    Some(Value::Decimal(
        exact.round_dp_with_strategy(scale, rounding_strategy(rules.numericality())),
    ))
}

/// Decimal carrying the shortest text of `value`, free of binary rounding artifacts.
fn exact_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
}

/// Round toward the inside of the constrained interval.
fn rounding_strategy(numericality: Option<&Numericality>) -> RoundingStrategy {
    match numericality {
        Some(n) if n.less_than.is_some() || n.less_than_or_equal.is_some() => {
            RoundingStrategy::ToNegativeInfinity
        }
        Some(n) if n.greater_than.is_some() || n.greater_than_or_equal.is_some() => {
            RoundingStrategy::ToPositiveInfinity
        }
        _ => RoundingStrategy::MidpointNearestEven,
    }
}

fn boolean<E>(rules: &RuleSet<'_>, rng: &mut dyn RngCore) -> Value<E> {
    match rules.acceptance() {
        Some(acceptance) if !acceptance.allow_nil => Value::from(&acceptance.accept),
        _ => Value::Bool(rng.random_bool(0.5)),
    }
}

fn temporal<E>(rules: &RuleSet<'_>, now: impl FnOnce() -> Value<E>) -> Option<Value<E>> {
    rules.presence().then(now)
}
