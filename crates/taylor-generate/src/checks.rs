use regex::Regex;

use taylor_core::{
    Acceptance, AttributeRule, AttributeSet, Length, Literal, Numericality, Rule, SchemaProvider,
    Value,
};

/// Result of evaluating a rule against a value.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Passed,
    Failed,
    Unsupported,
}

/// Evaluate one rule against an attribute value (`None` when unset).
pub fn evaluate_rule<E>(rule: &Rule, value: Option<&Value<E>>) -> CheckOutcome {
    match rule {
        Rule::Presence => outcome(value.is_some_and(is_present)),
        Rule::Acceptance(acceptance) => evaluate_acceptance(acceptance, value),
        Rule::Format { pattern } => evaluate_format(pattern, value),
        Rule::InclusionOf { candidates } => evaluate_inclusion(candidates, value),
        Rule::Length(length) => evaluate_length(length, value),
        Rule::Numericality(numericality) => evaluate_numericality(numericality, value),
    }
}

/// Every rule of `provider` that `attributes` fails.
pub fn violations<E>(provider: &dyn SchemaProvider, attributes: &AttributeSet<E>) -> Vec<AttributeRule> {
    provider
        .validation_rules()
        .into_iter()
        .filter(|rule| {
            evaluate_rule(&rule.rule, attributes.get(&rule.attribute)) == CheckOutcome::Failed
        })
        .collect()
}

fn outcome(passed: bool) -> CheckOutcome {
    if passed {
        CheckOutcome::Passed
    } else {
        CheckOutcome::Failed
    }
}

fn is_present<E>(value: &Value<E>) -> bool {
    match value {
        Value::Text(text) => !text.trim().is_empty(),
        _ => true,
    }
}

fn evaluate_acceptance<E>(acceptance: &Acceptance, value: Option<&Value<E>>) -> CheckOutcome {
    match value {
        None => outcome(acceptance.allow_nil),
        Some(value) => outcome(value.matches_literal(&acceptance.accept)),
    }
}

fn evaluate_format<E>(pattern: &str, value: Option<&Value<E>>) -> CheckOutcome {
    let Ok(regex) = Regex::new(pattern) else {
        return CheckOutcome::Unsupported;
    };
    match value {
        None => CheckOutcome::Failed,
        Some(Value::Text(text)) => outcome(regex.is_match(text)),
        Some(_) => CheckOutcome::Unsupported,
    }
}

fn evaluate_inclusion<E>(candidates: &[Literal], value: Option<&Value<E>>) -> CheckOutcome {
    match value {
        None => CheckOutcome::Failed,
        Some(value) => outcome(candidates.iter().any(|candidate| value.matches_literal(candidate))),
    }
}

fn evaluate_length<E>(length: &Length, value: Option<&Value<E>>) -> CheckOutcome {
    let len = match value {
        None => 0,
        Some(Value::Text(text)) => text.chars().count(),
        Some(_) => return CheckOutcome::Unsupported,
    };
    if let Some(is) = length.is {
        return outcome(len == is);
    }
    let above_minimum = length.minimum.is_none_or(|minimum| len >= minimum);
    let below_maximum = length.maximum.is_none_or(|maximum| len <= maximum);
    outcome(above_minimum && below_maximum)
}

fn evaluate_numericality<E>(numericality: &Numericality, value: Option<&Value<E>>) -> CheckOutcome {
    let number = match value {
        None => return CheckOutcome::Failed,
        Some(Value::Text(text)) => match text.trim().parse::<f64>() {
            Ok(number) => number,
            Err(_) => return CheckOutcome::Failed,
        },
        Some(value) => match value.as_f64() {
            Some(number) => number,
            None => return CheckOutcome::Unsupported,
        },
    };
    let passed = numericality.less_than.is_none_or(|bound| number < bound)
        && numericality
            .less_than_or_equal
            .is_none_or(|bound| number <= bound)
        && numericality.greater_than.is_none_or(|bound| number > bound)
        && numericality
            .greater_than_or_equal
            .is_none_or(|bound| number >= bound);
    outcome(passed)
}
