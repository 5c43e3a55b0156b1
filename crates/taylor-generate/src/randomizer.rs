use rand::{Rng, RngCore};
use rand_regex::Regex as RandRegex;
use regex::Regex;
use tracing::warn;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DEFAULT_MAX_REPEAT: u32 = 32;
const PATTERN_ATTEMPTS: usize = 16;

/// Lowercase alphabetic string with a length drawn uniformly from `[min, max]`.
pub fn alpha_string(min: usize, max: usize, rng: &mut dyn RngCore) -> String {
    let len = if min >= max {
        min
    } else {
        rng.random_range(min..=max)
    };
    (0..len)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect()
}

/// String matching `pattern`, or `None` when the pattern cannot drive generation.
///
/// Leading/trailing anchors are dropped before generation and every candidate
/// is checked against the full pattern.
pub fn pattern_string(pattern: &str, rng: &mut dyn RngCore) -> Option<String> {
    let matcher = match Regex::new(pattern) {
        Ok(matcher) => matcher,
        Err(err) => {
            warn!(pattern, error = %err, "format pattern does not compile");
            return None;
        }
    };
    let generator = match RandRegex::compile(strip_anchors(pattern), DEFAULT_MAX_REPEAT) {
        Ok(generator) => generator,
        Err(err) => {
            warn!(pattern, error = %err, "format pattern not supported for generation");
            return None;
        }
    };

    for _ in 0..PATTERN_ATTEMPTS {
        let candidate: String = rng.sample(&generator);
        if matcher.is_match(&candidate) {
            return Some(candidate);
        }
    }

    warn!(pattern, attempts = PATTERN_ATTEMPTS, "no generated value matched format pattern");
    None
}

fn strip_anchors(pattern: &str) -> &str {
    let mut inner = pattern;
    if let Some(rest) = inner.strip_prefix("\\A") {
        inner = rest;
    } else if let Some(rest) = inner.strip_prefix('^') {
        inner = rest;
    }
    if let Some(rest) = inner.strip_suffix("\\z") {
        inner = rest;
    } else if inner.ends_with('$') && !is_escaped_tail(inner) {
        inner = &inner[..inner.len() - 1];
    }
    inner
}

fn is_escaped_tail(pattern: &str) -> bool {
    let body = &pattern[..pattern.len() - 1];
    body.chars().rev().take_while(|ch| *ch == '\\').count() % 2 == 1
}
