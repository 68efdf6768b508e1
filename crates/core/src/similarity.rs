//! Text similarity estimation for edit materiality decisions.
//!
//! Computes a cheap distance between two text blobs via a 64-bit simhash
//! over normalized word tokens. Markup and whitespace churn normalize away,
//! so only token-level content changes register. Pure domain logic, no
//! database access.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::htmldiff::strip_tags;

// ---------------------------------------------------------------------------
// Threshold constants
// ---------------------------------------------------------------------------

/// Maximum distance at which a third-party body change counts as a no-op.
pub const NO_OP_MAX_DISTANCE: u32 = 1;

/// Minimum title distance that marks a revision as a comment "reset point".
pub const TITLE_RESET_MIN_DISTANCE: u32 = 10;

// ---------------------------------------------------------------------------
// Fingerprinting
// ---------------------------------------------------------------------------

/// Lowercased word tokens of the tag-stripped input.
fn tokenize(text: &str) -> Vec<String> {
    strip_tags(text)
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn hash_token(token: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    hasher.finish()
}

/// Compute a 64-bit simhash fingerprint of the given text.
///
/// Each unique token votes its hash bits weighted by occurrence count; a
/// result bit is set when the weighted vote is positive. Empty input yields
/// fingerprint `0`.
pub fn fingerprint(text: &str) -> u64 {
    let mut counts: HashMap<String, i64> = HashMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }

    let mut votes = [0i64; 64];
    for (token, count) in &counts {
        let h = hash_token(token);
        for (bit, vote) in votes.iter_mut().enumerate() {
            if (h >> bit) & 1 == 1 {
                *vote += count;
            } else {
                *vote -= count;
            }
        }
    }

    let mut fp = 0u64;
    for (bit, vote) in votes.iter().enumerate() {
        if *vote > 0 {
            fp |= 1 << bit;
        }
    }
    fp
}

/// Distance between two texts: the Hamming distance of their fingerprints.
///
/// Zero for identical (or markup/whitespace-equivalent) inputs, symmetric,
/// and grows with the amount of token-level change.
pub fn distance(a: &str, b: &str) -> u32 {
    (fingerprint(a) ^ fingerprint(b)).count_ones()
}

// ---------------------------------------------------------------------------
// Workflow predicates
// ---------------------------------------------------------------------------

/// A third-party submission is a no-op when the title is unchanged and the
/// body moved at most [`NO_OP_MAX_DISTANCE`].
pub fn is_noop_change(old_title: &str, new_title: &str, old_body: &str, new_body: &str) -> bool {
    old_title == new_title && distance(old_body, new_body) <= NO_OP_MAX_DISTANCE
}

/// A self-edit is archived to the revision store only when the body
/// actually moved.
pub fn is_material_edit(old_body: &str, new_body: &str) -> bool {
    distance(old_body, new_body) > 0
}

/// A title change beyond [`TITLE_RESET_MIN_DISTANCE`] marks prior comments
/// as referring to an older incarnation of the post.
pub fn is_title_reset(old_title: &str, new_title: &str) -> bool {
    distance(old_title, new_title) > TITLE_RESET_MIN_DISTANCE
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- distance properties -------------------------------------------------

    #[test]
    fn distance_identity_is_zero() {
        assert_eq!(distance("", ""), 0);
        assert_eq!(distance("hello", "hello"), 0);
        assert_eq!(distance("<p>Some longer text here</p>", "<p>Some longer text here</p>"), 0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = "the quick brown fox jumps over the lazy dog";
        let b = "an entirely different sentence about nothing";
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn whitespace_churn_is_zero_distance() {
        assert_eq!(distance("hello   world", "hello\n\tworld "), 0);
    }

    #[test]
    fn markup_churn_is_zero_distance() {
        assert_eq!(
            distance(
                "<p class=\"a\">hello <b>world</b></p>",
                "<div id=\"x\"><span>hello</span> world</div>"
            ),
            0
        );
    }

    #[test]
    fn case_churn_is_zero_distance() {
        assert_eq!(distance("Hello World", "hello world"), 0);
    }

    #[test]
    fn appended_word_exceeds_noop_threshold() {
        // The intake flow must treat "Hello" -> "Hello world" as a real change.
        assert!(distance("Hello", "Hello world") > NO_OP_MAX_DISTANCE);
    }

    #[test]
    fn small_edit_is_material() {
        assert!(is_material_edit("Hello", "Hello there"));
        assert!(!is_material_edit("Hello", "Hello"));
    }

    #[test]
    fn disjoint_texts_are_far_apart() {
        let a = "rust makes systems programming approachable and safe for everyone";
        let b = "gardening tips include watering tomatoes early during summer mornings";
        assert!(distance(a, b) > TITLE_RESET_MIN_DISTANCE);
    }

    // -- is_noop_change ------------------------------------------------------

    #[test]
    fn identical_submission_is_noop() {
        assert!(is_noop_change("Title", "Title", "body text", "body text"));
    }

    #[test]
    fn changed_title_is_not_noop() {
        assert!(!is_noop_change("Title", "Other title", "body text", "body text"));
    }

    #[test]
    fn changed_body_is_not_noop() {
        assert!(!is_noop_change(
            "Title",
            "Title",
            "Hello",
            "Hello world, this adds several new words of content"
        ));
    }

    // -- is_title_reset ------------------------------------------------------

    #[test]
    fn punctuation_only_title_change_is_not_reset() {
        assert!(!is_title_reset("Hello, world", "Hello world!"));
    }

    #[test]
    fn complete_rewrite_is_reset() {
        assert!(is_title_reset(
            "My favourite hiking trails in the alps",
            "Benchmarking async runtimes under production load"
        ));
    }

    // -- fingerprint ---------------------------------------------------------

    #[test]
    fn empty_text_fingerprints_to_zero() {
        assert_eq!(fingerprint(""), 0);
        assert_eq!(fingerprint("<p>   </p>"), 0);
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let text = "deterministic fingerprints are required for stable thresholds";
        assert_eq!(fingerprint(text), fingerprint(text));
    }
}
