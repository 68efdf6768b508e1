//! Full-text search query helpers and pagination clamps.
//!
//! The search index itself is an opaque collaborator (rows are only ever
//! added or deleted by the index synchronizer); these helpers build the
//! PostgreSQL `tsquery` strings used to query it and clamp user-provided
//! paging parameters.

// ---------------------------------------------------------------------------
// Relevance weights
// ---------------------------------------------------------------------------

/// PostgreSQL tsvector weight for the post title (highest priority).
pub const WEIGHT_TITLE: char = 'A';

/// PostgreSQL tsvector weight for the post body.
pub const WEIGHT_BODY: char = 'B';

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of results per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of results per page.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Query builder helpers
// ---------------------------------------------------------------------------

/// Sanitize user input into a list of terms suitable for tsquery construction.
///
/// - Splits on whitespace.
/// - Strips non-alphanumeric characters (except `_`) from each term.
/// - Drops empty terms.
///
/// Returns `None` if the input yields no usable terms.
fn sanitize_terms(query: &str) -> Option<Vec<&str>> {
    let terms: Vec<&str> = query
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '_'))
        .filter(|t| !t.is_empty())
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms)
    }
}

/// Sanitize and convert user input into a PostgreSQL `tsquery` string.
///
/// - Whitespace-separated terms are joined with `&` (AND).
/// - Empty or whitespace-only input returns `None`.
/// - Special characters that could break tsquery parsing are stripped.
///
/// # Examples
///
/// ```
/// use quill_core::search::build_tsquery;
/// assert_eq!(build_tsquery("rust async"), Some("rust & async".to_string()));
/// assert_eq!(build_tsquery("  "), None);
/// ```
pub fn build_tsquery(query: &str) -> Option<String> {
    sanitize_terms(query).map(|terms| terms.join(" & "))
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- build_tsquery -------------------------------------------------------

    #[test]
    fn tsquery_single_term() {
        assert_eq!(build_tsquery("hello"), Some("hello".to_string()));
    }

    #[test]
    fn tsquery_multiple_terms_joined_with_and() {
        assert_eq!(build_tsquery("rust blog"), Some("rust & blog".to_string()));
    }

    #[test]
    fn tsquery_trims_special_characters() {
        assert_eq!(
            build_tsquery("hello! world?"),
            Some("hello & world".to_string())
        );
    }

    #[test]
    fn tsquery_empty_returns_none() {
        assert_eq!(build_tsquery(""), None);
        assert_eq!(build_tsquery("   "), None);
    }

    // -- clamp_limit ---------------------------------------------------------

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
    }

    #[test]
    fn clamp_limit_respects_max() {
        assert_eq!(clamp_limit(Some(200), 20, 100), 100);
    }

    #[test]
    fn clamp_limit_floors_at_one() {
        assert_eq!(clamp_limit(Some(-5), 20, 100), 1);
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
    }

    // -- clamp_offset --------------------------------------------------------

    #[test]
    fn clamp_offset_defaults_to_zero() {
        assert_eq!(clamp_offset(None), 0);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(Some(-10)), 0);
    }
}
