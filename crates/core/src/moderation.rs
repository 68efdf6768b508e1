//! Post lifecycle states, region restrictions, and trust-gate checks.
//!
//! The trust gate is a pure predicate layer: banned-keyword scanning and
//! field normalization live here; the email-blacklist and category checks
//! need the database and live with the repositories.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::htmldiff::strip_tags;

// ---------------------------------------------------------------------------
// Post status constants
// ---------------------------------------------------------------------------

/// Submitted, awaiting moderator review.
pub const STATUS_PENDING: &str = "pending";
/// Live and indexed.
pub const STATUS_PUBLISHED: &str = "published";
/// Accepted, waiting for its scheduled publication time.
pub const STATUS_SCHEDULE: &str = "schedule";
/// Pulled from publication by a moderator.
pub const STATUS_TAKEDOWN: &str = "takedown";
/// Removed as abusive; the author's email is blacklisted for submissions.
pub const STATUS_FORBIDDEN: &str = "forbidden";

/// All valid post statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_PUBLISHED,
    STATUS_SCHEDULE,
    STATUS_TAKEDOWN,
    STATUS_FORBIDDEN,
];

/// Lifecycle status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Pending,
    Published,
    Schedule,
    Takedown,
    Forbidden,
}

impl PostStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Published => STATUS_PUBLISHED,
            Self::Schedule => STATUS_SCHEDULE,
            Self::Takedown => STATUS_TAKEDOWN,
            Self::Forbidden => STATUS_FORBIDDEN,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_PUBLISHED => Ok(Self::Published),
            STATUS_SCHEDULE => Ok(Self::Schedule),
            STATUS_TAKEDOWN => Ok(Self::Takedown),
            STATUS_FORBIDDEN => Ok(Self::Forbidden),
            other => Err(CoreError::Validation(format!(
                "Unknown post status: '{other}'. Valid statuses: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Region limit modes
// ---------------------------------------------------------------------------

pub const LIMIT_ALL: &str = "all";
pub const LIMIT_ALLOW_REGION: &str = "allow_region";
pub const LIMIT_FORBID_REGION: &str = "forbid_region";
pub const LIMIT_ALLOW_EXCEPT: &str = "allow_region_except_forbid";
pub const LIMIT_FORBID_EXCEPT: &str = "forbid_region_except_allow";
/// Reachable only through external search engines; excluded from the
/// internal search index.
pub const LIMIT_SEARCH_ENGINE_ONLY: &str = "search_engine_only";

/// All valid region limit modes.
pub const VALID_LIMIT_MODES: &[&str] = &[
    LIMIT_ALL,
    LIMIT_ALLOW_REGION,
    LIMIT_FORBID_REGION,
    LIMIT_ALLOW_EXCEPT,
    LIMIT_FORBID_EXCEPT,
    LIMIT_SEARCH_ENGINE_ONLY,
];

/// Regional visibility restriction of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionLimitMode {
    #[default]
    All,
    AllowRegion,
    ForbidRegion,
    AllowRegionExceptForbid,
    ForbidRegionExceptAllow,
    SearchEngineOnly,
}

impl RegionLimitMode {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => LIMIT_ALL,
            Self::AllowRegion => LIMIT_ALLOW_REGION,
            Self::ForbidRegion => LIMIT_FORBID_REGION,
            Self::AllowRegionExceptForbid => LIMIT_ALLOW_EXCEPT,
            Self::ForbidRegionExceptAllow => LIMIT_FORBID_EXCEPT,
            Self::SearchEngineOnly => LIMIT_SEARCH_ENGINE_ONLY,
        }
    }

    /// Parse from a string, returning an error for unknown modes.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            LIMIT_ALL => Ok(Self::All),
            LIMIT_ALLOW_REGION => Ok(Self::AllowRegion),
            LIMIT_FORBID_REGION => Ok(Self::ForbidRegion),
            LIMIT_ALLOW_EXCEPT => Ok(Self::AllowRegionExceptForbid),
            LIMIT_FORBID_EXCEPT => Ok(Self::ForbidRegionExceptAllow),
            LIMIT_SEARCH_ENGINE_ONLY => Ok(Self::SearchEngineOnly),
            other => Err(CoreError::Validation(format!(
                "Unknown region limit mode: '{other}'. Valid modes: {}",
                VALID_LIMIT_MODES.join(", ")
            ))),
        }
    }

    /// Modes that require a `regions` list.
    pub fn requires_regions(&self) -> bool {
        !matches!(self, Self::All | Self::SearchEngineOnly)
    }

    /// Modes that additionally require an `except_regions` list.
    pub fn requires_except_regions(&self) -> bool {
        matches!(self, Self::AllowRegionExceptForbid | Self::ForbidRegionExceptAllow)
    }
}

/// Normalize a region list to the stored `|`-separated form.
///
/// Accepts comma (half- or full-width) separated input.
pub fn normalize_regions(regions: &str) -> String {
    regions
        .split([',', '，', '|'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("|")
}

/// Validate a post's region restriction configuration.
///
/// Returns the normalized `(regions, except_regions)` pair on success.
pub fn validate_region_config(
    mode: RegionLimitMode,
    regions: Option<&str>,
    except_regions: Option<&str>,
) -> Result<(Option<String>, Option<String>), CoreError> {
    if !mode.requires_regions() {
        return Ok((None, None));
    }

    let regions = regions.map(normalize_regions).filter(|r| !r.is_empty());
    if regions.is_none() {
        return Err(CoreError::Validation(
            "Region-restricted posts must list the restricted regions".into(),
        ));
    }

    let except = except_regions.map(normalize_regions).filter(|r| !r.is_empty());
    if mode.requires_except_regions() && except.is_none() {
        return Err(CoreError::Validation(
            "This region limit mode requires an exception region list".into(),
        ));
    }

    Ok((regions, except))
}

// ---------------------------------------------------------------------------
// Banned keyword scan
// ---------------------------------------------------------------------------

/// Scan combined submission text against the maintained keyword set.
///
/// Returns the first matched term so the rejection can be logged with it.
/// Patterns are joined into a single case-insensitive alternation; an
/// invalid pattern in the set disables only itself.
pub fn scan_banned_keywords(text: &str, patterns: &[String]) -> Option<String> {
    let alternation = patterns
        .iter()
        .filter(|p| !p.trim().is_empty())
        .map(|p| format!("(?:{p})"))
        .collect::<Vec<_>>()
        .join("|");
    if alternation.is_empty() {
        return None;
    }

    let re = match RegexBuilder::new(&alternation).case_insensitive(true).build() {
        Ok(re) => re,
        // Fall back to literal matching when a maintained pattern is broken.
        Err(_) => {
            let lower = text.to_lowercase();
            return patterns
                .iter()
                .find(|p| !p.trim().is_empty() && lower.contains(&p.to_lowercase()))
                .cloned();
        }
    };

    re.find(text).map(|m| m.as_str().to_string())
}

// ---------------------------------------------------------------------------
// Field normalization
// ---------------------------------------------------------------------------

/// Maximum stored length of the comma-joined label list.
pub const MAX_LABEL_LEN: usize = 50;

/// Normalize a submitted label list: full-width commas become commas, blank
/// or literal "null" input becomes `None`, and the result is truncated to
/// [`MAX_LABEL_LEN`] characters.
pub fn normalize_label(label: Option<&str>) -> Option<String> {
    let label = label?.trim().replace('，', ",");
    if label.is_empty() || label == "null" {
        return None;
    }
    Some(label.chars().take(MAX_LABEL_LEN).collect())
}

/// Normalize paywalled content: markup-only or literal "null" input becomes
/// `None`.
pub fn normalize_protect_content(content: Option<&str>) -> Option<String> {
    let content = content?;
    if content == "null" || strip_tags(content).is_empty() {
        return None;
    }
    Some(content.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
