// Moderation domain models - configuration, policies and outcomes.
//
// These are pure domain types with no HTTP dependencies.
// The web layer converts rejections into status codes.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// BUILT-IN LISTS
// ============================================================================

/// Lowercase terms treated as offensive when they appear as whole words.
pub const DEFAULT_OFFENSIVE_TERMS: &[&str] = &[
    "fuck",
    "fucking",
    "shit",
    "bitch",
    "cunt",
    "ass",
    "asshole",
    "bastard",
    "dick",
    "whore",
    "slut",
    "retard",
    "faggot",
    "nazi",
    "kys",
];

/// Keyword groups that mark a submission as spam (pharmacy, gambling, money-making).
pub const DEFAULT_SPAM_PATTERNS: &[&str] = &[
    r"\b(viagra|cialis|levitra|pharmacy|pills?|xanax|tramadol)\b",
    r"\b(casino|poker|betting|gambling|lottery|jackpot|slots?)\b",
    r"\b(make money( fast)?|earn money|free money|work from home|crypto investment|get rich quick|double your (money|bitcoin))\b",
];

/// Platforms links are allowed to point at. Subdomains are allowed too.
pub const DEFAULT_ALLOWED_DOMAINS: &[&str] = &[
    "github.com",
    "linkedin.com",
    "youtube.com",
    "youtu.be",
    "twitter.com",
    "x.com",
    "instagram.com",
    "steamcommunity.com",
    "medal.tv",
    "leetify.com",
    "hevy.com",
];

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for the content filter.
///
/// The defaults give the built-in lists; `extra_terms` and `allowed_domains`
/// extend them rather than replace them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Additional offensive terms on top of the built-in list
    pub extra_terms: Vec<String>,
    /// Additional link domains on top of the built-in allow-list
    pub allowed_domains: Vec<String>,
    /// Character used to mask offensive words
    pub mask_char: char,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            extra_terms: Vec::new(),
            allowed_domains: Vec::new(),
            mask_char: '*',
        }
    }
}

/// Configuration for a sliding-window rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Attempts allowed inside one window
    pub max_submissions: u32,
    /// Length of the trailing window
    pub window: Duration,
    /// Upper bound on clients tracked at once
    pub max_tracked_clients: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_submissions: 5,                 // 5 submissions...
            window: Duration::from_secs(3_600), // ...per hour
            max_tracked_clients: 10_000,
        }
    }
}

/// What the gate does with text that contains offensive words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffensivePolicy {
    /// Reject the whole submission
    #[default]
    Reject,
    /// Mask the offensive words and let it through
    Redact,
}

impl std::str::FromStr for OffensivePolicy {
    type Err = ModerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(OffensivePolicy::Reject),
            "redact" => Ok(OffensivePolicy::Redact),
            other => Err(ModerationError::UnknownPolicy(other.to_string())),
        }
    }
}

// ============================================================================
// OUTCOMES & ERRORS
// ============================================================================

/// Why a submission was turned away by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionRejection {
    #[error("Too many submissions. Please try again later.")]
    RateLimited,

    #[error("Submission contains inappropriate language")]
    OffensiveContent,

    #[error("Submission looks like spam")]
    Spam,
}

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Invalid filter pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown offensive content policy: {0}")]
    UnknownPolicy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "reject".parse::<OffensivePolicy>().unwrap(),
            OffensivePolicy::Reject
        );
        assert_eq!(
            " Redact ".parse::<OffensivePolicy>().unwrap(),
            OffensivePolicy::Redact
        );
        assert!("shadowban".parse::<OffensivePolicy>().is_err());
    }

    #[test]
    fn test_default_rate_limit_is_five_per_hour() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_submissions, 5);
        assert_eq!(config.window, Duration::from_secs(3_600));
    }
}
