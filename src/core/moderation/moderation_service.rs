// Submission gate - the pre-write check every user submission goes through.
//
// Order matters here:
// 1. Rate limit (cheap, and counts the attempt even if the text is rejected)
// 2. Spam patterns (never redactable)
// 3. Offensive words (rejected or masked, depending on policy)
//
// NO HTTP dependencies here - just pure domain logic.

use super::content_filter::ContentFilter;
use super::moderation_models::{OffensivePolicy, SubmissionRejection};
use super::rate_limiter::SubmissionRateLimiter;
use std::sync::Arc;

/// Combines the content filter and a rate limiter into a single gate.
pub struct SubmissionGate {
    filter: Arc<ContentFilter>,
    limiter: Arc<SubmissionRateLimiter>,
    policy: OffensivePolicy,
}

impl SubmissionGate {
    pub fn new(
        filter: Arc<ContentFilter>,
        limiter: Arc<SubmissionRateLimiter>,
        policy: OffensivePolicy,
    ) -> Self {
        Self {
            filter,
            limiter,
            policy,
        }
    }

    /// Run a submission through the gate.
    ///
    /// # Arguments
    /// * `client_id` - Who is submitting (usually the source IP)
    /// * `fields` - Every user-provided text field of the submission
    ///
    /// # Returns
    /// The fields in the same order, masked when the policy is `Redact`.
    pub fn admit(
        &self,
        client_id: &str,
        fields: &[&str],
    ) -> Result<Vec<String>, SubmissionRejection> {
        self.admit_with_policy(client_id, fields, self.policy)
    }

    /// Same as `admit`, overriding the configured policy. Used for fields
    /// where a masked value is useless (email addresses).
    pub fn admit_with_policy(
        &self,
        client_id: &str,
        fields: &[&str],
        policy: OffensivePolicy,
    ) -> Result<Vec<String>, SubmissionRejection> {
        if !self.limiter.check_rate_limit(client_id) {
            tracing::info!(client_id, "Submission rejected: rate limited");
            return Err(SubmissionRejection::RateLimited);
        }

        let mut admitted = Vec::with_capacity(fields.len());
        for field in fields {
            if self.filter.matches_spam_pattern(field) {
                tracing::info!(client_id, "Submission rejected: spam");
                return Err(SubmissionRejection::Spam);
            }

            if self.filter.contains_offensive_terms(field) {
                match policy {
                    OffensivePolicy::Reject => {
                        tracing::info!(client_id, "Submission rejected: offensive content");
                        return Err(SubmissionRejection::OffensiveContent);
                    }
                    OffensivePolicy::Redact => {
                        tracing::info!(client_id, "Submission redacted: offensive content");
                        admitted.push(self.filter.clean_text(field));
                        continue;
                    }
                }
            }

            admitted.push(field.to_string());
        }

        Ok(admitted)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::moderation::{FilterConfig, RateLimitConfig};

    fn gate(policy: OffensivePolicy, max_submissions: u32) -> SubmissionGate {
        let filter = ContentFilter::new(&FilterConfig::default()).unwrap();
        let limiter = SubmissionRateLimiter::new(RateLimitConfig {
            max_submissions,
            ..Default::default()
        });
        SubmissionGate::new(Arc::new(filter), Arc::new(limiter), policy)
    }

    #[test]
    fn test_clean_submission_passes_unchanged() {
        let gate = gate(OffensivePolicy::Reject, 5);

        let admitted = gate.admit("1.2.3.4", &["Alice", "Lovely site!"]).unwrap();

        assert_eq!(admitted, vec!["Alice".to_string(), "Lovely site!".to_string()]);
    }

    #[test]
    fn test_offensive_rejected_under_reject_policy() {
        let gate = gate(OffensivePolicy::Reject, 5);

        let result = gate.admit("1.2.3.4", &["Bob", "this is shit"]);

        assert_eq!(result, Err(SubmissionRejection::OffensiveContent));
    }

    #[test]
    fn test_offensive_masked_under_redact_policy() {
        let gate = gate(OffensivePolicy::Redact, 5);

        let admitted = gate.admit("1.2.3.4", &["Bob", "this is shit"]).unwrap();

        assert_eq!(admitted[1], "this is ****");
    }

    #[test]
    fn test_spam_rejected_even_when_redacting() {
        let gate = gate(OffensivePolicy::Redact, 5);

        let result = gate.admit("1.2.3.4", &["Bob", "visit https://cheap-pills.example"]);

        assert_eq!(result, Err(SubmissionRejection::Spam));
    }

    #[test]
    fn test_policy_override() {
        let gate = gate(OffensivePolicy::Redact, 5);

        let result =
            gate.admit_with_policy("1.2.3.4", &["shit@example.com"], OffensivePolicy::Reject);

        assert_eq!(result, Err(SubmissionRejection::OffensiveContent));
    }

    #[test]
    fn test_rate_limit_checked_before_content() {
        let gate = gate(OffensivePolicy::Reject, 1);

        assert!(gate.admit("1.2.3.4", &["first"]).is_ok());
        // Offensive text, but the rate limit answers first
        assert_eq!(
            gate.admit("1.2.3.4", &["nazi"]),
            Err(SubmissionRejection::RateLimited)
        );
    }

    #[test]
    fn test_rejected_content_still_uses_quota() {
        let gate = gate(OffensivePolicy::Reject, 2);

        assert!(gate.admit("1.2.3.4", &["nazi"]).is_err());
        assert!(gate.admit("1.2.3.4", &["hello"]).is_ok());
        assert_eq!(
            gate.admit("1.2.3.4", &["hello again"]),
            Err(SubmissionRejection::RateLimited)
        );
    }
}
