//! Authorship verification for claims.
//!
//! Sign-up threads collect stray remarks and comments left on behalf of
//! other people. An [`AuthorshipCheck`] decides whether a claim really is
//! the claimant volunteering themselves.

use crate::config::AuthorshipMode;

/// Decides whether a claim's statement was made by its claimant for
/// themselves.
pub trait AuthorshipCheck: Send + Sync {
    /// Returns true if `statement` counts as `claimant` claiming the slot.
    fn verify(&self, statement: &str, claimant: &str) -> bool;
}

/// The statement must contain the claimant's name, ignoring case.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementNamesClaimant;

impl AuthorshipCheck for StatementNamesClaimant {
    fn verify(&self, statement: &str, claimant: &str) -> bool {
        statement
            .to_lowercase()
            .contains(&claimant.to_lowercase())
    }
}

/// Trusts the structured claimant field; every named claim passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimantField;

impl AuthorshipCheck for ClaimantField {
    fn verify(&self, _statement: &str, _claimant: &str) -> bool {
        true
    }
}

/// Returns the check configured by `mode`.
pub fn authorship_check(mode: AuthorshipMode) -> Box<dyn AuthorshipCheck> {
    match mode {
        AuthorshipMode::StatementNamesClaimant => Box::new(StatementNamesClaimant),
        AuthorshipMode::ClaimantField => Box::new(ClaimantField),
    }
}
