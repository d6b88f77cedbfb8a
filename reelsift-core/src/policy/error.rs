use thiserror::Error;

use super::rule::{RuleId, RuleKind};

/// Errors raised while loading or editing a policy.
///
/// Edit errors indicate a caller bug (the editor only offers closed sets of
/// values); a failed edit never changes the policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("unknown rule id '{0}'")]
    UnknownRule(String),

    #[error("rule '{0}' appears more than once")]
    DuplicateRule(RuleId),

    #[error("the fallback rule cannot be placed in the editable chain")]
    FallbackInChain,

    #[error("rule '{0}' is not part of this policy")]
    RuleNotFound(RuleId),

    #[error("reorder must keep the chain size ({expected} rules, got {actual})")]
    ChainSizeMismatch { expected: usize, actual: usize },

    #[error("invalid direction '{0}' (expected 'asc' or 'desc')")]
    InvalidDirection(String),

    #[error("rule '{rule}' expects a {expected} priority")]
    PriorityKindMismatch { rule: RuleId, expected: RuleKind },

    #[error("rule '{0}' is not directional")]
    NotDirectional(RuleId),

    #[error("rule '{0}' is not categorical")]
    NotCategorical(RuleId),

    #[error("rule '{0}' needs at least one tag")]
    EmptyTagSet(RuleId),

    #[error("rule '{rule}' lists tag '{tag}' twice")]
    DuplicateTag { rule: RuleId, tag: String },

    #[error("new tag order for '{0}' must be a permutation of its current tags")]
    TagSetMismatch(RuleId),

    #[error("delete delay must be a non-negative number of seconds (got {0})")]
    NegativeDeleteDelay(i64),
}
