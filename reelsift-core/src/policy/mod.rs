//! Operator-editable version-selection policy.
//!
//! A policy is an ordered chain of [`Rule`]s followed by a separate
//! `date_added` [`FallbackRule`]. Rules come in three shapes keyed by their
//! [`RuleId`]: directional (`asc`/`desc`), categorical (ordered tag list) and
//! fixed (ordering owned by the backend evaluator).

mod config;
mod error;
mod rule;

pub use config::{DeleteDelay, EvaluationStep, PolicyConfig, TerminalTieBreak};
pub use error::PolicyError;
pub use rule::{
    CategoricalRule, Direction, DirectionalRule, FallbackRule, FixedRule,
    Rule, RuleId, RuleKind,
};
