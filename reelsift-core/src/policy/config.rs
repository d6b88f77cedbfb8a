use std::collections::HashSet;
use std::time::Duration;

use reelsift_model::{LibraryId, RawPolicy, RawPriority, RawRule};
use tracing::debug;

use super::error::PolicyError;
use super::rule::{
    CategoricalRule, Direction, DirectionalRule, FallbackRule, FixedRule,
    Rule, RuleId, RuleKind,
};
use crate::tags::TagCanonicalizer;

/// Pause between destructive calls, consumed by the backend executor to
/// avoid throttling on rate-limited remote storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DeleteDelay(u64);

impl DeleteDelay {
    pub fn from_secs(secs: i64) -> Result<Self, PolicyError> {
        u64::try_from(secs)
            .map(Self)
            .map_err(|_| PolicyError::NegativeDeleteDelay(secs))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

/// What finally decides when every earlier step ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalTieBreak {
    /// The first version in the order the scan reported wins.
    InputOrder,
}

/// One step of the effective comparison sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationStep<'a> {
    Rule(&'a Rule),
    Fallback(&'a FallbackRule),
    Terminal(TerminalTieBreak),
}

/// Editable version-selection policy.
///
/// The chain's order is its priority order. The `date_added` fallback is
/// held separately and never appears in the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    chain: Vec<Rule>,
    fallback: FallbackRule,
    keep_one_per_resolution: bool,
    delete_delay: DeleteDelay,
    library_scope: Vec<LibraryId>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            chain: RuleId::CHAIN.into_iter().map(default_rule).collect(),
            fallback: FallbackRule::default(),
            keep_one_per_resolution: false,
            delete_delay: DeleteDelay::default(),
            library_scope: Vec::new(),
        }
    }
}

fn default_rule(id: RuleId) -> Rule {
    match id.kind() {
        RuleKind::Directional => Rule::Directional(DirectionalRule {
            id,
            enabled: true,
            direction: Direction::Desc,
        }),
        RuleKind::Categorical => Rule::Categorical(CategoricalRule {
            id,
            enabled: true,
            labels: TagCanonicalizer::default_effect_labels(),
        }),
        RuleKind::Fixed => Rule::Fixed(FixedRule { id, enabled: true }),
    }
}

/// Normalize operator labels to display form and reject empty or repeated
/// tag sets. Duplicates are detected on the canonical token.
fn validate_labels(
    rule: RuleId,
    labels: &[String],
) -> Result<Vec<String>, PolicyError> {
    if labels.is_empty() {
        return Err(PolicyError::EmptyTagSet(rule));
    }

    let mut seen = HashSet::with_capacity(labels.len());
    let mut normalized = Vec::with_capacity(labels.len());
    for label in labels {
        let token = TagCanonicalizer::to_canonical(label);
        if token.is_empty() {
            return Err(PolicyError::EmptyTagSet(rule));
        }
        if !seen.insert(token.clone()) {
            return Err(PolicyError::DuplicateTag {
                rule,
                tag: label.clone(),
            });
        }
        normalized.push(TagCanonicalizer::to_display(&token));
    }
    Ok(normalized)
}

fn parse_direction(
    rule: RuleId,
    priority: Option<&RawPriority>,
    default: Direction,
) -> Result<Direction, PolicyError> {
    match priority {
        None => {
            debug!(rule = %rule, direction = %default, "priority missing, applying default");
            Ok(default)
        }
        Some(RawPriority::Direction(token)) => token.parse(),
        Some(RawPriority::Tags(_)) => Err(PolicyError::PriorityKindMismatch {
            rule,
            expected: RuleKind::Directional,
        }),
    }
}

impl PolicyConfig {
    /// Parse a persisted policy into its editable form.
    ///
    /// Missing directional priorities default to `desc` (`asc` for the
    /// fallback), a missing or empty `effect` priority gets the default tag
    /// order, and a missing fallback rule is synthesized.
    pub fn load(raw: &RawPolicy) -> Result<Self, PolicyError> {
        let mut chain = Vec::with_capacity(raw.rules.len());
        let mut seen = HashSet::with_capacity(raw.rules.len());
        let mut fallback = None;

        for raw_rule in &raw.rules {
            let id: RuleId = raw_rule.id.parse()?;
            if !seen.insert(id) {
                return Err(PolicyError::DuplicateRule(id));
            }
            let priority = raw_rule.priority.as_ref();

            if id.is_fallback() {
                fallback = Some(FallbackRule {
                    enabled: raw_rule.enabled,
                    direction: parse_direction(id, priority, Direction::Asc)?,
                });
                continue;
            }

            let rule = match id.kind() {
                RuleKind::Directional => Rule::Directional(DirectionalRule {
                    id,
                    enabled: raw_rule.enabled,
                    direction: parse_direction(id, priority, Direction::Desc)?,
                }),
                RuleKind::Categorical => {
                    let labels = match priority {
                        None => {
                            debug!(rule = %id, "priority missing, applying default tag order");
                            TagCanonicalizer::default_effect_labels()
                        }
                        Some(RawPriority::Tags(tokens)) if tokens.is_empty() => {
                            debug!(rule = %id, "priority empty, applying default tag order");
                            TagCanonicalizer::default_effect_labels()
                        }
                        Some(RawPriority::Tags(tokens)) => {
                            let labels: Vec<String> = tokens
                                .iter()
                                .map(|token| TagCanonicalizer::to_display(token))
                                .collect();
                            validate_labels(id, &labels)?
                        }
                        Some(RawPriority::Direction(_)) => {
                            return Err(PolicyError::PriorityKindMismatch {
                                rule: id,
                                expected: RuleKind::Categorical,
                            });
                        }
                    };
                    Rule::Categorical(CategoricalRule {
                        id,
                        enabled: raw_rule.enabled,
                        labels,
                    })
                }
                RuleKind::Fixed => {
                    if priority.is_some() {
                        debug!(rule = %id, "ignoring stored priority on fixed-order rule");
                    }
                    Rule::Fixed(FixedRule {
                        id,
                        enabled: raw_rule.enabled,
                    })
                }
            };
            chain.push(rule);
        }

        let fallback = fallback.unwrap_or_else(|| {
            debug!("policy has no date_added rule, synthesizing fallback");
            FallbackRule::default()
        });

        let mut scope_seen = HashSet::with_capacity(raw.library_scope.len());
        let library_scope = raw
            .library_scope
            .iter()
            .filter(|id| scope_seen.insert((*id).clone()))
            .cloned()
            .collect();

        Ok(Self {
            chain,
            fallback,
            keep_one_per_resolution: raw.keep_one_per_resolution,
            delete_delay: DeleteDelay::from_secs(raw.delete_delay_seconds)?,
            library_scope,
        })
    }

    /// Persisted form: categorical labels become canonical tokens again and
    /// the fallback is appended as the last rule.
    pub fn serialize(&self) -> RawPolicy {
        let mut rules: Vec<RawRule> = self
            .chain
            .iter()
            .map(|rule| {
                let raw = RawRule::new(rule.id().as_str(), rule.enabled());
                match rule {
                    Rule::Directional(directional) => raw.with_priority(
                        RawPriority::Direction(
                            directional.direction.as_str().to_string(),
                        ),
                    ),
                    Rule::Categorical(categorical) => {
                        raw.with_priority(RawPriority::Tags(
                            categorical
                                .labels
                                .iter()
                                .map(|label| TagCanonicalizer::to_canonical(label))
                                .collect(),
                        ))
                    }
                    Rule::Fixed(_) => raw,
                }
            })
            .collect();

        rules.push(
            RawRule::new(FallbackRule::ID.as_str(), self.fallback.enabled)
                .with_priority(RawPriority::Direction(
                    self.fallback.direction.as_str().to_string(),
                )),
        );

        RawPolicy {
            rules,
            keep_one_per_resolution: self.keep_one_per_resolution,
            delete_delay_seconds: i64::try_from(self.delete_delay.as_secs())
                .unwrap_or(i64::MAX),
            library_scope: self.library_scope.clone(),
        }
    }

    pub fn chain(&self) -> &[Rule] {
        &self.chain
    }

    pub fn fallback(&self) -> &FallbackRule {
        &self.fallback
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.chain.iter().find(|rule| rule.id() == id)
    }

    fn rule_mut(&mut self, id: RuleId) -> Result<&mut Rule, PolicyError> {
        self.chain
            .iter_mut()
            .find(|rule| rule.id() == id)
            .ok_or(PolicyError::RuleNotFound(id))
    }

    pub fn keep_one_per_resolution(&self) -> bool {
        self.keep_one_per_resolution
    }

    pub fn delete_delay(&self) -> DeleteDelay {
        self.delete_delay
    }

    pub fn library_scope(&self) -> &[LibraryId] {
        &self.library_scope
    }

    /// Replace the chain order. `new_order` must be a permutation of the
    /// current chain ids and may not mention the fallback.
    pub fn reorder(&mut self, new_order: &[RuleId]) -> Result<(), PolicyError> {
        if new_order.iter().any(|id| id.is_fallback()) {
            return Err(PolicyError::FallbackInChain);
        }
        if new_order.len() != self.chain.len() {
            return Err(PolicyError::ChainSizeMismatch {
                expected: self.chain.len(),
                actual: new_order.len(),
            });
        }

        let mut seen = HashSet::with_capacity(new_order.len());
        for id in new_order {
            if !seen.insert(*id) {
                return Err(PolicyError::DuplicateRule(*id));
            }
            if self.rule(*id).is_none() {
                return Err(PolicyError::RuleNotFound(*id));
            }
        }

        self.chain.sort_by_cached_key(|rule| {
            new_order
                .iter()
                .position(|id| *id == rule.id())
                .unwrap_or(usize::MAX)
        });
        debug!(order = ?new_order, "policy chain reordered");
        Ok(())
    }

    /// Flip a chain rule's or the fallback's enabled flag.
    pub fn toggle(
        &mut self,
        id: RuleId,
        enabled: bool,
    ) -> Result<(), PolicyError> {
        if id.is_fallback() {
            self.fallback.enabled = enabled;
            return Ok(());
        }
        self.rule_mut(id)?.set_enabled(enabled);
        Ok(())
    }

    pub fn set_direction(
        &mut self,
        id: RuleId,
        direction: Direction,
    ) -> Result<(), PolicyError> {
        if id.is_fallback() {
            self.fallback.direction = direction;
            return Ok(());
        }
        match self.rule_mut(id)? {
            Rule::Directional(rule) => {
                rule.direction = direction;
                Ok(())
            }
            _ => Err(PolicyError::NotDirectional(id)),
        }
    }

    /// Reorder a categorical rule's tags. Labels may be given in any casing;
    /// they are stored in display form.
    pub fn set_tag_order(
        &mut self,
        id: RuleId,
        labels: &[String],
    ) -> Result<(), PolicyError> {
        let Rule::Categorical(rule) = self.rule_mut(id)? else {
            return Err(PolicyError::NotCategorical(id));
        };

        let normalized = validate_labels(id, labels)?;
        let current: HashSet<String> = rule
            .labels
            .iter()
            .map(|label| TagCanonicalizer::to_canonical(label))
            .collect();
        let proposed: HashSet<String> = normalized
            .iter()
            .map(|label| TagCanonicalizer::to_canonical(label))
            .collect();
        if current != proposed {
            return Err(PolicyError::TagSetMismatch(id));
        }

        rule.labels = normalized;
        Ok(())
    }

    pub fn set_keep_one_per_resolution(&mut self, keep: bool) {
        self.keep_one_per_resolution = keep;
    }

    pub fn set_delete_delay(&mut self, secs: i64) -> Result<(), PolicyError> {
        self.delete_delay = DeleteDelay::from_secs(secs)?;
        Ok(())
    }

    /// Restrict the policy to the given libraries; empty means every
    /// library.
    pub fn set_library_scope(
        &mut self,
        scope: impl IntoIterator<Item = LibraryId>,
    ) {
        let mut seen = HashSet::new();
        self.library_scope = scope
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
    }

    /// Steps the evaluator walks, in order: enabled chain rules, the
    /// fallback when enabled, then the terminal tie-break.
    pub fn evaluation_order(&self) -> Vec<EvaluationStep<'_>> {
        let mut steps: Vec<EvaluationStep<'_>> = self
            .chain
            .iter()
            .filter(|rule| rule.enabled())
            .map(EvaluationStep::Rule)
            .collect();
        if self.fallback.enabled {
            steps.push(EvaluationStep::Fallback(&self.fallback));
        }
        steps.push(EvaluationStep::Terminal(TerminalTieBreak::InputOrder));
        steps
    }
}
