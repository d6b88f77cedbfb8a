use anyhow::{Context, Result};
use reelsift_core::api::HttpBackend;
use reelsift_core::batch::DedupeSession;
use reelsift_core::policy::{PolicyConfig, RuleId};
use reelsift_model::LibraryId;

use crate::PolicyCommand;
use crate::render;

pub async fn run(
    session: &DedupeSession<HttpBackend>,
    command: PolicyCommand,
) -> Result<()> {
    let mut policy = session
        .load_policy()
        .await
        .context("failed to load policy from backend")?;

    match command {
        PolicyCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&policy.serialize())?);
            } else {
                render::policy(&policy);
            }
            return Ok(());
        }
        PolicyCommand::Reorder { rules } => policy.reorder(&rules)?,
        // `--on` and `--off` are mutually exclusive and one is required.
        PolicyCommand::Toggle { rule, on, .. } => policy.toggle(rule, on)?,
        PolicyCommand::Direction { rule, direction } => {
            policy.set_direction(rule, direction)?
        }
        PolicyCommand::EffectOrder { labels } => {
            policy.set_tag_order(RuleId::Effect, &labels)?
        }
        PolicyCommand::KeepPerResolution { enabled } => {
            policy.set_keep_one_per_resolution(enabled)
        }
        PolicyCommand::DeleteDelay { seconds } => policy.set_delete_delay(seconds)?,
        PolicyCommand::Scope { library_ids } => {
            let scope = library_ids
                .into_iter()
                .map(LibraryId::new)
                .collect::<Result<Vec<_>, _>>()?;
            policy.set_library_scope(scope);
        }
    }

    save(session, &policy).await
}

async fn save(
    session: &DedupeSession<HttpBackend>,
    policy: &PolicyConfig,
) -> Result<()> {
    session
        .save_policy(policy)
        .await
        .context("failed to save policy")?;
    println!("Policy saved. New tasks are evaluated with it on the next scan.");
    render::policy(policy);
    Ok(())
}
