use anyhow::{Context, Result};
use dialoguer::{Confirm, console::Term};
use reelsift_core::api::HttpBackend;
use reelsift_core::batch::{
    BatchError, BatchPlan, BatchReport, Confirmed, DedupeSession, Unconfirmed,
};
use reelsift_model::ScanAck;

use crate::render;

type Session = DedupeSession<HttpBackend>;

pub async fn libraries(session: &Session) -> Result<()> {
    let libraries = session
        .libraries()
        .await
        .context("failed to fetch libraries")?;
    if libraries.is_empty() {
        println!("No libraries.");
    }
    for library in libraries {
        println!("{:<24} {}", library.id, library.display_name);
    }
    Ok(())
}

pub async fn scan(session: &Session) -> Result<()> {
    match session.trigger_scan().await.context("failed to trigger scan")? {
        ScanAck::Accepted => {
            println!("Scan started. Run `reelsift list` once it has finished.")
        }
        ScanAck::Busy { reason } => println!(
            "Scan not started, the task queue is busy{}",
            reason.map(|r| format!(": {r}")).unwrap_or_default()
        ),
    }
    Ok(())
}

pub async fn list(session: &mut Session) -> Result<()> {
    refresh(session).await?;
    render::groups(session.groups());
    Ok(())
}

pub async fn execute(session: &mut Session, keys: &[String], yes: bool) -> Result<()> {
    refresh(session).await?;
    select(session, keys);
    let plan = session.plan_execute()?;
    let Some(plan) = confirm(plan, yes)? else {
        println!("Aborted; nothing was executed.");
        return Ok(());
    };
    report(session.submit(plan).await)
}

pub async fn clear_all(session: &mut Session, yes: bool) -> Result<()> {
    refresh(session).await?;
    let plan = session.plan_clear_all()?;
    let Some(plan) = confirm(plan, yes)? else {
        println!("Aborted; nothing was executed.");
        return Ok(());
    };
    report(session.submit(plan).await)
}

pub async fn ignore(session: &mut Session, keys: &[String]) -> Result<()> {
    refresh(session).await?;
    select(session, keys);
    let plan = session.plan_ignore()?;
    report(session.submit(plan).await)
}

pub async fn remove(session: &mut Session, keys: &[String]) -> Result<()> {
    refresh(session).await?;
    select(session, keys);
    let plan = session.plan_remove()?;
    report(session.submit(plan).await)
}

async fn refresh(session: &mut Session) -> Result<()> {
    session
        .refresh()
        .await
        .context("failed to fetch duplicate tasks")?;
    Ok(())
}

fn select(session: &mut Session, keys: &[String]) {
    for key in keys {
        if !session.select(key.as_str()) {
            eprintln!("warning: no group named '{key}' in the current listing");
        }
    }
}

fn confirm(
    plan: BatchPlan<Unconfirmed>,
    yes: bool,
) -> Result<Option<BatchPlan<Confirmed>>> {
    render::plan(&plan);
    if yes {
        return Ok(Some(plan.confirm()));
    }
    let confirmed = Confirm::new()
        .with_prompt("This deletes files on the backend and cannot be undone. Continue?")
        .default(false)
        .interact_on(&Term::stderr())?;
    Ok(confirmed.then(|| plan.confirm()))
}

fn report(result: Result<BatchReport, BatchError>) -> Result<()> {
    let report = match result {
        Ok(report) => report,
        Err(err) if err.is_retryable() => {
            return Err(anyhow::Error::new(err)
                .context("backend temporarily unavailable, nothing changed; try again"));
        }
        Err(err) => return Err(err.into()),
    };

    println!(
        "{}: {} task(s) submitted. {}",
        report.action, report.task_count, report.outcome.message
    );
    if let Some(err) = report.refresh_error {
        eprintln!("warning: could not refresh the task list afterwards: {err}");
    }
    Ok(())
}
