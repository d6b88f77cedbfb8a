//! Plain-text rendering for terminal output.

use reelsift_core::Group;
use reelsift_core::batch::{BatchPlan, PlanState};
use reelsift_core::policy::{EvaluationStep, PolicyConfig, Rule, RuleId, TerminalTieBreak};

pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let b = bytes as f64;
    if b >= GB {
        format!("{:.2} GiB", b / GB)
    } else if b >= MB {
        format!("{:.1} MiB", b / MB)
    } else if b >= KB {
        format!("{:.1} KiB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

fn checkbox(enabled: bool) -> &'static str {
    if enabled { "[x]" } else { "[ ]" }
}

fn rule_detail(rule: &Rule) -> String {
    match rule {
        Rule::Directional(directional) => directional.direction().to_string(),
        Rule::Categorical(categorical) => categorical.labels().join(" > "),
        Rule::Fixed(_) => "built-in order".to_string(),
    }
}

pub fn policy(policy: &PolicyConfig) {
    println!("Rule chain (highest priority first):");
    for (idx, rule) in policy.chain().iter().enumerate() {
        println!(
            "  {:>2}. {} {:<12} {:<14} {:<12} {}",
            idx + 1,
            checkbox(rule.enabled()),
            rule.id().as_str(),
            rule.id().label(),
            rule.kind().to_string(),
            rule_detail(rule)
        );
    }

    let fallback = policy.fallback();
    println!(
        "Fallback: {} {} ({}) {}",
        checkbox(fallback.enabled()),
        RuleId::DateAdded.as_str(),
        RuleId::DateAdded.label(),
        fallback.direction()
    );
    if let Some(EvaluationStep::Terminal(TerminalTieBreak::InputOrder)) =
        policy.evaluation_order().last()
    {
        println!("Final tie-break: first listed version wins");
    }

    println!(
        "Keep one per resolution: {}",
        if policy.keep_one_per_resolution() { "yes" } else { "no" }
    );
    println!("Delete delay: {}s", policy.delete_delay().as_secs());
    if policy.library_scope().is_empty() {
        println!("Library scope: all libraries");
    } else {
        let ids: Vec<&str> =
            policy.library_scope().iter().map(|id| id.as_str()).collect();
        println!("Library scope: {}", ids.join(", "));
    }
}

pub fn groups(groups: &[Group]) {
    if groups.is_empty() {
        println!("No duplicate tasks. Run `reelsift scan` to look for new ones.");
        return;
    }

    let mut reclaimable = 0;
    for group in groups {
        reclaimable += group.reclaimable_bytes();
        println!(
            "{} {}  ({} task(s), {} version(s), {} reclaimable)",
            if group.is_movie() { "[movie] " } else { "[series]" },
            group.key(),
            group.tasks().len(),
            group.version_count(),
            format_bytes(group.reclaimable_bytes())
        );
        for task in group.tasks() {
            let keep = task
                .best_version()
                .map(|version| version.path.as_str())
                .unwrap_or("undecided");
            println!(
                "    {:<10} {:<40} {:<13} keep: {}",
                task.id.as_str(),
                task.item_name,
                task.task_type.to_string(),
                keep
            );
        }
    }
    println!(
        "{} group(s), {} reclaimable in total",
        groups.len(),
        format_bytes(reclaimable)
    );
}

pub fn plan<S: PlanState>(plan: &BatchPlan<S>) {
    let preview = plan.preview();
    println!(
        "About to {} {} task(s) in {} group(s), {} version(s); {} would be freed.",
        plan.action(),
        preview.tasks,
        preview.groups,
        preview.versions,
        format_bytes(preview.reclaimable_bytes)
    );
}
