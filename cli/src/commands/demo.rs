// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `murm demo`: a dependency chain on a mesh swarm, one call at a time.

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;

use murmuration_engine::domain::engine_config::EngineConfigManifest;
use murmuration_engine::{AgentFilter, Readiness, RegistryConfig, SwarmRegistry, TaskPriority};

use super::status_label;

pub fn run(manifest: &EngineConfigManifest) -> Result<()> {
    // Manual assignment only, so every step is visible.
    let registry = SwarmRegistry::new(RegistryConfig {
        auto_assign: false,
        ..RegistryConfig::from(manifest)
    });

    let swarm = registry
        .init_swarm("mesh", 5)
        .context("Failed to initialize swarm")?;
    step(
        "init_swarm(mesh, 5)",
        format!("{} with {} idle agents", swarm.id, swarm.agents().len()),
    );

    let a = registry.create_task(swarm.id, "find comedies", TaskPriority::High, vec![])?;
    step("create_task(find comedies, high)", status_label(a.status));

    let assigned = registry.assign_task(swarm.id, a.id)?;
    let busy = registry.list_agents(Some(swarm.id), AgentFilter::Busy)?;
    step(
        "assign_task(A)",
        format!(
            "{} -> {}",
            assigned,
            busy.first().map(|agent| agent.name.as_str()).unwrap_or("-")
        ),
    );

    let b = registry.create_task(swarm.id, "rank results", TaskPriority::Medium, vec![a.id])?;
    step("create_task(rank results, medium, [A])", status_label(b.status));

    let early = registry.assign_task(swarm.id, b.id)?;
    let readiness = registry.task_readiness(swarm.id, b.id)?;
    step(
        "assign_task(B)",
        format!("{} ({})", early, readiness_line(&readiness)),
    );

    let completed = registry.complete_task(swarm.id, a.id, json!({ "items": [] }))?;
    step("complete_task(A, {items: []})", completed.to_string());

    let assigned = registry.assign_task(swarm.id, b.id)?;
    let b = registry.get_task_status(swarm.id, b.id)?;
    step(
        "assign_task(B)",
        format!("{} -> {}", assigned, status_label(b.status)),
    );

    registry
        .get_swarm_status(Some(swarm.id))?
        .verify_invariants()
        .context("Swarm invariants broken")?;

    println!();
    println!("{}", "Swarm metrics:".bold());
    println!(
        "{}",
        serde_json::to_string_pretty(&registry.swarm_metrics(swarm.id)?)?
    );

    Ok(())
}

fn step(call: &str, outcome: String) {
    println!("{} {}", format!("{call:<42}").cyan(), outcome);
}

fn readiness_line(readiness: &Readiness) -> String {
    match readiness {
        Readiness::Ready => "ready".to_string(),
        Readiness::Waiting {
            pending_dependencies,
        } => format!("waiting on {} dependency", pending_dependencies.len()),
        Readiness::Blocked { failed_dependency } => {
            format!("blocked by failed {failed_dependency}")
        }
        Readiness::NotPending { status } => format!("already {status:?}").to_lowercase(),
    }
}
