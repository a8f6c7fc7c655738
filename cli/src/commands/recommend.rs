// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `murm recommend`: expand a recommendation request into its stage chain and drive it
//! through the swarm worker with a built-in echo handler.

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Args;
use colored::Colorize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use murmuration_engine::domain::engine_config::EngineConfigManifest;
use murmuration_engine::domain::pipeline::stage_of;
use murmuration_engine::{
    Agent, PipelineStage, RecommendationRequest, SwarmRegistry, SwarmWorker, Task, TaskHandler,
    Topology,
};

use super::status_label;

#[derive(Args)]
pub struct RecommendArgs {
    /// User the recommendation is for
    #[arg(long, value_name = "USER")]
    pub user: String,

    /// Request context as JSON; a non-empty `groupMembers` array selects the group path
    #[arg(long, value_name = "JSON")]
    pub context: Option<String>,

    /// Swarm topology (default: from configuration)
    #[arg(long)]
    pub topology: Option<Topology>,

    /// Swarm capacity (default: from configuration)
    #[arg(long)]
    pub max_agents: Option<usize>,

    /// Make the handler fail this stage, leaving later stages blocked
    #[arg(long, value_name = "STAGE")]
    pub fail_stage: Option<PipelineStage>,

    /// Print every swarm event as a JSON line
    #[arg(long)]
    pub events: bool,
}

/// Stands in for the scoring services: echoes the stage, agent and request back.
struct EchoHandler {
    fail_stage: Option<PipelineStage>,
    latency: Duration,
}

#[async_trait]
impl TaskHandler for EchoHandler {
    async fn handle(&self, agent: Agent, task: Task) -> Result<Value> {
        let stage = stage_of(&task.description);
        tokio::time::sleep(self.latency).await;

        if let (Some(stage), Some(failing)) = (stage, self.fail_stage) {
            if stage == failing {
                anyhow::bail!("{} could not run {}", agent.name, stage);
            }
        }

        let request = task
            .description
            .split_once(": ")
            .and_then(|(_, body)| serde_json::from_str::<Value>(body).ok())
            .unwrap_or(Value::Null);

        Ok(json!({
            "stage": stage,
            "agent": agent.name,
            "role": agent.role,
            "userId": request.get("userId").cloned().unwrap_or(Value::Null),
        }))
    }
}

pub async fn run(args: RecommendArgs, manifest: &EngineConfigManifest) -> Result<()> {
    let context: Value = match &args.context {
        Some(raw) => serde_json::from_str(raw).context("--context must be valid JSON")?,
        None => json!({}),
    };
    let request = RecommendationRequest::new(args.user.clone(), context);

    let registry = Arc::new(SwarmRegistry::from_manifest(manifest));
    let mut events = registry.event_bus().map(|bus| bus.subscribe());

    let topology = args.topology.unwrap_or(manifest.spec.defaults.topology);
    let max_agents = args.max_agents.unwrap_or(manifest.spec.defaults.max_agents);
    let swarm = registry
        .create_swarm(topology, max_agents)
        .context("Failed to initialize swarm")?;

    // Staff each stage with its specialist while capacity allows.
    let mut staffed: Vec<_> = swarm.agents().iter().map(|a| a.role).collect();
    for stage in request.stages() {
        let role = stage.preferred_role();
        if staffed.contains(&role) || staffed.len() >= max_agents {
            continue;
        }
        registry.spawn_agent(swarm.id, role, None)?;
        staffed.push(role);
    }

    let task_ids = registry
        .run_pipeline(swarm.id, &request)
        .context("Failed to create recommendation pipeline")?;
    info!(swarm_id = %swarm.id, stages = task_ids.len(), "Pipeline submitted");

    let handler = EchoHandler {
        fail_stage: args.fail_stage,
        latency: Duration::from_millis(5),
    };
    let worker = SwarmWorker::new(Arc::clone(&registry), Arc::new(handler));
    let report = worker
        .run_until_idle(swarm.id)
        .await
        .context("Worker failed")?;

    if args.events {
        if let Some(receiver) = events.as_mut() {
            while let Ok(event) = receiver.try_recv() {
                println!("{}", serde_json::to_string(&event)?);
            }
        }
    }

    println!("{}", format!("Swarm {} ({})", swarm.id, topology).bold());
    let snapshot = registry.get_swarm_status(Some(swarm.id))?;
    let mut tasks = Vec::with_capacity(task_ids.len());
    for task_id in &task_ids {
        let task = registry.get_task_status(swarm.id, *task_id)?;
        let agent = task
            .assigned_agent
            .and_then(|id| snapshot.agents().get(id))
            .map(|a| a.name.clone())
            .unwrap_or_else(|| "-".to_string());
        let stage = stage_of(&task.description)
            .map(|s| s.to_string())
            .unwrap_or_default();
        println!("  {:<22} {:<12} {}", stage, status_label(task.status), agent);
        tasks.push(task);
    }
    println!();

    let summary = json!({
        "swarmId": swarm.id,
        "group": request.is_group(),
        "report": report,
        "tasks": tasks,
        "blocked": registry.blocked_tasks(swarm.id)?.iter().map(|t| t.id).collect::<Vec<_>>(),
        "stats": registry.get_coordinator_stats(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmuration_engine::{AgentRole, TaskPriority};

    #[tokio::test]
    async fn test_echo_handler_fails_only_the_chosen_stage() {
        let registry = Arc::new(SwarmRegistry::default());
        let swarm = registry.init_swarm("mesh", 3).unwrap();
        let request = RecommendationRequest::new("u1", json!({}));
        let ids = registry.run_pipeline(swarm.id, &request).unwrap();
        registry
            .create_task(swarm.id, "unrelated", TaskPriority::Low, vec![])
            .unwrap();

        let handler = EchoHandler {
            fail_stage: Some(PipelineStage::TrackTrends),
            latency: Duration::ZERO,
        };
        let worker = SwarmWorker::new(Arc::clone(&registry), Arc::new(handler));
        let report = worker.run_until_idle(swarm.id).await.unwrap();

        assert_eq!(report.failed, vec![ids[1]]);
        assert_eq!(report.completed.len(), 2);
        let first = registry.get_task_status(swarm.id, ids[0]).unwrap();
        let result = first.result.unwrap();
        assert_eq!(result["userId"], "u1");
        assert_eq!(result["role"], json!(AgentRole::ContentAnalyzer));
    }
}
