// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Swarm Worker
//!
//! Drives one swarm's assigned tasks through a caller-supplied [`TaskHandler`]. Agents are
//! logical workers inside this process: the handler is where a role's actual work (scoring,
//! trend lookups, quality checks) is plugged in.
//!
//! Each round schedules, starts every assigned task, runs the handlers concurrently on a
//! [`JoinSet`] and records each outcome. The loop ends when a round starts nothing.
//! A terminated swarm is drained: nothing new is assigned, but tasks already assigned are
//! still run to completion.

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::application::registry::SwarmRegistry;
use crate::domain::agent::Agent;
use crate::domain::swarm::{SwarmError, SwarmId};
use crate::domain::task::{Task, TaskId, TaskStatus};

/// Performs the work of one task on behalf of an agent.
///
/// `Ok` completes the task with the returned payload, `Err` fails it with the error's
/// display chain. Dependents of a failed task are blocked for good.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle(&self, agent: Agent, task: Task) -> anyhow::Result<Value>;
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkerReport {
    pub rounds: usize,
    pub completed: Vec<TaskId>,
    pub failed: Vec<TaskId>,
    /// Tasks still pending when the worker stopped (waiting or blocked).
    pub pending: Vec<TaskId>,
}

pub struct SwarmWorker {
    registry: Arc<SwarmRegistry>,
    handler: Arc<dyn TaskHandler>,
}

impl SwarmWorker {
    pub fn new(registry: Arc<SwarmRegistry>, handler: Arc<dyn TaskHandler>) -> Self {
        Self { registry, handler }
    }

    pub async fn run_until_idle(&self, swarm_id: SwarmId) -> anyhow::Result<WorkerReport> {
        let mut report = WorkerReport::default();

        loop {
            match self.registry.schedule(swarm_id) {
                Ok(assignments) => {
                    debug!(swarm_id = %swarm_id, assigned = assignments.len(), "Worker scheduled")
                }
                // Drain whatever is already assigned.
                Err(SwarmError::SwarmTerminated(_)) => {}
                Err(e) => return Err(e).context("Failed to schedule swarm"),
            }

            let batch = self
                .registry
                .start_assigned_tasks(swarm_id)
                .context("Failed to start assigned tasks")?;
            if batch.is_empty() {
                break;
            }
            report.rounds += 1;

            // Dropping the set aborts every handler still running.
            let mut running = JoinSet::new();
            let mut in_flight = HashMap::new();
            for (agent, task) in batch {
                let handler = Arc::clone(&self.handler);
                let task_id = task.id;
                let handle = running.spawn(async move { handler.handle(agent, task).await });
                in_flight.insert(handle.id(), task_id);
            }

            while let Some(joined) = running.join_next_with_id().await {
                let (id, outcome) = match joined {
                    Ok((id, result)) => (id, Ok(result)),
                    Err(join_error) => (join_error.id(), Err(join_error)),
                };
                let task_id = in_flight
                    .remove(&id)
                    .context("Handler finished for an unknown task")?;
                let error = match outcome {
                    Ok(Ok(result)) => {
                        if self.registry.complete_task(swarm_id, task_id, result)? {
                            report.completed.push(task_id);
                        }
                        continue;
                    }
                    Ok(Err(e)) => format!("{e:#}"),
                    Err(join_error) if join_error.is_panic() => {
                        format!("handler panicked: {join_error}")
                    }
                    Err(join_error) => format!("handler cancelled: {join_error}"),
                };

                warn!(swarm_id = %swarm_id, task_id = %task_id, error = %error, "Task handler failed");
                if self.registry.fail_task(swarm_id, task_id, error)? {
                    report.failed.push(task_id);
                }
            }
        }

        report.pending = self
            .registry
            .get_swarm_status(Some(swarm_id))?
            .tasks()
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .map(|t| t.id)
            .collect();

        info!(
            swarm_id = %swarm_id,
            rounds = report.rounds,
            completed = report.completed.len(),
            failed = report.failed.len(),
            pending = report.pending.len(),
            "Worker idle"
        );
        Ok(report)
    }
}
