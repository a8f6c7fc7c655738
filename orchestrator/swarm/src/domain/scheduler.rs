// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Assignment Scheduler
//!
//! Matches ready tasks against idle agents and performs the pending → assigned transition.
//! Each [`Topology`] has its own agent-selection strategy:
//!
//! | Topology | Rule |
//! |----------|------|
//! | mesh | any idle agent; the task's preferred role wins, then spawn order |
//! | star | a pass only runs while a hub-role agent is idle; the hub is used last |
//! | hierarchical | shallower dependency levels are served first, deeper tasks never skip ahead |
//! | ring | agents are tried in rotation, starting after the most recently assigned one |
//!
//! Scheduling never waits: a task with no qualifying agent simply stays `pending`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::agent::{AgentId, AgentPool, AgentRole};
use crate::domain::swarm::{Swarm, Topology};
use crate::domain::task::{Task, TaskId};

/// One pending → assigned transition performed by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub task_id: TaskId,
    pub agent_id: AgentId,
}

/// Knobs shared by every swarm in a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerPolicy {
    /// Role acting as the hub of star-topology swarms.
    pub hub_role: AgentRole,
}

impl Default for SchedulerPolicy {
    fn default() -> Self {
        Self {
            hub_role: AgentRole::ContentAnalyzer,
        }
    }
}

/// Run one full assignment pass over the swarm's ready tasks.
pub fn run_pass(swarm: &mut Swarm, policy: &SchedulerPolicy) -> Vec<Assignment> {
    if !swarm.is_active() {
        return Vec::new();
    }
    if swarm.topology == Topology::Star && !star_gate_open(swarm.agents(), policy) {
        debug!(swarm_id = %swarm.id, hub_role = %policy.hub_role, "Star hub busy, pass skipped");
        return Vec::new();
    }

    let mut assignments = Vec::new();
    for task_id in pass_order(swarm) {
        let Some(agent_id) = swarm
            .tasks()
            .get(task_id)
            .and_then(|task| select_agent(swarm, task, policy))
        else {
            // Every strategy only comes up empty once no idle agent qualifies, so later
            // tasks would fail too. For hierarchical swarms this is also the level barrier.
            break;
        };

        if swarm.assign(task_id, agent_id).is_ok() {
            assignments.push(Assignment { task_id, agent_id });
        }
    }
    assignments
}

/// Try to assign a single task. `None` (with no side effects) when the task is not
/// ready, the topology forbids it right now, or no agent qualifies.
pub fn assign_one(swarm: &mut Swarm, task_id: TaskId, policy: &SchedulerPolicy) -> Option<Assignment> {
    if !swarm.is_active() {
        return None;
    }

    let task = swarm.tasks().get(task_id)?;
    if !swarm.tasks().is_ready(task) {
        return None;
    }

    match swarm.topology {
        Topology::Star if !star_gate_open(swarm.agents(), policy) => return None,
        Topology::Hierarchical => {
            let shallowest = swarm.tasks().ready_tasks().iter().map(|t| t.depth).min()?;
            if task.depth > shallowest {
                return None;
            }
        }
        _ => {}
    }

    let agent_id = select_agent(swarm, task, policy)?;
    swarm.assign(task_id, agent_id).ok()?;
    Some(Assignment { task_id, agent_id })
}

fn select_agent(swarm: &Swarm, task: &Task, policy: &SchedulerPolicy) -> Option<AgentId> {
    match swarm.topology {
        Topology::Mesh => mesh_select(swarm.agents(), task),
        Topology::Star => star_select(swarm.agents(), task, policy.hub_role),
        Topology::Hierarchical => hierarchical_select(swarm.agents(), task),
        Topology::Ring => ring_select(swarm.agents(), swarm.last_assigned()),
    }
}

/// Ready tasks in the order a pass visits them.
fn pass_order(swarm: &Swarm) -> Vec<TaskId> {
    let mut ready = swarm.tasks().ready_tasks();
    if swarm.topology == Topology::Hierarchical {
        // Stable: priority/FIFO order is kept within a level.
        ready.sort_by_key(|t| t.depth);
    }
    ready.into_iter().map(|t| t.id).collect()
}

fn star_gate_open(agents: &AgentPool, policy: &SchedulerPolicy) -> bool {
    agents.has_idle_role(policy.hub_role)
}

fn mesh_select(agents: &AgentPool, task: &Task) -> Option<AgentId> {
    preferred_idle(agents, task.preferred_role, |_| true)
}

fn star_select(agents: &AgentPool, task: &Task, hub_role: AgentRole) -> Option<AgentId> {
    preferred_idle(agents, task.preferred_role, |role| role != hub_role)
        .or_else(|| preferred_idle(agents, Some(hub_role), |role| role == hub_role))
}

fn hierarchical_select(agents: &AgentPool, task: &Task) -> Option<AgentId> {
    preferred_idle(agents, task.preferred_role, |_| true)
}

fn ring_select(agents: &AgentPool, last_assigned: Option<usize>) -> Option<AgentId> {
    let len = agents.len();
    if len == 0 {
        return None;
    }
    let start = last_assigned.map(|i| (i + 1) % len).unwrap_or(0);

    agents
        .idle()
        .map(|(index, agent)| ((index + len - start) % len, agent.id))
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, id)| id)
}

/// First idle agent allowed by `eligible`, preferring `preferred` when one is idle.
fn preferred_idle(
    agents: &AgentPool,
    preferred: Option<AgentRole>,
    eligible: impl Fn(AgentRole) -> bool,
) -> Option<AgentId> {
    let mut candidates = agents.idle().map(|(_, a)| a).filter(|a| eligible(a.role));
    match preferred {
        Some(role) => {
            let all: Vec<_> = candidates.collect();
            all.iter()
                .find(|a| a.role == role)
                .or_else(|| all.first())
                .map(|a| a.id)
        }
        None => candidates.next().map(|a| a.id),
    }
}
