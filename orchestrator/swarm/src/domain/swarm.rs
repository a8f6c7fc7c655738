// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Swarm Aggregate
//!
//! Defines the aggregate root for one isolated pool of agents plus its task graph:
//!
//! - [`Swarm`]: aggregate root owning one [`AgentPool`] and one [`TaskGraph`].
//! - [`SwarmId`]: unique identifier (UUID newtype).
//! - [`Topology`]: assignment policy selector (mesh, hierarchical, ring, star).
//! - [`SwarmError`]: every recoverable rejection the engine reports.
//!
//! All state transitions that touch both the pool and the graph (assignment, completion,
//! failure) live here so the busy/current-task invariant is maintained in one place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::agent::{Agent, AgentId, AgentPool, AgentRole, AgentStatus, ReleaseOutcome};
use crate::domain::task::{NewTask, Task, TaskGraph, TaskId, TaskStatus};

/// Unique identifier for a [`Swarm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwarmId(pub Uuid);

impl SwarmId {
    /// Generate a new random `SwarmId`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for SwarmId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SwarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during swarm coordination.
///
/// None of these are fatal; each one is reported to the caller of a single operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwarmError {
    #[error("Swarm not found: {0}")]
    SwarmNotFound(SwarmId),

    #[error("No active swarm exists")]
    NoActiveSwarm,

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),

    #[error("Invalid topology '{0}' (expected mesh, hierarchical, ring or star)")]
    InvalidTopology(String),

    #[error("Invalid capacity {0}: a swarm needs room for at least one agent")]
    InvalidCapacity(usize),

    #[error("Unknown agent role '{0}'")]
    InvalidRole(String),

    #[error("Unknown task priority '{0}'")]
    InvalidPriority(String),

    #[error("Swarm {0} is terminated")]
    SwarmTerminated(SwarmId),

    #[error("Swarm {swarm_id} is at capacity ({max_agents} agents)")]
    CapacityExceeded { swarm_id: SwarmId, max_agents: usize },

    #[error("Dependency {0} does not exist in this swarm")]
    UnknownDependency(TaskId),

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

/// Assignment policy of a swarm. See `crate::domain::scheduler` for the per-topology strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Mesh,
    Hierarchical,
    Ring,
    Star,
}

impl Topology {
    pub const ALL: [Topology; 4] = [
        Topology::Mesh,
        Topology::Hierarchical,
        Topology::Ring,
        Topology::Star,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::Mesh => "mesh",
            Topology::Hierarchical => "hierarchical",
            Topology::Ring => "ring",
            Topology::Star => "star",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topology {
    type Err = SwarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Topology::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| SwarmError::InvalidTopology(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwarmStatus {
    Active,
    Terminated,
}

/// Aggregate root for one isolated pool of agents and its task graph.
///
/// # Invariants
///
/// - `agents.len() <= max_agents` at all times.
/// - An agent is busy iff it has a `current_task`, and that task names the agent in
///   `assigned_agent` (checked by [`Swarm::verify_invariants`]).
/// - Once terminated, no agent is spawned, no task is created and nothing is assigned.
///   In-flight tasks may still be started, completed or failed.
#[derive(Debug, Clone, Serialize)]
pub struct Swarm {
    pub id: SwarmId,
    pub topology: Topology,
    pub max_agents: usize,
    pub status: SwarmStatus,
    pub created_at: DateTime<Utc>,
    pub terminated_at: Option<DateTime<Utc>>,
    agents: AgentPool,
    tasks: TaskGraph,
    /// Spawn-order index of the agent that received the most recent assignment.
    #[serde(skip)]
    last_assigned: Option<usize>,
}

impl Swarm {
    pub fn new(topology: Topology, max_agents: usize) -> Result<Self, SwarmError> {
        if max_agents < 1 {
            return Err(SwarmError::InvalidCapacity(max_agents));
        }

        Ok(Self {
            id: SwarmId::new(),
            topology,
            max_agents,
            status: SwarmStatus::Active,
            created_at: Utc::now(),
            terminated_at: None,
            agents: AgentPool::default(),
            tasks: TaskGraph::default(),
            last_assigned: None,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == SwarmStatus::Active
    }

    pub fn ensure_active(&self) -> Result<(), SwarmError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(SwarmError::SwarmTerminated(self.id))
        }
    }

    pub fn agents(&self) -> &AgentPool {
        &self.agents
    }

    pub fn tasks(&self) -> &TaskGraph {
        &self.tasks
    }

    pub(crate) fn last_assigned(&self) -> Option<usize> {
        self.last_assigned
    }

    /// Spawn an idle agent, rejecting terminated swarms and full pools.
    pub fn spawn_agent(&mut self, role: AgentRole, name: Option<String>) -> Result<Agent, SwarmError> {
        self.ensure_active()?;
        if self.agents.len() >= self.max_agents {
            return Err(SwarmError::CapacityExceeded {
                swarm_id: self.id,
                max_agents: self.max_agents,
            });
        }
        Ok(self.agents.spawn(role, name).clone())
    }

    pub fn create_task(&mut self, task: NewTask) -> Result<Task, SwarmError> {
        self.ensure_active()?;
        self.tasks.insert(task).cloned()
    }

    /// pending → assigned. Callers (the scheduler) have already checked readiness and idleness.
    pub(crate) fn assign(&mut self, task_id: TaskId, agent_id: AgentId) -> Result<(), SwarmError> {
        self.ensure_active()?;
        let position = self
            .agents
            .position(agent_id)
            .ok_or(SwarmError::AgentNotFound(agent_id))?;
        if self.agents.get(agent_id).map(|a| a.status) != Some(AgentStatus::Idle) {
            return Err(SwarmError::InvariantViolation(format!(
                "agent {agent_id} is not idle"
            )));
        }

        let now = Utc::now();
        self.tasks.mark_assigned(task_id, agent_id, now)?;
        self.agents.occupy(agent_id, task_id, now);
        self.last_assigned = Some(position);
        Ok(())
    }

    /// assigned → in_progress. Returns `false` for unknown tasks or any other state.
    pub fn start_task(&mut self, task_id: TaskId) -> bool {
        self.tasks.mark_started(task_id, Utc::now())
    }

    /// {assigned | in_progress} → completed, releasing the assigned agent.
    pub fn complete_task(&mut self, task_id: TaskId, result: serde_json::Value) -> bool {
        let now = Utc::now();
        match self.tasks.mark_completed(task_id, result, now) {
            Some(agent_id) => {
                self.agents.release(agent_id, ReleaseOutcome::Completed, now);
                true
            }
            None => false,
        }
    }

    /// {assigned | in_progress} → failed, or a pending task blocked by a failed dependency,
    /// which has no agent to release.
    pub fn fail_task(&mut self, task_id: TaskId, error: String) -> bool {
        let now = Utc::now();
        match self.tasks.mark_failed(task_id, error, now) {
            Some(Some(agent_id)) => {
                self.agents.release(agent_id, ReleaseOutcome::Failed, now);
                true
            }
            Some(None) => true,
            None => false,
        }
    }

    /// Returns `false` when the swarm was already terminated.
    pub fn terminate(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = SwarmStatus::Terminated;
        self.terminated_at = Some(Utc::now());
        true
    }

    /// Check the bidirectional agent/task invariants and the capacity bound.
    pub fn verify_invariants(&self) -> Result<(), SwarmError> {
        if self.agents.len() > self.max_agents {
            return Err(SwarmError::InvariantViolation(format!(
                "{} agents exceed capacity {}",
                self.agents.len(),
                self.max_agents
            )));
        }

        for agent in self.agents.iter() {
            match (agent.status, agent.current_task) {
                (AgentStatus::Idle, None) => {}
                (AgentStatus::Busy, Some(task_id)) => {
                    let task = self.tasks.get(task_id).ok_or_else(|| {
                        SwarmError::InvariantViolation(format!(
                            "agent {} holds unknown task {}",
                            agent.id, task_id
                        ))
                    })?;
                    if task.assigned_agent != Some(agent.id) || !task.status.is_in_flight() {
                        return Err(SwarmError::InvariantViolation(format!(
                            "agent {} holds task {} which is {:?} for {:?}",
                            agent.id, task_id, task.status, task.assigned_agent
                        )));
                    }
                }
                (status, current) => {
                    return Err(SwarmError::InvariantViolation(format!(
                        "agent {} is {:?} with current task {:?}",
                        agent.id, status, current
                    )));
                }
            }
        }

        for task in self.tasks.iter() {
            if !task.status.is_in_flight() {
                continue;
            }
            let agent_id = task.assigned_agent.ok_or_else(|| {
                SwarmError::InvariantViolation(format!("task {} is {:?} without an agent", task.id, task.status))
            })?;
            let holds = self
                .agents
                .get(agent_id)
                .map(|a| a.current_task == Some(task.id))
                .unwrap_or(false);
            if !holds {
                return Err(SwarmError::InvariantViolation(format!(
                    "task {} names agent {} which does not hold it",
                    task.id, agent_id
                )));
            }
        }

        Ok(())
    }

    /// Ids of tasks that are assigned but not yet started.
    pub(crate) fn assigned_task_ids(&self) -> Vec<TaskId> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Assigned)
            .map(|t| t.id)
            .collect()
    }
}
