// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::agent::{AgentId, AgentRole};
use crate::domain::swarm::{SwarmId, Topology};
use crate::domain::task::{TaskId, TaskPriority};

/// Lifecycle events emitted by the swarm registry after each successful mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwarmEvent {
    SwarmInitialized {
        swarm_id: SwarmId,
        topology: Topology,
        max_agents: usize,
        initialized_at: DateTime<Utc>,
    },
    AgentSpawned {
        swarm_id: SwarmId,
        agent_id: AgentId,
        role: AgentRole,
        spawned_at: DateTime<Utc>,
    },
    TaskCreated {
        swarm_id: SwarmId,
        task_id: TaskId,
        priority: TaskPriority,
        dependencies: Vec<TaskId>,
        created_at: DateTime<Utc>,
    },
    TaskAssigned {
        swarm_id: SwarmId,
        task_id: TaskId,
        agent_id: AgentId,
        assigned_at: DateTime<Utc>,
    },
    TaskStarted {
        swarm_id: SwarmId,
        task_id: TaskId,
        started_at: DateTime<Utc>,
    },
    TaskCompleted {
        swarm_id: SwarmId,
        task_id: TaskId,
        agent_id: Option<AgentId>,
        completed_at: DateTime<Utc>,
    },
    TaskFailed {
        swarm_id: SwarmId,
        task_id: TaskId,
        agent_id: Option<AgentId>,
        error: String,
        failed_at: DateTime<Utc>,
    },
    SwarmTerminated {
        swarm_id: SwarmId,
        terminated_at: DateTime<Utc>,
    },
}

impl SwarmEvent {
    pub fn swarm_id(&self) -> SwarmId {
        match self {
            SwarmEvent::SwarmInitialized { swarm_id, .. }
            | SwarmEvent::AgentSpawned { swarm_id, .. }
            | SwarmEvent::TaskCreated { swarm_id, .. }
            | SwarmEvent::TaskAssigned { swarm_id, .. }
            | SwarmEvent::TaskStarted { swarm_id, .. }
            | SwarmEvent::TaskCompleted { swarm_id, .. }
            | SwarmEvent::TaskFailed { swarm_id, .. }
            | SwarmEvent::SwarmTerminated { swarm_id, .. } => *swarm_id,
        }
    }
}
