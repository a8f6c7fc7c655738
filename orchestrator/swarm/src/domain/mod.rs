// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Swarm Domain Layer
//!
//! Pure domain types for swarm task orchestration. No I/O dependencies apart from
//! configuration file loading in [`engine_config`].
//!
//! | Module | Key Types |
//! |--------|-----------|
//! | [`swarm`] | `Swarm`, `SwarmId`, `Topology`, `SwarmError` |
//! | [`agent`] | `Agent`, `AgentRole`, `AgentPool`, `AgentFilter` |
//! | [`task`] | `Task`, `TaskGraph`, `NewTask`, `Readiness` |
//! | [`scheduler`] | `run_pass`, `assign_one`, `SchedulerPolicy` |
//! | [`pipeline`] | `RecommendationRequest`, `PipelineStage` |
//! | [`metrics`] | `SwarmMetrics`, `CoordinatorStats` |
//! | [`events`] | `SwarmEvent` |
//! | [`engine_config`] | `EngineConfigManifest` |

pub mod agent;
pub mod engine_config;
pub mod events;
pub mod metrics;
pub mod pipeline;
pub mod scheduler;
pub mod swarm;
pub mod task;

pub use agent::{Agent, AgentFilter, AgentId, AgentMetrics, AgentPool, AgentRole, AgentStatus};
pub use events::SwarmEvent;
pub use metrics::{CoordinatorStats, SwarmMetrics, TaskStatusCounts};
pub use pipeline::{PipelineStage, RecommendationRequest};
pub use scheduler::{Assignment, SchedulerPolicy};
pub use swarm::{Swarm, SwarmError, SwarmId, SwarmStatus, Topology};
pub use task::{NewTask, Readiness, Task, TaskGraph, TaskId, TaskPriority, TaskStatus};
