// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `murmuration-engine`: Swarm Task Orchestration
//!
//! Manages pools of role-specialized worker agents, accepts tasks with declared
//! dependencies and assigns ready tasks to idle agents under a per-swarm topology.
//!
//! ## Crate Layout
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | `Swarm`, `AgentPool`, `TaskGraph`, scheduler strategies, config |
//! | [`application`] | Application | `SwarmRegistry`, pipeline builder, `SwarmWorker` |
//! | [`infrastructure`] | Infrastructure | `EventBus` |
//!
//! ## Key Concepts
//!
//! - **Swarm**: one agent pool plus one task graph, assigned under a [`Topology`].
//! - **Readiness**: a pending task is ready once every dependency has completed. A task
//!   downstream of a failed task is blocked for good.
//! - **Drain**: a terminated swarm accepts no new agents or tasks, but in-flight tasks may
//!   still finish.
//!
//! State lives in memory only.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{RegistryConfig, SwarmRegistry, SwarmWorker, TaskHandler, WorkerReport};
pub use domain::{
    Agent, AgentFilter, AgentId, AgentRole, AgentStatus, Assignment, CoordinatorStats, NewTask,
    PipelineStage, Readiness, RecommendationRequest, SchedulerPolicy, Swarm, SwarmError, SwarmEvent,
    SwarmId, SwarmMetrics, SwarmStatus, Task, TaskId, TaskPriority, TaskStatus, Topology,
};
pub use infrastructure::EventBus;
