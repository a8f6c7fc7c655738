// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Swarm Registry
//!
//! The synchronous use-case surface of the engine. The registry owns every swarm ever
//! created (terminated swarms stay for statistics) and routes each call to one swarm.
//!
//! ## Locking
//!
//! Each swarm sits behind its own `parking_lot::RwLock`. Mutations hold the swarm's write
//! lock for the whole operation, including any scheduling pass it triggers, so two
//! concurrent assignments can never claim the same agent or task. Reads take the shared
//! lock and hand back cloned snapshots. The registry map is only locked long enough to
//! clone a swarm handle, and no swarm lock is ever held while the map lock is acquired.

use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::agent::{Agent, AgentFilter, AgentRole};
use crate::domain::engine_config::EngineConfigManifest;
use crate::domain::events::SwarmEvent;
use crate::domain::metrics::{CoordinatorStats, SwarmMetrics};
use crate::domain::scheduler::{self, Assignment, SchedulerPolicy};
use crate::domain::swarm::{Swarm, SwarmError, SwarmId, Topology};
use crate::domain::task::{NewTask, Readiness, Task, TaskId, TaskPriority, TaskStatus};
use crate::infrastructure::event_bus::EventBus;

/// Registry-wide settings, usually derived from an [`EngineConfigManifest`].
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Seeded into every new swarm, truncated to its capacity.
    pub starter_roster: Vec<AgentRole>,
    pub policy: SchedulerPolicy,
    /// Run a scheduling pass after create, complete, fail and spawn.
    pub auto_assign: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            starter_roster: vec![
                AgentRole::ContentAnalyzer,
                AgentRole::RecommendationGenerator,
                AgentRole::QualityAssessor,
            ],
            policy: SchedulerPolicy::default(),
            auto_assign: false,
        }
    }
}

impl From<&EngineConfigManifest> for RegistryConfig {
    fn from(manifest: &EngineConfigManifest) -> Self {
        let scheduling = &manifest.spec.scheduling;
        Self {
            starter_roster: scheduling.starter_roster.clone(),
            policy: scheduling.policy(),
            auto_assign: scheduling.auto_assign,
        }
    }
}

type SwarmHandle = Arc<RwLock<Swarm>>;

#[derive(Default)]
struct RegistryState {
    by_id: HashMap<SwarmId, SwarmHandle>,
    /// Creation order; the default swarm is the newest active one.
    order: Vec<SwarmId>,
}

pub struct SwarmRegistry {
    state: RwLock<RegistryState>,
    config: RegistryConfig,
    event_bus: Option<EventBus>,
}

impl Default for SwarmRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl SwarmRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            config,
            event_bus: None,
        }
    }

    pub fn with_event_bus(config: RegistryConfig, event_bus: EventBus) -> Self {
        Self {
            event_bus: Some(event_bus),
            ..Self::new(config)
        }
    }

    /// Registry plus an event bus sized from the manifest.
    pub fn from_manifest(manifest: &EngineConfigManifest) -> Self {
        Self::with_event_bus(
            RegistryConfig::from(manifest),
            EventBus::new(manifest.spec.event_bus.capacity),
        )
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn event_bus(&self) -> Option<&EventBus> {
        self.event_bus.as_ref()
    }

    // ========================================================================
    // Swarm lifecycle
    // ========================================================================

    /// Parse the topology name and create a swarm seeded with the starter roster.
    pub fn init_swarm(&self, topology: &str, max_agents: usize) -> Result<Swarm, SwarmError> {
        let topology = topology.parse::<Topology>()?;
        self.create_swarm(topology, max_agents)
    }

    pub fn create_swarm(&self, topology: Topology, max_agents: usize) -> Result<Swarm, SwarmError> {
        let mut swarm = Swarm::new(topology, max_agents)?;
        let mut events = vec![SwarmEvent::SwarmInitialized {
            swarm_id: swarm.id,
            topology,
            max_agents,
            initialized_at: swarm.created_at,
        }];

        for role in self.config.starter_roster.iter().take(max_agents) {
            let agent = swarm.spawn_agent(*role, None)?;
            metrics::counter!("murmuration_agents_spawned_total").increment(1);
            events.push(SwarmEvent::AgentSpawned {
                swarm_id: swarm.id,
                agent_id: agent.id,
                role: agent.role,
                spawned_at: agent.created_at,
            });
        }

        let hub_role = self.config.policy.hub_role;
        if topology == Topology::Star && !swarm.agents().iter().any(|a| a.role == hub_role) {
            warn!(
                swarm_id = %swarm.id,
                hub_role = %hub_role,
                "Star swarm has no hub agent; no work is assigned until one is spawned"
            );
        }

        let snapshot = swarm.clone();
        {
            let mut state = self.state.write();
            state.order.push(swarm.id);
            state.by_id.insert(swarm.id, Arc::new(RwLock::new(swarm)));
        }

        info!(
            swarm_id = %snapshot.id,
            topology = %topology,
            max_agents,
            agents = snapshot.agents().len(),
            "Swarm initialized"
        );
        metrics::counter!("murmuration_swarms_created_total", "topology" => topology.as_str())
            .increment(1);
        self.refresh_active_gauge();
        self.publish_all(events);
        Ok(snapshot)
    }

    /// Snapshot of one swarm. Without an id, the most recently created active swarm.
    pub fn get_swarm_status(&self, swarm_id: Option<SwarmId>) -> Result<Swarm, SwarmError> {
        self.read_swarm(swarm_id, Swarm::clone)
    }

    /// `true` on the first call for a live swarm; `false` when missing or already terminated.
    pub fn terminate_swarm(&self, swarm_id: SwarmId) -> bool {
        let Ok(handle) = self.handle(swarm_id) else {
            return false;
        };

        let terminated_at = {
            let mut swarm = handle.write();
            if !swarm.terminate() {
                return false;
            }
            swarm.terminated_at.unwrap_or_else(Utc::now)
        };

        info!(swarm_id = %swarm_id, "Swarm terminated");
        self.refresh_active_gauge();
        self.publish(SwarmEvent::SwarmTerminated {
            swarm_id,
            terminated_at,
        });
        true
    }

    // ========================================================================
    // Agents
    // ========================================================================

    pub fn spawn_agent(
        &self,
        swarm_id: SwarmId,
        role: AgentRole,
        name: Option<String>,
    ) -> Result<Agent, SwarmError> {
        self.mutate(swarm_id, |swarm, events| {
            let agent = swarm.spawn_agent(role, name)?;
            debug!(swarm_id = %swarm_id, agent_id = %agent.id, role = %role, "Agent spawned");
            metrics::counter!("murmuration_agents_spawned_total").increment(1);
            events.push(SwarmEvent::AgentSpawned {
                swarm_id,
                agent_id: agent.id,
                role,
                spawned_at: agent.created_at,
            });

            self.auto_pass(swarm, events);
            // The pass may already have handed the new agent a task.
            Ok(swarm.agents().get(agent.id).cloned().unwrap_or(agent))
        })?
    }

    pub fn list_agents(
        &self,
        swarm_id: Option<SwarmId>,
        filter: AgentFilter,
    ) -> Result<Vec<Agent>, SwarmError> {
        self.read_swarm(swarm_id, |swarm| swarm.agents().list(filter))
    }

    // ========================================================================
    // Tasks
    // ========================================================================

    pub fn create_task(
        &self,
        swarm_id: SwarmId,
        description: impl Into<String>,
        priority: TaskPriority,
        dependencies: Vec<TaskId>,
    ) -> Result<Task, SwarmError> {
        self.submit_task(
            swarm_id,
            NewTask::new(description, priority).depends_on(dependencies),
        )
    }

    /// [`Self::create_task`] with the full [`NewTask`] input, including a preferred role.
    pub fn submit_task(&self, swarm_id: SwarmId, new_task: NewTask) -> Result<Task, SwarmError> {
        self.mutate(swarm_id, |swarm, events| {
            let task = swarm.create_task(new_task)?;
            self.record_created(swarm_id, &task, events);
            self.auto_pass(swarm, events);
            Ok(swarm.tasks().get(task.id).cloned().unwrap_or(task))
        })?
    }

    /// Try to assign one task now. `false` (no side effects) when the task is unknown,
    /// not ready, or no agent qualifies under the swarm's topology.
    pub fn assign_task(&self, swarm_id: SwarmId, task_id: TaskId) -> Result<bool, SwarmError> {
        self.mutate(swarm_id, |swarm, events| {
            swarm.ensure_active()?;
            match scheduler::assign_one(swarm, task_id, &self.config.policy) {
                Some(assignment) => {
                    self.record_assignments(swarm, &[assignment], events);
                    Ok(true)
                }
                None => {
                    debug!(swarm_id = %swarm_id, task_id = %task_id, "Task left pending");
                    Ok(false)
                }
            }
        })?
    }

    /// Run one full assignment pass.
    pub fn schedule(&self, swarm_id: SwarmId) -> Result<Vec<Assignment>, SwarmError> {
        self.mutate(swarm_id, |swarm, events| {
            swarm.ensure_active()?;
            let assignments = scheduler::run_pass(swarm, &self.config.policy);
            self.record_assignments(swarm, &assignments, events);
            Ok(assignments)
        })?
    }

    /// assigned → in_progress.
    pub fn start_task(&self, swarm_id: SwarmId, task_id: TaskId) -> Result<bool, SwarmError> {
        self.mutate(swarm_id, |swarm, events| {
            let started = swarm.start_task(task_id);
            if started {
                self.record_started(swarm, task_id, events);
            }
            started
        })
    }

    /// Start every assigned task and return the agent/task pairs now in progress.
    pub fn start_assigned_tasks(&self, swarm_id: SwarmId) -> Result<Vec<(Agent, Task)>, SwarmError> {
        self.mutate(swarm_id, |swarm, events| {
            let mut started = Vec::new();
            for task_id in swarm.assigned_task_ids() {
                if !swarm.start_task(task_id) {
                    continue;
                }
                self.record_started(swarm, task_id, events);

                let task = swarm.tasks().get(task_id).cloned();
                let agent = task
                    .as_ref()
                    .and_then(|t| t.assigned_agent)
                    .and_then(|agent_id| swarm.agents().get(agent_id).cloned());
                if let (Some(agent), Some(task)) = (agent, task) {
                    started.push((agent, task));
                }
            }
            started
        })
    }

    pub fn complete_task(
        &self,
        swarm_id: SwarmId,
        task_id: TaskId,
        result: Value,
    ) -> Result<bool, SwarmError> {
        self.mutate(swarm_id, |swarm, events| {
            if !swarm.complete_task(task_id, result) {
                debug!(swarm_id = %swarm_id, task_id = %task_id, "Task not completable");
                return false;
            }

            let Some(task) = swarm.tasks().get(task_id) else {
                return true;
            };
            let completed_at = task.completed_at.unwrap_or_else(Utc::now);
            let agent_id = task.assigned_agent;
            if let Some(ms) = task.completion_latency_ms() {
                metrics::histogram!("murmuration_task_completion_ms").record(ms as f64);
            }
            metrics::counter!("murmuration_tasks_completed_total").increment(1);
            info!(swarm_id = %swarm_id, task_id = %task_id, "Task completed");
            events.push(SwarmEvent::TaskCompleted {
                swarm_id,
                task_id,
                agent_id,
                completed_at,
            });

            self.auto_pass(swarm, events);
            true
        })
    }

    /// Fail an in-flight task, or a pending one already blocked by a failed dependency.
    /// Dependents become permanently blocked.
    pub fn fail_task(
        &self,
        swarm_id: SwarmId,
        task_id: TaskId,
        error: impl Into<String>,
    ) -> Result<bool, SwarmError> {
        let error = error.into();
        self.mutate(swarm_id, |swarm, events| {
            if !swarm.fail_task(task_id, error.clone()) {
                debug!(swarm_id = %swarm_id, task_id = %task_id, "Task not failable");
                return false;
            }

            let (agent_id, failed_at) = swarm
                .tasks()
                .get(task_id)
                .map(|t| (t.assigned_agent, t.completed_at.unwrap_or_else(Utc::now)))
                .unwrap_or((None, Utc::now()));
            metrics::counter!("murmuration_tasks_failed_total").increment(1);
            warn!(swarm_id = %swarm_id, task_id = %task_id, error = %error, "Task failed");
            events.push(SwarmEvent::TaskFailed {
                swarm_id,
                task_id,
                agent_id,
                error,
                failed_at,
            });

            self.auto_pass(swarm, events);
            true
        })
    }

    pub fn get_task_status(&self, swarm_id: SwarmId, task_id: TaskId) -> Result<Task, SwarmError> {
        self.read_swarm(Some(swarm_id), |swarm| swarm.tasks().get(task_id).cloned())?
            .ok_or(SwarmError::TaskNotFound(task_id))
    }

    pub fn task_readiness(&self, swarm_id: SwarmId, task_id: TaskId) -> Result<Readiness, SwarmError> {
        self.read_swarm(Some(swarm_id), |swarm| swarm.tasks().readiness(task_id))?
            .ok_or(SwarmError::TaskNotFound(task_id))
    }

    pub fn ready_tasks(&self, swarm_id: SwarmId) -> Result<Vec<Task>, SwarmError> {
        self.read_swarm(Some(swarm_id), |swarm| {
            swarm.tasks().ready_tasks().into_iter().cloned().collect()
        })
    }

    pub fn blocked_tasks(&self, swarm_id: SwarmId) -> Result<Vec<Task>, SwarmError> {
        self.read_swarm(Some(swarm_id), |swarm| {
            swarm.tasks().blocked_tasks().into_iter().cloned().collect()
        })
    }

    // ========================================================================
    // Metrics
    // ========================================================================

    pub fn swarm_metrics(&self, swarm_id: SwarmId) -> Result<SwarmMetrics, SwarmError> {
        self.read_swarm(Some(swarm_id), SwarmMetrics::derive)
    }

    /// Totals across every swarm ever created, terminated ones included.
    pub fn get_coordinator_stats(&self) -> CoordinatorStats {
        let per_swarm = self
            .handles()
            .into_iter()
            .map(|handle| SwarmMetrics::derive(&handle.read()))
            .collect();
        CoordinatorStats::aggregate(per_swarm)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn handle(&self, swarm_id: SwarmId) -> Result<SwarmHandle, SwarmError> {
        self.state
            .read()
            .by_id
            .get(&swarm_id)
            .cloned()
            .ok_or(SwarmError::SwarmNotFound(swarm_id))
    }

    /// Handles in creation order.
    fn handles(&self) -> Vec<SwarmHandle> {
        let state = self.state.read();
        state
            .order
            .iter()
            .filter_map(|id| state.by_id.get(id).cloned())
            .collect()
    }

    fn resolve(&self, swarm_id: Option<SwarmId>) -> Result<SwarmHandle, SwarmError> {
        match swarm_id {
            Some(id) => self.handle(id),
            None => self
                .handles()
                .into_iter()
                .rev()
                .find(|handle| handle.read().is_active())
                .ok_or(SwarmError::NoActiveSwarm),
        }
    }

    fn read_swarm<T>(
        &self,
        swarm_id: Option<SwarmId>,
        read: impl FnOnce(&Swarm) -> T,
    ) -> Result<T, SwarmError> {
        let handle = self.resolve(swarm_id)?;
        let swarm = handle.read();
        Ok(read(&swarm))
    }

    /// Run `mutate` under the swarm's write lock, then publish whatever events it
    /// collected once the lock is released.
    pub(crate) fn mutate<T>(
        &self,
        swarm_id: SwarmId,
        mutate: impl FnOnce(&mut Swarm, &mut Vec<SwarmEvent>) -> T,
    ) -> Result<T, SwarmError> {
        let handle = self.handle(swarm_id)?;
        let mut events = Vec::new();
        let output = {
            let mut swarm = handle.write();
            let output = mutate(&mut swarm, &mut events);
            debug_assert!(
                swarm.verify_invariants().is_ok(),
                "swarm {swarm_id} invariants broken"
            );
            output
        };
        self.publish_all(events);
        Ok(output)
    }

    fn auto_pass(&self, swarm: &mut Swarm, events: &mut Vec<SwarmEvent>) {
        if !self.config.auto_assign || !swarm.is_active() {
            return;
        }
        let assignments = scheduler::run_pass(swarm, &self.config.policy);
        self.record_assignments(swarm, &assignments, events);
    }

    pub(crate) fn run_pass(&self, swarm: &mut Swarm, events: &mut Vec<SwarmEvent>) -> Vec<Assignment> {
        let assignments = scheduler::run_pass(swarm, &self.config.policy);
        self.record_assignments(swarm, &assignments, events);
        assignments
    }

    pub(crate) fn record_created(&self, swarm_id: SwarmId, task: &Task, events: &mut Vec<SwarmEvent>) {
        debug!(
            swarm_id = %swarm_id,
            task_id = %task.id,
            priority = %task.priority,
            dependencies = task.dependencies.len(),
            "Task created"
        );
        metrics::counter!("murmuration_tasks_created_total").increment(1);
        events.push(SwarmEvent::TaskCreated {
            swarm_id,
            task_id: task.id,
            priority: task.priority,
            dependencies: task.dependencies.clone(),
            created_at: task.created_at,
        });
    }

    fn record_assignments(&self, swarm: &Swarm, assignments: &[Assignment], events: &mut Vec<SwarmEvent>) {
        for assignment in assignments {
            let assigned_at = swarm
                .tasks()
                .get(assignment.task_id)
                .and_then(|t| t.assigned_at)
                .unwrap_or_else(Utc::now);
            debug!(
                swarm_id = %swarm.id,
                task_id = %assignment.task_id,
                agent_id = %assignment.agent_id,
                "Task assigned"
            );
            metrics::counter!("murmuration_tasks_assigned_total").increment(1);
            events.push(SwarmEvent::TaskAssigned {
                swarm_id: swarm.id,
                task_id: assignment.task_id,
                agent_id: assignment.agent_id,
                assigned_at,
            });
        }
    }

    fn record_started(&self, swarm: &Swarm, task_id: TaskId, events: &mut Vec<SwarmEvent>) {
        let started_at = swarm
            .tasks()
            .get(task_id)
            .filter(|t| t.status == TaskStatus::InProgress)
            .and_then(|t| t.started_at)
            .unwrap_or_else(Utc::now);
        debug!(swarm_id = %swarm.id, task_id = %task_id, "Task started");
        metrics::counter!("murmuration_tasks_started_total").increment(1);
        events.push(SwarmEvent::TaskStarted {
            swarm_id: swarm.id,
            task_id,
            started_at,
        });
    }

    fn refresh_active_gauge(&self) {
        let active = self
            .handles()
            .iter()
            .filter(|handle| handle.read().is_active())
            .count();
        metrics::gauge!("murmuration_active_swarms").set(active as f64);
    }

    fn publish(&self, event: SwarmEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }

    fn publish_all(&self, events: Vec<SwarmEvent>) {
        for event in events {
            self.publish(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::AgentStatus;
    use serde_json::json;

    fn registry(auto_assign: bool) -> SwarmRegistry {
        SwarmRegistry::new(RegistryConfig {
            auto_assign,
            ..RegistryConfig::default()
        })
    }

    #[test]
    fn test_init_swarm_truncates_roster() {
        let registry = registry(false);
        let swarm = registry.init_swarm("ring", 2).unwrap();
        assert_eq!(swarm.agents().len(), 2);
        assert_eq!(swarm.topology, Topology::Ring);

        assert_eq!(
            registry.init_swarm("torus", 2).unwrap_err(),
            SwarmError::InvalidTopology("torus".to_string())
        );
        assert_eq!(
            registry.init_swarm("mesh", 0).unwrap_err(),
            SwarmError::InvalidCapacity(0)
        );
        assert_eq!(registry.get_coordinator_stats().total_swarms, 1);
    }

    #[test]
    fn test_default_swarm_is_newest_active() {
        let registry = registry(false);
        assert_eq!(
            registry.get_swarm_status(None).unwrap_err(),
            SwarmError::NoActiveSwarm
        );

        let first = registry.init_swarm("mesh", 3).unwrap();
        let second = registry.init_swarm("star", 3).unwrap();
        assert_eq!(registry.get_swarm_status(None).unwrap().id, second.id);

        assert!(registry.terminate_swarm(second.id));
        assert_eq!(registry.get_swarm_status(None).unwrap().id, first.id);
        assert_eq!(registry.list_agents(None, AgentFilter::All).unwrap().len(), 3);
    }

    #[test]
    fn test_unknown_swarm_is_an_error_unknown_task_is_false() {
        let registry = registry(false);
        let missing = SwarmId::new();
        assert_eq!(
            registry.assign_task(missing, TaskId::new()).unwrap_err(),
            SwarmError::SwarmNotFound(missing)
        );
        assert!(!registry.terminate_swarm(missing));

        let swarm = registry.init_swarm("mesh", 1).unwrap();
        assert!(!registry.assign_task(swarm.id, TaskId::new()).unwrap());
        assert!(!registry.complete_task(swarm.id, TaskId::new(), json!({})).unwrap());
        assert!(!registry.fail_task(swarm.id, TaskId::new(), "nope").unwrap());
        assert!(!registry.start_task(swarm.id, TaskId::new()).unwrap());
    }

    #[test]
    fn test_ready_pending_task_cannot_be_failed() {
        let registry = registry(false);
        let swarm = registry.init_swarm("mesh", 3).unwrap();
        let task = registry
            .create_task(swarm.id, "a", TaskPriority::Medium, vec![])
            .unwrap();
        assert_eq!(
            registry.task_readiness(swarm.id, task.id).unwrap(),
            Readiness::Ready
        );

        assert!(!registry.fail_task(swarm.id, task.id, "skipped").unwrap());
        let task = registry.get_task_status(swarm.id, task.id).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.assigned_agent.is_none());
        assert!(task.error.is_none());
        assert_eq!(
            registry.swarm_metrics(swarm.id).unwrap().tasks.failed,
            0
        );
    }

    #[test]
    fn test_auto_assign_schedules_after_each_mutation() {
        let registry = registry(true);
        let swarm = registry.init_swarm("mesh", 2).unwrap();
        let a = registry
            .create_task(swarm.id, "a", TaskPriority::High, vec![])
            .unwrap();
        assert_eq!(a.status, TaskStatus::Assigned);

        let b = registry
            .create_task(swarm.id, "b", TaskPriority::High, vec![a.id])
            .unwrap();
        assert_eq!(b.status, TaskStatus::Pending);

        assert!(registry.complete_task(swarm.id, a.id, json!({"ok": true})).unwrap());
        let b = registry.get_task_status(swarm.id, b.id).unwrap();
        assert_eq!(b.status, TaskStatus::Assigned);
    }

    #[test]
    fn test_spawn_triggers_pass_with_auto_assign() {
        let registry = registry(true);
        let swarm = registry.init_swarm("mesh", 4).unwrap();
        for label in ["a", "b", "c", "d"] {
            registry
                .create_task(swarm.id, label, TaskPriority::Medium, vec![])
                .unwrap();
        }
        assert_eq!(registry.ready_tasks(swarm.id).unwrap().len(), 1);

        let agent = registry
            .spawn_agent(swarm.id, AgentRole::CacheManager, Some("cache".into()))
            .unwrap();
        assert_eq!(agent.status, AgentStatus::Busy);
        assert!(registry.ready_tasks(swarm.id).unwrap().is_empty());
    }

    #[test]
    fn test_events_follow_mutations() {
        let bus = EventBus::new(64);
        let mut receiver = bus.subscribe();
        let registry = SwarmRegistry::with_event_bus(RegistryConfig::default(), bus);

        let swarm = registry.init_swarm("mesh", 1).unwrap();
        let task = registry
            .create_task(swarm.id, "find comedies", TaskPriority::High, vec![])
            .unwrap();
        assert!(registry.assign_task(swarm.id, task.id).unwrap());

        let kinds: Vec<&'static str> = std::iter::from_fn(|| receiver.try_recv().ok())
            .map(|event| match event {
                SwarmEvent::SwarmInitialized { .. } => "initialized",
                SwarmEvent::AgentSpawned { .. } => "spawned",
                SwarmEvent::TaskCreated { .. } => "created",
                SwarmEvent::TaskAssigned { .. } => "assigned",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["initialized", "spawned", "created", "assigned"]);
    }
}
