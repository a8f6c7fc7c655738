// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Task Graph
//!
//! Task records of one swarm and their dependency edges. The graph answers readiness
//! questions and performs the per-task state transitions; it never picks agents.
//!
//! ```text
//! pending ──assign──▶ assigned ──start──▶ in_progress ──▶ completed | failed
//!                        └──────────(synchronous agents)──────▶ completed | failed
//! ```
//!
//! Dependencies must already exist when a task is created, so the graph is acyclic by
//! construction. A task that depends (directly or transitively) on a failed task stays
//! `pending` forever and is reported as [`Readiness::Blocked`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::agent::{AgentId, AgentRole};
use crate::domain::swarm::SwarmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declaration order is ascending urgency, so `Ord` ranks `Critical` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Critical => "critical",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = SwarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "critical" => Ok(TaskPriority::Critical),
            _ => Err(SwarmError::InvalidPriority(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// Held by an agent.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, TaskStatus::Assigned | TaskStatus::InProgress)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Opaque to the engine.
    pub description: String,
    pub priority: TaskPriority,
    pub dependencies: Vec<TaskId>,
    pub status: TaskStatus,
    pub assigned_agent: Option<AgentId>,
    /// Role the scheduler favours when several idle agents qualify.
    pub preferred_role: Option<AgentRole>,
    /// Opaque payload supplied on completion.
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    /// 0 without dependencies, otherwise one more than the deepest dependency.
    pub depth: u32,
    /// Insertion order within the swarm; breaks `created_at` ties.
    pub sequence: u64,
    pub created_at: DateTime<Utc>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Milliseconds from creation to completion, for completed tasks only.
    pub fn completion_latency_ms(&self) -> Option<u64> {
        if self.status != TaskStatus::Completed {
            return None;
        }
        self.completed_at
            .map(|done| (done - self.created_at).num_milliseconds().max(0) as u64)
    }
}

/// Input for [`TaskGraph::insert`].
#[derive(Debug, Clone)]
pub struct NewTask {
    pub description: String,
    pub priority: TaskPriority,
    pub dependencies: Vec<TaskId>,
    pub preferred_role: Option<AgentRole>,
}

impl NewTask {
    pub fn new(description: impl Into<String>, priority: TaskPriority) -> Self {
        Self {
            description: description.into(),
            priority,
            dependencies: Vec::new(),
            preferred_role: None,
        }
    }

    pub fn depends_on(mut self, dependencies: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies.extend(dependencies);
        self
    }

    pub fn prefer_role(mut self, role: AgentRole) -> Self {
        self.preferred_role = Some(role);
        self
    }
}

/// Why a task is or is not eligible for assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Readiness {
    Ready,
    /// Some dependencies have not completed yet.
    Waiting { pending_dependencies: Vec<TaskId> },
    /// A dependency chain ends in a failed task; this task will never become ready.
    Blocked { failed_dependency: TaskId },
    /// Already assigned, running or terminal.
    NotPending { status: TaskStatus },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    #[serde(skip)]
    index: HashMap<TaskId, usize>,
}

impl TaskGraph {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.index.get(&id).map(|&i| &self.tasks[i])
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        match self.index.get(&id) {
            Some(&i) => self.tasks.get_mut(i),
            None => None,
        }
    }

    /// Insert a pending task. Every dependency must already exist; nothing is
    /// mutated when one does not.
    pub fn insert(&mut self, new: NewTask) -> Result<&Task, SwarmError> {
        let mut dependencies = Vec::with_capacity(new.dependencies.len());
        let mut depth = 0;
        for dep in new.dependencies {
            let existing = self.get(dep).ok_or(SwarmError::UnknownDependency(dep))?;
            depth = depth.max(existing.depth + 1);
            if !dependencies.contains(&dep) {
                dependencies.push(dep);
            }
        }

        let task = Task {
            id: TaskId::new(),
            description: new.description,
            priority: new.priority,
            dependencies,
            status: TaskStatus::Pending,
            assigned_agent: None,
            preferred_role: new.preferred_role,
            result: None,
            error: None,
            depth,
            sequence: self.tasks.len() as u64,
            created_at: Utc::now(),
            assigned_at: None,
            started_at: None,
            completed_at: None,
        };

        let position = self.tasks.len();
        self.index.insert(task.id, position);
        self.tasks.push(task);
        Ok(&self.tasks[position])
    }

    pub fn readiness(&self, id: TaskId) -> Option<Readiness> {
        let task = self.get(id)?;
        if task.status != TaskStatus::Pending {
            return Some(Readiness::NotPending { status: task.status });
        }
        if let Some(failed_dependency) = self.failed_ancestor(task) {
            return Some(Readiness::Blocked { failed_dependency });
        }

        let pending_dependencies: Vec<TaskId> = task
            .dependencies
            .iter()
            .copied()
            .filter(|dep| self.get(*dep).map(|d| d.status) != Some(TaskStatus::Completed))
            .collect();

        if pending_dependencies.is_empty() {
            Some(Readiness::Ready)
        } else {
            Some(Readiness::Waiting { pending_dependencies })
        }
    }

    pub fn is_ready(&self, task: &Task) -> bool {
        task.status == TaskStatus::Pending
            && task
                .dependencies
                .iter()
                .all(|dep| self.get(*dep).map(|d| d.status) == Some(TaskStatus::Completed))
    }

    /// Ready tasks ordered by priority (highest first), then `created_at`, then insertion.
    pub fn ready_tasks(&self) -> Vec<&Task> {
        let mut ready: Vec<&Task> = self.tasks.iter().filter(|t| self.is_ready(t)).collect();
        ready.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.sequence.cmp(&b.sequence))
        });
        ready
    }

    /// Pending tasks that can never become ready because of a failed dependency.
    pub fn blocked_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending && self.failed_ancestor(t).is_some())
            .collect()
    }

    /// First failed task reachable through unfinished dependencies, if any.
    fn failed_ancestor(&self, task: &Task) -> Option<TaskId> {
        let mut stack: Vec<TaskId> = task.dependencies.clone();
        let mut visited: HashSet<TaskId> = HashSet::new();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(dep) = self.get(id) else { continue };
            match dep.status {
                TaskStatus::Failed => return Some(dep.id),
                TaskStatus::Completed => {}
                _ => stack.extend(dep.dependencies.iter().copied()),
            }
        }
        None
    }

    pub(crate) fn mark_assigned(
        &mut self,
        id: TaskId,
        agent_id: AgentId,
        now: DateTime<Utc>,
    ) -> Result<(), SwarmError> {
        let ready = self
            .get(id)
            .map(|t| self.is_ready(t))
            .ok_or(SwarmError::TaskNotFound(id))?;
        if !ready {
            return Err(SwarmError::InvariantViolation(format!(
                "task {id} is not ready for assignment"
            )));
        }

        if let Some(task) = self.get_mut(id) {
            task.status = TaskStatus::Assigned;
            task.assigned_agent = Some(agent_id);
            task.assigned_at = Some(now);
        }
        Ok(())
    }

    pub(crate) fn mark_started(&mut self, id: TaskId, now: DateTime<Utc>) -> bool {
        match self.get_mut(id) {
            Some(task) if task.status == TaskStatus::Assigned => {
                task.status = TaskStatus::InProgress;
                task.started_at = Some(now);
                true
            }
            _ => false,
        }
    }

    /// Returns the agent to release, or `None` when the task cannot complete.
    pub(crate) fn mark_completed(
        &mut self,
        id: TaskId,
        result: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Option<AgentId> {
        let task = self.get_mut(id)?;
        if !task.status.is_in_flight() {
            return None;
        }
        let agent_id = task.assigned_agent?;

        task.status = TaskStatus::Completed;
        task.result = Some(result);
        task.started_at.get_or_insert(now);
        task.completed_at = Some(now);
        Some(agent_id)
    }

    /// `Some(agent)` for in-flight tasks, `Some(None)` for a pending task blocked by a
    /// failed dependency, `None` when the task is unknown, terminal or still runnable.
    pub(crate) fn mark_failed(
        &mut self,
        id: TaskId,
        error: String,
        now: DateTime<Utc>,
    ) -> Option<Option<AgentId>> {
        let task = self.get(id)?;
        let failable = match task.status {
            TaskStatus::Assigned | TaskStatus::InProgress => true,
            TaskStatus::Pending => self.failed_ancestor(task).is_some(),
            TaskStatus::Completed | TaskStatus::Failed => false,
        };
        if !failable {
            return None;
        }

        let task = self.get_mut(id)?;

        let agent_id = task.assigned_agent;
        task.status = TaskStatus::Failed;
        task.error = Some(error);
        task.completed_at = Some(now);
        Some(agent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph_with_chain() -> (TaskGraph, TaskId, TaskId, TaskId) {
        let mut graph = TaskGraph::default();
        let a = graph.insert(NewTask::new("a", TaskPriority::Medium)).unwrap().id;
        let b = graph
            .insert(NewTask::new("b", TaskPriority::Medium).depends_on([a]))
            .unwrap()
            .id;
        let c = graph
            .insert(NewTask::new("c", TaskPriority::Medium).depends_on([b]))
            .unwrap()
            .id;
        (graph, a, b, c)
    }

    fn finish(graph: &mut TaskGraph, id: TaskId) {
        graph.mark_assigned(id, AgentId::new(), Utc::now()).unwrap();
        graph.mark_completed(id, json!(null), Utc::now()).unwrap();
    }

    #[test]
    fn test_unknown_dependency_rejected_without_mutation() {
        let mut graph = TaskGraph::default();
        let ghost = TaskId::new();
        let err = graph
            .insert(NewTask::new("x", TaskPriority::Low).depends_on([ghost]))
            .unwrap_err();
        assert_eq!(err, SwarmError::UnknownDependency(ghost));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_duplicate_dependencies_collapse_and_depth() {
        let (mut graph, a, b, _) = graph_with_chain();
        let d = graph
            .insert(NewTask::new("d", TaskPriority::Low).depends_on([a, b, a]))
            .unwrap()
            .clone();
        assert_eq!(d.dependencies, vec![a, b]);
        assert_eq!(d.depth, 2);
    }

    #[test]
    fn test_ready_order_by_priority_then_fifo() {
        let mut graph = TaskGraph::default();
        let low = graph.insert(NewTask::new("low", TaskPriority::Low)).unwrap().id;
        let high1 = graph.insert(NewTask::new("h1", TaskPriority::High)).unwrap().id;
        let crit = graph.insert(NewTask::new("c", TaskPriority::Critical)).unwrap().id;
        let high2 = graph.insert(NewTask::new("h2", TaskPriority::High)).unwrap().id;

        let order: Vec<TaskId> = graph.ready_tasks().iter().map(|t| t.id).collect();
        assert_eq!(order, vec![crit, high1, high2, low]);
    }

    #[test]
    fn test_readiness_follows_dependencies() {
        let (mut graph, a, b, c) = graph_with_chain();
        assert_eq!(graph.readiness(a), Some(Readiness::Ready));
        assert_eq!(
            graph.readiness(b),
            Some(Readiness::Waiting { pending_dependencies: vec![a] })
        );

        finish(&mut graph, a);
        assert_eq!(
            graph.readiness(a),
            Some(Readiness::NotPending { status: TaskStatus::Completed })
        );
        assert_eq!(graph.readiness(b), Some(Readiness::Ready));
        assert!(!graph.ready_tasks().iter().any(|t| t.id == c));
    }

    #[test]
    fn test_failed_dependency_blocks_transitively() {
        let (mut graph, a, b, c) = graph_with_chain();
        graph.mark_assigned(a, AgentId::new(), Utc::now()).unwrap();
        assert_eq!(graph.mark_failed(a, "boom".into(), Utc::now()).map(|x| x.is_some()), Some(true));

        assert_eq!(graph.readiness(b), Some(Readiness::Blocked { failed_dependency: a }));
        assert_eq!(graph.readiness(c), Some(Readiness::Blocked { failed_dependency: a }));
        assert_eq!(graph.blocked_tasks().len(), 2);
        assert!(graph.ready_tasks().is_empty());

        // Dependents of failed tasks are still accepted, and are born blocked.
        let late = graph
            .insert(NewTask::new("late", TaskPriority::Critical).depends_on([a]))
            .unwrap()
            .id;
        assert_eq!(graph.readiness(late), Some(Readiness::Blocked { failed_dependency: a }));
    }

    #[test]
    fn test_terminal_transitions_are_final() {
        let (mut graph, a, b, _) = graph_with_chain();
        // Not yet assigned: cannot complete or start.
        assert!(graph.mark_completed(a, json!(1), Utc::now()).is_none());
        assert!(!graph.mark_started(a, Utc::now()));

        finish(&mut graph, a);
        assert!(graph.mark_completed(a, json!(2), Utc::now()).is_none());
        assert!(graph.mark_failed(a, "late".into(), Utc::now()).is_none());
        assert_eq!(graph.get(a).unwrap().result, Some(json!(null)));

        // b is ready now that a completed; a runnable pending task cannot skip assignment.
        assert!(graph.mark_failed(b, "abandoned".into(), Utc::now()).is_none());
        assert_eq!(graph.get(b).unwrap().status, TaskStatus::Pending);
    }

    #[test]
    fn test_only_blocked_pending_tasks_can_be_failed() {
        let (mut graph, a, b, c) = graph_with_chain();
        // c is waiting on b, not blocked.
        assert!(graph.mark_failed(c, "early".into(), Utc::now()).is_none());

        graph.mark_assigned(a, AgentId::new(), Utc::now()).unwrap();
        assert!(graph.mark_failed(a, "boom".into(), Utc::now()).is_some());

        assert_eq!(graph.mark_failed(c, "upstream".into(), Utc::now()), Some(None));
        let task = graph.get(c).unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert!(task.assigned_agent.is_none());
        assert_eq!(graph.readiness(b), Some(Readiness::Blocked { failed_dependency: a }));
    }

    #[test]
    fn test_shortcut_completion_records_start() {
        let mut graph = TaskGraph::default();
        let a = graph.insert(NewTask::new("a", TaskPriority::Low)).unwrap().id;
        finish(&mut graph, a);
        let task = graph.get(a).unwrap();
        assert!(task.started_at.is_some());
        assert!(task.completion_latency_ms().is_some());
    }
}
