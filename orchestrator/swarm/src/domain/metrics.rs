// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Metrics Aggregator
//!
//! Statistics derived from swarm snapshots on demand. Nothing here is stored between
//! calls, so the numbers cannot drift from the task graph and agent pool they describe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::swarm::{Swarm, SwarmId, SwarmStatus, Topology};
use crate::domain::task::TaskStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusCounts {
    pub pending: usize,
    pub assigned: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub failed: usize,
}

impl TaskStatusCounts {
    pub fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::Assigned => self.assigned += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Failed => self.failed += 1,
        }
    }

    pub fn merge(&mut self, other: &TaskStatusCounts) {
        self.pending += other.pending;
        self.assigned += other.assigned;
        self.in_progress += other.in_progress;
        self.completed += other.completed;
        self.failed += other.failed;
    }

    pub fn total(&self) -> usize {
        self.pending + self.assigned + self.in_progress + self.completed + self.failed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmMetrics {
    pub swarm_id: SwarmId,
    pub topology: Topology,
    pub status: SwarmStatus,
    pub created_at: DateTime<Utc>,
    pub max_agents: usize,
    pub agent_count: usize,
    pub idle_agents: usize,
    pub busy_agents: usize,
    pub tasks: TaskStatusCounts,
    pub blocked_tasks: usize,
    /// Sum of `created_at → completed_at` over completed tasks.
    pub total_completion_ms: u64,
    pub mean_completion_ms: Option<f64>,
    /// Lifetime agent counters; failures include tasks failed while assigned.
    pub agent_tasks_completed: u64,
    pub agent_tasks_failed: u64,
    pub agent_busy_duration_ms: u64,
}

impl SwarmMetrics {
    pub fn derive(swarm: &Swarm) -> Self {
        let mut tasks = TaskStatusCounts::default();
        let mut total_completion_ms = 0u64;
        for task in swarm.tasks().iter() {
            tasks.record(task.status);
            total_completion_ms += task.completion_latency_ms().unwrap_or(0);
        }

        let agents = swarm.agents();
        let (agent_tasks_completed, agent_tasks_failed, agent_busy_duration_ms) = agents
            .iter()
            .fold((0, 0, 0), |(done, failed, busy), a| {
                (
                    done + a.metrics.tasks_completed,
                    failed + a.metrics.tasks_failed,
                    busy + a.metrics.total_busy_duration_ms,
                )
            });

        Self {
            swarm_id: swarm.id,
            topology: swarm.topology,
            status: swarm.status,
            created_at: swarm.created_at,
            max_agents: swarm.max_agents,
            agent_count: agents.len(),
            idle_agents: agents.idle_count(),
            busy_agents: agents.busy_count(),
            tasks,
            blocked_tasks: swarm.tasks().blocked_tasks().len(),
            total_completion_ms,
            mean_completion_ms: mean(total_completion_ms, tasks.completed),
            agent_tasks_completed,
            agent_tasks_failed,
            agent_busy_duration_ms,
        }
    }
}

/// Registry-wide totals. Terminated swarms are included.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoordinatorStats {
    pub total_swarms: usize,
    pub active_swarms: usize,
    pub terminated_swarms: usize,
    pub total_agents: usize,
    pub idle_agents: usize,
    pub busy_agents: usize,
    pub tasks: TaskStatusCounts,
    pub blocked_tasks: usize,
    pub mean_completion_ms: Option<f64>,
    pub agent_busy_duration_ms: u64,
    pub swarms: Vec<SwarmMetrics>,
}

impl CoordinatorStats {
    pub fn aggregate(swarms: Vec<SwarmMetrics>) -> Self {
        let mut stats = CoordinatorStats::default();
        let mut total_completion_ms = 0u64;

        for swarm in &swarms {
            stats.total_swarms += 1;
            match swarm.status {
                SwarmStatus::Active => stats.active_swarms += 1,
                SwarmStatus::Terminated => stats.terminated_swarms += 1,
            }
            stats.total_agents += swarm.agent_count;
            stats.idle_agents += swarm.idle_agents;
            stats.busy_agents += swarm.busy_agents;
            stats.tasks.merge(&swarm.tasks);
            stats.blocked_tasks += swarm.blocked_tasks;
            stats.agent_busy_duration_ms += swarm.agent_busy_duration_ms;
            total_completion_ms += swarm.total_completion_ms;
        }

        stats.mean_completion_ms = mean(total_completion_ms, stats.tasks.completed);
        stats.swarms = swarms;
        stats
    }
}

fn mean(total_ms: u64, count: usize) -> Option<f64> {
    (count > 0).then(|| total_ms as f64 / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::AgentRole;
    use crate::domain::scheduler::{run_pass, SchedulerPolicy};
    use crate::domain::task::{NewTask, TaskPriority};
    use serde_json::json;

    #[test]
    fn test_empty_swarm_has_no_mean() {
        let swarm = Swarm::new(Topology::Mesh, 3).unwrap();
        let metrics = SwarmMetrics::derive(&swarm);
        assert_eq!(metrics.agent_count, 0);
        assert_eq!(metrics.tasks.total(), 0);
        assert_eq!(metrics.mean_completion_ms, None);
    }

    #[test]
    fn test_counts_follow_state() {
        let mut swarm = Swarm::new(Topology::Mesh, 3).unwrap();
        swarm.spawn_agent(AgentRole::ContentAnalyzer, None).unwrap();
        swarm.spawn_agent(AgentRole::QualityAssessor, None).unwrap();
        let a = swarm.create_task(NewTask::new("a", TaskPriority::High)).unwrap().id;
        let b = swarm.create_task(NewTask::new("b", TaskPriority::High)).unwrap().id;
        swarm
            .create_task(NewTask::new("c", TaskPriority::Low).depends_on([b]))
            .unwrap();

        assert_eq!(run_pass(&mut swarm, &SchedulerPolicy::default()).len(), 2);
        assert!(swarm.complete_task(a, json!({"items": []})));
        assert!(swarm.fail_task(b, "scoring service down".into()));

        let metrics = SwarmMetrics::derive(&swarm);
        assert_eq!(metrics.idle_agents, 2);
        assert_eq!(metrics.busy_agents, 0);
        assert_eq!(metrics.tasks.completed, 1);
        assert_eq!(metrics.tasks.failed, 1);
        assert_eq!(metrics.tasks.pending, 1);
        assert_eq!(metrics.blocked_tasks, 1);
        assert_eq!(metrics.agent_tasks_completed, 1);
        assert_eq!(metrics.agent_tasks_failed, 1);
        assert!(metrics.mean_completion_ms.is_some());
    }

    #[test]
    fn test_aggregate_includes_terminated_swarms() {
        let mut live = Swarm::new(Topology::Ring, 2).unwrap();
        live.spawn_agent(AgentRole::TrendTracker, None).unwrap();
        let mut gone = Swarm::new(Topology::Star, 2).unwrap();
        gone.spawn_agent(AgentRole::ContentAnalyzer, None).unwrap();
        gone.create_task(NewTask::new("x", TaskPriority::Medium)).unwrap();
        gone.terminate();

        let stats = CoordinatorStats::aggregate(vec![
            SwarmMetrics::derive(&live),
            SwarmMetrics::derive(&gone),
        ]);
        assert_eq!(stats.total_swarms, 2);
        assert_eq!(stats.active_swarms, 1);
        assert_eq!(stats.terminated_swarms, 1);
        assert_eq!(stats.total_agents, 2);
        assert_eq!(stats.tasks.pending, 1);
        assert_eq!(stats.swarms.len(), 2);
    }
}
