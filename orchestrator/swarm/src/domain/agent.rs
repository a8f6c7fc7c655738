// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Agent Pool
//!
//! Role-specialized logical workers and the per-swarm pool that holds them.
//! Agents are never removed individually; they live until the swarm is terminated
//! and return to idle after every task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::swarm::SwarmError;
use crate::domain::task::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed set of agent specializations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    ContentAnalyzer,
    PreferenceLearner,
    RecommendationGenerator,
    DiversityOptimizer,
    TrendTracker,
    SocialAggregator,
    CacheManager,
    QualityAssessor,
}

impl AgentRole {
    pub const ALL: [AgentRole; 8] = [
        AgentRole::ContentAnalyzer,
        AgentRole::PreferenceLearner,
        AgentRole::RecommendationGenerator,
        AgentRole::DiversityOptimizer,
        AgentRole::TrendTracker,
        AgentRole::SocialAggregator,
        AgentRole::CacheManager,
        AgentRole::QualityAssessor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::ContentAnalyzer => "content_analyzer",
            AgentRole::PreferenceLearner => "preference_learner",
            AgentRole::RecommendationGenerator => "recommendation_generator",
            AgentRole::DiversityOptimizer => "diversity_optimizer",
            AgentRole::TrendTracker => "trend_tracker",
            AgentRole::SocialAggregator => "social_aggregator",
            AgentRole::CacheManager => "cache_manager",
            AgentRole::QualityAssessor => "quality_assessor",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentRole {
    type Err = SwarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        AgentRole::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| SwarmError::InvalidRole(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Idle,
    Busy,
}

/// Lifetime counters of one agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMetrics {
    pub tasks_completed: u64,
    pub tasks_failed: u64,
    pub total_busy_duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub role: AgentRole,
    pub status: AgentStatus,
    pub current_task: Option<TaskId>,
    /// When the current task was assigned; cleared on release.
    pub busy_since: Option<DateTime<Utc>>,
    pub metrics: AgentMetrics,
    pub created_at: DateTime<Utc>,
}

impl Agent {
    pub fn is_idle(&self) -> bool {
        self.status == AgentStatus::Idle
    }
}

/// Read filter for [`AgentPool::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentFilter {
    #[default]
    All,
    Idle,
    Busy,
}

impl AgentFilter {
    pub fn matches(&self, agent: &Agent) -> bool {
        match self {
            AgentFilter::All => true,
            AgentFilter::Idle => agent.status == AgentStatus::Idle,
            AgentFilter::Busy => agent.status == AgentStatus::Busy,
        }
    }
}

impl FromStr for AgentFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(AgentFilter::All),
            "idle" => Ok(AgentFilter::Idle),
            "busy" => Ok(AgentFilter::Busy),
            other => Err(format!("unknown agent filter '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReleaseOutcome {
    Completed,
    Failed,
}

/// Agents of one swarm, kept in spawn order. The order is the ring rotation order.
///
/// Capacity is enforced by the owning [`crate::domain::swarm::Swarm`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AgentPool {
    agents: Vec<Agent>,
}

impl AgentPool {
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Spawn-order index of an agent.
    pub fn position(&self, id: AgentId) -> Option<usize> {
        self.agents.iter().position(|a| a.id == id)
    }

    pub fn list(&self, filter: AgentFilter) -> Vec<Agent> {
        self.agents
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect()
    }

    pub fn idle_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_idle()).count()
    }

    pub fn busy_count(&self) -> usize {
        self.len() - self.idle_count()
    }

    pub fn has_idle_role(&self, role: AgentRole) -> bool {
        self.agents.iter().any(|a| a.is_idle() && a.role == role)
    }

    /// All idle agents in spawn order, paired with their index.
    pub(crate) fn idle(&self) -> impl Iterator<Item = (usize, &Agent)> {
        self.agents.iter().enumerate().filter(|(_, a)| a.is_idle())
    }

    pub(crate) fn spawn(&mut self, role: AgentRole, name: Option<String>) -> &Agent {
        let ordinal = self.agents.iter().filter(|a| a.role == role).count() + 1;
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("{}-{}", role, ordinal));

        self.agents.push(Agent {
            id: AgentId::new(),
            name,
            role,
            status: AgentStatus::Idle,
            current_task: None,
            busy_since: None,
            metrics: AgentMetrics::default(),
            created_at: Utc::now(),
        });
        &self.agents[self.agents.len() - 1]
    }

    /// Mark an idle agent busy with `task_id`. Idleness is checked by the caller.
    pub(crate) fn occupy(&mut self, id: AgentId, task_id: TaskId, now: DateTime<Utc>) {
        if let Some(agent) = self.agents.iter_mut().find(|a| a.id == id) {
            agent.status = AgentStatus::Busy;
            agent.current_task = Some(task_id);
            agent.busy_since = Some(now);
        }
    }

    /// Return an agent to idle, clearing its task and accumulating busy time.
    pub(crate) fn release(&mut self, id: AgentId, outcome: ReleaseOutcome, now: DateTime<Utc>) {
        let Some(agent) = self.agents.iter_mut().find(|a| a.id == id) else {
            return;
        };

        if let Some(since) = agent.busy_since.take() {
            let busy_ms = (now - since).num_milliseconds().max(0) as u64;
            agent.metrics.total_busy_duration_ms += busy_ms;
        }
        match outcome {
            ReleaseOutcome::Completed => agent.metrics.tasks_completed += 1,
            ReleaseOutcome::Failed => agent.metrics.tasks_failed += 1,
        }
        agent.status = AgentStatus::Idle;
        agent.current_task = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_accepts_dashes_and_case() {
        assert_eq!(
            "Recommendation-Generator".parse::<AgentRole>().unwrap(),
            AgentRole::RecommendationGenerator
        );
        assert!(matches!(
            "critic".parse::<AgentRole>(),
            Err(SwarmError::InvalidRole(_))
        ));
    }

    #[test]
    fn test_default_names_count_per_role() {
        let mut pool = AgentPool::default();
        pool.spawn(AgentRole::TrendTracker, None);
        pool.spawn(AgentRole::TrendTracker, Some("  ".to_string()));
        let named = pool.spawn(AgentRole::CacheManager, Some("warm-cache".to_string())).clone();

        let names: Vec<_> = pool.iter().map(|a| a.name.clone()).collect();
        assert_eq!(names, vec!["trend_tracker-1", "trend_tracker-2", "warm-cache"]);
        assert_eq!(named.status, AgentStatus::Idle);
    }

    #[test]
    fn test_release_accumulates_metrics() {
        let mut pool = AgentPool::default();
        let id = pool.spawn(AgentRole::QualityAssessor, None).id;
        let task = TaskId::new();
        let start = Utc::now();

        pool.occupy(id, task, start);
        assert_eq!(pool.list(AgentFilter::Busy).len(), 1);
        assert!(pool.list(AgentFilter::Idle).is_empty());

        pool.release(id, ReleaseOutcome::Failed, start + chrono::Duration::milliseconds(250));
        let agent = pool.get(id).unwrap();
        assert!(agent.is_idle());
        assert_eq!(agent.current_task, None);
        assert_eq!(agent.metrics.tasks_failed, 1);
        assert_eq!(agent.metrics.total_busy_duration_ms, 250);
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("IDLE".parse::<AgentFilter>().unwrap(), AgentFilter::Idle);
        assert!("sleeping".parse::<AgentFilter>().is_err());
    }
}
