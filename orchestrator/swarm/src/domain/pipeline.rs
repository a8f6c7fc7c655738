// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Recommendation Pipeline
//!
//! Stage layout for the "produce a recommendation" request. The builder itself lives in
//! `crate::application::pipeline`; this module only decides which stages exist, in what
//! order, and how each stage is described.
//!
//! ```text
//! group: analyze_preferences → generate_candidates → optimize_diversity → aggregate_social → assess_quality
//! solo:  analyze_preferences → track_trends → generate_candidates → optimize_diversity → assess_quality
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::domain::agent::AgentRole;
use crate::domain::task::{NewTask, TaskPriority};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    AnalyzePreferences,
    TrackTrends,
    GenerateCandidates,
    OptimizeDiversity,
    AggregateSocial,
    AssessQuality,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 6] = [
        PipelineStage::AnalyzePreferences,
        PipelineStage::TrackTrends,
        PipelineStage::GenerateCandidates,
        PipelineStage::OptimizeDiversity,
        PipelineStage::AggregateSocial,
        PipelineStage::AssessQuality,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::AnalyzePreferences => "analyze_preferences",
            PipelineStage::TrackTrends => "track_trends",
            PipelineStage::GenerateCandidates => "generate_candidates",
            PipelineStage::OptimizeDiversity => "optimize_diversity",
            PipelineStage::AggregateSocial => "aggregate_social",
            PipelineStage::AssessQuality => "assess_quality",
        }
    }

    pub fn preferred_role(&self) -> AgentRole {
        match self {
            PipelineStage::AnalyzePreferences => AgentRole::ContentAnalyzer,
            PipelineStage::TrackTrends => AgentRole::TrendTracker,
            PipelineStage::GenerateCandidates => AgentRole::RecommendationGenerator,
            PipelineStage::OptimizeDiversity => AgentRole::DiversityOptimizer,
            PipelineStage::AggregateSocial => AgentRole::SocialAggregator,
            PipelineStage::AssessQuality => AgentRole::QualityAssessor,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        PipelineStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == normalized)
            .ok_or_else(|| format!("unknown pipeline stage '{s}'"))
    }
}

/// One "produce a recommendation" request. `context` is opaque apart from
/// `groupMembers`, which selects the group path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub user_id: String,
    pub context: Value,
}

impl RecommendationRequest {
    pub fn new(user_id: impl Into<String>, context: Value) -> Self {
        Self {
            user_id: user_id.into(),
            context,
        }
    }

    pub fn is_group(&self) -> bool {
        self.context
            .get("groupMembers")
            .and_then(Value::as_array)
            .map(|members| !members.is_empty())
            .unwrap_or(false)
    }

    /// Always five stages, each depending on the one before it.
    pub fn stages(&self) -> [PipelineStage; 5] {
        if self.is_group() {
            [
                PipelineStage::AnalyzePreferences,
                PipelineStage::GenerateCandidates,
                PipelineStage::OptimizeDiversity,
                PipelineStage::AggregateSocial,
                PipelineStage::AssessQuality,
            ]
        } else {
            [
                PipelineStage::AnalyzePreferences,
                PipelineStage::TrackTrends,
                PipelineStage::GenerateCandidates,
                PipelineStage::OptimizeDiversity,
                PipelineStage::AssessQuality,
            ]
        }
    }

    /// `"<stage>: {json}"`, with the stage name, user and context embedded.
    pub fn describe(&self, stage: PipelineStage) -> String {
        let payload = json!({
            "stage": stage.as_str(),
            "userId": self.user_id,
            "context": self.context,
        });
        format!("{}: {}", stage, payload)
    }

    pub(crate) fn stage_task(&self, stage: PipelineStage) -> NewTask {
        NewTask::new(self.describe(stage), TaskPriority::High).prefer_role(stage.preferred_role())
    }
}

/// Recover the stage from a pipeline task description.
pub fn stage_of(description: &str) -> Option<PipelineStage> {
    let (name, _) = description.split_once(':')?;
    PipelineStage::ALL
        .into_iter()
        .find(|stage| stage.as_str() == name)
}
