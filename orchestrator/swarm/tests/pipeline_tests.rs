// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Recommendation pipeline expansion: chain shape, stage order and first-stage assignment.

use murmuration_engine::domain::pipeline::stage_of;
use murmuration_engine::{AgentRole, PipelineStage, SwarmRegistry, Task, TaskStatus};
use serde_json::{json, Value};

fn stage_tasks(registry: &SwarmRegistry, context: Value) -> Vec<Task> {
    let swarm = registry.init_swarm("mesh", 8).unwrap();
    let ids = registry
        .orchestrate_recommendation(swarm.id, "u1", context)
        .unwrap();
    assert_eq!(ids.len(), 5);

    ids.iter()
        .map(|id| registry.get_task_status(swarm.id, *id).unwrap())
        .collect()
}

fn stages(tasks: &[Task]) -> Vec<PipelineStage> {
    tasks
        .iter()
        .map(|t| stage_of(&t.description).expect("stage prefix"))
        .collect()
}

#[test]
fn test_solo_pipeline_is_a_linear_chain() {
    let registry = SwarmRegistry::default();
    let tasks = stage_tasks(&registry, json!({"mood": "happy"}));

    assert!(tasks[0].dependencies.is_empty());
    for pair in tasks.windows(2) {
        assert_eq!(pair[1].dependencies, vec![pair[0].id]);
    }

    assert_eq!(tasks[0].status, TaskStatus::Assigned);
    assert!(tasks[1..].iter().all(|t| t.status == TaskStatus::Pending));

    let stages = stages(&tasks);
    assert!(!stages.contains(&PipelineStage::AggregateSocial));
    assert_eq!(stages[0], PipelineStage::AnalyzePreferences);
    // Diversity feeds quality directly on the solo path.
    assert_eq!(stages[3], PipelineStage::OptimizeDiversity);
    assert_eq!(stages[4], PipelineStage::AssessQuality);
}

#[test]
fn test_group_pipeline_includes_social_stage() {
    let registry = SwarmRegistry::default();
    let tasks = stage_tasks(&registry, json!({"groupMembers": ["a", "b"]}));

    let stages = stages(&tasks);
    assert_eq!(
        stages,
        vec![
            PipelineStage::AnalyzePreferences,
            PipelineStage::GenerateCandidates,
            PipelineStage::OptimizeDiversity,
            PipelineStage::AggregateSocial,
            PipelineStage::AssessQuality,
        ]
    );
    let diversity = &tasks[2];
    let social = &tasks[3];
    let quality = &tasks[4];
    assert_eq!(social.dependencies, vec![diversity.id]);
    assert_eq!(quality.dependencies, vec![social.id]);
    assert_eq!(social.preferred_role, Some(AgentRole::SocialAggregator));
}

#[test]
fn test_description_carries_user_and_context() {
    let registry = SwarmRegistry::default();
    let tasks = stage_tasks(&registry, json!({"mood": "happy", "genre": "noir"}));

    for task in &tasks {
        let (_, body) = task.description.split_once(": ").unwrap();
        let payload: Value = serde_json::from_str(body).unwrap();
        assert_eq!(payload["userId"], "u1");
        assert_eq!(payload["context"]["genre"], "noir");
        assert_eq!(task.priority, murmuration_engine::TaskPriority::High);
    }
}

#[test]
fn test_first_stage_goes_to_content_analyzer() {
    let registry = SwarmRegistry::default();
    let swarm = registry.init_swarm("mesh", 3).unwrap();
    let ids = registry
        .orchestrate_recommendation(swarm.id, "u2", json!({}))
        .unwrap();

    let first = registry.get_task_status(swarm.id, ids[0]).unwrap();
    let agent_id = first.assigned_agent.expect("first stage assigned");
    let agent = registry
        .get_swarm_status(Some(swarm.id))
        .unwrap()
        .agents()
        .get(agent_id)
        .cloned()
        .unwrap();
    assert_eq!(agent.role, AgentRole::ContentAnalyzer);
}

#[test]
fn test_star_first_stage_skips_the_hub() {
    let registry = SwarmRegistry::default();
    let swarm = registry.init_swarm("star", 3).unwrap();
    let ids = registry
        .orchestrate_recommendation(swarm.id, "u3", json!({}))
        .unwrap();

    // The first stage prefers the hub role, but spokes take work before the hub.
    let first = registry.get_task_status(swarm.id, ids[0]).unwrap();
    assert_eq!(first.preferred_role, Some(AgentRole::ContentAnalyzer));
    let snapshot = registry.get_swarm_status(Some(swarm.id)).unwrap();
    let agent = snapshot
        .agents()
        .get(first.assigned_agent.expect("first stage assigned"))
        .unwrap();
    assert_eq!(agent.role, AgentRole::RecommendationGenerator);

    let hub = snapshot
        .agents()
        .iter()
        .find(|a| a.role == AgentRole::ContentAnalyzer)
        .unwrap();
    assert_eq!(hub.status, murmuration_engine::AgentStatus::Idle);
}
