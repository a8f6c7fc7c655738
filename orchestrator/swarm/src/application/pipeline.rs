// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Expands a recommendation request into its stage chain and schedules it.

use serde_json::Value;
use tracing::info;

use crate::application::registry::SwarmRegistry;
use crate::domain::pipeline::RecommendationRequest;
use crate::domain::swarm::{SwarmError, SwarmId};
use crate::domain::task::TaskId;

impl SwarmRegistry {
    /// Create the five-stage chain for `user_id`, run one scheduling pass and return the
    /// stage task ids in order, however many of them were assigned.
    pub fn orchestrate_recommendation(
        &self,
        swarm_id: SwarmId,
        user_id: &str,
        context: Value,
    ) -> Result<Vec<TaskId>, SwarmError> {
        self.run_pipeline(swarm_id, &RecommendationRequest::new(user_id, context))
    }

    /// The whole chain is built and scheduled under one write lock, so no other caller
    /// observes a partial pipeline.
    pub fn run_pipeline(
        &self,
        swarm_id: SwarmId,
        request: &RecommendationRequest,
    ) -> Result<Vec<TaskId>, SwarmError> {
        self.mutate(swarm_id, |swarm, events| {
            swarm.ensure_active()?;

            let mut task_ids: Vec<TaskId> = Vec::with_capacity(5);
            for stage in request.stages() {
                let new_task = request
                    .stage_task(stage)
                    .depends_on(task_ids.last().copied());
                let task = swarm.create_task(new_task)?;
                self.record_created(swarm_id, &task, events);
                task_ids.push(task.id);
            }

            let assigned = self.run_pass(swarm, events).len();
            info!(
                swarm_id = %swarm_id,
                user_id = %request.user_id,
                group = request.is_group(),
                assigned,
                "Recommendation pipeline created"
            );
            Ok(task_ids)
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pipeline::{stage_of, PipelineStage};
    use crate::domain::task::TaskStatus;
    use serde_json::json;

    #[test]
    fn test_stage_tasks_form_a_chain() {
        let registry = SwarmRegistry::default();
        let swarm = registry.init_swarm("mesh", 5).unwrap();
        let ids = registry
            .orchestrate_recommendation(swarm.id, "u1", json!({"groupMembers": ["a", "b"]}))
            .unwrap();

        let tasks: Vec<_> = ids
            .iter()
            .map(|id| registry.get_task_status(swarm.id, *id).unwrap())
            .collect();
        assert!(tasks[0].dependencies.is_empty());
        for pair in tasks.windows(2) {
            assert_eq!(pair[1].dependencies, vec![pair[0].id]);
        }
        assert_eq!(stage_of(&tasks[3].description), Some(PipelineStage::AggregateSocial));
        assert_eq!(tasks[0].status, TaskStatus::Assigned);
        assert!(tasks[1..].iter().all(|t| t.status == TaskStatus::Pending));
    }

    #[test]
    fn test_terminated_swarm_rejects_pipeline() {
        let registry = SwarmRegistry::default();
        let swarm = registry.init_swarm("mesh", 3).unwrap();
        assert!(registry.terminate_swarm(swarm.id));

        assert_eq!(
            registry
                .orchestrate_recommendation(swarm.id, "u1", json!({}))
                .unwrap_err(),
            SwarmError::SwarmTerminated(swarm.id)
        );
        assert_eq!(registry.swarm_metrics(swarm.id).unwrap().tasks.total(), 0);
    }
}
