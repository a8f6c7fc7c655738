// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Application layer: the registry use cases, the recommendation pipeline builder and
//! the async worker that drives assigned tasks through a [`worker::TaskHandler`].

pub mod pipeline;
pub mod registry;
pub mod worker;

pub use registry::{RegistryConfig, SwarmRegistry};
pub use worker::{SwarmWorker, TaskHandler, WorkerReport};
