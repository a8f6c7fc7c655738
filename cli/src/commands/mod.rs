// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Murmuration CLI

pub mod config;
pub mod demo;
pub mod recommend;

pub use self::config::ConfigCommand;
pub use self::recommend::RecommendArgs;

use colored::Colorize;
use murmuration_engine::TaskStatus;

/// Colored lowercase status for terminal output.
pub(crate) fn status_label(status: TaskStatus) -> String {
    let label = format!("{status:?}").to_lowercase();
    match status {
        TaskStatus::Completed => label.green().to_string(),
        TaskStatus::Failed => label.red().to_string(),
        TaskStatus::Pending => label.yellow().to_string(),
        _ => label.blue().to_string(),
    }
}
