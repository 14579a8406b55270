// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod agent;
pub mod build;
pub mod env;
pub mod serve;

pub use agent::AgentCommand;
pub use build::BuildCommand;
pub use env::EnvCommand;
