// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! AEGIS Console Core
//!
//! Domain model and services behind the agent platform console: the env
//! import pipeline, workload resource assembly, build watching, and the
//! console HTTP API.
//!
//! # Architecture
//!
//! - **domain** - env variables, workload resources, build phases, repository traits
//! - **application** - import, deployment, and build-watch services
//! - **infrastructure** - env file parser, manifest builder, gateway clients
//! - **presentation** - axum API

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
