/// AEGIS Console Rust SDK
///
/// Talk to the AEGIS agent platform console: preview env imports, deploy
/// agent workloads, and follow container-image builds.

pub mod client;

pub use client::{ConsoleClient, ImportPreview};
