//! Core implementation: template model, analyses and checks

pub mod checks;
pub mod config;
pub mod error;
pub mod finding;
pub mod iam;
pub mod network;
pub mod refs;
pub mod runner;
pub mod template;
