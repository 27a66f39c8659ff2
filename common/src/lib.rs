//! Shared data model and configuration for `subprobe`.
//!
//! * **[`network`]**: hosts, probe attempts and their classified outcomes.
//! * **[`config`]**: probing parameters and output preferences.

pub mod config;
pub mod network;
