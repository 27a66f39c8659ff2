//! # Subprobe Core
//!
//! The bounded-concurrency probing engine.
//!
//! * **[`probe`]**: a single HTTP request attempt, classified.
//! * **[`prober`]**: the per-host retry and scheme-fallback policy.
//! * **[`gate`]**: admission control bounding in-flight hosts.
//! * **[`scanner`]**: fans a host list out across the gate and joins the results.
//! * **[`ranker`]**: deterministic ordering of a finished batch.
//!
//! Collaborators outside the engine live in [`enumerate`] (where hosts come
//! from), [`hooks`] (what happens per finished host) and [`export`] (how
//! results leave the process).

pub mod enumerate;
pub mod export;
pub mod gate;
pub mod hooks;
pub mod probe;
pub mod prober;
pub mod ranker;
pub mod scanner;
