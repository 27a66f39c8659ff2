//! End-to-end tests for the probing engine, run against local HTTP servers.

#[cfg(test)]
mod probing;
