//! Container runtime boundary for readygate.
//!
//! - [`backend`]: the `ContainerRuntime` / `RuntimeHandle` traits with a
//!   Docker implementation and an in-memory scripted one.
//! - [`scan`]: substring matching over a sequence of raw log chunks.
//! - [`probe`]: one connect, read, scan, release cycle for a container.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod backend;
pub mod probe;
pub mod scan;
