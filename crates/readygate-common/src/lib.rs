//! # readygate-common
//!
//! Shared error definitions, the gate configuration model, domain newtypes,
//! and default constants used across the readygate workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
