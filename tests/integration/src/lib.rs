//! Integration test utilities for the presence toolkit
//!
//! This crate provides helpers for running end-to-end tests against
//! the in-process hub with fully wired coordinators.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
