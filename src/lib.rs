//! # diffscout
//!
//! Git diff parsing and AI-assisted code review under a token budget.
//!
//! ## Modules
//!
//! - `config`: Configuration management for the endpoint and review budget
//! - `diff`: Unified-diff parsing into a structured, renderable model
//! - `review`: Batching, prompting, and schema-validated AI review
//! - `git`: Thin shell-out wrapper around the `git` CLI
//! - `error`: Shared error taxonomy

pub mod config;
pub mod diff;
pub mod error;
pub mod git;
pub mod review;
