//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model, streak and repository calls into store APIs.
//! - Keep host layers decoupled from persistence details.

pub mod habit_store;
