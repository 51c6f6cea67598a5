//! Domain model for tracked habits.
//!
//! # Responsibility
//! - Define the canonical habit record and its persisted wire shape.
//! - Keep derived streak caches private to the model.
//!
//! # Invariants
//! - Every habit is identified by a stable `HabitId`.
//! - Deletion is permanent; there are no tombstones.

pub mod habit;
