//! Experiment document model.
//!
//! # Responsibility
//! - Define the serializable shape of an experiment and its parts.
//! - Keep wire names compatible with the backend that persists the document.
//!
//! # Invariants
//! - Tasks and ratings are identified by stable UUIDs that are never reused.
//! - Fields unknown to this model are carried through unchanged.

pub mod assignment;
pub mod experiment;
pub mod rating;
pub mod task;
