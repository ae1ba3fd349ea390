//! Form use-case services.
//!
//! # Responsibility
//! - Orchestrate model, editors and reconciler into form operations.
//! - Keep the host page decoupled from how the document is kept consistent.

pub mod document_sink;
pub mod form_service;
