//! Upward emission seam for the form orchestrator.
//!
//! # Responsibility
//! - Receive the whole current document after every successful mutation.
//! - Keep the orchestrator independent of the transport/storage collaborator.

use crate::model::experiment::Experiment;

/// Receiver of full document snapshots.
pub trait DocumentSink {
    /// Called once per successful mutation with the complete document.
    fn emit(&mut self, experiment: &Experiment);
}

impl<F> DocumentSink for F
where
    F: FnMut(&Experiment),
{
    fn emit(&mut self, experiment: &Experiment) {
        self(experiment)
    }
}

/// Sink that keeps every emitted snapshot in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    snapshots: Vec<Experiment>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> &[Experiment] {
        &self.snapshots
    }

    /// Most recently emitted snapshot.
    pub fn last(&self) -> Option<&Experiment> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl DocumentSink for RecordingSink {
    fn emit(&mut self, experiment: &Experiment) {
        self.snapshots.push(experiment.clone());
    }
}
