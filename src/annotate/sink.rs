//! Annotation sink boundary

use crate::buffer::BufferId;
use crate::checker::problem::Problem;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// UI-facing delivery interface
///
/// Receives zero or more problems per buffer; the host renders each at its
/// reported line/column with the collapsed highlight severity and the
/// trailing hint.
#[async_trait]
pub trait AnnotationSink: Send + Sync {
    async fn publish(&self, buffer: BufferId, problem: &Problem);
}

/// Sink that accumulates published annotations, for tests and headless runs
#[derive(Default)]
pub struct CollectingSink {
    annotations: Mutex<HashMap<BufferId, Vec<Problem>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything published so far.
    pub async fn take(&self) -> HashMap<BufferId, Vec<Problem>> {
        std::mem::take(&mut *self.annotations.lock().await)
    }

    pub async fn count(&self) -> usize {
        self.annotations.lock().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl AnnotationSink for CollectingSink {
    async fn publish(&self, buffer: BufferId, problem: &Problem) {
        self.annotations
            .lock()
            .await
            .entry(buffer)
            .or_default()
            .push(problem.clone());
    }
}
