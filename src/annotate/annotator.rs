//! Annotator and inspection adapters

use crate::annotate::sink::AnnotationSink;
use crate::buffer::BufferId;
use crate::checker::problem::Problem;
use crate::core::cancel::CancellationToken;
use crate::scan::facade::InspectionService;
use std::sync::Arc;

/// Inline-annotation entry shape: inspect, then push each problem to a sink.
pub struct Annotator {
    service: InspectionService,
    sink: Arc<dyn AnnotationSink>,
}

impl Annotator {
    pub fn new(service: InspectionService, sink: Arc<dyn AnnotationSink>) -> Self {
        Self { service, sink }
    }

    /// Annotate one buffer; returns the number of published annotations.
    pub async fn annotate(&self, buffer: BufferId, cancel: &CancellationToken) -> usize {
        let problems = self.service.inspect(buffer, cancel).await;
        if problems.is_empty() {
            return 0;
        }

        log::debug!("found {} annotation(s) for {}", problems.len(), buffer);
        for problem in &problems {
            self.sink.publish(buffer, problem).await;
        }
        problems.len()
    }
}

/// Batch-inspection entry shape: inspect and hand back the problem list.
pub struct Inspection {
    service: InspectionService,
}

impl Inspection {
    pub fn new(service: InspectionService) -> Self {
        Self { service }
    }

    pub async fn check_buffer(&self, buffer: BufferId, cancel: &CancellationToken) -> Vec<Problem> {
        self.service.inspect(buffer, cancel).await
    }
}
