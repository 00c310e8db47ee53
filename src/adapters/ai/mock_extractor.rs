//! Mock field extractor for testing.
//!
//! Provides a configurable implementation of the FieldExtractor port so
//! tests and local runs work without calling a real model.
//!
//! # Features
//!
//! - Pre-configured partial maps, consumed in order
//! - Simulated delays for timeout testing
//! - Error injection for retry testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let extractor = MockFieldExtractor::new()
//!     .with_response(PartialFieldMap::new().with(FieldKey::Location, "Chennai"))
//!     .with_delay(Duration::from_millis(100));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::event::PartialFieldMap;
use crate::ports::{ExtractionError, ExtractionRequest, FieldExtractor};

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockExtraction {
    Success(PartialFieldMap),
    Error(ExtractionError),
}

/// Mock extractor with queued responses.
///
/// When the queue is empty an empty partial map is returned.
#[derive(Debug, Clone, Default)]
pub struct MockFieldExtractor {
    responses: Arc<Mutex<VecDeque<MockExtraction>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<ExtractionRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockFieldExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a successful extraction to the queue.
    pub fn with_response(self, map: PartialFieldMap) -> Self {
        lock(&self.responses).push_back(MockExtraction::Success(map));
        self
    }

    /// Adds an error to the queue.
    pub fn with_error(self, error: ExtractionError) -> Self {
        lock(&self.responses).push_back(MockExtraction::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queues a response on an already shared extractor.
    pub fn push_response(&self, map: PartialFieldMap) {
        lock(&self.responses).push_back(MockExtraction::Success(map));
    }

    /// Queues an error on an already shared extractor.
    pub fn push_error(&self, error: ExtractionError) {
        lock(&self.responses).push_back(MockExtraction::Error(error));
    }

    /// Returns the number of calls made.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<ExtractionRequest> {
        lock(&self.calls).clone()
    }

    fn next_response(&self) -> MockExtraction {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockExtraction::Success(PartialFieldMap::new()))
    }
}

#[async_trait]
impl FieldExtractor for MockFieldExtractor {
    async fn extract(&self, request: ExtractionRequest) -> Result<PartialFieldMap, ExtractionError> {
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockExtraction::Success(map) => Ok(map),
            MockExtraction::Error(error) => Err(error),
        }
    }

    fn name(&self) -> String {
        "mock-extractor".to_string()
    }
}
