use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use log::warn;

use super::{AdvisoryService, EffectAnalysis, EffectRequest, InteractionAnalysis};
use crate::error::{AdrError, AdrResult};

/// Bounds every advisory call with a timeout.
///
/// Each call runs on its own worker thread. When the deadline passes the
/// caller gets `AdvisoryTimeout` and the worker's eventual result is dropped.
#[derive(Clone)]
pub struct TimedAdvisory {
    inner: Arc<dyn AdvisoryService>,
    timeout: Duration,
}

impl TimedAdvisory {
    pub fn new(inner: Arc<dyn AdvisoryService>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    fn run_bounded<T, F>(&self, label: &str, call: F) -> AdrResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn AdvisoryService) -> AdrResult<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);

        thread::Builder::new()
            .name(format!("advisory-{}", label))
            .spawn(move || {
                // The receiver is gone if the caller already timed out.
                let _ = tx.send(call(inner.as_ref()));
            })?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!("Advisory {} call exceeded {:?}", label, self.timeout);
                Err(AdrError::AdvisoryTimeout { millis: self.timeout.as_millis() as u64 })
            }
            Err(RecvTimeoutError::Disconnected) => Err(AdrError::AdvisoryUnavailable(
                format!("advisory {} worker stopped without a result", label)
            )),
        }
    }
}

impl AdvisoryService for TimedAdvisory {
    fn predict_effects(&self, request: &EffectRequest) -> AdrResult<EffectAnalysis> {
        let request = request.clone();
        self.run_bounded("effects", move |inner| inner.predict_effects(&request))
    }

    fn predict_interactions(&self, medications: &[String]) -> AdrResult<InteractionAnalysis> {
        if medications.len() < 2 {
            return Err(AdrError::AdvisoryUnavailable(
                "interaction analysis needs at least two medications".to_string()
            ));
        }
        let medications = medications.to_vec();
        self.run_bounded("interactions", move |inner| inner.predict_interactions(&medications))
    }
}
