//! In-memory transport that replays a script of outcomes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{RawResponse, Transport, TransportError};

pub(crate) enum Step {
    Respond(u16, &'static str),
    Fail(TransportError),
    /// Never answer within any sane timeout.
    Hang,
}

pub(crate) struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    call_count: AtomicUsize,
    calls: Mutex<Vec<(String, Value, tokio::time::Instant)>>,
}

impl ScriptedTransport {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            call_count: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// URL and body of every call, in order.
    pub(crate) fn requests(&self) -> Vec<(String, Value)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, body, _)| (url.clone(), body.clone()))
            .collect()
    }

    /// Gaps between consecutive calls, on tokio's clock.
    pub(crate) fn gaps(&self) -> Vec<Duration> {
        let calls = self.calls.lock().unwrap();
        calls
            .windows(2)
            .map(|pair| pair[1].2.duration_since(pair[0].2))
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse, TransportError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone(), tokio::time::Instant::now()));

        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called more often than scripted");

        match step {
            Step::Respond(status, body) => Ok(RawResponse::new(status, body)),
            Step::Fail(error) => Err(error),
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(RawResponse::new(200, "{}"))
            }
        }
    }
}
