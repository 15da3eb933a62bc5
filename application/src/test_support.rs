//! Test doubles shared by the use case tests.

use crate::ports::agent_completion::{
    AgentCompletion, ReconcileRequest, ReconcileResponse, TurnRequest, TurnResponse,
};
use crate::ports::clock::Clock;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::error_sink::ErrorSink;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use synclab_domain::{ErrorRecord, ProviderFailure};

/// Completion that replays scripted results and records every request.
#[derive(Default)]
pub struct ScriptedCompletion {
    turns: Mutex<VecDeque<Result<TurnResponse, ProviderFailure>>>,
    reconciles: Mutex<VecDeque<Result<ReconcileResponse, ProviderFailure>>>,
    pub turn_requests: Mutex<Vec<TurnRequest>>,
    pub reconcile_requests: Mutex<Vec<ReconcileRequest>>,
    credential: Option<bool>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turn(self, result: Result<TurnResponse, ProviderFailure>) -> Self {
        self.turns.lock().unwrap().push_back(result);
        self
    }

    pub fn reconcile(self, result: Result<ReconcileResponse, ProviderFailure>) -> Self {
        self.reconciles.lock().unwrap().push_back(result);
        self
    }

    pub fn without_credential(mut self) -> Self {
        self.credential = Some(false);
        self
    }

    pub fn turn_count(&self) -> usize {
        self.turn_requests.lock().unwrap().len()
    }

    pub fn reconcile_count(&self) -> usize {
        self.reconcile_requests.lock().unwrap().len()
    }

    pub fn turn_request(&self, index: usize) -> TurnRequest {
        self.turn_requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl AgentCompletion for ScriptedCompletion {
    async fn run(&self, request: &TurnRequest) -> Result<TurnResponse, ProviderFailure> {
        self.turn_requests.lock().unwrap().push(request.clone());
        self.turns
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderFailure::malformed("no scripted turn left")))
    }

    async fn reconcile(
        &self,
        request: &ReconcileRequest,
    ) -> Result<ReconcileResponse, ProviderFailure> {
        self.reconcile_requests.lock().unwrap().push(request.clone());
        self.reconciles
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderFailure::malformed("no scripted reconcile left")))
    }

    fn has_credential(&self) -> bool {
        self.credential.unwrap_or(true)
    }
}

#[derive(Default)]
pub struct RecordingErrorSink {
    records: Mutex<Vec<ErrorRecord>>,
}

impl ErrorSink for RecordingErrorSink {
    fn record(&self, record: &ErrorRecord) {
        self.records.lock().unwrap().push(record.clone());
    }

    fn recent(&self) -> Vec<ErrorRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct RecordingLogger {
    events: Mutex<Vec<ConversationEvent>>,
}

impl RecordingLogger {
    pub fn types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.event_type)
            .collect()
    }
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}
