//! Completion gateway.
//!
//! Wraps every [`AgentCompletion`] call with a credential check, a bounded
//! wait and deterministic classification into [`CompletionError`]. It never
//! retries; callers decide what to do with a transient failure.

use crate::ports::agent_completion::{
    AgentCompletion, ReconcileRequest, ReconcileResponse, TurnRequest, TurnResponse,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use synclab_domain::{ErrorKind, ErrorRecord, ProviderFailure};
use thiserror::Error;
use tracing::debug;

/// Classified failure of a completion call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[{kind}] {message}")]
pub struct CompletionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CompletionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn hint(&self) -> &'static str {
        self.kind.hint()
    }

    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }

    /// Error record for the sink, labelled with where it happened.
    pub fn to_record(&self, context: impl Into<String>) -> ErrorRecord {
        ErrorRecord::new(self.kind, self.message.clone(), context)
    }
}

impl From<ProviderFailure> for CompletionError {
    fn from(failure: ProviderFailure) -> Self {
        Self::new(failure.classify(), failure.to_string())
    }
}

pub struct CompletionGateway {
    completion: Arc<dyn AgentCompletion>,
    timeout: Duration,
}

impl CompletionGateway {
    pub fn new(completion: Arc<dyn AgentCompletion>, timeout: Duration) -> Self {
        Self {
            completion,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn has_credential(&self) -> bool {
        self.completion.has_credential()
    }

    /// Run one agent turn. A response with neither text nor tool calls is a
    /// failure.
    pub async fn run_turn(&self, request: &TurnRequest) -> Result<TurnResponse, CompletionError> {
        let response = self.call(self.completion.run(request)).await?;
        if response.is_empty() {
            return Err(ProviderFailure::EmptyResponse.into());
        }
        Ok(response)
    }

    /// Run one reconciliation pass. A response with all fields blank is a
    /// failure.
    pub async fn reconcile(
        &self,
        request: &ReconcileRequest,
    ) -> Result<ReconcileResponse, CompletionError> {
        let response = self.call(self.completion.reconcile(request)).await?;
        if response.is_empty() {
            return Err(ProviderFailure::EmptyResponse.into());
        }
        Ok(response)
    }

    async fn call<T>(
        &self,
        fut: impl Future<Output = Result<T, ProviderFailure>>,
    ) -> Result<T, CompletionError> {
        if !self.completion.has_credential() {
            return Err(ProviderFailure::MissingCredential.into());
        }

        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(failure)) => {
                debug!(%failure, "completion call failed");
                Err(failure.into())
            }
            Err(_) => {
                debug!(timeout = ?self.timeout, "completion call timed out");
                Err(ProviderFailure::Timeout.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use synclab_domain::{AgentDescriptor, ContextState, ToolSpec};

    struct StubCompletion {
        credential: bool,
        delay: Duration,
        turn: Result<TurnResponse, ProviderFailure>,
        reconcile: Result<ReconcileResponse, ProviderFailure>,
        calls: AtomicUsize,
    }

    impl StubCompletion {
        fn new() -> Self {
            Self {
                credential: true,
                delay: Duration::ZERO,
                turn: Ok(TurnResponse::text("hello")),
                reconcile: Ok(ReconcileResponse::new("obj", "notes", "why")),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AgentCompletion for StubCompletion {
        async fn run(&self, _request: &TurnRequest) -> Result<TurnResponse, ProviderFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.turn.clone()
        }

        async fn reconcile(
            &self,
            _request: &ReconcileRequest,
        ) -> Result<ReconcileResponse, ProviderFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reconcile.clone()
        }

        fn has_credential(&self) -> bool {
            self.credential
        }
    }

    fn turn_request() -> TurnRequest {
        TurnRequest {
            agent: AgentDescriptor::engineer(),
            transcript: Vec::new(),
            state: ContextState::default(),
            tools: ToolSpec::default(),
        }
    }

    fn reconcile_request() -> ReconcileRequest {
        ReconcileRequest {
            transcript: Vec::new(),
            state: ContextState::default(),
        }
    }

    fn gateway(stub: StubCompletion) -> (CompletionGateway, Arc<StubCompletion>) {
        let stub = Arc::new(stub);
        (
            CompletionGateway::new(stub.clone(), Duration::from_secs(5)),
            stub,
        )
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let (gateway, _) = gateway(StubCompletion::new());
        let response = gateway.run_turn(&turn_request()).await.unwrap();
        assert_eq!(response.text, "hello");
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_calling() {
        let mut stub = StubCompletion::new();
        stub.credential = false;
        let (gateway, stub) = gateway(stub);

        let err = gateway.run_turn(&turn_request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Auth);
        let err = gateway.reconcile(&reconcile_request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Auth);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_failures_are_classified() {
        let mut stub = StubCompletion::new();
        stub.turn = Err(ProviderFailure::status(429, "slow down"));
        stub.reconcile = Err(ProviderFailure::status(400, "blocked by policy"));
        let (gateway, _) = gateway(stub);

        let err = gateway.run_turn(&turn_request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::RateLimit);
        assert!(err.is_transient());
        assert!(err.hint().contains("cooldown"));

        let err = gateway.reconcile(&reconcile_request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRequest);
    }

    #[tokio::test]
    async fn test_empty_responses_are_unknown_failures() {
        let mut stub = StubCompletion::new();
        stub.turn = Ok(TurnResponse::text("   "));
        stub.reconcile = Ok(ReconcileResponse::default());
        let (gateway, _) = gateway(stub);

        let err = gateway.run_turn(&turn_request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unknown);
        let err = gateway.reconcile(&reconcile_request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_server_failure() {
        let mut stub = StubCompletion::new();
        stub.delay = Duration::from_secs(120);
        let (gateway, _) = gateway(stub);

        let err = gateway.run_turn(&turn_request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Server);
    }

    #[test]
    fn test_to_record() {
        let err = CompletionError::from(ProviderFailure::status(401, "bad key"));
        let record = err.to_record("turn:architect");
        assert_eq!(record.kind, ErrorKind::Auth);
        assert_eq!(record.context, "turn:architect");
        assert!(record.message.contains("bad key"));
    }
}
