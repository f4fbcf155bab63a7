//! Shared helpers for backend integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use microgreen_portal_backend::error::{AppError, AppResult};
use microgreen_portal_backend::external::{DemandOracle, NotificationSink};
use microgreen_portal_backend::{AppState, Config};
use shared::{ForecastPoint, SalesRecord};

/// Sink that counts deliveries instead of sending email.
#[derive(Default)]
pub struct CountingSink {
    calls: AtomicUsize,
}

impl CountingSink {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationSink for CountingSink {
    async fn notify(&self, _subject: &str, _body: &str) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Sink that always fails.
pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    async fn notify(&self, _subject: &str, _body: &str) -> AppResult<()> {
        Err(AppError::ExternalService("sink down".to_string()))
    }
}

/// What a [`RecordingOracle`] answers with.
pub enum OracleScript {
    Fail,
    Empty,
    Points(Vec<ForecastPoint>),
}

/// Oracle double that counts invocations and replays a scripted answer.
pub struct RecordingOracle {
    calls: AtomicUsize,
    script: OracleScript,
}

impl RecordingOracle {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            script: OracleScript::Fail,
        }
    }

    pub fn empty() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            script: OracleScript::Empty,
        }
    }

    pub fn returning(points: Vec<ForecastPoint>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            script: OracleScript::Points(points),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DemandOracle for RecordingOracle {
    async fn predict(
        &self,
        _history: &[SalesRecord],
        _horizon_days: i64,
    ) -> AppResult<Vec<ForecastPoint>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            OracleScript::Fail => Err(AppError::ExternalService("oracle down".to_string())),
            OracleScript::Empty => Ok(vec![]),
            OracleScript::Points(points) => Ok(points.clone()),
        }
    }
}

/// State wired with a counting sink and a failing oracle; enough for
/// inventory, order, and notification tests.
pub fn test_state() -> (AppState, Arc<CountingSink>) {
    let sink = Arc::new(CountingSink::default());
    let state = AppState::new(
        Config::default(),
        sink.clone(),
        Arc::new(RecordingOracle::failing()),
    );
    (state, sink)
}

/// State wired with the given oracle, for forecast tests.
pub fn test_state_with_oracle(oracle: Arc<RecordingOracle>) -> (AppState, Arc<CountingSink>) {
    let sink = Arc::new(CountingSink::default());
    let state = AppState::new(Config::default(), sink.clone(), oracle);
    (state, sink)
}
