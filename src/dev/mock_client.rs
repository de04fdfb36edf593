/// Mock player API client for development and testing
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::info;

use crate::data_provider::PlayerDataProvider;
use crate::error::ApiError;
use crate::fixtures;
use crate::types::PlayerRecord;

/// Client that returns fixture data instead of making real API calls
pub struct MockClient {
    roster: Vec<PlayerRecord>,
    failing: AtomicBool,
    loads: AtomicUsize,
}

impl MockClient {
    /// Create a new mock client serving the fixture roster
    pub fn new() -> Self {
        info!("Creating MockClient for development mode");
        Self::with_roster(fixtures::create_mock_roster())
    }

    pub fn with_roster(roster: Vec<PlayerRecord>) -> Self {
        Self {
            roster,
            failing: AtomicBool::new(false),
            loads: AtomicUsize::new(0),
        }
    }

    /// Make subsequent loads fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of load requests served so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlayerDataProvider for MockClient {
    async fn players(&self) -> Result<Vec<PlayerRecord>, ApiError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            info!("MockClient: Failing player load on request");
            return Err(ApiError::Unavailable("mock client set to fail".to_string()));
        }
        info!("MockClient: Returning {} mock players", self.roster.len());
        Ok(self.roster.clone())
    }
}
