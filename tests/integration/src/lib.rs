//! Integration test utilities
//!
//! In-process axum mocks of the platform: [`MockApi`] answers REST routes
//! with scripted responses and records every request, [`MockGateway`] hands
//! each accepted WebSocket to the test so it can play the server side of
//! the gateway protocol.

pub mod fixtures;
pub mod mock_api;
pub mod mock_gateway;

pub use fixtures::*;
pub use mock_api::{MockApi, MockResponse, RecordedRequest};
pub use mock_gateway::{GatewayConnection, MockGateway};

use std::time::Duration;

/// Upper bound for anything a test waits on
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);
