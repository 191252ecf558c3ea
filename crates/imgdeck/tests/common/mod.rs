//! Common test utilities for backend wire tests.

use imgdeck::EngineConfig;
use wiremock::MockServer;

/// Start a new mock provider for testing.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Engine settings pointed at the mock provider.
pub fn config_for(server: &MockServer) -> EngineConfig {
    EngineConfig {
        base_url: Some(server.uri()),
        ..EngineConfig::default()
    }
}
