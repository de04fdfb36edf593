/// Development utilities module
///
/// In-process stand-ins for the player API and the replay server, used by
/// the `--mock` development mode and by tests.
pub mod mock_client;
pub mod mock_connector;
