pub mod mock_gateway;
pub mod rest_client;

pub use mock_gateway::MockGateway;
pub use rest_client::RestGateway;
