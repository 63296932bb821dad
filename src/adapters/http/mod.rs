//! HTTP adapters - implementations of the auth gateway port.

mod rest_gateway;

pub use rest_gateway::RestGateway;
