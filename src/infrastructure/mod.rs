pub mod http_client_factory;
pub mod observability;
pub mod position_api;

pub use http_client_factory::HttpClientFactory;
pub use position_api::HttpPositionSource;
