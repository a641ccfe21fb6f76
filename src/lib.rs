//! Client-side failover and load balancing for search backend pools.

pub mod config;
pub mod connection;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;

pub use config::schema::PoolConfig;
pub use connection::{Connection, ConnectionError, PoolError, PoolResult};
pub use http::HttpConnection;
pub use lifecycle::{Cancel, CancelToken};
pub use load_balancer::LoadBalancedDispatcher;
