//! Caching Forward Proxy Library

pub mod cache;
pub mod config;
pub mod lifecycle;
pub mod limiter;
pub mod net;
pub mod proxy;
pub mod upstream;

pub use config::ProxyConfig;
pub use lifecycle::Shutdown;
pub use proxy::Dispatcher;
