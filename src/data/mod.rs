pub mod cache;
pub mod gateway;
pub mod http;
pub mod wire;
