//! In-process mock of the event service: domain models, the owned in-memory
//! store, an async facade with simulated latency, and the request dispatcher.

pub mod client;
pub mod error;
pub mod manager;
pub mod models;
pub mod seed;
pub mod store;
