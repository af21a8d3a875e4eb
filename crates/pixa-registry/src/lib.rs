//! Service-discovery registration for a Eureka registry.
//!
//! The service announces itself on startup, renews its lease with periodic
//! heartbeats and deregisters on shutdown. The upload pipeline has no
//! dependency on this lifecycle; the server runs fine with it disabled.

pub mod eureka;

pub use eureka::EurekaClient;
