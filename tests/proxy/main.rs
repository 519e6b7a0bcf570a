//! Observable Proxy Integration Tests
//!
//! End-to-end behavior of proxies created through a ProxyRegistry.

#[path = "../common/mod.rs"]
mod common;

mod change_gate;
mod concurrency;
mod configuration;
mod handlers;
mod interfaces;
mod notifications;
mod type_identity;
