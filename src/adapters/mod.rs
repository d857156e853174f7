//! Infrastructure adapters. Implement outbound ports.
//!
//! HTTP, session storage, terminal UI. Map errors to DomainError.

pub mod http;
pub mod session;
pub mod ui;
