//! Core application primitives: HTTP surface and subscriber transport

pub mod http;
pub mod subscriber;

pub use http::*;
pub use subscriber::*;
