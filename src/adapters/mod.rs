//! Gateway implementations.
//!
//! - [`demo`] - in-memory gateway with canned accounts, used by default
//! - [`rest`] - reqwest-backed gateway selected with `--gateway-url`

pub mod demo;
pub mod rest;

pub use demo::{DemoAccount, DemoGateway, RecordedCall};
pub use rest::RestGateway;
