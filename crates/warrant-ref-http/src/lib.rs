//! Reference HTTP adapter for WARRANT.
//!
//! An in-memory request/response model, the `authorize` guard that sits in
//! front of a handler, and four runnable scenarios that exercise the engine
//! the way a web service would.

pub mod mock_data;
pub mod request;
pub mod response;
pub mod scenarios;
