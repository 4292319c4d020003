//! API integration tests.
//!
//! Each test runs the HTTP routes against a fresh in-memory SQLite database
//! and an in-memory object store.
//!
//! Run with: cargo test --test api

mod test_helpers;

mod test_documents;
mod test_media;
mod test_public;
mod test_shipments;
mod test_tracking;
