//! Shipment tracking server library.
//!
//! Database access, object storage, admin authentication and the HTTP API
//! for public tracking and the admin console.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
