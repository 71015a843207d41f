//! services/api/src/lib.rs
//!
//! The portfolio API service: configuration, storage adapters, and the HTTP layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
