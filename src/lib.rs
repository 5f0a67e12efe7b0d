//! Timeline Locality API Library
//!
//! This library turns a location-history export into a list of decoded points,
//! each enriched with district and country names from a reverse-geocoding
//! service (Nominatim).
//!
//! # Modules
//!
//! - `api`: Router construction and HTTP handlers.
//! - `core`: Pipeline logic (decoding, extraction, enrichment).
//! - `integrations`: External service integrations.
//! - `config`: Configuration management.
//! - `coordinates`: Fixed-point coordinate decoding.
//! - `enrichment`: Concurrent locality lookups.
//! - `errors`: Error handling types.
//! - `extractor`: Point extraction from timeline documents.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `services`: Reverse-geocoding client.

pub mod api;
pub mod core;
pub mod integrations;

// Re-export primary modules for shared use in tests and other binaries
pub mod config;
pub mod coordinates;
pub mod enrichment;
pub mod errors;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod services;
