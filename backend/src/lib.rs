//! # Rank Insight Backend
//!
//! Analysis engine for hourly search-ad rank observations.
//!
//! Advertisers are observed at a rank (1 = best) on a keyword, per device
//! class, for each of the 24 hours of a day. This crate decodes uploaded
//! observations, computes per-record and per-device metrics, normalizes
//! the loosely structured output of a language-model analyst, maps its
//! hour-by-hour rank recommendation onto chart coordinates and assembles
//! a tabular report. A REST API via Axum exposes it to the frontend.
//!
//! ## Architecture
//!
//! - [`models`]: Rank records, device classes and upload decoding
//! - [`routes`]: Serializable DTOs per view
//! - [`api`]: Public DTO surface and identifiers
//! - [`services`]: Metrics, insight normalization, chart overlay, report
//!   assembly and the language model collaborator
//! - [`db`]: Session hand-off store
//! - [`config`]: TOML and environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
