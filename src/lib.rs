//! Signup backend and client for the SaaS Weekly newsletter.
//!
//! - `controller`: the state machine behind every signup surface
//! - `registration`: where a validated address goes (HTTP API or Postgres)
//! - `notifier`: how outcomes reach the user
//! - `startup`/`routes`: the API that the HTTP transport talks to

pub mod configuration;
pub mod controller;
pub mod domain;
pub mod notifier;
pub mod registration;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
