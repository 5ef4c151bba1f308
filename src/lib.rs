//! A relay that adds newsletter sign-ups from the agency website to a mailing list
//! held by a third-party list-management API, plus the client side of the sign-up form.

pub mod app;
pub mod config;
mod error;
pub mod form;
pub mod list_client;
mod telemetry;
mod utils;
pub mod web;

pub use app::{serve, App, AppState};
pub use error::{Error, Result};
pub use list_client::ListClient;
pub use telemetry::{init_dbg_tracing, init_production_tracing};
