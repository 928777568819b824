//! M&P international courier rate browser.
//!
//! The desktop UI loads a province's rate table from the rate backend, prices
//! a shipment locally and converts it to rupees with the gateway's dollar rate.
//! The `server` feature builds the `rates-gateway` binary that serves
//! `/api/dollar-rate` and `/api/clear-database`.

pub mod app;
pub mod config;
pub mod domain;
pub mod infra;
#[cfg(feature = "server")]
pub mod server;
pub mod ui;
pub mod util;
