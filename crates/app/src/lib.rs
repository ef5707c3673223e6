//! HRM Console client
//!
//! Wires the application services to their adapters. The `hrm` binary
//! and the end-to-end tests both build the client through [`HrmClient`].

pub mod cli;
mod client;

pub use client::{Authenticated, HrmClient, SessionApiClient};
