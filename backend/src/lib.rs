//! Loan application backend library
//!
//! Loan quote calculation, application intake and the administrative
//! processing workflow, exposed over an axum HTTP API.

pub mod application;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod quote;
pub mod routes;
pub mod state;
