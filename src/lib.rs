//! storefront - a small token-authenticated product catalogue service
//!
//! Users log in with a username and password and receive a signed bearer
//! token, which unlocks the user and product endpoints.

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod seed;
pub mod server;
pub mod telemetry;
