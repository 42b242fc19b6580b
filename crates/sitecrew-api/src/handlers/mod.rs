//! HTTP request handlers.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod objects;
pub mod schedule;
pub mod security;
pub mod users;
pub mod workers;
