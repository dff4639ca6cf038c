//! HTTP API: security gateway middleware, problem responses, and routing.

pub mod app;
pub mod middleware;
pub mod problem;
pub mod provider;
