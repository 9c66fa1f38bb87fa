//! Boston cannabis dispensary registry dashboard.
//!
//! Loads the public registry CSV, normalizes its column names, and answers the handful of
//! queries the dashboard pages need: zip/license lookups, value counts for charts, the Social
//! Equity Program split, map markers, the quiz history and the sidebar feedback survey.

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod feedback;
pub mod logging;
pub mod query;
pub mod quiz;
pub mod server;
