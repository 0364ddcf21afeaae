pub mod config;
pub mod funkit;
