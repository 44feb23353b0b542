pub mod classifier;
pub mod config;
pub mod edges;
pub mod engine;
pub mod error;
pub mod incidents;
pub mod models;
pub mod rate;
pub mod routes;
pub mod state;
pub mod topology;
pub mod transport;
