pub mod crash;
pub mod error;
pub mod health;
pub mod routes;
pub mod state;
pub mod statistics;
pub mod usage;
pub mod utils;
