//! Farm Service - land, plant and tac use cases as a microservice.

pub mod config;
pub mod dtos;
pub mod flows;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod reports;
pub mod services;
pub mod startup;
pub mod utils;

pub use startup::AppState;
