//! commerce-service: sales, purchasing and staff back office over PostgreSQL.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod services;
pub mod startup;
