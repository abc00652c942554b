pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
