pub mod connection;
pub mod entities;
pub mod providers;
