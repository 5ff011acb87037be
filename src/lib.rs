pub mod config;
pub mod db;
pub mod extractors;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod notices;
pub mod routes;
pub mod session;
pub mod state;
pub mod utils;
