mod cache;
pub mod comparison;
pub mod db;
pub mod error;
pub mod favorites;
pub mod models;
pub mod recent;
pub mod repository;
pub mod service;
pub mod session;
pub mod store;
