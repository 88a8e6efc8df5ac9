pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod jobs;
pub mod model;
pub mod scoring;
pub mod service;
pub mod store;
