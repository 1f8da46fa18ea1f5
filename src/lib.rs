pub mod app_state;
pub mod auth;
pub mod batch;
pub mod config;
pub mod entities;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod repositories;
pub mod routes;
pub mod web_text;
