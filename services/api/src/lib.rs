pub mod adapters;
pub mod config;
pub mod error;
pub mod pdf;
pub mod web;
