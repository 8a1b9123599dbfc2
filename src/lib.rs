//! Movie recommendation API
//!
//! Item-based collaborative filtering over a precomputed MovieLens
//! similarity matrix, topped up with a popularity ranking when the
//! user's ratings do not produce enough predictions.

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
