pub mod config;
pub mod discord;
pub mod engine;
pub mod source;
pub mod web;
