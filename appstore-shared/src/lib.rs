#![cfg_attr(not(test), forbid(unsafe_code))]
//! Shared wire models, validation rules, and configuration for the App Store client.

pub mod config;
pub mod models;
