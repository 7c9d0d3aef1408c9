pub mod build;
pub mod config;
pub mod dashboard;
pub mod system;
pub mod webhook;
