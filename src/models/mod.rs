pub mod appointment;
pub mod client;
pub mod schedule;
pub mod service;
pub mod settings;
pub mod stats;
