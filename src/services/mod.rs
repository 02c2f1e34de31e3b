pub mod appointment_service;
pub mod availability_service;
pub mod backup_service;
pub mod booking_service;
pub mod catalog_service;
pub mod client_service;
pub mod schedule_utils;
pub mod settings_service;
pub mod stats_service;
