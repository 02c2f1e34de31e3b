pub mod appointment_repository;
pub mod client_repository;
pub mod service_repository;
pub mod settings_repository;
