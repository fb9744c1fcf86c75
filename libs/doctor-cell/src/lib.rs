pub mod controller;
pub mod models;
pub mod services;

pub use controller::AvailabilityDashboard;
pub use models::*;
pub use services::AvailabilityService;
