pub mod controller;
pub mod models;
pub mod services;

pub use controller::AppointmentScheduler;
pub use models::*;
pub use services::AppointmentService;
