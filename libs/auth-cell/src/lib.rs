pub mod controller;
pub mod models;
pub mod router;
pub mod services;

pub use controller::{AuthFlow, AuthView};
pub use models::*;
pub use router::{GuardDecision, Route, RouteGuard};
pub use services::AuthService;
