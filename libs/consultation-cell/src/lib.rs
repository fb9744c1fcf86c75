pub mod cache;
pub mod controller;
pub mod models;
pub mod services;

pub use cache::{CachePolicy, Clock, HistoryCache, ManualClock, SystemClock};
pub use controller::ConsultationRecords;
pub use models::*;
pub use services::ConsultationService;
