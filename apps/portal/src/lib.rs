use std::sync::Arc;

use tracing::info;

use appointment_cell::{AppointmentScheduler, AppointmentService};
use auth_cell::{AuthFlow, AuthService, AuthView, GuardDecision, Route, RouteGuard};
use consultation_cell::{ConsultationRecords, ConsultationService};
use doctor_cell::{AvailabilityDashboard, AvailabilityService};
use shared_config::ClientConfig;
use shared_gateway::session::current_claims;
use shared_gateway::{RequestDispatcher, SessionStore};
use shared_models::auth::TokenClaims;
use shared_models::error::ClientError;

/// Every view of the portal over one shared session and dispatcher.
pub struct Portal {
    config: ClientConfig,
    session: Arc<dyn SessionStore>,
    guard: RouteGuard,
    pub auth: AuthFlow,
    pub scheduling: AppointmentScheduler,
    pub availability: AvailabilityDashboard,
    pub consultations: ConsultationRecords,
    pub route: Route,
    pub notice: Option<String>,
}

impl Portal {
    pub fn new(config: ClientConfig, session: Arc<dyn SessionStore>) -> Self {
        let dispatcher = RequestDispatcher::new(session.clone());

        Self {
            guard: RouteGuard::new(session.clone()),
            auth: AuthFlow::new(AuthService::new(&config, dispatcher.clone())),
            scheduling: AppointmentScheduler::new(AppointmentService::new(&config, dispatcher.clone())),
            availability: AvailabilityDashboard::new(AvailabilityService::new(&config, dispatcher.clone())),
            consultations: ConsultationRecords::new(ConsultationService::new(&config, dispatcher)),
            route: Route::HOME,
            notice: None,
            config,
            session,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Pick up a session left by an earlier run and land on the home route.
    pub fn start(&mut self) -> AuthView {
        self.route = Route::HOME;
        self.notice = None;
        self.auth.restore()
    }

    /// Claims of the stored token, if any. Unverified.
    pub fn session_claims(&self) -> Option<TokenClaims> {
        current_claims(self.session.as_ref())
    }

    /// Move to `path` if the guard allows it, otherwise fall back home with a
    /// notice explaining why.
    pub fn navigate(&mut self, path: &str) -> GuardDecision {
        let (route, decision) = self.guard.navigate(path);
        self.route = route;
        self.notice = decision.message();
        decision
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.auth.logout()?;
        self.consultations.service().clear_all_cache();
        self.route = Route::HOME;
        info!("Session closed");
        Ok(())
    }
}
