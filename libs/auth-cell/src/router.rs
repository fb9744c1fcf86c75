use std::sync::Arc;

use tracing::warn;

use shared_gateway::session::{current_claims, SessionStore};
use shared_models::auth::{Role, TokenClaims};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    UserManagement,
    AppointmentScheduling,
    DoctorAvailability,
    Consultations,
}

impl Route {
    pub const HOME: Route = Route::UserManagement;

    /// Resolve a navigation path. The empty path and unknown paths land on home.
    pub fn resolve(path: &str) -> Route {
        match path.trim().trim_end_matches('/').trim_start_matches('/') {
            "user-management" => Route::UserManagement,
            "appointment-scheduling" => Route::AppointmentScheduling,
            "doctor-availability" => Route::DoctorAvailability,
            "consultations" => Route::Consultations,
            _ => Route::HOME,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::UserManagement => "/user-management",
            Route::AppointmentScheduling => "/appointment-scheduling",
            Route::DoctorAvailability => "/doctor-availability",
            Route::Consultations => "/consultations",
        }
    }

    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::UserManagement => None,
            Route::AppointmentScheduling => Some(Role::Patient),
            Route::DoctorAvailability | Route::Consultations => Some(Role::Doctor),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Granted,
    RedirectHome,
    Denied { required: Role },
}

impl GuardDecision {
    pub fn message(&self) -> Option<String> {
        match self {
            GuardDecision::Denied { required } => Some(format!("Access denied: {} role required", required)),
            _ => None,
        }
    }
}

/// Decide whether `claims` may enter a view that requires `required`.
pub fn check_access(claims: Option<&TokenClaims>, required: Option<Role>) -> GuardDecision {
    let Some(required) = required else {
        return GuardDecision::Granted;
    };

    match claims {
        None => GuardDecision::RedirectHome,
        Some(claims) if claims.has_role(required) => GuardDecision::Granted,
        Some(_) => GuardDecision::Denied { required },
    }
}

/// Role gate consulted before entering any view.
#[derive(Clone)]
pub struct RouteGuard {
    session: Arc<dyn SessionStore>,
}

impl RouteGuard {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self { session }
    }

    pub fn can_activate(&self, route: Route) -> GuardDecision {
        let required = route.required_role();
        if required.is_none() {
            return GuardDecision::Granted;
        }

        if self.session.get().is_none() {
            return GuardDecision::RedirectHome;
        }

        // A stored token that does not decode still counts as a session,
        // it just carries no role.
        let claims = current_claims(self.session.as_ref()).unwrap_or_default();
        check_access(Some(&claims), required)
    }

    /// Resolve `path` and return the route actually shown.
    pub fn navigate(&self, path: &str) -> (Route, GuardDecision) {
        let route = Route::resolve(path);
        let decision = self.can_activate(route);

        match &decision {
            GuardDecision::Granted => (route, decision),
            GuardDecision::RedirectHome => {
                warn!("No session for {}, redirecting home", route.path());
                (Route::HOME, decision)
            }
            GuardDecision::Denied { required } => {
                warn!("Access to {} denied: {} role required", route.path(), required);
                (Route::HOME, decision)
            }
        }
    }
}
