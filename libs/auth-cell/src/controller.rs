use chrono::NaiveDate;
use tracing::{info, warn};

use shared_models::auth::Role;
use shared_models::error::ClientError;
use shared_models::forms::FormErrors;
use shared_utils::jwt::decode_claims;

use crate::models::{LoginForm, RegistrationForm};
use crate::router::{check_access, GuardDecision};
use crate::services::AuthService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthView {
    Anonymous,
    LoginForm,
    RegisterForm,
    DoctorLoginForm,
    PatientDashboard,
    DoctorDashboard,
}

/// Login, registration and logout state for the user-management view.
pub struct AuthFlow {
    service: AuthService,
    pub view: AuthView,
    pub user_role: Option<Role>,
    pub user_name: Option<String>,
    pub registration_success: bool,
    pub form_errors: FormErrors,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl AuthFlow {
    pub fn new(service: AuthService) -> Self {
        Self {
            service,
            view: AuthView::Anonymous,
            user_role: None,
            user_name: None,
            registration_success: false,
            form_errors: FormErrors::new(),
            error_message: None,
            success_message: None,
        }
    }

    pub fn service(&self) -> &AuthService {
        &self.service
    }

    pub fn show_login(&mut self) {
        self.view = AuthView::LoginForm;
        self.registration_success = false;
        self.clear_messages();
    }

    pub fn show_register(&mut self) {
        self.view = AuthView::RegisterForm;
        self.registration_success = false;
        self.clear_messages();
    }

    pub fn show_doctor_login(&mut self) {
        self.view = AuthView::DoctorLoginForm;
        self.clear_messages();
    }

    /// Re-enter the matching dashboard from a token stored by an earlier run.
    pub fn restore(&mut self) -> AuthView {
        let Some(token) = self.service.get_token() else {
            return self.view;
        };

        let claims = decode_claims(&token).unwrap_or_default();
        match claims.parsed_role() {
            Some(Role::Patient) => self.enter(AuthView::PatientDashboard, Role::Patient, claims.name),
            Some(Role::Doctor) => self.enter(AuthView::DoctorDashboard, Role::Doctor, claims.name),
            _ => warn!("Stored session has no usable role, staying anonymous"),
        }
        self.view
    }

    pub async fn login(&mut self, form: &LoginForm) -> Result<(), ClientError> {
        self.authenticate(form, "Email", Role::Patient, "Login failed").await
    }

    pub async fn doctor_login(&mut self, form: &LoginForm) -> Result<(), ClientError> {
        self.authenticate(form, "Doctor ID/Email", Role::Doctor, "Doctor login failed").await
    }

    async fn authenticate(
        &mut self,
        form: &LoginForm,
        email_label: &str,
        required: Role,
        failure_prefix: &str,
    ) -> Result<(), ClientError> {
        self.clear_messages();

        let request = match form.validate(email_label) {
            Ok(request) => request,
            Err(errors) => {
                self.form_errors = errors.clone();
                return Err(errors.into());
            }
        };

        let token = match self.service.login(&request).await {
            Ok(token) => token,
            Err(e) => {
                self.error_message = Some(format!("{}: {}", failure_prefix, e));
                return Err(e);
            }
        };

        let claims = decode_claims(&token).unwrap_or_default();
        let decision = check_access(Some(&claims), Some(required));
        if decision != GuardDecision::Granted {
            warn!("Login for {} rejected, token role {:?}", request.user_email, claims.role);
            self.logout()?;
            self.error_message = decision.message();
            return Err(ClientError::AccessDenied(required.to_string()));
        }

        self.service.save_token(&token)?;
        let view = match required {
            Role::Doctor => AuthView::DoctorDashboard,
            _ => AuthView::PatientDashboard,
        };
        self.enter(view, required, claims.name);
        Ok(())
    }

    pub async fn register(&mut self, form: &RegistrationForm, today: NaiveDate) -> Result<(), ClientError> {
        self.clear_messages();
        self.registration_success = false;

        let request = match form.validate(today) {
            Ok(request) => request,
            Err(errors) => {
                self.form_errors = errors.clone();
                return Err(errors.into());
            }
        };

        match self.service.register(&request).await {
            Ok(ack) => {
                info!("Registered {}", request.user_email);
                self.registration_success = true;
                self.user_name = Some(request.name);
                self.success_message = Some(if ack.is_empty() {
                    "Registration successful! Please log in.".to_string()
                } else {
                    ack
                });
                self.view = AuthView::LoginForm;
                Ok(())
            }
            Err(e) => {
                self.error_message = Some(format!("Registration failed: {}", e));
                Err(e)
            }
        }
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.service.logout()?;
        self.view = AuthView::Anonymous;
        self.user_role = None;
        self.user_name = None;
        Ok(())
    }

    pub fn clear_messages(&mut self) {
        self.form_errors.clear();
        self.error_message = None;
        self.success_message = None;
    }

    fn enter(&mut self, view: AuthView, role: Role, name: Option<String>) {
        info!("Entering {:?} as {}", view, role);
        self.view = view;
        self.user_role = Some(role);
        self.user_name = name;
    }
}
