use reqwest::Method;
use tracing::{debug, info};

use shared_config::ClientConfig;
use shared_gateway::dispatcher::to_body;
use shared_gateway::RequestDispatcher;
use shared_models::auth::{TokenClaims, User};
use shared_models::error::ClientError;
use shared_gateway::session::current_claims;

use crate::models::{LoginRequest, RegisterRequest};

pub struct AuthService {
    dispatcher: RequestDispatcher,
    base_url: String,
}

impl AuthService {
    pub fn new(config: &ClientConfig, dispatcher: RequestDispatcher) -> Self {
        Self {
            dispatcher,
            base_url: config.auth_api_url(),
        }
    }

    /// Exchange credentials for a bearer token. The token is not stored.
    pub async fn login(&self, request: &LoginRequest) -> Result<String, ClientError> {
        debug!("Logging in {}", request.user_email);

        let url = format!("{}/login", self.base_url);
        self.dispatcher
            .send_for_text(Method::POST, &url, Some(to_body(request)?))
            .await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<String, ClientError> {
        debug!("Registering {} as {}", request.user_email, request.role);

        let url = format!("{}/register", self.base_url);
        self.dispatcher
            .send_for_text(Method::POST, &url, Some(to_body(request)?))
            .await
    }

    pub async fn user_exists(&self, email: &str) -> Result<bool, ClientError> {
        let url = format!("{}/user-exists?email={}", self.base_url, urlencoding::encode(email));
        self.dispatcher.get_json(&url).await
    }

    pub async fn get_user_by_phone(&self, phone: &str) -> Result<User, ClientError> {
        let url = format!("{}/by-phone/{}", self.base_url, urlencoding::encode(phone));
        self.dispatcher.get_json(&url).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<User, ClientError> {
        let url = format!("{}/by-email/{}", self.base_url, urlencoding::encode(email));
        self.dispatcher.get_json(&url).await
    }

    pub fn save_token(&self, token: &str) -> Result<(), ClientError> {
        self.dispatcher.session().save(token)
    }

    pub fn get_token(&self) -> Option<String> {
        self.dispatcher.session().get()
    }

    pub fn current_claims(&self) -> Option<TokenClaims> {
        current_claims(self.dispatcher.session().as_ref())
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        info!("Logging out");
        self.dispatcher.session().clear()
    }
}
