use std::sync::Arc;

use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use amae_clinic_portal::Portal;
use shared_config::ClientConfig;
use shared_gateway::FileSessionStore;
use shared_models::auth::Role;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Amae Clinic portal");

    let config = ClientConfig::from_env();
    if !config.is_configured() {
        anyhow::bail!("service URLs must be absolute http(s) URLs");
    }

    let store = Arc::new(FileSessionStore::new(&config.session_store_path));
    let mut portal = Portal::new(config, store);

    let view = portal.start();
    info!("Restored view: {:?}", view);

    let claims = portal.session_claims();
    match &claims {
        Some(claims) => info!(
            "Session: role={} user_id={} name={}",
            claims.role.as_deref().unwrap_or("-"),
            claims.user_id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
            claims.name.as_deref().unwrap_or("-"),
        ),
        None => info!("No stored session"),
    }

    let path = std::env::args().nth(1).unwrap_or_else(|| "/".into());
    let decision = portal.navigate(&path);
    if let Some(notice) = &portal.notice {
        warn!("{}", notice);
    }
    info!("Landing on {} ({:?})", portal.route.path(), decision);

    // Patients see their appointments straight away.
    if let Some((Some(Role::Patient), Some(patient_id))) = claims.map(|c| (c.parsed_role(), c.user_id)) {
        match portal.scheduling.load_patient_appointments(patient_id).await {
            Ok(()) => info!("{} appointment(s) on file", portal.scheduling.appointments.len()),
            Err(e) => warn!("Could not load appointments: {}", e),
        }
    }

    Ok(())
}
