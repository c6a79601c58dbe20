//! Demo: log in against the configured service, load the dashboard and
//! print the top matches.
//!
//! ```bash
//! MATCH_API_URL=http://localhost:8080 RUST_LOG=info cargo run -- ana@example.test secret
//! ```

use match_orchestrator::config::Config;
use match_orchestrator::lifecycle::{setup_tracing, MatchSystem};
use match_orchestrator::model::Credentials;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let mut args = std::env::args().skip(1);
    let email = args.next().unwrap_or_else(|| "demo@example.test".to_string());
    let password = args.next().unwrap_or_default();

    let config = Config::load();
    info!(api_url = %config.api_url, "Starting match dashboard demo");
    let system = MatchSystem::new(config).map_err(|e| e.to_string())?;

    let span = tracing::info_span!("dashboard");
    let result = async {
        let profile = system.session.login(Credentials::new(email, password)).await?;
        info!(user_id = profile.id, name = %profile.first_name, "Welcome");
        system.session.load_dashboard().await
    }
    .instrument(span)
    .await;

    match result {
        Ok(view) => {
            info!(
                candidates = view.candidates.len(),
                filtered = view.filtered.len(),
                "Dashboard loaded"
            );
            for card in &view.top_matches {
                info!(
                    candidate_id = card.candidate.id,
                    name = %card.candidate.first_name,
                    image = %card.image,
                    "Top match"
                );
            }
        }
        Err(e) => error!(error = %e, "Dashboard failed"),
    }

    system.session.logout().await.map_err(|e| e.to_string())?;
    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Demo completed");
    Ok(())
}
