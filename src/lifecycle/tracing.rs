//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered
//! by `RUST_LOG`. Module paths are hidden (`with_target(false)`); records carry
//! structured fields such as `state_type`, `kind`, `attempt`, `generation` and
//! `candidate_id` instead.
//!
//! ## What Gets Traced
//!
//! - **Store lifecycle**: startup and shutdown with the final revision
//! - **Transitions**: every dispatched action and its outcome (`debug`)
//! - **Operations**: one span per session-client call, with the settle result
//! - **Prefetch**: per-candidate failures (`warn`) and the pass summary (`info`)
//!
//! ## Usage Examples
//!
//! ```bash
//! RUST_LOG=info cargo run                                # Compact logs
//! RUST_LOG=debug cargo run                               # Every action and outcome
//! RUST_LOG=match_orchestrator::resource_cache=debug cargo run
//! ```
//!
//! **With `RUST_LOG=info`**, a dashboard load reads:
//!
//! ```text
//! INFO Store started state_type="AppState"
//! INFO login{email=ana@example.test}: Logged in user_id=10
//! INFO fetch_matches: Matches loaded user_id=10 count=5 generation=gen-1
//! WARN Profile picture fetch failed, using fallback candidate_id=4 generation=gen-1 error=Backend returned status 404
//! INFO Prefetch pass settled generation=gen-1 requested=5 resolved=3 defaulted=2 discarded=0
//! ```

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Structured fields identify the source instead
        .compact()
        .init();
}
