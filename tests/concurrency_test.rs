//! Races between operations, logout and the image prefetch. Time is paused
//! so mock delays order the races deterministically.

use match_orchestrator::app_actor::OperationError;
use match_orchestrator::backend::MockBackend;
use match_orchestrator::config::Config;
use match_orchestrator::lifecycle::MatchSystem;
use match_orchestrator::model::{
    Candidate, Credentials, LoginPayload, OperationKind, Phase, Preferences, ProfileUpdate, ViewerProfile,
};
use match_orchestrator::resource_cache::CacheEntry;
use match_orchestrator::model::AppState;
use std::sync::Arc;
use std::time::Duration;

async fn logged_in(mock: &Arc<MockBackend>) -> MatchSystem {
    mock.expect_login().return_ok(Some(LoginPayload {
        user: ViewerProfile::new(10, "Priya"),
        token: "tok".into(),
    }));
    let system = MatchSystem::with_backend(Config::default(), mock.clone());
    system
        .session
        .login(Credentials::new("priya@example.test", "pw"))
        .await
        .expect("login");
    system
}

#[tokio::test(start_paused = true)]
async fn test_double_fetch_resolves_to_last_invocation() {
    let mock = Arc::new(MockBackend::new());
    let system = logged_in(&mock).await;
    mock.expect_find_matches()
        .after(Duration::from_millis(100))
        .return_ok(vec![Candidate::new(1, "Old")]);
    mock.expect_find_matches()
        .after(Duration::from_millis(10))
        .return_ok(vec![Candidate::new(2, "New")]);

    let session = system.session.clone();
    let first = tokio::spawn(async move { session.fetch_matches().await });
    // Let the first call reach the backend before the second starts.
    tokio::time::sleep(Duration::from_millis(1)).await;

    let second = system.session.fetch_matches().await.unwrap();
    second.settled().await.unwrap();
    let state = system.session.snapshot().await.unwrap();
    assert!(!state.operations().get(OperationKind::FetchMatches).loading());

    let first = first.await.unwrap();
    assert!(matches!(
        first,
        Err(OperationError::Superseded {
            kind: OperationKind::FetchMatches,
            ..
        })
    ));

    let state = system.session.snapshot().await.unwrap();
    let ids: Vec<u64> = state.candidates().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2]);
    let fetch = state.operations().get(OperationKind::FetchMatches);
    assert_eq!(fetch.phase(), &Phase::Succeeded);
    assert_eq!(fetch.error(), None);

    mock.verify();
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_prefetch_writes_after_logout_are_discarded() {
    let mock = Arc::new(MockBackend::new());
    let system = logged_in(&mock).await;
    mock.expect_find_matches()
        .return_ok(vec![Candidate::new(1, "Anu"), Candidate::new(2, "Ravi")]);
    mock.picture_after(1, Ok("https://cdn.example.test/1.jpg".into()), Some(Duration::from_millis(50)));
    mock.picture_after(2, Ok("https://cdn.example.test/2.jpg".into()), Some(Duration::from_millis(50)));

    let prefetch = system.session.fetch_matches().await.unwrap();
    let generation = prefetch.generation();
    system.session.logout().await.unwrap();

    let report = prefetch.settled().await.unwrap();
    assert_eq!(report.generation, generation);
    assert_eq!(report.resolved, 2);
    assert_eq!(report.discarded, 2);

    let state = system.session.snapshot().await.unwrap();
    assert!(state.cache().is_empty());
    assert!(state.generation() > generation);

    mock.verify();
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_fetch_in_flight_during_logout_is_dropped() {
    let mock = Arc::new(MockBackend::new());
    let system = logged_in(&mock).await;
    mock.expect_find_matches()
        .after(Duration::from_millis(50))
        .return_ok(vec![Candidate::new(1, "Anu")]);

    let session = system.session.clone();
    let fetch = tokio::spawn(async move { session.fetch_matches().await });
    tokio::time::sleep(Duration::from_millis(1)).await;
    system.session.logout().await.unwrap();

    assert!(matches!(
        fetch.await.unwrap(),
        Err(OperationError::Superseded { .. })
    ));
    let state = system.session.snapshot().await.unwrap();
    assert!(state.candidates().is_empty());
    assert!(!state.operations().any_loading());
    assert!(mock.picture_requests().is_empty());

    mock.verify();
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_refetch_supersedes_running_prefetch() {
    let mock = Arc::new(MockBackend::new());
    let system = logged_in(&mock).await;
    mock.expect_find_matches().return_ok(vec![Candidate::new(1, "Anu")]);
    mock.expect_find_matches().return_ok(vec![Candidate::new(1, "Anu")]);
    mock.picture_after(1, Ok("https://cdn.example.test/1.jpg".into()), Some(Duration::from_millis(50)));

    let stale = system.session.fetch_matches().await.unwrap();
    let current = system.session.fetch_matches().await.unwrap();
    assert!(current.generation() > stale.generation());

    // Each id is written once per generation, by the pass of that generation.
    assert_eq!(stale.settled().await.unwrap().discarded, 1);
    assert_eq!(current.settled().await.unwrap().discarded, 0);
    let state = system.session.snapshot().await.unwrap();
    assert_eq!(
        state.cache().entry(1),
        Some(&CacheEntry::Resolved("https://cdn.example.test/1.jpg".into()))
    );

    mock.verify();
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_dropped_operation_does_not_stay_loading() {
    let mock = Arc::new(MockBackend::new());
    let system = logged_in(&mock).await;
    mock.expect_update_user()
        .after(Duration::from_secs(5))
        .return_ok(Some(ViewerProfile::new(10, "Late")));

    let timed_out = tokio::time::timeout(
        Duration::from_millis(10),
        system.session.update_user(ProfileUpdate::default()),
    )
    .await;
    assert!(timed_out.is_err());

    let state = system.session.snapshot().await.unwrap();
    let update = state.operations().get(OperationKind::UpdateUser);
    assert!(!update.loading());
    assert_eq!(update.phase(), &Phase::Idle);
    assert_eq!(update.error(), None);
    assert_eq!(state.profile().map(|p| p.first_name.as_str()), Some("Priya"));

    mock.verify();
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_pending_images_read_as_fallback() {
    let mock = Arc::new(MockBackend::new());
    let system = logged_in(&mock).await;
    mock.expect_find_matches().return_ok(vec![Candidate::new(7, "Divya")]);
    mock.picture_after(7, Ok("https://cdn.example.test/7.jpg".into()), Some(Duration::from_millis(50)));

    let prefetch = system.session.fetch_matches().await.unwrap();
    let view = system.session.view().await.unwrap();
    assert!(!view.images_settled);
    assert!(view.top_matches[0].image_pending);
    assert_eq!(view.top_matches[0].image, system.session.fallback_asset());

    prefetch.settled().await.unwrap();
    let view = system.session.view().await.unwrap();
    assert!(view.images_settled);
    assert_eq!(view.top_matches[0].image, "https://cdn.example.test/7.jpg");

    mock.verify();
    system.shutdown().await.unwrap();
}

fn assert_logged_out(state: &AppState) {
    assert!(state.session().is_none());
    assert!(state.candidates().is_empty(), "candidates leaked: {:?}", state.candidates());
    assert!(state.preferences().is_empty(), "preferences leaked: {:?}", state.preferences());
    assert!(state.cache().is_empty());
    assert!(!state.operations().any_loading());
}

fn settled_or_stopped<T: std::fmt::Debug>(result: &Result<T, OperationError>) -> bool {
    matches!(
        result,
        Ok(_) | Err(OperationError::Superseded { .. }) | Err(OperationError::NotAuthenticated)
    )
}

// Real threads, so a logout can land anywhere between reading the viewer
// id and the attempt beginning.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_logout_racing_fetch_leaves_no_viewer_data() {
    for _ in 0..200 {
        let mock = Arc::new(MockBackend::new());
        let system = logged_in(&mock).await;
        mock.expect_find_matches()
            .after(Duration::from_millis(1))
            .return_ok(vec![Candidate::new(1, "Old")]);

        let session = system.session.clone();
        let fetch = tokio::spawn(async move {
            match session.fetch_matches().await {
                Ok(prefetch) => prefetch.settled().await.map(|_| ()).map_err(OperationError::from),
                Err(e) => Err(e),
            }
        });
        let session = system.session.clone();
        let logout = tokio::spawn(async move { session.logout().await });

        logout.await.unwrap().unwrap();
        let fetched = fetch.await.unwrap();
        assert!(settled_or_stopped(&fetched), "{fetched:?}");

        assert_logged_out(&system.session.snapshot().await.unwrap());
        system.shutdown().await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_logout_racing_save_preferences_leaves_no_viewer_data() {
    for _ in 0..200 {
        let mock = Arc::new(MockBackend::new());
        let system = logged_in(&mock).await;
        mock.expect_save_preferences()
            .after(Duration::from_millis(1))
            .return_ok(Some(Preferences::new().with("religion", "Hindu")));

        let session = system.session.clone();
        let save = tokio::spawn(async move {
            session
                .save_preferences(Preferences::new().with("religion", "Hindu"))
                .await
        });
        let session = system.session.clone();
        let logout = tokio::spawn(async move { session.logout().await });

        logout.await.unwrap().unwrap();
        let saved = save.await.unwrap();
        assert!(settled_or_stopped(&saved), "{saved:?}");

        assert_logged_out(&system.session.snapshot().await.unwrap());
        system.shutdown().await.unwrap();
    }
}
