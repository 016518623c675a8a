use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use honest_news::backend::demo_user;
use honest_news::model::{
    Credentials, DetailLevel, NotificationsPatch, PreferencesPatch, Registration,
    SubscriptionTier, User,
};
use honest_news::user::{DEMO_INSTALLED, PREFERENCES_FAILED, REGISTRATION_FAILED, SIGNED_OUT};
use honest_news::{
    BackendError, IdentityProvider, Latency, MockBackend, StoreError, UserState, UserStore,
};
use store_dispatch::ActionTrace;
use tokio::time::{sleep, Instant};

/// Identity provider where every call fails with the same error.
struct FailingIdentity(BackendError);

#[async_trait]
impl IdentityProvider for FailingIdentity {
    async fn login(&self, _credentials: &Credentials) -> Result<User, BackendError> {
        sleep(Duration::from_millis(50)).await;
        Err(self.0.clone())
    }

    async fn register(&self, _registration: &Registration) -> Result<User, BackendError> {
        sleep(Duration::from_millis(50)).await;
        Err(self.0.clone())
    }

    async fn update_preferences(
        &self,
        _patch: &PreferencesPatch,
    ) -> Result<PreferencesPatch, BackendError> {
        sleep(Duration::from_millis(50)).await;
        Err(self.0.clone())
    }

    async fn logout(&self) -> Result<(), BackendError> {
        Err(self.0.clone())
    }
}

// Fixture timestamps are taken from the wall clock, so users are compared by identity.
fn identity(user: Option<&User>) -> Option<(&str, &str)> {
    user.map(|u| (u.id.as_str(), u.email.as_str()))
}

fn demo_identity() -> Option<(&'static str, &'static str)> {
    Some(("1", "demo@honestnews.com"))
}

fn mock_store() -> UserStore {
    UserStore::spawn(Arc::new(MockBackend::default()))
}

fn signed_in_store(identity: Arc<dyn IdentityProvider>) -> UserStore {
    UserStore::with_state(
        UserState::signed_in(demo_user()),
        identity,
        ActionTrace::new("user"),
    )
}

#[tokio::test(start_paused = true)]
async fn test_login_signs_in_demo_user() {
    let store = mock_store();
    let mut rx = store.subscribe();
    let started = Instant::now();

    let (result, observed) = tokio::join!(
        store.login("demo@honestnews.com", "password"),
        async { rx.wait_for(|s| s.loading).await.map(|s| s.clone()) }
    );

    let user = result.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(1000));
    assert_eq!(identity(Some(&user)), demo_identity());

    let observed = observed.unwrap();
    assert!(observed.loading);
    assert!(observed.user.is_none());

    let state = store.snapshot();
    assert!(!state.loading);
    assert!(state.is_authenticated);
    assert_eq!(identity(state.user.as_ref()), demo_identity());
    assert_eq!(state.error, None);
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_login_with_empty_field_fails() {
    let store = mock_store();

    let err = store.login("demo@honestnews.com", "").await.unwrap_err();

    assert_eq!(err, StoreError::Rejected("Invalid credentials".into()));
    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
    assert!(!state.loading);
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_login_clears_previous_error() {
    let store = mock_store();
    let _ = store.login("", "").await;
    assert!(store.snapshot().error.is_some());

    let mut rx = store.subscribe();
    let (result, observed) = tokio::join!(store.login("a@b.com", "pw"), async {
        rx.wait_for(|s| s.loading).await.map(|s| s.error.clone())
    });

    result.unwrap();
    assert_eq!(observed.unwrap(), None);
    assert_eq!(store.snapshot().error, None);
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_register_creates_free_account() {
    let store = mock_store();

    let user = store
        .register("new@reader.com", "hunter2", "New Reader")
        .await
        .unwrap();

    assert_eq!(user.email, "new@reader.com");
    assert_eq!(user.name, "New Reader");
    assert_eq!(user.subscription_tier, SubscriptionTier::Free);
    assert_ne!(user.id, demo_user().id);
    assert_eq!(user.preferences, demo_user().preferences);

    let state = store.snapshot();
    assert!(state.is_authenticated);
    assert_eq!(state.user, Some(user));
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_register_replaces_paid_tier_with_free() {
    let store = signed_in_store(Arc::new(MockBackend::default()));
    assert_eq!(
        store.snapshot().user.map(|u| u.subscription_tier),
        Some(SubscriptionTier::Standard)
    );

    let user = store.register("new@reader.com", "pw", "New").await.unwrap();

    assert_eq!(user.subscription_tier, SubscriptionTier::Free);
    let state = store.snapshot();
    assert_eq!(
        state.user.as_ref().map(|u| u.subscription_tier),
        Some(SubscriptionTier::Free)
    );
    assert_eq!(
        state.user.as_ref().map(|u| u.email.as_str()),
        Some("new@reader.com")
    );
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_register_failure_uses_fallback_message() {
    let identity = FailingIdentity(BackendError::Operation(String::new()));
    let store = UserStore::spawn(Arc::new(identity));

    let err = store.register("a@b.com", "pw", "A").await.unwrap_err();

    assert_eq!(err, StoreError::Rejected(REGISTRATION_FAILED.into()));
    assert_eq!(store.snapshot().error.as_deref(), Some(REGISTRATION_FAILED));
    assert!(!store.snapshot().loading);
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_login_keeps_signed_in_user() {
    let provider = FailingIdentity(BackendError::Operation("server down".into()));
    let store = signed_in_store(Arc::new(provider));

    let err = store.login("a@b.com", "pw").await.unwrap_err();

    assert_eq!(err, StoreError::Rejected("server down".into()));
    let state = store.snapshot();
    assert!(state.is_authenticated);
    assert_eq!(identity(state.user.as_ref()), demo_identity());
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_update_preferences_merges_patch() {
    let store = mock_store();
    store.set_demo_user().await.unwrap();
    let started = Instant::now();

    let patch = PreferencesPatch::new()
        .with_dark_mode(true)
        .with_detail_level(DetailLevel::Brief)
        .with_notifications(NotificationsPatch::default().with_daily_digest(false));
    store.update_preferences(patch).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(500));
    let state = store.snapshot();
    assert!(!state.loading);
    let prefs = state.user.map(|u| u.preferences).unwrap();
    let before = demo_user().preferences;
    assert!(prefs.dark_mode);
    assert_eq!(prefs.detail_level, DetailLevel::Brief);
    assert!(!prefs.notifications.daily_digest);
    assert_eq!(prefs.notifications.breaking_news, before.notifications.breaking_news);
    assert_eq!(prefs.topics, before.topics);
    assert_eq!(prefs.font_size, before.font_size);
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_update_preferences_without_user_is_noop() {
    let store = mock_store();

    store
        .update_preferences(PreferencesPatch::new().with_dark_mode(true))
        .await
        .unwrap();

    let state = store.snapshot();
    assert!(state.user.is_none());
    assert!(!state.loading);
    assert_eq!(state.error, None);
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_update_preferences_failure() {
    let provider = FailingIdentity(BackendError::Operation(String::new()));
    let store = signed_in_store(Arc::new(provider));

    let err = store
        .update_preferences(PreferencesPatch::new().with_dark_mode(true))
        .await
        .unwrap_err();

    assert_eq!(err, StoreError::Rejected(PREFERENCES_FAILED.into()));
    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some(PREFERENCES_FAILED));
    assert_eq!(identity(state.user.as_ref()), demo_identity());
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_preferences_apply_in_order() {
    let store = mock_store();
    store.set_demo_user().await.unwrap();

    let (first, second) = tokio::join!(
        store.update_preferences(PreferencesPatch::new().with_dark_mode(true)),
        store.update_preferences(PreferencesPatch::new().with_dark_mode(false)),
    );

    first.unwrap();
    second.unwrap();
    let dark = store.snapshot().user.map(|u| u.preferences.dark_mode);
    assert_eq!(dark, Some(false));
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_logout_clears_user() {
    let store = signed_in_store(Arc::new(MockBackend::default()));

    store.logout().await.unwrap();

    let state = store.snapshot();
    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
    assert!(!state.loading);
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_logout_succeeds_when_backend_fails() {
    let identity = FailingIdentity(BackendError::Operation("gone".into()));
    let store = signed_in_store(Arc::new(identity));

    store.logout().await.unwrap();

    let state = store.snapshot();
    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
    assert_eq!(state.error, None);
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_logout_abandons_pending_login() {
    let store = mock_store();

    let (login, logout) = tokio::join!(store.login("a@b.com", "pw"), async {
        sleep(Duration::from_millis(100)).await;
        store.logout().await
    });

    assert_eq!(login.unwrap_err(), StoreError::Rejected(SIGNED_OUT.into()));
    logout.unwrap();

    // The aborted login never lands
    sleep(Duration::from_millis(2000)).await;
    let state = store.snapshot();
    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
    assert!(!state.loading);
    assert_eq!(state.error, None);
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_slow_logout_keeps_later_login() {
    let latency = Latency {
        login_ms: 100,
        logout_ms: 500,
        ..Latency::default()
    };
    let store = UserStore::with_state(
        UserState::signed_in(demo_user()),
        Arc::new(MockBackend::new(latency)),
        ActionTrace::new("user"),
    );

    let (logout, login) = tokio::join!(store.logout(), async {
        sleep(Duration::from_millis(10)).await;
        store.login("a@b.com", "pw").await
    });

    logout.unwrap();
    let user = login.unwrap();
    let state = store.snapshot();
    assert!(state.is_authenticated);
    assert_eq!(identity(state.user.as_ref()), identity(Some(&user)));
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_demo_user_cuts_off_pending_login() {
    let store = mock_store();

    let (login, ()) = tokio::join!(store.login("a@b.com", "pw"), async {
        sleep(Duration::from_millis(100)).await;
        store.set_demo_user().await.unwrap();
    });

    assert_eq!(login.unwrap_err(), StoreError::Rejected(DEMO_INSTALLED.into()));
    sleep(Duration::from_millis(2000)).await;
    let state = store.snapshot();
    assert!(state.is_authenticated);
    assert!(!state.loading);
    assert_eq!(identity(state.user.as_ref()), demo_identity());
    assert_eq!(state.error, None);
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_demo_user_and_clear_error() {
    let store = mock_store();
    let _ = store.login("", "").await;

    store.set_demo_user().await.unwrap();
    let state = store.snapshot();
    assert!(state.is_authenticated);
    assert_eq!(identity(state.user.as_ref()), demo_identity());
    assert_eq!(state.error.as_deref(), Some("Invalid credentials"));

    store.clear_error().await.unwrap();
    assert_eq!(store.snapshot().error, None);
    assert!(store.snapshot().is_authenticated);
    store.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_shutdown() {
    let store = mock_store();
    let mut rx = store.subscribe();

    store.shutdown().await;

    assert!(rx.changed().await.is_err());
}
