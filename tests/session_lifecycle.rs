//! End-to-end session lifecycle tests.
//!
//! Drives the transition engine through full login / verify / refresh /
//! logout journeys with scripted collaborators, asserting on the session
//! store, the durable mirror, and the side effects the engine fires.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::SecretString;

use session_keeper::adapters::storage::{FileUserStore, InMemoryUserStore};
use session_keeper::application::{AuthTransitionEngine, EngineRoutes};
use session_keeper::domain::foundation::{Route, UserId};
use session_keeper::domain::session::{FailureClass, SessionStore};
use session_keeper::domain::user::{PermissionLevel, UserParameter, UserRecord};
use session_keeper::ports::{
    AuthGateway, ConfirmationPrompt, ConfirmationRequest, GatewayError, LoginPayload, Navigator,
    Notice, NoticeLevel, NotificationSink, RegisterRequest, UserStore,
};

fn member() -> UserRecord {
    UserRecord {
        id: UserId::new("1").unwrap(),
        firstname: "Alice".to_string(),
        lastname: "Burel".to_string(),
        email: "alice.burel@epsi.fr".to_string(),
        permission_level: PermissionLevel::Member,
        grade: "B2 G1".to_string(),
        city: "Lyon".to_string(),
        bts: false,
        is_active: true,
        has_information_mails: false,
    }
}

/// Gateway with scripted responses and call counters.
#[derive(Default)]
struct ScriptedGateway {
    login: Mutex<Option<Result<LoginPayload, GatewayError>>>,
    verify: Mutex<Option<Result<(), GatewayError>>>,
    refresh: Mutex<Option<Result<(), GatewayError>>>,
    change_password: Mutex<Option<Result<(), GatewayError>>>,
    set_information_mails: Mutex<Option<Result<(), GatewayError>>>,
    refresh_calls: Mutex<u32>,
    logout_calls: Mutex<u32>,
}

#[async_trait]
impl AuthGateway for ScriptedGateway {
    async fn login(
        &self,
        _email: &str,
        _password: &SecretString,
        _remember_me: bool,
    ) -> Result<LoginPayload, GatewayError> {
        self.login
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(GatewayError::new("no scripted login response")))
    }

    async fn verify(&self) -> Result<(), GatewayError> {
        self.verify.lock().unwrap().clone().unwrap_or(Ok(()))
    }

    async fn refresh(&self) -> Result<(), GatewayError> {
        *self.refresh_calls.lock().unwrap() += 1;
        self.refresh.lock().unwrap().clone().unwrap_or(Ok(()))
    }

    async fn logout(&self) {
        *self.logout_calls.lock().unwrap() += 1;
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn change_password(
        &self,
        _password: &SecretString,
        _confirmation: &SecretString,
    ) -> Result<(), GatewayError> {
        self.change_password.lock().unwrap().clone().unwrap_or(Ok(()))
    }

    async fn update_informations(
        &self,
        _update: &session_keeper::domain::user::UserUpdate,
    ) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn delete_account(&self, _user_id: &UserId) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn set_information_mails(&self, _enabled: bool) -> Result<(), GatewayError> {
        self.set_information_mails
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Ok(()))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[derive(Default)]
struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn go_to(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

struct RecordingPrompt {
    answer: bool,
    requests: Mutex<Vec<ConfirmationRequest>>,
}

impl RecordingPrompt {
    fn answering(answer: bool) -> Self {
        Self {
            answer,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ConfirmationPrompt for RecordingPrompt {
    async fn confirm(&self, request: ConfirmationRequest) -> bool {
        self.requests.lock().unwrap().push(request);
        self.answer
    }
}

struct World {
    store: Arc<SessionStore>,
    gateway: Arc<ScriptedGateway>,
    user_store: Arc<InMemoryUserStore>,
    notifier: Arc<RecordingNotifier>,
    navigator: Arc<RecordingNavigator>,
    prompt: Arc<RecordingPrompt>,
    engine: AuthTransitionEngine,
}

fn world() -> World {
    world_with(SessionStore::new(), InMemoryUserStore::new(), true)
}

fn world_with(store: SessionStore, user_store: InMemoryUserStore, prompt_answer: bool) -> World {
    let store = Arc::new(store);
    let gateway = Arc::new(ScriptedGateway::default());
    let user_store = Arc::new(user_store);
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let prompt = Arc::new(RecordingPrompt::answering(prompt_answer));
    let engine = AuthTransitionEngine::new(
        Arc::clone(&store),
        gateway.clone(),
        user_store.clone(),
        notifier.clone(),
        navigator.clone(),
        prompt.clone(),
        EngineRoutes::default(),
    );
    World {
        store,
        gateway,
        user_store,
        notifier,
        navigator,
        prompt,
        engine,
    }
}

fn password() -> SecretString {
    SecretString::new("hunter2hunter2".to_string())
}

#[tokio::test]
async fn successful_login_lands_on_the_dashboard_with_a_mirrored_user() {
    let w = world();
    *w.gateway.login.lock().unwrap() = Some(Ok(LoginPayload { user: member() }));

    let outcome = w.engine.login("alice.burel@epsi.fr", &password(), true).await.unwrap();

    assert!(outcome.is_success());
    let session = w.store.snapshot();
    assert_eq!(session.user.as_ref().map(|u| u.id.as_str()), Some("1"));
    assert!(session.status.is_idle());
    assert_eq!(w.user_store.load().await, Some(member()));
    assert_eq!(
        w.navigator.routes.lock().unwrap().as_slice(),
        &[Route::dashboard()]
    );
}

#[tokio::test]
async fn login_honors_the_preferred_landing_route() {
    let user_store = InMemoryUserStore::new();
    user_store
        .set_preferred_route(&Route::new("/calendar"))
        .await
        .unwrap();
    let w = world_with(SessionStore::new(), user_store, true);
    *w.gateway.login.lock().unwrap() = Some(Ok(LoginPayload { user: member() }));

    w.engine.login("alice.burel@epsi.fr", &password(), false).await.unwrap();

    assert_eq!(
        w.navigator.routes.lock().unwrap().as_slice(),
        &[Route::new("/calendar")]
    );
}

#[tokio::test]
async fn failed_login_records_a_credential_failure_scoped_to_the_account() {
    let w = world_with(SessionStore::new(), InMemoryUserStore::new(), false);
    *w.gateway.login.lock().unwrap() = Some(Err(GatewayError::new("bad credentials")
        .with_status(401)
        .with_user_id(UserId::new("42").unwrap())));

    let outcome = w.engine.login("alice.burel@epsi.fr", &password(), false).await.unwrap();

    assert!(!outcome.is_success());
    let session = w.store.snapshot();
    assert!(session.user.is_none());
    let failure = session.status.failure().expect("session should be failed");
    assert_eq!(failure.class, FailureClass::Credential);
    assert_eq!(failure.reason(), Some("bad credentials"));
    assert_eq!(failure.subject_id, Some(UserId::new("42").unwrap()));

    // One danger notice, one reset offer, no navigation (the user declined).
    let notices = w.notifier.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Danger);
    assert_eq!(w.prompt.requests.lock().unwrap().len(), 1);
    assert!(w.navigator.routes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn accepted_reset_offer_navigates_to_the_password_reset_form() {
    let w = world();
    *w.gateway.login.lock().unwrap() = Some(Err(GatewayError::new("bad credentials")
        .with_status(401)
        .with_user_id(UserId::new("42").unwrap())));

    w.engine.login("alice.burel@epsi.fr", &password(), false).await.unwrap();

    assert_eq!(
        w.navigator.routes.lock().unwrap().as_slice(),
        &[Route::password_reset()]
    );
}

#[tokio::test]
async fn anonymous_login_failure_never_offers_a_reset() {
    let w = world();
    *w.gateway.login.lock().unwrap() =
        Some(Err(GatewayError::new("bad credentials").with_status(401)));

    w.engine.login("alice.burel@epsi.fr", &password(), false).await.unwrap();

    assert!(w.prompt.requests.lock().unwrap().is_empty());
    assert!(w.navigator.routes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn expired_verify_recovers_through_a_single_refresh() {
    let w = world_with(
        SessionStore::hydrated(Some(member())),
        InMemoryUserStore::new().with_user(member()),
        true,
    );
    *w.gateway.verify.lock().unwrap() =
        Some(Err(GatewayError::new("unauthorized").with_status(401)));
    *w.gateway.refresh.lock().unwrap() = Some(Ok(()));

    w.engine.verify().await.unwrap();

    assert_eq!(*w.gateway.refresh_calls.lock().unwrap(), 1);
    assert_eq!(*w.gateway.logout_calls.lock().unwrap(), 0);
    let session = w.store.snapshot();
    assert_eq!(session.user, Some(member()));
    assert!(session.status.is_idle());
    assert!(w.navigator.routes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_refresh_tears_the_session_down_exactly_once() {
    let w = world_with(
        SessionStore::hydrated(Some(member())),
        InMemoryUserStore::new().with_user(member()),
        true,
    );
    *w.gateway.verify.lock().unwrap() =
        Some(Err(GatewayError::new("unauthorized").with_status(401)));
    *w.gateway.refresh.lock().unwrap() =
        Some(Err(GatewayError::new("Your session has expired")));

    w.engine.verify().await.unwrap();

    assert_eq!(*w.gateway.refresh_calls.lock().unwrap(), 1);
    assert_eq!(*w.gateway.logout_calls.lock().unwrap(), 1);
    let session = w.store.snapshot();
    assert!(session.user.is_none());
    assert!(w.user_store.load().await.is_none());
    assert_eq!(
        w.navigator.routes.lock().unwrap().as_slice(),
        &[Route::login()]
    );
    let notices = w.notifier.notices.lock().unwrap();
    assert!(notices
        .iter()
        .any(|n| n.level == NoticeLevel::Danger && n.message == "Your session has expired."));
}

#[tokio::test]
async fn non_expired_verify_failure_does_not_refresh() {
    let w = world_with(
        SessionStore::hydrated(Some(member())),
        InMemoryUserStore::new().with_user(member()),
        true,
    );
    *w.gateway.verify.lock().unwrap() =
        Some(Err(GatewayError::new("server error").with_status(500)));

    w.engine.verify().await.unwrap();

    assert_eq!(*w.gateway.refresh_calls.lock().unwrap(), 0);
    assert_eq!(*w.gateway.logout_calls.lock().unwrap(), 0);
    assert_eq!(w.store.snapshot().user, Some(member()));
}

#[tokio::test]
async fn logout_is_idempotent() {
    let w = world_with(
        SessionStore::hydrated(Some(member())),
        InMemoryUserStore::new().with_user(member()),
        true,
    );

    w.engine.logout(None).await;
    w.engine.logout(None).await;

    assert!(w.store.snapshot().user.is_none());
    assert!(w.user_store.load().await.is_none());
    assert_eq!(
        w.navigator.routes.lock().unwrap().as_slice(),
        &[Route::login(), Route::login()]
    );
}

#[tokio::test]
async fn password_change_acknowledges_then_logs_out() {
    let w = world_with(
        SessionStore::hydrated(Some(member())),
        InMemoryUserStore::new().with_user(member()),
        true,
    );
    *w.gateway.change_password.lock().unwrap() = Some(Ok(()));

    let outcome = w.engine.change_password(&password(), &password()).await.unwrap();

    assert!(outcome.is_success());
    assert_eq!(w.prompt.requests.lock().unwrap().len(), 1);
    assert!(w.store.snapshot().user.is_none());
    assert_eq!(*w.gateway.logout_calls.lock().unwrap(), 1);
    assert_eq!(
        w.navigator.routes.lock().unwrap().as_slice(),
        &[Route::login()]
    );
}

#[tokio::test]
async fn information_mails_toggle_updates_the_live_user_and_the_mirror() {
    let w = world_with(
        SessionStore::hydrated(Some(member())),
        InMemoryUserStore::new().with_user(member()),
        true,
    );

    let outcome = w.engine.set_information_mails(true).await.unwrap();

    assert!(outcome.is_success());
    assert!(w
        .store
        .snapshot()
        .user
        .expect("user should stay logged in")
        .has_information_mails);
    assert!(w.user_store.load().await.unwrap().has_information_mails);
}

#[tokio::test]
async fn register_success_shows_both_notices_and_returns_to_login() {
    let w = world();

    let outcome = w
        .engine
        .register(RegisterRequest {
            firstname: "Alice".to_string(),
            lastname: "Burel".to_string(),
            grade: "B2 G1".to_string(),
            city: "Lyon".to_string(),
            email: "alice.burel@epsi.fr".to_string(),
            password: password(),
            password_confirmation: password(),
            agreed_to_terms: true,
        })
        .await
        .unwrap();

    assert!(outcome.is_success());
    let notices = w.notifier.notices.lock().unwrap();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(notices[1].level, NoticeLevel::Info);
    assert!(notices.iter().all(|n| n.timeout.is_some()));
    assert_eq!(
        w.navigator.routes.lock().unwrap().as_slice(),
        &[Route::login()]
    );
    assert!(w.store.snapshot().user.is_none());
}

#[tokio::test]
async fn session_survives_a_restart_through_the_file_mirror() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mirror = FileUserStore::new(dir.path());
        mirror.save(&member()).await.unwrap();
        mirror.patch(UserParameter::InformationMails(true)).await.unwrap();
    }

    // A fresh process hydrates the store from the mirror.
    let mirror = FileUserStore::new(dir.path());
    let restored = mirror.load().await;
    let store = SessionStore::hydrated(restored.clone());

    assert!(store.is_authenticated());
    assert!(restored.unwrap().has_information_mails);
}

#[tokio::test]
async fn corrupt_mirror_hydrates_an_anonymous_session() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("user.json"), b"{ not json").unwrap();

    let mirror = FileUserStore::new(dir.path());
    let store = SessionStore::hydrated(mirror.load().await);

    assert!(!store.is_authenticated());
}
