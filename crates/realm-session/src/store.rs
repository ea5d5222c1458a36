//! Session Store
//!
//! Owns the login session record and every timer attached to it. Timers run
//! as tokio tasks holding a weak handle back to the store; each arming bumps
//! a generation counter so a timer from a superseded deadline never acts.

use parking_lot::{Mutex, RwLock};
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use realm_storage::{keys, BrowserStorage};

use crate::activity::ActivityKind;
use crate::clock::{Clock, SystemClock};
use crate::credentials;
use crate::error::SessionError;
use crate::navigator::{Navigator, Surface};
use crate::notice::{Notice, Notifier, Severity};
use crate::session::Session;
use crate::state::SessionState;
use crate::timings::{as_ms, SessionTimings};
use crate::Result;

const LOGOUT_MESSAGE: &str = "You have been logged out successfully. All data has been cleared.";
const EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

const LOGOUT_NOTICE_DURATION: Duration = Duration::from_secs(3);
const EXPIRED_NOTICE_DURATION: Duration = Duration::from_secs(5);
const WARNING_NOTICE_DURATION: Duration = Duration::from_secs(60);

#[derive(Default)]
struct Timers {
    /// Bumped on every cancel; timers armed under an older value do nothing
    generation: u64,
    /// Bumped when the session ends (logout or shutdown); an extension
    /// started under an older value must not write
    epoch: u64,
    warning: Option<JoinHandle<()>>,
    expiry: Option<JoinHandle<()>>,
    validator: Option<JoinHandle<()>>,
    activity: Option<JoinHandle<()>>,
}

impl Timers {
    fn cancel_monitoring(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        for handle in [self.warning.take(), self.expiry.take(), self.validator.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
        }
    }

    fn cancel_all(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.cancel_monitoring();
        if let Some(handle) = self.activity.take() {
            handle.abort();
        }
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// Which timers are currently waiting to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingTimers {
    pub warning: bool,
    pub expiry: bool,
    pub validator: bool,
    pub activity: bool,
}

fn is_pending(handle: &Option<JoinHandle<()>>) -> bool {
    handle.as_ref().is_some_and(|h| !h.is_finished())
}

fn spawn<F>(future: F) -> Option<JoinHandle<()>>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::runtime::Handle::try_current()
        .ok()
        .map(|handle| handle.spawn(future))
}

fn delay_from_ms(ms: i64) -> Duration {
    Duration::from_millis(u64::try_from(ms).unwrap_or(0))
}

struct Inner {
    storage: BrowserStorage,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    timings: SessionTimings,
    state: RwLock<SessionState>,
    timers: Mutex<Timers>,
}

pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    pub fn new(
        storage: BrowserStorage,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self::with_options(
            storage,
            notifier,
            navigator,
            SessionTimings::default(),
            Arc::new(SystemClock),
        )
    }

    pub fn with_options(
        storage: BrowserStorage,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        timings: SessionTimings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                storage,
                notifier,
                navigator,
                clock,
                timings,
                state: RwLock::new(SessionState::LoggedOut),
                timers: Mutex::new(Timers::default()),
            }),
        }
    }

    fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn now(&self) -> i64 {
        self.inner.clock.now_ms()
    }

    pub fn timings(&self) -> &SessionTimings {
        &self.inner.timings
    }

    pub fn storage(&self) -> &BrowserStorage {
        &self.inner.storage
    }

    pub fn state(&self) -> SessionState {
        *self.inner.state.read()
    }

    fn transition(&self, target: SessionState) -> Result<()> {
        let mut state = self.inner.state.write();
        if !state.can_transition_to(target) {
            return Err(SessionError::InvalidTransition {
                from: state.to_string(),
                to: target.to_string(),
            });
        }

        if *state != target {
            tracing::debug!(from = %*state, to = %target, "Session state transition");
        }
        *state = target;
        Ok(())
    }

    /// Check the fixed credential pair and open a session.
    pub fn login(&self, username: &str, password: &str) -> bool {
        if !credentials::verify(username, password) {
            tracing::info!(username = %username, "Login rejected");
            return false;
        }

        if !self.state().can_transition_to(SessionState::LoggedIn) {
            tracing::warn!(state = %self.state(), "Login refused while session is expiring");
            return false;
        }

        let session = Session::new(
            username.to_string(),
            self.now(),
            as_ms(self.inner.timings.duration),
        );

        if let Err(e) = self.persist_login(&session) {
            tracing::error!(error = %e, "Failed to persist session");
            return false;
        }

        if let Err(e) = self.transition(SessionState::LoggedIn) {
            tracing::warn!(error = %e, "Login state change rejected");
        }

        tracing::info!(
            username = %session.username,
            expiry_time = session.expiry_time,
            "Logged in"
        );

        self.arm_monitoring();
        true
    }

    fn persist_login(&self, session: &Session) -> Result<()> {
        self.write_session(session)?;
        let area = self.inner.storage.session();
        area.set(keys::IS_LOGGED_IN, "true")?;
        area.set(keys::USERNAME, &session.username)?;
        Ok(())
    }

    fn write_session(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(session)?;
        self.inner.storage.session().set(keys::SESSION_DATA, &json)?;
        Ok(())
    }

    /// Current session record. Unreadable or corrupt records count as absent.
    pub fn session(&self) -> Option<Session> {
        let raw = match self.inner.storage.session().get(keys::SESSION_DATA) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session record");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding corrupt session record");
                None
            }
        }
    }

    /// Pure read: never logs out and never touches timers.
    pub fn is_logged_in(&self) -> bool {
        match self.inner.storage.session().get(keys::IS_LOGGED_IN) {
            Ok(Some(flag)) if flag == "true" => {}
            Ok(_) => return false,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read login flag");
                return false;
            }
        }

        let now = self.now();
        self.session().is_some_and(|s| s.is_valid_at(now))
    }

    pub fn username(&self) -> Option<String> {
        self.session().map(|s| s.username)
    }

    pub fn remaining_minutes(&self) -> i64 {
        let now = self.now();
        self.session().map_or(0, |s| s.remaining_minutes(now))
    }

    /// Validate the session. With side effects allowed, a missing or expired
    /// session forces a logout; `prevent_side_effects` only reports, which
    /// keeps the login surface from redirecting to itself.
    pub fn check_session(&self, prevent_side_effects: bool) -> bool {
        let Some(session) = self.session().filter(|s| s.is_active) else {
            if !prevent_side_effects {
                tracing::info!("No active session, logging out");
                self.logout();
            }
            return false;
        };

        if self.now() >= session.expiry_time {
            if !prevent_side_effects {
                self.expire();
            }
            return false;
        }

        true
    }

    /// Push the deadline a full session duration out and rearm the timers.
    /// Expired sessions are not revived.
    pub fn extend_session(&self) -> bool {
        let epoch = self.inner.timers.lock().epoch;
        self.extend_within(epoch)
    }

    /// Extend only if the session has not ended since `epoch` was taken.
    /// The write happens under the timer lock, so a concurrent logout either
    /// lands first and stales the epoch or clears the rewritten record after.
    fn extend_within(&self, epoch: u64) -> bool {
        let now = self.now();
        let Some(session) = self.session().filter(|s| s.is_valid_at(now)) else {
            return false;
        };

        let extended = session.extended(now, as_ms(self.inner.timings.duration));
        {
            let timers = self.inner.timers.lock();
            if timers.epoch != epoch {
                tracing::debug!("Session ended during extension");
                return false;
            }

            if let Err(e) = self.write_session(&extended) {
                tracing::warn!(error = %e, "Failed to extend session");
                return false;
            }

            if let Err(e) = self.transition(SessionState::LoggedIn) {
                tracing::debug!(error = %e, "Extension left session state unchanged");
            }
        }

        tracing::debug!(expiry_time = extended.expiry_time, "Session extended");

        self.arm_monitoring();
        true
    }

    /// Feed a user activity signal. Signals of every kind share one
    /// trailing debounce window; the session is extended once it goes quiet.
    pub fn record_activity(&self, kind: ActivityKind) {
        let weak = Arc::downgrade(&self.inner);
        let debounce = self.inner.timings.activity_debounce;

        let mut timers = self.inner.timers.lock();
        if let Some(handle) = timers.activity.take() {
            handle.abort();
        }
        let epoch = timers.epoch;

        timers.activity = spawn(async move {
            tokio::time::sleep(debounce).await;
            if let Some(store) = SessionStore::upgrade(&weak) {
                if store.session().is_some() {
                    tracing::trace!(kind = %kind, "Activity settled");
                    store.extend_within(epoch);
                }
            }
        });
    }

    /// Cancel every timer, wipe all storage, tell the user, and send them to
    /// the login surface shortly after. Safe to call repeatedly.
    pub fn logout(&self) {
        {
            let mut timers = self.inner.timers.lock();
            timers.cancel_all();

            if !self.inner.storage.clear_all() {
                tracing::warn!("Storage cleanup incomplete during logout");
            }

            if let Err(e) = self.transition(SessionState::LoggedOut) {
                tracing::warn!(error = %e, "Logout state change rejected");
            }
        }

        tracing::info!("Logged out");

        self.inner.notifier.notify(Notice::new(
            LOGOUT_MESSAGE,
            Severity::Success,
            LOGOUT_NOTICE_DURATION,
        ));

        let navigator = Arc::clone(&self.inner.navigator);
        let delay = self.inner.timings.logout_redirect_delay;
        let scheduled = spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.redirect(Surface::Login);
        });

        if scheduled.is_none() {
            self.inner.navigator.redirect(Surface::Login);
        }
    }

    /// Re-adopt a session persisted by an earlier shell instance. Logs out
    /// when there is nothing valid to adopt.
    pub fn resume(&self) -> bool {
        if !self.check_session(false) {
            return false;
        }

        if let Err(e) = self.transition(SessionState::LoggedIn) {
            tracing::warn!(error = %e, "Resume state change rejected");
        }

        self.arm_monitoring();
        true
    }

    /// Stop every timer without touching storage.
    pub fn shutdown(&self) {
        self.inner.timers.lock().cancel_all();
        tracing::debug!("Session timers stopped");
    }

    pub fn pending_timers(&self) -> PendingTimers {
        let timers = self.inner.timers.lock();
        PendingTimers {
            warning: is_pending(&timers.warning),
            expiry: is_pending(&timers.expiry),
            validator: is_pending(&timers.validator),
            activity: is_pending(&timers.activity),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.timers.lock().generation == generation
    }

    fn arm_monitoring(&self) {
        let epoch = self.inner.timers.lock().epoch;
        let Some(session) = self.session() else {
            self.inner.timers.lock().cancel_monitoring();
            return;
        };

        let until_expiry = session.expiry_time.saturating_sub(self.now());
        let until_warning = until_expiry.saturating_sub(as_ms(self.inner.timings.warning));

        {
            let mut timers = self.inner.timers.lock();
            // Logged out since the record was read
            if timers.epoch != epoch {
                return;
            }
            timers.cancel_monitoring();
            let generation = timers.generation;

            if until_warning > 0 {
                timers.warning =
                    self.spawn_after(delay_from_ms(until_warning), generation, |store, generation| {
                        if store.is_current(generation) {
                            store.show_warning();
                        }
                    });
            }

            timers.expiry =
                self.spawn_after(delay_from_ms(until_expiry), generation, |store, generation| {
                    if store.is_current(generation) {
                        store.expire();
                    }
                });

            timers.validator = self.spawn_validator(generation);

            if timers.expiry.is_none() {
                tracing::warn!("No async runtime, session timers not armed");
            }
        }

        // Already inside the warning window
        if until_warning <= 0 && until_expiry > 0 {
            self.show_warning();
        }
    }

    fn spawn_after<F>(&self, delay: Duration, generation: u64, fire: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(&SessionStore, u64) + Send + 'static,
    {
        let weak = Arc::downgrade(&self.inner);
        spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(store) = SessionStore::upgrade(&weak) {
                fire(&store, generation);
            }
        })
    }

    fn spawn_validator(&self, generation: u64) -> Option<JoinHandle<()>> {
        let weak = Arc::downgrade(&self.inner);
        let period = self
            .inner
            .timings
            .check_interval
            .max(Duration::from_millis(1));

        spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let Some(store) = SessionStore::upgrade(&weak) else {
                    break;
                };
                if !store.is_current(generation) || !store.check_session(false) {
                    break;
                }
            }
        })
    }

    fn show_warning(&self) {
        let remaining = self.remaining_minutes();
        self.inner.notifier.notify(Notice::new(
            format!(
                "Your session will expire in {remaining} minutes. Click anywhere to extend your session."
            ),
            Severity::Warning,
            WARNING_NOTICE_DURATION,
        ));

        if let Err(e) = self.transition(SessionState::Warning) {
            tracing::debug!(error = %e, "Warning shown outside a tracked session");
        }
    }

    fn expire(&self) {
        tracing::info!("Session expired");

        self.inner.notifier.notify(Notice::new(
            EXPIRED_MESSAGE,
            Severity::Error,
            EXPIRED_NOTICE_DURATION,
        ));

        if let Err(e) = self.transition(SessionState::Expired) {
            tracing::debug!(error = %e, "Expiry outside a tracked session");
        }

        self.logout();
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MonotonicClock;
    use realm_storage::{MemoryStorage, StorageArea};
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    const MINUTE: Duration = Duration::from_secs(60);
    const SECOND: Duration = Duration::from_secs(1);

    #[derive(Default)]
    struct RecordingNotifier {
        notices: Mutex<Vec<Notice>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.notices.lock().push(notice);
        }
    }

    impl RecordingNotifier {
        fn count(&self, severity: Severity) -> usize {
            self.notices
                .lock()
                .iter()
                .filter(|n| n.severity == severity)
                .count()
        }

        fn last(&self) -> Option<Notice> {
            self.notices.lock().last().cloned()
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        redirects: Mutex<Vec<Surface>>,
    }

    impl Navigator for RecordingNavigator {
        fn redirect(&self, surface: Surface) {
            self.redirects.lock().push(surface);
        }
    }

    /// Session area that counts writes of the session record
    #[derive(Default)]
    struct CountingArea {
        inner: MemoryStorage,
        session_writes: AtomicUsize,
    }

    impl CountingArea {
        fn session_writes(&self) -> usize {
            self.session_writes.load(Ordering::SeqCst)
        }
    }

    impl StorageArea for CountingArea {
        fn get(&self, key: &str) -> realm_storage::Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> realm_storage::Result<()> {
            if key == keys::SESSION_DATA {
                self.session_writes.fetch_add(1, Ordering::SeqCst);
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> realm_storage::Result<()> {
            self.inner.remove(key)
        }

        fn clear(&self) -> realm_storage::Result<()> {
            self.inner.clear()
        }

        fn keys(&self) -> realm_storage::Result<Vec<String>> {
            self.inner.keys()
        }
    }

    struct Harness {
        store: SessionStore,
        storage: BrowserStorage,
        session_area: Arc<CountingArea>,
        notices: Arc<RecordingNotifier>,
        navigator: Arc<RecordingNavigator>,
    }

    fn harness() -> Harness {
        let session_area = Arc::new(CountingArea::default());
        let storage = BrowserStorage::new(session_area.clone(), Arc::new(MemoryStorage::new()));
        let notices = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());

        let store = SessionStore::with_options(
            storage.clone(),
            notices.clone(),
            navigator.clone(),
            SessionTimings::default(),
            Arc::new(MonotonicClock::new()),
        );

        Harness {
            store,
            storage,
            session_area,
            notices,
            navigator,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_rejects_bad_credentials() {
        let h = harness();

        assert!(!h.store.login("admin", "wrong"));
        assert!(!h.store.login("root", "admin"));

        assert!(!h.store.is_logged_in());
        assert_eq!(h.store.state(), SessionState::LoggedOut);
        assert!(h.storage.all_keys().unwrap().is_empty());
        assert_eq!(h.store.pending_timers(), PendingTimers::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_persists_session_and_arms_timers() {
        let h = harness();

        assert!(h.store.login("admin", "admin"));

        assert!(h.store.is_logged_in());
        assert_eq!(h.store.state(), SessionState::LoggedIn);
        assert_eq!(h.store.username().as_deref(), Some("admin"));
        assert_eq!(h.store.remaining_minutes(), 30);

        let session = h.store.session().unwrap();
        assert!(session.is_active);
        assert_eq!(session.expiry_time - session.login_time, 30 * 60 * 1000);

        let keys = h.storage.all_keys().unwrap();
        assert_eq!(keys.session, vec!["isLoggedIn", "sessionData", "username"]);

        let pending = h.store.pending_timers();
        assert!(pending.warning);
        assert!(pending.expiry);
        assert!(pending.validator);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_expires_without_activity() {
        let h = harness();
        h.store.login("admin", "admin");

        tokio::time::sleep(30 * MINUTE - SECOND).await;
        assert!(h.store.is_logged_in());
        assert_eq!(h.notices.count(Severity::Error), 0);

        tokio::time::sleep(2 * SECOND).await;

        assert!(!h.store.is_logged_in());
        assert_eq!(h.store.state(), SessionState::LoggedOut);
        assert!(h.storage.all_keys().unwrap().is_empty());
        assert_eq!(h.notices.count(Severity::Error), 1);
        assert_eq!(h.notices.count(Severity::Success), 1);
        assert_eq!(*h.navigator.redirects.lock(), vec![Surface::Login]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_warning_fires_before_expiry() {
        let h = harness();
        h.store.login("admin", "admin");

        tokio::time::sleep(25 * MINUTE - SECOND).await;
        assert_eq!(h.notices.count(Severity::Warning), 0);
        assert_eq!(h.store.state(), SessionState::LoggedIn);

        tokio::time::sleep(2 * SECOND).await;

        assert_eq!(h.notices.count(Severity::Warning), 1);
        assert_eq!(h.store.state(), SessionState::Warning);
        assert!(h.store.is_logged_in());

        let warning = h.notices.last().unwrap();
        assert!(warning.message.contains("5 minutes"));
        assert_eq!(warning.duration, Duration::from_secs(60));
        assert_eq!(warning.title(), "Session Warning");
    }

    #[tokio::test(start_paused = true)]
    async fn test_extension_reschedules_warning_and_expiry() {
        let h = harness();
        h.store.login("admin", "admin");

        tokio::time::sleep(24 * MINUTE).await;
        let before = h.store.session().unwrap().expiry_time;
        assert!(h.store.extend_session());
        assert!(h.store.session().unwrap().expiry_time > before);

        // Past both of the first deadlines
        tokio::time::sleep(7 * MINUTE).await;
        assert_eq!(h.notices.count(Severity::Warning), 0);
        assert_eq!(h.notices.count(Severity::Error), 0);
        assert!(h.store.is_logged_in());

        // New warning lands 25 minutes after the extension
        tokio::time::sleep(18 * MINUTE + SECOND).await;
        assert_eq!(h.notices.count(Severity::Warning), 1);
        assert!(h.store.is_logged_in());
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_in_warning_window_returns_to_logged_in() {
        let h = harness();
        h.store.login("admin", "admin");

        tokio::time::sleep(26 * MINUTE).await;
        assert_eq!(h.store.state(), SessionState::Warning);

        h.store.record_activity(ActivityKind::Pointer);
        tokio::time::sleep(2 * SECOND).await;

        assert_eq!(h.store.state(), SessionState::LoggedIn);
        assert_eq!(h.store.remaining_minutes(), 29);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extend_strictly_increases_expiry() {
        let h = harness();
        h.store.login("admin", "admin");

        let first = h.store.session().unwrap().expiry_time;
        assert!(h.store.extend_session());
        let second = h.store.session().unwrap().expiry_time;
        assert!(h.store.extend_session());
        let third = h.store.session().unwrap().expiry_time;

        assert!(second > first);
        assert!(third > second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extend_without_session_is_noop() {
        let h = harness();

        assert!(!h.store.extend_session());
        assert!(h.storage.all_keys().unwrap().is_empty());
        assert_eq!(h.store.pending_timers(), PendingTimers::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_twice_leaves_storage_empty() {
        let h = harness();
        h.store.login("admin", "admin");
        h.storage.durable().set(keys::REMEMBER_ME, "true").unwrap();

        h.store.logout();
        assert!(h.storage.all_keys().unwrap().is_empty());

        h.store.logout();
        assert!(h.storage.all_keys().unwrap().is_empty());
        assert_eq!(h.store.state(), SessionState::LoggedOut);
        assert!(!h.store.is_logged_in());

        // Redirect waits for the notice
        assert!(h.navigator.redirects.lock().is_empty());
        tokio::time::sleep(SECOND).await;
        assert_eq!(
            *h.navigator.redirects.lock(),
            vec![Surface::Login, Surface::Login]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_cancels_timers() {
        let h = harness();
        h.store.login("admin", "admin");
        h.store.record_activity(ActivityKind::Keyboard);

        h.store.logout();
        assert_eq!(h.store.pending_timers(), PendingTimers::default());

        tokio::time::sleep(31 * MINUTE).await;

        assert_eq!(h.notices.count(Severity::Warning), 0);
        assert_eq!(h.notices.count(Severity::Error), 0);
        assert_eq!(h.notices.count(Severity::Success), 1);
        assert_eq!(h.navigator.redirects.lock().len(), 1);
        assert!(h.storage.all_keys().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_bursts_are_coalesced() {
        let h = harness();
        h.store.login("admin", "admin");

        tokio::time::sleep(10 * MINUTE).await;
        let writes_before = h.session_area.session_writes();
        let expiry_before = h.store.session().unwrap().expiry_time;

        for kind in [
            ActivityKind::Pointer,
            ActivityKind::Keyboard,
            ActivityKind::Scroll,
            ActivityKind::Touch,
            ActivityKind::Pointer,
        ] {
            h.store.record_activity(kind);
            tokio::time::sleep(Duration::from_millis(200)).await;
        }

        // Still inside the quiet window of the last signal
        assert_eq!(h.session_area.session_writes(), writes_before);
        assert!(h.store.pending_timers().activity);

        tokio::time::sleep(SECOND).await;

        assert_eq!(h.session_area.session_writes(), writes_before + 1);
        assert!(h.store.session().unwrap().expiry_time > expiry_before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_corrupt_record_fails_closed() {
        let h = harness();
        let area = h.storage.session();
        area.set(keys::SESSION_DATA, "{not json").unwrap();
        area.set(keys::IS_LOGGED_IN, "true").unwrap();

        assert!(h.store.session().is_none());
        assert!(!h.store.is_logged_in());

        // Report only: nothing is cleared, nobody is redirected
        assert!(!h.store.check_session(true));
        assert_eq!(h.storage.all_keys().unwrap().session.len(), 2);
        tokio::time::sleep(SECOND).await;
        assert!(h.navigator.redirects.lock().is_empty());

        assert!(!h.store.check_session(false));
        assert!(h.storage.all_keys().unwrap().is_empty());
        tokio::time::sleep(SECOND).await;
        assert_eq!(*h.navigator.redirects.lock(), vec![Surface::Login]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_record_without_flag_is_not_logged_in() {
        let h = harness();
        h.store.login("admin", "admin");
        h.storage.session().remove(keys::IS_LOGGED_IN).unwrap();

        assert!(h.store.session().is_some());
        assert!(!h.store.is_logged_in());
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_session_on_expired_record() {
        let h = harness();
        h.store.login("admin", "admin");
        h.store.shutdown();

        tokio::time::sleep(31 * MINUTE).await;
        assert_eq!(h.notices.count(Severity::Error), 0);

        assert!(!h.store.check_session(true));
        assert!(!h.storage.all_keys().unwrap().session.is_empty());

        assert!(!h.store.check_session(false));
        assert_eq!(h.notices.count(Severity::Error), 1);
        assert!(h.storage.all_keys().unwrap().is_empty());
        assert_eq!(h.store.state(), SessionState::LoggedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_adopts_persisted_session() {
        let h = harness();
        h.store.login("admin", "admin");
        h.store.shutdown();

        // A fresh shell over the same storage
        let reloaded = SessionStore::with_options(
            h.storage.clone(),
            h.notices.clone(),
            h.navigator.clone(),
            SessionTimings::default(),
            Arc::new(MonotonicClock::new()),
        );
        assert_eq!(reloaded.state(), SessionState::LoggedOut);

        assert!(reloaded.resume());
        assert_eq!(reloaded.state(), SessionState::LoggedIn);
        assert!(reloaded.pending_timers().expiry);
        assert!(reloaded.is_logged_in());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_without_session_logs_out() {
        let h = harness();

        assert!(!h.store.resume());

        tokio::time::sleep(SECOND).await;
        assert_eq!(*h.navigator.redirects.lock(), vec![Surface::Login]);
    }

    /// Session area that logs the store out right after the Nth read of the
    /// session record, as another worker would between read and write.
    #[derive(Default)]
    struct LogoutAfterRead {
        inner: MemoryStorage,
        store: Mutex<Option<SessionStore>>,
        reads_until_logout: AtomicUsize,
    }

    impl StorageArea for LogoutAfterRead {
        fn get(&self, key: &str) -> realm_storage::Result<Option<String>> {
            let value = self.inner.get(key)?;
            if key == keys::SESSION_DATA {
                let left = self
                    .reads_until_logout
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                    .unwrap_or(0);
                if left == 1 {
                    let store = self.store.lock().clone();
                    if let Some(store) = store {
                        store.logout();
                    }
                }
            }
            Ok(value)
        }

        fn set(&self, key: &str, value: &str) -> realm_storage::Result<()> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> realm_storage::Result<()> {
            self.inner.remove(key)
        }

        fn clear(&self) -> realm_storage::Result<()> {
            self.inner.clear()
        }

        fn keys(&self) -> realm_storage::Result<Vec<String>> {
            self.inner.keys()
        }
    }

    fn racing_store() -> (SessionStore, BrowserStorage, Arc<LogoutAfterRead>) {
        let area = Arc::new(LogoutAfterRead::default());
        let storage = BrowserStorage::new(area.clone(), Arc::new(MemoryStorage::new()));
        let store = SessionStore::with_options(
            storage.clone(),
            Arc::new(RecordingNotifier::default()),
            Arc::new(RecordingNavigator::default()),
            SessionTimings::default(),
            Arc::new(MonotonicClock::new()),
        );
        *area.store.lock() = Some(store.clone());
        (store, storage, area)
    }

    fn assert_fully_logged_out(store: &SessionStore, storage: &BrowserStorage) {
        assert!(storage.all_keys().unwrap().is_empty());
        assert_eq!(store.state(), SessionState::LoggedOut);
        assert!(!store.check_session(true));
        assert!(!store.is_logged_in());
        assert_eq!(store.pending_timers(), PendingTimers::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_during_extension_is_not_undone() {
        let (store, storage, area) = racing_store();
        assert!(store.login("admin", "admin"));

        area.reads_until_logout.store(1, Ordering::SeqCst);
        assert!(!store.extend_session());

        assert_fully_logged_out(&store, &storage);
        area.store.lock().take();
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_during_debounced_extension_is_not_undone() {
        let (store, storage, area) = racing_store();
        assert!(store.login("admin", "admin"));

        store.record_activity(ActivityKind::Pointer);
        // First read is the settle check, second is inside the extension
        area.reads_until_logout.store(2, Ordering::SeqCst);
        tokio::time::sleep(2 * SECOND).await;

        assert_fully_logged_out(&store, &storage);

        tokio::time::sleep(30 * MINUTE).await;
        assert!(storage.all_keys().unwrap().is_empty());
        area.store.lock().take();
    }

    /// Monotonic clock that can jump ahead without moving tokio time,
    /// like a host that slept through a deadline.
    struct SkewClock {
        base: MonotonicClock,
        skew_ms: AtomicI64,
    }

    impl Clock for SkewClock {
        fn now_ms(&self) -> i64 {
            self.base.now_ms() + self.skew_ms.load(Ordering::SeqCst)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_validator_catches_missed_expiry() {
        let clock = Arc::new(SkewClock {
            base: MonotonicClock::new(),
            skew_ms: AtomicI64::new(0),
        });
        let storage = BrowserStorage::in_memory();
        let notices = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let store = SessionStore::with_options(
            storage.clone(),
            notices.clone(),
            navigator.clone(),
            SessionTimings::default(),
            clock.clone(),
        );

        assert!(store.login("admin", "admin"));
        clock.skew_ms.store(31 * 60 * 1000, Ordering::SeqCst);

        // Exact timers are still 25+ minutes out in tokio time
        tokio::time::sleep(61 * SECOND).await;

        assert_eq!(notices.count(Severity::Error), 1);
        assert_eq!(notices.count(Severity::Warning), 0);
        assert!(storage.all_keys().unwrap().is_empty());
        assert_eq!(store.state(), SessionState::LoggedOut);
        assert_eq!(*navigator.redirects.lock(), vec![Surface::Login]);
        assert_eq!(store.pending_timers(), PendingTimers::default());
    }
}
