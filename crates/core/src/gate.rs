//! The privacy gate: reconciliation and persistence protocol.
//!
//! `PrivacyGate` owns the live flags, the preference store, and the HTTP
//! client, and drives the merge of local snapshot, remote status, and
//! in-process flags. Telemetry producers read the gate; only the reconciler
//! writes it.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error, warn};

use crate::client::PrivacyClient;
use crate::error::Result;
use crate::flags::{reconcile, LiveFlags};
use crate::identity::{user_agent, HostEnvironment, UserIdentity};
use crate::models::PrivacyStatus;
use crate::prefs::{load_status, save_status, PreferenceStore};

/// Process-wide privacy gate.
///
/// Flag mutation is serialized behind a single mutex so the per-flag
/// reconciliation semantics hold even on a multithreaded host; lock guards
/// are never held across an await.
pub struct PrivacyGate<E, P> {
    client: PrivacyClient,
    env: E,
    flags: Mutex<LiveFlags>,
    prefs: Mutex<P>,
}

impl<E, P> PrivacyGate<E, P>
where
    E: HostEnvironment,
    P: PreferenceStore,
{
    /// Create a gate over host-configured flags and a preference store.
    pub fn new(env: E, prefs: P, flags: LiveFlags) -> Self {
        Self {
            client: PrivacyClient::new(),
            env,
            flags: Mutex::new(flags),
            prefs: Mutex::new(prefs),
        }
    }

    /// Point the gate at a non-production service (for testing).
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.client = PrivacyClient::new().with_base_url(url);
        self
    }

    fn flags(&self) -> MutexGuard<'_, LiveFlags> {
        self.flags.lock().expect("flags mutex poisoned")
    }

    fn prefs(&self) -> MutexGuard<'_, P> {
        self.prefs.lock().expect("prefs mutex poisoned")
    }

    pub fn analytics_enabled(&self) -> bool {
        self.flags().analytics_enabled()
    }

    pub fn device_stats_enabled(&self) -> bool {
        self.flags().device_stats_enabled()
    }

    pub fn limit_user_tracking(&self) -> bool {
        self.flags().limit_user_tracking()
    }

    pub fn performance_reporting_enabled(&self) -> bool {
        self.flags().performance_reporting_enabled()
    }

    /// Snapshot of the currently effective gating flags.
    pub fn status(&self) -> PrivacyStatus {
        self.flags().snapshot()
    }

    /// Reconciles the locally cached snapshot into the live flags.
    ///
    /// This is the offline fast path; the app is gated correctly from the
    /// cache before (or without) any network round trip. Returns the loaded
    /// snapshot.
    fn apply_local_snapshot(&self) -> PrivacyStatus {
        let local = load_status(&*self.prefs());
        reconcile(&mut *self.flags(), &local);
        local
    }

    fn gather_identity(&self) -> UserIdentity {
        let identity = UserIdentity::gather(&self.env);

        // Missing ids are diagnostics only; the request still goes out.
        if identity.appid.is_empty() {
            error!("no app id configured; link the project to an app id");
        }
        if identity.userid.is_empty() {
            error!("no user id available");
        }
        if identity.deviceid.is_empty() {
            error!("no device id available");
        }

        identity
    }

    /// Fetches the remote opt-out status and reconciles it into the live
    /// flags, returning the effective `optOut` value.
    ///
    /// The local snapshot is applied first, so even a failed fetch leaves the
    /// app gated by last-known-good state; on failure the locally loaded
    /// `optOut` is returned and the store is left untouched. On success the
    /// remote snapshot is reconciled and persisted, and its `optOut` is
    /// returned. One round trip, no retry; concurrent calls run independently.
    pub async fn fetch_opt_out_status(&self) -> bool {
        let local = self.apply_local_snapshot();
        let identity = self.gather_identity();
        let agent = user_agent(&self.env);

        match self.client.get_opt_out_status(&identity, &agent).await {
            Ok(remote) => {
                reconcile(&mut *self.flags(), &remote);
                save_status(&mut *self.prefs(), &remote);
                remote.opt_out
            }
            Err(err) => {
                warn!(
                    url = %self.client.opt_out_url(),
                    error = %err,
                    "failed to load opt-out status, keeping local state"
                );
                local.opt_out
            }
        }
    }

    /// Fetches the privacy dashboard URL for this user/device.
    ///
    /// A response missing the `url` field yields `Ok("")`; every failure,
    /// parse failures included, yields exactly one `Err`.
    pub async fn fetch_privacy_url(&self) -> Result<String> {
        let identity = self.gather_identity();
        let agent = user_agent(&self.env);

        let token = self.client.post_token(&identity, &agent).await?;
        Ok(token.url)
    }
}

impl<E, P> PrivacyGate<E, P>
where
    E: HostEnvironment + Send + Sync + 'static,
    P: PreferenceStore + Send + 'static,
{
    /// Process-start hook: if any telemetry category is enabled, kick off the
    /// opt-out fetch in the background and discard its result.
    ///
    /// Fire-and-forget: the spawned fetch is never cancelled, never awaited,
    /// and carries no timeout beyond the transport default.
    pub fn bootstrap(self: &Arc<Self>) {
        if !self.flags().any_telemetry_enabled() {
            debug!("all telemetry categories disabled, skipping opt-out fetch");
            return;
        }

        let gate = Arc::clone(self);
        tokio::spawn(async move {
            gate.fetch_opt_out_status().await;
        });
    }
}
