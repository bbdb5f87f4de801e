//! optgate core — telemetry opt-out gating.
//!
//! Decides whether a running application may collect telemetry by merging
//! three sources of truth: developer-set in-process flags, a locally cached
//! snapshot, and the remote opt-out service. The merge is restrictive-wins:
//! no reconciliation ever grants more permission than either input, so a
//! flag disabled in code stays disabled whatever the server says.

pub mod client;
pub mod error;
pub mod flags;
pub mod gate;
pub mod identity;
pub mod models;
pub mod prefs;

pub use client::{PrivacyClient, DEFAULT_BASE_URL};
pub use error::{PrivacyError, Result};
pub use flags::{reconcile, Flag, FlagBackend, FlagError, LiveFlags};
pub use gate::PrivacyGate;
pub use identity::{user_agent, HostEnvironment, StaticEnvironment, UserIdentity};
pub use models::{OptOutResponse, PrivacyStatus, TokenData};
pub use prefs::{load_status, save_status, JsonFilePrefs, MemoryPrefs, PreferenceStore};
