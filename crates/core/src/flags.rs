//! Live gating flags and the restrictive-wins reconciler.
//!
//! `LiveFlags` is the one piece of mutable state in this crate: the switches
//! telemetry producers consult at event-send time. All mutation funnels
//! through [`reconcile`], which only ever tightens permissions.

use std::fmt;

use thiserror::Error;
use tracing::error;

use crate::models::PrivacyStatus;

/// The four gating flags managed by the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Analytics,
    DeviceStats,
    LimitUserTracking,
    PerformanceReporting,
}

/// Reconciliation order. One entry per flag; each is applied independently.
pub const ALL_FLAGS: [Flag; 4] = [
    Flag::Analytics,
    Flag::DeviceStats,
    Flag::LimitUserTracking,
    Flag::PerformanceReporting,
];

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Flag::Analytics => "analytics",
            Flag::DeviceStats => "device_stats",
            Flag::LimitUserTracking => "limit_user_tracking",
            Flag::PerformanceReporting => "performance_reporting",
        };
        f.write_str(name)
    }
}

/// Failure to read or write a single live flag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    #[error("flag {0} is not supported by this host build")]
    Unsupported(Flag),

    #[error("flag backend error: {0}")]
    Backend(String),
}

/// Access to the host's live gating flags.
///
/// The default backend is [`LiveFlags`]; hosts that surface their own flag
/// storage (or that compile features out) implement this instead. Either
/// operation may fail per flag without affecting the others.
pub trait FlagBackend {
    fn get(&self, flag: Flag) -> Result<bool, FlagError>;
    fn set(&mut self, flag: Flag, value: bool) -> Result<(), FlagError>;
}

/// In-process gating flags.
///
/// `performance_reporting_enabled` is `None` when the host build does not
/// include performance reporting; get/set on that flag then fail and the
/// reconciler skips it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveFlags {
    analytics_enabled: bool,
    device_stats_enabled: bool,
    limit_user_tracking: bool,
    performance_reporting_enabled: Option<bool>,
}

impl LiveFlags {
    /// Flags as configured by the host at process start.
    pub fn new(
        analytics_enabled: bool,
        device_stats_enabled: bool,
        limit_user_tracking: bool,
        performance_reporting_enabled: Option<bool>,
    ) -> Self {
        Self {
            analytics_enabled,
            device_stats_enabled,
            limit_user_tracking,
            performance_reporting_enabled,
        }
    }

    pub fn analytics_enabled(&self) -> bool {
        self.analytics_enabled
    }

    pub fn device_stats_enabled(&self) -> bool {
        self.device_stats_enabled
    }

    pub fn limit_user_tracking(&self) -> bool {
        self.limit_user_tracking
    }

    /// `false` when disabled or when the feature is absent from this build.
    pub fn performance_reporting_enabled(&self) -> bool {
        self.performance_reporting_enabled.unwrap_or(false)
    }

    /// True when at least one telemetry category is currently allowed.
    pub fn any_telemetry_enabled(&self) -> bool {
        self.analytics_enabled || self.device_stats_enabled || self.performance_reporting_enabled()
    }

    /// Point-in-time copy of the gating flags.
    ///
    /// `opt_out` is not tracked on live flags and is reported as `false`.
    pub fn snapshot(&self) -> PrivacyStatus {
        PrivacyStatus {
            opt_out: false,
            analytics_enabled: self.analytics_enabled,
            device_stats_enabled: self.device_stats_enabled,
            limit_user_tracking: self.limit_user_tracking,
            performance_reporting_enabled: self.performance_reporting_enabled(),
        }
    }
}

impl Default for LiveFlags {
    /// Everything permitted, tracking not limited, performance reporting present.
    fn default() -> Self {
        Self::new(true, true, false, Some(true))
    }
}

impl FlagBackend for LiveFlags {
    fn get(&self, flag: Flag) -> Result<bool, FlagError> {
        match flag {
            Flag::Analytics => Ok(self.analytics_enabled),
            Flag::DeviceStats => Ok(self.device_stats_enabled),
            Flag::LimitUserTracking => Ok(self.limit_user_tracking),
            Flag::PerformanceReporting => self
                .performance_reporting_enabled
                .ok_or(FlagError::Unsupported(Flag::PerformanceReporting)),
        }
    }

    fn set(&mut self, flag: Flag, value: bool) -> Result<(), FlagError> {
        match flag {
            Flag::Analytics => self.analytics_enabled = value,
            Flag::DeviceStats => self.device_stats_enabled = value,
            Flag::LimitUserTracking => self.limit_user_tracking = value,
            Flag::PerformanceReporting => match self.performance_reporting_enabled {
                Some(_) => self.performance_reporting_enabled = Some(value),
                None => return Err(FlagError::Unsupported(Flag::PerformanceReporting)),
            },
        }
        Ok(())
    }
}

/// Restrictive-wins combination for one flag.
///
/// The three "enabled" flags use AND (both sides must allow);
/// `limit_user_tracking` has inverted polarity and uses OR (either side may
/// impose the restriction).
fn combine(flag: Flag, current: bool, candidate: bool) -> bool {
    match flag {
        Flag::LimitUserTracking => current || candidate,
        _ => current && candidate,
    }
}

/// Merges a candidate status into the live flags, flag by flag.
///
/// A candidate never loosens a flag: the result is at least as restrictive as
/// both the current value and the candidate. Each flag is applied
/// independently; a get or set failure is logged and the remaining flags are
/// still processed. `opt_out` on the candidate is never applied here.
pub fn reconcile(backend: &mut dyn FlagBackend, candidate: &PrivacyStatus) {
    for flag in ALL_FLAGS {
        let applied = backend
            .get(flag)
            .and_then(|current| backend.set(flag, combine(flag, current, candidate.flag(flag))));
        if let Err(err) = applied {
            error!(%flag, error = %err, "failed to apply privacy flag");
        }
    }
}
