//! Wire and snapshot types for the opt-out service.

use serde::{Deserialize, Serialize};

use crate::flags::Flag;

/// One snapshot of permission state: loaded from the local store, computed
/// from the live flags, or received from the opt-out service.
///
/// Immutable once constructed; reconciliation replaces snapshots wholesale.
/// Every field defaults to `false` when absent from a response body, which is
/// the restrictive reading for the four "enabled" flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacyStatus {
    pub opt_out: bool,
    pub analytics_enabled: bool,
    pub device_stats_enabled: bool,
    pub limit_user_tracking: bool,
    pub performance_reporting_enabled: bool,
}

impl PrivacyStatus {
    /// Returns the value this snapshot carries for one gating flag.
    ///
    /// `optOut` is not a gating flag and has no [`Flag`] entry; it is only
    /// reported back to callers of the fetch operations.
    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Analytics => self.analytics_enabled,
            Flag::DeviceStats => self.device_stats_enabled,
            Flag::LimitUserTracking => self.limit_user_tracking,
            Flag::PerformanceReporting => self.performance_reporting_enabled,
        }
    }
}

/// Request metadata echoed by the opt-out endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RequestData {
    pub date: String,
}

/// Response body of `GET {base}/player/opt_out`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OptOutResponse {
    pub request: RequestData,
    pub status: PrivacyStatus,
}

/// Response body of `POST {base}/token`.
///
/// `url` points at the privacy dashboard for this user/device. A response
/// missing the field deserializes to an empty string rather than an error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenData {
    pub url: String,
    pub token: String,
}
