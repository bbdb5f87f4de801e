//! Host environment access and request identity.
//!
//! Identifying data is gathered fresh from the host on every request and
//! never cached; the same data drives the descriptive User-Agent header.

use serde::Serialize;

/// Version of this package, reported to the opt-out service.
pub const PLUGIN_VERSION: &str = "2.0.1";
/// Full `plugin_ver` / User-Agent product string.
pub const PLUGIN_VERSION_STRING: &str = "DataPrivacyPackage/2.0.1";

/// Accessors the host application provides for identifying data.
pub trait HostEnvironment {
    fn app_id(&self) -> String;
    fn user_id(&self) -> String;
    fn session_id(&self) -> i64;
    fn platform(&self) -> String;
    fn platform_id(&self) -> u32;
    /// Host engine/runtime version string.
    fn engine_version(&self) -> String;
    fn debug_build(&self) -> bool;
    fn device_id(&self) -> String;
}

/// Plain value-holder environment for hosts, tools, and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    pub app_id: String,
    pub user_id: String,
    pub session_id: i64,
    pub platform: String,
    pub platform_id: u32,
    pub engine_version: String,
    pub debug_build: bool,
    pub device_id: String,
}

impl HostEnvironment for StaticEnvironment {
    fn app_id(&self) -> String {
        self.app_id.clone()
    }

    fn user_id(&self) -> String {
        self.user_id.clone()
    }

    fn session_id(&self) -> i64 {
        self.session_id
    }

    fn platform(&self) -> String {
        self.platform.clone()
    }

    fn platform_id(&self) -> u32 {
        self.platform_id
    }

    fn engine_version(&self) -> String {
        self.engine_version.clone()
    }

    fn debug_build(&self) -> bool {
        self.debug_build
    }

    fn device_id(&self) -> String {
        self.device_id.clone()
    }
}

/// Identifying data sent with every privacy request. Field names are the
/// exact wire names of the opt-out service.
#[derive(Debug, Clone, Serialize)]
pub struct UserIdentity {
    pub appid: String,
    pub userid: String,
    pub sessionid: i64,
    pub platform: String,
    pub platformid: u32,
    pub sdk_ver: String,
    pub debug_device: bool,
    pub deviceid: String,
    pub plugin_ver: String,
}

impl UserIdentity {
    /// Builds a fresh identity snapshot from the host environment.
    pub fn gather(env: &dyn HostEnvironment) -> Self {
        Self {
            appid: env.app_id(),
            userid: env.user_id(),
            sessionid: env.session_id(),
            platform: env.platform(),
            platformid: env.platform_id(),
            sdk_ver: env.engine_version(),
            debug_device: env.debug_build(),
            deviceid: env.device_id(),
            plugin_ver: PLUGIN_VERSION_STRING.to_string(),
        }
    }
}

/// Descriptive User-Agent for privacy requests, e.g.
/// `UnityPlayer/2019.2.0f1 (Linux/13-dev DataPrivacyPackage/2.0.1)`.
pub fn user_agent(env: &dyn HostEnvironment) -> String {
    format!(
        "UnityPlayer/{} ({}/{}{} {})",
        env.engine_version(),
        env.platform(),
        env.platform_id(),
        if env.debug_build() { "-dev" } else { "" },
        PLUGIN_VERSION_STRING,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_env() -> StaticEnvironment {
        StaticEnvironment {
            app_id: "app-123".into(),
            user_id: "user-456".into(),
            session_id: 789,
            platform: "Linux".into(),
            platform_id: 13,
            engine_version: "2019.2.0f1".into(),
            debug_build: false,
            device_id: "device-abc".into(),
        }
    }

    #[test]
    fn gather_copies_every_field() {
        let identity = UserIdentity::gather(&sample_env());
        assert_eq!(identity.appid, "app-123");
        assert_eq!(identity.userid, "user-456");
        assert_eq!(identity.sessionid, 789);
        assert_eq!(identity.platform, "Linux");
        assert_eq!(identity.platformid, 13);
        assert_eq!(identity.sdk_ver, "2019.2.0f1");
        assert!(!identity.debug_device);
        assert_eq!(identity.deviceid, "device-abc");
        assert_eq!(identity.plugin_ver, PLUGIN_VERSION_STRING);
    }

    #[test]
    fn identity_serializes_with_wire_names() {
        let json = serde_json::to_string(&UserIdentity::gather(&sample_env()))
            .expect("should serialize");
        assert!(json.contains("\"appid\":\"app-123\""));
        assert!(json.contains("\"userid\":\"user-456\""));
        assert!(json.contains("\"sessionid\":789"));
        assert!(json.contains("\"platformid\":13"));
        assert!(json.contains("\"sdk_ver\":\"2019.2.0f1\""));
        assert!(json.contains("\"debug_device\":false"));
        assert!(json.contains("\"deviceid\":\"device-abc\""));
        assert!(json.contains("\"plugin_ver\":\"DataPrivacyPackage/2.0.1\""));
    }

    #[test]
    fn user_agent_release_build() {
        assert_eq!(
            user_agent(&sample_env()),
            "UnityPlayer/2019.2.0f1 (Linux/13 DataPrivacyPackage/2.0.1)"
        );
    }

    #[test]
    fn user_agent_debug_build_gets_dev_suffix() {
        let mut env = sample_env();
        env.debug_build = true;
        assert_eq!(
            user_agent(&env),
            "UnityPlayer/2019.2.0f1 (Linux/13-dev DataPrivacyPackage/2.0.1)"
        );
    }

    #[test]
    fn plugin_version_string_matches_version() {
        assert!(PLUGIN_VERSION_STRING.ends_with(PLUGIN_VERSION));
    }
}
