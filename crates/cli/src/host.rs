//! Host environment for the CLI: identity comes from flags, the rest from
//! the running process.

use optgate_core::StaticEnvironment;

/// Stable platform codes reported alongside the platform name.
fn platform_code(os: &str) -> u32 {
    match os {
        "linux" => 1,
        "macos" => 2,
        "windows" => 3,
        "android" => 4,
        "ios" => 5,
        _ => 0,
    }
}

pub fn environment(app_id: &str, user_id: &str, device_id: &str) -> StaticEnvironment {
    StaticEnvironment {
        app_id: app_id.to_string(),
        user_id: user_id.to_string(),
        session_id: i64::from(std::process::id()),
        platform: std::env::consts::OS.to_string(),
        platform_id: platform_code(std::env::consts::OS),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        debug_build: cfg!(debug_assertions),
        device_id: device_id.to_string(),
    }
}
