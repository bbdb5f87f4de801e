use optgate_core::{JsonFilePrefs, LiveFlags, PrivacyGate, StaticEnvironment};
use tracing::info;

/// Run the `status` command: fetch the remote opt-out status, reconcile it
/// against the local cache, and print the effective flags.
pub async fn run(prefs_path: &str, base_url: &str, env: StaticEnvironment) -> anyhow::Result<()> {
    let prefs = JsonFilePrefs::open(prefs_path)?;
    info!("using preference cache at {}", prefs_path);

    let gate = PrivacyGate::new(env, prefs, LiveFlags::default()).with_base_url(base_url);
    let opt_out = gate.fetch_opt_out_status().await;
    let status = gate.status();

    println!("Privacy Status");
    println!("==============");
    println!("Opted out:             {}", yes_no(opt_out));
    println!();
    println!("Analytics:             {}", enabled(status.analytics_enabled));
    println!("Device stats:          {}", enabled(status.device_stats_enabled));
    println!("Performance reporting: {}", enabled(status.performance_reporting_enabled));
    println!("Limit user tracking:   {}", yes_no(status.limit_user_tracking));

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn enabled(value: bool) -> &'static str {
    if value {
        "enabled"
    } else {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_render_correctly() {
        assert_eq!(yes_no(true), "yes");
        assert_eq!(yes_no(false), "no");
        assert_eq!(enabled(true), "enabled");
        assert_eq!(enabled(false), "disabled");
    }
}
