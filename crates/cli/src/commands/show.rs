use optgate_core::{load_status, JsonFilePrefs};

/// Run the `show` command: print the locally cached snapshot. No network.
pub fn run(prefs_path: &str) -> anyhow::Result<()> {
    let prefs = JsonFilePrefs::open(prefs_path)?;
    let status = load_status(&prefs);

    println!("Cached snapshot ({})", prefs_path);
    println!("optOut:                       {}", status.opt_out);
    println!("analyticsEnabled:             {}", status.analytics_enabled);
    println!("deviceStatsEnabled:           {}", status.device_stats_enabled);
    println!("limitUserTracking:            {}", status.limit_user_tracking);
    println!("performanceReportingEnabled:  {}", status.performance_reporting_enabled);

    Ok(())
}
