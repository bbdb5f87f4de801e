use optgate_core::{load_status, save_status, JsonFilePrefs, MemoryPrefs};
use tracing::info;

/// Run the `reset` command: overwrite the local cache with the documented
/// defaults (everything enabled, tracking not limited, not opted out).
pub fn run(prefs_path: &str) -> anyhow::Result<()> {
    let mut prefs = JsonFilePrefs::open(prefs_path)?;

    // Defaults are whatever an empty store loads as.
    let defaults = load_status(&MemoryPrefs::new());
    save_status(&mut prefs, &defaults);

    info!("reset preference cache at {}", prefs_path);
    println!("Local privacy cache reset to defaults.");
    Ok(())
}
