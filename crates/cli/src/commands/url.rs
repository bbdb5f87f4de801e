use optgate_core::{JsonFilePrefs, LiveFlags, PrivacyGate, StaticEnvironment};

/// Run the `url` command: fetch the privacy dashboard URL for this identity.
pub async fn run(prefs_path: &str, base_url: &str, env: StaticEnvironment) -> anyhow::Result<()> {
    let prefs = JsonFilePrefs::open(prefs_path)?;
    let gate = PrivacyGate::new(env, prefs, LiveFlags::default()).with_base_url(base_url);

    let url = gate.fetch_privacy_url().await?;
    if url.is_empty() {
        // The service may omit the field; that is not an error upstream.
        println!("The service returned no dashboard URL.");
    } else {
        println!("{url}");
    }

    Ok(())
}
