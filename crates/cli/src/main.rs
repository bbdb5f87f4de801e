use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod host;

#[derive(Parser)]
#[command(name = "optgate", about = "Telemetry opt-out gating tool", version)]
struct Cli {
    /// Path to the local preference cache
    #[arg(long, default_value = "optgate-prefs.json")]
    prefs: String,

    /// Opt-out service base URL
    #[arg(long, default_value = optgate_core::DEFAULT_BASE_URL)]
    base_url: String,

    /// Application id sent with requests
    #[arg(long, default_value = "")]
    app_id: String,

    /// User id sent with requests
    #[arg(long, default_value = "")]
    user_id: String,

    /// Device id sent with requests
    #[arg(long, default_value = "")]
    device_id: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Fetch the remote opt-out status and print the reconciled flags
    Status,
    /// Fetch the privacy dashboard URL for this user and device
    Url,
    /// Print the locally cached snapshot without touching the network
    Show,
    /// Reset the local cache to its defaults
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let env = host::environment(&cli.app_id, &cli.user_id, &cli.device_id);

    match cli.command {
        Commands::Status => {
            commands::status::run(&cli.prefs, &cli.base_url, env).await?;
        }
        Commands::Url => {
            commands::url::run(&cli.prefs, &cli.base_url, env).await?;
        }
        Commands::Show => {
            commands::show::run(&cli.prefs)?;
        }
        Commands::Reset => {
            commands::reset::run(&cli.prefs)?;
        }
    }

    Ok(())
}
