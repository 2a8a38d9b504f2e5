use clap::Parser;
use talentmonitor_rs::settings::Settings;
use talentmonitor_rs::{Error, TalentMonitor};

/// Talent Solar Monitoring client
#[derive(Parser)]
#[command(name = "talentmonitor-rs")]
#[command(version)]
#[command(about = "Fetch the current readings of a Talent solar station", long_about = None)]
struct Cli {
    /// Username to log in (falls back to PYTALENT_USERNAME)
    #[arg(short, long)]
    username: Option<String>,

    /// Password to log in (falls back to PYTALENT_PASSWORD)
    #[arg(short, long)]
    password: Option<String>,

    /// Return output as JSON object
    #[arg(long)]
    json: bool,

    /// Base URL of the monitoring API
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = Settings::read()?.with_overrides(cli.username, cli.password, cli.api_url);

    /* The client lives until the end of `main`, whatever the fetch outcome */
    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| Error::ConfigurationError(format!("Unable to build HTTP client: {}", e)))?;

    let mut talent_monitor =
        TalentMonitor::new(settings.api(), &client, cli.json).with_timezone(settings.timezone);

    match talent_monitor.fetch_solar_data().await {
        Ok(Some(result)) => {
            log::info!("Solar data received");
            println!("{}", result);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => {
            log::error!("{}", e);
            Err(e)
        }
    }
}
