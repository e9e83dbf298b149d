use {
    clap::Parser,
    farewatch::{
        alert::SmsDispatcher,
        config::RuntimeConfig,
        query::{format_interval, TripQuery},
        scheduler::Scheduler,
        settings::{resolve, InteractivePrompt, SettingsSource, StaticSettings},
        sink::{LogSink, PresentationSink},
        source::SouthwestFareSource,
        ui::{self, Dashboard},
    },
    std::{path::PathBuf, sync::Arc},
};

/// Watch Southwest fares for one roundtrip and alert on deals
#[derive(Parser, Debug)]
#[command(name = "farewatch", version, about)]
struct Cli {
    /// JSON trip settings file (overrides FAREWATCH_SETTINGS)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Ask for trip settings on the terminal
    #[arg(short, long, conflicts_with = "settings")]
    interactive: bool,

    /// Log to stderr instead of drawing the dashboard
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Logs go to stderr; with the dashboard up only warnings are shown by default
    let default_level = if cli.headless { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    let config = RuntimeConfig::from_env();

    let query = match load_query(&cli, &config) {
        Ok(query) => query,
        Err(e) => {
            log::error!("❌ {}", e);
            return Err(e);
        }
    };

    log::info!("🚀 Starting farewatch...");
    log::info!("📊 Configuration:");
    log::info!("   Route: {} → {}", query.origin, query.destination);
    log::info!("   Dates: {} → {}", query.departure_date, query.return_date);
    log::info!("   Interval: {}", format_interval(query.poll_interval()));
    log::info!("   Source: {}", config.base_url);
    if let Some(timeout) = config.fetch_timeout {
        log::info!("   Fetch timeout: {}", format_interval(timeout));
    }

    let source = SouthwestFareSource::new(config.base_url.clone())?;
    let dispatcher = SmsDispatcher::twilio(query.sms.clone());
    if !dispatcher.is_configured() {
        log::info!("   SMS alerts: disabled");
    }

    let query = Arc::new(query);

    if cli.headless {
        let sink: Arc<dyn PresentationSink> = Arc::new(LogSink);
        let mut scheduler = Scheduler::new(query, Arc::new(source), Arc::new(dispatcher), sink)
            .with_fetch_timeout(config.fetch_timeout);
        scheduler.announce().await;

        tokio::select! {
            _ = scheduler.run() => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("👋 Interrupted, shutting down");
            }
        }
        return Ok(());
    }

    let dashboard = Dashboard::new();
    let state = dashboard.state();
    let sink: Arc<dyn PresentationSink> = Arc::new(dashboard);
    let mut scheduler = Scheduler::new(query, Arc::new(source), Arc::new(dispatcher), sink)
        .with_fetch_timeout(config.fetch_timeout);

    tokio::spawn(async move {
        scheduler.announce().await;
        scheduler.run().await;
    });

    let ui_handle = tokio::spawn(async move {
        if let Err(e) = ui::run_ui(state).await {
            log::error!("UI error: {}", e);
        }
    });

    // Quitting abandons any in-flight cycle
    tokio::select! {
        _ = ui_handle => {
            log::info!("UI exited");
        }
        _ = tokio::signal::ctrl_c() => {
            log::info!("👋 Interrupted, shutting down");
        }
    }

    Ok(())
}

/// Pick the settings source: prompts, an explicit file, or the environment
fn load_query(cli: &Cli, config: &RuntimeConfig) -> Result<TripQuery, Box<dyn std::error::Error>> {
    let settings_path = cli
        .settings
        .clone()
        .or_else(|| config.settings_path.as_ref().map(PathBuf::from));

    let mut source: Box<dyn SettingsSource> = if cli.interactive {
        let stdin = std::io::stdin();
        Box::new(InteractivePrompt::new(stdin.lock(), std::io::stdout()))
    } else if let Some(path) = settings_path {
        log::info!("📄 Reading trip settings from {}", path.display());
        Box::new(StaticSettings::from_file(&path)?)
    } else {
        Box::new(StaticSettings::from_env())
    };

    Ok(resolve(source.as_mut())?)
}
