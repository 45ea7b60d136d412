use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zonescan_core::ingest::collect::{collect_universe, CollectOptions};
use zonescan_core::ingest::files::DirectoryBarProvider;
use zonescan_core::ingest::provider::{BarProvider, HttpChartProvider};

mod report;

#[derive(Debug, Parser)]
#[command(name = "zonescan_worker")]
struct Args {
    /// Read `<SYMBOL>.json` chart files from this directory instead of the quote API.
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Only screen these symbols or display names (comma separated).
    #[arg(long, value_delimiter = ',')]
    symbols: Vec<String>,

    /// Write the JSON report here. Defaults to stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Compute and log the screen without writing a report.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = zonescan_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    if let Err(err) = run(&settings, args).await {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %format!("{err:#}"), "screen run failed");
        return Err(err);
    }
    Ok(())
}

async fn run(settings: &zonescan_core::config::Settings, args: Args) -> anyhow::Result<()> {
    let instruments = zonescan_core::universe::filter_symbols(
        zonescan_core::universe::instruments(settings.universe_symbols.as_deref()),
        &args.symbols,
    );
    anyhow::ensure!(
        !instruments.is_empty(),
        "no instruments match --symbols {:?}",
        args.symbols
    );

    let provider: Box<dyn BarProvider> = match &args.input_dir {
        Some(dir) => Box::new(DirectoryBarProvider::new(dir)?),
        None => Box::new(HttpChartProvider::from_settings(settings)?),
    };

    let opts = CollectOptions::from_settings(settings);
    let inputs = collect_universe(provider.as_ref(), &instruments, opts).await;
    anyhow::ensure!(
        !inputs.is_empty(),
        "no bar series collected from {} for {} instruments",
        provider.provider_name(),
        instruments.len()
    );

    let screen = zonescan_core::screen::refresh(None, inputs);
    let report = report::RunReport::new(&screen);

    let buy_zone: Vec<_> = report
        .zones
        .buy_zone
        .iter()
        .map(|c| c.snapshot.name.as_str())
        .collect();
    let sell_zone: Vec<_> = report
        .zones
        .sell_zone
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    tracing::info!(
        run_id = %screen.run_id,
        total = report.breadth.total,
        above_sma10_pct = report.breadth.pct_above_sma10(),
        ?buy_zone,
        ?sell_zone,
        "screen complete"
    );

    if args.dry_run {
        tracing::info!(dry_run = true, "skipping report output");
        return Ok(());
    }

    report.write(args.output.as_deref())
}

fn init_sentry(settings: &zonescan_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
