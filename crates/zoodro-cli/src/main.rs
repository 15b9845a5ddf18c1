mod report;
mod view_line;
mod watch;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;
use zoodro_client::VendorClient;
use zoodro_coordinator::{Coordinator, CoordinatorSettings, FetchOutcome};
use zoodro_core::{
    resolve_initial_view, AppConfig, GeoPoint, GeolocationError, InitialView, MapView,
};

#[derive(Debug, Parser)]
#[command(name = "zoodro")]
#[command(about = "Find vendor discounts around a map view")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the corner coordinates of a map view
    Corners {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[command(flatten)]
        viewport: ViewportArgs,
    },
    /// Fetch the vendors visible in one map view
    Vendors {
        /// Map center latitude; the configured default center is used when omitted
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
        #[command(flatten)]
        viewport: ViewportArgs,
    },
    /// Read `lat,lng[,zoom]` lines from stdin as map movements and print
    /// every accepted vendor list
    Watch {
        #[command(flatten)]
        viewport: ViewportArgs,
    },
}

#[derive(Debug, Clone, Copy, Default, Args)]
struct ViewportArgs {
    #[arg(long, value_parser = parse_zoom)]
    zoom: Option<f64>,
    /// Viewport width in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,
    /// Viewport height in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,
}

impl ViewportArgs {
    fn view(self, center: GeoPoint, default_zoom: f64, config: &AppConfig) -> MapView {
        MapView::new(
            center,
            self.zoom.unwrap_or(default_zoom),
            self.width.unwrap_or(config.viewport_width),
            self.height.unwrap_or(config.viewport_height),
        )
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = zoodro_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Corners { lat, lng, viewport } => {
            let center = GeoPoint::new(lat, lng);
            anyhow::ensure!(center.is_valid(), "center {lat},{lng} is out of range");
            let view = viewport.view(center, config.default_zoom, &config);
            report::print_corners(&view);
        }
        Commands::Vendors { lat, lng, viewport } => {
            let initial = initial_view(&config, lat.zip(lng));
            let view = viewport.view(initial.center, initial.zoom, &config);
            run_vendors(&config, view).await?;
        }
        Commands::Watch { viewport } => {
            let initial = initial_view(&config, None);
            let view = viewport.view(initial.center, initial.zoom, &config);
            run_watch(&config, view).await?;
        }
    }

    Ok(())
}

/// A command line has no device position to offer, so a missing center
/// resolves like an unsupported geolocation request.
fn initial_view(config: &AppConfig, center: Option<(f64, f64)>) -> InitialView {
    let device = center
        .map(|(lat, lng)| GeoPoint::new(lat, lng))
        .ok_or(GeolocationError::Unsupported);
    let initial = resolve_initial_view(device, config.default_center, config.default_zoom);
    if let Some(err) = initial.location_error {
        if center.is_some() {
            tracing::warn!(error = %err, "center is out of range; using the default center");
        } else {
            tracing::info!(error = %err, "{}", err.instructions());
        }
    }
    initial
}

fn spawn_coordinator(config: &AppConfig) -> anyhow::Result<Coordinator> {
    let client = VendorClient::from_config(config).context("failed to build vendor API client")?;
    Ok(Coordinator::spawn(
        client,
        CoordinatorSettings::from_config(config),
    ))
}

async fn run_vendors(config: &AppConfig, view: MapView) -> anyhow::Result<()> {
    let coordinator = spawn_coordinator(config)?;
    let outcome = coordinator.request_vendors_for_view(view)?.outcome().await?;
    let result = match outcome {
        FetchOutcome::Accepted { .. } => {
            report::print_vendors(view.center, &coordinator.current_vendors());
            Ok(())
        }
        FetchOutcome::Failed { error, .. } => {
            Err(anyhow::anyhow!(error).context("vendor fetch failed"))
        }
        FetchOutcome::Discarded { token } => {
            Err(anyhow::anyhow!("vendor request {token} was superseded"))
        }
    };
    coordinator.shutdown().await;
    result
}

async fn run_watch(config: &AppConfig, base: MapView) -> anyhow::Result<()> {
    let coordinator = spawn_coordinator(config)?;
    let input = BufReader::new(tokio::io::stdin());
    let result = watch::run(&coordinator, input, base, &mut std::io::stdout()).await;
    coordinator.shutdown().await;
    result
}

/// Accepts finite, non-negative zoom levels.
fn parse_zoom(raw: &str) -> Result<f64, String> {
    let zoom: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if zoom.is_finite() && zoom >= 0.0 {
        Ok(zoom)
    } else {
        Err(format!("{raw} is not a zoom level (expected a number >= 0)"))
    }
}
