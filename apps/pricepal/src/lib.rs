//! # PricePal Application Library
//!
//! Screens and commands of the PricePal app, plus the terminal scan station
//! the `pricepal` binary runs.
//!
//! ## Module Organization
//! ```text
//! pricepal_app/
//! ├── lib.rs            ◄─── You are here (tracing setup & scan station)
//! ├── config.rs         ◄─── TOML + environment configuration
//! ├── error.rs          ◄─── API error type for commands
//! ├── station.rs        ◄─── Operator input parsing
//! ├── state/
//! │   ├── mod.rs        ◄─── State type exports
//! │   ├── session.rs    ◄─── Logged-in user
//! │   ├── inventory.rs  ◄─── Inventory screen list
//! │   └── scanner.rs    ◄─── Scanner screen + barcode binding
//! └── commands/
//!     ├── mod.rs        ◄─── Command exports
//!     ├── auth.rs       ◄─── register / login / logout / password reset
//!     ├── inventory.rs  ◄─── shop name, item list, add / remove
//!     └── scanner.rs    ◄─── shop picker, lookup, scan again
//! ```
//!
//! ## Threads
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  camera thread                       UI task (tokio)                    │
//! │  ─────────────                       ───────────────                    │
//! │  frame ─► FrameDecoder                                                  │
//! │             │ first EAN-8/EAN-13/                                       │
//! │             │ Code128 value                                             │
//! │             ▼                                                           │
//! │           ScanReporter ══ mpsc ════► BarcodeBinding                     │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                                      ScannerScreen ─► lookup ─► render  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The screen state is only ever touched from the UI task; the camera
//! thread's sole way in is the reporter.

pub mod commands;
pub mod config;
pub mod error;
pub mod state;
pub mod station;

use std::path::PathBuf;

use pricepal_db::{Database, DbConfig};
use pricepal_scanner::{scan_channel, CaptureSession, SimulatedCamera, SimulatedCameraHandle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use state::{InventoryState, ScannerScreen, SessionState};
use station::StationInput;

/// Command line options of the scan station.
#[derive(Debug, Clone, Default)]
pub struct StationOptions {
    pub config_path: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=pricepal_scanner=trace` - Trace the capture pipeline only
/// - Default: INFO, DEBUG for pricepal crates
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .with_writer(std::io::stderr)
        .init();
}

const DEFAULT_LOG_FILTER: &str = "info,pricepal=debug,sqlx=warn";

/// Directives from `RUST_LOG`, or the defaults when unset or unparsable.
fn log_filter(rust_log: Option<String>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Runs the scan station until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  1. Load config (file, then PRICEPAL_* environment)                    │
/// │  2. Open the database, apply migrations                                │
/// │  3. Optional login: the user's shop becomes the default shop           │
/// │  4. scan_channel(report_policy) ─► reporter + binding                  │
/// │  5. CaptureSession over the simulated camera, configure + start        │
/// │  6. Scanner screen appears: shop list, preselected shop, armed         │
/// │  7. Loop on stdin lines and scanned barcodes                           │
/// │  8. Stop capture, close the pool                                       │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(options: StationOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load(options.config_path)?;
    if let Some(path) = options.db_path {
        config.database.path = Some(path);
    }

    let db_path = config.database_path()?;
    info!(?db_path, policy = %config.scanner.report_policy, "Starting scan station");

    let db = Database::new(
        DbConfig::new(db_path).max_connections(config.database.max_connections),
    )
    .await?;

    let session = SessionState::new();
    let inventory = InventoryState::new();
    let mut default_shop = config.inventory.default_shop.clone();

    if let (Some(email), Some(password)) = (&options.email, &options.password) {
        commands::auth::login(&db, &session, &inventory, email, password).await?;
        match commands::inventory::fetch_shop_name(&db, &session, &inventory).await {
            Ok(shop) => default_shop = Some(shop),
            Err(e) => warn!(error = %e, "Could not resolve the user's shop"),
        }
    }

    let (reporter, binding) = scan_channel(config.scanner.report_policy);
    let (camera, feed) = SimulatedCamera::new();
    let mut capture = CaptureSession::with_feedback(camera, reporter, config.scanner.feedback.build());

    let mut screen = ScannerScreen::new(binding);
    commands::scanner::on_appear(&db, &mut screen, default_shop.as_deref()).await;
    capture.start()?;

    println!("{}", station::HELP);
    render(&screen);

    let result = station_loop(&db, &mut screen, &feed).await;

    capture.stop();
    db.close().await;
    info!("Scan station stopped");

    result
}

async fn station_loop(
    db: &Database,
    screen: &mut ScannerScreen,
    feed: &SimulatedCameraHandle,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                match StationInput::parse(&line) {
                    StationInput::Scan { code_type, value } => {
                        if !feed.scan(code_type, value) {
                            warn!("Camera is not streaming, frame dropped");
                        }
                    }
                    StationInput::SelectShop(name) => {
                        commands::scanner::select_shop(screen, &name);
                        commands::scanner::lookup(db, screen).await;
                        render(screen);
                    }
                    StationInput::ScanAgain => {
                        commands::scanner::scan_again(screen);
                        render(screen);
                    }
                    StationInput::Quit => break,
                    StationInput::Empty => {}
                    StationInput::Invalid(reason) => {
                        println!("{}", reason);
                        println!("{}", station::HELP);
                    }
                }
            }
            scanned = screen.binding_mut().changed() => {
                let Some(symbol) = scanned else {
                    break;
                };
                commands::scanner::on_barcode(db, screen, &symbol).await;
                render(screen);
            }
        }
    }

    Ok(())
}

fn render(screen: &ScannerScreen) {
    let result = screen.result();
    let shop = screen
        .selected_shop()
        .unwrap_or(pricepal_core::NO_SHOP_SELECTED);

    println!();
    println!("[{}]", shop);
    println!("  {}", result.barcode);
    println!("  {}", result.item_name);
    println!("  {}", result.item_price);
    if !screen.binding().is_awaiting_scan() && !result.is_awaiting_scan() {
        println!("  (type `again` to scan the next item)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;
    use tracing::Level;
    use tracing_subscriber::{Layer, Registry};

    fn hint(filter: &EnvFilter) -> Option<LevelFilter> {
        Layer::<Registry>::max_level_hint(filter)
    }

    #[test]
    fn test_log_filter_honors_rust_log() {
        assert_eq!(hint(&log_filter(Some("warn".into()))), Some(LevelFilter::WARN));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(log_filter(Some("warn".into())))
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(Level::WARN));
            assert!(!tracing::enabled!(Level::INFO));
            assert!(!tracing::enabled!(Level::DEBUG));
        });
    }

    #[test]
    fn test_log_filter_defaults() {
        assert_eq!(hint(&log_filter(None)), Some(LevelFilter::DEBUG));
        assert_eq!(
            hint(&log_filter(Some("pricepal=loud".into()))),
            Some(LevelFilter::DEBUG)
        );
    }
}
