use std::time::Duration;

use clap::Parser;
use event_map::utils::error::ErrorSeverity;
use event_map::utils::{logger, validation::Validate};
use event_map::{CliConfig, HttpDataSource, LocalStorage, MapError, MapWidget, SnapshotProvider};

fn exit_code(e: &MapError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: MapError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e).max(1));
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let (verbose, json) = cli.logging();
    if json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting event-map");

    let config = match cli.session_config() {
        Ok(config) => config,
        Err(e) => fail(e),
    };
    if verbose {
        tracing::debug!("Session config: {:?}", config);
    }
    if let Err(e) = config.validate() {
        fail(e);
    }

    let source =
        match HttpDataSource::with_timeout(&config.api_path, Duration::from_secs(config.timeout_seconds)) {
            Ok(source) => source,
            Err(e) => fail(e),
        };

    let widget = match MapWidget::start(&config, &SnapshotProvider, source) {
        Ok(widget) => widget,
        Err(e) => fail(e),
    };

    let outcomes = if cli.separate_fetches {
        widget.render_separately().await
    } else {
        widget.render().await
    };

    let mut worst: Option<MapError> = None;
    for outcome in outcomes {
        match outcome.result {
            Ok(report) => {
                tracing::info!(
                    "✅ {}: {} markers from {} events ({} locations discarded)",
                    report.mode,
                    report.markers,
                    report.events,
                    report.discarded
                );
            }
            Err(e) => {
                if worst.as_ref().map_or(true, |w| e.severity() > w.severity()) {
                    worst = Some(e);
                }
            }
        }
    }

    let snapshot = widget.session().lock().await.surface().snapshot();
    let storage = LocalStorage::new(&config.output_path);
    match snapshot.write_to(&storage).await {
        Ok(files) => {
            println!("📁 Map snapshot saved to {}: {}", config.output_path, files.join(", "));
        }
        Err(e) => fail(e),
    }

    if let Some(e) = worst {
        fail(e);
    }
    println!("✅ Map rendered successfully");
}
