use bevy::prelude::*;

use persisted_collections::showcase::{RoundTripReport, Showcase, ShowcasePlugin};
use persisted_collections::storage::{self, PersistFormat};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::fs;
use std::path::{Path, PathBuf};

const LOG_PREFIX: &str = "collections";

fn setup_file_logging() -> std::io::Result<String> {
    let log_dir = PathBuf::from("logs");
    fs::create_dir_all(&log_dir)?;

    // Keep only the last 25 runs
    cleanup_old_logs(&log_dir, 25);

    let now = chrono::Local::now();
    let log_filename = format!("{}_{}.log", LOG_PREFIX, now.format("%Y%m%d_%H%M%S"));
    let log_path_str = log_dir.join(&log_filename).to_string_lossy().to_string();

    let file_appender = RollingFileAppender::new(Rotation::NEVER, &log_dir, &log_filename);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bevy_ecs=info,persisted_collections=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(log_path_str)
}

fn cleanup_old_logs(log_dir: &Path, keep_count: usize) {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };

    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|s| s.starts_with(LOG_PREFIX) && s.ends_with(".log"))
        })
        .collect();

    // Oldest first
    log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

    if log_files.len() > keep_count {
        for file in log_files.iter().take(log_files.len() - keep_count) {
            let _ = fs::remove_file(file.path());
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_file = setup_file_logging()?;
    info!("Logging to {}", log_file);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(ShowcasePlugin);
    app.update();

    let report = app.world().resource::<RoundTripReport>().clone();
    info!(
        "In-memory round trip: ron {} bytes (match={}), bincode {} bytes (match={})",
        report.ron_bytes, report.ron_matches, report.bincode_bytes, report.bincode_matches
    );

    let save_dir = PathBuf::from("saves");
    fs::create_dir_all(&save_dir)?;
    let showcase = app.world().resource::<Showcase>().clone();

    for (format, file_name) in [
        (PersistFormat::Ron, "showcase.ron"),
        (PersistFormat::Bincode, "showcase.bin"),
    ] {
        let path = save_dir.join(file_name);
        storage::save(&path, &showcase, format)?;
        let restored: Showcase = storage::load(&path, format)?;
        if restored == showcase {
            info!("{} restored intact", path.display());
        } else {
            warn!("{} differs after reload", path.display());
        }
    }

    Ok(())
}
