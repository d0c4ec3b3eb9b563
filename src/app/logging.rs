//! Tracing subscriber setup for both binaries.
//!
//! The server logs to stdout. The viewer has no console on some platforms, so it
//! writes to `<data dir>/logs/aztags.log` instead and falls back to stderr when
//! the data directory cannot be resolved. Both bridge `log` records from
//! dependencies into tracing.

use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "aztags=info,tower_http=info,hyper=warn,reqwest=warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Directory holding the viewer's log and crash files
pub fn log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "", "aztags").map(|dirs| dirs.data_dir().join("logs"))
}

pub fn init_server_logging() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_target(true));
    tracing::subscriber::set_global_default(subscriber)?;

    tracing_log::LogTracer::init()?;
    Ok(())
}

pub fn init_viewer_logging() -> anyhow::Result<Option<PathBuf>> {
    let Some(dir) = log_dir() else {
        let subscriber = tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
        tracing::subscriber::set_global_default(subscriber)?;
        tracing_log::LogTracer::init()?;
        return Ok(None);
    };

    std::fs::create_dir_all(&dir)?;
    let log_path = dir.join("aztags.log");
    let file = OpenOptions::new().append(true).create(true).open(&log_path)?;

    // Owner read/write only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = file.metadata()?.permissions();
        perms.set_mode(0o600);
        if let Err(e) = std::fs::set_permissions(&log_path, perms) {
            eprintln!("Failed to restrict log file permissions: {}", e);
        }
    }

    let subscriber = tracing_subscriber::registry().with(env_filter()).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false),
    );
    tracing::subscriber::set_global_default(subscriber)?;

    // Must come after the subscriber is installed
    tracing_log::LogTracer::init()?;

    tracing::info!("Logging initialized to: {:?}", log_path);
    Ok(Some(log_path))
}

/// Write panics to `crash.log` next to the regular log, then to stderr
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());
        let details = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| panic_info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("unknown panic");

        let crash_msg = format!(
            "aztags crashed!\nPanic occurred at: {}\nDetails: {}\nBacktrace:\n{:?}\n",
            location,
            details,
            std::backtrace::Backtrace::force_capture()
        );

        if let Some(dir) = log_dir() {
            let _ = std::fs::create_dir_all(&dir);
            let crash_log_path = dir.join("crash.log");
            if let Ok(mut file) = OpenOptions::new().append(true).create(true).open(&crash_log_path) {
                use std::io::Write;
                let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                let _ = writeln!(file, "\n=== CRASH at {} ===\n{}", timestamp, crash_msg);
            }
            eprintln!("\n{}\nCrash log written to: {:?}", crash_msg, crash_log_path);
        } else {
            eprintln!("\n{}", crash_msg);
        }
    }));
}
