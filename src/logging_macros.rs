#![warn(clippy::all, rust_2018_idioms)]

/// Tracing macros that prefix every record with `[file:module:line]`.
///
/// `log` records emitted by dependencies (reqwest, hyper, eframe) reach the same
/// subscriber through the `tracing-log` bridge, so these only need to talk to
/// `tracing`.
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        tracing::trace!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        tracing::debug!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        tracing::info!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        tracing::warn!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        tracing::error!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

/*
Log level guidelines:

TRACE: per-item detail inside loops (each resource mapped, each repaint)
DEBUG: individual upstream calls, UI interactions, state transitions
INFO:  server startup, completed hierarchy fetches, saved tag sets
WARN:  missing configuration, rejected request bodies, failed saves in the viewer
ERROR: upstream failures surfaced to a client as a 500

Never log from inside the egui render path at INFO or below; the viewer redraws
every frame.
*/
