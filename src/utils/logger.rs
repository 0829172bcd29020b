use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATE_TARGET: &str = "road_proximity";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines on stderr, keeping stdout free for response bodies.
    Compact,
    /// One JSON object per event, no timestamp. The Lambda log sink adds its own.
    Json,
}

/// Filter used when `RUST_LOG` is unset.
///
/// Verbose mode opens up this crate's debug output and lets the redis client
/// report connection churn; otherwise only our own info lines and warnings pass.
pub fn default_directives(verbose: bool) -> String {
    if verbose {
        format!("{CRATE_TARGET}=debug,redis=info,warn")
    } else {
        format!("{CRATE_TARGET}=info,warn")
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

pub fn init_logger(format: LogFormat, verbose: bool) {
    let registry = tracing_subscriber::registry().with(env_filter(verbose));

    match format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(verbose)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_target(false)
                    .without_time(),
            )
            .init(),
    }
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(LogFormat::Compact, verbose);
}

pub fn init_lambda_logger() {
    init_logger(LogFormat::Json, false);
}
