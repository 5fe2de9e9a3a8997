use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Planner output at `info` (or `debug` when verbose); HTTP client crates are
/// only heard from when something goes wrong.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "meal_planner=debug,reqwest=info,warn"
    } else {
        "meal_planner=info,warn"
    }
}

fn filter(verbose: bool) -> EnvFilter {
    // RUST_LOG wins over the built-in directives
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Compact human-readable logs on stderr so stdout stays clean for lists and exports.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .without_time()
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

pub fn init_json_logger() {
    tracing_subscriber::registry()
        .with(filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(false),
        )
        .init();
}
