use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber. Output goes to stderr so rendered tables
/// and JSON on stdout stay clean. When `RUST_LOG` is set it alone decides what
/// is logged and `verbose` is ignored.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let crate_filter = crate_filter(verbose, env_filter.is_some());
    let env_filter = env_filter.unwrap_or_else(|| EnvFilter::new(default_level(verbose)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(crate_filter)
        .with(env_filter)
        .init();
}

fn default_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Limits output to this crate unless `RUST_LOG` is driving the filter.
fn crate_filter(verbose: bool, env_filter_set: bool) -> Option<Targets> {
    if env_filter_set {
        return None;
    }
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    Some(Targets::new().with_target(env!("CARGO_CRATE_NAME"), level))
}
