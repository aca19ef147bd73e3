use std::sync::Once;

use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVES: [&str; 4] = [
    "finance_core=info",
    "pfd_core=warn",
    "pfd_config=warn",
    "pfd_storage_json=warn",
];

/// `RUST_LOG` plus the workspace defaults: info for the facade, warnings
/// from the engine and storage crates.
pub(crate) fn default_filter() -> EnvFilter {
    DEFAULT_DIRECTIVES
        .iter()
        .filter_map(|raw| raw.parse::<Directive>().ok())
        .fold(EnvFilter::from_default_env(), EnvFilter::add_directive)
}

/// Initializes the global tracing subscriber.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        // A subscriber installed by the host application wins.
        let _ = fmt()
            .with_env_filter(default_filter())
            .with_writer(std::io::stderr)
            .try_init();
    });
}
