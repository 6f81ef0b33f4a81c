use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::formatter::CustomFormatter;

static SUBSCRIBER_INIT: std::sync::Once = std::sync::Once::new();

/// Installs the global tracing subscriber. Safe to call more than once.
///
/// `RUST_LOG` overrides the default filter of `warn` everywhere and `info` for this crate.
pub fn setup_logging() {
    SUBSCRIBER_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,{name}=info", name = env!("CARGO_CRATE_NAME"))));

        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().event_format(CustomFormatter).with_writer(std::io::stderr))
            .with(ErrorLayer::default())
            .try_init();

        if installed.is_err() {
            tracing::debug!("A global subscriber was already installed, keeping it");
        }
    });
}
