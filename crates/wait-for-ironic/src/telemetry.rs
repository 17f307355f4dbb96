use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// JSON logs on stderr; stdout is reserved for progress messages.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wait_for_ironic=info,ironic_api=info")),
        )
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();
}
