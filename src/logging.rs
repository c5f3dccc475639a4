use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Output goes to stderr so table and JSON
/// output on stdout stay machine-readable.
///
/// An explicit `level` wins; otherwise `RUST_LOG` applies, defaulting to `warn`.
pub fn init(level: Option<&str>, json: bool) -> Result<(), String> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).map_err(|e| e.to_string())?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let result = if json {
        tracing::subscriber::set_global_default(builder.json().with_ansi(false).finish())
    } else {
        tracing::subscriber::set_global_default(builder.compact().finish())
    };
    result.map_err(|e| format!("failed to set tracing subscriber: {e}"))
}
