use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
///
/// Font discovery is chatty at debug level, so those targets are kept at `warn`.
pub const DEFAULT_FILTER: &str = "info,quill_ui=debug,cosmic_text=warn,fontdb=warn";

/// Install a `tracing` fmt subscriber.
///
/// `RUST_LOG` takes precedence over [`DEFAULT_FILTER`]. Calling this more than once is
/// harmless; only the first subscriber is installed.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
