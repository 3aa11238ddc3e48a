use anyhow::Context as _;

/// Installs the stderr log subscriber.
///
/// `DOCCHAPTERS_LOG` takes precedence over `RUST_LOG`; both default to `info`.
pub fn init() -> anyhow::Result<()> {
    let filter = match std::env::var("DOCCHAPTERS_LOG") {
        Ok(directives) if !directives.trim().is_empty() => {
            tracing_subscriber::EnvFilter::try_new(directives).context("parse DOCCHAPTERS_LOG")?
        }
        _ => tracing_subscriber::EnvFilter::try_from_default_env()
            .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
            .context("build log filter")?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
