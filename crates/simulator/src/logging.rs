use tracing_subscriber::EnvFilter;

/// `debug` when verbose, otherwise `RUST_LOG` falling back to `info`.
pub fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global fmt subscriber shared by the command-line tools.
pub fn init_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn verbose_enables_debug() {
        assert_eq!(env_filter(true).max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
