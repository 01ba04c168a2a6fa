use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter: library progress at info with `--verbose`, warnings otherwise.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "warn,fts_lib=info,fts=info"
    } else {
        "warn"
    }
}

/// Build the filter, letting `RUST_LOG` replace the defaults when set.
pub fn create_env_filter(verbose: bool) -> EnvFilter {
    match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(default_directives(verbose)),
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays a clean
/// JSON channel.
pub fn init_logging(verbose: bool) {
    let result = tracing_subscriber::registry()
        .with(create_env_filter(verbose))
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_writer(std::io::stderr),
        )
        .try_init();
    if let Err(err) = result {
        eprintln!("Failed to initialize logging: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_library_info() {
        assert!(default_directives(true).contains("fts_lib=info"));
        assert_eq!(default_directives(false), "warn");
    }
}
