//! Runtime setup: logging, thread pool and stack sizes.

/// Rayon thread stack size (8MB for deeply nested syntax trees)
const RAYON_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Main worker thread stack size (16MB for recursive tree walks)
pub const MAIN_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Map `-v` occurrences to a level filter; `RUST_LOG` still wins when set.
pub fn log_level(verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

pub fn init_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log_level(verbosity));
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    // A second init (tests, embedding) keeps the first logger.
    let _ = builder.format_timestamp(None).try_init();
}

/// Configure rayon global thread pool once at startup
pub fn configure_thread_pool(jobs: usize) {
    let mut builder = rayon::ThreadPoolBuilder::new().stack_size(RAYON_STACK_SIZE);

    if jobs > 0 {
        builder = builder.num_threads(jobs);
    }

    if let Err(e) = builder.build_global() {
        log::debug!("Thread pool already configured: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(log_level(0), log::LevelFilter::Warn);
        assert_eq!(log_level(1), log::LevelFilter::Info);
        assert_eq!(log_level(2), log::LevelFilter::Debug);
        assert_eq!(log_level(7), log::LevelFilter::Trace);
    }
}
