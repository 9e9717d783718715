/// cli/src/logger.rs
/// description: env_logger setup for the `log` facade used throughout pyll_core.
///
/// Level resolution: `-q` and `-v` flags win, then `PYLL_LOG`
/// (any env_logger filter, e.g. `debug` or `pyll_core::vm=trace`), then `warn`.

use env_logger::Builder;
use log::LevelFilter;

pub const LOG_ENV: &str = "PYLL_LOG";

/// Level requested on the command line, if any.
pub fn flag_level(verbose: u8, quiet: bool) -> Option<LevelFilter> {
    if quiet {
        return Some(LevelFilter::Error);
    }
    match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

/// Base configuration: `warn` overridden by `PYLL_LOG`, then by the flags.
pub fn builder(verbose: u8, quiet: bool) -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .format_timestamp(None)
        .parse_env(LOG_ENV);
    apply_flags(&mut builder, verbose, quiet);
    builder
}

pub fn apply_flags(builder: &mut Builder, verbose: u8, quiet: bool) {
    if let Some(level) = flag_level(verbose, quiet) {
        builder.filter_level(level);
    }
}

/// Install the logger. Calling it twice keeps the first installation.
pub fn init(verbose: u8, quiet: bool) {
    let _ = builder(verbose, quiet).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(filters: &str, verbose: u8, quiet: bool) -> LevelFilter {
        let mut builder = Builder::new();
        builder.filter_level(LevelFilter::Warn).parse_filters(filters);
        apply_flags(&mut builder, verbose, quiet);
        builder.build().filter()
    }

    #[test]
    fn flags_take_priority_over_environment() {
        assert_eq!(configured("trace", 0, true), LevelFilter::Error);
        assert_eq!(configured("error", 2, false), LevelFilter::Debug);
        assert_eq!(configured("", 7, false), LevelFilter::Trace);
    }

    #[test]
    fn environment_filter_applies_without_flags() {
        assert_eq!(configured("debug", 0, false), LevelFilter::Debug);
        assert_eq!(configured("off", 0, false), LevelFilter::Off);
        assert_eq!(configured("", 0, false), LevelFilter::Warn);
    }

    #[test]
    fn flag_levels() {
        assert_eq!(flag_level(0, false), None);
        assert_eq!(flag_level(1, false), Some(LevelFilter::Info));
        assert_eq!(flag_level(3, true), Some(LevelFilter::Error));
    }
}
