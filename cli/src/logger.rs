use std::io::Write as _;

use colored::Colorize as _;
use judger_core::style::ColorTheme as _;
use log::LevelFilter;

/// `-q` silences everything below errors; each `-v` goes one level further than info.
pub fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// `RUST_LOG` still wins over the flags.
pub fn init(verbose: u8, quiet: bool) {
    env_logger::Builder::new()
        .format(|buf, record| {
            let level = record.level();
            writeln!(
                buf,
                "{} {}",
                format!("[{:<5}]", level).color(level.color()).bold(),
                record.args()
            )
        })
        .filter_level(level_filter(verbose, quiet))
        .parse_default_env()
        .init();
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn flags_to_level() {
        assert_eq!(level_filter(0, false), LevelFilter::Info);
        assert_eq!(level_filter(1, false), LevelFilter::Debug);
        assert_eq!(level_filter(5, false), LevelFilter::Trace);
        assert_eq!(level_filter(3, true), LevelFilter::Error);
    }
}
