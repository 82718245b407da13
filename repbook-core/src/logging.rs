use std::io::Write;

use log::LevelFilter;

/// Dependency targets that are only interesting when something goes wrong.
const QUIET_TARGETS: &[&str] = &["r2d2", "hyper", "hyper_util", "mio"];

/// Installs the stdout logger (`LEVEL: target - message`). A second call only
/// adjusts the maximum level.
pub fn init_logger(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{}: {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stdout)
        .filter_level(level);
    for target in QUIET_TARGETS {
        builder.filter_module(target, level.min(LevelFilter::Warn));
    }

    let _ = builder.try_init();
    log::set_max_level(level);
}

pub fn parse_level(level: &str) -> Option<LevelFilter> {
    let lvl = match level.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => return None,
    };
    Some(lvl)
}

/// Installs the logger at the named level. Returns false for an unknown level name.
pub fn set_log_level(level: &str) -> bool {
    match parse_level(level) {
        Some(lvl) => {
            init_logger(lvl);
            true
        }
        None => false,
    }
}
