use log::LevelFilter;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::{Path, PathBuf};

pub const AUDIT_TARGET: &str = "filelite::audit";

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const ROLL_SIZE: u64 = 10 * 1024 * 1024;
const ROLL_KEEP: u32 = 7;

/// Initializes logging from `log4rs.yaml` in the working directory.
///
/// # Errors
/// Returns an error if the file is missing, invalid, or a logger is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    init_path(Path::new("log4rs.yaml"))
}

/// Initializes logging from a specific log4rs config file.
///
/// # Errors
/// Returns an error if the file is missing, invalid, or a logger is already installed.
pub fn init_path(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    log4rs::init_file(path, log4rs::config::Deserializers::default())?;
    Ok(())
}

fn rolling(dir: &Path, file: &str, archive: &str) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    let roller = FixedWindowRoller::builder().build(&format!("{}", dir.join(archive).display()), ROLL_KEEP)?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE)), Box::new(roller));
    let appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(dir.join(file), Box::new(policy))?;
    Ok(appender)
}

/// Build the rolling-file configuration rooted at `{base_dir}/{store_name}_logs`.
///
/// Application logs go to `{store_name}.log`; write audit lines (target
/// [`AUDIT_TARGET`]) go to `{store_name}_audit.log` only.
///
/// # Errors
/// Returns an error if the directory or appenders cannot be created.
pub fn config_for_store_in(
    base_dir: &Path,
    store_name: &str,
    level: LevelFilter,
) -> Result<Config, Box<dyn std::error::Error>> {
    let mut dir = PathBuf::from(base_dir);
    dir.push(format!("{store_name}_logs"));
    std::fs::create_dir_all(&dir)?;
    let app = rolling(&dir, &format!("{store_name}.log"), &format!("{store_name}.{{}}.log"))?;
    let audit = rolling(&dir, &format!("{store_name}_audit.log"), &format!("{store_name}.audit.{{}}.log"))?;
    let config = Config::builder()
        .appender(Appender::builder().build("app", Box::new(app)))
        .appender(Appender::builder().build("audit", Box::new(audit)))
        .logger(Logger::builder().appender("audit").additive(false).build(AUDIT_TARGET, level))
        .build(Root::builder().appender("app").build(level))?;
    Ok(config)
}

/// Installs [`config_for_store_in`] as the process logger.
///
/// # Errors
/// Returns an error if the configuration cannot be built or a logger is already installed.
pub fn init_for_store_in(base_dir: &Path, store_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_for_store_in(base_dir, store_name, LevelFilter::Info)?;
    log4rs::init_config(config)?;
    Ok(())
}

/// Map a level name to a filter; unknown names fall back to `Info`.
#[must_use]
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}
