use log::LevelFilter;
use log4rs::{
    Config,
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            RollingFileAppender,
            policy::compound::{
                CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
            },
        },
    },
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

const LOG_SIZE_LIMIT: u64 = 10 * 1024 * 1024; // 10 MB

const LOG_FILE_COUNT: u32 = 3;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}";

/// Crates that are too chatty below warn level.
const QUIET_CRATES: [&str; 4] = ["sqlx", "hyper", "reqwest", "teloxide"];

pub struct LogSettings {
    pub file_path: String,
    pub archive_pattern: String,
    pub stderr_level: LevelFilter,
}

impl LogSettings {
    pub fn from_env() -> Self {
        let stderr_level = std::env::var("LOG_STDERR_LEVEL")
            .ok()
            .map(|level| parse_level(&level).expect("LOG_STDERR_LEVEL must be a log level"))
            .unwrap_or(LevelFilter::Info);
        Self {
            file_path: std::env::var("LOG_FILE_PATH").expect("LOG_FILE_PATH must be set"),
            archive_pattern: std::env::var("LOG_ARCHIVE_PATTERN")
                .expect("LOG_ARCHIVE_PATTERN must be set"),
            stderr_level,
        }
    }
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse::<LevelFilter>().ok()
}

fn build_config(settings: &LogSettings) -> Result<Config, Box<dyn std::error::Error>> {
    let file_level = LevelFilter::Debug;

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let trigger = SizeTrigger::new(LOG_SIZE_LIMIT);
    let roller = FixedWindowRoller::builder().build(&settings.archive_pattern, LOG_FILE_COUNT)?;
    let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

    let logfile = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(&settings.file_path, Box::new(policy))?;

    let mut builder = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(file_level)))
                .build("logfile", Box::new(logfile)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(settings.stderr_level)))
                .build("stderr", Box::new(stderr)),
        );
    for name in QUIET_CRATES {
        builder = builder.logger(Logger::builder().build(name, LevelFilter::Warn));
    }

    let config = builder.build(
        Root::builder()
            .appender("logfile")
            .appender("stderr")
            .build(LevelFilter::Trace),
    )?;
    Ok(config)
}

pub fn init_logger() {
    let settings = LogSettings::from_env();
    let config = build_config(&settings).expect("Failed to build logger config");
    let _handle = log4rs::init_config(config).expect("Failed to initialize logger");
}
