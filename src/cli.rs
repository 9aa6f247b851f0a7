//! # Cli
//!
//! Command line argument parsing for the `chiron` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Struct containing the CLI configuration for Chiron.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// The path to the Chiron source file to run.
    #[arg(index = 1)]
    pub file: PathBuf,

    /// Specify the log level of the runtime.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

/// Enum for specifying the log level of the Chiron runtime.
#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    /// The default log level. Only critical errors will be logged.
    #[default]
    #[value(alias("0"))]
    Error,

    /// Also log warnings.
    #[value(alias("1"))]
    Warn,

    /// Also log information about the general state of the runtime, e.g.
    /// which modules are imported.
    #[value(alias("2"))]
    Info,

    /// Log everything which happens internally in the runtime.
    #[value(alias("3"))]
    Debug,

    /// Log extra information, such as scope push/pop at every function call.
    #[value(alias("4"))]
    Trace,
}

impl From<LogLevel> for log::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}
