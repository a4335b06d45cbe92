use std::path::PathBuf;

use argh::FromArgs;
use log::LevelFilter;

use crate::memory::DEFAULT_BANK_CAPACITY;

/// Block RAM memory generator for fixed-function lookup tables.
#[derive(FromArgs)]
pub struct Opts {
    /// YAML configuration file
    #[argh(positional)]
    pub config_file: PathBuf,

    /// FPCore file with the function to tabulate
    #[argh(positional)]
    pub function_file: PathBuf,

    /// directory to store generated files
    #[argh(option, short = 'w', default = "PathBuf::from(\".\")")]
    pub working_dir: PathBuf,

    /// capacity of one block RAM in bits
    #[argh(option, default = "DEFAULT_BANK_CAPACITY")]
    pub bank_capacity: u64,

    /// maximum number of synthesis runs in flight
    #[argh(option, short = 'j', default = "1")]
    pub max_concurrent_runs: u64,

    /// skip the confirmation prompt
    #[argh(switch, short = 'y')]
    pub suppress_confirmation: bool,

    /// logging level
    #[argh(option, long = "log", default = "LevelFilter::Info")]
    pub log_level: LevelFilter,
}

impl Opts {
    /// Parse options from `env::args`.
    pub fn parse() -> Opts {
        argh::from_env()
    }
}
