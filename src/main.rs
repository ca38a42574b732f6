// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use log::{error, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, Args};
use clap_complete::{generate, Shell};

use vttdex::app_config::{self, Config};
use vttdex::app_controller::Controller;
use vttdex::errors::TranscriptError;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert WebVTT caption files into clean plain-text transcripts
    Convert(ConvertArgs),

    /// Build the JSON search index from clean transcripts
    Index(IndexArgs),

    /// Convert, then build the index, using the configured locations
    Run,

    /// Generate shell completions for vttdex
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Directory holding the caption files
    #[arg(value_name = "INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Directory receiving the transcripts
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also look for caption files in subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Do not write transcripts without any caption text
    #[arg(long)]
    skip_empty: bool,
}

#[derive(Args, Debug)]
struct IndexArgs {
    /// Directory holding the clean transcripts
    #[arg(value_name = "CLEAN_DIR")]
    clean_dir: Option<PathBuf>,

    /// Index file to write
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only derive dates and titles for names starting with this source
    #[arg(short, long)]
    source_prefix: Option<String>,
}

/// vttdex - WebVTT transcript cleaner and search indexer
#[derive(Parser, Debug)]
#[command(name = "vttdex")]
#[command(version = "1.0.0")]
#[command(about = "Clean WebVTT captions into transcripts and index them")]
#[command(long_about = "vttdex strips WebVTT markup and rolling-caption repeats from caption files, \
writes one plain-text transcript per file and builds a JSON search index over the transcripts.

EXAMPLES:
    vttdex convert transcripts -o clean_txt      # Clean every .vtt file in transcripts/
    vttdex index clean_txt -o search_data.json   # Index the clean transcripts
    vttdex run                                   # Both steps with locations from conf.json
    vttdex completions bash > vttdex.bash        # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "vttdex", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    match &cli.log_level {
        Some(log_level) => config.log_level = log_level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    let result = match cli.command {
        Commands::Convert(args) => run_convert(config, args),
        Commands::Index(args) => run_index(config, args),
        Commands::Run => {
            let controller = Controller::with_config(config)?;
            let (conversion, index) = controller.run()?;
            report_conversion(&conversion);
            println!("{}", index);
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = &result {
        if let Some(fatal) = e.downcast_ref::<TranscriptError>().filter(|te| te.is_fatal()) {
            error!("Run aborted: {}", fatal);
            std::process::exit(2);
        }
    }
    result
}

fn run_convert(mut config: Config, args: ConvertArgs) -> Result<()> {
    if let Some(input_dir) = args.input_dir {
        config.paths.input_dir = input_dir;
    }
    if let Some(output_dir) = args.output_dir {
        config.paths.output_dir = output_dir;
    }
    config.normalizer.recursive |= args.recursive;
    config.normalizer.skip_empty_transcripts |= args.skip_empty;

    let controller = Controller::with_config(config)?;
    let paths = &controller.config().paths;
    let summary = controller.convert_folder(&paths.input_dir, &paths.output_dir)?;
    report_conversion(&summary);
    info!("Clean transcripts saved in: {:?}", paths.output_dir);
    Ok(())
}

fn run_index(mut config: Config, args: IndexArgs) -> Result<()> {
    let clean_dir = args.clean_dir.unwrap_or_else(|| config.paths.output_dir.clone());
    if let Some(output) = args.output {
        config.paths.index_file = output;
    }
    if args.source_prefix.is_some() {
        config.index.source_prefix = args.source_prefix;
    }

    let controller = Controller::with_config(config)?;
    let summary = controller.build_index(&clean_dir, &controller.config().paths.index_file)?;
    println!("{}", summary);
    Ok(())
}

// @prints: Batch counts on stdout, independent of the log level
fn report_conversion(summary: &vttdex::ConversionSummary) {
    println!("{}", summary);
}
