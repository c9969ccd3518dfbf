use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ailab", version, about = "AI services lab samples")]
struct Cli {
    /// Settings file to use instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Log requests and responses to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the clock for the time, the day, or the date
    Clock {
        #[command(subcommand)]
        action: commands::clock::ClockAction,
    },
    /// Analyze the text files in a folder
    Analyze {
        /// Folder containing *.txt files
        folder: PathBuf,
    },
    /// Ask a knowledge base questions
    Qna,
    /// Classify the text files in a folder
    Classify {
        /// Folder containing *.txt files
        folder: PathBuf,
    },
    /// Translate text interactively
    Translate,
    /// Answer a spoken "what time is it?" out loud
    SpeakingClock {
        /// Recorded command (16-bit PCM mono WAV)
        #[arg(long)]
        input: PathBuf,
        /// Where to write the spoken answer
        #[arg(long, default_value = "output.wav")]
        output: PathBuf,
    },
    /// Translate a recorded utterance and speak the translation
    SpeechTranslate {
        /// Recorded utterance (16-bit PCM mono WAV)
        #[arg(long)]
        input: PathBuf,
        /// Folder for the spoken translations
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Show which services are configured
    Status,
    /// Settings management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("AILAB_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = cli.settings.as_deref();
    let result = match cli.command {
        Commands::Clock { action } => commands::clock::run(action, settings),
        Commands::Analyze { folder } => commands::analyze::run(&folder, settings),
        Commands::Qna => commands::qna::run(settings),
        Commands::Classify { folder } => commands::classify::run(&folder, settings),
        Commands::Translate => commands::translate::run(settings),
        Commands::SpeakingClock { input, output } => {
            commands::speaking_clock::run(&input, &output, settings)
        }
        Commands::SpeechTranslate { input, output_dir } => {
            commands::speech_translate::run(&input, &output_dir, settings)
        }
        Commands::Status => commands::status::run(settings),
        Commands::Config { action } => commands::config::run(action, settings),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
