use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use smiley_core::detection::infrastructure::azure_face_client::AzureFaceClient;
use smiley_core::imaging::infrastructure::header_image_probe::HeaderImageProbe;
use smiley_core::pipeline::analysis_executor::PhotoAnalyzer;
use smiley_core::pipeline::best_face_use_case::BestFaceUseCase;
use smiley_core::pipeline::infrastructure::threaded_analysis_executor::ThreadedAnalysisExecutor;
use smiley_core::pipeline::submit_batch::{SubmitBatch, SubmitError, SubmitOutcome};
use smiley_core::shared::config::{Config, ConfigError, ConfigOverrides, SettingsFile};

/// Exit status for bad input or configuration.
const EXIT_CLIENT_ERROR: i32 = 2;
/// Exit status for a batch that failed while processing.
const EXIT_FAILURE: i32 = 1;

/// Picks the best photo of the person who appears most often.
#[derive(Parser, Debug)]
#[command(name = "smiley")]
struct Cli {
    /// Image files to analyze.
    files: Vec<PathBuf>,

    /// Face API subscription key (overrides SMILEY_API_KEY).
    #[arg(long)]
    api_key: Option<String>,

    /// Face API base URL, e.g. https://<region>.api.cognitive.microsoft.com/face/v1.0/
    #[arg(long)]
    base_url: Option<String>,

    /// Photos analyzed in parallel.
    #[arg(long)]
    pool_size: Option<usize>,

    /// Seconds to wait for each photo's analysis.
    #[arg(long)]
    timeout: Option<u64>,

    /// Settings file to use instead of the one in the user config directory.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    json_pretty: bool,

    /// Include the source file name and face ratio in the output.
    #[arg(long)]
    show_photo: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(exit_code(e.as_ref()));
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    SubmitBatch::validate(&cli.files)?;

    let config = resolve_config(&cli)?;
    log::debug!("Using {:?}", config.face_api);

    let client = Arc::new(AzureFaceClient::new(&config.face_api)?);
    let use_case = BestFaceUseCase::new(
        PhotoAnalyzer::new(Arc::new(HeaderImageProbe::new()), client.clone()),
        client,
        Box::new(ThreadedAnalysisExecutor::from_settings(&config.pipeline)),
    );

    let outcome = SubmitBatch::new(use_case).submit_paths(&cli.files)?;
    if outcome == SubmitOutcome::NotFound {
        eprintln!("No face found in {} file(s)", cli.files.len());
    }

    let json = outcome.to_json(cli.show_photo);
    if cli.json_pretty {
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{json}");
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<Config, ConfigError> {
    resolve_config_with(cli, |key| std::env::var(key).ok())
}

fn resolve_config_with<F>(cli: &Cli, env: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = match &cli.settings {
        Some(path) => SettingsFile::load_from(path)?,
        None => SettingsFile::load()?,
    };
    let overrides = ConfigOverrides {
        api_key: cli.api_key.clone(),
        base_url: cli.base_url.clone(),
        pool_size: cli.pool_size,
        timeout_secs: cli.timeout,
    };
    Config::resolve_with(&overrides, &settings, env)
}

fn exit_code(error: &(dyn Error + 'static)) -> i32 {
    if let Some(e) = error.downcast_ref::<SubmitError>() {
        if e.is_client_error() {
            return EXIT_CLIENT_ERROR;
        }
    }
    if error.is::<ConfigError>() {
        return EXIT_CLIENT_ERROR;
    }
    EXIT_FAILURE
}
