use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;
use std::sync::Arc;

use mamasave_classifiers::load_predictor;
use mamasave_cli::batch::run_batch;
use mamasave_cli::config::ServeConfig;
use mamasave_cli::server;

fn artifact_arg(required: bool) -> Arg {
    Arg::new("artifact")
        .short('a')
        .long("artifact")
        .help("Path to the model artifact (*.json) holding the pipeline and label encoder")
        .required(required)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("MAMASAVE_LOG", "error,mamasave=info"))
        .init();

    let matches = Command::new("mamasave")
        .version(clap::crate_version!())
        .about("MamaSave maternal risk inference service")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("serve")
                .about("Serve risk predictions over HTTP")
                .arg(
                    Arg::new("config")
                        .help("Path to a JSON server configuration file")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(artifact_arg(false))
                .arg(
                    Arg::new("host")
                        .long("host")
                        .help("Address to bind. Overrides the configuration file.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::Hostname),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .help("Port to listen on. Overrides the configuration file and $PORT.")
                        .value_parser(clap::value_parser!(u16)),
                )
                .arg(
                    Arg::new("no_cors")
                        .long("no-cors")
                        .help("Disable the permissive CORS layer.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("predict")
                .about("Predict risk for every reading in a CSV/TSV file")
                .arg(artifact_arg(true))
                .arg(
                    Arg::new("input")
                        .help("Path to the readings file (*.csv or *.tsv) with one column per feature")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path to write predictions (*.csv or *.tsv). Defaults to stdout.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Validate a model artifact and print its summary as JSON")
                .arg(artifact_arg(true)),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("serve", sub_m)) => handle_serve(sub_m),
        Some(("predict", sub_m)) => handle_predict(sub_m),
        Some(("inspect", sub_m)) => handle_inspect(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_serve(matches: &ArgMatches) -> Result<()> {
    let config_path: Option<&PathBuf> = matches.get_one("config");
    match config_path {
        Some(path) => log::info!("[MamaSave::Serve] Using config: {:?}", path),
        None => log::info!("[MamaSave::Serve] No config provided; using defaults."),
    }
    let config = ServeConfig::from_arguments(config_path, matches)?;

    let predictor = match load_predictor(&config.artifact_path) {
        Ok(p) => Arc::new(p),
        Err(e) => {
            log::error!("Failed to load model artifact: {:#}", e);
            std::process::exit(1)
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(server::serve(&config, predictor))
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let artifact: &PathBuf = matches
        .get_one("artifact")
        .context("--artifact is required")?;
    let input: &PathBuf = matches.get_one("input").context("input file is required")?;
    let output: Option<&PathBuf> = matches.get_one("output_file");

    let predictor = load_predictor(artifact)?;
    match run_batch(&predictor, input, output.map(PathBuf::as_path)) {
        Ok(n) => {
            eprintln!("[MamaSave::Predict] Completed {} predictions.", n);
            Ok(())
        }
        Err(e) => {
            log::error!("Prediction failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_inspect(matches: &ArgMatches) -> Result<()> {
    let artifact: &PathBuf = matches
        .get_one("artifact")
        .context("--artifact is required")?;
    let predictor = load_predictor(artifact)?;
    println!("{}", serde_json::to_string_pretty(predictor.info())?);
    Ok(())
}
