use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use log::{debug, warn, LevelFilter};
use sahrisk::config::{CalculatorConfig, OutputFormat};
use sahrisk::export::{export_assessment, export_to_dir};
use sahrisk::render::{render_json, render_models_json, render_models_text, render_text};
use sahrisk::{assess, published_models, AssessError, FormInput};

const EXIT_INVALID_INPUT: i32 = 1;
const EXIT_IO: i32 = 2;
const EXIT_INTERNAL: i32 = 3;

#[derive(Debug, Parser)]
#[command(
    name = "sahrisk",
    version,
    about = "Seizure risk calculator for aneurysmal subarachnoid hemorrhage",
    long_about = "sahrisk predicts the risk of early and late seizure after aneurysmal\n\
        subarachnoid hemorrhage (aSAH) with four published logistic regression models.\n\
        The two WFNS 4-5 models only apply to patients with a severe presentation.\n\n\
        EXAMPLES:\n\
        \n  sahrisk assess --input patient.json              Assess a patient from a JSON form\n\
        \n  sahrisk assess -F age=60 -F sex=f -F wfns=4 ...   Assess from individual fields\n\
        \n  sahrisk assess --input patient.json --csv          Also export a CSV row\n\
        \n  sahrisk models --format json                       List the published models",
    after_help = "Required fields: age, sex, wfns, mfisher, crp, ld, clipping, early_seizure, \
        eeg_abnormal, hcp, ich"
)]
struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./sahrisk.toml when present)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a patient's form values and compute seizure risk
    Assess(AssessArgs),

    /// List the published risk models and their coefficients
    Models(ModelsArgs),

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Args, Clone)]
struct AssessArgs {
    /// JSON object of form fields ('-' reads stdin)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Form field as KEY=VALUE; repeatable, overrides values from --input
    #[arg(short = 'F', long = "field", value_name = "KEY=VALUE")]
    fields: Vec<String>,

    /// Output format (overrides the configuration file)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Decimal places for scores and probabilities
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(0..=6))]
    precision: Option<u8>,

    /// Also export a CSV row; without PATH, writes into the configured export directory
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    csv: Option<Option<PathBuf>>,
}

#[derive(Debug, Args, Clone)]
struct ModelsArgs {
    /// Output format (overrides the configuration file)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .try_init();
}

fn read_input(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

/// Collects the form from `--input` and `--field`, reporting failures as an exit code.
fn read_form(args: &AssessArgs) -> Result<FormInput, i32> {
    let mut form = FormInput::new();
    if let Some(path) = &args.input {
        let text = read_input(path).map_err(|e| {
            eprintln!("error: failed to read '{}': {e}", path.display());
            EXIT_IO
        })?;
        form = FormInput::from_json_str(&text).map_err(|e| {
            eprintln!("error: {e}");
            EXIT_INVALID_INPUT
        })?;
    }
    let overrides = FormInput::from_pairs(&args.fields).map_err(|e| {
        eprintln!("error: {e}");
        EXIT_INVALID_INPUT
    })?;
    form.merge(overrides);
    debug!("collected {} form field(s)", form.len());
    Ok(form)
}

fn run_assess(args: &AssessArgs, config: &CalculatorConfig) -> i32 {
    let form = match read_form(args) {
        Ok(form) => form,
        Err(rc) => return rc,
    };

    let assessment = match assess(&form) {
        Ok(a) => a,
        Err(AssessError::InvalidInput(err)) => {
            eprintln!("error: the patient form has invalid values");
            for field in err.errors() {
                eprintln!("  {field}");
            }
            return EXIT_INVALID_INPUT;
        }
        Err(err @ AssessError::ModelConfiguration(_)) => {
            eprintln!("error: {err}");
            return EXIT_INTERNAL;
        }
    };

    let export_file = match &args.csv {
        Some(Some(path)) => Some(path.as_path()),
        _ => None,
    };
    for setting in config.shadowed_settings(args.format, args.precision, export_file) {
        warn!("configured {setting} is ignored, overridden on the command line");
    }

    let precision = usize::from(args.precision.unwrap_or(config.output.precision));
    match args.format.unwrap_or(config.output.format) {
        OutputFormat::Text => print!("{}", render_text(&assessment, precision)),
        OutputFormat::Json => match render_json(&assessment) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                return EXIT_INTERNAL;
            }
        },
    }

    if let Some(target) = &args.csv {
        let written = match target {
            Some(path) => export_assessment(&assessment, path, precision).map(|()| path.clone()),
            None => export_to_dir(&assessment, &config.export.directory, precision),
        };
        match written {
            Ok(path) => eprintln!("note: results written to {}", path.display()),
            Err(e) => {
                eprintln!("error: {e}");
                return EXIT_IO;
            }
        }
    }
    0
}

fn run_models(args: &ModelsArgs, config: &CalculatorConfig) -> i32 {
    match args.format.unwrap_or(config.output.format) {
        OutputFormat::Text => print!("{}", render_models_text(published_models())),
        OutputFormat::Json => match render_models_json(published_models()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                return EXIT_INTERNAL;
            }
        },
    }
    0
}

fn run_config(config: &CalculatorConfig) -> i32 {
    match config.to_toml() {
        Ok(text) => {
            print!("{text}");
            0
        }
        Err(e) => {
            eprintln!("error: failed to serialize configuration: {e}");
            EXIT_INTERNAL
        }
    }
}

fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = match CalculatorConfig::discover(cli.config.as_deref(), &cwd) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_IO;
        }
    };

    match cli.command {
        Command::Assess(args) => run_assess(&args, &config),
        Command::Models(args) => run_models(&args, &config),
        Command::Config => run_config(&config),
    }
}

fn main() {
    std::process::exit(run_cli());
}
