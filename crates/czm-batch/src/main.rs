//! `czm-batch` command-line entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use czm_batch::{BatchConfig, BatchGenerator, LogRecord, VariantId, LOG_HEADER};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let config_arg = Arg::new("config")
        .long("config")
        .short('c')
        .value_parser(value_parser!(PathBuf))
        .help("TOML configuration file (defaults apply to missing fields)");
    let count_arg = Arg::new("count")
        .long("count")
        .short('n')
        .value_parser(value_parser!(usize))
        .help("Number of variants to generate");

    Command::new("czm-batch")
        .version(czm_batch::VERSION)
        .about("Cohesive-zone stiffness sweep generator for Abaqus input decks")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(
            Command::new("generate")
                .about("Write one input deck per parameter triple plus the assignment log")
                .arg(config_arg.clone())
                .arg(count_arg.clone())
                .arg(
                    Arg::new("template")
                        .long("template")
                        .short('t')
                        .value_parser(value_parser!(PathBuf))
                        .help("Template input deck"),
                )
                .arg(
                    Arg::new("output-dir")
                        .long("output-dir")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory receiving the variants and the log"),
                )
                .arg(
                    Arg::new("strict-marker")
                        .long("strict-marker")
                        .action(ArgAction::SetTrue)
                        .help("Fail unless the template yields exactly one substitution"),
                ),
        )
        .subcommand(
            Command::new("sample")
                .about("Print the sampled triples in log format without writing files")
                .arg(config_arg)
                .arg(count_arg),
        )
        .subcommand(Command::new("config").about("Print the default configuration as TOML"))
}

/// `--verbose` forces `debug`; otherwise `RUST_LOG` applies, falling back to `warn`
fn env_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn init_tracing(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(args: &ArgMatches) -> anyhow::Result<BatchConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => BatchConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => BatchConfig::default(),
    };

    if let Some(count) = args.get_one::<usize>("count") {
        config = config.with_variant_count(*count);
    }
    if let Ok(Some(template)) = args.try_get_one::<PathBuf>("template") {
        config = config.with_template(template);
    }
    if let Ok(Some(dir)) = args.try_get_one::<PathBuf>("output-dir") {
        config = config.with_output_dir(dir);
    }
    if let Ok(Some(true)) = args.try_get_one::<bool>("strict-marker") {
        config = config.with_strict_marker(true);
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("generate", args)) => {
            let config = resolve_config(args)?;
            let generator = BatchGenerator::new(config).context("invalid batch configuration")?;
            generator
                .run_with_progress(|v| println!("Created {}", v.file_name()))
                .context("batch generation aborted")?;
            println!("Batch generation finished.");
        }
        Some(("sample", args)) => {
            let config = resolve_config(args)?;
            let generator = BatchGenerator::new(config).context("invalid batch configuration")?;
            println!("{LOG_HEADER}");
            for (index, triple) in generator.preview()?.into_iter().enumerate() {
                let record = LogRecord {
                    variant: VariantId::from_index(index),
                    triple,
                };
                println!("{record}");
            }
        }
        Some(("config", _)) => {
            print!("{}", BatchConfig::default().to_toml_string()?);
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}
