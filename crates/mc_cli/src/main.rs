use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use mc_defs::MacroRegistry;
use mc_expand::Expander;
use tracing_subscriber::EnvFilter;

mod batch;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "mcproc", about = "mcproc — expand @M macro invocations in source files")]
struct Cli {
    /// JSON config file (syntax characters, override rules, depth limit).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// More logging; repeat for more detail. RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate every `-mc` file in each directory using its `.ini` definitions.
    Process {
        /// Directories to process (current directory if omitted).
        dirs: Vec<PathBuf>,
        /// Write translated files here instead of next to their sources.
        #[arg(short, long)]
        outdir: Option<PathBuf>,
        /// Also load definitions from this subdirectory.
        #[arg(long, visible_alias = "var")]
        variant: Option<String>,
        /// Print every translated file.
        #[arg(short)]
        p: bool,
    },
    /// Translate a single file.
    Translate {
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Definition files, loaded in order.
        #[arg(long = "defs", required = true, num_args = 1..)]
        defs: Vec<PathBuf>,
    },
    /// Load definition files and report conflicts or parse errors.
    Check {
        #[arg(long = "defs", required = true, num_args = 1..)]
        defs: Vec<PathBuf>,
    },
    /// List loaded macros in definition order.
    List {
        #[arg(long = "defs", required = true, num_args = 1..)]
        defs: Vec<PathBuf>,
        /// Dump the definitions as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn load_registry(defs: &[PathBuf], config: &Config) -> Result<MacroRegistry> {
    let mut registry = MacroRegistry::with_policy(config.override_rules.clone());
    registry.load_all(defs)?;
    Ok(registry)
}

fn build_expander<'a>(registry: &'a MacroRegistry, config: &Config) -> Result<Expander<'a>> {
    let mut expander = Expander::new(registry, config.syntax.clone())?;
    if let Some(depth) = config.max_depth {
        expander = expander.with_max_depth(depth);
    }
    Ok(expander)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Process {
            dirs,
            outdir,
            variant,
            p,
        } => {
            let dirs = if dirs.is_empty() {
                vec![std::env::current_dir()?]
            } else {
                dirs
            };
            for dir in &dirs {
                println!("Processing macros in directory: {}", dir.display());
                let out = outdir.as_deref().unwrap_or(dir);
                let outputs = batch::process_directory(dir, out, variant.as_deref(), &config)
                    .with_context(|| format!("failed to process {}", dir.display()))?;
                if p {
                    for output in &outputs {
                        print_translated(output)?;
                    }
                }
            }
        }
        Commands::Translate {
            input,
            output,
            defs,
        } => {
            let registry = load_registry(&defs, &config)?;
            let expander = build_expander(&registry, &config)?;
            match &output {
                Some(path) => expander.translate_file(&input, path)?,
                None => {
                    let source = std::fs::read_to_string(&input)
                        .with_context(|| format!("failed to read {}", input.display()))?;
                    print!("{}", expander.translate_str(&source, &input)?);
                }
            }
        }
        Commands::Check { defs } => {
            let registry = load_registry(&defs, &config)?;
            eprintln!("OK: {} macros", registry.len());
        }
        Commands::List { defs, json } => {
            let registry = load_registry(&defs, &config)?;
            if json {
                let all: Vec<_> = registry.iter().collect();
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                for def in registry.iter() {
                    println!(
                        "{}({}) [{}] {}",
                        def.name,
                        def.parameters.join(", "),
                        def.kind,
                        def.origin_scope.display()
                    );
                }
            }
        }
    }

    Ok(())
}

fn print_translated(path: &Path) -> Result<()> {
    let absolute = std::path::absolute(path)?;
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    println!("{}", batch::render_listing(&absolute, &contents));
    Ok(())
}
