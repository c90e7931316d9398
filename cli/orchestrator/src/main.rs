//! korpc
//!
//! One binary, two roles. Invoked by protoc it is a plugin: a request on
//! stdin, a response on stdout. Invoked by a developer it plans and runs the
//! protoc invocations that generate a repository's gRPC services.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};
use config::{Config, ConfigError};
use korpc_cli::{
    build_registry, layout_parameters, plugin_config, resolve_toolchain, run_plugin, CliError, Result,
};
use parameter::Parameters;
use pipeline::{generate, standard_invocations, SystemRunner};

/// Command-line interface configuration for korpc.
#[derive(Parser, Debug)]
#[command(name = "korpc", about = "protoc plugin and driver for per-method gRPC services", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Commands>,
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Available korpc commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve one protoc plugin request from stdin
    Plugin,
    /// List the registered generators
    Generators,
    /// Print the protoc commands a full generation runs
    Plan(LayoutArgs),
    /// Run protoc for every standard invocation
    Generate(LayoutArgs),
}

/// Layout overrides shared by `plan` and `generate`.
#[derive(Args, Debug)]
struct LayoutArgs {
    /// Go import path of the repository root
    #[arg(long)]
    base: Option<String>,
    /// Directory for generated code and config
    #[arg(long = "gen")]
    gen_dir: Option<String>,
    /// Directory for method implementations
    #[arg(long = "methods")]
    methods_dir: Option<String>,
    /// Host the gateway serves
    #[arg(long)]
    domain: Option<String>,
    /// Kubernetes namespace
    #[arg(long)]
    namespace: Option<String>,
    /// Proto files, relative to the repository root
    #[arg(required = true)]
    protos: Vec<String>,
}

impl LayoutArgs {
    fn apply(&self, mut layout: Parameters) -> Parameters {
        let overrides = [
            (&self.base, &mut layout.base),
            (&self.gen_dir, &mut layout.gen_dir),
            (&self.methods_dir, &mut layout.methods_dir),
            (&self.domain, &mut layout.domain),
            (&self.namespace, &mut layout.namespace),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                field.clone_from(value);
            }
        }
        layout
    }
}

fn main() {
    let cli = Cli::parse();

    let loaded = Config::load(cli.config.as_deref());
    let base_level = loaded.as_ref().map(|c| c.logging.level.clone()).unwrap_or_else(|_| "info".to_string());
    logging::init(logging::level_for_verbosity(&base_level, cli.verbose));

    let result = match cli.cmd {
        Some(Commands::Plugin) => serve_plugin(loaded),
        None if !std::io::stdin().is_terminal() => serve_plugin(loaded),
        None => {
            // Nothing piped in: a person ran us without a command.
            let _ = Cli::command().print_help();
            Ok(())
        }
        Some(Commands::Generators) => loaded.map_err(CliError::from).and_then(|config| list_generators(&config)),
        Some(Commands::Plan(args)) => loaded.map_err(CliError::from).and_then(|config| plan(&args, &config)),
        Some(Commands::Generate(args)) => {
            loaded.map_err(CliError::from).and_then(|config| generate_all(&args, &config))
        }
    };
    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn serve_plugin(loaded: std::result::Result<Config, ConfigError>) -> Result<()> {
    run_plugin(&plugin_config(loaded), std::io::stdin().lock(), std::io::stdout().lock())
}

fn list_generators(config: &Config) -> Result<()> {
    let registry = build_registry(resolve_toolchain(config)?);
    for name in registry.names() {
        if let Some(generator) = registry.lookup(&name) {
            println!("{:<12} {}", name, generator.description());
        }
    }
    Ok(())
}

fn plan(args: &LayoutArgs, config: &Config) -> Result<()> {
    let toolchain = resolve_toolchain(config)?;
    let layout = args.apply(layout_parameters(config));
    for invocation in standard_invocations(&layout) {
        println!("# {} -> {}", invocation.parameters.name, invocation.out_dir());
        println!("{}", invocation.command(&toolchain, &args.protos));
    }
    Ok(())
}

fn generate_all(args: &LayoutArgs, config: &Config) -> Result<()> {
    let toolchain = resolve_toolchain(config)?;
    let layout = args.apply(layout_parameters(config));
    let pending = generate(Path::new("."), &layout, &toolchain, &args.protos, &SystemRunner)?;
    tracing::info!("korpc code-generation complete.");
    for dir in pending {
        tracing::info!("To expand {dir} run:\n  go generate ./{dir}/...");
    }
    tracing::info!(
        "To generate the skeleton for a single newly-added method run:\n  go generate ./{}/<service>/<method>",
        path::join(&[&layout.methods_dir])
    );
    Ok(())
}
