//! meshbuild CLI - resolve the NGINX Service Mesh chart and CRD extraction config

use clap::{Parser, Subcommand};
use meshbuild_core::NGINX_SERVICE_MESH;
use meshbuild_repo::BuildConfig;
use std::path::{Path, PathBuf};

mod commands;
mod display;
mod error;
mod exit_codes;
mod logging;

use commands::config::OutputFormat;
use error::{CliError, Result};

#[derive(Parser)]
#[command(name = "meshbuild")]
#[command(author = "meshbuild Contributors")]
#[command(version)]
#[command(about = "Resolve mesh chart versions and CRD extraction settings", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Build configuration file (YAML); defaults describe nginx-service-mesh
    #[arg(short, long, global = true, env = "MESHBUILD_CONFIG")]
    config: Option<PathBuf>,

    /// Directory that relative paths are resolved against
    #[arg(long, global = true)]
    work_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the latest chart version and derived build settings
    Resolve {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all chart versions found in the source tree
    Versions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the CRD extraction config for a mesh version
    Config {
        /// Mesh (application) version
        mesh_version: String,

        /// Mesh name
        #[arg(long, default_value = NGINX_SERVICE_MESH)]
        mesh_name: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Extract resource definitions from a rendered manifest
    Extract {
        /// Manifest file (multi-document YAML)
        manifest: PathBuf,

        /// Mesh (application) version to record
        #[arg(long, default_value = "unknown")]
        mesh_version: String,

        /// Mesh name
        #[arg(long, default_value = NGINX_SERVICE_MESH)]
        mesh_name: String,

        /// Split only on lines consisting of '---'
        #[arg(long)]
        marker_split: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<BuildConfig> {
    BuildConfig::load_or_default(path).map_err(|e| match path {
        Some(path) => CliError::config_with_help(
            e.to_string(),
            format!("Fix or remove {}", path.display()),
        ),
        None => e.into(),
    })
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::internal(format!("failed to start runtime: {}", e)))
}

fn run(cli: Cli) -> Result<()> {
    let work_dir = match cli.work_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Resolve { json } => {
            let config = load_config(cli.config.as_deref())?;
            runtime()?.block_on(commands::resolve::run(&config, &work_dir, json))
        }

        Commands::Versions { json } => {
            let config = load_config(cli.config.as_deref())?;
            runtime()?.block_on(commands::versions::run(&config, json))
        }

        Commands::Config {
            mesh_version,
            mesh_name,
            output,
        } => commands::config::run(&mesh_name, &mesh_version, output),

        Commands::Extract {
            manifest,
            mesh_version,
            mesh_name,
            marker_split,
            json,
        } => commands::extract::run(
            &work_dir.join(manifest),
            &mesh_name,
            &mesh_version,
            marker_split,
            json,
        ),
    }
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    logging::init(cli.debug);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
