//! routelens - CLI for static route discovery.
//!
//! # Usage
//!
//! ```bash
//! # Scan a source tree and write a Postman collection
//! routelens scan --root ./server --framework express --receiver app
//!
//! # Scan with a JSON config file
//! routelens scan --config ./routelens.json
//!
//! # Scan and synchronize with a Postman workspace
//! routelens sync --config ./routelens.json --api-key $POSTMAN_API_KEY --workspace-id <id>
//! ```
//!
//! Designed for automation: `--json` outputs machine-readable summaries,
//! errors go to stderr, exit codes are 0 = success, 1 = error.

use anyhow::Result;
use clap::{Parser, Subcommand};
use routelens::{
    collection, normalize, sync, Config, EndpointDiscovery, Framework,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "routelens")]
#[command(version)]
#[command(about = "Static route discovery - generates Postman collections from source code")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file; CLI flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover endpoints and write the collection file
    Scan {
        /// Root directory of the source tree
        #[arg(long)]
        root: Option<PathBuf>,

        /// Framework family: express, fastify, nest
        #[arg(long)]
        framework: Option<Framework>,

        /// Route-registration object name (e.g. app, router, fastify)
        #[arg(long)]
        receiver: Option<String>,

        /// Base URL prefixed to every request
        #[arg(long)]
        base_url: Option<String>,

        /// Output path for the collection JSON
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Discover and report only; do not write the collection file
        #[arg(long)]
        dry_run: bool,
    },

    /// Discover endpoints, then update or create the workspace collection
    Sync {
        /// Root directory of the source tree
        #[arg(long)]
        root: Option<PathBuf>,

        /// Postman API key
        #[arg(long, env = "POSTMAN_API_KEY")]
        api_key: Option<String>,

        /// Postman workspace id
        #[arg(long)]
        workspace_id: Option<String>,
    },
}

fn main() -> Result<()> {
    // Logging to stderr only, keeping stdout clean for results
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match run_command(&cli) {
        Ok(output) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_human_readable(&output);
            }
            Ok(())
        }
        Err(e) => {
            if cli.json {
                let err = serde_json::json!({ "error": e.to_string() });
                eprintln!("{}", serde_json::to_string_pretty(&err)?);
            } else {
                eprintln!("Error: {}", e);
            }
            std::process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Ok(Config::load(path)?),
        None => Ok(Config::default()),
    }
}

fn run_command(cli: &Cli) -> Result<Output> {
    let mut config = load_config(cli)?;

    match &cli.command {
        Commands::Scan {
            root,
            framework,
            receiver,
            base_url,
            out,
            dry_run,
        } => {
            if let Some(root) = root {
                config.directory_to_scan = root.clone();
            }
            if let Some(framework) = framework {
                config.framework = *framework;
            }
            if let Some(receiver) = receiver {
                config.object_instance = receiver.clone();
            }
            if let Some(base_url) = base_url {
                config.base_url = base_url.clone();
            }
            if let Some(out) = out {
                config.postman_collection_file = out.clone();
            }

            let discovery =
                EndpointDiscovery::new(config.framework, config.object_instance.clone());
            let endpoints = discovery.discover(&config.directory_to_scan)?;
            let groups = normalize::group_by_resource(endpoints);
            let endpoint_count: usize = groups.iter().map(|g| g.endpoints.len()).sum();
            let built = collection::build_collection(
                &groups,
                &config.base_url,
                &config.collection_name,
            );

            let written = if *dry_run {
                None
            } else {
                collection::write_collection(&built, &config.postman_collection_file)?;
                Some(config.postman_collection_file.display().to_string())
            };

            Ok(Output::Scan {
                endpoints: endpoint_count,
                resources: groups.iter().map(|g| g.name.clone()).collect(),
                collection_file: written,
            })
        }

        Commands::Sync {
            root,
            api_key,
            workspace_id,
        } => {
            if let Some(root) = root {
                config.directory_to_scan = root.clone();
            }
            let api_key = api_key
                .clone()
                .or_else(|| config.api_key.clone())
                .ok_or_else(|| anyhow::anyhow!("an API key is required for sync"))?;
            let workspace_id = workspace_id
                .clone()
                .or_else(|| config.workspace_id.clone())
                .ok_or_else(|| anyhow::anyhow!("a workspace id is required for sync"))?;

            let discovery =
                EndpointDiscovery::new(config.framework, config.object_instance.clone());
            let endpoints = discovery.discover(&config.directory_to_scan)?;
            let groups = normalize::group_by_resource(endpoints);
            let built = collection::build_collection(
                &groups,
                &config.base_url,
                &config.collection_name,
            );

            let outcome = sync::sync_collection(&api_key, &workspace_id, &built)?;
            let (action, uid) = match outcome {
                sync::SyncOutcome::Updated { uid } => ("updated", uid),
                sync::SyncOutcome::Created { uid } => ("created", uid),
            };

            Ok(Output::Sync {
                collection: config.collection_name.clone(),
                action: action.to_string(),
                uid,
            })
        }
    }
}

#[derive(serde::Serialize)]
#[serde(tag = "type")]
enum Output {
    Scan {
        endpoints: usize,
        resources: Vec<String>,
        collection_file: Option<String>,
    },
    Sync {
        collection: String,
        action: String,
        uid: String,
    },
}

fn print_human_readable(output: &Output) {
    match output {
        Output::Scan {
            endpoints,
            resources,
            collection_file,
        } => {
            println!(
                "Discovered {} endpoints across {} resources",
                endpoints,
                resources.len()
            );
            for resource in resources {
                println!("  {}", resource);
            }
            match collection_file {
                Some(path) => println!("Collection written to {}", path),
                None => println!("Dry run: collection not written"),
            }
        }
        Output::Sync {
            collection,
            action,
            uid,
        } => {
            println!("Collection \"{}\" {} (uid: {})", collection, action, uid);
        }
    }
}
