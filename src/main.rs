// Copyright 2025 coScene
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Result;
use clap::Parser;
use hdbpp_client::config::{load_config_with_env, LoggingConfig};
use hdbpp_client::{register_attributes, HdbClient, HdbppFeature};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// HDB++ client - Load an archiving backend and register attributes with it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/hdbpp.yaml")]
    config: PathBuf,

    /// Client identifier (overrides config file)
    #[arg(short, long)]
    id: Option<String>,

    /// Backend library (overrides the libname entry of the config file)
    #[arg(short, long)]
    libname: Option<String>,

    /// Only load the backend and report its features
    #[arg(long)]
    check: bool,
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let log_level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Standard output is reserved for results and diagnostics
    let builder = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    if logging.format == "json" {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration from file
    let mut client_config = load_config_with_env(&args.config)?;

    // Apply CLI overrides
    if let Some(id) = args.id {
        client_config.backend.id = id;
    }

    if let Some(libname) = args.libname {
        client_config.backend.set_libname(&libname);
    }

    init_logging(&client_config.logging)?;

    info!("Starting HDB++ client");
    info!("Loaded configuration from: {:?}", args.config);
    info!("Client ID: {}", client_config.backend.id);

    let backend = &client_config.backend;
    let mut client = HdbClient::new_or_exit(&backend.id, &backend.configuration);

    for feature in HdbppFeature::ALL {
        println!("{}: {}", feature.as_str(), client.supported(feature));
    }

    if args.check {
        info!("Backend check complete");
        return Ok(());
    }

    let registered = register_attributes(&mut client, &client_config.attributes)?;
    println!(
        "Registered {} attribute(s) with backend {}",
        registered,
        client.libname()
    );

    Ok(())
}
