//! # CLI Module
//!
//! Command-line surface for the exporter binary.
//!
//! ## Commands
//!
//! ### `export`
//!
//! Export both document variants from a route manifest:
//!
//! ```bash
//! apigw-export export --manifest routes.yaml \
//!     --title "files api" --api-version 1.2.0 \
//!     --out-gateway openapi.gateway.json --out-public openapi.public.json
//! ```
//!
//! The OpenAPI document version and the allowed CORS origins can also come
//! from the `OPENAPI_VERSION` and `CORS_ORIGINS` environment variables.

use crate::cors::CorsSettings;
use crate::export::Exporter;
use crate::integration::IntegrationRegistry;
use crate::manifest::Manifest;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "apigw-export")]
#[command(about = "Export AWS API Gateway and public OpenAPI documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export the gateway and public documents from a route manifest
    Export {
        /// Route manifest (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// API title for the info block; the manifest value wins if set
        #[arg(short, long, default_value = "untitled")]
        title: String,

        /// API version for the info block; the manifest value wins if set
        #[arg(long, default_value = "0.0.1")]
        api_version: String,

        /// OpenAPI document version
        #[arg(long, env = "OPENAPI_VERSION", default_value = "3.0.1")]
        openapi_version: String,

        /// Allowed CORS origins
        #[arg(long, env = "CORS_ORIGINS", default_value = "*")]
        cors_origins: String,

        /// Skip CORS synthesis entirely
        #[arg(long, default_value_t = false)]
        no_cors: bool,

        /// Output path for the gateway document
        #[arg(long, default_value = "openapi.gateway.json")]
        out_gateway: PathBuf,

        /// Output path for the public document
        #[arg(long, default_value = "openapi.public.json")]
        out_public: PathBuf,
    },
}

pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Export {
            manifest,
            title,
            api_version,
            openapi_version,
            cors_origins,
            no_cors,
            out_gateway,
            out_public,
        } => {
            let manifest = Manifest::from_path(manifest)?;
            let table = manifest.build()?;
            info!(routes = table.len(), "loaded route manifest");

            let cors = if *no_cors {
                None
            } else {
                Some(CorsSettings::new(cors_origins.clone()))
            };

            let exporter = Exporter::new(IntegrationRegistry::builtin())
                .title(manifest.title.clone().unwrap_or_else(|| title.clone()))
                .version(manifest.version.clone().unwrap_or_else(|| api_version.clone()))
                .openapi_version(openapi_version.clone())
                .cors(cors);

            exporter.write_documents(&table, out_gateway, out_public)
        }
    }
}
