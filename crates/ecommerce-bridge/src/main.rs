//! Ecommerce Bridge
//!
//! Command-line boundary for the JWT resolver and the commerce publisher.
//! Configuration is read from the environment once, at startup, and passed
//! down explicitly.

#![warn(clippy::pedantic)]

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commerce_publisher::{CommercePublisher, CourseView, PublisherConfig};
use jwt_auth::{AuthConfig, MetricsObserver, MultiIssuerResolver, ResolveError, TokenClaims};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "ecommerce-bridge", about = "Verify tokens and publish course commerce data")]
struct Cli {
    /// Print Prometheus metrics to stderr before exiting
    #[arg(long, global = true)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a JWT against the configured issuers and print its claims
    VerifyToken {
        /// The token, or `-` to read it from stdin
        token: String,
    },
    /// Publish a course (JSON file) to the commerce API
    PublishCourse {
        /// Path to a course JSON document
        course: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();

    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus metrics recorder")?;

    let succeeded = match cli.command {
        Commands::VerifyToken { token } => verify_token(&token)?,
        Commands::PublishCourse { course } => publish_course(&course).await?,
    };

    if cli.print_metrics {
        print_metrics(&prometheus_handle);
    }

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ecommerce_bridge=info,jwt_auth=info,commerce=info".into());

    // Structured JSON when LOG_FORMAT=json, human-readable otherwise
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn verify_token(token: &str) -> anyhow::Result<bool> {
    let config = AuthConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load auth configuration");
        e
    })?;

    info!(
        issuers = config.registry.len(),
        verify_audience = config.settings.verify_audience,
        active_switches = config.switches.len(),
        "Auth configuration loaded"
    );

    let token = if token == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read token from stdin")?;
        buf.trim().to_string()
    } else {
        token.to_string()
    };

    let resolver =
        MultiIssuerResolver::new(Arc::new(MetricsObserver), Arc::new(config.switches.clone()));

    report_resolution(resolver.resolve(&token, &config.registry, &config.settings))
}

/// Print resolved claims to stdout, or log the rejection. Returns whether the
/// token was accepted.
fn report_resolution(result: Result<TokenClaims, ResolveError>) -> anyhow::Result<bool> {
    match result {
        Ok(claims) => {
            println!("{}", serde_json::to_string_pretty(&claims)?);
            Ok(true)
        }
        Err(e) => {
            info!(
                target: "ecommerce_bridge",
                error = %e,
                configuration_error = e.is_configuration_error(),
                "Token rejected"
            );
            Ok(false)
        }
    }
}

async fn publish_course(path: &Path) -> anyhow::Result<bool> {
    let config = PublisherConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load publisher configuration");
        e
    })?;

    info!(
        api_url = ?config.api_url,
        api_timeout = ?config.api_timeout,
        "Publisher configuration loaded"
    );

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let course: CourseView = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse course JSON in {}", path.display()))?;

    let publisher = CommercePublisher::new(config)?;
    Ok(publisher.publish(&course).await)
}

fn print_metrics(handle: &PrometheusHandle) {
    eprintln!("{}", handle.render());
}
