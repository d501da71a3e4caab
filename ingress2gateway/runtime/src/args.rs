use crate::{
    core::{self, CanaryExtractor, IngressNginx, NoAnnotations},
    k8s::ResourceExt,
    manifest, output, LogFormat,
};
use anyhow::{bail, Error, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[clap(
    name = "ingress2gateway",
    about = "Converts Ingress resources to Gateway API resources"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "ingress2gateway=info,warn",
        env = "INGRESS2GATEWAY_LOG"
    )]
    log_level: String,

    #[clap(long, default_value = "plain")]
    log_format: LogFormat,

    /// Manifests to read Ingresses from; `-` reads stdin.
    #[clap(short = 'f', long = "input-file", required = true)]
    input_files: Vec<PathBuf>,

    /// Only converts Ingresses in this namespace.
    #[clap(short, long, env = "INGRESS2GATEWAY_NAMESPACE")]
    namespace: Option<String>,

    /// The annotation dialect used for canary traffic splitting.
    #[clap(long, default_value = "ingress-nginx", env = "INGRESS2GATEWAY_PROVIDER")]
    provider: Provider,

    #[clap(short, long, default_value = "yaml")]
    output: OutputFormat,

    /// Fails when any part of an Ingress could not be converted.
    #[clap(long)]
    strict: bool,
}

/// Selects how canary annotations are read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    IngressNginx,
    None,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

// === impl Args ===

impl Args {
    #[inline]
    pub fn parse_and_run() -> Result<()> {
        Self::parse().run()
    }

    pub fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            input_files,
            namespace,
            provider,
            output,
            strict,
        } = self;

        log_format.try_init(&log_level)?;

        let mut ingresses = Vec::new();
        for path in &input_files {
            ingresses.extend(manifest::read(path)?);
        }
        if let Some(ns) = namespace.as_deref() {
            ingresses.retain(|ingress| ingress.namespace().as_deref() == Some(ns));
        }
        info!(ingresses = ingresses.len(), "Converting");

        let converted = core::convert(&ingresses, provider.extractor());
        for error in &converted.errors {
            warn!(%error, "Failed to convert");
        }
        info!(
            gateways = converted.gateways.len(),
            routes = converted.http_routes.len(),
            errors = converted.errors.len(),
            "Converted"
        );

        output::write(output, &converted, std::io::stdout().lock())?;

        if strict && !converted.errors.is_empty() {
            bail!("{} conversion errors", converted.errors.len());
        }
        Ok(())
    }
}

// === impl Provider ===

impl Provider {
    pub fn extractor(self) -> Box<dyn CanaryExtractor> {
        match self {
            Self::IngressNginx => Box::new(IngressNginx),
            Self::None => Box::new(NoAnnotations),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ingress-nginx" => Ok(Self::IngressNginx),
            "none" => Ok(Self::None),
            s => bail!("invalid provider: {s}"),
        }
    }
}

// === impl OutputFormat ===

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "yaml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            s => bail!("invalid output format: {s}"),
        }
    }
}
