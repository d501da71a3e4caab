//! Reads Ingresses from Kubernetes manifests.
//!
//! A manifest holds one or more YAML (or JSON) documents. Each document is
//! either an Ingress or a list whose items are read in turn; everything else
//! is skipped.

use crate::k8s::Ingress;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;

/// The API version of the Ingress resources that can be converted.
const INGRESS_API_VERSION: &str = "networking.k8s.io/v1";

/// Namespace given to Ingresses that don't name one, as `kubectl apply` would.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Reads a manifest file, or stdin when `path` is `-`.
pub fn read(path: &Path) -> Result<Vec<Ingress>> {
    let contents = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    let ingresses =
        parse(&contents).with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), ingresses = ingresses.len(), "Read manifest");
    Ok(ingresses)
}

/// Parses every Ingress in a multi-document manifest.
pub fn parse(contents: &str) -> Result<Vec<Ingress>> {
    let mut ingresses = Vec::new();
    for (index, document) in serde_yaml::Deserializer::from_str(contents).enumerate() {
        let value = Value::deserialize(document)
            .with_context(|| format!("invalid document at index {index}"))?;
        collect(value, &mut ingresses)?;
    }
    Ok(ingresses)
}

fn collect(value: Value, ingresses: &mut Vec<Ingress>) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }

    let kind = value
        .get("kind")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    match kind.as_str() {
        "Ingress" => {
            let api_version = value
                .get("apiVersion")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if api_version != INGRESS_API_VERSION {
                tracing::warn!(%api_version, "Skipping Ingress with unsupported API version");
                return Ok(());
            }

            let mut ingress =
                serde_yaml::from_value::<Ingress>(value).context("invalid Ingress")?;
            ingress
                .metadata
                .namespace
                .get_or_insert_with(|| DEFAULT_NAMESPACE.to_string());
            ingresses.push(ingress);
        }

        "List" | "IngressList" => {
            let items = value
                .get("items")
                .and_then(Value::as_sequence)
                .cloned()
                .unwrap_or_default();
            for item in items {
                collect(item, ingresses)?;
            }
        }

        kind => tracing::debug!(%kind, "Skipping document"),
    }

    Ok(())
}
