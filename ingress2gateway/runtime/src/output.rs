//! Renders converted resources.

use crate::{core::Output, OutputFormat};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

/// Writes every Gateway followed by every HTTPRoute.
pub fn write<W: Write>(format: OutputFormat, output: &Output, mut writer: W) -> Result<()> {
    match format {
        OutputFormat::Yaml => {
            let mut first = true;
            for resource in resources(output)? {
                if !first {
                    writer.write_all(b"---\n")?;
                }
                first = false;
                let doc = serde_yaml::to_string(&resource).context("failed to encode YAML")?;
                writer.write_all(doc.as_bytes())?;
            }
        }

        OutputFormat::Json => {
            let list = serde_json::json!({
                "apiVersion": "v1",
                "kind": "List",
                "items": resources(output)?,
            });
            serde_json::to_writer_pretty(&mut writer, &list).context("failed to encode JSON")?;
            writer.write_all(b"\n")?;
        }
    }

    writer.flush().context("failed to flush output")
}

fn resources(output: &Output) -> Result<Vec<serde_json::Value>> {
    let gateways = output.gateways.iter().map(to_value);
    let routes = output.http_routes.iter().map(to_value);
    gateways.chain(routes).collect()
}

fn to_value<T: Serialize>(resource: &T) -> Result<serde_json::Value> {
    serde_json::to_value(resource).context("failed to encode resource")
}
