use thiserror::Error;

/// A non-fatal failure to translate part of an Ingress.
///
/// Conversion never stops at the first error: the offending path, backend, or
/// gateway is left out and everything else is still produced.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Only `Prefix` and `Exact` paths have a Gateway API equivalent.
    #[error("unsupported path match type {path_type:?} for path {path:?}")]
    UnsupportedPathType { path: String, path_type: String },

    /// Gateway API backend references only accept numeric ports.
    #[error("named ports not supported: service {service} references port {port:?}")]
    UnsupportedNamedPort { service: String, port: String },

    #[error("error generating Gateway listeners for key: {key}")]
    MalformedGatewayKey { key: String },

    /// The backend references neither a service nor a resource.
    #[error("ingress {namespace}/{name} has a backend with neither a service nor a resource")]
    MissingBackend { namespace: String, name: String },
}
