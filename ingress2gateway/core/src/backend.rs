use crate::Error;
use ingress2gateway_k8s_api::{HTTPRouteRulesBackendRefs, IngressBackend};

/// An Ingress backend, with exactly one of its shapes populated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    Service {
        name: String,
        port: Option<ServicePort>,
    },
    Resource {
        group: Option<String>,
        kind: String,
        name: String,
    },
}

/// References a service's port by name or number.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ServicePort {
    Number(i32),
    Name(String),
}

// === impl Backend ===

impl Backend {
    /// Returns `None` when the backend references neither a service nor a
    /// resource.
    pub fn from_ingress(backend: &IngressBackend) -> Option<Self> {
        if let Some(service) = backend.service.as_ref() {
            let port = service.port.as_ref().and_then(|port| {
                match (port.name.as_deref(), port.number) {
                    (Some(name), _) if !name.is_empty() => {
                        Some(ServicePort::Name(name.to_string()))
                    }
                    (_, Some(number)) => Some(ServicePort::Number(number)),
                    _ => None,
                }
            });
            return Some(Self::Service {
                name: service.name.clone(),
                port,
            });
        }

        backend.resource.as_ref().map(|resource| Self::Resource {
            group: resource.api_group.clone(),
            kind: resource.kind.clone(),
            name: resource.name.clone(),
        })
    }

    /// Translates the backend into an unweighted Gateway API reference.
    pub fn to_backend_ref(&self) -> Result<HTTPRouteRulesBackendRefs, Error> {
        let backend_ref = match self {
            Self::Service {
                name,
                port: Some(ServicePort::Name(port)),
            } => {
                return Err(Error::UnsupportedNamedPort {
                    service: name.clone(),
                    port: port.clone(),
                })
            }
            Self::Service { name, port } => HTTPRouteRulesBackendRefs {
                name: name.clone(),
                port: match port {
                    Some(ServicePort::Number(number)) => Some(*number),
                    _ => None,
                },
                ..Default::default()
            },
            Self::Resource { group, kind, name } => HTTPRouteRulesBackendRefs {
                group: group.clone(),
                kind: Some(kind.clone()),
                name: name.clone(),
                ..Default::default()
            },
        };
        Ok(backend_ref)
    }
}

/// Resolves an Ingress backend into a Gateway API reference.
pub(crate) fn resolve(
    namespace: &str,
    ingress_name: &str,
    backend: &IngressBackend,
) -> Result<HTTPRouteRulesBackendRefs, Error> {
    Backend::from_ingress(backend)
        .ok_or_else(|| Error::MissingBackend {
            namespace: namespace.to_string(),
            name: ingress_name.to_string(),
        })?
        .to_backend_ref()
}
