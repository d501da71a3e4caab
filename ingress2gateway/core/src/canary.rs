use ingress2gateway_k8s_api::{Ingress, ResourceExt};
use std::collections::BTreeMap;

/// Extracts traffic-splitting metadata from an Ingress.
///
/// Each ingress controller has its own annotation dialect for canary
/// releases. Implementations normalize a dialect into [`Extra`] so that
/// aggregation and route building never look at annotations directly.
pub trait CanaryExtractor {
    fn extract(&self, ingress: &Ingress) -> Extra;
}

/// Provider-specific metadata attached to every rule of one Ingress.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extra {
    pub canary: Option<Canary>,
}

/// Canary settings of an Ingress that is marked as a canary; an Ingress that
/// isn't has no `Canary` at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canary {
    /// Requests carrying this header are sent to the canary.
    pub header: Option<CanaryHeader>,

    /// The share of traffic sent to the canary; zero means unset.
    pub weight: i32,

    pub weight_total: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanaryHeader {
    pub name: String,
    pub value: HeaderValueMatch,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderValueMatch {
    Exact(String),
    Regex(String),
}

/// The `nginx.ingress.kubernetes.io/canary-*` annotations.
#[derive(Clone, Copy, Debug, Default)]
pub struct IngressNginx;

/// Ignores all annotations.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAnnotations;

const NGINX_CANARY: &str = "nginx.ingress.kubernetes.io/canary";
const NGINX_CANARY_BY_HEADER: &str = "nginx.ingress.kubernetes.io/canary-by-header";
const NGINX_CANARY_BY_HEADER_VALUE: &str = "nginx.ingress.kubernetes.io/canary-by-header-value";
const NGINX_CANARY_BY_HEADER_PATTERN: &str =
    "nginx.ingress.kubernetes.io/canary-by-header-pattern";
const NGINX_CANARY_WEIGHT: &str = "nginx.ingress.kubernetes.io/canary-weight";
const NGINX_CANARY_WEIGHT_TOTAL: &str = "nginx.ingress.kubernetes.io/canary-weight-total";

/// Header value nginx matches when only a header name is configured.
const NGINX_CANARY_ALWAYS: &str = "always";

const DEFAULT_WEIGHT_TOTAL: i32 = 100;

// === impl Extra ===

impl Extra {
    pub fn header(&self) -> Option<&CanaryHeader> {
        self.canary.as_ref()?.header.as_ref()
    }

    /// Returns the explicit canary weight, if one was set.
    pub fn weight(&self) -> Option<i32> {
        self.canary
            .as_ref()
            .map(|canary| canary.weight)
            .filter(|weight| *weight != 0)
    }
}

// === impl IngressNginx ===

impl CanaryExtractor for IngressNginx {
    fn extract(&self, ingress: &Ingress) -> Extra {
        Extra {
            canary: nginx_canary(ingress.annotations()),
        }
    }
}

fn nginx_canary(annotations: &BTreeMap<String, String>) -> Option<Canary> {
    let non_empty = |key: &str| annotations.get(key).filter(|v| !v.is_empty());

    if annotations.get(NGINX_CANARY).map(String::as_str) != Some("true") {
        return None;
    }

    let mut value = non_empty(NGINX_CANARY_BY_HEADER_VALUE)
        .cloned()
        .map(HeaderValueMatch::Exact)
        .unwrap_or_else(|| HeaderValueMatch::Exact(NGINX_CANARY_ALWAYS.to_string()));
    if let Some(pattern) = non_empty(NGINX_CANARY_BY_HEADER_PATTERN) {
        value = HeaderValueMatch::Regex(pattern.clone());
    }
    let header = non_empty(NGINX_CANARY_BY_HEADER).map(|name| CanaryHeader {
        name: name.clone(),
        value,
    });

    // Negative weights are ignored like unparseable ones.
    let weight = non_empty(NGINX_CANARY_WEIGHT)
        .map(|weight| match weight.trim().parse::<i32>() {
            Ok(w) if w >= 0 => w,
            Ok(_) => {
                tracing::debug!(%weight, "Ignoring negative canary weight");
                0
            }
            Err(error) => {
                tracing::debug!(%weight, %error, "Ignoring invalid canary weight");
                0
            }
        })
        .unwrap_or(0);
    let weight_total = non_empty(NGINX_CANARY_WEIGHT_TOTAL)
        .and_then(|total| total.trim().parse::<i32>().ok())
        .filter(|total| *total > 0)
        .unwrap_or(DEFAULT_WEIGHT_TOTAL);

    Some(Canary {
        header,
        weight,
        weight_total,
    })
}

// === impl NoAnnotations ===

impl CanaryExtractor for NoAnnotations {
    fn extract(&self, _: &Ingress) -> Extra {
        Extra::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingress2gateway_k8s_api::ObjectMeta;
    use maplit::btreemap;

    fn annotated(annotations: BTreeMap<String, String>) -> Ingress {
        Ingress {
            metadata: ObjectMeta {
                namespace: Some("default".to_string()),
                name: Some("canary".to_string()),
                annotations: Some(annotations),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn disabled_without_canary_annotation() {
        let ingress = annotated(btreemap! {
            NGINX_CANARY_BY_HEADER.to_string() => "x-canary".to_string(),
            NGINX_CANARY_WEIGHT.to_string() => "20".to_string(),
        });
        assert_eq!(IngressNginx.extract(&ingress), Extra::default());

        let ingress = annotated(btreemap! {
            NGINX_CANARY.to_string() => "false".to_string(),
            NGINX_CANARY_WEIGHT.to_string() => "20".to_string(),
        });
        assert_eq!(IngressNginx.extract(&ingress), Extra::default());
    }

    #[test]
    fn header_defaults_to_always() {
        let ingress = annotated(btreemap! {
            NGINX_CANARY.to_string() => "true".to_string(),
            NGINX_CANARY_BY_HEADER.to_string() => "x-canary".to_string(),
        });
        let extra = IngressNginx.extract(&ingress);
        assert_eq!(
            extra.header(),
            Some(&CanaryHeader {
                name: "x-canary".to_string(),
                value: HeaderValueMatch::Exact("always".to_string()),
            })
        );
        assert_eq!(extra.weight(), None);
        assert_eq!(extra.canary.map(|c| c.weight_total), Some(100));
    }

    #[test]
    fn header_value_and_pattern() {
        let ingress = annotated(btreemap! {
            NGINX_CANARY.to_string() => "true".to_string(),
            NGINX_CANARY_BY_HEADER.to_string() => "x-canary".to_string(),
            NGINX_CANARY_BY_HEADER_VALUE.to_string() => "yes".to_string(),
        });
        assert_eq!(
            IngressNginx.extract(&ingress).header().map(|h| &h.value),
            Some(&HeaderValueMatch::Exact("yes".to_string()))
        );

        let ingress = annotated(btreemap! {
            NGINX_CANARY.to_string() => "true".to_string(),
            NGINX_CANARY_BY_HEADER.to_string() => "x-canary".to_string(),
            NGINX_CANARY_BY_HEADER_VALUE.to_string() => "yes".to_string(),
            NGINX_CANARY_BY_HEADER_PATTERN.to_string() => "^(yes|on)$".to_string(),
        });
        assert_eq!(
            IngressNginx.extract(&ingress).header().map(|h| &h.value),
            Some(&HeaderValueMatch::Regex("^(yes|on)$".to_string()))
        );
    }

    #[test]
    fn header_value_without_name() {
        let ingress = annotated(btreemap! {
            NGINX_CANARY.to_string() => "true".to_string(),
            NGINX_CANARY_BY_HEADER_VALUE.to_string() => "yes".to_string(),
        });
        let extra = IngressNginx.extract(&ingress);
        assert!(extra.canary.is_some());
        assert_eq!(extra.header(), None);
    }

    #[test]
    fn weights() {
        let ingress = annotated(btreemap! {
            NGINX_CANARY.to_string() => "true".to_string(),
            NGINX_CANARY_WEIGHT.to_string() => "30".to_string(),
            NGINX_CANARY_WEIGHT_TOTAL.to_string() => "1000".to_string(),
        });
        let extra = IngressNginx.extract(&ingress);
        assert_eq!(extra.weight(), Some(30));
        assert_eq!(extra.canary.map(|c| c.weight_total), Some(1000));

        let ingress = annotated(btreemap! {
            NGINX_CANARY.to_string() => "true".to_string(),
            NGINX_CANARY_WEIGHT.to_string() => "thirty".to_string(),
        });
        let extra = IngressNginx.extract(&ingress);
        assert!(extra.canary.is_some());
        assert_eq!(extra.weight(), None, "invalid weights are treated as unset");

        let ingress = annotated(btreemap! {
            NGINX_CANARY.to_string() => "true".to_string(),
            NGINX_CANARY_WEIGHT.to_string() => "-10".to_string(),
            NGINX_CANARY_WEIGHT_TOTAL.to_string() => "-100".to_string(),
        });
        let extra = IngressNginx.extract(&ingress);
        assert_eq!(extra.weight(), None, "negative weights are treated as unset");
        assert_eq!(extra.canary.map(|c| c.weight_total), Some(100));
    }

    #[test]
    fn no_annotations() {
        let ingress = annotated(btreemap! {
            NGINX_CANARY.to_string() => "true".to_string(),
            NGINX_CANARY_WEIGHT.to_string() => "30".to_string(),
        });
        assert_eq!(NoAnnotations.extract(&ingress), Extra::default());
    }
}
