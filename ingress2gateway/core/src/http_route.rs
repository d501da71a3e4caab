use crate::{
    aggregator::{DefaultBackend, RuleGroup},
    backend,
    canary::{Extra, HeaderValueMatch},
    name::name_from_host,
    Error,
};
use indexmap::IndexMap;
use ingress2gateway_k8s_api::{
    parent_gateway, HTTPIngressPath, HTTPRoute, HTTPRouteRules, HTTPRouteRulesBackendRefs,
    HTTPRouteRulesMatches, HTTPRouteRulesMatchesHeaders, HTTPRouteRulesMatchesHeadersType,
    HTTPRouteRulesMatchesPath, HTTPRouteRulesMatchesPathType, HTTPRouteSpec, HTTPRouteStatus,
};

/// Weights assigned within a single rule are split out of this total.
pub const WEIGHT_TOTAL: i32 = 100;

const DEFAULT_PATH: &str = "/";

/// Paths with the same key are alternative backends for the same match.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathMatchKey {
    pub path_type: String,
    pub path: String,
    pub canary_header: Option<String>,
}

/// A path along with the metadata of the Ingress it came from.
#[derive(Clone, Copy, Debug)]
struct IngressPath<'a> {
    ingress_name: &'a str,
    path: &'a HTTPIngressPath,
    extra: &'a Extra,
}

// === impl RuleGroup ===

impl RuleGroup {
    /// Builds the HTTPRoute for this group.
    ///
    /// Paths that cannot be translated are reported and left out of the route;
    /// the rest of the route is still built.
    pub fn to_http_route(&self) -> (HTTPRoute, Vec<Error>) {
        let mut errors = Vec::new();

        let mut paths_by_match = IndexMap::<PathMatchKey, Vec<IngressPath<'_>>>::new();
        for rule in &self.rules {
            for path in &rule.paths {
                let path = IngressPath {
                    ingress_name: &rule.ingress_name,
                    path,
                    extra: &rule.extra,
                };
                paths_by_match
                    .entry(path.match_key())
                    .or_default()
                    .push(path);
            }
        }

        let rules = paths_by_match
            .values()
            .filter_map(|paths| self.to_route_rule(paths, &mut errors))
            .collect::<Vec<_>>();

        let parent_refs = (!self.ingress_class.is_empty())
            .then(|| vec![parent_gateway(&self.ingress_class)]);
        let hostnames = (!self.host.is_empty()).then(|| vec![self.host.clone()]);
        let route = new_route(
            name_from_host(&self.host),
            &self.namespace,
            HTTPRouteSpec {
                parent_refs,
                hostnames,
                rules: (!rules.is_empty()).then_some(rules),
            },
        );

        (route, errors)
    }

    /// Merges paths sharing a match into one rule with a backend per path.
    ///
    /// Returns `None` when the match itself cannot be expressed.
    fn to_route_rule(
        &self,
        paths: &[IngressPath<'_>],
        errors: &mut Vec<Error>,
    ) -> Option<HTTPRouteRules> {
        let route_match = match paths.first()?.to_route_match() {
            Ok(route_match) => route_match,
            Err(error) => {
                tracing::debug!(%error, host = %self.host, "Skipping path");
                errors.push(error);
                return None;
            }
        };

        let mut backend_refs = Vec::with_capacity(paths.len());
        for path in paths {
            match backend::resolve(&self.namespace, path.ingress_name, &path.path.backend) {
                Ok(mut backend_ref) => {
                    backend_ref.weight = path.extra.weight();
                    backend_refs.push(backend_ref);
                }
                Err(error) => {
                    tracing::debug!(%error, ingress = %path.ingress_name, "Skipping backend");
                    errors.push(error);
                }
            }
        }
        distribute_weights(&mut backend_refs);

        Some(HTTPRouteRules {
            matches: Some(vec![route_match]),
            backend_refs: Some(backend_refs),
            ..Default::default()
        })
    }
}

// === impl IngressPath ===

impl IngressPath<'_> {
    fn value(&self) -> &str {
        self.path.path.as_deref().unwrap_or(DEFAULT_PATH)
    }

    fn match_key(&self) -> PathMatchKey {
        PathMatchKey {
            path_type: self.path.path_type.clone(),
            path: self.value().to_string(),
            canary_header: self.extra.header().map(|header| header.name.clone()),
        }
    }

    fn to_route_match(&self) -> Result<HTTPRouteRulesMatches, Error> {
        let value = self.value().to_string();
        let path_type = match self.path.path_type.as_str() {
            "Prefix" => HTTPRouteRulesMatchesPathType::PathPrefix,
            "Exact" => HTTPRouteRulesMatchesPathType::Exact,
            path_type => {
                return Err(Error::UnsupportedPathType {
                    path: value,
                    path_type: path_type.to_string(),
                })
            }
        };

        let headers = self.extra.header().map(|header| {
            let (r#type, value) = match &header.value {
                HeaderValueMatch::Exact(value) => {
                    (HTTPRouteRulesMatchesHeadersType::Exact, value.clone())
                }
                HeaderValueMatch::Regex(value) => (
                    HTTPRouteRulesMatchesHeadersType::RegularExpression,
                    value.clone(),
                ),
            };
            vec![HTTPRouteRulesMatchesHeaders {
                name: header.name.clone(),
                r#type: Some(r#type),
                value,
            }]
        });

        Ok(HTTPRouteRulesMatches {
            path: Some(HTTPRouteRulesMatchesPath {
                r#type: Some(path_type),
                value: Some(value),
            }),
            headers,
            ..Default::default()
        })
    }
}

// === impl DefaultBackend ===

impl DefaultBackend {
    /// Builds a catch-all route sending everything to the default backend.
    pub fn to_http_route(&self) -> (HTTPRoute, Option<Error>) {
        let (rules, error) = match backend::resolve(&self.namespace, &self.name, &self.backend) {
            Ok(backend_ref) => (
                Some(vec![HTTPRouteRules {
                    matches: None,
                    backend_refs: Some(vec![backend_ref]),
                    ..Default::default()
                }]),
                None,
            ),
            Err(error) => (None, Some(error)),
        };

        let parent_refs = (!self.ingress_class.is_empty())
            .then(|| vec![parent_gateway(&self.ingress_class)]);
        let route = new_route(
            format!("{}-default-backend", self.name),
            &self.namespace,
            HTTPRouteSpec {
                parent_refs,
                hostnames: None,
                rules,
            },
        );

        (route, error)
    }
}

/// Assigns the remaining weight evenly to backends without a weight.
///
/// Nothing changes unless at least one backend, but not every backend, has an
/// explicit weight. Explicit weights summing past [`WEIGHT_TOTAL`] leave
/// nothing to distribute, so the remaining backends get a weight of zero.
pub fn distribute_weights(backend_refs: &mut [HTTPRouteRulesBackendRefs]) {
    let (weighted, total) = backend_refs
        .iter()
        .filter_map(|backend_ref| backend_ref.weight)
        .fold((0usize, 0i32), |(n, sum), weight| {
            (n + 1, sum.saturating_add(weight))
        });

    let unweighted = backend_refs.len() - weighted;
    if weighted == 0 || unweighted == 0 {
        return;
    }

    let remaining = WEIGHT_TOTAL.saturating_sub(total).max(0);
    let weight = remaining / i32::try_from(unweighted).unwrap_or(i32::MAX);
    for backend_ref in backend_refs
        .iter_mut()
        .filter(|backend_ref| backend_ref.weight.is_none())
    {
        backend_ref.weight = Some(weight);
    }
}

fn new_route(name: String, namespace: &str, spec: HTTPRouteSpec) -> HTTPRoute {
    let mut route = HTTPRoute::new(&name, spec);
    route.metadata.namespace = Some(namespace.to_string());
    // Route status is owned by the gateway implementation.
    route.status = Some(HTTPRouteStatus::default());
    route
}
