use crate::{canary::CanaryExtractor, gateway::GatewayListenerSet, Error, Extra};
use ingress2gateway_k8s_api::{
    Gateway, HTTPIngressPath, HTTPRoute, Ingress, IngressBackend, IngressTLS, ResourceExt,
    INGRESS_CLASS_ANNOTATION,
};
use std::collections::BTreeMap;

/// Groups Ingress rules by namespace, ingress class, and host.
///
/// An aggregator is owned by a single conversion: Ingresses are added one at
/// a time and [`Aggregator::finish`] then builds every route and gateway in one
/// pass.
#[derive(Debug)]
pub struct Aggregator<X = crate::IngressNginx> {
    extractor: X,
    rule_groups: BTreeMap<GroupKey, RuleGroup>,
    default_backends: Vec<DefaultBackend>,
}

/// Identifies a [`RuleGroup`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub namespace: String,
    pub ingress_class: String,
    pub host: String,
}

/// All rules, across Ingresses, that share a [`GroupKey`].
#[derive(Clone, Debug, PartialEq)]
pub struct RuleGroup {
    pub namespace: String,
    pub ingress_class: String,
    pub host: String,
    pub tls: Vec<IngressTLS>,
    pub rules: Vec<SourceRule>,
}

/// The paths of one Ingress rule.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceRule {
    /// The name of the Ingress the rule was read from.
    pub ingress_name: String,
    pub paths: Vec<HTTPIngressPath>,
    pub extra: Extra,
}

/// An Ingress's `spec.defaultBackend`.
#[derive(Clone, Debug, PartialEq)]
pub struct DefaultBackend {
    pub name: String,
    pub namespace: String,
    pub ingress_class: String,
    pub backend: IngressBackend,
}

/// The result of a conversion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Output {
    pub http_routes: Vec<HTTPRoute>,
    pub gateways: Vec<Gateway>,
    pub errors: Vec<Error>,
}

// === impl Aggregator ===

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(crate::IngressNginx)
    }
}

impl<X: CanaryExtractor> Aggregator<X> {
    pub fn new(extractor: X) -> Self {
        Self {
            extractor,
            rule_groups: BTreeMap::new(),
            default_backends: Vec::new(),
        }
    }

    pub fn add_ingress(&mut self, ingress: &Ingress) {
        let namespace = ingress.namespace().unwrap_or_default();
        let name = ingress.name_any();
        let ingress_class = ingress_class(ingress);
        let extra = self.extractor.extract(ingress);
        tracing::debug!(%namespace, %name, %ingress_class, ?extra, "Adding Ingress");

        let Some(spec) = ingress.spec.as_ref() else {
            return;
        };
        let tls = spec.tls.as_deref().unwrap_or_default();

        for rule in spec.rules.iter().flatten() {
            let key = GroupKey {
                namespace: namespace.clone(),
                ingress_class: ingress_class.clone(),
                host: rule.host.clone().unwrap_or_default(),
            };
            let paths = rule
                .http
                .as_ref()
                .map(|http| http.paths.clone())
                .unwrap_or_default();
            self.add_rule(
                key,
                tls,
                SourceRule {
                    ingress_name: name.clone(),
                    paths,
                    extra: extra.clone(),
                },
            );
        }

        if let Some(backend) = spec.default_backend.as_ref() {
            self.default_backends.push(DefaultBackend {
                name,
                namespace,
                ingress_class,
                backend: backend.clone(),
            });
        }
    }

    fn add_rule(&mut self, key: GroupKey, tls: &[IngressTLS], rule: SourceRule) {
        let group = self.rule_groups.entry(key).or_insert_with_key(|key| {
            tracing::trace!(?key, "New rule group");
            RuleGroup {
                namespace: key.namespace.clone(),
                ingress_class: key.ingress_class.clone(),
                host: key.host.clone(),
                tls: Vec::new(),
                rules: Vec::new(),
            }
        });
        group.tls.extend_from_slice(tls);
        group.rules.push(rule);
    }

    pub fn rule_groups(&self) -> impl Iterator<Item = &RuleGroup> + '_ {
        self.rule_groups.values()
    }

    pub fn default_backends(&self) -> &[DefaultBackend] {
        &self.default_backends
    }

    /// Builds the routes and gateways for everything that was added.
    pub fn finish(self) -> Output {
        let mut output = Output::default();
        let mut listeners = GatewayListenerSet::default();

        for group in self.rule_groups.values() {
            listeners.add_group(group);

            let (route, errors) = group.to_http_route();
            output.http_routes.push(route);
            output.errors.extend(errors);
        }

        for default_backend in &self.default_backends {
            let (route, error) = default_backend.to_http_route();
            output.http_routes.push(route);
            output.errors.extend(error);
        }

        let (gateways, errors) = listeners.into_gateways();
        output.gateways = gateways;
        output.errors.extend(errors);

        tracing::debug!(
            routes = output.http_routes.len(),
            gateways = output.gateways.len(),
            errors = output.errors.len(),
            "Converted Ingresses"
        );
        output
    }
}

/// Resolves the class that an Ingress is grouped under.
///
/// Prefers `spec.ingressClassName`, then the legacy class annotation, and
/// finally falls back to the Ingress's own name.
pub fn ingress_class(ingress: &Ingress) -> String {
    if let Some(class) = ingress
        .spec
        .as_ref()
        .and_then(|spec| spec.ingress_class_name.as_deref())
        .filter(|class| !class.is_empty())
    {
        return class.to_string();
    }

    if let Some(class) = ingress.annotations().get(INGRESS_CLASS_ANNOTATION) {
        return class.clone();
    }

    ingress.name_any()
}
