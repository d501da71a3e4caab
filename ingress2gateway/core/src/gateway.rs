use crate::{aggregator::RuleGroup, name::name_from_host, Error};
use ingress2gateway_k8s_api::{
    secret_ref, Gateway, GatewayListeners, GatewayListenersTls, GatewaySpec, ProtocolType,
};
use std::{collections::BTreeMap, fmt};

/// Identifies the Gateway that a rule group's listeners belong to.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GatewayKey {
    pub namespace: String,
    pub ingress_class: String,
}

/// The host and TLS settings a rule group needs from its Gateway.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupListener {
    pub hostname: Option<String>,
    pub tls: Option<GatewayListenersTls>,
}

/// Collects listeners from rule groups, keyed by the Gateway they belong to.
#[derive(Debug, Default)]
pub struct GatewayListenerSet {
    by_gateway: BTreeMap<GatewayKey, Vec<GroupListener>>,
}

// === impl GatewayKey ===

impl GatewayKey {
    /// Checks that the key can name a Gateway resource.
    fn validate(&self) -> Result<(), Error> {
        if self.ingress_class.is_empty()
            || self.ingress_class.contains('/')
            || self.namespace.contains('/')
        {
            return Err(Error::MalformedGatewayKey {
                key: self.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for GatewayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.ingress_class)
    }
}

// === impl GroupListener ===

impl GroupListener {
    pub fn from_group(group: &RuleGroup) -> Self {
        let hostname = if !group.host.is_empty() {
            Some(group.host.clone())
        } else {
            // A host-less rule group with exactly one TLS host serves only
            // that host.
            match group.tls.as_slice() {
                [tls] => match tls.hosts.as_deref() {
                    Some([host]) if !host.is_empty() => Some(host.clone()),
                    _ => None,
                },
                _ => None,
            }
        };

        let tls = (!group.tls.is_empty()).then(|| GatewayListenersTls {
            certificate_refs: Some(
                group
                    .tls
                    .iter()
                    .filter_map(|tls| tls.secret_name.as_deref())
                    .filter(|name| !name.is_empty())
                    .map(secret_ref)
                    .collect(),
            ),
            ..Default::default()
        });

        Self { hostname, tls }
    }

    /// Expands into an HTTP listener and, when TLS is configured, an HTTPS
    /// listener.
    pub fn to_listeners(&self) -> Vec<GatewayListeners> {
        let prefix = self
            .hostname
            .as_deref()
            .map(|hostname| format!("{}-", name_from_host(hostname)))
            .unwrap_or_default();

        let listener = |protocol: ProtocolType, tls: Option<GatewayListenersTls>| {
            GatewayListeners {
                name: format!("{prefix}{protocol}"),
                hostname: self.hostname.clone(),
                port: protocol.default_port(),
                protocol: protocol.protocol().to_string(),
                tls,
                ..Default::default()
            }
        };

        let mut listeners = vec![listener(ProtocolType::Http, None)];
        if let Some(tls) = self.tls.as_ref() {
            listeners.push(listener(ProtocolType::Https, Some(tls.clone())));
        }
        listeners
    }
}

// === impl GatewayListenerSet ===

impl GatewayListenerSet {
    pub fn add_group(&mut self, group: &RuleGroup) {
        let key = GatewayKey {
            namespace: group.namespace.clone(),
            ingress_class: group.ingress_class.clone(),
        };
        self.by_gateway
            .entry(key)
            .or_default()
            .push(GroupListener::from_group(group));
    }

    /// Builds one Gateway per key.
    ///
    /// Listeners are named after their hostname and protocol. A listener whose
    /// name is already taken on the Gateway is dropped after its certificate
    /// references are added to the listener that kept the name.
    pub fn into_gateways(self) -> (Vec<Gateway>, Vec<Error>) {
        let mut gateways = Vec::with_capacity(self.by_gateway.len());
        let mut errors = Vec::new();

        for (key, group_listeners) in self.by_gateway {
            if let Err(error) = key.validate() {
                tracing::debug!(%error, "Skipping gateway");
                errors.push(error);
                continue;
            }

            let mut listeners = Vec::<GatewayListeners>::new();
            for listener in group_listeners.iter().flat_map(GroupListener::to_listeners) {
                match listeners.iter_mut().find(|l| l.name == listener.name) {
                    Some(kept) => {
                        tracing::warn!(
                            gateway = %key,
                            listener = %listener.name,
                            "Merging duplicate listener"
                        );
                        merge_certificate_refs(kept, listener);
                    }
                    None => listeners.push(listener),
                }
            }

            let mut gateway = Gateway::new(
                &key.ingress_class,
                GatewaySpec {
                    gateway_class_name: key.ingress_class.clone(),
                    listeners,
                    ..Default::default()
                },
            );
            gateway.metadata.namespace = Some(key.namespace);
            gateways.push(gateway);
        }

        (gateways, errors)
    }
}

/// Adds the duplicate's certificate references that `kept` lacks.
fn merge_certificate_refs(kept: &mut GatewayListeners, duplicate: GatewayListeners) {
    let refs = duplicate
        .tls
        .and_then(|tls| tls.certificate_refs)
        .unwrap_or_default();
    if refs.is_empty() {
        return;
    }

    let kept_refs = kept
        .tls
        .get_or_insert_with(Default::default)
        .certificate_refs
        .get_or_insert_with(Vec::new);
    for cert in refs {
        if !kept_refs.iter().any(|kept| kept.name == cert.name) {
            kept_refs.push(cert);
        }
    }
}
