pub use gateway_api::apis::standard::gateways::{
    Gateway, GatewayListeners, GatewayListenersTls, GatewayListenersTlsCertificateRefs,
    GatewaySpec,
};
use std::fmt;

/// The listener protocols an Ingress can be served with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProtocolType {
    Http,
    Https,
}

// === impl ProtocolType ===

impl ProtocolType {
    pub const fn default_port(self) -> i32 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }

    /// The value of a listener's `protocol` field.
    pub const fn protocol(self) -> &'static str {
        match self {
            Self::Http => "HTTP",
            Self::Https => "HTTPS",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// References a `Secret` by name in the Gateway's namespace.
pub fn secret_ref(name: impl Into<String>) -> GatewayListenersTlsCertificateRefs {
    GatewayListenersTlsCertificateRefs {
        name: name.into(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_listeners() {
        let mut gateway = Gateway::new(
            "nginx",
            GatewaySpec {
                gateway_class_name: "nginx".to_string(),
                listeners: vec![
                    GatewayListeners {
                        name: "http".to_string(),
                        port: ProtocolType::Http.default_port(),
                        protocol: ProtocolType::Http.protocol().to_string(),
                        ..Default::default()
                    },
                    GatewayListeners {
                        name: "https".to_string(),
                        hostname: Some("example.com".to_string()),
                        port: ProtocolType::Https.default_port(),
                        protocol: ProtocolType::Https.protocol().to_string(),
                        tls: Some(GatewayListenersTls {
                            certificate_refs: Some(vec![secret_ref("example-cert")]),
                            ..Default::default()
                        }),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
        );
        gateway.metadata.namespace = Some("default".to_string());

        assert_eq!(
            serde_json::to_value(&gateway).expect("gateway must serialize"),
            serde_json::json!({
                "apiVersion": "gateway.networking.k8s.io/v1",
                "kind": "Gateway",
                "metadata": { "name": "nginx", "namespace": "default" },
                "spec": {
                    "gatewayClassName": "nginx",
                    "listeners": [
                        { "name": "http", "port": 80, "protocol": "HTTP" },
                        {
                            "name": "https",
                            "hostname": "example.com",
                            "port": 443,
                            "protocol": "HTTPS",
                            "tls": { "certificateRefs": [{ "name": "example-cert" }] },
                        },
                    ],
                },
            })
        );
    }
}
