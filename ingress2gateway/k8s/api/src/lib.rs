#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod gateway;
pub mod httproute;

pub use self::{
    gateway::{
        secret_ref, Gateway, GatewayListeners, GatewayListenersTls,
        GatewayListenersTlsCertificateRefs, GatewaySpec, ProtocolType,
    },
    httproute::{
        header_match, parent_gateway, HTTPRoute, HTTPRouteParentRefs, HTTPRouteRules,
        HTTPRouteRulesBackendRefs, HTTPRouteRulesMatches, HTTPRouteRulesMatchesHeaders,
        HTTPRouteRulesMatchesHeadersType, HTTPRouteRulesMatchesPath,
        HTTPRouteRulesMatchesPathType, HTTPRouteSpec, HTTPRouteStatus,
    },
};
pub use k8s_openapi::{
    api::networking::v1::{
        HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
        IngressServiceBackend, IngressSpec, IngressTLS, ServiceBackendPort,
    },
    api::core::v1::TypedLocalObjectReference,
};
pub use kube::core::{ObjectMeta, ResourceExt};

/// The legacy annotation used to select an ingress class before
/// `spec.ingressClassName` existed.
pub const INGRESS_CLASS_ANNOTATION: &str = "kubernetes.io/ingress.class";
