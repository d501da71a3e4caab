#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Converts Ingress resources into Gateway API Gateways and HTTPRoutes.
//!
//! Ingress rules are grouped by namespace, ingress class, and host. Each group
//! becomes one HTTPRoute, and the groups sharing a namespace and ingress class
//! contribute listeners to one Gateway.

pub mod aggregator;
mod backend;
pub mod canary;
mod error;
pub mod gateway;
pub mod http_route;
mod name;


pub use self::{
    aggregator::{Aggregator, Output},
    backend::{Backend, ServicePort},
    canary::{CanaryExtractor, Extra, IngressNginx, NoAnnotations},
    error::Error,
    name::{name_from_host, ALL_HOSTS},
};
use ingress2gateway_k8s_api::Ingress;

/// Converts a set of Ingresses in one pass.
pub fn convert<'i, X: CanaryExtractor>(
    ingresses: impl IntoIterator<Item = &'i Ingress>,
    extractor: X,
) -> Output {
    let mut aggregator = Aggregator::new(extractor);
    for ingress in ingresses {
        aggregator.add_ingress(ingress);
    }
    aggregator.finish()
}

impl<X: CanaryExtractor + ?Sized> CanaryExtractor for Box<X> {
    fn extract(&self, ingress: &Ingress) -> Extra {
        (**self).extract(ingress)
    }
}

impl<X: CanaryExtractor + ?Sized> CanaryExtractor for &X {
    fn extract(&self, ingress: &Ingress) -> Extra {
        (**self).extract(ingress)
    }
}
