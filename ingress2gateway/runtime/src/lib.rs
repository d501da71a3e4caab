#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use ingress2gateway_core as core;
pub use ingress2gateway_k8s_api as k8s;

mod args;
mod logging;
pub mod manifest;
pub mod output;

pub use self::{
    args::{Args, OutputFormat, Provider},
    logging::LogFormat,
};
