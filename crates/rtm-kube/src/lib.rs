//! Kubernetes-backed [`rtm_core::PodSource`].
//!
//! - [`connect`] builds a client from an explicit kubeconfig path or the default inference chain.
//! - [`KubePodSource`] lists and reads pods through the core API.
mod error;
pub use error::KubeSourceError;

mod client;
pub use client::connect;

mod convert;
pub use convert::{pod_detail, pod_record};

mod source;
pub use source::KubePodSource;
