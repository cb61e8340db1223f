#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

/// Tracing target for authentication operations.
pub(crate) const TRACING_TARGET_AUTHENTICATION: &str = "pathway_server::authentication";
