//! Request/response entry point: a duration budget plus source pools in, a timeline out.

/// Composition request, response and `compose`.
pub mod request;
