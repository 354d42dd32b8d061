//! Domain models for the Route Server deployment.
//!
//! - [`Configuration`] - validated input document
//! - [`ResolvedNaming`] - naming convention output
//! - [`ResourceRequestSet`] - requests sent to the provider
//! - [`ResultDocument`] - outputs returned to the caller

mod configuration;
mod naming;
mod requests;
mod result;

// Re-export public types
pub use configuration::{
    Configuration, Diagnostics, Identity, LocationBinding, PeerConnection, SubnetReference,
};
pub use naming::ResolvedNaming;
pub use requests::{
    BgpConnectionRequest, DiagnosticsRequest, PublicIpRequest, ResourceRequestSet,
    RouteServerRequest,
};
pub use result::{BgpConnectionOutput, ResultDocument};
