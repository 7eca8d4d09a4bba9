//! Console client - authenticated access to the orchestration backend
//!
//! This crate provides:
//! - [`ApiClient`]: the only component that performs authenticated backend
//!   calls, one method per backend operation
//! - [`AuthBoundary`]: turns authentication failures into session clearing
//!   and navigation
//! - [`Loaders`]: per-page data fetching on top of the two

mod boundary;
mod client;
mod config;
mod error;
mod loaders;
mod stream;

pub use boundary::{AuthBoundary, Navigator, RouteChannel, APP_HOME_ROUTE, LOGIN_ROUTE};
pub use client::{ApiClient, RequestOptions};
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind, LoaderError, Result};
pub use loaders::{
    AgentPageData, ApiKeysAdminData, AppHomeData, AppLayoutData, Loaders, OrgLayoutData,
    OrgPageData, ProjectConfigData, ProjectLayoutData, PromptPageData, ServerLayoutData,
};
pub use stream::{EventStream, StreamEvent};
