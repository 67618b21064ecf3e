//! Client for the remote cloud-management REST API.
//!
//! The bot consumes the API through [`CloudClient::query`] plus a handful of
//! typed helpers; everything else about the API is out of scope here.

mod client;
mod error;
mod model;

pub use client::{CloudClient, DEFAULT_TIMEOUT};
pub use error::{BackendError, Result};
pub use model::{
    CreateInstance, Image, Instance, Invoice, Organisation, Project, ProjectRef, Service, Tenant,
};
