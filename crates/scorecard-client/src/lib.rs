//! Repository-client capability interface and per-check request context.
//!
//! This crate implements §3 `RepoClient`/`RepoRef`/`CheckRequest` and §4.B/
//! §4.C of the scorecard-engine specification: the capability-negotiated
//! trait every hosting backend implements, the normalized repository
//! pointer, cancellation, and the auxiliary data-source clients a check may
//! consult alongside its primary `RepoClient`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod aux;
mod cancel;
mod capability;
mod client;
mod reporef;
mod request;

pub use aux::{AuxClients, CiiBestPracticesClient, OssFuzzClient, PackageClient, VulnerabilityDbClient, VulnerabilityRecord};
pub use cancel::CancellationToken;
pub use capability::{select_client_order, RequestType};
pub use client::{
    BranchProtectionInfo, ClientFactory, CommitInfo, Contributor, IssueInfo, LicenseInfo,
    MergeRequestInfo, ReleaseRef, RepoClient, WebhookRef, WorkflowRun,
};
pub use reporef::{RepoRef, RepoType};
pub use request::CheckRequest;
