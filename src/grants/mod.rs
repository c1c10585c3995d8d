//! Grant editing
//!
//! Attach and detach `{user|group} × {privilege}` grants on a resource, with a local cache that
//! follows confirmed server responses.

mod cache;
mod candidates;
mod editor;
mod form;
mod ordering;
mod resource;

pub use cache::{GrantCache, GrantEvent};
pub use candidates::{Candidate, CandidateDirectory, filter_candidates};
pub use editor::{AddOutcome, GrantEditor, GrantRow, PrivilegeChange, RemoveOutcome, SkipReason};
pub use form::GrantForm;
pub use ordering::{PrivilegePrecedence, sort_grants};
pub use resource::parent_resource;
