//! Resource hierarchy
//!
//! Resource names are dot-separated, `cluster.namespace`; grants on `cluster` are inherited by
//! every namespace under it.

/// Parent of a child resource, if the name has one
pub fn parent_resource(resource: &str) -> Option<&str> {
    match resource.split_once('.') {
        Some((parent, _)) if !parent.is_empty() => Some(parent),
        _ => None,
    }
}
