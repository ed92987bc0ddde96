//! Collection and resource key validation.
//!
//! Keys are used verbatim as path components under the store root, so a key
//! is valid only if it names exactly one directory entry:
//! - Must be non-empty
//! - Must not contain `/`, `\` or NUL
//! - Must not be `.` or `..`
//!
//! Resource keys must additionally not end with `.temp`, which is reserved
//! for in-flight writes.

use crate::error::{StoreError, StoreResult};

/// Suffix of the sibling file a write goes through before its rename.
pub const TEMP_SUFFIX: &str = ".temp";

/// Characters that are forbidden anywhere in a key.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0'];

/// Validate a collection name.
///
/// # Examples
///
/// ```
/// use tabula_store::names::validate_collection;
///
/// assert!(validate_collection("users").is_ok());
/// assert!(validate_collection("").is_err());
/// assert!(validate_collection("../etc").is_err());
/// ```
pub fn validate_collection(name: &str) -> StoreResult<()> {
    validate_component("collection", name)
}

/// Validate a resource name.
pub fn validate_resource(name: &str) -> StoreResult<()> {
    validate_component("resource", name)?;
    if name.ends_with(TEMP_SUFFIX) {
        return Err(StoreError::InvalidArgument(format!(
            "resource {name:?} must not end with {TEMP_SUFFIX:?}"
        )));
    }
    Ok(())
}

fn validate_component(kind: &str, name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::InvalidArgument(format!("missing {kind} name")));
    }

    if let Some(ch) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(StoreError::InvalidArgument(format!(
            "{kind} {name:?} contains forbidden character {ch:?}"
        )));
    }

    if name == "." || name == ".." {
        return Err(StoreError::InvalidArgument(format!(
            "{kind} {name:?} is not a valid name"
        )));
    }

    Ok(())
}
