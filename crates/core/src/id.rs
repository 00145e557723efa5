// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-supplied identifiers.
//!
//! Unlike generated ids, job and isolate ids come from the command line and
//! the manifest, so construction validates instead of generating.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("{kind} can not be empty")]
    Empty { kind: &'static str },
    #[error("{kind} '{value}' contains '/', which is not allowed in a directory name")]
    PathSeparator { kind: &'static str, value: String },
}

/// Define a newtype name wrapper around `SmolStr`.
///
/// Generates `parse()` (trimmed, non-empty, no `/`), `as_str()`, `Display`,
/// `AsRef<str>`, `PartialEq<&str>` and `Borrow<str>`.
///
/// ```ignore
/// define_name! {
///     /// Doc comment for the name type.
///     pub struct JobId("job id");
/// }
/// ```
#[macro_export]
macro_rules! define_name {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($kind:literal);
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(smol_str::SmolStr);

        impl $name {
            pub const KIND: &'static str = $kind;

            /// Validate and wrap a user-supplied name.
            pub fn parse(raw: &str) -> Result<Self, $crate::id::IdError> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err($crate::id::IdError::Empty { kind: Self::KIND });
                }
                if trimmed.contains('/') {
                    return Err($crate::id::IdError::PathSeparator {
                        kind: Self::KIND,
                        value: trimmed.to_string(),
                    });
                }
                Ok(Self(smol_str::SmolStr::new(trimmed)))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Wrap a known-good literal without validation (tests only).
            #[cfg(any(test, feature = "test-support"))]
            pub fn fixture(name: &str) -> Self {
                Self(smol_str::SmolStr::new(name))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::id::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

crate::define_name! {
    /// Name of a pipeline job. Also the name of the job's subdirectory
    /// inside the working directory.
    pub struct JobId("job id");
}

crate::define_name! {
    /// Isolate (sample) identifier from the first manifest column, with the
    /// exclusion marker already removed.
    pub struct IsolateId("isolate id");
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
