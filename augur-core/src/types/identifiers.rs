//! Identifier newtypes and run identity records.
//!
//! Each ID type wraps the platform's numeric id to prevent cross-type
//! confusion. A `RepoId` cannot be accidentally used where a `BuildId` is
//! expected.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl $name {
            /// The raw numeric id.
            pub fn raw(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Repository identifier.
    RepoId
);

define_id!(
    /// Build (workflow run) identifier.
    BuildId
);

/// Identity of the repository an extraction run is scoped to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoRef {
    pub id: RepoId,
    /// `owner/name` slug, also used to key per-repository locks and the
    /// on-disk clone directory.
    pub slug: String,
    /// Where the clone provider fetches from. Local paths are accepted,
    /// which is how the test suite runs without network access.
    pub clone_url: String,
    pub default_branch: String,
}

impl RepoRef {
    /// Filesystem-safe form of the slug (`owner/name` → `owner__name`).
    pub fn slug_dir(&self) -> String {
        self.slug.replace('/', "__")
    }
}

/// Identity of the build an extraction run computes features for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRef {
    pub id: BuildId,
    pub run_number: u64,
    /// Commit the build ran against.
    pub head_sha: String,
    pub branch: String,
    /// Login of the user who triggered the build, when known.
    pub actor: Option<String>,
}
