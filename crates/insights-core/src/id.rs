//! Typed ID wrappers for stored entities.
//!
//! Every table uses a `BIGINT AUTO_INCREMENT` surrogate key. Wrapping it keeps
//! a post id from being passed where a page id is expected.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
        #[cfg_attr(feature = "sqlx", sqlx(transparent))]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the raw database key.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Surrogate key of a row in `pages`.
    PageId
);
define_id!(
    /// Surrogate key of a row in `posts`.
    PostId
);
define_id!(
    /// Surrogate key of a row in `comments`.
    CommentId
);
define_id!(
    /// Surrogate key of a row in `employees`.
    EmployeeId
);
