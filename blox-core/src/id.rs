//! Type-safe ids for API entities.
//!
//! Every Roblox id is a plain integer on the wire. The newtypes keep a user id
//! from being passed where a group id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to define a newtype id wrapper around an `i64`
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw id
            #[inline]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Get the raw id
            #[inline]
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

define_id!(
    /// Identifier of a user account
    UserId
);

define_id!(
    /// Identifier of a group
    GroupId
);

define_id!(
    /// Identifier of a role within a group
    RoleId
);

define_id!(
    /// Identifier of a private message
    MessageId
);

define_id!(
    /// Identifier of a group wall post
    WallPostId
);

impl RoleId {
    /// The implicit role every group grants to non-members.
    pub const GUEST: RoleId = RoleId(-1);

    pub fn is_guest(&self) -> bool {
        *self == Self::GUEST
    }
}
