//! Hierarchical string identifiers, e.g. "/items/coin" or "/actions/foraging/egg".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the base currency item. Its unit price is always 1.
pub const COIN_HRID: &str = "/items/coin";

macro_rules! hrid {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(hrid: impl Into<String>) -> Self {
                Self(hrid.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Last path segment, e.g. "egg" for "/actions/foraging/egg".
            pub fn leaf(&self) -> &str {
                self.0.rsplit('/').next().unwrap_or(&self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

hrid!(
    /// Identifier of an action, e.g. "/actions/milking/cow".
    ActionId
);
hrid!(
    /// Identifier of an item, e.g. "/items/milk".
    ItemId
);
hrid!(
    /// Identifier of a combat monster, e.g. "/monsters/fly".
    MonsterId
);

impl ItemId {
    pub fn coin() -> Self {
        Self::new(COIN_HRID)
    }

    pub fn is_coin(&self) -> bool {
        self.0 == COIN_HRID
    }
}
