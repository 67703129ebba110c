//! Strongly-typed identifiers used across the connector.
//!
//! Downstream crates should *not* pass raw integers around as batch cursors.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! new_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(v: u64) -> Self {
                Self(v)
            }
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

// Scan-wide batch sequence number. The first batch of a scan is 1; the value
// never resets at split boundaries.
new_id!(BatchSeq);

impl BatchSeq {
    /// Cursor value before any batch has been emitted.
    pub const START: BatchSeq = BatchSeq(0);

    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_seq_orders_and_serializes_transparently() {
        let first = BatchSeq::START.next();
        assert_eq!(first.get(), 1);
        assert!(first.next() > first);
        assert_eq!(serde_json::to_string(&first).unwrap(), "1");
        assert_eq!(first.to_string(), "BatchSeq(1)");
    }
}
