//! Validator identity and membership.

use sbor::prelude::BasicSbor;
use std::fmt;

/// A 20-byte validator address.
///
/// Addresses identify message senders; recovering them from signatures is
/// the job of the network layer, upstream of this crate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, BasicSbor)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:02x}{:02x}{:02x}{:02x}..{:02x}{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[18], self.0[19]
        )
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The set of validators for the current epoch.
///
/// Membership can change between the time a message is parked and the time
/// it is replayed, so lookups return `Option`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorSet {
    validators: Vec<Address>,
}

impl ValidatorSet {
    /// Create a validator set from an ordered list of addresses.
    pub fn new(validators: Vec<Address>) -> Self {
        Self { validators }
    }

    /// Look up a validator by address, returning its index in the set.
    pub fn get_by_address(&self, address: &Address) -> Option<(usize, Address)> {
        self.validators
            .iter()
            .position(|v| v == address)
            .map(|i| (i, self.validators[i]))
    }

    /// Whether the address belongs to the set.
    pub fn contains(&self, address: &Address) -> bool {
        self.validators.contains(address)
    }

    /// Number of validators in the set.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Iterate the validator addresses in set order.
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.validators.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_address;

    #[test]
    fn test_get_by_address() {
        let set = ValidatorSet::new(vec![test_address(1), test_address(2), test_address(3)]);

        assert_eq!(
            set.get_by_address(&test_address(2)),
            Some((1, test_address(2)))
        );
        assert_eq!(set.get_by_address(&test_address(9)), None);
        assert!(set.contains(&test_address(3)));
        assert_eq!(set.len(), 3);
    }
}
