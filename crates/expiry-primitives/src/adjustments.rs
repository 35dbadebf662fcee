use crate::ids::{EntityId, EntityNum};
use serde::{Deserialize, Serialize};

/// Balance adjustments for one fungible token, as parallel amount/account
/// lists the record stream expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CurrencyAdjustments {
    /// Signed amounts, index-aligned with `account_nums`.
    pub amounts: Vec<i64>,
    /// Adjusted account numbers, in increasing order.
    pub account_nums: Vec<u64>,
}

impl CurrencyAdjustments {
    /// A one-sided debit with no matching credit, used when returned units
    /// have nowhere to go (their token was deleted or its treasury is gone).
    pub fn burn(debited: EntityNum, amount: i64) -> Self {
        Self { amounts: vec![-amount], account_nums: vec![debited.as_u64()] }
    }

    /// A debit/credit pair ordered by increasing account number, so equal
    /// transfer lists compare equal regardless of which side expired.
    pub fn transfer(debited: EntityNum, credited: EntityNum, amount: i64) -> Self {
        let debit_first = debited < credited;
        if debit_first {
            Self {
                amounts: vec![-amount, amount],
                account_nums: vec![debited.as_u64(), credited.as_u64()],
            }
        } else {
            Self {
                amounts: vec![amount, -amount],
                account_nums: vec![credited.as_u64(), debited.as_u64()],
            }
        }
    }
}

/// One NFT changing hands in a treasury return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftExchange {
    /// Serial number of the exchanged NFT.
    pub serial_no: u64,
    /// Previous owner (the expired entity).
    pub from: EntityId,
    /// New owner; [`crate::MISSING_ENTITY_ID`] when the NFT was burned.
    pub to: EntityId,
}

/// Ownership exchanges for one non-fungible token type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NftAdjustments {
    /// The exchanges, in the order they were made.
    pub exchanges: Vec<NftExchange>,
}

impl NftAdjustments {
    /// Appends one exchange.
    pub fn append_adjust(&mut self, from: EntityId, to: EntityId, serial_no: u64) {
        self.exchanges.push(NftExchange { serial_no, from, to });
    }
}
