use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque number identifying an account or contract entity in ledger state.
///
/// Shard and realm are implied (the node runs in a single shard/realm), so a
/// bare number is enough to key every state map.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct EntityNum(u64);

impl EntityNum {
    /// Wraps a raw entity number.
    pub const fn from_num(num: u64) -> Self {
        Self(num)
    }

    /// The raw number.
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The fully-qualified id in the default shard and realm.
    pub const fn to_entity_id(self) -> EntityId {
        EntityId::new(0, 0, self.0)
    }
}

impl fmt::Display for EntityNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0.0.{}", self.0)
    }
}

impl From<u64> for EntityNum {
    fn from(num: u64) -> Self {
        Self(num)
    }
}

/// Fully-qualified `shard.realm.num` entity id, as it appears in records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct EntityId {
    /// Shard the entity lives in.
    pub shard: u64,
    /// Realm the entity lives in.
    pub realm: u64,
    /// Entity number within the realm.
    pub num: u64,
}

/// Sentinel id used as the counterparty of a burn (NFT returned to a deleted
/// token has no treasury to go back to).
pub const MISSING_ENTITY_ID: EntityId = EntityId::new(0, 0, 0);

impl EntityId {
    /// Builds an id from its parts.
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }

    /// The entity number, dropping shard and realm.
    pub const fn as_num(self) -> EntityNum {
        EntityNum::from_num(self.num)
    }

    /// Whether this is the missing-entity sentinel.
    pub fn is_missing(self) -> bool {
        self == MISSING_ENTITY_ID
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

/// Identifier of one NFT: the token it belongs to plus its serial number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NftId {
    /// The non-fungible token type.
    pub token: EntityNum,
    /// Serial number within the token type.
    pub serial_no: u64,
}

impl NftId {
    /// Builds an NFT id from its parts.
    pub const fn new(token: EntityNum, serial_no: u64) -> Self {
        Self { token, serial_no }
    }
}

/// A consensus timestamp with whole-second resolution.
///
/// Expiration times and renewal periods are tracked in epoch seconds; nothing
/// in the pipeline needs finer resolution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Builds a timestamp from epoch seconds.
    pub const fn from_secs(epoch_second: i64) -> Self {
        Self(epoch_second)
    }

    /// The epoch second of this timestamp.
    pub const fn epoch_second(self) -> i64 {
        self.0
    }

    /// This timestamp shifted forward by the given number of seconds.
    pub const fn plus_secs(self, secs: i64) -> Self {
        Self(self.0 + secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
