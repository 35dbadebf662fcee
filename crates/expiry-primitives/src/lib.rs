//! Core value types shared by the expiry pipeline
//!
//! This crate provides the small, copyable types the rest of the workspace
//! builds on:
//! - Entity identifiers ([`EntityNum`], [`EntityId`], [`NftId`])
//! - Consensus timestamps ([`Timestamp`])
//! - The expirable account and token model
//! - Transfer-list value types used in treasury-return records

/// Entity identifiers and consensus timestamps.
pub mod ids;

/// The expirable account and token model.
pub mod entity;

/// Transfer-list value types for treasury returns.
pub mod adjustments;

pub use adjustments::{CurrencyAdjustments, NftAdjustments, NftExchange};
pub use entity::{ExpirableAccount, Token, TokenType};
pub use ids::{EntityId, EntityNum, NftId, Timestamp, MISSING_ENTITY_ID};
