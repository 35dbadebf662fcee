//! Fee assessment and distribution for entity auto-renewal
//!
//! Pure math only: assessing what an expired entity can afford for its next
//! renewal period, and planning how a charged fee is split across the
//! network's collection accounts. Applying the resulting balance changes is
//! the caller's job.

pub mod types;
pub mod config;
pub mod compute;
pub mod apply;

pub use types::*;
pub use config::*;
pub use compute::*;
pub use apply::*;
