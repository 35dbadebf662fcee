use crate::state::{LedgerError, LedgerState};
use expiry_primitives::{
    CurrencyAdjustments, EntityId, EntityNum, NftAdjustments, NftId, Token, MISSING_ENTITY_ID,
};
use tracing::{error, warn};

/// Book-keeping for returning an expired entity's token holdings to their
/// treasuries.
///
/// Units of a deleted token have no treasury to return to; they are burned
/// instead, recorded as a one-sided debit (fungible) or an exchange to the
/// missing entity id (NFT).
#[derive(Debug, Default, Clone, Copy)]
pub struct TreasuryReturnHelper;

impl TreasuryReturnHelper {
    /// Builds a helper.
    pub const fn new() -> Self {
        Self
    }

    /// Records the return (or burn) of one NFT, crediting the treasury when
    /// the token is still live. Reports whether an actual return was made.
    pub fn update_nft_returns<S: LedgerState>(
        &self,
        state: &mut S,
        expired_num: EntityNum,
        token_num: EntityNum,
        token: &Token,
        serial_no: u64,
        token_types: &mut Vec<EntityId>,
        return_exchanges: &mut Vec<NftAdjustments>,
    ) -> bool {
        let token_id = token_num.to_entity_id();
        let type_i = match token_types.iter().position(|&t| t == token_id) {
            Some(i) => i,
            None => {
                token_types.push(token_id);
                return_exchanges.push(NftAdjustments::default());
                token_types.len() - 1
            }
        };
        if token.deleted {
            return_exchanges[type_i].append_adjust(
                expired_num.to_entity_id(),
                MISSING_ENTITY_ID,
                serial_no,
            );
            false
        } else {
            return_exchanges[type_i].append_adjust(
                expired_num.to_entity_id(),
                token.treasury,
                serial_no,
            );
            // Update the treasury's owned-NFT count.
            match state.account_mut(token.treasury_num()) {
                Ok(treasury) => treasury.nfts_owned += 1,
                Err(e) => error!(error = %e, "Error updating treasury's owned NFTs"),
            }
            let _ = self.increment_treasury_balance(state, token, token_num, 1);
            true
        }
    }

    /// Burns the NFT or clears its owner for return, yielding the next key
    /// in the owner's NFT list.
    pub fn burn_or_return_nft<S: LedgerState>(
        &self,
        state: &mut S,
        burn: bool,
        root_key: NftId,
    ) -> Result<Option<NftId>, LedgerError> {
        let nft = state.nft(root_key).ok_or(LedgerError::MissingNft(root_key))?;
        let next = nft.next;
        if burn {
            state.remove_nft(root_key)?;
        } else {
            state.set_nft_owner(root_key, MISSING_ENTITY_ID)?;
        }
        Ok(next)
    }

    /// Records the return (or burn) of one fungible balance, crediting the
    /// treasury relationship when possible.
    pub fn update_fungible_returns<S: LedgerState>(
        &self,
        state: &mut S,
        expired_num: EntityNum,
        token_num: EntityNum,
        token: &Token,
        balance: i64,
        return_transfers: &mut Vec<CurrencyAdjustments>,
    ) {
        if token.deleted || !self.increment_treasury_balance(state, token, token_num, balance) {
            return_transfers.push(CurrencyAdjustments::burn(expired_num, balance));
        } else {
            // Ordered by increasing account number inside `transfer`.
            return_transfers.push(CurrencyAdjustments::transfer(
                expired_num,
                token.treasury_num(),
                balance,
            ));
        }
    }

    fn increment_treasury_balance<S: LedgerState>(
        &self,
        state: &mut S,
        token: &Token,
        token_num: EntityNum,
        balance: i64,
    ) -> bool {
        match state.adjust_token_rel_balance(token.treasury_num(), token_num, balance) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    token = %token_num,
                    treasury = %token.treasury,
                    error = %e,
                    "Undeleted token treasury should be valid, but",
                );
                false
            }
        }
    }
}
