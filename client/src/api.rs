//! The read operations govlens needs from a chain's LCD.

use std::sync::Arc;

use govlens_types::{GovParams, ProposalsPage, TokenAmount, Validator, VoteTally};

use crate::ClientError;

/// Read-only access to the chain. Implemented by [`crate::LcdClient`] over
/// HTTP and by `NullChainApi` in tests.
///
/// No method retries; callers decide what to do with a failure.
#[allow(async_fn_in_trait)]
pub trait ChainApi {
    /// All bonded validators in a single request.
    async fn get_validators(&self) -> Result<Vec<Validator>, ClientError>;

    /// One page of the gov/v1 proposal listing.
    async fn get_proposals_page(
        &self,
        cursor: Option<&str>,
        limit: u32,
        reverse: bool,
    ) -> Result<ProposalsPage, ClientError>;

    /// Voting, deposit and tally parameters, fetched concurrently and merged.
    async fn get_gov_params(&self) -> Result<GovParams, ClientError>;

    /// Chain-wide bonded tokens, the participation denominator.
    async fn get_staked_pool(&self) -> Result<TokenAmount, ClientError>;

    /// Live tally of a single proposal.
    async fn get_proposal_tally(&self, proposal_id: &str) -> Result<VoteTally, ClientError>;
}

impl<T: ChainApi + ?Sized> ChainApi for Arc<T> {
    async fn get_validators(&self) -> Result<Vec<Validator>, ClientError> {
        (**self).get_validators().await
    }

    async fn get_proposals_page(
        &self,
        cursor: Option<&str>,
        limit: u32,
        reverse: bool,
    ) -> Result<ProposalsPage, ClientError> {
        (**self).get_proposals_page(cursor, limit, reverse).await
    }

    async fn get_gov_params(&self) -> Result<GovParams, ClientError> {
        (**self).get_gov_params().await
    }

    async fn get_staked_pool(&self) -> Result<TokenAmount, ClientError> {
        (**self).get_staked_pool().await
    }

    async fn get_proposal_tally(&self, proposal_id: &str) -> Result<VoteTally, ClientError> {
        (**self).get_proposal_tally(proposal_id).await
    }
}
