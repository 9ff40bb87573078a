//! HTTP client for a Cosmos SDK LCD (light-client daemon) REST gateway.

use crate::api::ChainApi;
use crate::error::ClientError;

use govlens_types::params::RawParamsResponse;
use govlens_types::tally::RawTallyResponse;
use govlens_types::validator::{PoolResponse, ValidatorsResponse};
use govlens_types::{
    GovParams, ProposalsPage, RawProposal, TallyParams, TokenAmount, Validator, VoteTally,
};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Public Terra Classic LCD.
pub const DEFAULT_LCD_ENDPOINT: &str = "https://terra-classic-lcd.publicnode.com";

/// Default timeout for LCD requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Page size requested for the bonded validator set, large enough to
/// return it in one response.
const VALIDATOR_PAGE_LIMIT: u32 = 500;

const VALIDATORS_PATH: &str = "/cosmos/staking/v1beta1/validators";
const POOL_PATH: &str = "/cosmos/staking/v1beta1/pool";
const PROPOSALS_PATH: &str = "/cosmos/gov/v1/proposals";
const VOTING_PARAMS_PATH: &str = "/cosmos/gov/v1beta1/params/voting";
const DEPOSIT_PARAMS_PATH: &str = "/cosmos/gov/v1beta1/params/deposit";
const TALLY_PARAMS_PATH: &str = "/cosmos/gov/v1beta1/params/tallying";

/// Client for an LCD endpoint.
pub struct LcdClient {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    base_url: String,
    /// Thresholds used when the chain reports unusable tally params.
    fallback_tally: TallyParams,
}

/// `pagination` object of list responses.
#[derive(Debug, Default, Deserialize)]
struct PageInfo {
    #[serde(default)]
    next_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProposalsResponse {
    #[serde(default)]
    proposals: Vec<serde_json::Value>,
    #[serde(default)]
    pagination: Option<PageInfo>,
}

impl LcdClient {
    /// Create a client for `base_url` with default timeout settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeouts(base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a client with custom timeouts.
    pub fn with_timeouts(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            fallback_tally: TallyParams::default(),
        }
    }

    pub fn with_fallback_tally(mut self, params: TallyParams) -> Self {
        self.fallback_tally = params;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base_url}{path}?{query}` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "LCD request");

        let response = self.http_client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::RequestFailed(format!(
                "HTTP status {} for {path}",
                response.status()
            )));
        }

        response.json::<T>().await.map_err(|e| {
            ClientError::InvalidResponse(format!("failed to parse response from {path}: {e}"))
        })
    }
}

impl Default for LcdClient {
    fn default() -> Self {
        Self::new(DEFAULT_LCD_ENDPOINT)
    }
}

impl ChainApi for LcdClient {
    async fn get_validators(&self) -> Result<Vec<Validator>, ClientError> {
        let body: ValidatorsResponse = self
            .get_json(
                VALIDATORS_PATH,
                &[
                    ("status", "BOND_STATUS_BONDED".to_string()),
                    ("pagination.limit", VALIDATOR_PAGE_LIMIT.to_string()),
                ],
            )
            .await?;
        Ok(body.validators)
    }

    async fn get_proposals_page(
        &self,
        cursor: Option<&str>,
        limit: u32,
        reverse: bool,
    ) -> Result<ProposalsPage, ClientError> {
        let mut query = vec![
            ("pagination.limit", limit.to_string()),
            ("pagination.reverse", reverse.to_string()),
        ];
        if let Some(key) = cursor {
            query.push(("pagination.key", key.to_string()));
        }

        let body: ProposalsResponse = self.get_json(PROPOSALS_PATH, &query).await?;

        let proposals = body
            .proposals
            .into_iter()
            .filter_map(|value| match RawProposal::from_value(value) {
                Ok(raw) => Some(raw),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping undecodable proposal record");
                    None
                }
            })
            .collect();

        let next_key = body
            .pagination
            .and_then(|p| p.next_key)
            .filter(|k| !k.is_empty());

        Ok(ProposalsPage {
            proposals,
            next_key,
        })
    }

    async fn get_gov_params(&self) -> Result<GovParams, ClientError> {
        let (voting, deposit, tally) = tokio::try_join!(
            self.get_json::<RawParamsResponse>(VOTING_PARAMS_PATH, &[]),
            self.get_json::<RawParamsResponse>(DEPOSIT_PARAMS_PATH, &[]),
            self.get_json::<RawParamsResponse>(TALLY_PARAMS_PATH, &[]),
        )?;

        Ok(GovParams::from_raw(
            voting.voting_params.unwrap_or_default(),
            deposit.deposit_params.unwrap_or_default(),
            &tally.tally_params.unwrap_or_default(),
            self.fallback_tally,
        ))
    }

    async fn get_staked_pool(&self) -> Result<TokenAmount, ClientError> {
        let body: PoolResponse = self.get_json(POOL_PATH, &[]).await?;
        TokenAmount::parse(&body.pool.bonded_tokens)
            .map_err(|e| ClientError::InvalidResponse(format!("bonded_tokens: {e}")))
    }

    async fn get_proposal_tally(&self, proposal_id: &str) -> Result<VoteTally, ClientError> {
        let path = format!("/cosmos/gov/v1beta1/proposals/{proposal_id}/tally");
        let body: RawTallyResponse = self.get_json(&path, &[]).await?;
        Ok(VoteTally::from_raw(&body.tally))
    }
}
