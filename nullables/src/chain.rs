//! Nullable chain API: scripted LCD responses with a request log.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use govlens_client::{ChainApi, ClientError};
use govlens_types::{
    GovParams, ProposalsPage, RawProposal, TallyParams, TokenAmount, Validator, VoteTally,
};

/// One call made against a [`NullChainApi`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainRequest {
    Validators,
    ProposalsPage {
        cursor: Option<String>,
        limit: u32,
        reverse: bool,
    },
    GovParams,
    StakedPool,
    ProposalTally(String),
}

/// A [`ChainApi`] that answers from scripted data.
///
/// Proposal pages are keyed by the cursor that requests them (`None` for
/// the first page). Unknown cursors and unknown tallies behave like an
/// HTTP 404. While `unreachable` is set every call fails as if the
/// endpoint were down.
pub struct NullChainApi {
    validators: Mutex<Vec<Validator>>,
    pages: Mutex<HashMap<Option<String>, ProposalsPage>>,
    gov_params: Mutex<GovParams>,
    staked: Mutex<TokenAmount>,
    tallies: Mutex<HashMap<String, VoteTally>>,
    unreachable: AtomicBool,
    fail_gov_params: AtomicBool,
    requests: Mutex<Vec<ChainRequest>>,
}

impl NullChainApi {
    pub fn new() -> Self {
        Self {
            validators: Mutex::new(Vec::new()),
            pages: Mutex::new(HashMap::new()),
            gov_params: Mutex::new(GovParams {
                voting_period: "604800s".to_string(),
                min_deposit: Vec::new(),
                max_deposit_period: "1209600s".to_string(),
                tally: TallyParams::default(),
            }),
            staked: Mutex::new(TokenAmount::zero()),
            tallies: Mutex::new(HashMap::new()),
            unreachable: AtomicBool::new(false),
            fail_gov_params: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_validators(self, validators: Vec<Validator>) -> Self {
        *self.validators.lock().unwrap() = validators;
        self
    }

    /// Script the page served for `cursor` from raw JSON records.
    /// Records that do not decode are dropped, as the real client does.
    pub fn with_page(
        self,
        cursor: Option<&str>,
        records: Vec<serde_json::Value>,
        next_key: Option<&str>,
    ) -> Self {
        let proposals = records
            .into_iter()
            .filter_map(|value| RawProposal::from_value(value).ok())
            .collect();
        self.pages.lock().unwrap().insert(
            cursor.map(str::to_string),
            ProposalsPage {
                proposals,
                next_key: next_key.map(str::to_string),
            },
        );
        self
    }

    pub fn with_gov_params(self, params: GovParams) -> Self {
        *self.gov_params.lock().unwrap() = params;
        self
    }

    pub fn with_staked(self, staked: impl Into<TokenAmount>) -> Self {
        *self.staked.lock().unwrap() = staked.into();
        self
    }

    pub fn with_tally(self, proposal_id: &str, tally: VoteTally) -> Self {
        self.set_tally(proposal_id, tally);
        self
    }

    /// Replace a proposal's live tally.
    pub fn set_tally(&self, proposal_id: &str, tally: VoteTally) {
        self.tallies
            .lock()
            .unwrap()
            .insert(proposal_id.to_string(), tally);
    }

    pub fn set_staked(&self, staked: impl Into<TokenAmount>) {
        *self.staked.lock().unwrap() = staked.into();
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Make only the governance params call fail as unreachable.
    pub fn fail_gov_params(&self, fail: bool) {
        self.fail_gov_params.store(fail, Ordering::SeqCst);
    }

    /// Every request made so far, in order.
    pub fn requests(&self) -> Vec<ChainRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests matching `pred`.
    pub fn count(&self, pred: impl Fn(&ChainRequest) -> bool) -> usize {
        self.requests.lock().unwrap().iter().filter(|r| pred(r)).count()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record(&self, request: ChainRequest) -> Result<(), ClientError> {
        self.requests.lock().unwrap().push(request);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(ClientError::Unreachable("null chain: endpoint down".into()));
        }
        Ok(())
    }
}

impl Default for NullChainApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainApi for NullChainApi {
    async fn get_validators(&self) -> Result<Vec<Validator>, ClientError> {
        self.record(ChainRequest::Validators)?;
        Ok(self.validators.lock().unwrap().clone())
    }

    async fn get_proposals_page(
        &self,
        cursor: Option<&str>,
        limit: u32,
        reverse: bool,
    ) -> Result<ProposalsPage, ClientError> {
        let cursor = cursor.map(str::to_string);
        self.record(ChainRequest::ProposalsPage {
            cursor: cursor.clone(),
            limit,
            reverse,
        })?;
        self.pages
            .lock()
            .unwrap()
            .get(&cursor)
            .cloned()
            .ok_or_else(|| ClientError::RequestFailed(format!("HTTP status 404 for cursor {cursor:?}")))
    }

    async fn get_gov_params(&self) -> Result<GovParams, ClientError> {
        self.record(ChainRequest::GovParams)?;
        if self.fail_gov_params.load(Ordering::SeqCst) {
            return Err(ClientError::Unreachable("null chain: params down".into()));
        }
        Ok(self.gov_params.lock().unwrap().clone())
    }

    async fn get_staked_pool(&self) -> Result<TokenAmount, ClientError> {
        self.record(ChainRequest::StakedPool)?;
        Ok(self.staked.lock().unwrap().clone())
    }

    async fn get_proposal_tally(&self, proposal_id: &str) -> Result<VoteTally, ClientError> {
        self.record(ChainRequest::ProposalTally(proposal_id.to_string()))?;
        self.tallies
            .lock()
            .unwrap()
            .get(proposal_id)
            .cloned()
            .ok_or_else(|| {
                ClientError::RequestFailed(format!("HTTP status 404 for tally {proposal_id}"))
            })
    }
}
