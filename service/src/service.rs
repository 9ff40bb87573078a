//! The governance service: cached reads over a [`ChainApi`].

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::Instrument;

use govlens_client::{ChainApi, ClientError};
use govlens_governance::{
    apply_tally, normalize, sort_newest_first, TallyEngine, VoteBreakdown, VotingVerdict,
};
use govlens_store::{CacheBackend, TtlCache};
use govlens_types::{
    Clock, GovParams, Proposal, RawProposal, TallyOutcome, TallyResult, Timestamp, TokenAmount,
};
use govlens_utils::{time_remaining, Countdown};
use govlens_validators::{rank_validators, RankedValidator};

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::page_cache::PageCache;
use crate::tracing_spans;

/// Namespace of the short-lived cache entries.
const CACHE_NAMESPACE: &str = "gov";
const GOV_PARAMS_KEY: &str = "gov_params";
const STAKING_POOL_KEY: &str = "staking_pool";
const PROPOSALS_KEY: &str = "proposals";

/// Result of opening the proposal page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageLoad {
    pub proposals: Vec<Proposal>,
    pub fetched_at: Timestamp,
    /// Served from an older snapshot; call
    /// [`GovernanceService::revalidate_page`] to bring it up to date.
    pub needs_revalidation: bool,
}

/// A single proposal as shown in its detail view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProposalDetail {
    pub proposal: Proposal,
    pub total_staked: TokenAmount,
    pub breakdown: VoteBreakdown,
    pub verdict: VotingVerdict,
    /// Time left to vote, for proposals with a known voting end.
    pub countdown: Option<Countdown>,
    /// Whether the tally was recomputed from live chain data.
    pub refined: bool,
}

/// Params and denominator shared by every voting-period proposal of one
/// listing walk.
struct TallyContext {
    engine: TallyEngine,
    total_staked: TokenAmount,
}

pub struct GovernanceService<A, B, C> {
    api: A,
    clock: Arc<C>,
    cache: TtlCache<Arc<B>, Arc<C>>,
    pages: PageCache<Arc<B>, Arc<C>>,
    config: ServiceConfig,
}

impl<A: ChainApi, B: CacheBackend, C: Clock> GovernanceService<A, B, C> {
    pub fn new(api: A, backend: Arc<B>, clock: Arc<C>, config: ServiceConfig) -> Self {
        let cache = TtlCache::new(
            backend.clone(),
            clock.clone(),
            CACHE_NAMESPACE,
            config.cache_ttl(),
        );
        let pages = PageCache::new(backend, clock.clone(), config.stale_ttl());
        Self {
            api,
            clock,
            cache,
            pages,
            config,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // ── Validators ─────────────────────────────────────────────────────

    /// The bonded validator set ranked by voting power. Never cached.
    pub async fn validators(&self) -> Result<Vec<RankedValidator>, ServiceError> {
        async {
            let validators = self.api.get_validators().await?;
            tracing::debug!(count = validators.len(), "fetched validators");
            Ok::<_, ServiceError>(rank_validators(validators))
        }
        .instrument(tracing_spans::validators_span())
        .await
    }

    // ── Cached scalars ─────────────────────────────────────────────────

    pub async fn gov_params(&self) -> Result<GovParams, ServiceError> {
        if let Some(params) = self.cache.get::<GovParams>(GOV_PARAMS_KEY) {
            return Ok(params);
        }
        let params = self.api.get_gov_params().await?;
        self.remember(GOV_PARAMS_KEY, &params);
        Ok(params)
    }

    /// Chain-wide bonded tokens.
    pub async fn staked_pool(&self) -> Result<TokenAmount, ServiceError> {
        if let Some(staked) = self.cache.get::<TokenAmount>(STAKING_POOL_KEY) {
            return Ok(staked);
        }
        let staked = self.api.get_staked_pool().await?;
        self.remember(STAKING_POOL_KEY, &staked);
        Ok(staked)
    }

    /// Cache write failures only cost a refetch later.
    fn remember<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.cache.set(key, value) {
            tracing::warn!(key, error = %e, "cache write failed");
        }
    }

    // ── Proposal listing ───────────────────────────────────────────────

    /// All proposals, newest first, from the 5-minute cache when possible.
    pub async fn fetch_proposals(&self) -> Result<Vec<Proposal>, ServiceError> {
        if let Some(proposals) = self.cache.get::<Vec<Proposal>>(PROPOSALS_KEY) {
            tracing::debug!(count = proposals.len(), "proposal list served from cache");
            return Ok(proposals);
        }
        let proposals = self.walk_proposals().await?;
        self.remember(PROPOSALS_KEY, &proposals);
        Ok(proposals)
    }

    /// Refetch the listing ignoring both cache tiers and rewrite them.
    pub async fn refresh_proposals(&self) -> Result<Vec<Proposal>, ServiceError> {
        self.cache.evict(PROPOSALS_KEY);
        self.pages.clear();
        let proposals = self.fetch_proposals().await?;
        self.save_page(&proposals);
        Ok(proposals)
    }

    /// Open the proposal page: a snapshot younger than the stale TTL is
    /// returned as-is, flagged for revalidation once it is older than the
    /// cache TTL. Without a snapshot the listing is fetched.
    pub async fn load_page(&self) -> Result<PageLoad, ServiceError> {
        if let Some(snapshot) = self.pages.load() {
            let age = snapshot.age_millis(self.clock.now());
            let needs_revalidation = age >= self.config.cache_ttl().as_millis() as u64;
            tracing::debug!(age_ms = age, needs_revalidation, "serving page snapshot");
            return Ok(PageLoad {
                proposals: snapshot.proposals,
                fetched_at: snapshot.timestamp,
                needs_revalidation,
            });
        }

        let proposals = self.fetch_proposals().await?;
        let fetched_at = self.save_page(&proposals);
        Ok(PageLoad {
            proposals,
            fetched_at,
            needs_revalidation: false,
        })
    }

    /// Bring the page snapshot up to date after a stale load.
    pub async fn revalidate_page(&self) -> Result<PageLoad, ServiceError> {
        let proposals = self.fetch_proposals().await?;
        let fetched_at = self.save_page(&proposals);
        Ok(PageLoad {
            proposals,
            fetched_at,
            needs_revalidation: false,
        })
    }

    fn save_page(&self, proposals: &[Proposal]) -> Timestamp {
        match self.pages.save(proposals) {
            Ok(timestamp) => timestamp,
            Err(e) => {
                tracing::warn!(error = %e, "page snapshot write failed");
                self.clock.now()
            }
        }
    }

    /// Walk every page of the listing, newest first. Pages are requested
    /// one after another; records within a page are normalized concurrently.
    async fn walk_proposals(&self) -> Result<Vec<Proposal>, ServiceError> {
        let limit = self.config.page_limit;
        let context = OnceCell::new();

        async {
            let mut proposals = Vec::new();
            let mut cursor: Option<String> = None;
            let mut page_no = 0usize;
            let mut seen = HashSet::new();

            loop {
                page_no += 1;
                let page = self
                    .api
                    .get_proposals_page(cursor.as_deref(), limit, true)
                    .instrument(tracing_spans::proposal_page_span(page_no, cursor.as_deref()))
                    .await?;
                tracing::debug!(
                    page = page_no,
                    count = page.proposals.len(),
                    more = page.next_key.is_some(),
                    "fetched proposal page"
                );

                let normalized = try_join_all(
                    page.proposals
                        .iter()
                        .map(|raw| self.normalize_with(raw, &context)),
                )
                .await?;
                proposals.extend(normalized);

                match page.next_key {
                    Some(next) if !seen.insert(next.clone()) => {
                        tracing::warn!(cursor = %next, page = page_no, "pagination cursor repeated");
                        return Err(ServiceError::from(ClientError::InvalidResponse(
                            format!("pagination cursor repeated: {next}"),
                        )));
                    }
                    Some(next) => cursor = Some(next),
                    None => break,
                }
            }

            sort_newest_first(&mut proposals);
            tracing::info!(count = proposals.len(), pages = page_no, "proposal listing fetched");
            Ok::<_, ServiceError>(proposals)
        }
        .instrument(tracing_spans::proposals_fetch_span(limit))
        .await
    }

    /// Normalize one record, evaluating its tally when it is in voting.
    /// Params and pool are resolved once per walk and a failure to fetch
    /// them fails the whole listing.
    async fn normalize_with(
        &self,
        raw: &RawProposal,
        context: &OnceCell<TallyContext>,
    ) -> Result<Proposal, ServiceError> {
        let mut proposal = normalize(raw);
        if !proposal.status.is_active() {
            return Ok(proposal);
        }

        let ctx = context
            .get_or_try_init(|| async {
                let (params, total_staked) =
                    tokio::try_join!(self.gov_params(), self.staked_pool())?;
                Ok::<_, ServiceError>(TallyContext {
                    engine: TallyEngine::new(params.tally),
                    total_staked,
                })
            })
            .await?;

        apply_tally(&mut proposal, &ctx.engine, &ctx.total_staked);
        Ok(proposal)
    }

    // ── Proposal detail ────────────────────────────────────────────────

    /// Recompute a proposal's tally from live chain data.
    ///
    /// Params, staked pool and tally are fetched concurrently and bypass the
    /// cache; the fresh params and pool are written back. The result always
    /// replaces whatever the listing carried. If any fetch fails the record's
    /// own tally is kept and, lacking derived flags, gets an all-false
    /// outcome over a zero denominator.
    pub async fn proposal_detail(&self, proposal: &Proposal) -> ProposalDetail {
        let span = tracing_spans::proposal_detail_span(&proposal.proposal_id);
        async {
            let mut proposal = proposal.clone();
            let fetched = tokio::try_join!(
                self.api.get_gov_params(),
                self.api.get_staked_pool(),
                self.api.get_proposal_tally(&proposal.proposal_id),
            );

            let (total_staked, refined) = match fetched {
                Ok((params, total_staked, votes)) => {
                    self.remember(GOV_PARAMS_KEY, &params);
                    self.remember(STAKING_POOL_KEY, &total_staked);
                    proposal.final_tally_result = TallyResult::from_votes(votes);
                    apply_tally(&mut proposal, &TallyEngine::new(params.tally), &total_staked);
                    (total_staked, true)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "live tally unavailable, using last known");
                    let outcome = proposal
                        .final_tally_result
                        .outcome
                        .get_or_insert_with(|| TallyOutcome::unreached(TokenAmount::zero()));
                    (outcome.total_voting_power.clone(), false)
                }
            };

            let outcome = proposal
                .final_tally_result
                .outcome
                .clone()
                .unwrap_or_else(|| TallyOutcome::unreached(total_staked.clone()));
            let now = self.clock.now().to_datetime();

            ProposalDetail {
                breakdown: VoteBreakdown::new(&proposal.final_tally_result.votes, &total_staked),
                verdict: VotingVerdict::from_outcome(&outcome),
                countdown: proposal.voting_end_time.map(|end| time_remaining(end, now)),
                total_staked,
                refined,
                proposal,
            }
        }
        .instrument(span)
        .await
    }

    /// Look a proposal up in the listing and refine it.
    pub async fn proposal_by_id(&self, id: &str) -> Result<Option<ProposalDetail>, ServiceError> {
        let proposals = self.fetch_proposals().await?;
        match proposals.iter().find(|p| p.proposal_id == id) {
            Some(proposal) => Ok(Some(self.proposal_detail(proposal).await)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govlens_nullables::{ChainRequest, NullCacheBackend, NullChainApi, NullClock};
    use govlens_types::VoteTally;
    use serde_json::json;

    type TestService = GovernanceService<Arc<NullChainApi>, NullCacheBackend, NullClock>;

    fn service(api: NullChainApi) -> (Arc<NullChainApi>, Arc<NullClock>, TestService) {
        let api = Arc::new(api);
        let clock = Arc::new(NullClock::new(1_000_000));
        let svc = GovernanceService::new(
            api.clone(),
            Arc::new(NullCacheBackend::new()),
            clock.clone(),
            ServiceConfig::default(),
        );
        (api, clock, svc)
    }

    fn votes(yes: u64, no: u64, abstain: u64, veto: u64) -> VoteTally {
        VoteTally {
            yes: yes.into(),
            no: no.into(),
            abstain: abstain.into(),
            no_with_veto: veto.into(),
        }
    }

    #[tokio::test]
    async fn gov_params_are_cached_for_five_minutes() {
        let (api, clock, svc) = service(NullChainApi::new());
        svc.gov_params().await.unwrap();
        svc.gov_params().await.unwrap();
        assert_eq!(api.count(|r| *r == ChainRequest::GovParams), 1);

        clock.advance_secs(300);
        svc.gov_params().await.unwrap();
        assert_eq!(api.count(|r| *r == ChainRequest::GovParams), 2);
    }

    #[tokio::test]
    async fn voting_proposals_share_one_params_fetch() {
        let api = NullChainApi::new()
            .with_staked(1_000u64)
            .with_page(
                None,
                vec![
                    json!({"id": "3", "status": "PROPOSAL_STATUS_VOTING_PERIOD",
                           "final_tally_result": {"yes_count": "400"}}),
                    json!({"id": "2", "status": "PROPOSAL_STATUS_VOTING_PERIOD"}),
                    json!({"id": "1", "status": "PROPOSAL_STATUS_PASSED"}),
                ],
                None,
            );
        let (api, _clock, svc) = service(api);
        let proposals = svc.fetch_proposals().await.unwrap();

        assert_eq!(api.count(|r| *r == ChainRequest::GovParams), 1);
        assert_eq!(api.count(|r| *r == ChainRequest::StakedPool), 1);
        let outcome = proposals[0].final_tally_result.outcome.as_ref().unwrap();
        assert!(outcome.quorum_reached);
        assert!(outcome.threshold_reached);
        assert!(proposals[2].final_tally_result.outcome.is_none());
    }

    #[tokio::test]
    async fn refinement_uses_live_tally() {
        let api = NullChainApi::new()
            .with_staked(2_000u64)
            .with_tally("7", votes(600, 300, 50, 50));
        let (api, _clock, svc) = service(api);

        let listed = normalize(
            &RawProposal::from_value(json!({"id": "7", "status": "PROPOSAL_STATUS_VOTING_PERIOD"}))
                .unwrap(),
        );
        let detail = svc.proposal_detail(&listed).await;

        assert!(detail.refined);
        assert_eq!(detail.proposal.final_tally_result.votes, votes(600, 300, 50, 50));
        assert_eq!(detail.verdict, VotingVerdict::PassingThresholdMet);
        assert!((detail.breakdown.participation - 50.0).abs() < 1e-9);
        assert_eq!(api.count(|r| *r == ChainRequest::ProposalTally("7".into())), 1);
    }

    #[tokio::test]
    async fn refinement_failure_keeps_last_known_tally() {
        let (api, _clock, svc) = service(NullChainApi::new().with_staked(10u64));
        api.set_unreachable(true);

        let mut listed = normalize(&RawProposal::from_value(json!({"id": "5"})).unwrap());
        listed.final_tally_result.votes = votes(1, 2, 3, 4);
        let detail = svc.proposal_detail(&listed).await;

        assert!(!detail.refined);
        assert_eq!(detail.proposal.final_tally_result.votes, votes(1, 2, 3, 4));
        let outcome = detail.proposal.final_tally_result.outcome.unwrap();
        assert_eq!(outcome, TallyOutcome::unreached(TokenAmount::zero()));
        assert_eq!(detail.verdict, VotingVerdict::QuorumNotReached);
    }

    #[tokio::test]
    async fn params_outage_fails_the_listing_and_caches_nothing() {
        let api = NullChainApi::new().with_staked(1_000u64).with_page(
            None,
            vec![json!({"id": "2", "status": "PROPOSAL_STATUS_VOTING_PERIOD",
                        "final_tally_result": {"yes_count": "400"}})],
            None,
        );
        let (api, _clock, svc) = service(api);
        api.fail_gov_params(true);

        let err = svc.fetch_proposals().await.unwrap_err();
        assert!(err.is_retryable());
        assert!(svc.load_page().await.is_err());
        assert!(svc.cache.get::<Vec<Proposal>>(PROPOSALS_KEY).is_none());
        assert!(svc.pages.load().is_none());

        api.fail_gov_params(false);
        let proposals = svc.fetch_proposals().await.unwrap();
        assert!(proposals[0].final_tally_result.outcome.is_some());
    }

    #[tokio::test]
    async fn repeated_cursor_stops_the_walk() {
        let api = NullChainApi::new()
            .with_page(None, vec![json!({"id": "2"})], Some("a"))
            .with_page(Some("a"), vec![json!({"id": "1"})], Some("a"));
        let (api, _clock, svc) = service(api);

        let err = svc.fetch_proposals().await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Client(ClientError::InvalidResponse(_))
        ));
        assert!(!err.is_retryable());
        assert_eq!(api.count(|r| matches!(r, ChainRequest::ProposalsPage { .. })), 2);
        assert!(svc.cache.get::<Vec<Proposal>>(PROPOSALS_KEY).is_none());
    }

    #[tokio::test]
    async fn listing_failure_is_retryable() {
        let (api, _clock, svc) = service(NullChainApi::new());
        api.set_unreachable(true);
        let err = svc.fetch_proposals().await.unwrap_err();
        assert!(err.is_retryable());
    }
}
