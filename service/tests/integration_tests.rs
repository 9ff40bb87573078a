//! Integration tests exercising the full data path:
//! scripted LCD → pagination → normalization → tally → caches → readback.
//!
//! These wire together the components that are normally only connected
//! inside `GovernanceService`, including the LMDB backend, verifying the
//! system works end-to-end and not just in isolation.

use std::sync::Arc;

use serde_json::json;

use govlens_nullables::{ChainRequest, NullCacheBackend, NullChainApi, NullClock};
use govlens_service::{GovernanceService, ServiceConfig};
use govlens_store_lmdb::{LmdbEnvironment, DEFAULT_MAP_SIZE};
use govlens_types::{ProposalStatus, Validator, VoteTally};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const MINUTE_MS: u64 = 60 * 1000;

type Service = GovernanceService<Arc<NullChainApi>, NullCacheBackend, NullClock>;

fn service_with(api: NullChainApi) -> (Arc<NullChainApi>, Arc<NullClock>, Arc<NullCacheBackend>, Service) {
    let api = Arc::new(api);
    let clock = Arc::new(NullClock::new(1_700_000_000_000));
    let backend = Arc::new(NullCacheBackend::new());
    let svc = GovernanceService::new(
        api.clone(),
        backend.clone(),
        clock.clone(),
        ServiceConfig::default(),
    );
    (api, clock, backend, svc)
}

fn page_requests(api: &NullChainApi) -> usize {
    api.count(|r| matches!(r, ChainRequest::ProposalsPage { .. }))
}

/// Page one holds ids 5 and 4 (legacy and current), page two holds 3 and 1.
fn two_page_api() -> NullChainApi {
    NullChainApi::new()
        .with_staked(2_000u64)
        .with_page(
            None,
            vec![
                json!({
                    "id": "4",
                    "title": "Raise gas",
                    "summary": "Raise the minimum gas price",
                    "status": "PROPOSAL_STATUS_REJECTED",
                    "final_tally_result": {"yes_count": "1", "no_count": "9",
                                           "abstain_count": "0", "no_with_veto_count": "0"}
                }),
                json!({
                    "proposal_id": "5",
                    "content": {"@type": "/cosmos.gov.v1beta1.TextProposal",
                                "title": "Community pool spend", "description": "Fund tooling"},
                    "status": "PROPOSAL_STATUS_VOTING_PERIOD",
                    "final_tally_result": {"yes": "600", "no": "300",
                                           "abstain": "50", "no_with_veto": "50"},
                    "voting_end_time": "2023-11-20T00:00:00Z"
                }),
            ],
            Some("cursor-2"),
        )
        .with_page(
            Some("cursor-2"),
            vec![
                json!({"id": "1", "status": "PROPOSAL_STATUS_PASSED",
                       "metadata": "{\"title\":\"Genesis\",\"description\":\"First\"}"}),
                json!({"id": "3", "status": "PROPOSAL_STATUS_FAILED"}),
            ],
            None,
        )
}

fn validator(moniker: &str, tokens: &str) -> Validator {
    serde_json::from_value(json!({
        "operator_address": format!("terravaloper1{moniker}"),
        "description": {"moniker": moniker},
        "status": "BOND_STATUS_BONDED",
        "tokens": tokens,
        "commission": {"commission_rates": {"rate": "0.050000000000000000"}}
    }))
    .expect("valid validator json")
}

// ---------------------------------------------------------------------------
// 1. Pagination and normalization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn two_pages_are_walked_once_and_sorted_newest_first() {
    let (api, _clock, _backend, svc) = service_with(two_page_api());
    let proposals = svc.fetch_proposals().await.expect("listing");

    assert_eq!(page_requests(&api), 2);
    let ids: Vec<_> = proposals.iter().map(|p| p.proposal_id.as_str()).collect();
    assert_eq!(ids, ["5", "4", "3", "1"]);

    let requests = api.requests();
    assert!(requests.contains(&ChainRequest::ProposalsPage {
        cursor: None,
        limit: 100,
        reverse: true
    }));
    assert!(requests.contains(&ChainRequest::ProposalsPage {
        cursor: Some("cursor-2".into()),
        limit: 100,
        reverse: true
    }));
}

#[tokio::test]
async fn both_schemas_normalize_into_one_shape() {
    let (_api, _clock, _backend, svc) = service_with(two_page_api());
    let proposals = svc.fetch_proposals().await.expect("listing");

    let legacy = &proposals[0];
    assert_eq!(legacy.content.title, "Community pool spend");
    assert_eq!(legacy.status, ProposalStatus::VotingPeriod);

    let current = &proposals[1];
    assert_eq!(current.content.title, "Raise gas");
    assert_eq!(current.content.description, "Raise the minimum gas price");
    assert_eq!(current.final_tally_result.votes.no, 9u64.into());

    let metadata = &proposals[3];
    assert_eq!(metadata.content.title, "Genesis");
    assert_eq!(metadata.content.description, "First");

    let bare = &proposals[2];
    assert_eq!(bare.content.title, "No title available");
    assert_eq!(bare.content.description, "No description available");
}

#[tokio::test]
async fn only_voting_proposals_carry_tally_flags() {
    let (_api, _clock, _backend, svc) = service_with(two_page_api());
    let proposals = svc.fetch_proposals().await.expect("listing");

    let outcome = proposals[0]
        .final_tally_result
        .outcome
        .as_ref()
        .expect("voting proposal has outcome");
    assert!(outcome.quorum_reached);
    assert!(outcome.threshold_reached);
    assert!(!outcome.veto_threshold_reached);
    assert_eq!(outcome.total_voting_power, 2_000u64.into());

    assert!(proposals[1..]
        .iter()
        .all(|p| p.final_tally_result.outcome.is_none()));
}

// ---------------------------------------------------------------------------
// 2. Cache tiers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn listing_is_cached_for_five_minutes() {
    let (api, clock, _backend, svc) = service_with(two_page_api());
    svc.fetch_proposals().await.unwrap();
    clock.advance_ms(5 * MINUTE_MS - 1);
    svc.fetch_proposals().await.unwrap();
    assert_eq!(page_requests(&api), 2);

    clock.advance_ms(1);
    svc.fetch_proposals().await.unwrap();
    assert_eq!(page_requests(&api), 4);
}

#[tokio::test]
async fn page_snapshot_is_served_stale_then_revalidated() {
    let (api, clock, _backend, svc) = service_with(two_page_api());

    let first = svc.load_page().await.unwrap();
    assert!(!first.needs_revalidation);
    assert_eq!(first.proposals.len(), 4);

    clock.advance_ms(60 * MINUTE_MS);
    api.set_unreachable(true);
    let stale = svc.load_page().await.expect("snapshot served while LCD is down");
    assert!(stale.needs_revalidation);
    assert_eq!(stale.proposals, first.proposals);

    api.set_unreachable(false);
    let fresh = svc.revalidate_page().await.unwrap();
    assert!(!fresh.needs_revalidation);
    assert!(fresh.fetched_at > first.fetched_at);

    let again = svc.load_page().await.unwrap();
    assert!(!again.needs_revalidation);
}

#[tokio::test]
async fn page_snapshot_expires_after_a_day() {
    let (api, clock, _backend, svc) = service_with(two_page_api());
    svc.load_page().await.unwrap();

    clock.advance_ms(24 * 60 * MINUTE_MS);
    api.set_unreachable(true);
    let err = svc.load_page().await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn refresh_bypasses_both_tiers() {
    let (api, _clock, _backend, svc) = service_with(two_page_api());
    svc.load_page().await.unwrap();
    assert_eq!(page_requests(&api), 2);

    svc.refresh_proposals().await.unwrap();
    assert_eq!(page_requests(&api), 4);

    let page = svc.load_page().await.unwrap();
    assert!(!page.needs_revalidation);
    assert_eq!(page_requests(&api), 4);
}

#[tokio::test]
async fn cache_write_failures_do_not_fail_reads() {
    let (api, _clock, backend, svc) = service_with(two_page_api());
    backend.fail_writes(true);

    let page = svc.load_page().await.expect("listing despite failing cache");
    assert_eq!(page.proposals.len(), 4);
    svc.fetch_proposals().await.unwrap();
    assert_eq!(page_requests(&api), 4);
}

// ---------------------------------------------------------------------------
// 3. Detail refinement
// ---------------------------------------------------------------------------

#[tokio::test]
async fn detail_refinement_overrides_listing_values() {
    let api = two_page_api().with_tally(
        "5",
        VoteTally {
            yes: 100u64.into(),
            no: 900u64.into(),
            abstain: 0u64.into(),
            no_with_veto: 0u64.into(),
        },
    );
    let (api, _clock, _backend, svc) = service_with(api);

    let detail = svc
        .proposal_by_id("5")
        .await
        .unwrap()
        .expect("proposal 5 is listed");

    assert!(detail.refined);
    let outcome = detail.proposal.final_tally_result.outcome.unwrap();
    assert!(outcome.quorum_reached);
    assert!(!outcome.threshold_reached);
    assert_eq!(api.count(|r| *r == ChainRequest::ProposalTally("5".into())), 1);
    // clock is 2023-11-14T22:13:20Z, voting ends 2023-11-20T00:00:00Z
    let countdown = detail.countdown.expect("voting end is known");
    assert_eq!((countdown.days, countdown.hours, countdown.minutes), (5, 1, 46));
}

#[tokio::test]
async fn unknown_proposal_id_is_none() {
    let (_api, _clock, _backend, svc) = service_with(two_page_api());
    assert!(svc.proposal_by_id("999").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// 4. Validators
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validators_are_ranked_on_every_call() {
    let api = NullChainApi::new().with_validators(vec![
        validator("small", "250000"),
        validator("large", "750000"),
    ]);
    let (api, _clock, _backend, svc) = service_with(api);

    let ranked = svc.validators().await.unwrap();
    assert_eq!(ranked[0].validator.display_name(), "large");
    assert!((ranked[0].voting_percentage - 75.0).abs() < 1e-9);
    assert!((ranked[0].validator.commission_rate() - 0.05).abs() < 1e-12);

    svc.validators().await.unwrap();
    assert_eq!(api.count(|r| *r == ChainRequest::Validators), 2);
}

// ---------------------------------------------------------------------------
// 5. LMDB persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lmdb_cache_survives_restart() {
    let dir = tempfile::tempdir().expect("temp dir");
    let api = Arc::new(two_page_api());
    let clock = Arc::new(NullClock::new(1_700_000_000_000));

    {
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).expect("open env");
        let svc = GovernanceService::new(
            api.clone(),
            Arc::new(env.cache_backend()),
            clock.clone(),
            ServiceConfig::default(),
        );
        svc.load_page().await.unwrap();
    }

    let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).expect("reopen env");
    let svc = GovernanceService::new(
        api.clone(),
        Arc::new(env.cache_backend()),
        clock.clone(),
        ServiceConfig::default(),
    );
    api.set_unreachable(true);
    let page = svc.load_page().await.expect("served from disk");
    assert_eq!(page.proposals.len(), 4);
    assert_eq!(page_requests(&api), 2);
}
