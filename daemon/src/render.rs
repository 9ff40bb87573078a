//! Human-readable summaries for terminal output.

use govlens_governance::Paginator;
use govlens_service::ProposalDetail;
use govlens_types::{GovParams, Proposal};
use govlens_utils::{
    format_compact, format_countdown, format_date, format_large, format_percentage,
    micro_to_display,
};
use govlens_validators::RankedValidator;

pub fn validators(ranked: &[RankedValidator]) -> String {
    let mut out = String::new();
    for (rank, v) in ranked.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<32} {:>10} {:>9}  commission {}{}\n",
            rank + 1,
            v.validator.display_name(),
            format_compact(micro_to_display(&v.voting_power)),
            format_percentage(v.voting_percentage),
            format_percentage(v.validator.commission_rate() * 100.0),
            if v.validator.jailed { "  [jailed]" } else { "" },
        ));
    }
    if ranked.is_empty() {
        out.push_str("no bonded validators\n");
    }
    out
}

pub fn proposals(shown: &[Proposal], pager: &Paginator, page: usize) -> String {
    let mut out = String::new();
    for p in shown {
        let submitted = p
            .submit_time
            .as_ref()
            .map(format_date)
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "#{:<5} {:<9} {:<14} {}\n",
            p.proposal_id,
            p.status.label(),
            submitted,
            p.content.title
        ));
    }
    if shown.is_empty() {
        out.push_str("no proposals\n");
    }
    if pager.needs_paging() {
        out.push_str(&format!("page {page} of {}\n", pager.page_count()));
    }
    out
}

pub fn proposal(detail: &ProposalDetail) -> String {
    let p = &detail.proposal;
    let b = &detail.breakdown;
    let mut out = format!(
        "Proposal #{} [{}]\n{}\n\n{}\n\n",
        p.proposal_id,
        p.status.label(),
        p.content.title,
        p.content.description
    );

    out.push_str(&format!(
        "Yes          {:>9}  ({} of non-abstain)\n",
        format_percentage(b.yes_of_total),
        format_percentage(b.yes_of_non_abstain)
    ));
    out.push_str(&format!("No           {:>9}\n", format_percentage(b.no_of_total)));
    out.push_str(&format!(
        "No with veto {:>9}  ({} of non-abstain)\n",
        format_percentage(b.no_with_veto_of_total),
        format_percentage(b.no_with_veto_of_non_abstain)
    ));
    out.push_str(&format!("Abstain      {:>9}\n", format_percentage(b.abstain_of_total)));
    out.push_str(&format!(
        "Turnout      {:>9}  of {} staked\n",
        format_percentage(b.participation),
        format_large(micro_to_display(&detail.total_staked))
    ));
    out.push_str(&format!("Status: {}\n", detail.verdict.label()));

    if p.status.is_active() {
        if let Some(countdown) = detail.countdown {
            out.push_str(&format!("Voting ends in {}\n", format_countdown(&countdown)));
        }
    }
    if !detail.refined {
        out.push_str("(live tally unavailable, showing last known values)\n");
    }
    out
}

pub fn params(params: &GovParams) -> String {
    let deposit = params
        .min_deposit
        .iter()
        .map(|c| format!("{} {}", format_large(micro_to_display(&c.amount())), c.denom))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Voting period      {}\nMin deposit        {}\nQuorum             {}\nPass threshold     {}\nVeto threshold     {}\n",
        params
            .voting_period_secs()
            .map(|s| format!("{} days", s / 86_400))
            .unwrap_or_else(|| params.voting_period.clone()),
        if deposit.is_empty() { "-".to_string() } else { deposit },
        format_percentage(params.tally.quorum * 100.0),
        format_percentage(params.tally.threshold * 100.0),
        format_percentage(params.tally.veto_threshold * 100.0),
    )
}
