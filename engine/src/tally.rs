//! The vote tally: delegation-graph resolution, candidate totals, selection.
//!
//! Pure functions over a snapshot of collected records, with no store or
//! bridge access, so the whole calculation is deterministic and testable in
//! isolation. [`tally_votes`] resolves each voting guardian's weight by
//! walking the reverse delegation graph and adds that weight to every
//! candidate the guardian voted against; [`select_validators`] then applies
//! the vote-out threshold to the valid validator set.
//!
//! The graph walk is iterative. Every delegator names exactly one agent, so
//! each node of the reverse graph has at most one incoming edge and a
//! revisit proves a cycle; the visited set doubles as the size bound.

use std::collections::{HashMap, HashSet};

use elector_store::{DelegatorRecord, GuardianRecord};
use elector_types::{SourceAddress, Stake};

use crate::ElectionError;

/// Everything the tally reads, captured in registry order.
#[derive(Clone, Debug, Default)]
pub struct TallySnapshot {
    /// Source-chain block of the election being tallied.
    pub election_block: u64,
    pub guardians: Vec<GuardianRecord>,
    pub delegators: Vec<DelegatorRecord>,
}

/// Per-candidate vote-out totals plus the total participating weight.
#[derive(Clone, Debug, Default)]
pub struct TallyOutcome {
    pub candidate_votes: HashMap<SourceAddress, Stake>,
    pub total_weight: Stake,
}

/// Whether a vote cast at `vote_block` still counts for an election at
/// `election_block`. Votes never expire while the chain is younger than the
/// validity window.
pub fn vote_in_window(vote_block: u64, election_block: u64, validity_blocks: u64) -> bool {
    vote_block != 0 && vote_block > election_block.saturating_sub(validity_blocks)
}

/// Resolve voting weights and aggregate the per-candidate vote-out totals.
///
/// Guardians whose vote fell outside the validity window are ignored
/// entirely; their stake neither votes nor joins the total. Delegators who
/// are themselves voting guardians are counted once, on the guardian path.
pub fn tally_votes(
    snapshot: &TallySnapshot,
    validity_blocks: u64,
    max_graph_size: usize,
) -> Result<TallyOutcome, ElectionError> {
    let guardian_stakes = guardian_stakes(snapshot, validity_blocks);
    let delegator_stakes = delegator_stakes(snapshot, &guardian_stakes);
    let edges = delegation_edges(snapshot, &delegator_stakes);

    let mut candidate_votes: HashMap<SourceAddress, Stake> = HashMap::new();
    let mut total_weight = Stake::ZERO;
    for guardian in &snapshot.guardians {
        let Some(own_stake) = guardian_stakes.get(&guardian.address) else {
            continue;
        };
        let delegated =
            resolve_delegated_weight(&guardian.address, &edges, &delegator_stakes, max_graph_size)?;
        let weight = own_stake
            .checked_add(delegated)
            .ok_or(ElectionError::Overflow("guardian voting weight"))?;
        total_weight = total_weight
            .checked_add(weight)
            .ok_or(ElectionError::Overflow("total voting weight"))?;
        tracing::debug!(guardian = %guardian.address, weight = %weight, "resolved voting weight");

        for candidate in &guardian.candidates {
            let votes = candidate_votes.entry(*candidate).or_insert(Stake::ZERO);
            *votes = votes
                .checked_add(weight)
                .ok_or(ElectionError::Overflow("candidate vote total"))?;
        }
    }

    Ok(TallyOutcome {
        candidate_votes,
        total_weight,
    })
}

/// Apply the vote-out rule to the valid validator set, preserving its order.
///
/// The threshold is `total weight * percent / 100`, rounded down. A
/// validator is voted out when its recorded total reaches the threshold;
/// validators nobody voted against are always elected.
pub fn select_validators(
    valid_validators: &[SourceAddress],
    outcome: &TallyOutcome,
    vote_out_percent: u64,
) -> Result<Vec<SourceAddress>, ElectionError> {
    let threshold = vote_out_threshold(outcome.total_weight, vote_out_percent)?;
    tracing::debug!(threshold = %threshold, total = %outcome.total_weight, "vote-out threshold");

    let mut elected = Vec::with_capacity(valid_validators.len());
    for validator in valid_validators {
        match outcome.candidate_votes.get(validator) {
            Some(votes) if *votes >= threshold => {
                tracing::debug!(validator = %validator, votes = %votes, "validator voted out");
            }
            _ => elected.push(*validator),
        }
    }
    Ok(elected)
}

fn vote_out_threshold(total_weight: Stake, percent: u64) -> Result<Stake, ElectionError> {
    let scaled = total_weight
        .raw()
        .checked_mul(percent)
        .ok_or(ElectionError::Overflow("vote-out threshold"))?;
    Ok(Stake::new(scaled / 100))
}

/// Guardians whose last vote is inside the validity window, with the stakes
/// collected for them.
fn guardian_stakes(
    snapshot: &TallySnapshot,
    validity_blocks: u64,
) -> HashMap<SourceAddress, Stake> {
    snapshot
        .guardians
        .iter()
        .filter(|g| vote_in_window(g.position.block_number, snapshot.election_block, validity_blocks))
        .map(|g| (g.address, g.stake))
        .collect()
}

/// Delegator stakes, excluding addresses already counted as voting
/// guardians: their weight enters on the guardian path instead.
fn delegator_stakes(
    snapshot: &TallySnapshot,
    guardian_stakes: &HashMap<SourceAddress, Stake>,
) -> HashMap<SourceAddress, Stake> {
    snapshot
        .delegators
        .iter()
        .filter(|d| !guardian_stakes.contains_key(&d.address))
        .map(|d| (d.address, d.stake))
        .collect()
}

/// Reverse delegation map: agent to direct delegators, in registry order.
/// Self-delegation carries no information and is dropped.
fn delegation_edges(
    snapshot: &TallySnapshot,
    delegator_stakes: &HashMap<SourceAddress, Stake>,
) -> HashMap<SourceAddress, Vec<SourceAddress>> {
    let mut edges: HashMap<SourceAddress, Vec<SourceAddress>> = HashMap::new();
    for delegator in &snapshot.delegators {
        if !delegator_stakes.contains_key(&delegator.address) {
            continue;
        }
        if delegator.agent == delegator.address {
            continue;
        }
        edges.entry(delegator.agent).or_default().push(delegator.address);
    }
    edges
}

/// Total stake delegated to `guardian`, following chains of any depth.
fn resolve_delegated_weight(
    guardian: &SourceAddress,
    edges: &HashMap<SourceAddress, Vec<SourceAddress>>,
    delegator_stakes: &HashMap<SourceAddress, Stake>,
    max_graph_size: usize,
) -> Result<Stake, ElectionError> {
    let mut total = Stake::ZERO;
    let mut visited = HashSet::from([*guardian]);
    let mut stack = vec![*guardian];

    while let Some(current) = stack.pop() {
        if let Some(stake) = delegator_stakes.get(&current) {
            total = total
                .checked_add(*stake)
                .ok_or(ElectionError::Overflow("delegated weight"))?;
        }
        let Some(delegators) = edges.get(&current) else {
            continue;
        };
        for delegator in delegators {
            if !visited.insert(*delegator) || visited.len() > max_graph_size {
                return Err(ElectionError::DelegationGraphCycle { guardian: *guardian });
            }
            stack.push(*delegator);
        }
    }
    Ok(total)
}
