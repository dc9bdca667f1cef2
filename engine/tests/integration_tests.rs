//! Integration tests exercising the full election pipeline:
//! event mirroring → windowed processing → tally → recorded results →
//! point-in-time queries, over the nullable collaborators and over a real
//! LMDB store with engine restarts in between.

use elector_bridge::{HostChain, SourceChain};
use elector_engine::{ElectionEngine, ElectionError};
use elector_nullables::{NullHostChain, NullSourceChain, NullStore};
use elector_store::ElectionStore;
use elector_store_lmdb::LmdbEnvironment;
use elector_types::{
    ElectionConfig, EventPosition, SourceAddress, TargetAddress, TxRef,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ELECTION: u64 = 1_000;
const MIRROR_PERIOD: u64 = 10;
const ELECTION_PERIOD: u64 = 50;
/// First block past the mirror window of the genesis election.
const PROCESSING: u64 = ELECTION + MIRROR_PERIOD + 1;

const GUARDIAN_A: u8 = 10;
const GUARDIAN_B: u8 = 11;
const DELEGATOR_D: u8 = 20;
const VALIDATOR_X: u8 = 30;
const VALIDATOR_Y: u8 = 31;

fn addr(n: u8) -> SourceAddress {
    SourceAddress::new([n; 20])
}

fn target(n: u8) -> TargetAddress {
    TargetAddress::new([n; 20])
}

fn pos(block: u64, index: u32) -> EventPosition {
    EventPosition::new(block, index)
}

fn tx(raw: &str) -> TxRef {
    TxRef::new(raw)
}

fn config() -> ElectionConfig {
    ElectionConfig {
        stake_scaling_divisor: 1,
        delegation_marker_amount: 7,
        mirror_period_blocks: MIRROR_PERIOD,
        vote_validity_blocks: 100,
        election_period_blocks: ELECTION_PERIOD,
        genesis_election_block: ELECTION,
        max_candidates_per_vote: 3,
        max_elected_validators: 22,
        vote_out_percent: 70,
        transition_period_heights: 1,
        max_delegation_graph_size: 1_000,
        contracts: Default::default(),
    }
}

fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
    let dir = tempfile::tempdir().expect("temp dir");
    let env = LmdbEnvironment::open(dir.path(), 16, 1 << 22).expect("open env");
    (dir, env)
}

/// A source chain holding the standard scenario: guardian A (stake 10,
/// delegated 20 more by D) votes out X; guardian B (stake 5) votes out X and
/// Y. Total weight 35, threshold 24: X is out at 35, Y survives at 5.
fn seeded_source() -> NullSourceChain {
    let source = NullSourceChain::new();
    source.set_current_block(ELECTION);

    source.set_validator_set(vec![addr(VALIDATOR_X), addr(VALIDATOR_Y)]);
    source.set_target_address(addr(VALIDATOR_X), target(130));
    source.set_target_address(addr(VALIDATOR_Y), target(131));

    source.add_guardian(addr(GUARDIAN_A));
    source.add_guardian(addr(GUARDIAN_B));
    source.set_balance(addr(GUARDIAN_A), 10);
    source.set_balance(addr(GUARDIAN_B), 5);
    source.set_balance(addr(DELEGATOR_D), 20);

    source.put_vote_log("vote-a", addr(GUARDIAN_A), vec![addr(VALIDATOR_X)], pos(960, 0));
    source.put_vote_log(
        "vote-b",
        addr(GUARDIAN_B),
        vec![addr(VALIDATOR_X), addr(VALIDATOR_Y)],
        pos(960, 1),
    );
    source.put_delegation_log("del-d", addr(DELEGATOR_D), addr(GUARDIAN_A), pos(950, 0));
    source
}

/// Mirror the three scenario events through the engine.
fn mirror_scenario<S, B, H>(engine: &ElectionEngine<S, B, H>)
where
    S: ElectionStore,
    B: SourceChain,
    H: HostChain,
{
    engine.mirror_vote(&tx("vote-a")).expect("mirror vote a");
    engine.mirror_vote(&tx("vote-b")).expect("mirror vote b");
    engine.mirror_delegation(&tx("del-d")).expect("mirror delegation d");
}

/// Drive to completion, returning how many processing calls it took.
fn drive<S, B, H>(engine: &ElectionEngine<S, B, H>) -> usize
where
    S: ElectionStore,
    B: SourceChain,
    H: HostChain,
{
    for call in 1..=1_000 {
        if engine.process_voting().expect("process").is_completed() {
            return call;
        }
    }
    panic!("election did not complete within 1000 calls");
}

// ---------------------------------------------------------------------------
// 1. Full election over the nullable collaborators
// ---------------------------------------------------------------------------

#[test]
fn full_election_drops_voted_out_validator() {
    let source = seeded_source();
    let engine =
        ElectionEngine::new(NullStore::new(), source, NullHostChain::new(100), config())
            .expect("engine");
    mirror_scenario(&engine);

    engine.source().set_current_block(PROCESSING);

    // 1 fetch + 2 validators + 2 guardians + 1 delegator + 1 calculation.
    assert_eq!(drive(&engine), 7);

    assert_eq!(engine.elected_validators().expect("latest"), vec![target(131)]);
    assert_eq!(engine.number_of_elections().expect("count"), 1);
    assert_eq!(engine.election_block_number_by_index(1).expect("block"), ELECTION);
    assert_eq!(engine.election_block_height_by_index(1).expect("height"), 101);
}

#[test]
fn point_in_time_queries_after_an_election() {
    let source = seeded_source();
    let engine =
        ElectionEngine::new(NullStore::new(), source, NullHostChain::new(100), config())
            .expect("engine");
    mirror_scenario(&engine);
    engine.source().set_current_block(PROCESSING);
    drive(&engine);

    // Strictly-older lookup: the record at 1000 serves 1001 but not 1000.
    assert_eq!(
        engine.elected_validators_by_block_number(ELECTION + 1).expect("query"),
        vec![target(131)]
    );
    assert_eq!(
        engine.elected_validators_by_block_number(ELECTION).expect("query"),
        vec![TargetAddress::SENTINEL]
    );
    assert_eq!(
        engine.elected_validators_by_block_height(102).expect("query"),
        vec![target(131)]
    );
    assert_eq!(
        engine.elected_validators_by_block_height(101).expect("query"),
        vec![TargetAddress::SENTINEL]
    );
}

#[test]
fn mirror_window_gates_both_surfaces() {
    let source = seeded_source();
    let engine =
        ElectionEngine::new(NullStore::new(), source, NullHostChain::new(100), config())
            .expect("engine");

    // Window open: mirroring works, processing refuses.
    engine.mirror_vote(&tx("vote-a")).expect("mirror inside window");
    assert!(matches!(
        engine.process_voting(),
        Err(ElectionError::MirrorWindowOpen { .. })
    ));

    // Window closed: mirroring refuses, processing runs.
    engine.source().set_current_block(PROCESSING);
    assert!(matches!(
        engine.mirror_vote(&tx("vote-b")),
        Err(ElectionError::MirrorWindowClosed { .. })
    ));
    assert!(!engine.process_voting().expect("process").is_completed());
}

// ---------------------------------------------------------------------------
// 2. LMDB persistence across engine restarts
// ---------------------------------------------------------------------------

#[test]
fn mirrored_state_survives_restart() {
    let (dir, env) = temp_env();
    let engine =
        ElectionEngine::new(env, seeded_source(), NullHostChain::new(100), config())
            .expect("engine");
    mirror_scenario(&engine);

    let (env, _, _, _) = engine.into_parts();
    drop(env);

    let env = LmdbEnvironment::open(dir.path(), 16, 1 << 22).expect("reopen env");
    let source = seeded_source();
    source.set_current_block(PROCESSING);
    let engine =
        ElectionEngine::new(env, source, NullHostChain::new(100), config()).expect("engine");

    assert_eq!(drive(&engine), 7);
    assert_eq!(engine.elected_validators().expect("latest"), vec![target(131)]);
}

#[test]
fn processing_resumes_mid_run_after_restart() {
    let (dir, env) = temp_env();
    let source = seeded_source();
    let engine =
        ElectionEngine::new(env, source, NullHostChain::new(100), config()).expect("engine");
    mirror_scenario(&engine);
    engine.source().set_current_block(PROCESSING);

    // Stop partway through the guardians stage.
    for _ in 0..4 {
        assert!(!engine.process_voting().expect("process").is_completed());
    }

    let (env, _, _, _) = engine.into_parts();
    drop(env);

    let env = LmdbEnvironment::open(dir.path(), 16, 1 << 22).expect("reopen env");
    let source = seeded_source();
    source.set_current_block(PROCESSING);
    let engine =
        ElectionEngine::new(env, source, NullHostChain::new(100), config()).expect("engine");

    // 7 calls total, 4 already spent before the restart.
    assert_eq!(drive(&engine), 3);
    assert_eq!(engine.number_of_elections().expect("count"), 1);
    assert_eq!(engine.elected_validators().expect("latest"), vec![target(131)]);
}

// ---------------------------------------------------------------------------
// 3. Consecutive elections
// ---------------------------------------------------------------------------

#[test]
fn consecutive_elections_accumulate_history() {
    let (_dir, env) = temp_env();
    let engine =
        ElectionEngine::new(env, seeded_source(), NullHostChain::new(100), config())
            .expect("engine");
    mirror_scenario(&engine);
    engine.source().set_current_block(PROCESSING);
    drive(&engine);

    // Second election at 1050: guardian A retracts its vote inside the new
    // mirror window, so nobody reaches the threshold any more.
    let source = engine.source();
    source.set_current_block(ELECTION + ELECTION_PERIOD);
    source.put_vote_log("vote-a2", addr(GUARDIAN_A), vec![], pos(1_005, 0));
    engine.mirror_vote(&tx("vote-a2")).expect("mirror retraction");

    source.set_current_block(ELECTION + ELECTION_PERIOD + MIRROR_PERIOD + 1);
    engine.host().set_height(200);
    drive(&engine);

    assert_eq!(engine.number_of_elections().expect("count"), 2);
    assert_eq!(engine.elected_validators_by_index(1).expect("first"), vec![target(131)]);
    assert_eq!(
        engine.elected_validators_by_index(2).expect("second"),
        vec![target(130), target(131)]
    );
    assert_eq!(
        engine.election_block_number_by_index(2).expect("block"),
        ELECTION + ELECTION_PERIOD
    );
    assert_eq!(engine.election_block_height_by_index(2).expect("height"), 201);

    // Point-in-time queries pick the right era.
    assert_eq!(
        engine.elected_validators_by_block_number(1_049).expect("era 1"),
        vec![target(131)]
    );
    assert_eq!(
        engine.elected_validators_by_block_number(1_051).expect("era 2"),
        vec![target(130), target(131)]
    );
}
