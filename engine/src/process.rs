//! The resumable vote-processing state machine.
//!
//! A full election run needs more source-chain queries than one invocation
//! may spend, so the run is spread over repeated
//! [`ElectionEngine::process_voting`] calls: at most one query per call,
//! cursor persisted before returning. The walk is fixed: fetch the valid
//! validator set, then per-item collection of validator target addresses,
//! guardian stakes and delegator stakes, then one calculation step that
//! tallies, selects, records the election and schedules the next one.
//! Stages whose registry is empty are skipped.

use elector_bridge::{HostChain, SourceChain};
use elector_store::{ElectionStore, StoreError};
use elector_types::{ProcessStage, ProcessState, SourceAddress, Stake};

use crate::tally::{self, TallySnapshot};
use crate::{ElectionEngine, ElectionError};

/// What a single [`ElectionEngine::process_voting`] call achieved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Progress was made; call again to continue the run.
    InProgress,
    /// This call recorded the election and reset the machine.
    Completed,
}

impl ProcessOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl<S, B, H> ElectionEngine<S, B, H>
where
    S: ElectionStore,
    B: SourceChain,
    H: HostChain,
{
    /// Advance the current election run by one bounded unit of work.
    ///
    /// May only be called once the mirror window of the current election has
    /// closed. Returns [`ProcessOutcome::Completed`] exactly once per run,
    /// on the call that records the result; every other call returns
    /// [`ProcessOutcome::InProgress`]. A run over V validators, G guardians
    /// and M delegators takes `1 + V + G + M + 1` calls.
    pub fn process_voting(&self) -> Result<ProcessOutcome, ElectionError> {
        let current_block = self.source.current_block()?;
        let election_block = self.store.election_block()?;
        if current_block <= election_block.saturating_add(self.config.mirror_period_blocks) {
            return Err(ElectionError::MirrorWindowOpen {
                current_block,
                election_block,
            });
        }

        let state = self.store.process_state()?;
        match state.stage {
            ProcessStage::Idle => {
                self.fetch_valid_validators(election_block)?;
                Ok(ProcessOutcome::InProgress)
            }
            ProcessStage::Validators => {
                self.collect_validator_target(election_block, state.item)?;
                Ok(ProcessOutcome::InProgress)
            }
            ProcessStage::Guardians => {
                self.collect_guardian_stake(election_block, state.item)?;
                Ok(ProcessOutcome::InProgress)
            }
            ProcessStage::Delegators => {
                self.collect_delegator_stake(election_block, state.item)?;
                Ok(ProcessOutcome::InProgress)
            }
            ProcessStage::Calculations => {
                self.run_calculations(election_block)?;
                Ok(ProcessOutcome::Completed)
            }
        }
    }

    /// Start of a run: one query replaces the whole valid validator registry.
    fn fetch_valid_validators(&self, election_block: u64) -> Result<(), ElectionError> {
        let validators = self
            .source
            .validator_set(election_block, &self.config.contracts.validators)?;
        self.store.replace_validators(&validators)?;
        tracing::info!(
            election_block,
            count = validators.len(),
            "fetched valid validator set"
        );
        self.enter_next_stage(ProcessStage::Idle, election_block)
    }

    /// Validators stage: record one validator's target-chain address.
    fn collect_validator_target(
        &self,
        election_block: u64,
        item: u32,
    ) -> Result<(), ElectionError> {
        let address = self.store.validator_at(item)?;
        let target = self.source.target_address(
            election_block,
            &self.config.contracts.validators_registry,
            &address,
        )?;
        let mut record = self
            .store
            .get_validator(&address)?
            .ok_or_else(|| StoreError::NotFound(format!("valid validator {address}")))?;
        record.target = target;
        self.store.put_validator(&record)?;
        tracing::debug!(validator = %address, target = %target, "collected target address");

        self.step(ProcessStage::Validators, item, self.store.validator_count()?, election_block)
    }

    /// Guardians stage: record one guardian's stake at the election block.
    ///
    /// A guardian whose vote fell out of the validity window, or who is no
    /// longer registered as a guardian at the election block, is recorded
    /// with stake zero.
    fn collect_guardian_stake(&self, election_block: u64, item: u32) -> Result<(), ElectionError> {
        let address = self.store.guardian_at(item)?;
        let mut record = self
            .store
            .get_guardian(&address)?
            .ok_or_else(|| StoreError::NotFound(format!("guardian {address}")))?;

        let mut stake = Stake::ZERO;
        if tally::vote_in_window(
            record.position.block_number,
            election_block,
            self.config.vote_validity_blocks,
        ) && self.source.is_guardian(
            election_block,
            &self.config.contracts.guardians,
            &address,
        )? {
            stake = self.stake_at_election(election_block, &address)?;
        }
        record.stake = stake;
        self.store.put_guardian(&record)?;
        tracing::debug!(guardian = %address, stake = %stake, "collected guardian stake");

        self.step(ProcessStage::Guardians, item, self.store.guardian_count()?, election_block)
    }

    /// Delegators stage: record one delegator's stake at the election block.
    fn collect_delegator_stake(&self, election_block: u64, item: u32) -> Result<(), ElectionError> {
        let address = self.store.delegator_at(item)?;
        let mut record = self
            .store
            .get_delegator(&address)?
            .ok_or_else(|| StoreError::NotFound(format!("delegator {address}")))?;
        record.stake = self.stake_at_election(election_block, &address)?;
        self.store.put_delegator(&record)?;
        tracing::debug!(delegator = %address, stake = %record.stake, "collected delegator stake");

        self.step(ProcessStage::Delegators, item, self.store.delegator_count()?, election_block)
    }

    /// Final stage: tally, select, record, and schedule the next election.
    fn run_calculations(&self, election_block: u64) -> Result<(), ElectionError> {
        let snapshot = self.load_snapshot(election_block)?;
        let outcome = tally::tally_votes(
            &snapshot,
            self.config.vote_validity_blocks,
            self.config.max_delegation_graph_size,
        )?;

        let validators = self.valid_validators()?;
        let elected = tally::select_validators(&validators, &outcome, self.config.vote_out_percent)?;
        self.record_election(election_block, &elected)?;

        let next_election = election_block
            .checked_add(self.config.election_period_blocks)
            .ok_or(ElectionError::Overflow("next election block"))?;
        self.store.set_election_block(next_election)?;
        self.store.set_process_state(ProcessState::default())?;
        tracing::info!(
            election_block,
            elected = elected.len(),
            total_weight = %outcome.total_weight,
            next_election,
            "election completed"
        );
        Ok(())
    }

    /// Persist the cursor: the next item within `stage`, or the next stage
    /// once all `bound` items are done.
    fn step(
        &self,
        stage: ProcessStage,
        item: u32,
        bound: u32,
        election_block: u64,
    ) -> Result<(), ElectionError> {
        let next_item = item + 1;
        if next_item >= bound {
            self.enter_next_stage(stage, election_block)
        } else {
            self.store.set_process_state(ProcessState::at(stage, next_item))?;
            Ok(())
        }
    }

    /// Move to the first stage after `stage` that has items to collect, or
    /// to the calculation stage.
    fn enter_next_stage(&self, stage: ProcessStage, election_block: u64) -> Result<(), ElectionError> {
        let next = self.next_pending_stage(stage)?;
        self.store.set_process_state(ProcessState::at(next, 0))?;
        tracing::info!(election_block, stage = %next, "moving to stage");
        Ok(())
    }

    fn next_pending_stage(&self, after: ProcessStage) -> Result<ProcessStage, ElectionError> {
        use ProcessStage::*;
        let skip = match after {
            Idle => 0,
            Validators => 1,
            Guardians => 2,
            Delegators | Calculations => 3,
        };
        for stage in [Validators, Guardians, Delegators].into_iter().skip(skip) {
            let count = match stage {
                Validators => self.store.validator_count()?,
                Guardians => self.store.guardian_count()?,
                Delegators => self.store.delegator_count()?,
                Idle | Calculations => 0,
            };
            if count > 0 {
                return Ok(stage);
            }
        }
        Ok(Calculations)
    }

    /// Scaled stake of `address` on the token contract at the election block.
    fn stake_at_election(
        &self,
        election_block: u64,
        address: &SourceAddress,
    ) -> Result<Stake, ElectionError> {
        let balance =
            self.source
                .balance_of(election_block, &self.config.contracts.token, address)?;
        Stake::from_scaled_balance(balance, self.config.stake_scaling_divisor)
            .ok_or(ElectionError::Overflow("scaled stake"))
    }

    /// All guardian and delegator records, in registry order.
    fn load_snapshot(&self, election_block: u64) -> Result<TallySnapshot, ElectionError> {
        let guardian_count = self.store.guardian_count()?;
        let mut guardians = Vec::with_capacity(guardian_count as usize);
        for index in 0..guardian_count {
            let address = self.store.guardian_at(index)?;
            guardians.push(
                self.store
                    .get_guardian(&address)?
                    .ok_or_else(|| StoreError::NotFound(format!("guardian {address}")))?,
            );
        }

        let delegator_count = self.store.delegator_count()?;
        let mut delegators = Vec::with_capacity(delegator_count as usize);
        for index in 0..delegator_count {
            let address = self.store.delegator_at(index)?;
            delegators.push(
                self.store
                    .get_delegator(&address)?
                    .ok_or_else(|| StoreError::NotFound(format!("delegator {address}")))?,
            );
        }

        Ok(TallySnapshot {
            election_block,
            guardians,
            delegators,
        })
    }

    /// The current valid validator set, in registry order.
    fn valid_validators(&self) -> Result<Vec<SourceAddress>, ElectionError> {
        let count = self.store.validator_count()?;
        let mut validators = Vec::with_capacity(count as usize);
        for index in 0..count {
            validators.push(self.store.validator_at(index)?);
        }
        Ok(validators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{addr, pos, target, test_engine, TestEngine, ELECTION_BLOCK};
    use elector_store::{ElectionResultsStore, GuardianStore, ProcessStore};
    use elector_types::TxRef;

    /// Past the mirror window of the genesis election (period 10).
    const PROCESSING_BLOCK: u64 = ELECTION_BLOCK + 11;

    /// Two validators, two voting guardians, two delegators:
    /// g10 holds 10 and is delegated 20, g11 holds 5 and is delegated 40.
    /// Both vote out validator 31, which reaches the threshold (75 of 75,
    /// threshold 52), so only validator 30 stays elected.
    fn seeded_engine() -> TestEngine {
        let engine = test_engine();
        let source = engine.source();

        source.set_validator_set(vec![addr(30), addr(31)]);
        source.set_target_address(addr(30), target(130));
        source.set_target_address(addr(31), target(131));

        source.add_guardian(addr(10));
        source.add_guardian(addr(11));
        source.set_balance(addr(10), 10);
        source.set_balance(addr(11), 5);
        source.set_balance(addr(20), 20);
        source.set_balance(addr(21), 40);

        source.put_vote_log("vote10", addr(10), vec![addr(31)], pos(960, 0));
        source.put_vote_log("vote11", addr(11), vec![addr(31)], pos(960, 1));
        source.put_delegation_log("del20", addr(20), addr(10), pos(950, 0));
        source.put_delegation_log("del21", addr(21), addr(11), pos(950, 1));

        engine.mirror_vote(&TxRef::new("vote10")).unwrap();
        engine.mirror_vote(&TxRef::new("vote11")).unwrap();
        engine.mirror_delegation(&TxRef::new("del20")).unwrap();
        engine.mirror_delegation(&TxRef::new("del21")).unwrap();

        source.set_current_block(PROCESSING_BLOCK);
        engine
    }

    /// Drive to completion, returning how many calls it took.
    fn drive(engine: &TestEngine) -> usize {
        for call in 1..=1_000 {
            if engine.process_voting().unwrap().is_completed() {
                return call;
            }
        }
        panic!("election did not complete within 1000 calls");
    }

    #[test]
    fn processing_rejected_while_mirror_window_open() {
        let engine = seeded_engine();
        engine.source().set_current_block(ELECTION_BLOCK + 10);

        let err = engine.process_voting().unwrap_err();

        assert!(matches!(err, ElectionError::MirrorWindowOpen { .. }));
        assert_eq!(engine.store().process_state().unwrap(), ProcessState::default());
    }

    #[test]
    fn full_run_takes_one_plus_items_plus_one_calls() {
        let engine = seeded_engine();

        // 1 fetch + 2 validators + 2 guardians + 2 delegators + 1 calculation.
        assert_eq!(drive(&engine), 8);
        assert_eq!(engine.store().election_count().unwrap(), 1);
    }

    #[test]
    fn completed_run_records_translated_result() {
        let engine = seeded_engine();
        engine.host().set_height(500);

        drive(&engine);

        let record = engine.store().election_at(1).unwrap();
        assert_eq!(record.block_number, ELECTION_BLOCK);
        assert_eq!(record.effective_height, 501);
        assert_eq!(record.validators, vec![target(130)]);
    }

    #[test]
    fn empty_registries_complete_in_two_calls() {
        let engine = test_engine();
        engine.source().set_current_block(PROCESSING_BLOCK);

        assert_eq!(drive(&engine), 2);

        let record = engine.store().election_at(1).unwrap();
        assert!(record.validators.is_empty());
    }

    #[test]
    fn validator_set_is_elected_wholesale_when_nobody_votes() {
        let engine = test_engine();
        engine.source().set_validator_set(vec![addr(30), addr(31)]);
        engine.source().set_target_address(addr(30), target(130));
        engine.source().set_target_address(addr(31), target(131));
        engine.source().set_current_block(PROCESSING_BLOCK);

        // 1 fetch + 2 validators + 1 calculation; guardian and delegator
        // stages are skipped outright.
        assert_eq!(drive(&engine), 4);

        let record = engine.store().election_at(1).unwrap();
        assert_eq!(record.validators, vec![target(130), target(131)]);
    }

    #[test]
    fn validators_stage_is_bounded_by_validator_count() {
        let engine = test_engine();
        let source = engine.source();
        source.set_validator_set(vec![addr(30), addr(31), addr(32)]);
        source.set_target_address(addr(30), target(130));
        source.set_target_address(addr(31), target(131));
        source.set_target_address(addr(32), target(132));
        source.add_guardian(addr(10));
        source.put_vote_log("vote", addr(10), vec![], pos(960, 0));
        engine.mirror_vote(&TxRef::new("vote")).unwrap();
        source.set_current_block(PROCESSING_BLOCK);

        // One guardian, three validators: the validators stage must still
        // walk all three items before moving on.
        engine.process_voting().unwrap();
        for expected_item in 0..3 {
            let state = engine.store().process_state().unwrap();
            assert_eq!(state, ProcessState::at(ProcessStage::Validators, expected_item));
            engine.process_voting().unwrap();
        }
        let state = engine.store().process_state().unwrap();
        assert_eq!(state, ProcessState::at(ProcessStage::Guardians, 0));
    }

    #[test]
    fn guardian_stake_is_zero_when_vote_expired() {
        let engine = test_engine();
        let source = engine.source();
        source.add_guardian(addr(10));
        source.set_balance(addr(10), 10);
        // Validity window is 100: a vote at the window edge no longer counts.
        source.put_vote_log("vote", addr(10), vec![addr(30)], pos(ELECTION_BLOCK - 100, 0));
        engine.mirror_vote(&TxRef::new("vote")).unwrap();
        source.set_current_block(PROCESSING_BLOCK);

        drive(&engine);

        let record = engine.store().get_guardian(&addr(10)).unwrap().unwrap();
        assert!(record.stake.is_zero());
    }

    #[test]
    fn guardian_stake_is_zero_when_no_longer_registered() {
        let engine = test_engine();
        let source = engine.source();
        source.add_guardian(addr(10));
        source.set_balance(addr(10), 10);
        source.put_vote_log("vote", addr(10), vec![addr(30)], pos(960, 0));
        engine.mirror_vote(&TxRef::new("vote")).unwrap();

        source.remove_guardian(addr(10));
        source.set_current_block(PROCESSING_BLOCK);

        drive(&engine);

        let record = engine.store().get_guardian(&addr(10)).unwrap().unwrap();
        assert!(record.stake.is_zero());
    }

    #[test]
    fn stakes_are_scaled_by_the_configured_divisor() {
        let mut engine = test_engine();
        engine.unsafetests_set_variables(100, 10, 100, 50, 22);
        let source = engine.source();
        source.add_guardian(addr(10));
        source.set_balance(addr(10), 1_234);
        source.put_vote_log("vote", addr(10), vec![], pos(960, 0));
        engine.mirror_vote(&TxRef::new("vote")).unwrap();
        source.set_current_block(PROCESSING_BLOCK);

        drive(&engine);

        let record = engine.store().get_guardian(&addr(10)).unwrap().unwrap();
        assert_eq!(record.stake, Stake::new(12));
    }

    #[test]
    fn schedule_advances_and_cursor_resets_after_completion() {
        let engine = seeded_engine();

        drive(&engine);

        assert_eq!(engine.store().process_state().unwrap(), ProcessState::default());
        assert_eq!(engine.election_block().unwrap(), ELECTION_BLOCK + 50);
    }

    #[test]
    fn run_resumes_across_engine_rebuild() {
        let engine = seeded_engine();
        for _ in 0..3 {
            assert!(!engine.process_voting().unwrap().is_completed());
        }

        let (store, source, host, config) = engine.into_parts();
        let engine = crate::ElectionEngine::new(store, source, host, config).unwrap();

        // 8 calls total, 3 already spent.
        assert_eq!(drive(&engine), 5);
        assert_eq!(engine.store().election_count().unwrap(), 1);
    }

    #[test]
    fn second_election_runs_after_the_first() {
        let engine = seeded_engine();
        drive(&engine);

        // Next election sits at 1050; mirror a fresh delegation into it.
        let source = engine.source();
        source.set_current_block(ELECTION_BLOCK + 50);
        source.set_balance(addr(22), 100);
        source.put_delegation_log("del22", addr(22), addr(10), pos(1_020, 0));
        engine.mirror_delegation(&TxRef::new("del22")).unwrap();

        source.set_current_block(ELECTION_BLOCK + 50 + 11);
        engine.host().set_height(7);

        // 1 fetch + 2 validators + 2 guardians + 3 delegators + 1 calculation.
        assert_eq!(drive(&engine), 9);
        assert_eq!(engine.store().election_count().unwrap(), 2);

        let record = engine.store().election_at(2).unwrap();
        assert_eq!(record.block_number, ELECTION_BLOCK + 50);
        assert_eq!(record.effective_height, 8);
    }
}
