//! Nullable source chain — programmable event logs and contract reads.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use elector_bridge::{BridgeError, DelegationEvent, SourceChain, TransferEvent, VoteEvent};
use elector_types::{EventPosition, SourceAddress, TargetAddress, TxRef};

enum LoggedEvent {
    Transfer(TransferEvent),
    Delegation(DelegationEvent),
    Vote(VoteEvent),
}

/// A deterministic source chain for testing.
///
/// Tests seed transaction logs, the validator set, guardian membership and
/// balances up front, then drive the engine against them. Point-in-time
/// reads ignore the block argument: the null models a single snapshot, and a
/// test that needs "state changed between blocks" mutates the null between
/// engine calls instead.
pub struct NullSourceChain {
    current_block: AtomicU64,
    logs: Mutex<HashMap<String, (LoggedEvent, EventPosition)>>,
    validator_set: Mutex<Vec<SourceAddress>>,
    targets: Mutex<HashMap<SourceAddress, TargetAddress>>,
    guardians: Mutex<HashSet<SourceAddress>>,
    balances: Mutex<HashMap<SourceAddress, u128>>,
}

impl NullSourceChain {
    pub fn new() -> Self {
        Self {
            current_block: AtomicU64::new(0),
            logs: Mutex::new(HashMap::new()),
            validator_set: Mutex::new(Vec::new()),
            targets: Mutex::new(HashMap::new()),
            guardians: Mutex::new(HashSet::new()),
            balances: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_current_block(&self, block: u64) {
        self.current_block.store(block, Ordering::Relaxed);
    }

    pub fn put_transfer_log(
        &self,
        tx: &str,
        from: SourceAddress,
        to: SourceAddress,
        value: u128,
        position: EventPosition,
    ) {
        self.logs.lock().unwrap().insert(
            tx.to_string(),
            (LoggedEvent::Transfer(TransferEvent { from, to, value }), position),
        );
    }

    pub fn put_delegation_log(
        &self,
        tx: &str,
        delegator: SourceAddress,
        to: SourceAddress,
        position: EventPosition,
    ) {
        self.logs.lock().unwrap().insert(
            tx.to_string(),
            (LoggedEvent::Delegation(DelegationEvent { delegator, to }), position),
        );
    }

    pub fn put_vote_log(
        &self,
        tx: &str,
        voter: SourceAddress,
        candidates: Vec<SourceAddress>,
        position: EventPosition,
    ) {
        self.logs.lock().unwrap().insert(
            tx.to_string(),
            (LoggedEvent::Vote(VoteEvent { voter, candidates }), position),
        );
    }

    pub fn set_validator_set(&self, validators: Vec<SourceAddress>) {
        *self.validator_set.lock().unwrap() = validators;
    }

    pub fn set_target_address(&self, validator: SourceAddress, target: TargetAddress) {
        self.targets.lock().unwrap().insert(validator, target);
    }

    pub fn add_guardian(&self, address: SourceAddress) {
        self.guardians.lock().unwrap().insert(address);
    }

    pub fn remove_guardian(&self, address: SourceAddress) {
        self.guardians.lock().unwrap().remove(&address);
    }

    pub fn set_balance(&self, address: SourceAddress, value: u128) {
        self.balances.lock().unwrap().insert(address, value);
    }
}

impl Default for NullSourceChain {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceChain for NullSourceChain {
    fn current_block(&self) -> Result<u64, BridgeError> {
        Ok(self.current_block.load(Ordering::Relaxed))
    }

    fn transfer_log(
        &self,
        _contract: &SourceAddress,
        tx: &TxRef,
    ) -> Result<(TransferEvent, EventPosition), BridgeError> {
        match self.logs.lock().unwrap().get(tx.as_str()) {
            Some((LoggedEvent::Transfer(event), position)) => Ok((event.clone(), *position)),
            Some(_) => Err(BridgeError::UnexpectedEvent {
                expected: "transfer",
                tx: tx.to_string(),
            }),
            None => Err(BridgeError::MissingLog {
                event: "transfer",
                tx: tx.to_string(),
            }),
        }
    }

    fn delegation_log(
        &self,
        _contract: &SourceAddress,
        tx: &TxRef,
    ) -> Result<(DelegationEvent, EventPosition), BridgeError> {
        match self.logs.lock().unwrap().get(tx.as_str()) {
            Some((LoggedEvent::Delegation(event), position)) => Ok((event.clone(), *position)),
            Some(_) => Err(BridgeError::UnexpectedEvent {
                expected: "delegation",
                tx: tx.to_string(),
            }),
            None => Err(BridgeError::MissingLog {
                event: "delegation",
                tx: tx.to_string(),
            }),
        }
    }

    fn vote_log(
        &self,
        _contract: &SourceAddress,
        tx: &TxRef,
    ) -> Result<(VoteEvent, EventPosition), BridgeError> {
        match self.logs.lock().unwrap().get(tx.as_str()) {
            Some((LoggedEvent::Vote(event), position)) => Ok((event.clone(), *position)),
            Some(_) => Err(BridgeError::UnexpectedEvent {
                expected: "vote",
                tx: tx.to_string(),
            }),
            None => Err(BridgeError::MissingLog {
                event: "vote",
                tx: tx.to_string(),
            }),
        }
    }

    fn validator_set(
        &self,
        _block: u64,
        _contract: &SourceAddress,
    ) -> Result<Vec<SourceAddress>, BridgeError> {
        Ok(self.validator_set.lock().unwrap().clone())
    }

    fn target_address(
        &self,
        _block: u64,
        _contract: &SourceAddress,
        validator: &SourceAddress,
    ) -> Result<TargetAddress, BridgeError> {
        self.targets
            .lock()
            .unwrap()
            .get(validator)
            .copied()
            .ok_or_else(|| BridgeError::Call {
                method: "target_address",
                reason: format!("no target registered for {validator}"),
            })
    }

    fn is_guardian(
        &self,
        _block: u64,
        _contract: &SourceAddress,
        address: &SourceAddress,
    ) -> Result<bool, BridgeError> {
        Ok(self.guardians.lock().unwrap().contains(address))
    }

    fn balance_of(
        &self,
        _block: u64,
        _contract: &SourceAddress,
        address: &SourceAddress,
    ) -> Result<u128, BridgeError> {
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .unwrap_or(0))
    }
}
