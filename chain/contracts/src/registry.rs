//! Match Registry — admission, fee charging, indexing, status
//!
//! Admission runs a fixed validation pipeline; the first failing check
//! decides the error:
//! 1. match ceiling
//! 2. donor blood type
//! 3. location length
//! 4. radius
//! 5. urgency
//! 6. priority
//! 7. quantity
//! 8. donor/need compatibility
//! 9. authority configured
//!
//! Only after every check passes is the fee transferred from the caller to
//! the authority. Only after the transfer succeeds is any state mutated, so
//! a rejected or unpaid match leaves the registry untouched.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use tracing::{debug, info, warn};
use types::blood::BloodType;
use types::errors::MatchError;
use types::ids::{AccountId, MatchId, NeedId};

use crate::config::{RegistryConfig, MAX_LOCATION_LEN, MAX_PRIORITY, MAX_RADIUS, MAX_URGENCY};
use crate::errors::RegistryError;
use crate::events::{
    AuthoritySet, MatchCreated, MatchFeeUpdated, MatchStatusUpdated, MaxMatchesUpdated,
    RegistryEvent,
};
use crate::security::AuthorityGate;
use crate::transfer::FeeTransfer;

/// Per-call context supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Identity invoking the operation
    pub caller: AccountId,
    /// Logical clock (block height) at call time
    pub block_height: u64,
}

impl CallContext {
    pub fn new(caller: AccountId, block_height: u64) -> Self {
        Self {
            caller,
            block_height,
        }
    }
}

/// Proposed donor-to-need pairing, as submitted.
///
/// Fields keep the caller's raw widths; the pipeline narrows them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRequest {
    pub donor: AccountId,
    pub need_id: NeedId,
    pub donor_blood_type: String,
    pub location: String,
    pub radius: i64,
    pub urgency: u64,
    pub priority: u64,
    pub quantity: i64,
    pub needed_blood_type: BloodType,
}

/// An admitted match.
///
/// Only `status` and `timestamp` change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub donor: AccountId,
    pub need_id: NeedId,
    pub blood_type: BloodType,
    pub location: String,
    pub radius: u32,
    pub urgency: u8,
    pub priority: u8,
    pub quantity: u64,
    /// Block height at creation or last status change
    pub timestamp: u64,
    /// `true` = active
    pub status: bool,
}

impl Match {
    pub fn is_active(&self) -> bool {
        self.status
    }
}

/// Fields that passed validation, narrowed to their stored widths.
#[derive(Debug)]
struct Admission {
    blood_type: BloodType,
    radius: u32,
    urgency: u8,
    priority: u8,
    quantity: u64,
    authority: AccountId,
}

/// Ordered, duplicate-free lists of match ids keyed by donor or need.
#[derive(Debug, Clone)]
struct MatchIndex<K> {
    lists: HashMap<K, Vec<MatchId>>,
}

impl<K: Eq + Hash> MatchIndex<K> {
    fn new() -> Self {
        Self {
            lists: HashMap::new(),
        }
    }

    fn ids(&self, key: &K) -> &[MatchId] {
        self.lists.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    fn ensure_absent(&self, key: &K, id: MatchId) -> Result<(), MatchError> {
        if self.ids(key).contains(&id) {
            return Err(MatchError::AlreadyMatched { id });
        }
        Ok(())
    }

    fn insert(&mut self, key: K, id: MatchId) -> Result<(), MatchError> {
        let list = self.lists.entry(key).or_default();
        if list.contains(&id) {
            return Err(MatchError::AlreadyMatched { id });
        }
        list.push(id);
        Ok(())
    }
}

/// Authority, fee and counters shared by every registry operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryState {
    authority: AuthorityGate,
    match_fee: u64,
    max_matches: u64,
    /// Next id to assign == matches created so far
    last_match_id: u64,
    strict_fee_authority: bool,
}

impl RegistryState {
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self {
            authority: AuthorityGate::new(),
            match_fee: config.initial_match_fee,
            max_matches: config.max_matches,
            last_match_id: 0,
            strict_fee_authority: config.strict_fee_authority,
        }
    }

    pub fn authority(&self) -> Option<AccountId> {
        self.authority.get()
    }

    pub fn match_fee(&self) -> u64 {
        self.match_fee
    }

    pub fn max_matches(&self) -> u64 {
        self.max_matches
    }
}

/// Core match registry.
///
/// Operations take `&mut self` and run to completion; hosts with
/// concurrent callers go through [`crate::shared::SharedRegistry`].
#[derive(Debug)]
pub struct MatchRegistry {
    state: RegistryState,
    matches: BTreeMap<MatchId, Match>,
    donor_matches: MatchIndex<AccountId>,
    need_matches: MatchIndex<NeedId>,
    /// Emitted events log (append-only)
    events: Vec<RegistryEvent>,
}

impl MatchRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        info!(
            max_matches = config.max_matches,
            match_fee = config.initial_match_fee,
            strict_fee_authority = config.strict_fee_authority,
            "MatchRegistry initialized"
        );

        Self {
            state: RegistryState::from_config(&config),
            matches: BTreeMap::new(),
            donor_matches: MatchIndex::new(),
            need_matches: MatchIndex::new(),
            events: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RegistryConfig::default())
    }

    // ───────────────────────── Configuration ─────────────────────────

    /// Bootstrap the authority. One-time; the burn address is refused.
    pub fn set_authority(&mut self, candidate: AccountId) -> Result<(), MatchError> {
        self.state
            .authority
            .set(candidate)
            .map_err(|err| rejected("set_authority", err))?;

        info!(authority = %candidate, "Authority set");
        self.events
            .push(RegistryEvent::AuthoritySet(AuthoritySet { authority: candidate }));
        Ok(())
    }

    /// Change the per-match fee.
    ///
    /// Requires an authority. With `strict_fee_authority` the caller must
    /// also be that authority; otherwise any caller may change the fee.
    pub fn set_match_fee(&mut self, new_fee: u64, ctx: &CallContext) -> Result<(), MatchError> {
        let check = if self.state.strict_fee_authority {
            self.state.authority.require_caller(&ctx.caller)
        } else {
            self.state.authority.require()
        };
        check.map_err(|err| rejected("set_match_fee", err))?;

        let old_fee = std::mem::replace(&mut self.state.match_fee, new_fee);
        info!(old_fee, new_fee, caller = %ctx.caller, "Match fee updated");
        self.events
            .push(RegistryEvent::MatchFeeUpdated(MatchFeeUpdated {
                old_fee,
                new_fee,
                updated_by: ctx.caller,
            }));
        Ok(())
    }

    /// Change the match ceiling. Authority only.
    ///
    /// The ceiling must be positive and never below the number of matches
    /// already created.
    pub fn set_max_matches(
        &mut self,
        new_max: u64,
        ctx: &CallContext,
    ) -> Result<(), RegistryError> {
        self.state
            .authority
            .require_caller(&ctx.caller)
            .map_err(|err| rejected("set_max_matches", err))?;

        let created = self.state.last_match_id;
        if new_max == 0 || new_max < created {
            warn!(new_max, created, "Match ceiling rejected");
            return Err(RegistryError::InvalidCeiling {
                requested: new_max,
                created,
            });
        }

        let old_max = std::mem::replace(&mut self.state.max_matches, new_max);
        info!(old_max, new_max, "Max matches updated");
        self.events
            .push(RegistryEvent::MaxMatchesUpdated(MaxMatchesUpdated { old_max, new_max }));
        Ok(())
    }

    // ───────────────────────── Admission ─────────────────────────

    /// Validate, charge and record a new match. Returns its id.
    ///
    /// `transfer` is invoked exactly once, with `(match_fee, caller,
    /// authority)`, and only when validation passes. Its failure aborts
    /// the call with nothing recorded.
    pub fn create_match<T>(
        &mut self,
        request: MatchRequest,
        ctx: &CallContext,
        transfer: &mut T,
    ) -> Result<MatchId, RegistryError>
    where
        T: FeeTransfer + ?Sized,
    {
        let admission = self
            .validate(&request)
            .map_err(|err| rejected("create_match", err))?;

        let id = MatchId::new(self.state.last_match_id);
        // Bounded by max_matches, so only reachable at u64::MAX.
        let next_id = id.next().ok_or(MatchError::MaxMatchesExceeded {
            limit: self.state.max_matches,
        })?;
        self.donor_matches
            .ensure_absent(&request.donor, id)
            .and_then(|()| self.need_matches.ensure_absent(&request.need_id, id))
            .map_err(|err| rejected("create_match", err))?;

        let fee = self.state.match_fee;
        if let Err(err) = transfer.transfer(fee, &ctx.caller, &admission.authority) {
            warn!(fee, caller = %ctx.caller, error = %err, "Match fee transfer failed");
            return Err(err.into());
        }

        // Index checks above make these inserts infallible.
        self.donor_matches.insert(request.donor, id)?;
        self.need_matches.insert(request.need_id, id)?;
        self.state.last_match_id = next_id.value();

        let record = Match {
            donor: request.donor,
            need_id: request.need_id,
            blood_type: admission.blood_type,
            location: request.location,
            radius: admission.radius,
            urgency: admission.urgency,
            priority: admission.priority,
            quantity: admission.quantity,
            timestamp: ctx.block_height,
            status: true,
        };

        info!(
            match_id = %id,
            donor = %record.donor,
            need_id = %record.need_id,
            blood_type = %record.blood_type,
            fee,
            "Match created"
        );

        self.events.push(RegistryEvent::MatchCreated(MatchCreated {
            match_id: id,
            donor: record.donor,
            need_id: record.need_id,
            blood_type: record.blood_type,
            fee_paid: fee,
            payer: ctx.caller,
            block_height: ctx.block_height,
        }));
        self.matches.insert(id, record);
        Ok(id)
    }

    fn validate(&self, request: &MatchRequest) -> Result<Admission, MatchError> {
        if self.state.last_match_id >= self.state.max_matches {
            return Err(MatchError::MaxMatchesExceeded {
                limit: self.state.max_matches,
            });
        }

        let blood_type: BloodType = request
            .donor_blood_type
            .parse()
            .map_err(|_| MatchError::InvalidBloodType(request.donor_blood_type.clone()))?;

        let location_len = request.location.chars().count();
        if location_len == 0 || location_len > MAX_LOCATION_LEN {
            return Err(MatchError::InvalidLocation {
                len: location_len,
                max: MAX_LOCATION_LEN,
            });
        }

        if request.radius <= 0 || request.radius > MAX_RADIUS {
            return Err(MatchError::InvalidRadius(request.radius));
        }
        if request.urgency > MAX_URGENCY {
            return Err(MatchError::InvalidUrgency(request.urgency));
        }
        if request.priority > MAX_PRIORITY {
            return Err(MatchError::InvalidPriority(request.priority));
        }
        if request.quantity <= 0 {
            return Err(MatchError::InvalidQuantity(request.quantity));
        }

        if !blood_type.can_donate_to(request.needed_blood_type) {
            return Err(MatchError::InvalidCompatibility {
                donor: blood_type.to_string(),
                needed: request.needed_blood_type.to_string(),
            });
        }

        let authority = self.state.authority.require()?;

        // Bounds checked above; the conversions cannot fail.
        Ok(Admission {
            blood_type,
            radius: u32::try_from(request.radius)
                .map_err(|_| MatchError::InvalidRadius(request.radius))?,
            urgency: u8::try_from(request.urgency)
                .map_err(|_| MatchError::InvalidUrgency(request.urgency))?,
            priority: u8::try_from(request.priority)
                .map_err(|_| MatchError::InvalidPriority(request.priority))?,
            quantity: u64::try_from(request.quantity)
                .map_err(|_| MatchError::InvalidQuantity(request.quantity))?,
            authority,
        })
    }

    // ───────────────────────── Status ─────────────────────────

    /// Set a match active or inactive. Only its donor may do this.
    pub fn update_match_status(
        &mut self,
        id: MatchId,
        status: bool,
        ctx: &CallContext,
    ) -> Result<(), MatchError> {
        let record = match self.matches.get_mut(&id) {
            Some(record) => record,
            None => return Err(rejected("update_match_status", MatchError::NotFound { id })),
        };
        if record.donor != ctx.caller {
            return Err(rejected("update_match_status", MatchError::NotAuthorized));
        }

        record.status = status;
        record.timestamp = ctx.block_height;

        debug!(match_id = %id, active = status, block_height = ctx.block_height, "Match status updated");
        self.events
            .push(RegistryEvent::MatchStatusUpdated(MatchStatusUpdated {
                match_id: id,
                active: status,
                block_height: ctx.block_height,
            }));
        Ok(())
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.get(&id)
    }

    /// Total matches ever created.
    pub fn get_match_count(&self) -> u64 {
        self.state.last_match_id
    }

    pub fn is_compatible(&self, donor: BloodType, needed: BloodType) -> bool {
        donor.can_donate_to(needed)
    }

    /// Match ids created for `donor`, oldest first.
    pub fn donor_matches(&self, donor: &AccountId) -> &[MatchId] {
        self.donor_matches.ids(donor)
    }

    /// Match ids serving `need_id`, oldest first.
    pub fn need_matches(&self, need_id: NeedId) -> &[MatchId] {
        self.need_matches.ids(&need_id)
    }

    /// Active match ids serving `need_id`, oldest first.
    pub fn active_matches_for_need(&self, need_id: NeedId) -> Vec<MatchId> {
        self.need_matches(need_id)
            .iter()
            .copied()
            .filter(|id| self.matches.get(id).is_some_and(Match::is_active))
            .collect()
    }

    pub fn authority(&self) -> Option<AccountId> {
        self.state.authority()
    }

    pub fn match_fee(&self) -> u64 {
        self.state.match_fee()
    }

    pub fn max_matches(&self) -> u64 {
        self.state.max_matches()
    }

    // ───────────────────────── Events ─────────────────────────

    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn rejected(operation: &'static str, err: MatchError) -> MatchError {
    warn!(operation, code = err.code(), error = %err, "Operation rejected");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::FeeLedger;
    use types::errors::TransferError;

    struct RejectingTransfer;

    impl FeeTransfer for RejectingTransfer {
        fn transfer(&mut self, _: u64, _: &AccountId, _: &AccountId) -> Result<(), TransferError> {
            Err(TransferError::Rejected {
                reason: "offline".to_string(),
            })
        }
    }

    fn request(donor: AccountId) -> MatchRequest {
        MatchRequest {
            donor,
            need_id: NeedId::new(1),
            donor_blood_type: "O+".to_string(),
            location: "CityA".to_string(),
            radius: 50,
            urgency: 5,
            priority: 3,
            quantity: 2,
            needed_blood_type: BloodType::APos,
        }
    }

    fn setup() -> (MatchRegistry, FeeLedger, AccountId, AccountId) {
        let mut registry = MatchRegistry::with_defaults();
        let authority = AccountId::new();
        let caller = AccountId::new();
        registry.set_authority(authority).unwrap();
        let mut ledger = FeeLedger::new();
        ledger.fund(caller, 10_000).unwrap();
        (registry, ledger, authority, caller)
    }

    fn create_err(registry: &mut MatchRegistry, req: MatchRequest) -> MatchError {
        let mut ledger = FeeLedger::new();
        let ctx = CallContext::new(AccountId::new(), 1);
        match registry.create_match(req, &ctx, &mut ledger) {
            Err(RegistryError::Match(err)) => err,
            other => panic!("expected match error, got {other:?}"),
        }
    }

    // ─── Configuration ───

    #[test]
    fn test_set_authority_twice() {
        let mut registry = MatchRegistry::with_defaults();
        let first = AccountId::new();
        registry.set_authority(first).unwrap();
        assert_eq!(registry.set_authority(AccountId::new()), Err(MatchError::AlreadySet));
        assert_eq!(registry.authority(), Some(first));
    }

    #[test]
    fn test_set_authority_burn_rejected() {
        let mut registry = MatchRegistry::with_defaults();
        assert_eq!(
            registry.set_authority(AccountId::burn()),
            Err(MatchError::InvalidAuthority)
        );
        assert_eq!(registry.authority(), None);
        assert!(registry.events().is_empty());
    }

    #[test]
    fn test_set_fee_requires_authority() {
        let mut registry = MatchRegistry::with_defaults();
        let ctx = CallContext::new(AccountId::new(), 0);
        assert_eq!(registry.set_match_fee(200, &ctx), Err(MatchError::AuthorityNotSet));
        assert_eq!(registry.match_fee(), 100);
    }

    #[test]
    fn test_set_fee_any_caller_by_default() {
        let (mut registry, _, _, caller) = setup();
        registry.set_match_fee(200, &CallContext::new(caller, 0)).unwrap();
        assert_eq!(registry.match_fee(), 200);
    }

    #[test]
    fn test_set_fee_strict_requires_authority_caller() {
        let mut registry = MatchRegistry::new(RegistryConfig {
            strict_fee_authority: true,
            ..RegistryConfig::default()
        });
        let authority = AccountId::new();
        registry.set_authority(authority).unwrap();

        let outsider = CallContext::new(AccountId::new(), 0);
        assert_eq!(registry.set_match_fee(1, &outsider), Err(MatchError::NotAuthorized));
        assert_eq!(registry.match_fee(), 100);

        registry.set_match_fee(1, &CallContext::new(authority, 0)).unwrap();
        assert_eq!(registry.match_fee(), 1);
    }

    #[test]
    fn test_set_max_matches_authority_only() {
        let (mut registry, _, authority, caller) = setup();
        assert_eq!(
            registry.set_max_matches(5, &CallContext::new(caller, 0)),
            Err(RegistryError::Match(MatchError::NotAuthorized))
        );
        registry.set_max_matches(5, &CallContext::new(authority, 0)).unwrap();
        assert_eq!(registry.max_matches(), 5);
    }

    #[test]
    fn test_set_max_matches_rejects_zero() {
        let (mut registry, _, authority, _) = setup();
        assert_eq!(
            registry.set_max_matches(0, &CallContext::new(authority, 0)),
            Err(RegistryError::InvalidCeiling {
                requested: 0,
                created: 0
            })
        );
        assert_eq!(registry.max_matches(), 10_000);
    }

    #[test]
    fn test_set_max_matches_not_below_count() {
        let (mut registry, mut ledger, authority, caller) = setup();
        let ctx = CallContext::new(caller, 1);
        for _ in 0..3 {
            registry.create_match(request(caller), &ctx, &mut ledger).unwrap();
        }
        let events_before = registry.events().len();

        assert_eq!(
            registry.set_max_matches(1, &CallContext::new(authority, 2)),
            Err(RegistryError::InvalidCeiling {
                requested: 1,
                created: 3
            })
        );
        assert_eq!(registry.max_matches(), 10_000);
        assert_eq!(registry.events().len(), events_before);

        registry.set_max_matches(3, &CallContext::new(authority, 2)).unwrap();
        assert_eq!(registry.max_matches(), 3);
        assert_eq!(
            registry.create_match(request(caller), &ctx, &mut ledger),
            Err(RegistryError::Match(MatchError::MaxMatchesExceeded { limit: 3 }))
        );
        assert_eq!(registry.get_match_count(), 3);
    }

    // ─── Pipeline precedence ───

    #[test]
    fn test_max_matches_checked_first() {
        let mut registry = MatchRegistry::new(RegistryConfig {
            max_matches: 0,
            ..RegistryConfig::default()
        });
        let mut req = request(AccountId::new());
        req.donor_blood_type = "X+".to_string();
        assert_eq!(
            create_err(&mut registry, req),
            MatchError::MaxMatchesExceeded { limit: 0 }
        );
    }

    #[test]
    fn test_invalid_blood_type_before_location() {
        let mut registry = MatchRegistry::with_defaults();
        let mut req = request(AccountId::new());
        req.donor_blood_type = "X+".to_string();
        req.location = String::new();
        assert_eq!(
            create_err(&mut registry, req),
            MatchError::InvalidBloodType("X+".to_string())
        );
    }

    #[test]
    fn test_location_bounds() {
        let mut registry = MatchRegistry::with_defaults();

        let mut req = request(AccountId::new());
        req.location = String::new();
        req.radius = 0;
        assert_eq!(
            create_err(&mut registry, req),
            MatchError::InvalidLocation { len: 0, max: 50 }
        );

        let mut req = request(AccountId::new());
        req.location = "a".repeat(51);
        assert_eq!(
            create_err(&mut registry, req),
            MatchError::InvalidLocation { len: 51, max: 50 }
        );
    }

    #[test]
    fn test_location_length_counts_chars() {
        let (mut registry, mut ledger, _, caller) = setup();
        let ctx = CallContext::new(caller, 1);

        let mut req = request(AccountId::new());
        req.location = "\u{1F3E5}é".repeat(25);
        assert_eq!(req.location.chars().count(), 50);
        assert!(registry.create_match(req, &ctx, &mut ledger).is_ok());

        let mut req = request(AccountId::new());
        req.location = "é".repeat(51);
        assert_eq!(
            registry.create_match(req, &ctx, &mut ledger),
            Err(RegistryError::Match(MatchError::InvalidLocation { len: 51, max: 50 }))
        );
    }

    #[test]
    fn test_location_of_fifty_chars_accepted() {
        let (mut registry, mut ledger, _, caller) = setup();
        let mut req = request(AccountId::new());
        req.location = "a".repeat(50);
        assert!(registry
            .create_match(req, &CallContext::new(caller, 1), &mut ledger)
            .is_ok());
    }

    #[test]
    fn test_radius_bounds() {
        let mut registry = MatchRegistry::with_defaults();
        for radius in [0, -5, 1001] {
            let mut req = request(AccountId::new());
            req.radius = radius;
            req.urgency = 99;
            assert_eq!(create_err(&mut registry, req), MatchError::InvalidRadius(radius));
        }
    }

    #[test]
    fn test_urgency_priority_quantity() {
        let mut registry = MatchRegistry::with_defaults();

        let mut req = request(AccountId::new());
        req.urgency = 11;
        req.priority = 6;
        assert_eq!(create_err(&mut registry, req), MatchError::InvalidUrgency(11));

        let mut req = request(AccountId::new());
        req.priority = 6;
        req.quantity = 0;
        assert_eq!(create_err(&mut registry, req), MatchError::InvalidPriority(6));

        let mut req = request(AccountId::new());
        req.quantity = -1;
        req.needed_blood_type = BloodType::ONeg;
        assert_eq!(create_err(&mut registry, req), MatchError::InvalidQuantity(-1));
    }

    #[test]
    fn test_compatibility_before_authority() {
        let mut registry = MatchRegistry::with_defaults();
        let mut req = request(AccountId::new());
        req.donor_blood_type = "A+".to_string();
        req.needed_blood_type = BloodType::BPos;
        assert_eq!(
            create_err(&mut registry, req),
            MatchError::InvalidCompatibility {
                donor: "A+".to_string(),
                needed: "B+".to_string(),
            }
        );
    }

    #[test]
    fn test_authority_checked_last() {
        let mut registry = MatchRegistry::with_defaults();
        assert_eq!(
            create_err(&mut registry, request(AccountId::new())),
            MatchError::AuthorityNotSet
        );
    }

    #[test]
    fn test_boundary_values_accepted() {
        let (mut registry, mut ledger, _, caller) = setup();
        let mut req = request(AccountId::new());
        req.radius = 1000;
        req.urgency = 10;
        req.priority = 5;
        req.quantity = 1;
        let id = registry
            .create_match(req, &CallContext::new(caller, 1), &mut ledger)
            .unwrap();
        let record = registry.get_match(id).unwrap();
        assert_eq!((record.radius, record.urgency, record.priority), (1000, 10, 5));
    }

    // ─── Admission effects ───

    #[test]
    fn test_create_match_records_and_indexes() {
        let (mut registry, mut ledger, authority, caller) = setup();
        let donor = AccountId::new();
        let id = registry
            .create_match(request(donor), &CallContext::new(caller, 12), &mut ledger)
            .unwrap();

        assert_eq!(id, MatchId::new(0));
        let record = registry.get_match(id).unwrap();
        assert_eq!(record.donor, donor);
        assert_eq!(record.blood_type, BloodType::OPos);
        assert_eq!(record.timestamp, 12);
        assert!(record.status);

        assert_eq!(registry.donor_matches(&donor), &[id]);
        assert_eq!(registry.need_matches(NeedId::new(1)), &[id]);
        assert_eq!(registry.get_match_count(), 1);
        assert_eq!(ledger.balance(&authority), 100);
        assert_eq!(ledger.balance(&caller), 9_900);
    }

    #[test]
    fn test_transfer_failure_rolls_back() {
        let (mut registry, _, _, caller) = setup();
        let donor = AccountId::new();
        let result = registry.create_match(
            request(donor),
            &CallContext::new(caller, 3),
            &mut RejectingTransfer,
        );

        assert!(matches!(result, Err(RegistryError::Transfer(_))));
        assert_eq!(registry.get_match_count(), 0);
        assert!(registry.get_match(MatchId::new(0)).is_none());
        assert!(registry.donor_matches(&donor).is_empty());
        assert!(registry.need_matches(NeedId::new(1)).is_empty());
        assert_eq!(registry.events().len(), 1, "only AuthoritySet");
    }

    #[test]
    fn test_rejected_match_does_not_charge() {
        let (mut registry, mut ledger, _, caller) = setup();
        let mut req = request(AccountId::new());
        req.quantity = 0;
        let result = registry.create_match(req, &CallContext::new(caller, 1), &mut ledger);
        assert_eq!(
            result,
            Err(RegistryError::Match(MatchError::InvalidQuantity(0)))
        );
        assert!(ledger.transfers().is_empty());
    }

    #[test]
    fn test_corrupted_index_detected_before_charge() {
        let (mut registry, mut ledger, _, caller) = setup();
        let donor = AccountId::new();
        registry.donor_matches.insert(donor, MatchId::new(0)).unwrap();

        let result = registry.create_match(request(donor), &CallContext::new(caller, 1), &mut ledger);

        assert_eq!(
            result,
            Err(RegistryError::Match(MatchError::AlreadyMatched { id: MatchId::new(0) }))
        );
        assert!(ledger.transfers().is_empty());
        assert_eq!(registry.get_match_count(), 0);
    }

    #[test]
    fn test_index_insert_rejects_duplicate() {
        let mut index: MatchIndex<NeedId> = MatchIndex::new();
        index.insert(NeedId::new(1), MatchId::new(4)).unwrap();
        assert_eq!(
            index.insert(NeedId::new(1), MatchId::new(4)),
            Err(MatchError::AlreadyMatched { id: MatchId::new(4) })
        );
        assert_eq!(index.ids(&NeedId::new(1)), &[MatchId::new(4)]);
    }

    // ─── Status ───

    #[test]
    fn test_update_status_by_donor() {
        let (mut registry, mut ledger, _, caller) = setup();
        let id = registry
            .create_match(request(caller), &CallContext::new(caller, 1), &mut ledger)
            .unwrap();

        registry
            .update_match_status(id, false, &CallContext::new(caller, 9))
            .unwrap();
        let record = registry.get_match(id).unwrap();
        assert!(!record.status);
        assert_eq!(record.timestamp, 9);

        registry
            .update_match_status(id, true, &CallContext::new(caller, 10))
            .unwrap();
        assert!(registry.get_match(id).unwrap().status);
    }

    #[test]
    fn test_update_status_not_found() {
        let mut registry = MatchRegistry::with_defaults();
        let ctx = CallContext::new(AccountId::new(), 0);
        assert_eq!(
            registry.update_match_status(MatchId::new(7), false, &ctx),
            Err(MatchError::NotFound { id: MatchId::new(7) })
        );
    }

    #[test]
    fn test_update_status_by_other_rejected() {
        let (mut registry, mut ledger, _, caller) = setup();
        let donor = AccountId::new();
        let id = registry
            .create_match(request(donor), &CallContext::new(caller, 1), &mut ledger)
            .unwrap();

        assert_eq!(
            registry.update_match_status(id, false, &CallContext::new(caller, 5)),
            Err(MatchError::NotAuthorized)
        );
        let record = registry.get_match(id).unwrap();
        assert!(record.status);
        assert_eq!(record.timestamp, 1);
    }

    #[test]
    fn test_active_matches_for_need() {
        let (mut registry, mut ledger, _, caller) = setup();
        let ctx = CallContext::new(caller, 1);
        let first = registry.create_match(request(caller), &ctx, &mut ledger).unwrap();
        let second = registry.create_match(request(caller), &ctx, &mut ledger).unwrap();
        registry.update_match_status(first, false, &ctx).unwrap();

        assert_eq!(registry.need_matches(NeedId::new(1)), &[first, second]);
        assert_eq!(registry.active_matches_for_need(NeedId::new(1)), vec![second]);
    }

    // ─── Events ───

    #[test]
    fn test_events_emitted_and_drained() {
        let (mut registry, mut ledger, _, caller) = setup();
        let ctx = CallContext::new(caller, 1);
        let id = registry.create_match(request(caller), &ctx, &mut ledger).unwrap();
        registry.update_match_status(id, false, &ctx).unwrap();

        let events = registry.drain_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], RegistryEvent::AuthoritySet(_)));
        assert!(matches!(events[1], RegistryEvent::MatchCreated(_)));
        assert!(matches!(events[2], RegistryEvent::MatchStatusUpdated(_)));
        assert!(registry.events().is_empty());
    }
}
