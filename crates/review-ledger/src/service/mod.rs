//! # Review Ledger Service
//!
//! The operation dispatcher. Wires the record store, the mint authority and
//! the reward distributor together and runs every request through
//!
//! ```text
//! Received → Validated → Applied → Committed
//!                    └──────────→ Failed
//! ```
//!
//! ## Create Transaction
//!
//! 1. Validate the draft and derive the record address (no I/O).
//! 2. Lock the record, reward-account and mint stripes.
//! 3. Require an initialized mint.
//! 4. Insert the record.
//! 5. Credit the reward.
//! 6. If step 5 fails, delete the record inserted in step 4 before
//!    returning the reward error.
//!
//! Locks are held until events are published, so readers and the event
//! log never observe a half-applied create.

pub mod locks;
pub mod mint_authority;
pub mod record_store;
pub mod reward_distributor;

pub use locks::AddressLocks;
pub use mint_authority::{CreditReceipt, CreditTarget, MintAuthority};
pub use record_store::{RecordIter, RecordStore};
pub use reward_distributor::RewardDistributor;

use crate::config::{ConfigError, LedgerConfig};
use crate::domain::address::AddressDeriver;
use crate::domain::codec::{self, AccountData};
use crate::domain::entities::{MintHandle, Record, RewardAccount, RewardMint, Versioned};
use crate::domain::invariants::{ReviewDraft, ReviewPatch};
use crate::errors::{LedgerError, LedgerResult};
use crate::events::{LedgerEvent, LedgerEventKind};
use crate::ports::inbound::{Operation, OperationOutcome, ReviewLedgerApi};
use crate::ports::outbound::{EventSink, LedgerStorage};
use parking_lot::RwLock;
use shared_types::{Address, AuthenticatedRequest, Identity};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Read and decode the account at `address` with its version.
pub(crate) fn load_versioned<T: AccountData, S: LedgerStorage + ?Sized>(
    storage: &S,
    address: &Address,
) -> LedgerResult<Option<Versioned<T>>> {
    match storage.get(address)? {
        Some(entry) => Ok(Some(Versioned {
            value: codec::decode(address, &entry.data)?,
            version: entry.version,
        })),
        None => Ok(None),
    }
}

// =============================================================================
// REQUEST LIFECYCLE
// =============================================================================

/// Dispatcher phases, logged at `debug`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestPhase {
    Received,
    Validated,
    Applied,
    Committed,
    Failed,
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Applied => "applied",
            Self::Committed => "committed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Caller and correlation id of the request being served.
#[derive(Clone, Copy, Debug)]
struct RequestContext {
    caller: Identity,
    correlation_id: Uuid,
}

impl RequestContext {
    fn fresh(caller: Identity) -> Self {
        Self {
            caller,
            correlation_id: Uuid::new_v4(),
        }
    }

    /// Context for typed reads, which carry no caller.
    fn anonymous() -> Self {
        Self::fresh(Identity::default())
    }
}

/// Statistics for the review ledger service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Requests entering the dispatcher.
    pub requests_received: u64,
    /// Requests that completed successfully.
    pub requests_committed: u64,
    /// Requests that returned an error.
    pub requests_failed: u64,
    /// Rewards credited.
    pub rewards_issued: u64,
    /// Creates undone because their reward failed.
    pub compensations: u64,
    /// Undo attempts that themselves failed.
    pub compensation_failures: u64,
}

// =============================================================================
// SERVICE
// =============================================================================

/// The review ledger.
///
/// Thread-safe; share it behind an `Arc`.
pub struct ReviewLedgerService<S: LedgerStorage, E: EventSink> {
    config: LedgerConfig,
    deriver: AddressDeriver,
    records: RecordStore<S>,
    mint: Arc<MintAuthority<S>>,
    distributor: RewardDistributor<S>,
    locks: AddressLocks,
    events: Arc<E>,
    sequence: AtomicU64,
    stats: RwLock<ServiceStats>,
}

impl<S: LedgerStorage, E: EventSink> ReviewLedgerService<S, E> {
    /// Build a service over `storage`, publishing to `events`.
    pub fn new(config: LedgerConfig, storage: Arc<S>, events: Arc<E>) -> Result<Self, ConfigError> {
        config.validate()?;
        let amount = config.reward.amount()?;
        let deriver = AddressDeriver::new(config.derivation);
        let mint = Arc::new(
            MintAuthority::new(
                Arc::clone(&storage),
                deriver,
                config.concurrency.max_commit_retries,
            )
            .map_err(|e| ConfigError::InvalidDerivationLimit(e.to_string()))?,
        );
        let distributor = RewardDistributor::new(Arc::clone(&mint), config.reward.authority, amount);
        let records = RecordStore::new(
            storage,
            deriver,
            config.limits,
            config.concurrency.max_commit_retries,
        );
        let locks = AddressLocks::new(
            config.concurrency.lock_stripes,
            config.concurrency.lock_timeout(),
        );

        Ok(Self {
            config,
            deriver,
            records,
            mint,
            distributor,
            locks,
            events,
            sequence: AtomicU64::new(0),
            stats: RwLock::new(ServiceStats::default()),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn deriver(&self) -> &AddressDeriver {
        &self.deriver
    }

    pub fn events(&self) -> &Arc<E> {
        &self.events
    }

    pub fn mint_address(&self) -> Address {
        self.mint.mint_address()
    }

    /// Base units credited per review creation.
    pub fn reward_amount(&self) -> u64 {
        self.distributor.amount()
    }

    /// Get current service statistics.
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// Lazy snapshot of every record. Takes no locks.
    pub fn list(&self) -> LedgerResult<RecordIter> {
        self.records.list()
    }

    /// Read a record with its storage version. Each incarnation of an
    /// address carries a strictly greater version than the last.
    pub fn read_versioned(&self, address: &Address) -> LedgerResult<Versioned<Record>> {
        let _guard = self.locks.read(address)?;
        self.records.read_versioned(address)
    }

    /// Entry point for enveloped requests.
    pub fn dispatch(
        &self,
        request: AuthenticatedRequest<Operation>,
    ) -> LedgerResult<OperationOutcome> {
        let ctx = RequestContext {
            caller: request.caller,
            correlation_id: request.correlation_id,
        };
        let name = request.payload.name();
        self.run(ctx, name, || {
            request.check_version()?;
            self.execute(&ctx, request.payload)
        })
    }

    #[instrument(
        name = "ledger_request",
        skip(self, ctx, f),
        fields(correlation_id = %ctx.correlation_id, caller = %ctx.caller)
    )]
    fn run<T>(
        &self,
        ctx: RequestContext,
        op: &'static str,
        f: impl FnOnce() -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        self.stats.write().requests_received += 1;
        debug!(phase = %RequestPhase::Received, "request received");

        let result = f();

        let mut stats = self.stats.write();
        match &result {
            Ok(_) => {
                stats.requests_committed += 1;
                debug!(phase = %RequestPhase::Committed, "request committed");
            }
            Err(e) => {
                stats.requests_failed += 1;
                warn!(kind = %e.kind(), error = %e, "request rejected");
                debug!(phase = %RequestPhase::Failed, "request failed");
            }
        }
        result
    }

    fn execute(&self, ctx: &RequestContext, op: Operation) -> LedgerResult<OperationOutcome> {
        match op {
            Operation::InitializeMint { authority } => self
                .initialize_mint_in(ctx, authority)
                .map(OperationOutcome::Mint),
            Operation::CreateReview {
                title,
                description,
                rating,
            } => self
                .create_in(ctx, ReviewDraft::new(title, description, rating))
                .map(OperationOutcome::Review),
            Operation::ReadReview { address } => {
                self.read_in(&address).map(OperationOutcome::Review)
            }
            Operation::UpdateReview {
                address,
                description,
                rating,
            } => self
                .update_in(ctx, &address, ReviewPatch::new(description, rating))
                .map(OperationOutcome::Review),
            Operation::DeleteReview { address } => self
                .delete_in(ctx, &address)
                .map(|()| OperationOutcome::Deleted { address }),
            Operation::ListReviews { owner } => {
                self.list_in(owner.as_ref()).map(OperationOutcome::Reviews)
            }
            Operation::GetRewardAccount { owner } => self
                .reward_account_in(&owner)
                .map(OperationOutcome::RewardAccount),
        }
    }

    fn publish(&self, ctx: &RequestContext, kind: LedgerEventKind) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.events.publish(LedgerEvent {
            sequence,
            correlation_id: ctx.correlation_id,
            kind,
        });
    }

    // =========================================================================
    // HANDLERS
    // =========================================================================

    fn initialize_mint_in(
        &self,
        ctx: &RequestContext,
        authority: Identity,
    ) -> LedgerResult<MintHandle> {
        let expected = self.config.reward.authority;
        if authority != expected {
            return Err(LedgerError::AuthorityMismatch {
                authority,
                expected,
            });
        }
        debug!(phase = %RequestPhase::Validated, "initialize mint");
        let _guards = self.locks.write(&[self.mint.mint_address()])?;
        let mint = self
            .mint
            .initialize(authority, self.config.reward.decimals)?;
        debug!(phase = %RequestPhase::Applied, mint = %mint.address);

        info!(mint = %mint.address, %authority, decimals = mint.decimals, "reward mint initialized");
        self.publish(
            ctx,
            LedgerEventKind::MintInitialized {
                mint: mint.address,
                authority,
                decimals: mint.decimals,
            },
        );
        Ok(mint.handle())
    }

    fn create_in(&self, ctx: &RequestContext, draft: ReviewDraft) -> LedgerResult<Record> {
        let owner = ctx.caller;
        let address = self.records.prepare(&owner, &draft)?;
        let mint_address = self.mint.mint_address();
        let account_address = self.mint.account_address(&owner)?;
        debug!(phase = %RequestPhase::Validated, %address, "create review");

        let _guards = self
            .locks
            .write(&[address, account_address, mint_address])?;
        self.mint.load()?;

        let inserted = self.records.create(owner, draft)?;
        let receipt = match self.distributor.reward(owner) {
            Ok(receipt) => receipt,
            Err(original) => return Err(self.compensate(ctx, &inserted, original)),
        };
        debug!(phase = %RequestPhase::Applied, %address, balance = receipt.account.balance);

        let record = inserted.value;
        info!(
            %address,
            %owner,
            title = %record.title,
            rating = record.rating,
            reward = receipt.amount,
            "review created"
        );
        self.stats.write().rewards_issued += 1;
        self.publish(
            ctx,
            LedgerEventKind::ReviewCreated {
                address,
                owner,
                title: record.title.clone(),
                rating: record.rating,
            },
        );
        if receipt.opened {
            self.publish(
                ctx,
                LedgerEventKind::RewardAccountOpened {
                    account: receipt.account.address,
                    owner,
                },
            );
        }
        self.publish(
            ctx,
            LedgerEventKind::RewardIssued {
                account: receipt.account.address,
                owner,
                amount: receipt.amount,
                balance: receipt.account.balance,
            },
        );
        Ok(record)
    }

    /// Undo `inserted` after its reward failed with `original`.
    fn compensate(
        &self,
        ctx: &RequestContext,
        inserted: &Versioned<Record>,
        original: LedgerError,
    ) -> LedgerError {
        let address = inserted.value.address;
        warn!(%address, error = %original, "reward failed, rolling back review");

        match self
            .records
            .remove_inserted(&address, &inserted.value.incarnation)
        {
            Ok(removed) => {
                if !removed {
                    debug!(%address, "record already gone before rollback");
                }
                self.stats.write().compensations += 1;
                self.publish(
                    ctx,
                    LedgerEventKind::CreationRolledBack {
                        address,
                        reason: original.to_string(),
                    },
                );
                original
            }
            Err(cause) => {
                self.stats.write().compensation_failures += 1;
                error!(%address, error = %original, cause = %cause, "rollback failed");
                LedgerError::CompensationFailed {
                    original: Box::new(original),
                    cause: Box::new(cause),
                }
            }
        }
    }

    fn read_in(&self, address: &Address) -> LedgerResult<Record> {
        debug!(phase = %RequestPhase::Validated, %address, "read review");
        let _guard = self.locks.read(address)?;
        self.records.read(address)
    }

    fn update_in(
        &self,
        ctx: &RequestContext,
        address: &Address,
        patch: ReviewPatch,
    ) -> LedgerResult<Record> {
        patch.validate(self.records.limits())?;
        debug!(phase = %RequestPhase::Validated, %address, "update review");

        let _guards = self.locks.write(&[*address])?;
        let updated = self.records.update(address, &ctx.caller, &patch)?;
        debug!(phase = %RequestPhase::Applied, %address, version = updated.version);

        let record = updated.value;
        info!(%address, rating = record.rating, "review updated");
        self.publish(
            ctx,
            LedgerEventKind::ReviewUpdated {
                address: *address,
                owner: record.owner,
                rating: record.rating,
            },
        );
        Ok(record)
    }

    fn delete_in(&self, ctx: &RequestContext, address: &Address) -> LedgerResult<()> {
        debug!(phase = %RequestPhase::Validated, %address, "delete review");
        let _guards = self.locks.write(&[*address])?;
        let removed = self.records.delete(address, &ctx.caller)?;
        debug!(phase = %RequestPhase::Applied, %address);

        info!(%address, title = %removed.title, "review deleted");
        self.publish(
            ctx,
            LedgerEventKind::ReviewDeleted {
                address: *address,
                owner: removed.owner,
                title: removed.title,
            },
        );
        Ok(())
    }

    fn list_in(&self, owner: Option<&Identity>) -> LedgerResult<Vec<Record>> {
        debug!(phase = %RequestPhase::Validated, filtered = owner.is_some(), "list reviews");
        match owner {
            Some(owner) => self.records.list_by_owner(owner),
            None => self.records.list()?.collect(),
        }
    }

    fn reward_account_in(&self, owner: &Identity) -> LedgerResult<RewardAccount> {
        let address = self.mint.account_address(owner)?;
        debug!(phase = %RequestPhase::Validated, account = %address, "get reward account");
        let _guard = self.locks.read(&address)?;
        self.mint
            .reward_account(owner)?
            .ok_or(LedgerError::NotFound {
                address,
                what: "reward account",
            })
    }
}

// =============================================================================
// ReviewLedgerApi Implementation
// =============================================================================

impl<S: LedgerStorage, E: EventSink> ReviewLedgerApi for ReviewLedgerService<S, E> {
    fn initialize_mint(&self, caller: Identity, authority: Identity) -> LedgerResult<MintHandle> {
        let ctx = RequestContext::fresh(caller);
        self.run(ctx, "initialize_mint", || {
            self.initialize_mint_in(&ctx, authority)
        })
    }

    fn mint(&self) -> LedgerResult<RewardMint> {
        self.mint.load().map(|v| v.value)
    }

    fn create_review(&self, caller: Identity, draft: ReviewDraft) -> LedgerResult<Record> {
        let ctx = RequestContext::fresh(caller);
        self.run(ctx, "create_review", || self.create_in(&ctx, draft))
    }

    fn read_review(&self, address: Address) -> LedgerResult<Record> {
        self.run(RequestContext::anonymous(), "read_review", || {
            self.read_in(&address)
        })
    }

    fn update_review(
        &self,
        caller: Identity,
        address: Address,
        patch: ReviewPatch,
    ) -> LedgerResult<Record> {
        let ctx = RequestContext::fresh(caller);
        self.run(ctx, "update_review", || self.update_in(&ctx, &address, patch))
    }

    fn delete_review(&self, caller: Identity, address: Address) -> LedgerResult<()> {
        let ctx = RequestContext::fresh(caller);
        self.run(ctx, "delete_review", || self.delete_in(&ctx, &address))
    }

    fn list_reviews(&self, owner: Option<Identity>) -> LedgerResult<Vec<Record>> {
        self.run(RequestContext::anonymous(), "list_reviews", || {
            self.list_in(owner.as_ref())
        })
    }

    fn reward_account(&self, owner: Identity) -> LedgerResult<RewardAccount> {
        self.run(RequestContext::anonymous(), "get_reward_account", || {
            self.reward_account_in(&owner)
        })
    }

    fn reward_balance(&self, owner: Identity) -> LedgerResult<u64> {
        self.run(RequestContext::anonymous(), "reward_balance", || {
            Ok(self
                .mint
                .reward_account(&owner)?
                .map_or(0, |account| account.balance))
        })
    }

    fn review_address(&self, owner: Identity, title: &str) -> LedgerResult<Address> {
        self.deriver.review_address(&owner, title)
    }
}

// =============================================================================
// TESTS
// =============================================================================
