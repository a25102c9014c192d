//! Shared test fixtures.

use parking_lot::Mutex;
use rand::Rng;
use review_ledger::ports::outbound::{CommitReceipt, StoredEntry, WriteBatch, WriteOp};
use review_ledger::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Ledger over in-memory storage with an inspectable event log.
pub type MemoryLedger = ReviewLedgerService<InMemoryStorage, InMemoryEventLog>;

/// Reward per creation under the default configuration.
pub const REWARD: u64 = 10_000_000;

pub fn identity(byte: u8) -> Identity {
    Identity::new([byte; 32])
}

pub fn payer() -> Identity {
    identity(0xFE)
}

pub fn alice() -> Identity {
    identity(0xA1)
}

pub fn bob() -> Identity {
    identity(0xB0)
}

pub fn random_identity<R: Rng>(rng: &mut R) -> Identity {
    Identity::new(rng.gen())
}

/// Default ledger with its mint initialized under the default authority.
pub fn ledger() -> MemoryLedger {
    ledger_with(LedgerConfig::default())
}

/// Ledger with `config`, mint initialized under the default authority.
pub fn ledger_with(config: LedgerConfig) -> MemoryLedger {
    let ledger = uninitialized_ledger(config);
    ledger
        .initialize_mint(payer(), default_mint_authority())
        .expect("mint initializes on fresh storage");
    ledger.events().clear();
    ledger
}

/// Authority of the mint in `foreign_mint_ledger`.
pub fn foreign_authority() -> Identity {
    identity(0xEE)
}

/// Default ledger over storage whose mint another instance initialized
/// under `foreign_authority()`. Every reward it attempts is unauthorized.
pub fn foreign_mint_ledger() -> MemoryLedger {
    let storage = Arc::new(InMemoryStorage::new());
    let mut foreign_config = LedgerConfig::default();
    foreign_config.reward.authority = foreign_authority();
    let foreign = ReviewLedgerService::new(
        foreign_config,
        Arc::clone(&storage),
        Arc::new(NoopEventSink),
    )
    .expect("valid config");
    foreign
        .initialize_mint(payer(), foreign_authority())
        .expect("mint initializes on fresh storage");

    ReviewLedgerService::new(
        LedgerConfig::default(),
        storage,
        Arc::new(InMemoryEventLog::new()),
    )
    .expect("valid config")
}

/// Ledger with no mint.
pub fn uninitialized_ledger(config: LedgerConfig) -> MemoryLedger {
    ReviewLedgerService::new(
        config,
        Arc::new(InMemoryStorage::new()),
        Arc::new(InMemoryEventLog::new()),
    )
    .expect("valid config")
}

/// Configuration with generous lock waits for thread-heavy tests.
pub fn patient_config() -> LedgerConfig {
    let mut config = LedgerConfig::default();
    config.concurrency.lock_timeout_ms = 10_000;
    config.concurrency.max_commit_retries = 1_000;
    config
}

pub fn draft(title: &str, description: &str, rating: u8) -> ReviewDraft {
    ReviewDraft::new(title, description, rating)
}

// =============================================================================
// FAULT INJECTION
// =============================================================================

/// In-memory storage that can be told to fail specific kinds of commit.
///
/// - `fail_credits`: batches with more than one op (mint + account)
/// - `fail_deletes`: batches containing a delete
/// - `on_next_credit`: runs once when the next credit batch arrives,
///   before the fault check
#[derive(Default)]
pub struct FaultyStorage {
    inner: InMemoryStorage,
    pub fail_credits: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub commits: AtomicU64,
    before_credit: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl FaultyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryStorage {
        &self.inner
    }

    pub fn set_fail_credits(&self, on: bool) {
        self.fail_credits.store(on, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, on: bool) {
        self.fail_deletes.store(on, Ordering::SeqCst);
    }

    pub fn on_next_credit(&self, hook: impl FnOnce() + Send + 'static) {
        *self.before_credit.lock() = Some(Box::new(hook));
    }
}

impl LedgerStorage for FaultyStorage {
    fn get(&self, address: &Address) -> Result<Option<StoredEntry>, StorageError> {
        self.inner.get(address)
    }

    fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StorageError> {
        let credit = batch.ops().len() > 1;
        let delete = batch
            .ops()
            .iter()
            .any(|op| matches!(op, WriteOp::Delete { .. }));
        if credit {
            let hook = self.before_credit.lock().take();
            if let Some(hook) = hook {
                hook();
            }
        }
        if (credit && self.fail_credits.load(Ordering::SeqCst))
            || (delete && self.fail_deletes.load(Ordering::SeqCst))
        {
            return Err(StorageError::Unavailable("injected fault".into()));
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        self.inner.commit(batch)
    }

    fn scan(&self) -> Result<Vec<(Address, StoredEntry)>, StorageError> {
        self.inner.scan()
    }
}

/// Ledger over `FaultyStorage`, mint initialized.
pub fn faulty_ledger() -> (
    Arc<FaultyStorage>,
    ReviewLedgerService<FaultyStorage, InMemoryEventLog>,
) {
    let storage = Arc::new(FaultyStorage::new());
    let ledger = ReviewLedgerService::new(
        LedgerConfig::default(),
        Arc::clone(&storage),
        Arc::new(InMemoryEventLog::new()),
    )
    .expect("valid config");
    ledger
        .initialize_mint(payer(), default_mint_authority())
        .expect("mint initializes on fresh storage");
    (storage, ledger)
}
