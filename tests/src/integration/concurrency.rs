//! # Concurrency Tests
//!
//! Parallel requests against one ledger, and two ledgers sharing one
//! storage backend. Rewards must never be lost or double counted:
//! every stored review corresponds to exactly one reward.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use review_ledger::prelude::*;
    use std::thread;

    const THREADS: usize = 8;
    const PER_THREAD: usize = 10;

    /// balance == reviews * R for every owner, supply == total reviews * R.
    fn assert_rewards_match_records<S: LedgerStorage, E: EventSink>(
        ledger: &ReviewLedgerService<S, E>,
        owners: &[Identity],
    ) {
        let amount = ledger.reward_amount();
        let mut total = 0u64;
        for owner in owners {
            let count = ledger.list_reviews(Some(*owner)).unwrap().len() as u64;
            assert_eq!(ledger.reward_balance(*owner).unwrap(), count * amount);
            total += count;
        }
        assert_eq!(ledger.mint().unwrap().supply, total * amount);
    }

    #[test]
    fn test_parallel_creates_same_owner_lose_no_reward() {
        let ledger = Arc::new(ledger_with(patient_config()));

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        ledger
                            .create_review(alice(), draft(&format!("t{t}-r{i}"), "par", 3))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let expected = (THREADS * PER_THREAD) as u64;
        assert_eq!(ledger.reward_balance(alice()).unwrap(), expected * REWARD);
        assert_eq!(ledger.mint().unwrap().supply, expected * REWARD);
        assert_eq!(ledger.stats().rewards_issued, expected);
        assert_rewards_match_records(ledger.as_ref(), &[alice()]);
    }

    #[test]
    fn test_parallel_creates_many_owners() {
        let ledger = Arc::new(ledger_with(patient_config()));
        let owners: Vec<Identity> = (1..=16).map(identity).collect();

        let handles: Vec<_> = owners
            .iter()
            .copied()
            .map(|owner| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for i in 0..5 {
                        ledger
                            .create_review(owner, draft(&format!("movie {i}"), "many", 2))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for owner in &owners {
            assert_eq!(ledger.reward_balance(*owner).unwrap(), 5 * REWARD);
        }
        assert_rewards_match_records(ledger.as_ref(), &owners);
    }

    #[test]
    fn test_racing_identical_creates_store_one_record() {
        let ledger = Arc::new(ledger_with(patient_config()));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || ledger.create_review(bob(), draft("Race", "same", 4)))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(matches!(
                err.kind(),
                ErrorKind::AlreadyExists | ErrorKind::Conflict
            ));
        }
        assert_eq!(ledger.reward_balance(bob()).unwrap(), REWARD);
        assert_eq!(ledger.list_reviews(None).unwrap().len(), 1);
    }

    #[test]
    fn test_parallel_updates_keep_identity() {
        let ledger = Arc::new(ledger_with(patient_config()));
        let record = ledger
            .create_review(alice(), draft("Contested", "v0", 1))
            .unwrap();

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let ledger = Arc::clone(&ledger);
                let address = record.address;
                thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        let rating = ((t + i) % 5 + 1) as u8;
                        ledger
                            .update_review(
                                alice(),
                                address,
                                ReviewPatch::new(format!("t{t} i{i}"), rating),
                            )
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let final_record = ledger.read_review(record.address).unwrap();
        assert_eq!(final_record.title, "Contested");
        assert_eq!(final_record.owner, alice());
        assert_eq!(ledger.reward_balance(alice()).unwrap(), REWARD);
        assert_eq!(
            ledger.events().names().iter().filter(|n| **n == "review_updated").count(),
            THREADS * PER_THREAD
        );
    }

    #[test]
    fn test_two_services_sharing_storage_stay_consistent() {
        // Separate lock tables: only the storage expectations serialize
        // the credits.
        let storage = Arc::new(InMemoryStorage::new());
        let first = Arc::new(
            ReviewLedgerService::new(
                patient_config(),
                Arc::clone(&storage),
                Arc::new(InMemoryEventLog::new()),
            )
            .unwrap(),
        );
        let second = Arc::new(
            ReviewLedgerService::new(
                patient_config(),
                Arc::clone(&storage),
                Arc::new(InMemoryEventLog::new()),
            )
            .unwrap(),
        );
        first
            .initialize_mint(payer(), default_mint_authority())
            .unwrap();

        let handles: Vec<_> = [Arc::clone(&first), Arc::clone(&second)]
            .into_iter()
            .enumerate()
            .map(|(s, ledger)| {
                thread::spawn(move || {
                    (0..25)
                        .filter(|i| {
                            ledger
                                .create_review(alice(), draft(&format!("s{s}-{i}"), "shared", 5))
                                .is_ok()
                        })
                        .count()
                })
            })
            .collect();
        let created: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert!(created > 0);
        assert_eq!(
            second.reward_balance(alice()).unwrap(),
            created as u64 * REWARD
        );
        assert_rewards_match_records(first.as_ref(), &[alice()]);
    }

    #[test]
    fn test_readers_see_whole_creates() {
        let ledger = Arc::new(ledger_with(patient_config()));

        let writer = {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                for i in 0..50 {
                    ledger
                        .create_review(alice(), draft(&format!("w{i}"), "seen", 3))
                        .unwrap();
                }
            })
        };
        let reader = {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                for i in 0..50 {
                    let address = ledger.review_address(alice(), &format!("w{i}")).unwrap();
                    if let Ok(record) = ledger.read_review(address) {
                        // The reward committed under the same locks.
                        assert!(ledger.reward_balance(alice()).unwrap() >= REWARD);
                        assert_eq!(record.owner, alice());
                    }
                }
            })
        };
        writer.join().unwrap();
        reader.join().unwrap();

        assert_rewards_match_records(ledger.as_ref(), &[alice()]);
    }
}
