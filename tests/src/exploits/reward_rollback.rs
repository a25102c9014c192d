//! # Reward Rollback
//!
//! Forcing the reward step to fail after the record is inserted. The
//! record must be removed again so no review exists without its reward.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use review_ledger::prelude::*;

    #[test]
    fn test_foreign_mint_authority_rolls_back_create() {
        let ledger = foreign_mint_ledger();

        let err = ledger
            .create_review(alice(), draft("Orphan", "no reward", 5))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        let address = ledger.review_address(alice(), "Orphan").unwrap();
        assert_eq!(
            ledger.read_review(address).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert!(ledger.list_reviews(None).unwrap().is_empty());
        assert_eq!(ledger.reward_balance(alice()).unwrap(), 0);
        assert_eq!(ledger.mint().unwrap().supply, 0);
        assert_eq!(ledger.events().names(), vec!["creation_rolled_back"]);
        assert_eq!(ledger.stats().compensations, 1);
    }

    #[test]
    fn test_storage_fault_during_credit_rolls_back() {
        let (storage, ledger) = faulty_ledger();
        storage.set_fail_credits(true);

        let err = ledger
            .create_review(alice(), draft("Flaky", "disk on fire", 2))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(ledger.list_reviews(None).unwrap().is_empty());
        assert_eq!(ledger.reward_balance(alice()).unwrap(), 0);

        // The address is free again once storage recovers.
        storage.set_fail_credits(false);
        let record = ledger
            .create_review(alice(), draft("Flaky", "disk recovered", 2))
            .unwrap();
        assert_eq!(record.description, "disk recovered");
        assert_eq!(ledger.reward_balance(alice()).unwrap(), REWARD);
    }

    #[test]
    fn test_rollback_removes_record_edited_mid_create() {
        let (storage, ledger) = faulty_ledger();
        let peer = Arc::new(
            ReviewLedgerService::new(
                LedgerConfig::default(),
                Arc::clone(&storage),
                Arc::new(NoopEventSink),
            )
            .unwrap(),
        );
        let address = ledger.review_address(alice(), "Edited").unwrap();

        // Another instance edits the fresh record before the credit lands.
        let editor = Arc::clone(&peer);
        storage.on_next_credit(move || {
            editor
                .update_review(alice(), address, ReviewPatch::new("edited meanwhile", 1))
                .unwrap();
        });
        storage.set_fail_credits(true);

        let err = ledger
            .create_review(alice(), draft("Edited", "original", 5))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(peer.stats().requests_committed, 1);

        assert_eq!(
            ledger.read_review(address).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert!(ledger.list_reviews(None).unwrap().is_empty());
        assert_eq!(ledger.reward_balance(alice()).unwrap(), 0);
        assert_eq!(ledger.stats().compensations, 1);
        assert_eq!(ledger.stats().compensation_failures, 0);
    }

    #[test]
    fn test_failed_rollback_is_reported() {
        let (storage, ledger) = faulty_ledger();
        storage.set_fail_credits(true);
        storage.set_fail_deletes(true);

        let err = ledger
            .create_review(alice(), draft("Stuck", "cannot undo", 3))
            .unwrap_err();
        assert!(matches!(err, LedgerError::CompensationFailed { .. }));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(ledger.stats().compensation_failures, 1);
        assert_eq!(ledger.stats().compensations, 0);
    }

    #[test]
    fn test_rollback_keeps_earlier_rewards() {
        let (storage, ledger) = faulty_ledger();
        ledger
            .create_review(alice(), draft("Kept", "fine", 4))
            .unwrap();

        storage.set_fail_credits(true);
        assert!(ledger
            .create_review(alice(), draft("Lost", "faulted", 4))
            .is_err());
        storage.set_fail_credits(false);

        let reviews = ledger.list_reviews(Some(alice())).unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].title, "Kept");
        assert_eq!(ledger.reward_balance(alice()).unwrap(), REWARD);
        assert_eq!(ledger.mint().unwrap().supply, REWARD);
    }

    #[test]
    fn test_dispatch_rollback_is_correlated() {
        let ledger = foreign_mint_ledger();

        let request = AuthenticatedRequest::new(
            bob(),
            Operation::CreateReview {
                title: "Traced".into(),
                description: "rolled back".into(),
                rating: 1,
            },
        );
        let correlation_id = request.correlation_id;
        assert!(ledger.dispatch(request).is_err());

        let events = ledger.events().events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].correlation_id, correlation_id);
        assert!(matches!(
            events[0].kind,
            LedgerEventKind::CreationRolledBack { .. }
        ));
    }
}
