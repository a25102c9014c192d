//! # Ownership Exploits
//!
//! A stranger attempting to rewrite or remove someone else's review, either
//! through the typed API or by crafting envelopes.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use review_ledger::prelude::*;

    fn victim_review(ledger: &MemoryLedger) -> Record {
        ledger
            .create_review(alice(), draft("Vertigo", "original words", 5))
            .unwrap()
    }

    #[test]
    fn test_stranger_update_rejected() {
        let ledger = ledger();
        let record = victim_review(&ledger);

        let err = ledger
            .update_review(bob(), record.address, ReviewPatch::new("defaced", 1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        let stored = ledger.read_review(record.address).unwrap();
        assert_eq!(stored, record);
        assert_eq!(ledger.reward_balance(alice()).unwrap(), REWARD);
        assert_eq!(ledger.reward_balance(bob()).unwrap(), 0);
    }

    #[test]
    fn test_stranger_delete_rejected() {
        let ledger = ledger();
        let record = victim_review(&ledger);

        let err = ledger.delete_review(bob(), record.address).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(ledger.read_review(record.address).is_ok());
    }

    #[test]
    fn test_envelope_caller_is_the_only_identity() {
        let ledger = ledger();
        let record = victim_review(&ledger);

        // The payload has no owner field; Bob can only speak as Bob.
        let err = ledger
            .dispatch(AuthenticatedRequest::new(
                bob(),
                Operation::UpdateReview {
                    address: record.address,
                    description: "defaced".into(),
                    rating: 1,
                },
            ))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(ledger.read_review(record.address).unwrap(), record);
    }

    #[test]
    fn test_invalid_patch_from_stranger_is_invalid_input() {
        let ledger = ledger();
        let record = victim_review(&ledger);

        // Payload checks run before the owner check.
        let err = ledger
            .update_review(bob(), record.address, ReviewPatch::new("x", 9))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_stale_envelope_version_rejected() {
        let ledger = ledger();
        let record = victim_review(&ledger);

        let mut request = AuthenticatedRequest::new(
            alice(),
            Operation::DeleteReview {
                address: record.address,
            },
        );
        request.version = 0;
        let err = ledger.dispatch(request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(ledger.read_review(record.address).is_ok());
    }

    #[test]
    fn test_owner_can_still_act_after_attack() {
        let ledger = ledger();
        let record = victim_review(&ledger);
        let _ = ledger.delete_review(bob(), record.address);

        ledger
            .update_review(alice(), record.address, ReviewPatch::new("revised", 4))
            .unwrap();
        ledger.delete_review(alice(), record.address).unwrap();
        assert_eq!(
            ledger.read_review(record.address).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
