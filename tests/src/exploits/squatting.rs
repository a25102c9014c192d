//! # Address Squatting
//!
//! Attempts to occupy or misread another party's derived address.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use review_ledger::prelude::*;

    #[test]
    fn test_attacker_cannot_claim_victim_address() {
        let ledger = ledger();
        let victim_address = ledger.review_address(alice(), "Premiere").unwrap();

        // Bob reviews the same title first; he lands on his own address.
        let squatter = ledger
            .create_review(bob(), draft("Premiere", "first!", 1))
            .unwrap();
        assert_ne!(squatter.address, victim_address);

        let victim = ledger
            .create_review(alice(), draft("Premiere", "actual review", 5))
            .unwrap();
        assert_eq!(victim.address, victim_address);
        assert_eq!(ledger.reward_balance(alice()).unwrap(), REWARD);
    }

    #[test]
    fn test_length_prefixing_prevents_seed_collisions() {
        let ledger = ledger();
        // Titles that are prefixes of each other never share an address.
        let short = ledger.review_address(alice(), "Alien").unwrap();
        let long = ledger.review_address(alice(), "Aliens").unwrap();
        assert_ne!(short, long);

        let empty = ledger.review_address(alice(), "").unwrap();
        assert_ne!(empty, short);
    }

    #[test]
    fn test_reading_non_review_accounts_rejected() {
        let ledger = ledger();
        ledger.create_review(alice(), draft("Solaris", "slow", 4)).unwrap();
        let account = ledger.reward_account(alice()).unwrap();

        for address in [ledger.mint_address(), account.address] {
            let err = ledger.read_review(address).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn test_update_and_delete_cannot_target_accounts() {
        let ledger = ledger();
        ledger.create_review(alice(), draft("Solaris", "slow", 4)).unwrap();
        let account = ledger.reward_account(alice()).unwrap();

        let err = ledger
            .update_review(alice(), account.address, ReviewPatch::new("free money", 5))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = ledger
            .delete_review(payer(), ledger.mint_address())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        assert_eq!(ledger.reward_balance(alice()).unwrap(), REWARD);
        assert_eq!(ledger.mint().unwrap().supply, REWARD);
    }

    #[test]
    fn test_unknown_address_is_not_found() {
        let ledger = ledger();
        let err = ledger.read_review(Address::new([0x77; 32])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = ledger.reward_account(bob()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
