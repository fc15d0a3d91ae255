use paysync::domain::money::MoneyAmount;
use paysync::domain::transaction::{TransactionStatus, normalize_status};
use proptest::prelude::*;

fn arb_status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Initialized),
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Successful),
        Just(TransactionStatus::Failed),
        Just(TransactionStatus::Cancelled),
    ]
}

/// Random per-character casing of a known synonym.
fn arb_cased(word: &'static str) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<bool>(), word.len()).prop_map(move |upper| {
        word.chars()
            .zip(upper)
            .map(|(c, up)| {
                if up {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect()
    })
}

proptest! {
    /// Terminal statuses accept no incoming status at all — first terminal wins.
    #[test]
    fn terminal_statuses_accept_nothing(incoming in arb_status()) {
        use TransactionStatus::*;
        for terminal in [Successful, Failed, Cancelled] {
            prop_assert!(!terminal.accepts(&incoming));
        }
    }

    /// Non-terminal statuses accept anything except a regression to initialized.
    #[test]
    fn non_terminal_statuses_accept_forward_moves(incoming in arb_status()) {
        use TransactionStatus::*;
        for stored in [Initialized, Pending] {
            prop_assert_eq!(stored.accepts(&incoming), incoming != Initialized);
        }
    }

    /// Any walk through the guard reaches at most one terminal status and
    /// then freezes.
    #[test]
    fn guarded_walk_freezes_after_first_terminal(
        steps in prop::collection::vec(arb_status(), 1..20)
    ) {
        let mut current = TransactionStatus::Initialized;
        let mut frozen_at = None;
        for next in &steps {
            if current.accepts(next) {
                prop_assert!(frozen_at.is_none(), "moved after terminal");
                current = *next;
            }
            if current.is_terminal() && frozen_at.is_none() {
                frozen_at = Some(current);
            }
        }
        if let Some(terminal) = frozen_at {
            prop_assert_eq!(current, terminal);
        }
    }

    /// as_str → try_from roundtrip is identity.
    #[test]
    fn status_roundtrip(status in arb_status()) {
        let roundtripped = TransactionStatus::try_from(status.as_str()).unwrap();
        prop_assert_eq!(roundtripped, status);
    }

    /// Success synonyms normalize regardless of casing.
    #[test]
    fn success_synonyms_normalize(
        raw in prop_oneof![
            arb_cased("successful"),
            arb_cased("success"),
            arb_cased("paid"),
            arb_cased("completed"),
            arb_cased("approved"),
        ]
    ) {
        prop_assert_eq!(normalize_status(&raw), TransactionStatus::Successful);
    }

    /// Failure and cancellation synonyms normalize regardless of casing.
    #[test]
    fn terminal_synonyms_normalize(
        failed in prop_oneof![arb_cased("failed"), arb_cased("declined"), arb_cased("error")],
        cancelled in prop_oneof![arb_cased("cancelled"), arb_cased("canceled"), arb_cased("aborted")],
    ) {
        prop_assert_eq!(normalize_status(&failed), TransactionStatus::Failed);
        prop_assert_eq!(normalize_status(&cancelled), TransactionStatus::Cancelled);
    }

    /// Anything unrecognized is treated as still in flight, never terminal.
    #[test]
    fn unknown_statuses_stay_pending(raw in "[a-z]{1,12}") {
        let normalized = normalize_status(&raw);
        if normalized != TransactionStatus::Pending {
            // Only the known synonym table may produce a terminal status.
            prop_assert!([
                "successful", "success", "paid", "completed", "approved",
                "failed", "failure", "declined", "error",
                "cancelled", "canceled", "aborted", "voided",
            ].contains(&raw.as_str()));
        }
    }

    /// Amounts must be strictly positive.
    #[test]
    fn money_amount_rejects_non_positive(units in i64::MIN..=0) {
        prop_assert!(MoneyAmount::new(units).is_err());
    }

    #[test]
    fn money_amount_roundtrip(units in 1i64..=i64::MAX) {
        prop_assert_eq!(MoneyAmount::new(units).unwrap().units(), units);
    }
}
