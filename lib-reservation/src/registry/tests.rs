//! Registry unit tests

use lib_tokens::{AssetLedger, InMemoryLedger};
use lib_types::{milli_native, Address, Amount, ReservationId, Timestamp, ONE_NATIVE};

use super::*;
use crate::context::CallContext;
use crate::name::NameError;
use crate::types::{ApprovalState, ReservationKind};

const KEY_A: &str = "EOS6U9WA3HUsP8BYJ8qiGqxFb9qkqAMEvUwVgdtiuTFTAj5qkvgi9";
const KEY_B: &str = "EOS7inrrtWWojDfUFfriQvS5eNRG7GR9HzNXh9u2i3tAgc1oYd9YF";
const KEY_C: &str = "EOS5X26Uojj2gb5sY7GUCdv2eNXRQRa5JVhFojb2uvq7K23nQKDTk";
const KEY_D: &str = "EOS83xUcRM2Jy9XznJqbFoEJw4ZTuddXAur4GZnsvF46mYKeL4GSX";

type TestRegistry = ReservationRegistry<InMemoryLedger, InMemoryLedger>;

fn owner() -> Address {
    Address::derive(b"owner")
}

fn custody() -> Address {
    Address::derive(b"custody")
}

fn signatory() -> Address {
    Address::derive(b"signatory")
}

fn alice() -> Address {
    Address::derive(b"alice")
}

fn bob() -> Address {
    Address::derive(b"bob")
}

fn carol() -> Address {
    Address::derive(b"carol")
}

fn at(caller: Address, now: Timestamp) -> CallContext {
    CallContext::new(caller, now)
}

fn setup() -> TestRegistry {
    let mut native = InMemoryLedger::new();
    for account in [alice(), bob(), carol()] {
        native.mint(&account, 100 * ONE_NATIVE);
    }
    let mut registry = ReservationRegistry::new(
        RegistryConfig::for_testing(),
        owner(),
        custody(),
        native,
        InMemoryLedger::new(),
    )
    .unwrap();
    registry.set_signatory(at(owner(), 0), signatory()).unwrap();
    registry.take_events();
    registry
}

/// Attach `amount` to a bid the way the surrounding environment does
fn place_bid(
    registry: &mut TestRegistry,
    bidder: Address,
    id: ReservationId,
    key: &str,
    amount: Amount,
    now: Timestamp,
) -> RegistryResult<()> {
    let custody = registry.custody();
    registry.native_mut().transfer(&bidder, &custody, amount).unwrap();
    let result = registry.bid(at(bidder, now).with_value(amount), id, key);
    if result.is_err() {
        registry.native_mut().transfer(&custody, &bidder, amount).unwrap();
    }
    result
}

#[test]
fn test_ids_start_after_genesis() {
    let mut registry = setup();
    assert_eq!(registry.current_id(), GENESIS_RESERVATION_ID);

    let id = registry.reserve_user(at(alice(), 10), "helloworld", KEY_A).unwrap();
    assert_eq!(id, 2);
    assert_eq!(registry.current_id(), 2);
    assert_eq!(registry.reservation_owner(id), alice());
    assert!(registry.exists("helloworld"));
    assert_eq!(registry.reservation_id_of("helloworld"), Some(2));
}

#[test]
fn test_name_and_key_uniqueness() {
    let mut registry = setup();
    registry.reserve_user(at(alice(), 10), "helloworld", KEY_A).unwrap();

    assert!(matches!(
        registry.reserve_user(at(bob(), 11), "helloworld", KEY_B),
        Err(ReservationError::NameTaken { .. })
    ));
    assert!(matches!(
        registry.reserve_user(at(bob(), 11), "another", KEY_A),
        Err(ReservationError::KeyTaken { .. })
    ));
    assert_eq!(registry.current_id(), 2);
    registry.check_invariants().unwrap();
}

#[test]
fn test_forced_names_have_no_id() {
    let mut registry = setup();
    registry
        .force_reserved_names(at(signatory(), 5), &["google", "scatter"])
        .unwrap();

    assert!(registry.exists("google"));
    assert_eq!(registry.current_id(), GENESIS_RESERVATION_ID);
    assert_eq!(registry.forced_name("scatter").unwrap().reserved_by, signatory());
    assert!(matches!(
        registry.reserve_user(at(alice(), 6), "google", KEY_A),
        Err(ReservationError::NameTaken { .. })
    ));
}

#[test]
fn test_forced_names_may_be_short() {
    let mut registry = setup();
    let count = registry
        .force_reserved_names(at(signatory(), 5), &["a", "b", "c"])
        .unwrap();

    assert_eq!(count, 3);
    for name in ["a", "b", "c"] {
        assert!(registry.exists(name));
    }
    // Users are still held to the minimum
    assert!(matches!(
        registry.reserve_user(at(alice(), 6), "d", KEY_A),
        Err(ReservationError::InvalidName(NameError::TooShort { .. }))
    ));
    registry.check_invariants().unwrap();
}

#[test]
fn test_forced_batch_is_atomic() {
    let mut registry = setup();
    let result = registry.force_reserved_names(at(signatory(), 5), &["valid", "x", ""]);
    assert!(matches!(result, Err(ReservationError::InvalidName(_))));
    assert!(!registry.exists("valid"));

    let result = registry.force_reserved_names(at(signatory(), 5), &["dup", "dup"]);
    assert!(matches!(result, Err(ReservationError::NameTaken { .. })));
    assert!(!registry.exists("dup"));
    assert!(registry.events().is_empty());
}

#[test]
fn test_pending_dapp_blocks_name_and_key() {
    let mut registry = setup();
    let id = registry.reserve_dapp(at(alice(), 10), "mydapp", KEY_A).unwrap();

    assert!(registry.exists("mydapp"));
    assert_eq!(
        registry.reservation(id).unwrap().kind,
        ReservationKind::Dapp(ApprovalState::Pending)
    );
    assert!(matches!(
        registry.reserve_user(at(bob(), 11), "other", KEY_A),
        Err(ReservationError::KeyTaken { .. })
    ));
    assert_eq!(
        place_bid(&mut registry, bob(), id, KEY_B, ONE_NATIVE, 12),
        Err(ReservationError::NotFound(id))
    );
}

#[test]
fn test_outbid_refunds_previous_bidder() {
    let mut registry = setup();
    let id = registry.reserve_user(at(alice(), 10), "helloworld", KEY_A).unwrap();

    place_bid(&mut registry, bob(), id, KEY_B, ONE_NATIVE, 20).unwrap();
    assert_eq!(registry.bid_owner(id), bob());
    assert_eq!(registry.native().balance_of(&bob()), 99 * ONE_NATIVE);

    place_bid(&mut registry, carol(), id, KEY_C, 2 * ONE_NATIVE, 30).unwrap();
    assert_eq!(registry.bid_owner(id), carol());
    assert_eq!(registry.native().balance_of(&bob()), 100 * ONE_NATIVE);
    assert_eq!(registry.escrow().outstanding_bids(), 2 * ONE_NATIVE);
    registry.check_invariants().unwrap();

    let events = registry.take_events();
    assert!(events.contains(&RegistryEvent::BidRefunded {
        id,
        bidder: bob(),
        amount: ONE_NATIVE
    }));
}

#[test]
fn test_bid_check_order() {
    let mut registry = setup();
    let id = registry.reserve_user(at(alice(), 10), "helloworld", KEY_A).unwrap();

    assert_eq!(
        place_bid(&mut registry, bob(), 99, KEY_B, ONE_NATIVE, 20),
        Err(ReservationError::NotFound(99))
    );
    assert_eq!(
        place_bid(&mut registry, alice(), id, KEY_B, ONE_NATIVE, 20),
        Err(ReservationError::SelfBid)
    );
    assert!(matches!(
        place_bid(&mut registry, bob(), id, KEY_B, milli_native(1), 20),
        Err(ReservationError::BelowMinimum { .. })
    ));
    assert!(matches!(
        place_bid(&mut registry, bob(), id, "EOSbad", ONE_NATIVE, 20),
        Err(ReservationError::InvalidKey(_))
    ));
    assert!(matches!(
        place_bid(&mut registry, bob(), id, KEY_A, ONE_NATIVE, 20),
        Err(ReservationError::KeyCollision { .. })
    ));

    place_bid(&mut registry, bob(), id, KEY_B, ONE_NATIVE, 20).unwrap();
    assert_eq!(
        place_bid(&mut registry, carol(), id, KEY_C, ONE_NATIVE, 21),
        Err(ReservationError::BidTooLow {
            current: ONE_NATIVE,
            offered: ONE_NATIVE
        })
    );
    registry.check_invariants().unwrap();
}

#[test]
fn test_failed_refund_rejects_new_bid() {
    let mut registry = setup();
    let id = registry.reserve_user(at(alice(), 10), "helloworld", KEY_A).unwrap();
    place_bid(&mut registry, bob(), id, KEY_B, ONE_NATIVE, 20).unwrap();
    registry.take_events();

    registry.native_mut().set_rejecting(&bob(), true);
    let result = place_bid(&mut registry, carol(), id, KEY_C, 2 * ONE_NATIVE, 30);

    assert!(matches!(result, Err(ReservationError::TransferFailed(_))));
    assert_eq!(registry.bid_owner(id), bob());
    assert_eq!(registry.escrow().outstanding_bids(), ONE_NATIVE);
    assert_eq!(registry.native().balance_of(&carol()), 100 * ONE_NATIVE);
    assert!(registry.events().is_empty());
    registry.check_invariants().unwrap();
}

#[test]
fn test_sell_retains_fee() {
    let mut registry = setup();
    let id = registry.reserve_user(at(alice(), 10), "helloworld", KEY_A).unwrap();
    place_bid(&mut registry, bob(), id, KEY_B, 10 * ONE_NATIVE, 20).unwrap();

    let receipt = registry.sell(at(alice(), 30), id).unwrap();
    assert_eq!(receipt.fee, ONE_NATIVE);
    assert_eq!(receipt.seller_proceeds, 9 * ONE_NATIVE);

    assert_eq!(registry.reservation_owner(id), bob());
    assert_eq!(registry.bid_owner(id), Address::zero());
    assert_eq!(registry.reservation(id).unwrap().key.as_str(), KEY_B);
    assert_eq!(registry.native().balance_of(&alice()), 109 * ONE_NATIVE);
    assert_eq!(registry.escrow().surplus(), ONE_NATIVE);

    // The old key is free again, the new one is taken
    assert!(registry.reserve_user(at(carol(), 40), "carolname", KEY_A).is_ok());
    assert!(matches!(
        registry.reserve_user(at(carol(), 40), "carol2", KEY_B),
        Err(ReservationError::KeyTaken { .. })
    ));
    registry.check_invariants().unwrap();
}

#[test]
fn test_failed_sale_payout_rolls_back() {
    let mut registry = setup();
    let id = registry.reserve_user(at(alice(), 10), "helloworld", KEY_A).unwrap();
    place_bid(&mut registry, bob(), id, KEY_B, ONE_NATIVE, 20).unwrap();
    let escrow_before = *registry.escrow();

    registry.native_mut().set_rejecting(&alice(), true);
    let result = registry.sell(at(alice(), 30), id);

    assert!(matches!(result, Err(ReservationError::TransferFailed(_))));
    assert_eq!(registry.reservation_owner(id), alice());
    assert_eq!(registry.bid_owner(id), bob());
    assert_eq!(*registry.escrow(), escrow_before);
    assert_eq!(registry.reservation(id).unwrap().key.as_str(), KEY_A);
    registry.check_invariants().unwrap();
}

#[test]
fn test_sell_rejects_claimed_bid_key() {
    let mut registry = setup();
    let id = registry.reserve_user(at(alice(), 10), "helloworld", KEY_A).unwrap();
    place_bid(&mut registry, bob(), id, KEY_B, ONE_NATIVE, 20).unwrap();
    registry.reserve_user(at(carol(), 25), "carolname", KEY_B).unwrap();

    assert!(matches!(
        registry.sell(at(alice(), 30), id),
        Err(ReservationError::KeyCollision { .. })
    ));
    assert_eq!(registry.bid_owner(id), bob());

    // A higher bid with a fresh key can still close the sale
    place_bid(&mut registry, carol(), id, KEY_D, 2 * ONE_NATIVE, 31).unwrap();
    registry.sell(at(alice(), 32), id).unwrap();
    assert_eq!(registry.reservation_owner(id), carol());
}

#[test]
fn test_un_bid_after_stale_window() {
    let mut registry = setup();
    let id = registry.reserve_user(at(alice(), 10), "helloworld", KEY_A).unwrap();
    place_bid(&mut registry, bob(), id, KEY_B, ONE_NATIVE, 100).unwrap();
    let window = registry.config().stale_bid_window_secs;

    assert_eq!(
        registry.un_bid(at(bob(), 100 + window - 1), id),
        Err(ReservationError::NotStale {
            stale_at: 100 + window
        })
    );
    assert!(matches!(
        registry.un_bid(at(carol(), 100 + window), id),
        Err(ReservationError::Unauthorized { .. })
    ));

    registry.un_bid(at(bob(), 100 + window), id).unwrap();
    assert_eq!(registry.bid_owner(id), Address::zero());
    assert_eq!(registry.native().balance_of(&bob()), 100 * ONE_NATIVE);
    assert_eq!(registry.escrow().held(), 0);
    assert_eq!(registry.un_bid(at(bob(), 100 + window), id), Err(ReservationError::NotFound(id)));
}

#[test]
fn test_launch_freezes_book() {
    let mut registry = setup();
    let id = registry.reserve_user(at(alice(), 10), "helloworld", KEY_A).unwrap();
    registry.set_chain_launched(at(owner(), 50), true).unwrap();

    assert_eq!(
        registry.reserve_user(at(bob(), 60), "another", KEY_B),
        Err(ReservationError::SystemLaunched)
    );
    assert_eq!(
        place_bid(&mut registry, bob(), id, KEY_B, ONE_NATIVE, 60),
        Err(ReservationError::SystemLaunched)
    );
    assert_eq!(registry.sell(at(alice(), 60), id), Err(ReservationError::SystemLaunched));
    assert_eq!(registry.reservation_owner(id), alice());
    assert!(registry.is_launched());
}

#[test]
fn test_invariant_violations_are_typed() {
    let mut registry = setup();
    let id = registry.reserve_user(at(alice(), 10), "helloworld", KEY_A).unwrap();
    place_bid(&mut registry, bob(), id, KEY_B, ONE_NATIVE, 20).unwrap();
    registry.check_invariants().unwrap();

    let mut drifted = registry.state.clone();
    drifted.bids.get_mut(&id).unwrap().amount += 1;
    let saved = std::mem::replace(&mut registry.state, drifted);
    assert_eq!(
        registry.check_invariants(),
        Err(InvariantViolation::BidTotalMismatch {
            live: ONE_NATIVE + 1,
            tracked: ONE_NATIVE
        })
    );

    registry.state = saved.clone();
    registry.state.names.clear();
    assert_eq!(
        registry.check_invariants(),
        Err(InvariantViolation::IndexSize {
            index: "name",
            entries: 0,
            reservations: 1
        })
    );

    registry.state = saved;
    let drained = registry.native().balance_of(&custody());
    registry
        .native_mut()
        .transfer(&custody(), &carol(), drained)
        .unwrap();
    assert_eq!(
        registry.check_invariants(),
        Err(InvariantViolation::CustodyShortfall {
            balance: 0,
            held: ONE_NATIVE
        })
    );
}
