//! Shared fixtures for registry integration tests

#![allow(dead_code)]

use lib_reservation::{CallContext, RegistryConfig, RegistryResult, ReservationRegistry};
use lib_tokens::{AssetLedger, InMemoryLedger};
use lib_types::{Address, Amount, ReservationId, Timestamp, ONE_NATIVE};

pub type TestRegistry = ReservationRegistry<InMemoryLedger, InMemoryLedger>;

/// Well-formed registration keys, all distinct
pub const KEYS: [&str; 10] = [
    "EOS6U9WA3HUsP8BYJ8qiGqxFb9qkqAMEvUwVgdtiuTFTAj5qkvgi9",
    "EOS7inrrtWWojDfUFfriQvS5eNRG7GR9HzNXh9u2i3tAgc1oYd9YF",
    "EOS5X26Uojj2gb5sY7GUCdv2eNXRQRa5JVhFojb2uvq7K23nQKDTk",
    "EOS83xUcRM2Jy9XznJqbFoEJw4ZTuddXAur4GZnsvF46mYKeL4GSX",
    "EOS5xTdcmkTK88dMFK89bRrXMQEv9pXD7m1fGHy83kyiDaUeC2MGj",
    "EOS8FM45xPMLPXkg9EZ62zPsaPYCNnuQLTt2gVorgCiaPELqgdHmF",
    "EOS622DSg75wUfjxzjjjgsa1TDubQsdCMC1fSSWoK2zBBhwnhS7xP",
    "EOS7ASV47enbn6JW7nr9e4fdDid6vhPmd4vmSw9w3B3yeY15fHMjC",
    "EOS5asGzDcbL5YRAVrHs8fW6y8SVupcBAaT7XbPbSRznDh1ZFKDDT",
    "EOS7qM4HypLmirRm4HfMEbbBHqYsGoxxaDMqeNRCrvEMVt1KEDipz",
];

/// Starting native balance of every test user
pub const STARTING_BALANCE: Amount = 1_000 * ONE_NATIVE;

pub fn owner() -> Address {
    Address::derive(b"owner")
}

pub fn custody() -> Address {
    Address::derive(b"custody")
}

pub fn signatory() -> Address {
    Address::derive(b"signatory")
}

pub fn alice() -> Address {
    Address::derive(b"alice")
}

pub fn bob() -> Address {
    Address::derive(b"bob")
}

pub fn carol() -> Address {
    Address::derive(b"carol")
}

pub fn dave() -> Address {
    Address::derive(b"dave")
}

pub fn users() -> [Address; 4] {
    [alice(), bob(), carol(), dave()]
}

pub fn at(caller: Address, now: Timestamp) -> CallContext {
    CallContext::new(caller, now)
}

pub fn funded_ledger() -> InMemoryLedger {
    let mut ledger = InMemoryLedger::new();
    for user in users() {
        ledger.mint(&user, STARTING_BALANCE);
    }
    ledger
}

/// Registry with funded users and a signatory in place
pub fn new_registry() -> TestRegistry {
    new_registry_with(RegistryConfig::for_testing())
}

pub fn new_registry_with(config: RegistryConfig) -> TestRegistry {
    let mut registry = ReservationRegistry::new(
        config,
        owner(),
        custody(),
        funded_ledger(),
        InMemoryLedger::new(),
    )
    .expect("valid config");
    registry
        .set_signatory(at(owner(), 0), signatory())
        .expect("owner assigns first signatory");
    registry.take_events();
    registry
}

/// Bid with attached value, moving it into custody first and back out if
/// the registry refuses the bid
pub fn place_bid(
    registry: &mut TestRegistry,
    bidder: Address,
    id: ReservationId,
    key: &str,
    amount: Amount,
    now: Timestamp,
) -> RegistryResult<()> {
    let custody = registry.custody();
    registry
        .native_mut()
        .transfer(&bidder, &custody, amount)
        .expect("bidder funded");
    let result = registry.bid(at(bidder, now).with_value(amount), id, key);
    if result.is_err() {
        registry
            .native_mut()
            .transfer(&custody, &bidder, amount)
            .expect("custody returns refused value");
    }
    result
}

pub fn balance(registry: &TestRegistry, account: &Address) -> Amount {
    registry.native().balance_of(account)
}
