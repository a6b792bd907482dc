//! Integration tests for the FT42 token ledger.
//!
//! These tests exercise the deployed-ledger scenarios end to end with real
//! 18-decimal magnitudes: the reference deployment parameters, the cap
//! boundary, the pause round-trip, supply conservation across operation
//! sequences, and the foreign-asset rescue path.

use ft42_contracts::address::Address;
use ft42_contracts::token::{Event, Ft42Token, TokenError};

/// One whole FT42 in base units.
const ONE: u128 = 10u128.pow(18);

/// Reference deployment: 1,000,000 FT42 initial, 10,000,000 FT42 cap.
const INIT: u128 = 1_000_000 * ONE;
const CAP: u128 = 10_000_000 * ONE;

fn addr(byte: u8) -> Address {
    Address::from_bytes([byte; 20])
}

/// Helper: deploys the reference configuration.
fn deploy() -> (Address, Ft42Token) {
    let owner = addr(1);
    let token = Ft42Token::new(owner, INIT, CAP).unwrap();
    (owner, token)
}

/// Helper: sum of balances over the given accounts.
fn held_by(token: &Ft42Token, accounts: &[Address]) -> u128 {
    accounts.iter().map(|a| token.balance_of(*a)).sum()
}

// ---------------------------------------------------------------------------
// Reference Deployment
// ---------------------------------------------------------------------------

#[test]
fn has_correct_name_symbol_decimals() {
    let (_, token) = deploy();
    assert_eq!(token.name(), "FortyTwo Token");
    assert_eq!(token.symbol(), "FT42");
    assert_eq!(token.decimals(), 18);
}

#[test]
fn mints_initial_supply_to_owner() {
    let (owner, token) = deploy();
    assert_eq!(token.total_supply(), INIT);
    assert_eq!(token.balance_of(owner), INIT);
    assert_eq!(token.cap(), CAP);
}

#[test]
fn owner_can_mint_within_cap_non_owner_cannot() {
    let (owner, mut token) = deploy();
    let outsider = addr(2);

    assert!(matches!(
        token.mint(outsider, outsider, ONE),
        Err(TokenError::Unauthorized { .. })
    ));

    token.mint(owner, outsider, ONE).unwrap();
    assert_eq!(token.total_supply(), INIT + ONE);
    assert!(token.events().contains(&Event::Transfer {
        from: None,
        to: Some(outsider),
        amount: ONE,
    }));
}

#[test]
fn minting_stops_exactly_at_the_cap() {
    let (owner, mut token) = deploy();

    // 9,000,000 FT42 takes the supply to the cap exactly.
    let remaining = CAP - INIT;
    token.mint(owner, owner, remaining).unwrap();
    assert_eq!(token.total_supply(), CAP);

    // One more base unit does not fit.
    let result = token.mint(owner, owner, 1);
    assert!(matches!(
        result,
        Err(TokenError::CapExceeded {
            requested: 1,
            headroom: 0,
        })
    ));
    assert_eq!(token.total_supply(), CAP);
}

#[test]
fn pause_blocks_holders_until_unpause() {
    let (owner, mut token) = deploy();
    let holder_a = addr(2);
    let holder_b = addr(3);

    token.transfer(owner, holder_a, 100 * ONE).unwrap();
    token.pause(owner).unwrap();

    assert!(matches!(
        token.transfer(holder_a, holder_b, ONE),
        Err(TokenError::TransfersPaused)
    ));
    assert_eq!(token.balance_of(holder_b), 0);

    token.unpause(owner).unwrap();
    token.transfer(holder_a, holder_b, ONE).unwrap();
    assert_eq!(token.balance_of(holder_b), ONE);
    assert_eq!(token.balance_of(holder_a), 99 * ONE);
}

#[test]
fn burn_reduces_total_supply() {
    let (owner, mut token) = deploy();
    let before = token.total_supply();
    token.burn(owner, 5 * ONE).unwrap();
    assert_eq!(token.total_supply(), before - 5 * ONE);
    assert!(token.events().contains(&Event::Transfer {
        from: Some(owner),
        to: None,
        amount: 5 * ONE,
    }));
}

// ---------------------------------------------------------------------------
// Conservation
// ---------------------------------------------------------------------------

#[test]
fn supply_equals_sum_of_balances_throughout() {
    let (owner, mut token) = deploy();
    let accounts = [owner, addr(2), addr(3), addr(4)];

    token.transfer(owner, addr(2), 300 * ONE).unwrap();
    assert_eq!(held_by(&token, &accounts), token.total_supply());

    token.mint(owner, addr(3), 50 * ONE).unwrap();
    assert_eq!(held_by(&token, &accounts), token.total_supply());

    token.transfer(addr(2), addr(4), 120 * ONE).unwrap();
    assert_eq!(held_by(&token, &accounts), token.total_supply());

    token.burn(addr(4), 20 * ONE).unwrap();
    assert_eq!(held_by(&token, &accounts), token.total_supply());

    // A failed transfer changes nothing.
    let supply = token.total_supply();
    assert!(token.transfer(addr(3), addr(2), 1_000 * ONE).is_err());
    assert_eq!(held_by(&token, &accounts), supply);
}

// ---------------------------------------------------------------------------
// Rescue
// ---------------------------------------------------------------------------

#[test]
fn rescue_cannot_pull_ft42_itself() {
    let (owner, mut token) = deploy();
    let mut own_handle = token.clone();
    assert!(matches!(
        token.rescue_foreign_value(owner, &mut own_handle, owner, 1),
        Err(TokenError::SelfRescueForbidden)
    ));
}

#[test]
fn rescue_recovers_a_stranded_foreign_token() {
    let (owner, mut token) = deploy();
    let stray_owner = addr(7);
    let mut stray = Ft42Token::new(stray_owner, 1_000 * ONE, 1_000 * ONE).unwrap();

    // 250 STRAY end up at the FT42 ledger's address by mistake.
    stray.transfer(stray_owner, token.address(), 250 * ONE).unwrap();

    token
        .rescue_foreign_value(owner, &mut stray, owner, 250 * ONE)
        .unwrap();
    assert_eq!(stray.balance_of(owner), 250 * ONE);
    assert_eq!(stray.balance_of(token.address()), 0);
    // Rescue never touches the FT42 supply.
    assert_eq!(token.total_supply(), INIT);
}

#[test]
fn rescue_works_while_paused() {
    let (owner, mut token) = deploy();
    let stray_owner = addr(7);
    let mut stray = Ft42Token::new(stray_owner, ONE, ONE).unwrap();
    stray.transfer(stray_owner, token.address(), ONE).unwrap();

    token.pause(owner).unwrap();
    token
        .rescue_foreign_value(owner, &mut stray, owner, ONE)
        .unwrap();
    assert_eq!(stray.balance_of(owner), ONE);
}
