//! Integration tests for the bonding custodial policy.
//!
//! These tests drive the public surface end to end: administration, the
//! service reference, the protected registry and the dust sweep.

use bonding::prelude::*;
use bonding::storage::StateFile;
use bonding::utils::constants::NATIVE_ASSET_SENTINEL;

// ═══════════════════════════════════════════════════════════════════════════════
// TEST HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

struct Actors {
    treasury: Address,
    holding: Address,
    stranger: Address,
    recipient: Address,
}

fn actors() -> Actors {
    Actors {
        treasury: Address::repeat_byte(0x01),
        holding: Address::repeat_byte(0x02),
        stranger: Address::repeat_byte(0x03),
        recipient: Address::repeat_byte(0x04),
    }
}

fn token(byte: u8) -> (Address, AssetId) {
    let address = Address::repeat_byte(byte);
    (address, AssetId::Token(address))
}

fn deploy(a: &Actors) -> Bonding {
    Bonding::new(a.treasury, a.holding, Address::ZERO)
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVICE REFERENCE
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_service_address_lifecycle() {
    let a = actors();
    let s0 = Address::repeat_byte(0x50);
    let s1 = Address::repeat_byte(0x51);
    let s2 = Address::repeat_byte(0x52);

    let mut bonding = Bonding::new(a.treasury, a.holding, s0);
    assert_eq!(bonding.service_address(), s0);
    assert_eq!(bonding.administrator(), a.treasury);

    bonding.set_service_address(&a.treasury, s1).unwrap();
    assert_eq!(bonding.service_address(), s1);

    let err = bonding.set_service_address(&a.stranger, s2).unwrap_err();
    assert_eq!(err, Error::Unauthorized { caller: a.stranger });
    assert_eq!(bonding.service_address(), s1);
}

#[test]
fn test_service_can_be_disabled_with_zero() {
    let a = actors();
    let mut bonding = Bonding::new(a.treasury, a.holding, Address::repeat_byte(0x50));
    assert!(bonding.is_service_enabled());

    bonding.set_service_address(&a.treasury, Address::ZERO).unwrap();
    assert_eq!(bonding.service_address(), Address::ZERO);
    assert!(!bonding.is_service_enabled());
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROTECTED ASSET REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_double_add_rejected() {
    let a = actors();
    let (_, usdc) = token(0x10);
    let mut bonding = deploy(&a);

    bonding.add_protected_asset(&a.treasury, usdc).unwrap();
    let err = bonding.add_protected_asset(&a.treasury, usdc).unwrap_err();

    assert_eq!(err, Error::AlreadyProtected(usdc));
    assert_eq!(bonding.protected_assets(), vec![usdc]);
}

#[test]
fn test_remove_unknown_rejected() {
    let a = actors();
    let (_, usdc) = token(0x10);
    let (_, dai) = token(0x11);
    let mut bonding = deploy(&a);
    bonding.add_protected_asset(&a.treasury, dai).unwrap();

    let err = bonding.remove_protected_asset(&a.treasury, usdc).unwrap_err();

    assert_eq!(err, Error::NotProtected(usdc));
    assert_eq!(bonding.protected_assets(), vec![dai]);
}

#[test]
fn test_native_can_be_protected() {
    let a = actors();
    let mut bonding = deploy(&a);
    bonding.ledger_mut().deposit_native(a.holding, Amount::from_gwei(100)).unwrap();

    let sentinel: AssetId = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE".parse().unwrap();
    bonding.add_protected_asset(&a.treasury, sentinel).unwrap();
    assert!(bonding.is_protected(&AssetId::Native));

    let err = bonding
        .send_dust(&a.treasury, AssetId::Native, a.recipient, Amount::from_gwei(1))
        .unwrap_err();
    assert_eq!(err, Error::AssetIsProtected(AssetId::Native));
    assert_eq!(bonding.holding_balance(&AssetId::Native), Amount::from_gwei(100));
}

#[test]
fn test_sentinel_token_guards_native_and_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let file = StateFile::new(dir.path().join("state.json"));
    let a = actors();
    let disguised = AssetId::Token(Address::new(NATIVE_ASSET_SENTINEL));

    let mut bonding = deploy(&a);
    bonding.ledger_mut().deposit_native(a.holding, Amount::from_gwei(100)).unwrap();
    bonding.add_protected_asset(&a.treasury, disguised).unwrap();

    assert!(bonding.is_protected(&AssetId::Native));
    assert_eq!(
        bonding
            .send_dust(&a.treasury, AssetId::Native, a.recipient, Amount::from_gwei(1))
            .unwrap_err(),
        Error::AssetIsProtected(AssetId::Native)
    );
    assert_eq!(bonding.holding_balance(&AssetId::Native), Amount::from_gwei(100));

    file.save(&bonding).unwrap();
    let mut reloaded = file.load().unwrap();
    assert_eq!(reloaded.protected_assets(), vec![AssetId::Native]);

    reloaded.remove_protected_asset(&a.treasury, AssetId::Native).unwrap();
    reloaded
        .send_dust(&a.treasury, disguised, a.recipient, Amount::from_gwei(1))
        .unwrap();
    assert_eq!(
        reloaded.ledger().balance_of(&AssetId::Native, &a.recipient),
        Amount::from_gwei(1)
    );
    file.save(&reloaded).unwrap();
    assert_eq!(file.load().unwrap(), reloaded);
}

// ═══════════════════════════════════════════════════════════════════════════════
// DUST SWEEP
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_protect_then_release_token() {
    let a = actors();
    let (t_addr, t) = token(0x10);
    let mut bonding = deploy(&a);
    bonding.ledger_mut().mint_token(t_addr, a.holding, Amount::new(10)).unwrap();

    bonding.add_protected_asset(&a.treasury, t).unwrap();
    let err = bonding
        .send_dust(&a.treasury, t, a.recipient, Amount::new(1))
        .unwrap_err();
    assert_eq!(err, Error::AssetIsProtected(t));
    assert_eq!(bonding.holding_balance(&t), Amount::new(10));

    bonding.remove_protected_asset(&a.treasury, t).unwrap();
    let transfer = bonding
        .send_dust(&a.treasury, t, a.recipient, Amount::new(1))
        .unwrap();

    assert_eq!(transfer, DustTransfer::new(t, a.recipient, Amount::new(1)));
    assert_eq!(bonding.holding_balance(&t), Amount::new(9));
    assert_eq!(bonding.ledger().balance_of(&t, &a.recipient), Amount::new(1));
}

#[test]
fn test_native_sweep_back_to_treasury() {
    let a = actors();
    let mut bonding = deploy(&a);
    let x = Amount::from_gwei(100);
    bonding.ledger_mut().deposit_native(a.holding, x).unwrap();

    bonding
        .send_dust(&a.treasury, AssetId::Native, a.treasury, x)
        .unwrap();

    assert_eq!(bonding.holding_balance(&AssetId::Native), Amount::ZERO);
    assert_eq!(bonding.ledger().balance_of(&AssetId::Native, &a.treasury), x);
}

#[test]
fn test_native_sweep_over_balance_fails() {
    let a = actors();
    let mut bonding = deploy(&a);
    bonding
        .ledger_mut()
        .deposit_native(a.holding, Amount::from_gwei(100))
        .unwrap();

    let err = bonding
        .send_dust(&a.treasury, AssetId::Native, a.recipient, Amount::from_gwei(101))
        .unwrap_err();

    assert!(matches!(err, Error::TransferFailed { asset: AssetId::Native, .. }));
    assert_eq!(bonding.holding_balance(&AssetId::Native), Amount::from_gwei(100));
    assert_eq!(
        bonding.ledger().balance_of(&AssetId::Native, &a.recipient),
        Amount::ZERO
    );
}

#[test]
fn test_rejecting_destination_fails_whole_sweep() {
    let a = actors();
    let mut bonding = deploy(&a);
    bonding.ledger_mut().deposit_native(a.holding, Amount::new(500)).unwrap();
    bonding.ledger_mut().reject_native_from(a.recipient);

    let err = bonding
        .send_dust(&a.treasury, AssetId::Native, a.recipient, Amount::new(500))
        .unwrap_err();

    assert!(matches!(err, Error::TransferFailed { .. }));
    assert_eq!(bonding.holding_balance(&AssetId::Native), Amount::new(500));
}

#[test]
fn test_halted_token_fails_sweep() {
    let a = actors();
    let (t_addr, t) = token(0x20);
    let mut bonding = deploy(&a);
    bonding.ledger_mut().mint_token(t_addr, a.holding, Amount::new(7)).unwrap();
    bonding.ledger_mut().halt_token(t_addr);

    let err = bonding
        .send_dust(&a.treasury, t, a.recipient, Amount::new(7))
        .unwrap_err();
    assert!(matches!(err, Error::TransferFailed { .. }));
    assert_eq!(bonding.holding_balance(&t), Amount::new(7));

    bonding.ledger_mut().resume_token(&t_addr);
    bonding
        .send_dust(&a.treasury, t, a.recipient, Amount::new(7))
        .unwrap();
    assert_eq!(bonding.holding_balance(&t), Amount::ZERO);
}

#[test]
fn test_sweep_to_zero_address_is_allowed() {
    let a = actors();
    let mut bonding = deploy(&a);
    bonding.ledger_mut().deposit_native(a.holding, Amount::new(3)).unwrap();

    bonding
        .send_dust(&a.treasury, AssetId::Native, Address::ZERO, Amount::new(3))
        .unwrap();
    assert_eq!(
        bonding.ledger().balance_of(&AssetId::Native, &Address::ZERO),
        Amount::new(3)
    );
}

#[test]
fn test_zero_amount_rejected() {
    let a = actors();
    let mut bonding = deploy(&a);

    let err = bonding
        .send_dust(&a.treasury, AssetId::Native, a.recipient, Amount::ZERO)
        .unwrap_err();
    assert_eq!(err, Error::ZeroAmount);
    assert!(bonding.events().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════════
// AUTHORIZATION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_stranger_cannot_mutate_anything() {
    let a = actors();
    let (t_addr, t) = token(0x10);
    let mut bonding = deploy(&a);
    bonding.ledger_mut().mint_token(t_addr, a.holding, Amount::new(5)).unwrap();
    bonding.add_protected_asset(&a.treasury, AssetId::Native).unwrap();
    let before = bonding.state_hash();
    let events_before = bonding.events().len();

    let unauthorized = Error::Unauthorized { caller: a.stranger };
    assert_eq!(
        bonding.set_service_address(&a.stranger, a.stranger).unwrap_err(),
        unauthorized
    );
    assert_eq!(bonding.add_protected_asset(&a.stranger, t).unwrap_err(), unauthorized);
    assert_eq!(
        bonding
            .remove_protected_asset(&a.stranger, AssetId::Native)
            .unwrap_err(),
        unauthorized
    );
    assert_eq!(
        bonding
            .send_dust(&a.stranger, t, a.stranger, Amount::new(5))
            .unwrap_err(),
        unauthorized
    );
    assert_eq!(
        bonding
            .transfer_administrator(&a.stranger, a.stranger)
            .unwrap_err(),
        unauthorized
    );

    assert_eq!(bonding.state_hash(), before);
    assert_eq!(bonding.events().len(), events_before);
    assert_eq!(bonding.holding_balance(&t), Amount::new(5));
}

#[test]
fn test_authorization_checked_before_registry_state() {
    let a = actors();
    let (_, t) = token(0x10);
    let mut bonding = deploy(&a);

    // A stranger removing an unknown asset learns nothing about the registry.
    let err = bonding.remove_protected_asset(&a.stranger, t).unwrap_err();
    assert!(err.is_authorization());
}

#[test]
fn test_administrator_handover() {
    let a = actors();
    let mut bonding = deploy(&a);

    bonding.transfer_administrator(&a.treasury, a.stranger).unwrap();
    assert_eq!(bonding.administrator(), a.stranger);

    assert!(bonding
        .set_service_address(&a.treasury, a.recipient)
        .unwrap_err()
        .is_authorization());
    bonding.set_service_address(&a.stranger, a.recipient).unwrap();
    assert_eq!(bonding.service_address(), a.recipient);
}

// ═══════════════════════════════════════════════════════════════════════════════
// AUDIT TRAIL
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_every_successful_mutation_is_recorded() {
    let a = actors();
    let (t_addr, t) = token(0x10);
    let mut bonding = deploy(&a);
    bonding.ledger_mut().mint_token(t_addr, a.holding, Amount::new(2)).unwrap();

    bonding.set_service_address(&a.treasury, a.recipient).unwrap();
    bonding.add_protected_asset(&a.treasury, t).unwrap();
    let _ = bonding.add_protected_asset(&a.treasury, t);
    bonding.remove_protected_asset(&a.treasury, t).unwrap();
    bonding.send_dust(&a.treasury, t, a.recipient, Amount::new(2)).unwrap();
    bonding.transfer_administrator(&a.treasury, a.stranger).unwrap();

    let types: Vec<&str> = bonding.events().events().iter().map(|e| e.event_type()).collect();
    assert_eq!(
        types,
        vec![
            "ServiceAddressChanged",
            "ProtectedAssetAdded",
            "ProtectedAssetRemoved",
            "DustSent",
            "AdministratorTransferred",
        ]
    );

    let sequences: Vec<u64> = bonding.events().events().iter().map(|e| e.sequence()).collect();
    assert_eq!(sequences, vec![0, 1, 2, 3, 4]);
    assert!(!bonding.events().head().is_zero());
}

// ═══════════════════════════════════════════════════════════════════════════════
// PERSISTENCE & SHARING
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_state_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let file = StateFile::new(dir.path().join("state.json"));
    let a = actors();
    let (t_addr, t) = token(0x10);

    let mut bonding = deploy(&a);
    bonding.ledger_mut().mint_token(t_addr, a.holding, Amount::new(4)).unwrap();
    bonding.add_protected_asset(&a.treasury, t).unwrap();
    file.save(&bonding).unwrap();

    let mut reloaded = file.load().unwrap();
    assert_eq!(reloaded.state_hash(), bonding.state_hash());
    assert!(reloaded.is_protected(&t));
    assert_eq!(
        reloaded
            .send_dust(&a.treasury, t, a.recipient, Amount::new(1))
            .unwrap_err(),
        Error::AssetIsProtected(t)
    );
    assert_eq!(reloaded.holding_balance(&t), Amount::new(4));
}

#[test]
fn test_shared_handle_sees_one_state() {
    let a = actors();
    let shared = SharedBonding::new(deploy(&a));
    let other = shared.clone();

    shared.add_protected_asset(&a.treasury, AssetId::Native).unwrap();
    assert!(other.is_protected(&AssetId::Native).unwrap());

    let err = other.set_service_address(&a.stranger, a.stranger).unwrap_err();
    assert!(err.is_authorization());
    assert_eq!(shared.service_address().unwrap(), Address::ZERO);
}
