//! Asset ledger abstraction.
//!
//! The sweep never edits balances directly: it asks an [`AssetLedger`] to move
//! funds out of the holding account. Native currency moves as a direct balance
//! transfer; tokens move through the token's own transfer mechanism. Either the
//! full amount moves or the ledger is left untouched.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::amount::Amount;
use crate::core::asset::AssetId;
use crate::error::{Error, Result};
use crate::utils::address::Address;

// ═══════════════════════════════════════════════════════════════════════════════
// LEDGER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Balance source and transfer mechanism for every asset kind
pub trait AssetLedger {
    /// Balance of `holder` in `asset`
    fn balance_of(&self, asset: &AssetId, holder: &Address) -> Amount;

    /// Move `amount` of `asset` from `from` to `to`.
    ///
    /// Must be all-or-nothing and report every failure as
    /// [`Error::TransferFailed`].
    fn transfer(
        &mut self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// TOKEN BOOK
// ═══════════════════════════════════════════════════════════════════════════════

/// Balances of a single token contract
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBook {
    balances: BTreeMap<Address, Amount>,
    /// When set, every transfer reports failure (paused or reverting token)
    halted: bool,
}

impl TokenBook {
    /// Balance of `holder`
    pub fn balance_of(&self, holder: &Address) -> Amount {
        self.balances.get(holder).copied().unwrap_or(Amount::ZERO)
    }

    /// Sum of all balances
    pub fn total_supply(&self) -> Amount {
        self.balances
            .values()
            .fold(Amount::ZERO, |acc, b| acc.checked_add(*b).unwrap_or(acc))
    }

    /// Whether transfers are currently refused
    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IN-MEMORY LEDGER
// ═══════════════════════════════════════════════════════════════════════════════

/// In-memory ledger of native and token balances
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryLedger {
    native: BTreeMap<Address, Amount>,
    tokens: BTreeMap<Address, TokenBook>,
    /// Accounts that refuse incoming native currency
    native_rejecting: BTreeSet<Address>,
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EXTERNAL DEPOSITS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Credit native currency to `to` from outside the system
    pub fn deposit_native(&mut self, to: Address, amount: Amount) -> Result<()> {
        credit(&mut self.native, to, amount, "native deposit")
    }

    /// Credit `amount` of `token` to `to` (token-side mint).
    ///
    /// The native sentinel is not a token contract; it credits native currency.
    pub fn mint_token(&mut self, token: Address, to: Address, amount: Amount) -> Result<()> {
        if AssetId::from_address(token).is_native() {
            return self.deposit_native(to, amount);
        }
        let book = self.tokens.entry(token).or_default();
        credit(&mut book.balances, to, amount, "token mint")
    }

    /// Credit any asset kind
    pub fn deposit(&mut self, asset: &AssetId, to: Address, amount: Amount) -> Result<()> {
        match asset.normalized() {
            AssetId::Native => self.deposit_native(to, amount),
            AssetId::Token(token) => self.mint_token(token, to, amount),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FAILURE MODES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Make `account` refuse incoming native currency
    pub fn reject_native_from(&mut self, account: Address) {
        self.native_rejecting.insert(account);
    }

    /// Let `account` accept native currency again
    pub fn accept_native(&mut self, account: &Address) {
        self.native_rejecting.remove(account);
    }

    /// Make every transfer of `token` report failure
    pub fn halt_token(&mut self, token: Address) {
        self.tokens.entry(token).or_default().halted = true;
    }

    /// Resume transfers of `token`
    pub fn resume_token(&mut self, token: &Address) {
        if let Some(book) = self.tokens.get_mut(token) {
            book.halted = false;
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // QUERIES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Book of a token, if it has ever been touched
    pub fn token(&self, token: &Address) -> Option<&TokenBook> {
        self.tokens.get(token)
    }

    /// All non-zero holdings of `holder`, native first
    pub fn holdings(&self, holder: &Address) -> Vec<(AssetId, Amount)> {
        let mut out = Vec::new();
        let native = self.balance_of(&AssetId::Native, holder);
        if !native.is_zero() {
            out.push((AssetId::Native, native));
        }
        for (token, book) in &self.tokens {
            let balance = book.balance_of(holder);
            if !balance.is_zero() {
                out.push((AssetId::Token(*token), balance));
            }
        }
        out
    }

    fn transfer_native(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<()> {
        if self.native_rejecting.contains(to) {
            return Err(Error::TransferFailed {
                asset: AssetId::Native,
                reason: format!("recipient {} rejected native currency", to),
            });
        }
        move_balance(&mut self.native, &AssetId::Native, from, to, amount)
    }

    fn transfer_token(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()> {
        let asset = AssetId::Token(*token);
        let book = match self.tokens.get_mut(token) {
            Some(book) => book,
            None => {
                return Err(Error::TransferFailed {
                    asset,
                    reason: format!("insufficient balance: have 0, need {}", amount),
                })
            }
        };
        if book.halted {
            return Err(Error::TransferFailed {
                asset,
                reason: "token transfer reverted".into(),
            });
        }
        move_balance(&mut book.balances, &asset, from, to, amount)
    }
}

impl AssetLedger for InMemoryLedger {
    fn balance_of(&self, asset: &AssetId, holder: &Address) -> Amount {
        match asset.normalized() {
            AssetId::Native => self.native.get(holder).copied().unwrap_or(Amount::ZERO),
            AssetId::Token(token) => self
                .tokens
                .get(&token)
                .map(|book| book.balance_of(holder))
                .unwrap_or(Amount::ZERO),
        }
    }

    fn transfer(
        &mut self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()> {
        match asset.normalized() {
            AssetId::Native => self.transfer_native(from, to, amount),
            AssetId::Token(token) => self.transfer_token(&token, from, to, amount),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// INTERNAL
// ═══════════════════════════════════════════════════════════════════════════════

fn credit(
    balances: &mut BTreeMap<Address, Amount>,
    to: Address,
    amount: Amount,
    operation: &str,
) -> Result<()> {
    let current = balances.get(&to).copied().unwrap_or(Amount::ZERO);
    let updated = current.checked_add(amount).ok_or(Error::Overflow {
        operation: operation.into(),
    })?;
    balances.insert(to, updated);
    Ok(())
}

/// Validate both legs first, then apply them, so a failure leaves `balances` untouched.
fn move_balance(
    balances: &mut BTreeMap<Address, Amount>,
    asset: &AssetId,
    from: &Address,
    to: &Address,
    amount: Amount,
) -> Result<()> {
    let from_balance = balances.get(from).copied().unwrap_or(Amount::ZERO);
    let new_from = from_balance.checked_sub(amount).ok_or_else(|| Error::TransferFailed {
        asset: *asset,
        reason: format!("insufficient balance: have {}, need {}", from_balance, amount),
    })?;

    if from == to {
        return Ok(());
    }

    let to_balance = balances.get(to).copied().unwrap_or(Amount::ZERO);
    let new_to = to_balance.checked_add(amount).ok_or_else(|| Error::TransferFailed {
        asset: *asset,
        reason: "recipient balance overflow".into(),
    })?;

    if new_from.is_zero() {
        balances.remove(from);
    } else {
        balances.insert(*from, new_from);
    }
    balances.insert(*to, new_to);
    Ok(())
}
