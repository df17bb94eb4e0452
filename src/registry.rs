use std::ops::Deref;

use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;
use tracing::debug;

use crate::account::{Account, AccountError, AccountId, Transaction};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Account {id} not found")]
    NotFound { id: AccountId },
    #[error("Account {id} already exists")]
    DuplicateId { id: AccountId },
    #[error(transparent)]
    AccountErr(#[from] AccountError),
    #[error("Total balance is too large to represent")]
    BalanceOverflow,
}

/// Ordered set of accounts with unique ids. Listing follows insertion order.
#[derive(Debug, Default)]
pub struct Registry {
    accounts: Vec<Account>,
}

/// Mutable access to an account held by the [`Registry`].
///
/// Only balance operations are exposed, so the account can't be swapped out
/// for one with a different id.
#[derive(Debug)]
pub struct AccountMut<'a>(&'a mut Account);

impl AccountMut<'_> {
    pub fn deposit(&mut self, amount: Decimal) -> Result<Transaction, AccountError> {
        self.0.deposit(amount)
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<Transaction, AccountError> {
        self.0.withdraw(amount)
    }
}

impl Deref for AccountMut<'_> {
    type Target = Account;

    fn deref(&self) -> &Account {
        &*self.0
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the demo accounts a fresh session starts with.
    pub fn with_sample_accounts() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.open_account("ACC001", "Alice", Decimal::new(50000, 2))?;
        registry.open_account("ACC002", "Bob", Decimal::new(120000, 2))?;
        Ok(registry)
    }

    pub fn add(&mut self, account: Account) -> Result<(), RegistryError> {
        if self.contains(account.id()) {
            return Err(RegistryError::DuplicateId {
                id: account.id().to_owned(),
            });
        }
        debug!(id = %account.id(), "account added");
        self.accounts.push(account);
        Ok(())
    }

    /// Opens a new account and adds it. The id is checked before the account
    /// is created.
    pub fn open_account(
        &mut self,
        id: &str,
        owner: &str,
        initial_balance: Decimal,
    ) -> Result<&Account, RegistryError> {
        if self.contains(id) {
            return Err(RegistryError::DuplicateId { id: id.to_owned() });
        }
        let account = Account::open(id, owner, initial_balance)?;
        self.add(account)?;
        let idx = self.accounts.len() - 1;
        Ok(&self.accounts[idx])
    }

    pub fn find(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|acc| acc.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn find_mut(&mut self, id: &str) -> Option<AccountMut<'_>> {
        self.accounts
            .iter_mut()
            .find(|acc| acc.id() == id)
            .map(AccountMut)
    }

    pub fn account(&self, id: &str) -> Result<&Account, RegistryError> {
        self.find(id)
            .ok_or_else(|| RegistryError::NotFound { id: id.to_owned() })
    }

    pub fn account_mut(&mut self, id: &str) -> Result<AccountMut<'_>, RegistryError> {
        self.find_mut(id)
            .ok_or_else(|| RegistryError::NotFound { id: id.to_owned() })
    }

    pub fn deposit(&mut self, id: &str, amount: Decimal) -> Result<Transaction, RegistryError> {
        Ok(self.account_mut(id)?.deposit(amount)?)
    }

    pub fn withdraw(&mut self, id: &str, amount: Decimal) -> Result<Transaction, RegistryError> {
        Ok(self.account_mut(id)?.withdraw(amount)?)
    }

    /// Snapshot of all accounts in insertion order.
    pub fn list(&self) -> Vec<Account> {
        self.accounts.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let Some(idx) = self.accounts.iter().position(|acc| acc.id() == id) else {
            return false;
        };
        let removed = self.accounts.remove(idx);
        debug!(id = %removed.id(), balance = %removed.balance(), "account removed");
        true
    }

    pub fn count(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Fails when the sum leaves the range of [`Decimal`], even though every
    /// single balance fits.
    pub fn total_balance(&self) -> Result<Decimal, RegistryError> {
        self.accounts
            .iter()
            .try_fold(Decimal::zero(), |total, acc| total.checked_add(acc.balance()))
            .ok_or(RegistryError::BalanceOverflow)
    }
}
