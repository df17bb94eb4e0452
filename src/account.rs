use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy, prelude::Zero};
use thiserror::Error;
use tracing::debug;

use crate::command::{AccountCommandError, TransactionAction, TransactionCommand};

pub type AccountId = String;

/// Renders an amount with two decimal places, rounding half away from zero.
/// Only used for display, balances keep their full precision.
pub fn format_amount(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    InitialDeposit,
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    /// Action this kind of transaction is produced by.
    pub fn action(&self) -> TransactionAction {
        match self {
            TransactionKind::InitialDeposit => TransactionAction::InitialDeposit,
            TransactionKind::Deposit => TransactionAction::Deposit,
            TransactionKind::Withdrawal => TransactionAction::Withdraw,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.action(), f)
    }
}

/// Accepted balance change, the only thing that is allowed to move the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    kind: TransactionKind,
    amount: Decimal,
    balance_after: Decimal,
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn balance_after(&self) -> Decimal {
        self.balance_after
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TransactionKind::InitialDeposit => {
                write!(f, "{}: ${}", self.kind, format_amount(self.amount))
            }
            TransactionKind::Deposit | TransactionKind::Withdrawal => write!(
                f,
                "{}: ${} | New balance: ${}",
                self.kind,
                format_amount(self.amount),
                format_amount(self.balance_after)
            ),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error(transparent)]
    InvalidAmount(#[from] AccountCommandError),
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("Account {field} must not be blank")]
    BlankField { field: &'static str },
    #[error("Balance would overflow")]
    BalanceOverflow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: AccountId,
    pub owner: String,
    pub balance: Decimal,
    pub transactions: usize,
}

impl fmt::Display for AccountSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account: {} | Holder: {} | Balance: ${} | Transactions: {}",
            self.id,
            self.owner,
            format_amount(self.balance),
            self.transactions
        )
    }
}

/// Id and owner are fixed at opening. The balance never goes below zero and
/// every accepted change is appended to the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    owner: String,
    balance: Decimal,
    history: Vec<Transaction>,
}

impl Account {
    /// Opens an account. A positive initial balance is recorded as the first
    /// history entry, a zero one leaves the history empty.
    pub fn open(
        id: impl Into<AccountId>,
        owner: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<Self, AccountError> {
        let id = id.into();
        let owner = owner.into();
        if id.trim().is_empty() {
            return Err(AccountError::BlankField { field: "id" });
        }
        if owner.trim().is_empty() {
            return Err(AccountError::BlankField { field: "owner" });
        }
        let command = TransactionCommand::parse(TransactionAction::InitialDeposit, initial_balance)?;

        let mut account = Self {
            id,
            owner,
            balance: Decimal::zero(),
            history: Vec::new(),
        };
        if !command.amount.is_zero() {
            let evt = account.handle_transaction(command)?;
            account.apply(&evt);
        }
        debug!(id = %account.id, balance = %account.balance, "account opened");
        Ok(account)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    /// Owned copy of the history, unaffected by later operations on the account.
    pub fn history_snapshot(&self) -> Vec<Transaction> {
        self.history.clone()
    }

    pub fn transaction_count(&self) -> usize {
        self.history.len()
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id.clone(),
            owner: self.owner.clone(),
            balance: self.balance,
            transactions: self.history.len(),
        }
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<Transaction, AccountError> {
        self.execute(TransactionAction::Deposit, amount)
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<Transaction, AccountError> {
        self.execute(TransactionAction::Withdraw, amount)
    }

    fn execute(
        &mut self,
        action: TransactionAction,
        amount: Decimal,
    ) -> Result<Transaction, AccountError> {
        let result = TransactionCommand::parse(action, amount)
            .map_err(AccountError::from)
            .and_then(|command| self.handle_transaction(command));
        match result {
            Ok(evt) => {
                self.apply(&evt);
                debug!(id = %self.id, %action, %amount, balance = %self.balance, "transaction applied");
                Ok(evt)
            }
            Err(err) => {
                debug!(id = %self.id, %action, %amount, %err, "transaction rejected");
                Err(err)
            }
        }
    }

    fn handle_transaction(&self, command: TransactionCommand) -> Result<Transaction, AccountError> {
        let TransactionCommand { action, amount } = command;
        let (kind, balance_after) = match action {
            TransactionAction::InitialDeposit => (
                TransactionKind::InitialDeposit,
                self.balance.checked_add(amount),
            ),
            TransactionAction::Deposit => {
                (TransactionKind::Deposit, self.balance.checked_add(amount))
            }
            TransactionAction::Withdraw => {
                if self.balance < amount {
                    return Err(AccountError::InsufficientFunds {
                        requested: amount,
                        available: self.balance,
                    });
                }
                (TransactionKind::Withdrawal, self.balance.checked_sub(amount))
            }
        };
        let balance_after = balance_after.ok_or(AccountError::BalanceOverflow)?;
        Ok(Transaction {
            kind,
            amount,
            balance_after,
        })
    }

    // transaction is the source of truth, no more validation happens here
    fn apply(&mut self, evt: &Transaction) {
        self.balance = evt.balance_after;
        self.history.push(*evt);
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::prelude::FromPrimitive;

    use super::*;

    fn alice() -> Account {
        Account::open("ACC001", "Alice", Decimal::new(50000, 2)).unwrap()
    }

    #[test]
    fn open_with_initial_deposit() {
        let acc = alice();
        assert_eq!(acc.id(), "ACC001");
        assert_eq!(acc.owner(), "Alice");
        assert_eq!(acc.balance(), Decimal::new(50000, 2));
        assert_eq!(acc.transaction_count(), 1);
        assert_eq!(acc.history()[0].kind(), TransactionKind::InitialDeposit);
        assert_eq!(acc.history()[0].to_string(), "Initial deposit: $500.00");
    }

    #[test]
    fn open_with_zero_balance_has_no_history() {
        let acc = Account::open("ACC009", "Zed", Decimal::zero()).unwrap();
        assert_eq!(acc.balance(), Decimal::zero());
        assert!(acc.history().is_empty());
    }

    #[test]
    fn open_rejects_invalid_input() {
        let err = Account::open("ACC001", "Alice", Decimal::new(-1, 2)).unwrap_err();
        assert!(matches!(
            err,
            AccountError::InvalidAmount(AccountCommandError::InvalidAmount {
                action: TransactionAction::InitialDeposit,
                ..
            })
        ));

        let err = Account::open("  ", "Alice", Decimal::zero()).unwrap_err();
        assert_eq!(err, AccountError::BlankField { field: "id" });

        let err = Account::open("ACC001", "", Decimal::zero()).unwrap_err();
        assert_eq!(err, AccountError::BlankField { field: "owner" });
        assert_eq!(err.to_string(), "Account owner must not be blank");
    }

    #[test]
    fn deposit() {
        let mut acc = alice();
        let tx = acc.deposit(Decimal::new(10000, 2)).unwrap();
        assert_eq!(tx.kind(), TransactionKind::Deposit);
        assert_eq!(tx.amount(), Decimal::new(10000, 2));
        assert_eq!(tx.balance_after(), Decimal::new(60000, 2));
        assert_eq!(acc.balance(), Decimal::new(60000, 2));
        assert_eq!(acc.transaction_count(), 2);
        assert_eq!(
            acc.history()[1].to_string(),
            "Deposit: $100.00 | New balance: $600.00"
        );
    }

    #[test]
    fn non_positive_deposit_leaves_state_unchanged() {
        let mut acc = alice();
        let before = acc.clone();

        for amount in [Decimal::zero(), Decimal::new(-5000, 2)] {
            let err = acc.deposit(amount).unwrap_err();
            assert!(matches!(
                err,
                AccountError::InvalidAmount(AccountCommandError::InvalidAmount {
                    action: TransactionAction::Deposit,
                    ..
                })
            ));
            assert_eq!(acc, before);
        }
    }

    #[test]
    fn withdraw() {
        let mut acc = alice();
        acc.deposit(Decimal::new(10000, 2)).unwrap();

        let err = acc.withdraw(Decimal::new(70000, 2)).unwrap_err();
        assert_eq!(
            err,
            AccountError::InsufficientFunds {
                requested: Decimal::new(70000, 2),
                available: Decimal::new(60000, 2),
            }
        );
        assert_eq!(acc.balance(), Decimal::new(60000, 2));
        assert_eq!(acc.transaction_count(), 2);

        let err = acc.withdraw(Decimal::new(-500, 2)).unwrap_err();
        assert!(matches!(err, AccountError::InvalidAmount(_)));
        assert_eq!(acc.balance(), Decimal::new(60000, 2));

        let err = acc.withdraw(Decimal::zero()).unwrap_err();
        assert!(matches!(err, AccountError::InvalidAmount(_)));

        // whole balance can be taken out
        let tx = acc.withdraw(Decimal::new(60000, 2)).unwrap();
        assert_eq!(tx.kind(), TransactionKind::Withdrawal);
        assert_eq!(tx.kind().action(), TransactionAction::Withdraw);
        assert_eq!(acc.balance(), Decimal::zero());
        assert_eq!(
            acc.history()[2].to_string(),
            "Withdrawal: $600.00 | New balance: $0.00"
        );
    }

    #[test]
    fn balance_never_goes_negative() {
        let mut acc = Account::open("ACC002", "Bob", Decimal::zero()).unwrap();
        let mut accepted = 0usize;
        for step in 0..200u32 {
            let amount = Decimal::from_u32(step % 37).unwrap() - Decimal::from_u32(3).unwrap();
            let before = acc.balance();
            let result = if step % 3 == 0 {
                acc.deposit(amount)
            } else {
                acc.withdraw(amount)
            };
            match result {
                Ok(tx) => {
                    accepted += 1;
                    let expected = if step % 3 == 0 {
                        before + amount
                    } else {
                        before - amount
                    };
                    assert_eq!(tx.balance_after(), expected);
                }
                Err(_) => assert_eq!(acc.balance(), before),
            }
            assert!(acc.balance() >= Decimal::zero());
        }
        assert_eq!(acc.transaction_count(), accepted);
    }

    #[test]
    fn arithmetic_is_exact() {
        let mut acc = Account::open("ACC003", "Carol", Decimal::zero()).unwrap();
        for _ in 0..10 {
            acc.deposit(Decimal::new(1, 1)).unwrap();
        }
        assert_eq!(acc.balance(), Decimal::ONE);

        acc.deposit(Decimal::new(5, 3)).unwrap();
        // display rounding does not touch the stored balance
        assert_eq!(format_amount(acc.balance()), "1.01");
        assert_eq!(acc.balance(), Decimal::new(1005, 3));
    }

    #[test]
    fn deposit_overflow_is_rejected() {
        let mut acc = Account::open("ACC004", "Dave", Decimal::MAX).unwrap();
        let err = acc.deposit(Decimal::ONE).unwrap_err();
        assert_eq!(err, AccountError::BalanceOverflow);
        assert_eq!(acc.balance(), Decimal::MAX);
    }

    #[test]
    fn history_snapshot_is_detached() {
        let mut acc = alice();
        let mut snapshot = acc.history_snapshot();
        snapshot.clear();
        assert_eq!(acc.transaction_count(), 1);

        let snapshot = acc.history_snapshot();
        acc.deposit(Decimal::ONE).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(acc.transaction_count(), 2);
    }

    #[test]
    fn summary() {
        let acc = Account::open("12345", "John Doe", Decimal::from_u32(100).unwrap()).unwrap();
        let summary = acc.summary();
        assert_eq!(summary.transactions, 1);
        assert_eq!(
            summary.to_string(),
            "Account: 12345 | Holder: John Doe | Balance: $100.00 | Transactions: 1"
        );
    }
}
