use std::fmt;

use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionAction {
    InitialDeposit,
    Deposit,
    Withdraw,
}

impl TransactionAction {
    fn amount_requirement(&self) -> &'static str {
        match self {
            TransactionAction::InitialDeposit => "zero or more",
            TransactionAction::Deposit | TransactionAction::Withdraw => "positive",
        }
    }
}

impl fmt::Display for TransactionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionAction::InitialDeposit => "Initial deposit",
            TransactionAction::Deposit => "Deposit",
            TransactionAction::Withdraw => "Withdrawal",
        })
    }
}

/// A balance change that passed amount validation, but has not been checked
/// against the account state yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionCommand {
    pub action: TransactionAction,
    pub amount: Decimal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountCommandError {
    #[error("{action} amount must be {}, got {amount}", .action.amount_requirement())]
    InvalidAmount {
        action: TransactionAction,
        amount: Decimal,
    },
}

impl TransactionCommand {
    pub fn parse(action: TransactionAction, amount: Decimal) -> Result<Self, AccountCommandError> {
        let accepted = match action {
            TransactionAction::InitialDeposit => amount >= Decimal::zero(),
            TransactionAction::Deposit | TransactionAction::Withdraw => amount > Decimal::zero(),
        };
        if accepted {
            Ok(Self { action, amount })
        } else {
            Err(AccountCommandError::InvalidAmount { action, amount })
        }
    }
}
