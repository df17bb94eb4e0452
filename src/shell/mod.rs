//! Console front end for [`crate::registry::Registry`]: reads operator input,
//! calls into the core and renders the outcome. Nothing in here holds state
//! besides the registry it was given.

use std::{
    io::{BufRead, Write},
    str::FromStr,
};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    account::{AccountError, Transaction, format_amount},
    registry::{Registry, RegistryError},
};
use menu::{MenuChoice, print_menu};

pub mod logging;
pub mod menu;
pub mod seed;
pub mod statement;

enum Flow {
    Continue,
    Exit,
}

pub struct Session<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub registry: Registry,
}

/// Accepts plain decimals, optionally prefixed with `$`.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let input = input.trim();
    let input = input.strip_prefix('$').unwrap_or(input);
    Decimal::from_str(input).ok()
}

impl<'w, R, W> Session<'w, R, W>
where
    R: BufRead,
    W: Write + 'w,
{
    /// Runs the menu loop until the operator exits or input runs out, then
    /// hands the registry back.
    pub fn run(mut self) -> Result<Registry> {
        loop {
            print_menu(&mut *self.output)?;
            let Some(line) = self.prompt("Choose an option (1-8): ")? else {
                self.end_of_input()?;
                break;
            };
            let flow = match MenuChoice::parse(&line) {
                Ok(choice) => self.dispatch(choice)?,
                Err(err) => {
                    writeln!(self.output, "{err}")?;
                    Flow::Continue
                }
            };
            if let Flow::Exit = flow {
                break;
            }
        }
        self.output.flush().context("Failed to flush output")?;
        Ok(self.registry)
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<Flow> {
        match choice {
            MenuChoice::Deposit => self.deposit(),
            MenuChoice::Withdraw => self.withdraw(),
            MenuChoice::CheckBalance => self.check_balance(),
            MenuChoice::CreateAccount => self.create_account(),
            MenuChoice::ViewAllAccounts => self.view_all_accounts(),
            MenuChoice::DeleteAccount => self.delete_account(),
            MenuChoice::ViewAccountDetails => self.view_account_details(),
            MenuChoice::Exit => {
                writeln!(self.output, "\nThank you for using the Simple Banking App!")?;
                Ok(Flow::Exit)
            }
        }
    }

    /// Returns the trimmed line, or `None` once input is exhausted.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush().context("Failed to flush output")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read operator input")?;
        if read == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn end_of_input(&mut self) -> Result<Flow> {
        writeln!(self.output, "No input available. Exiting application.")?;
        Ok(Flow::Exit)
    }

    fn report(&mut self, err: RegistryError) -> Result<Flow> {
        debug!(%err, "operation rejected");
        match &err {
            RegistryError::AccountErr(AccountError::InsufficientFunds { available, .. }) => {
                writeln!(
                    self.output,
                    "Withdrawal failed. Insufficient funds. Current balance: ${}",
                    format_amount(*available)
                )?;
            }
            _ => writeln!(self.output, "{err}.")?,
        }
        Ok(Flow::Continue)
    }

    fn deposit(&mut self) -> Result<Flow> {
        self.balance_change(
            "Enter amount to deposit: $",
            "Deposit",
            |registry, id, amount| registry.deposit(id, amount),
        )
    }

    fn withdraw(&mut self) -> Result<Flow> {
        self.balance_change(
            "Enter amount to withdraw: $",
            "Withdrawal",
            |registry, id, amount| registry.withdraw(id, amount),
        )
    }

    fn balance_change<F>(&mut self, amount_label: &str, name: &str, change: F) -> Result<Flow>
    where
        F: FnOnce(&mut Registry, &str, Decimal) -> Result<Transaction, RegistryError>,
    {
        let Some(id) = self.prompt("Enter account number: ")? else {
            return self.end_of_input();
        };
        if !self.registry.contains(&id) {
            return self.report(RegistryError::NotFound { id });
        }
        let Some(raw) = self.prompt(amount_label)? else {
            return self.end_of_input();
        };
        let Some(amount) = parse_amount(&raw) else {
            writeln!(self.output, "Invalid input. Please enter a valid amount.")?;
            return Ok(Flow::Continue);
        };
        match change(&mut self.registry, &id, amount) {
            Ok(tx) => {
                writeln!(
                    self.output,
                    "{name} successful. New balance: ${}",
                    format_amount(tx.balance_after())
                )?;
                Ok(Flow::Continue)
            }
            Err(err) => self.report(err),
        }
    }

    fn check_balance(&mut self) -> Result<Flow> {
        let Some(id) = self.prompt("Enter account number: ")? else {
            return self.end_of_input();
        };
        match self.registry.account(&id).map(|acc| acc.balance()) {
            Ok(balance) => {
                let balance = format_amount(balance);
                writeln!(self.output, "Current balance is: ${balance}")?;
                Ok(Flow::Continue)
            }
            Err(err) => self.report(err),
        }
    }

    fn create_account(&mut self) -> Result<Flow> {
        writeln!(self.output, "\nCreating New Account\n{}", "-".repeat(30))?;
        let Some(id) = self.prompt("Enter account number: ")? else {
            return self.end_of_input();
        };
        if id.is_empty() {
            writeln!(self.output, "Account number cannot be empty.")?;
            return Ok(Flow::Continue);
        }
        if self.registry.contains(&id) {
            return self.report(RegistryError::DuplicateId { id });
        }

        let Some(owner) = self.prompt("Enter account holder name: ")? else {
            return self.end_of_input();
        };
        if owner.is_empty() {
            writeln!(self.output, "Account holder name cannot be empty.")?;
            return Ok(Flow::Continue);
        }

        let Some(raw) = self.prompt("Enter initial deposit amount: $")? else {
            return self.end_of_input();
        };
        let Some(initial_balance) = parse_amount(&raw) else {
            writeln!(self.output, "Invalid input. Please enter a valid amount.")?;
            return Ok(Flow::Continue);
        };

        let opened = self
            .registry
            .open_account(&id, &owner, initial_balance)
            .map(|acc| acc.summary());
        match opened {
            Ok(summary) => {
                writeln!(self.output, "Account created successfully!")?;
                writeln!(self.output, "   Account Number: {}", summary.id)?;
                writeln!(self.output, "   Holder Name: {}", summary.owner)?;
                writeln!(
                    self.output,
                    "   Initial Balance: ${}",
                    format_amount(summary.balance)
                )?;
                Ok(Flow::Continue)
            }
            Err(err) => self.report(err),
        }
    }

    fn view_all_accounts(&mut self) -> Result<Flow> {
        let rule = "-".repeat(50);
        writeln!(self.output, "\nAll Accounts\n{rule}")?;
        if self.registry.is_empty() {
            writeln!(self.output, "No accounts found.")?;
            return Ok(Flow::Continue);
        }
        writeln!(
            self.output,
            "{:<15} {:<20} {:>13}",
            "Account #", "Holder Name", "Balance"
        )?;
        writeln!(self.output, "{rule}")?;
        for acc in self.registry.iter() {
            writeln!(
                self.output,
                "{:<15} {:<20} {:>13}",
                acc.id(),
                acc.owner(),
                format!("${}", format_amount(acc.balance()))
            )?;
        }
        writeln!(self.output, "{rule}")?;
        let count = self.registry.count();
        match self.registry.total_balance() {
            Ok(total) => {
                let total = format_amount(total);
                writeln!(self.output, "{count} account(s), total balance: ${total}")?;
                Ok(Flow::Continue)
            }
            Err(err) => {
                writeln!(self.output, "{count} account(s)")?;
                self.report(err)
            }
        }
    }

    fn delete_account(&mut self) -> Result<Flow> {
        writeln!(self.output, "\nDelete Account\n{}", "-".repeat(30))?;
        let Some(id) = self.prompt("Enter account number to delete: ")? else {
            return self.end_of_input();
        };
        if !self.registry.contains(&id) {
            return self.report(RegistryError::NotFound { id });
        }
        self.print_details(&id)?;

        let Some(answer) =
            self.prompt("Are you sure you want to delete this account? (yes/no): ")?
        else {
            return self.end_of_input();
        };
        let answer = answer.to_lowercase();
        if answer != "yes" && answer != "y" {
            writeln!(self.output, "Account deletion cancelled.")?;
            return Ok(Flow::Continue);
        }
        if self.registry.remove(&id) {
            writeln!(self.output, "Account deleted successfully!")?;
            Ok(Flow::Continue)
        } else {
            self.report(RegistryError::NotFound { id })
        }
    }

    fn view_account_details(&mut self) -> Result<Flow> {
        writeln!(self.output, "\nAccount Details\n{}", "-".repeat(30))?;
        let Some(id) = self.prompt("Enter account number: ")? else {
            return self.end_of_input();
        };
        if !self.registry.contains(&id) {
            return self.report(RegistryError::NotFound { id });
        }
        self.print_details(&id)?;

        let history = self.registry.account(&id)?.history_snapshot();
        writeln!(self.output, "   Account Status: Active")?;
        if history.is_empty() {
            writeln!(self.output, "   No transactions yet.")?;
        } else {
            writeln!(self.output, "   Transaction history:")?;
            for (idx, tx) in history.iter().enumerate() {
                writeln!(self.output, "   {}. {tx}", idx + 1)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn print_details(&mut self, id: &str) -> Result<()> {
        let acc = self.registry.account(id)?;
        writeln!(self.output, "   Account Number: {}", acc.id())?;
        writeln!(self.output, "   Holder Name: {}", acc.owner())?;
        writeln!(
            self.output,
            "   Current Balance: ${}",
            format_amount(acc.balance())
        )?;
        Ok(())
    }
}
