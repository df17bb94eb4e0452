use std::io::Write;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Deposit,
    Withdraw,
    CheckBalance,
    CreateAccount,
    ViewAllAccounts,
    DeleteAccount,
    ViewAccountDetails,
    Exit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("Invalid input. Please enter a number.")]
    NotANumber,
    #[error("Invalid option {0}. Please choose a number between 1-8.")]
    OutOfRange(i64),
}

const ENTRIES: [(MenuChoice, &str); 8] = [
    (MenuChoice::Deposit, "Deposit Money"),
    (MenuChoice::Withdraw, "Withdraw Money"),
    (MenuChoice::CheckBalance, "Check Balance"),
    (MenuChoice::CreateAccount, "Create New Account"),
    (MenuChoice::ViewAllAccounts, "View All Accounts"),
    (MenuChoice::DeleteAccount, "Delete Account"),
    (MenuChoice::ViewAccountDetails, "View Account Details"),
    (MenuChoice::Exit, "Exit"),
];

impl MenuChoice {
    pub fn parse(input: &str) -> Result<Self, MenuError> {
        let number: i64 = input.trim().parse().map_err(|_| MenuError::NotANumber)?;
        usize::try_from(number)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| ENTRIES.get(idx))
            .map(|(choice, _)| *choice)
            .ok_or(MenuError::OutOfRange(number))
    }
}

pub fn print_menu<W: Write>(output: &mut W) -> std::io::Result<()> {
    let rule = "=".repeat(50);
    writeln!(output)?;
    writeln!(output, "{rule}")?;
    writeln!(output, "SIMPLE BANKING APP")?;
    writeln!(output, "{rule}")?;
    for (idx, (_, label)) in ENTRIES.iter().enumerate() {
        writeln!(output, "{}. {label}", idx + 1)?;
    }
    writeln!(output, "{rule}")
}
