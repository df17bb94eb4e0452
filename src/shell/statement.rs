use std::io::Write;

use csv::Writer;
use serde::Serialize;

use crate::account::{Account, format_amount};

#[derive(Debug, Serialize)]
pub struct StatementRow<'a> {
    pub id: &'a str,
    pub owner: &'a str,
    pub balance: String,
    pub transactions: usize,
}

impl<'a> From<&'a Account> for StatementRow<'a> {
    fn from(acc: &'a Account) -> Self {
        Self {
            id: acc.id(),
            owner: acc.owner(),
            balance: format_amount(acc.balance()),
            transactions: acc.transaction_count(),
        }
    }
}

/// Prints accounts in CSV format.
pub fn print_statement<'a, W>(
    output: &mut W,
    accounts: impl Iterator<Item = &'a Account>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for acc in accounts {
        if let Err(err) = writer.serialize(StatementRow::from(acc)) {
            anyhow::bail!("Failed to write statement: {err}")
        }
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush statement: {err}")
    }
    Ok(())
}
