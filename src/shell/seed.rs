use std::io::Read;

use anyhow::{Context, Result};
use csv::Trim;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{account::Account, registry::Registry};

#[derive(Debug, Deserialize)]
pub struct SeedAccount {
    pub id: String,
    pub owner: String,
    pub balance: Decimal,
}

/// Builds a registry from `id,owner,balance` rows in CSV format.
///
/// Every row goes through the same validation as an account opened from
/// the menu, the first invalid row aborts loading.
pub fn load_registry<R>(source: R) -> Result<Registry>
where
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new().trim(Trim::All).from_reader(source);
    let headers = reader
        .headers()
        .context("Failed to read seed header")?
        .clone();

    let mut registry = Registry::new();
    for record in reader.records() {
        let record = record.context("Failed to read seed account")?;
        let line = record.position().map_or(0, |pos| pos.line());
        let seed: SeedAccount = record
            .deserialize(Some(&headers))
            .with_context(|| format!("Malformed seed account at line {line}"))?;
        let account = Account::open(seed.id, seed.owner, seed.balance)
            .with_context(|| format!("Invalid seed account at line {line}"))?;
        registry
            .add(account)
            .with_context(|| format!("Invalid seed account at line {line}"))?;
    }
    Ok(registry)
}
