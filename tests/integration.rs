use std::str::from_utf8;

use rust_decimal::Decimal;
use simple_bank::{
    registry::Registry,
    shell::{Session, statement::print_statement},
};

fn run_session(registry: Registry, script: &str) -> (Registry, String) {
    let mut output = Vec::new();
    let session = Session {
        input: script.as_bytes(),
        output: &mut output,
        registry,
    };
    let registry = session.run().unwrap();
    (registry, from_utf8(&output).unwrap().to_owned())
}

#[test]
fn deposit_withdraw_and_check_balance() {
    let script = "1\nACC001\n100\n2\nACC001\n700\n2\nACC001\n-5\n3\nACC001\n8\n";
    let (registry, output) = run_session(Registry::with_sample_accounts().unwrap(), script);

    assert!(output.contains("Deposit successful. New balance: $600.00"));
    assert!(output.contains("Withdrawal failed. Insufficient funds. Current balance: $600.00"));
    assert!(output.contains("Withdrawal amount must be positive, got -5."));
    assert!(output.contains("Current balance is: $600.00"));
    assert!(output.contains("Thank you for using the Simple Banking App!"));
    assert!(!output.contains("No input available"));

    let acc = registry.find("ACC001").unwrap();
    assert_eq!(acc.balance(), Decimal::new(60000, 2));
    assert_eq!(acc.transaction_count(), 2);
    assert_eq!(registry.total_balance(), Ok(Decimal::new(180000, 2)));
}

#[test]
fn create_delete_and_inspect_accounts() {
    let script = "4\nACC003\nCarol\n25.5\n\
                  4\nACC001\n\
                  6\nACC002\nno\n\
                  6\nACC002\ny\n\
                  5\n\
                  7\nACC003\n";
    let (registry, output) = run_session(Registry::with_sample_accounts().unwrap(), script);

    assert!(output.contains("Account created successfully!"));
    assert!(output.contains("Initial Balance: $25.50"));
    assert!(output.contains("Account ACC001 already exists."));
    assert!(output.contains("Account deletion cancelled."));
    assert!(output.contains("Account deleted successfully!"));
    assert!(output.contains("2 account(s), total balance: $525.50"));
    assert!(output.contains("Current Balance: $25.50\n   Account Status: Active\n"));
    assert!(output.contains("1. Initial deposit: $25.50"));
    assert_eq!(output.matches("Holder Name: Carol").count(), 2);
    // script ends without choosing exit
    assert!(output.ends_with("No input available. Exiting application.\n"));

    let ids: Vec<_> = registry.iter().map(|acc| acc.id().to_owned()).collect();
    assert_eq!(ids, ["ACC001", "ACC003"]);
    assert_eq!(registry.count(), 2);
}

#[test]
fn invalid_input_returns_to_menu() {
    let script = "abc\n9\n1\nACC404\n1\nACC001\nten\n4\n\n4\nACC009\nZed\n-1\n8\n";
    let (registry, output) = run_session(Registry::with_sample_accounts().unwrap(), script);

    assert!(output.contains("Invalid input. Please enter a number."));
    assert!(output.contains("Invalid option 9. Please choose a number between 1-8."));
    assert!(output.contains("Account ACC404 not found."));
    assert!(output.contains("Invalid input. Please enter a valid amount."));
    assert!(output.contains("Account number cannot be empty."));
    assert!(output.contains("Initial deposit amount must be zero or more, got -1."));
    assert!(output.contains("Thank you for using the Simple Banking App!"));

    assert_eq!(registry.count(), 2);
    assert_eq!(registry.total_balance(), Ok(Decimal::new(170000, 2)));
}

#[test]
fn empty_registry_and_statement() {
    let script = "5\n4\nACC100\nDana\n$10\n1\nACC100\n0.015\n8\n";
    let (registry, output) = run_session(Registry::new(), script);
    assert!(output.contains("No accounts found."));
    assert!(output.contains("Deposit successful. New balance: $10.02"));

    let mut statement = Vec::new();
    print_statement(&mut statement, registry.iter()).unwrap();
    assert_eq!(
        from_utf8(&statement).unwrap(),
        "id,owner,balance,transactions\nACC100,Dana,10.02,2\n"
    );
    assert_eq!(registry.find("ACC100").unwrap().balance(), Decimal::new(10015, 3));
}

#[test]
fn oversized_total_balance_keeps_session_alive() {
    let max = Decimal::MAX.to_string();
    let script = format!("4\nA\nAnn\n{max}\n4\nB\nBen\n{max}\n5\n3\nB\n8\n");
    let (registry, output) = run_session(Registry::new(), &script);

    assert!(output.contains("2 account(s)\nTotal balance is too large to represent."));
    assert!(output.contains(&format!("Current balance is: ${max}.00")));
    assert!(output.contains("Thank you for using the Simple Banking App!"));
    assert_eq!(registry.count(), 2);
}
