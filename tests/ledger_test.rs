mod common;

use anyhow::Result;
use common::scenario_bank;
use teller::domain::{
    Account, AccountStore, AtmError, Bank, CashInventory, Transaction, TransactionStatus,
};

#[test]
fn test_authenticate_only_with_matching_pin() -> Result<()> {
    let bank = scenario_bank();
    for pin in 0..10_000 {
        assert_eq!(bank.accounts.authenticate(12345, pin), pin == 1234);
        assert_eq!(bank.accounts.authenticate(54321, pin), pin == 4321);
        assert!(!bank.accounts.authenticate(99999, pin));
    }
    // Failed attempts leave the ledger untouched
    assert_eq!(bank, scenario_bank());
    Ok(())
}

#[test]
fn test_transfers_conserve_total_balance() -> Result<()> {
    let mut accounts = AccountStore::from_accounts([
        Account::new(1, 1, 1_000),
        Account::new(2, 2, 500),
        Account::new(3, 3, 0),
    ])?;
    let total = accounts.total_balance();

    let moves = [
        (1, 2, 300),
        (2, 3, 800),
        (3, 1, 1_000),
        (1, 3, 5_000),
        (2, 4, 10),
        (3, 2, 0),
        (2, 1, 1),
    ];
    for (from, to, amount) in moves {
        let pair_before = accounts.balance(from)? + accounts.balance(to).unwrap_or(0);
        let _ = accounts.transfer(from, to, amount);
        let pair_after = accounts.balance(from)? + accounts.balance(to).unwrap_or(0);

        assert_eq!(pair_before, pair_after, "transfer {from} -> {to} of {amount}");
        assert_eq!(accounts.total_balance(), total);
        assert!(accounts.accounts().iter().all(|a| a.balance >= 0));
    }
    Ok(())
}

#[test]
fn test_withdrawal_moves_money_and_bills_together() -> Result<()> {
    for amount in (0..=1_500).step_by(5) {
        let mut bank = scenario_bank();
        let before = bank.clone();
        let mut withdrawal = Transaction::withdrawal(12345, amount);

        let result = withdrawal.execute(&mut bank);

        let debited = before.accounts.balance(12345)? - bank.accounts.balance(12345)?;
        let dispensed = before.cash.total() - bank.cash.total();
        assert_eq!(debited, dispensed, "withdrawal of {amount}");
        match result {
            Ok(_) => {
                assert_eq!(debited, amount);
                assert_eq!(withdrawal.status(), TransactionStatus::Completed);
            }
            Err(_) => {
                assert_eq!(bank, before);
                assert_eq!(withdrawal.status(), TransactionStatus::Failed);
            }
        }
    }
    Ok(())
}

#[test]
fn test_dispenser_drains_without_going_negative() -> Result<()> {
    let mut bank = Bank::new(
        AccountStore::from_accounts([Account::new(1, 1, 1_000_000)])?,
        CashInventory::new([(100, 5), (50, 10), (20, 10)])?,
    );

    let mut served = 0;
    loop {
        let mut withdrawal = Transaction::withdrawal(1, 240);
        match withdrawal.execute(&mut bank) {
            Ok(_) => served += 240,
            Err(AtmError::InsufficientStock { requested: 240 }) => break,
            Err(err) => return Err(err.into()),
        }
    }

    assert_eq!(bank.cash.total(), 1_200 - served);
    assert_eq!(bank.accounts.balance(1)?, 1_000_000 - served);
    assert!(!bank.cash.can_dispense(240));
    let counted: i64 = bank
        .cash
        .denominations()
        .map(|(denomination, count)| denomination * i64::from(count))
        .sum();
    assert_eq!(counted, bank.cash.total());
    Ok(())
}

#[test]
fn test_scenario_withdraw_then_bad_transfer() -> Result<()> {
    let mut bank = scenario_bank();

    let outcome = Transaction::withdrawal(12345, 300).execute(&mut bank)?;
    assert_eq!(outcome.balance(), 700);
    assert_eq!(
        bank.cash,
        CashInventory::new([(100, 2), (50, 10), (20, 10)])?
    );

    assert_eq!(
        Transaction::withdrawal(12345, 15).execute(&mut bank),
        Err(AtmError::InvalidAmount(
            "Amount must be a multiple of 20".to_string()
        ))
    );

    assert_eq!(
        Transaction::transfer(12345, 99999, 500).execute(&mut bank),
        Err(AtmError::UnknownAccount(99999))
    );
    assert_eq!(bank.accounts.balance(12345)?, 700);

    // Store-level transfer takes the debit-then-rollback path
    assert_eq!(
        bank.accounts.transfer(12345, 99999, 500),
        Err(AtmError::UnknownAccount(99999))
    );
    assert_eq!(bank.accounts.balance(12345)?, 700);
    Ok(())
}

#[test]
fn test_greedy_can_refuse_what_exact_check_allows() -> Result<()> {
    let mut bank = Bank::new(
        AccountStore::from_accounts([Account::new(1, 1, 1_000)])?,
        CashInventory::new([(50, 1), (20, 3)])?,
    );

    assert!(bank.cash.can_dispense(60));
    assert_eq!(
        Transaction::withdrawal(1, 60).execute(&mut bank),
        Err(AtmError::InsufficientStock { requested: 60 })
    );
    assert_eq!(bank.accounts.balance(1)?, 1_000);

    let outcome = Transaction::withdrawal(1, 90).execute(&mut bank)?;
    assert_eq!(outcome.balance(), 910);
    assert_eq!(bank.cash.count(50), 0);
    assert_eq!(bank.cash.count(20), 1);
    assert!(!bank.cash.can_dispense(40));
    Ok(())
}
