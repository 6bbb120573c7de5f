// 账本原子操作: 入账与扣款
// Ledger primitives: credit and debit
//
// 调用方传入的账户必须在同一事务内以排他锁读取
// The account passed in must have been read under an exclusive lock in the same transaction

use crate::db::LedgerTx;
use crate::ledger::errors::{LedgerError, Result};
use crate::ledger::types::{Account, Amount};

/// 入账 / Credit `amount` to the account and persist it
pub fn credit(tx: &LedgerTx<'_>, account: &mut Account, amount: Amount) -> Result<()> {
    account.amount = account
        .amount
        .checked_add(amount)
        .ok_or(LedgerError::BalanceOverflow {
            account_id: account.id,
            balance: account.amount,
            credit: amount,
        })?;
    tx.save_account(account)?;
    Ok(())
}

/// 扣款,余额不足时失败且不做任何修改
/// Debit `amount`; fails without touching the account when the balance is short
pub fn debit(tx: &LedgerTx<'_>, account: &mut Account, amount: Amount) -> Result<()> {
    ensure_funds(account, amount)?;
    account.amount -= amount;
    tx.save_account(account)?;
    Ok(())
}

pub(crate) fn ensure_funds(account: &Account, amount: Amount) -> Result<()> {
    if account.amount < amount {
        return Err(LedgerError::InsufficientFunds {
            user_id: account.user_id,
            ticker: account.ticker.clone(),
            available: account.amount,
            requested: amount,
        });
    }
    Ok(())
}
