// 充值 / 提现 (事务内版本,供撮合引擎组合使用)
// Deposit / withdraw (transaction-scoped, composed by the order engine)

use crate::db::LedgerTx;
use crate::ledger::errors::{LedgerError, Result};
use crate::ledger::operations::{credit, debit};
use crate::ledger::types::{Account, Amount, Ticker, UserId};

/// 查询或创建账户后入账 / Get-or-create the account, then credit it
pub fn deposit_in(
    tx: &LedgerTx<'_>,
    user_id: UserId,
    ticker: &Ticker,
    amount: Amount,
) -> Result<Account> {
    let mut account = tx.get_or_create_account(user_id, ticker)?;
    credit(tx, &mut account, amount)?;
    Ok(account)
}

/// 从已有账户扣款;账户不存在视为余额为零
/// Debit an existing account; a missing account counts as a zero balance
pub fn withdraw_in(
    tx: &LedgerTx<'_>,
    user_id: UserId,
    ticker: &Ticker,
    amount: Amount,
) -> Result<Account> {
    let mut account = tx
        .get_account(user_id, ticker)?
        .ok_or_else(|| LedgerError::InsufficientFunds {
            user_id,
            ticker: ticker.clone(),
            available: 0,
            requested: amount,
        })?;
    debit(tx, &mut account, amount)?;
    Ok(account)
}
