// 撮合引擎 - 挂单 / 吃单 / 撤单
// Order engine - make / take / cancel
//
// 订单状态: Open(订单行存在,卖方资金已托管) -> Fulfilled 或 Canceled(订单行删除)
// Order states: Open (row exists, seller funds escrowed) -> Fulfilled or Canceled (row deleted)
//
// 订单里只保存账户身份,所有余额都在事务内重新读取
// Orders hold account identity only; every balance is re-read inside the transaction

use crate::db::LedgerTx;
use crate::ledger::errors::{LedgerError, Result};
use crate::ledger::funding::{deposit_in, withdraw_in};
use crate::ledger::operations::{credit, debit, ensure_funds};
use crate::ledger::types::{Account, AccountId, Amount, Order, OrderId, Settlement, Ticker, UserId};

/// 挂单参数 / Order placement request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeOrder {
    pub user_id: UserId,
    pub sell_ticker: Ticker,
    pub sell_amount: Amount,
    pub buy_ticker: Ticker,
    pub buy_amount: Amount,
}

/// 挂单: 托管卖出资金并创建订单
/// Place an order: escrow the sell side and persist the order
pub fn make_order_in(tx: &LedgerTx<'_>, req: &MakeOrder) -> Result<Order> {
    // 1. 卖出账户必须存在且余额充足
    // 1. The sell-source account must exist and cover the sell amount
    let mut seller = tx
        .get_account(req.user_id, &req.sell_ticker)?
        .ok_or_else(|| LedgerError::InsufficientFunds {
            user_id: req.user_id,
            ticker: req.sell_ticker.clone(),
            available: 0,
            requested: req.sell_amount,
        })?;
    ensure_funds(&seller, req.sell_amount)?;

    // 2. 买入目标账户在订单创建前就必须存在
    // 2. The buy-target account must exist before the order does
    let buyer = tx.get_or_create_account(req.user_id, &req.buy_ticker)?;

    // 3. 托管,只扣一次
    // 3. Escrow, debited exactly once
    debit(tx, &mut seller, req.sell_amount)?;

    // 4. 持久化订单
    // 4. Persist the order
    let order = tx.create_order(&buyer, req.buy_amount, &seller, req.sell_amount)?;
    Ok(order)
}

/// 吃单: 吃单者支付 buy_amount,获得托管的 sell_amount
/// Take an order: the taker pays buy_amount and receives the escrowed sell_amount
pub fn take_order_in(tx: &LedgerTx<'_>, taker_id: UserId, order_id: OrderId) -> Result<Settlement> {
    let order = tx
        .order(order_id)?
        .ok_or(LedgerError::OrderNotFound(order_id))?;

    // 吃单者支付挂单者想要的资产 / Taker pays in the asset the maker wants
    let paid = withdraw_in(tx, taker_id, order.buy_ticker(), order.buy_amount)?;

    // 吃单者收到托管资产,账户按需创建 / Taker receives the escrow, account created on demand
    let received = deposit_in(tx, taker_id, order.sell_ticker(), order.sell_amount)?;

    // 挂单者的买入目标账户按 ID 重新读取 / Maker's buy-target account re-read by id
    let mut maker = live_account(tx, order.buyer.account_id)?;
    credit(tx, &mut maker, order.buy_amount)?;

    tx.delete_order(order.id)?;

    // 自成交时几个账户可能是同一行,返回最终值
    // Under self-trading several of these can be the same row; return final values
    Ok(Settlement {
        taker_paid: live_account(tx, paid.id)?,
        taker_received: live_account(tx, received.id)?,
        maker_received: live_account(tx, maker.id)?,
        order,
    })
}

/// 撤单: 删除订单并退还托管资金
/// Cancel an order: delete it and refund the escrow to the seller account
pub fn cancel_order_in(tx: &LedgerTx<'_>, order_id: OrderId) -> Result<Account> {
    let order = tx
        .order(order_id)?
        .ok_or(LedgerError::OrderNotFound(order_id))?;

    let mut seller = live_account(tx, order.seller.account_id)?;
    credit(tx, &mut seller, order.sell_amount)?;

    tx.delete_order(order.id)?;
    Ok(seller)
}

fn live_account(tx: &LedgerTx<'_>, id: AccountId) -> Result<Account> {
    tx.account(id)?.ok_or(LedgerError::AccountNotFound(id))
}
