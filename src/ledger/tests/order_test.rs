// 挂单 / 吃单 / 撤单测试
// Make / Take / Cancel Order Tests

use super::*;
use crate::ledger::{ErrorKind, LedgerError};

#[test]
fn test_make_order_escrows_sell_amount_once() {
    let (manager, temp_path) = create_test_manager();
    let (u1, _) = seed(&manager);
    manager.deposit(u1, &ticker("USD"), 100).unwrap();

    let order = manager
        .make_order(&order_req(u1, "USD", 100, "EUR", 80))
        .unwrap();

    assert_eq!(order.sell_amount, 100);
    assert_eq!(order.buy_amount, 80);
    assert_eq!(order.maker(), u1);
    assert_eq!(order.sell_ticker(), &ticker("USD"));
    assert_eq!(order.buy_ticker(), &ticker("EUR"));

    assert_eq!(balance(&manager, u1, "USD"), Some(0));
    // 买入目标账户在挂单时已创建 / Buy-target account exists from order creation
    assert_eq!(balance(&manager, u1, "EUR"), Some(0));

    let stored = manager.order(order.id).unwrap();
    assert_eq!(stored, order);
    assert_eq!(manager.list_orders().unwrap().len(), 1);

    cleanup_test_db(&temp_path);
}

#[test]
fn test_make_order_partial_balance_debits_only_sell_amount() {
    let (manager, temp_path) = create_test_manager();
    let (u1, _) = seed(&manager);
    manager.deposit(u1, &ticker("USD"), 150).unwrap();

    manager
        .make_order(&order_req(u1, "USD", 100, "EUR", 80))
        .unwrap();
    assert_eq!(balance(&manager, u1, "USD"), Some(50));

    cleanup_test_db(&temp_path);
}

#[test]
fn test_make_order_insufficient_funds_changes_nothing() {
    let (manager, temp_path) = create_test_manager();
    let (u1, _) = seed(&manager);
    manager.deposit(u1, &ticker("USD"), 100).unwrap();

    let err = manager
        .make_order(&order_req(u1, "USD", 101, "EUR", 80))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);

    assert_eq!(balance(&manager, u1, "USD"), Some(100));
    assert_eq!(balance(&manager, u1, "EUR"), None);
    assert!(manager.list_orders().unwrap().is_empty());

    cleanup_test_db(&temp_path);
}

#[test]
fn test_make_order_without_sell_account() {
    let (manager, temp_path) = create_test_manager();
    let (u1, _) = seed(&manager);

    let err = manager
        .make_order(&order_req(u1, "USD", 1, "EUR", 1))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InsufficientFunds { available: 0, .. }
    ));
    assert!(manager.list_accounts(u1).unwrap().is_empty());

    cleanup_test_db(&temp_path);
}

#[test]
fn test_make_order_unknown_buy_asset_leaves_no_escrow() {
    let (manager, temp_path) = create_test_manager();
    let (u1, _) = seed(&manager);
    manager.deposit(u1, &ticker("USD"), 100).unwrap();

    let err = manager
        .make_order(&order_req(u1, "USD", 100, "GBP", 80))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);
    assert!(err.constraint().is_some());

    // 卖方不会出现"已扣款但无订单" / The seller is never debited without an order
    assert_eq!(balance(&manager, u1, "USD"), Some(100));
    assert!(manager.list_orders().unwrap().is_empty());

    cleanup_test_db(&temp_path);
}

#[test]
fn test_take_order_swaps_balances() {
    let (manager, temp_path) = create_test_manager();
    let (u1, u2) = seed(&manager);
    manager.deposit(u1, &ticker("USD"), 100).unwrap();
    manager.deposit(u2, &ticker("EUR"), 80).unwrap();

    let order = manager
        .make_order(&order_req(u1, "USD", 100, "EUR", 80))
        .unwrap();
    let settlement = manager.take_order(u2, order.id).unwrap();

    assert_eq!(settlement.order, order);
    assert_eq!(settlement.taker_paid.amount, 0);
    assert_eq!(settlement.taker_received.amount, 100);
    assert_eq!(settlement.maker_received.amount, 80);

    assert_eq!(balance(&manager, u2, "EUR"), Some(0));
    assert_eq!(balance(&manager, u2, "USD"), Some(100));
    assert_eq!(balance(&manager, u1, "EUR"), Some(80));
    assert_eq!(balance(&manager, u1, "USD"), Some(0));

    assert!(matches!(
        manager.order(order.id).unwrap_err(),
        LedgerError::OrderNotFound(_)
    ));
    assert!(manager.list_orders().unwrap().is_empty());

    cleanup_test_db(&temp_path);
}

#[test]
fn test_make_and_take_conserve_totals() {
    let (manager, temp_path) = create_test_manager();
    let (u1, u2) = seed(&manager);
    let users = [u1, u2];
    manager.deposit(u1, &ticker("USD"), 500).unwrap();
    manager.deposit(u1, &ticker("EUR"), 7).unwrap();
    manager.deposit(u2, &ticker("EUR"), 400).unwrap();
    manager.deposit(u2, &ticker("USD"), 3).unwrap();

    let usd_before = total(&manager, &users, "USD");
    let eur_before = total(&manager, &users, "EUR");

    for (sell, buy) in [(120, 90), (200, 150), (33, 1)] {
        let order = manager
            .make_order(&order_req(u1, "USD", sell, "EUR", buy))
            .unwrap();
        manager.take_order(u2, order.id).unwrap();
    }

    assert_eq!(total(&manager, &users, "USD"), usd_before);
    assert_eq!(total(&manager, &users, "EUR"), eur_before);
    assert_eq!(balance(&manager, u1, "USD"), Some(500 - 353));
    assert_eq!(balance(&manager, u2, "EUR"), Some(400 - 241));

    cleanup_test_db(&temp_path);
}

#[test]
fn test_take_order_insufficient_funds_is_atomic() {
    let (manager, temp_path) = create_test_manager();
    let (u1, u2) = seed(&manager);
    manager.deposit(u1, &ticker("USD"), 100).unwrap();
    manager.deposit(u2, &ticker("EUR"), 79).unwrap();

    let order = manager
        .make_order(&order_req(u1, "USD", 100, "EUR", 80))
        .unwrap();

    let err = manager.take_order(u2, order.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);

    assert_eq!(balance(&manager, u2, "EUR"), Some(79));
    assert_eq!(balance(&manager, u2, "USD"), None);
    assert_eq!(balance(&manager, u1, "EUR"), Some(0));
    assert_eq!(manager.order(order.id).unwrap(), order);

    cleanup_test_db(&temp_path);
}

#[test]
fn test_take_order_overflow_after_staged_writes_rolls_back() {
    let (manager, temp_path) = create_test_manager();
    let (u1, u2) = seed(&manager);
    manager.deposit(u1, &ticker("USD"), 100).unwrap();
    manager.deposit(u1, &ticker("EUR"), u64::MAX).unwrap();
    manager.deposit(u2, &ticker("EUR"), 80).unwrap();

    let order = manager
        .make_order(&order_req(u1, "USD", 100, "EUR", 80))
        .unwrap();

    // 吃单者已扣款并收到 USD 后,给挂单者记账时溢出
    // Taker is debited and credited before the maker's credit overflows
    let err = manager.take_order(u2, order.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BalanceOverflow);

    assert_eq!(balance(&manager, u2, "EUR"), Some(80));
    assert_eq!(balance(&manager, u2, "USD"), None);
    assert_eq!(manager.list_accounts(u2).unwrap().len(), 1);
    assert_eq!(balance(&manager, u1, "EUR"), Some(u64::MAX));
    assert_eq!(balance(&manager, u1, "USD"), Some(0));
    assert_eq!(manager.order(order.id).unwrap(), order);

    cleanup_test_db(&temp_path);
}

#[test]
fn test_take_order_without_buy_account() {
    let (manager, temp_path) = create_test_manager();
    let (u1, u2) = seed(&manager);
    manager.deposit(u1, &ticker("USD"), 10).unwrap();
    let order = manager
        .make_order(&order_req(u1, "USD", 10, "EUR", 5))
        .unwrap();

    let err = manager.take_order(u2, order.id).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InsufficientFunds { available: 0, requested: 5, .. }
    ));
    assert!(manager.list_accounts(u2).unwrap().is_empty());
    assert!(manager.order(order.id).is_ok());

    cleanup_test_db(&temp_path);
}

#[test]
fn test_take_missing_or_settled_order() {
    let (manager, temp_path) = create_test_manager();
    let (u1, u2) = seed(&manager);
    manager.deposit(u1, &ticker("USD"), 10).unwrap();
    manager.deposit(u2, &ticker("EUR"), 10).unwrap();

    assert!(matches!(
        manager.take_order(u2, 12345).unwrap_err(),
        LedgerError::OrderNotFound(12345)
    ));

    let order = manager
        .make_order(&order_req(u1, "USD", 10, "EUR", 5))
        .unwrap();
    manager.take_order(u2, order.id).unwrap();

    let err = manager.take_order(u2, order.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(balance(&manager, u2, "EUR"), Some(5));

    cleanup_test_db(&temp_path);
}

#[test]
fn test_cancel_order_refunds_escrow() {
    let (manager, temp_path) = create_test_manager();
    let (u1, _) = seed(&manager);
    manager.deposit(u1, &ticker("USD"), 100).unwrap();

    let order = manager
        .make_order(&order_req(u1, "USD", 60, "EUR", 80))
        .unwrap();
    assert_eq!(balance(&manager, u1, "USD"), Some(40));

    let refunded = manager.cancel_order(order.id).unwrap();
    assert_eq!(refunded.id, order.seller.account_id);
    assert_eq!(refunded.amount, 100);
    assert_eq!(balance(&manager, u1, "USD"), Some(100));
    assert!(manager.list_orders().unwrap().is_empty());

    // 重复撤单 / Cancel twice
    assert!(matches!(
        manager.cancel_order(order.id).unwrap_err(),
        LedgerError::OrderNotFound(_)
    ));
    assert_eq!(balance(&manager, u1, "USD"), Some(100));

    cleanup_test_db(&temp_path);
}

#[test]
fn test_canceled_order_cannot_be_taken() {
    let (manager, temp_path) = create_test_manager();
    let (u1, u2) = seed(&manager);
    manager.deposit(u1, &ticker("USD"), 100).unwrap();
    manager.deposit(u2, &ticker("EUR"), 80).unwrap();

    let order = manager
        .make_order(&order_req(u1, "USD", 100, "EUR", 80))
        .unwrap();
    manager.cancel_order(order.id).unwrap();

    assert_eq!(
        manager.take_order(u2, order.id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(balance(&manager, u2, "EUR"), Some(80));

    cleanup_test_db(&temp_path);
}

#[test]
fn test_refund_uses_live_balance() {
    let (manager, temp_path) = create_test_manager();
    let (u1, _) = seed(&manager);
    manager.deposit(u1, &ticker("USD"), 100).unwrap();

    let order = manager
        .make_order(&order_req(u1, "USD", 100, "EUR", 80))
        .unwrap();
    // 挂单后卖方账户又有变动 / The seller account moves after the order is placed
    manager.deposit(u1, &ticker("USD"), 25).unwrap();

    let refunded = manager.cancel_order(order.id).unwrap();
    assert_eq!(refunded.amount, 125);

    cleanup_test_db(&temp_path);
}

#[test]
fn test_self_trade_is_allowed() {
    let (manager, temp_path) = create_test_manager();
    let (u1, _) = seed(&manager);
    manager.deposit(u1, &ticker("USD"), 100).unwrap();
    manager.deposit(u1, &ticker("EUR"), 80).unwrap();

    let order = manager
        .make_order(&order_req(u1, "USD", 100, "EUR", 80))
        .unwrap();
    let settlement = manager.take_order(u1, order.id).unwrap();

    // 吃单者付款账户与挂单者收款账户是同一行
    // The taker's paying account and the maker's receiving account are the same row
    assert_eq!(settlement.taker_paid.id, settlement.maker_received.id);
    assert_eq!(settlement.taker_paid.amount, 80);
    assert_eq!(balance(&manager, u1, "USD"), Some(100));
    assert_eq!(balance(&manager, u1, "EUR"), Some(80));

    cleanup_test_db(&temp_path);
}

#[test]
fn test_same_asset_order_keeps_balance_consistent() {
    let (manager, temp_path) = create_test_manager();
    let (u1, u2) = seed(&manager);
    manager.deposit(u1, &ticker("USD"), 100).unwrap();
    manager.deposit(u2, &ticker("USD"), 50).unwrap();

    let order = manager
        .make_order(&order_req(u1, "USD", 100, "USD", 40))
        .unwrap();
    assert_eq!(order.buyer.account_id, order.seller.account_id);
    assert_eq!(balance(&manager, u1, "USD"), Some(0));

    let settlement = manager.take_order(u2, order.id).unwrap();
    assert_eq!(settlement.taker_paid.id, settlement.taker_received.id);
    assert_eq!(balance(&manager, u2, "USD"), Some(50 - 40 + 100));
    assert_eq!(balance(&manager, u1, "USD"), Some(40));

    cleanup_test_db(&temp_path);
}

#[test]
fn test_zero_amount_order_is_accepted_by_engine() {
    let (manager, temp_path) = create_test_manager();
    let (u1, u2) = seed(&manager);
    manager.deposit(u1, &ticker("USD"), 10).unwrap();

    let order = manager
        .make_order(&order_req(u1, "USD", 10, "EUR", 0))
        .unwrap();
    // 吃单者无 EUR 账户: 不存在视为余额不足
    // Taker has no EUR account: absence counts as insufficient funds
    assert_eq!(
        manager.take_order(u2, order.id).unwrap_err().kind(),
        ErrorKind::InsufficientFunds
    );

    manager.deposit(u2, &ticker("EUR"), 1).unwrap();
    manager.take_order(u2, order.id).unwrap();
    assert_eq!(balance(&manager, u2, "USD"), Some(10));
    assert_eq!(balance(&manager, u2, "EUR"), Some(1));

    cleanup_test_db(&temp_path);
}
