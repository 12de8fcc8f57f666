//! Paper Trading Ledger Simulation.
//!
//! Demonstrates the full ledger lifecycle including account sign-up, margin
//! reservation, limit order parking, settlement into realized trades, and
//! leaderboard ranking.

use paper_ledger::*;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Paper Trading Ledger Simulation");
    println!("Simulated Balances, Caller-Supplied Prices, Full Lifecycle");
    println!("Markets: {}\n", Symbol::ALL.map(|s| s.ticker()).join(", "));

    scenario_1_account_lifecycle();
    scenario_2_position_round_trip();
    scenario_3_limit_orders();
    scenario_4_leaderboard_and_badges();
    scenario_5_export_and_snapshot();

    println!("\nAll simulations completed successfully.");
}

/// Sign-up, login, deposits and withdrawals.
fn scenario_1_account_lifecycle() {
    println!("Scenario 1: Account Lifecycle\n");

    let mut ledger = Ledger::new(LedgerConfig::default());
    ledger.set_time(Timestamp::now());

    let alice = ledger.sign_up("alice", "hunter2", None).unwrap();
    println!("  Alice signs up, account number {}", alice.account_number);
    println!("  Starting balance: ${}", alice.balance.value());
    println!("  Referral code: {}", alice.referral_code);

    let logged_in = ledger.login("ALICE", "hunter2").unwrap();
    println!("  Login succeeds case-insensitively as {}", logged_in.username);

    let after_deposit = ledger.deposit(alice.id, Quote::new(dec!(2500))).unwrap();
    println!("  Deposit $2,500 -> balance ${}", after_deposit.balance.value());

    let after_withdraw = ledger.withdraw(alice.id, Quote::new(dec!(500))).unwrap();
    println!("  Withdraw $500 -> balance ${}", after_withdraw.balance.value());

    let rejected = ledger.withdraw(alice.id, Quote::new(dec!(1000000)));
    println!("  Oversized withdrawal rejected: {}\n", rejected.unwrap_err());
}

/// Open a leveraged position and settle it at a profit.
fn scenario_2_position_round_trip() {
    println!("Scenario 2: Position Round Trip\n");

    let mut ledger = Ledger::new(LedgerConfig::default());
    let trader = ledger.sign_up("trader", "pw", None).unwrap();

    let position = ledger
        .open_position(
            trader.id,
            OpenPositionParams {
                symbol: Symbol::BtcUsdt,
                side: Side::Long,
                entry_price: Price::new_unchecked(dec!(50000)),
                size: Quote::new(dec!(2000)),
                leverage: Leverage::new(10).unwrap(),
                margin_mode: MarginMode::Isolated,
                take_profit: Some(Price::new_unchecked(dec!(55000))),
                stop_loss: Some(Price::new_unchecked(dec!(47000))),
            },
        )
        .unwrap();

    println!("  Long $2,000 BTCUSDT @ $50,000 with 10x leverage");
    println!("  Margin reserved: ${}", position.margin.value());
    println!("  Liquidation price: ${}", position.liquidation_price.value());
    println!(
        "  Balance after open: ${}",
        ledger.account(trader.id).unwrap().balance.value()
    );

    let mut feed = StaticPriceFeed::new();
    feed.set_quote(MarketQuote {
        symbol: Symbol::BtcUsdt,
        price: Price::new_unchecked(dec!(52000)),
        high_24h: Price::new_unchecked(dec!(52400)),
        low_24h: Price::new_unchecked(dec!(49100)),
        volume_24h: dec!(1_250_000_000),
        change_24h_percent: dec!(4.0),
        updated_at: ledger.time(),
    });
    let unrealized = ledger.unrealized_pnl(trader.id, &feed);
    println!("  Mark at $52,000 -> unrealized pnl ${}", unrealized.value());
    println!(
        "  Return on margin: {}%",
        position.roi_percent(Price::new_unchecked(dec!(52000)))
    );

    let trade = ledger
        .close_position(trader.id, position.id, Price::new_unchecked(dec!(52000)))
        .unwrap();
    println!("  Closed @ $52,000 -> realized pnl ${}", trade.pnl.value());

    let account = ledger.account(trader.id).unwrap();
    println!("  Balance after close: ${}", account.balance.value());
    println!(
        "  Trades: {}, win rate: {}%\n",
        account.trades_count, account.win_rate
    );
}

/// Limit orders reserve margin until canceled. No fill engine exists.
fn scenario_3_limit_orders() {
    println!("Scenario 3: Limit Orders\n");

    let mut ledger = Ledger::new(LedgerConfig::default());
    let trader = ledger.sign_up("maker", "pw", None).unwrap();

    let order = ledger
        .place_limit_order(
            trader.id,
            PlaceOrderParams {
                symbol: Symbol::EthUsdt,
                side: Side::Short,
                limit_price: Price::new_unchecked(dec!(3200)),
                size: Quote::new(dec!(1500)),
                leverage: Leverage::new(5).unwrap(),
                margin_mode: MarginMode::Cross,
                take_profit: None,
                stop_loss: None,
            },
        )
        .unwrap();

    println!("  Short limit $1,500 ETHUSDT @ $3,200 with 5x leverage");
    println!("  Margin reserved: ${}", order.margin().value());
    println!(
        "  Balance while pending: ${}",
        ledger.account(trader.id).unwrap().balance.value()
    );

    ledger.cancel_limit_order(trader.id, order.id).unwrap();
    println!(
        "  Canceled -> balance restored to ${}",
        ledger.account(trader.id).unwrap().balance.value()
    );

    let double_cancel = ledger.cancel_limit_order(trader.id, order.id);
    println!("  Second cancel rejected: {}\n", double_cancel.unwrap_err());
}

/// Several traders with different outcomes, ranked by realized pnl.
fn scenario_4_leaderboard_and_badges() {
    println!("Scenario 4: Leaderboard\n");

    let mut ledger = Ledger::new(LedgerConfig::default());

    // exit prices chosen so realized pnl spans the badge tiers
    let runs = [
        ("whale", dec!(56000)),
        ("steady", dec!(51000)),
        ("drawdown", dec!(48000)),
    ];

    for (name, exit) in runs {
        let account = ledger.sign_up(name, "pw", None).unwrap();
        ledger.deposit(account.id, Quote::new(dec!(90000))).unwrap();
        let position = ledger
            .open_position(
                account.id,
                OpenPositionParams {
                    symbol: Symbol::BtcUsdt,
                    side: Side::Long,
                    entry_price: Price::new_unchecked(dec!(50000)),
                    size: Quote::new(dec!(50000)),
                    leverage: Leverage::new(10).unwrap(),
                    margin_mode: MarginMode::Isolated,
                    take_profit: None,
                    stop_loss: None,
                },
            )
            .unwrap();
        ledger
            .close_position(account.id, position.id, Price::new_unchecked(exit))
            .unwrap();
    }

    for entry in ledger.leaderboard() {
        println!(
            "  #{} {} pnl ${} win rate {}% badge {:?}",
            entry.rank,
            entry.username,
            entry.total_pnl.value(),
            entry.win_rate,
            entry.badge
        );
    }
    println!();
}

/// CSV export and snapshot persistence.
fn scenario_5_export_and_snapshot() {
    println!("Scenario 5: Export and Snapshot\n");

    let mut ledger = Ledger::new(LedgerConfig::demo());
    let store = JsonFileStore::new(std::env::temp_dir().join("paper-ledger-sim.json"));
    let snapshot_path = store.path().to_path_buf();
    ledger.attach_store(Box::new(store));

    let trader = ledger.sign_up("exporter", "pw", None).unwrap();
    for exit in [dec!(51000), dec!(49500)] {
        let position = ledger
            .open_position(
                trader.id,
                OpenPositionParams {
                    symbol: Symbol::SolUsdt,
                    side: Side::Long,
                    entry_price: Price::new_unchecked(dec!(50000)),
                    size: Quote::new(dec!(1000)),
                    leverage: Leverage::new(10).unwrap(),
                    margin_mode: MarginMode::Isolated,
                    take_profit: None,
                    stop_loss: None,
                },
            )
            .unwrap();
        ledger.advance_time(60_000);
        ledger
            .close_position(trader.id, position.id, Price::new_unchecked(exit))
            .unwrap();
    }

    let csv = ledger.export_trades_csv(trader.id).unwrap();
    println!("  Exported trade history:");
    for line in csv.lines() {
        println!("    {line}");
    }

    println!("\n  Snapshot written to {}", snapshot_path.display());
    println!("  Events recorded: {}", ledger.events().len());
}
