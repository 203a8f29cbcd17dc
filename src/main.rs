//! Orderbook Reserve - Binary Entry Point
//!
//! Walks a small maker/taker session against a fresh reserve and prints
//! the book, the quotes and the trade receipt. Set `RUST_LOG=debug` (or
//! `trace`) to see the engine's own log lines.

use std::error::Error;

use orderbook_reserve::types::amount::{from_units, rate_to_decimal, to_units};
use orderbook_reserve::{Direction, FundKind, OrderbookReserve, Qty, ReserveConfig};
use tracing_subscriber::EnvFilter;

/// Account the router credits with taker proceeds
const TAKER: u64 = 1_000;

fn units(s: &str, decimals: u32) -> Result<Qty, Box<dyn Error>> {
    to_units(s, decimals).ok_or_else(|| format!("invalid amount {s:?}").into())
}

fn show(raw: Qty, decimals: u32) -> String {
    from_units(raw, decimals).unwrap_or_else(|| raw.to_string())
}

fn show_rate(rate: u128) -> String {
    rate_to_decimal(rate).map_or_else(|| rate.to_string(), |d| d.to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("===========================================");
    println!("  Orderbook Reserve");
    println!("===========================================");
    println!();

    let config = ReserveConfig::default();
    let token_decimals = config.token_decimals;
    let mut reserve = OrderbookReserve::new(config)?;

    let eth = |s: &str| units(s, 18);
    let tok = |s: &str| units(s, token_decimals);

    // Two makers fund their accounts
    for maker in [1, 2] {
        reserve.deposit_ether(maker, eth("20")?)?;
        reserve.deposit_token(maker, tok("10000")?)?;
        reserve.deposit_stake(maker, eth("500")?)?;
    }

    // Token -> ETH orders at 250 and 240 tokens per ETH
    reserve.submit_order(1, Direction::TokenToEth, tok("1000")?, eth("4")?, None)?;
    reserve.submit_order(2, Direction::TokenToEth, tok("960")?, eth("4")?, None)?;
    // ETH -> token order at 200 tokens per ETH
    reserve.submit_order(1, Direction::EthToToken, eth("3")?, tok("600")?, None)?;

    println!("Order book:");
    for direction in Direction::ALL {
        let (src_decimals, dst_decimals) = match direction {
            Direction::EthToToken => (18, token_decimals),
            Direction::TokenToEth => (token_decimals, 18),
        };
        println!("  {:?}", direction);
        for order in reserve.list(direction).iter() {
            println!(
                "    #{:<4} maker {:<3} gives {:>10} wants {:>10}",
                order.id,
                order.maker,
                show(order.src_qty, src_decimals),
                show(order.dst_qty, dst_decimals)
            );
        }
    }
    println!();

    println!("Quotes (ETH -> token):");
    for size in ["1", "4", "6", "9"] {
        let rate = reserve.get_conversion_rate(FundKind::Ether, FundKind::Token, eth(size)?);
        println!("  {:>3} ETH -> rate {}", size, show_rate(rate));
    }
    println!();

    let qty = eth("6")?;
    let min_rate = reserve.get_conversion_rate(FundKind::Ether, FundKind::Token, qty);
    let receipt = reserve.trade(FundKind::Ether, qty, FundKind::Token, TAKER, min_rate)?;

    println!("Trade #{}:", receipt.trade_id);
    println!("  Paid:       {} ETH", show(receipt.src_qty, 18));
    println!("  Received:   {} tokens", show(receipt.dst_amount, token_decimals));
    println!("  Rate:       {}", show_rate(receipt.rate));
    println!("  Burned:     {} stake", show(receipt.burned, 18));
    println!("  Orders:     {} taken, {} removed", receipt.orders_taken(), receipt.orders_removed());
    println!("  State root: {}", receipt.state_root_hex());
    println!();

    println!("Makers:");
    for maker in [1, 2] {
        if let Some(funds) = reserve.maker_funds(maker) {
            println!(
                "  {}: ether {} token {} stake {} (unlocked {}) locked notional {}",
                maker,
                show(funds.ether, 18),
                show(funds.token, token_decimals),
                show(funds.stake, 18),
                show(reserve.maker_unlocked_knc(maker), 18),
                show(funds.total_notional_locked, 18)
            );
        }
    }

    Ok(())
}
