//! Token ledger usage example
//!
//! Run with `RUST_LOG=token_ledger=debug` to see the ledger's own logging.

use token_ledger::utils::MemoryStorage;
use token_ledger::{Address, Ledger, LedgerConfig, LedgerEvent, SharedLedger};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("🪙 Token Ledger - Basic Example\n");

    let creator: Address = "0xf3eecd4b52ef54c15edf2d5ed525a2d200701041".parse()?;
    let alice: Address = "0xa11c8d9dc9b66e209ef60f0c8d969d3cd988782c".parse()?;
    let exchange: Address = "0xed24fc36d5ee211ea25a80239fb8c4cfd80f12ee".parse()?;

    // 1. Create the ledger
    println!("📊 Creating ledger...");
    let config = LedgerConfig::from_json_str(&format!(
        r#"{{
            "name": "Sample Token",
            "symbol": "SMPL",
            "decimals": 18,
            "initial_supply_units": 1000000,
            "creator": "{}"
        }}"#,
        creator
    ))?;
    let mut ledger = Ledger::from_config(MemoryStorage::new(), &config).await?;

    let info = ledger.token_info();
    println!(
        "  ✓ {} ({}) with {} decimals, total supply {} raw units",
        info.name, info.symbol, info.decimals, info.total_supply
    );
    println!("  ✓ Minted to {}", creator.to_checksum());
    println!();

    // 2. Direct transfer
    println!("💸 Transferring 1,250.5 {} to Alice...", ledger.symbol());
    let amount = ledger.parse_amount("1250.5")?;
    ledger.transfer(creator, alice, amount).await?;
    println!(
        "  Creator: {} {}",
        ledger.balance_of_formatted(&creator).await?,
        ledger.symbol()
    );
    println!(
        "  Alice:   {} {}",
        ledger.balance_of_formatted(&alice).await?,
        ledger.symbol()
    );
    println!();

    // 3. Delegated transfer
    println!("🤝 Alice approves the exchange for 500 {}...", ledger.symbol());
    let allowance = ledger.parse_amount("500")?;
    ledger.approve(alice, exchange, allowance).await?;

    let spend = ledger.parse_amount("200")?;
    ledger.transfer_from(exchange, alice, creator, spend).await?;
    println!(
        "  Exchange moved 200 {}, remaining allowance: {} raw units",
        ledger.symbol(),
        ledger.allowance(&alice, &exchange).await?
    );

    match ledger
        .transfer_from(exchange, alice, creator, allowance)
        .await
    {
        Ok(()) => println!("  ❌ Overspend unexpectedly succeeded"),
        Err(e) => println!("  ✓ Overspend rejected: {}", e),
    }
    println!();

    // 4. Event history
    println!("📜 Event history:");
    for record in ledger.events().await? {
        match record.event {
            LedgerEvent::Transfer { from, to, amount } => {
                println!("  #{} Transfer {} -> {}: {}", record.sequence, from, to, amount)
            }
            LedgerEvent::Approval {
                owner,
                spender,
                amount,
            } => println!(
                "  #{} Approval {} -> {}: {}",
                record.sequence, owner, spender, amount
            ),
        }
    }
    println!();

    // 5. Share the ledger between tasks
    println!("🔀 Running parallel transfers...");
    let shared = SharedLedger::new(ledger);
    let one = shared.with_ledger(|l| l.parse_amount("1")).await?;
    let mut handles = Vec::new();
    for _ in 0..10 {
        let shared = shared.clone();
        handles.push(tokio::spawn(async move {
            shared.transfer(creator, alice, one).await
        }));
    }
    for handle in handles {
        handle.await??;
    }
    println!(
        "  Alice now holds {} raw units",
        shared.balance_of(&alice).await?
    );

    // 6. Validate ledger integrity
    println!("\n🔍 Validating Ledger Integrity...");
    let report = shared.validate_integrity().await?;
    if report.is_valid {
        println!("  ✅ Ledger integrity check passed!");
    } else {
        println!("  ❌ Ledger integrity check failed:");
        for issue in &report.issues {
            println!("    - {}", issue);
        }
    }

    println!("\n🎉 Example completed successfully!");
    Ok(())
}
