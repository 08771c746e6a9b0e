//! # Conservation Runs
//!
//! Seeded random sequences of transfers, trades, mints and field updates.
//! After every invocation, committed or rejected:
//!
//! - total energy equals genesis energy plus everything minted
//! - total currency equals genesis currency
//! - no balance is negative
//!
//! Amounts are whole numbers so totals compare exactly.

#[cfg(test)]
mod tests {
    use etn_ledger::{
        EnergyLedgerApi, InMemoryWorldState, LedgerConfig, LedgerService, SupplyTotals,
        SystemTimeSource, TradeStatus,
    };
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const FACTORIES: [&str; 5] = ["Factory01", "Factory02", "Factory03", "Factory04", "Factory05"];
    const GENESIS_ENERGY: f64 = 3200.0;
    const GENESIS_CURRENCY: f64 = 3200.0;

    #[derive(Debug, Default)]
    struct RunStats {
        committed: usize,
        rejected: usize,
        settled: usize,
        minted: f64,
    }

    fn seeded_ledger() -> LedgerService<InMemoryWorldState, SystemTimeSource> {
        let mut ledger = LedgerService::in_memory(LedgerConfig::default());
        assert_eq!(ledger.init_ledger().unwrap(), 5);
        ledger
    }

    fn pick(rng: &mut StdRng) -> &'static str {
        FACTORIES[rng.gen_range(0..FACTORIES.len())]
    }

    fn assert_invariants<A: EnergyLedgerApi>(ledger: &A, minted: f64, step: usize) -> SupplyTotals {
        let supply = ledger.total_supply().unwrap();
        assert_eq!(supply.energy, GENESIS_ENERGY + minted, "energy drift at step {step}");
        assert_eq!(supply.currency, GENESIS_CURRENCY, "currency drift at step {step}");

        for account in ledger.list_accounts().unwrap() {
            assert!(account.energy_balance >= 0.0, "{} energy < 0 at step {step}", account.id);
            assert!(account.currency_balance >= 0.0, "{} currency < 0 at step {step}", account.id);
        }
        supply
    }

    fn run<A: EnergyLedgerApi>(ledger: &mut A, seed: u64, steps: usize) -> RunStats {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut stats = RunStats::default();

        for step in 0..steps {
            let before = ledger.total_supply().unwrap();
            let mut mint_amount = None;

            let outcome = match rng.gen_range(0..4) {
                0 => {
                    let (from, to) = (pick(&mut rng), pick(&mut rng));
                    let amount = rng.gen_range(1..=400) as f64;
                    ledger.transfer(from, to, amount)
                }
                1 => {
                    let trade_id = format!("T{step}");
                    let (seller, buyer) = (pick(&mut rng), pick(&mut rng));
                    let amount = rng.gen_range(1..=300) as f64;
                    let price = rng.gen_range(0..=5) as f64;
                    ledger
                        .create_trade(&trade_id, seller, buyer, amount, price)
                        .and_then(|_| ledger.settle_trade(&trade_id))
                        .map(|trade| {
                            assert_eq!(trade.status, TradeStatus::Completed);
                            stats.settled += 1;
                        })
                }
                2 => {
                    let amount = rng.gen_range(1..=50) as f64;
                    mint_amount = Some(amount);
                    ledger.mint(pick(&mut rng), amount).map(|_| ())
                }
                _ => {
                    let value = rng.gen_range(0..=1500) as f64;
                    ledger.update_available_energy(pick(&mut rng), value).map(|_| ())
                }
            };

            match outcome {
                Ok(()) => {
                    stats.committed += 1;
                    stats.minted += mint_amount.unwrap_or(0.0);
                }
                Err(_) => {
                    stats.rejected += 1;
                    let after = ledger.total_supply().unwrap();
                    assert_eq!(before, after, "rejected invocation changed supply at step {step}");
                }
            }

            assert_invariants(&*ledger, stats.minted, step);
        }

        stats
    }

    #[test]
    fn test_random_operations_conserve_supply() {
        let mut ledger = seeded_ledger();
        let stats = run(&mut ledger, 0x00E7_1ED6, 500);

        assert_eq!(stats.committed + stats.rejected, 500);
        assert!(stats.settled > 0);
        assert!(stats.rejected > 0);
    }

    #[test]
    fn test_same_seed_same_balances() {
        let mut first = seeded_ledger();
        let mut second = seeded_ledger();
        run(&mut first, 42, 200);
        run(&mut second, 42, 200);

        let balances = |ledger: &LedgerService<InMemoryWorldState, SystemTimeSource>| -> Vec<(String, f64, f64)> {
            ledger
                .list_accounts()
                .unwrap()
                .into_iter()
                .map(|a| (a.id, a.energy_balance, a.currency_balance))
                .collect()
        };
        assert_eq!(balances(&first), balances(&second));
    }

    #[test]
    fn test_failed_settlement_leaves_trade_pending() {
        let mut ledger = seeded_ledger();

        // Factory04 holds 300 currency; 200 kWh at 2.0 costs 400.
        ledger
            .create_trade("T-short", "Factory01", "Factory04", 200.0, 2.0)
            .unwrap();
        let supply = ledger.total_supply().unwrap();

        assert!(ledger.settle_trade("T-short").is_err());
        assert_eq!(ledger.get_trade("T-short").unwrap().status, TradeStatus::Pending);
        assert_eq!(ledger.total_supply().unwrap(), supply);
        assert_eq!(ledger.energy_balance("Factory01").unwrap(), 1000.0);
        assert_eq!(ledger.energy_balance("Factory04").unwrap(), 300.0);

        // Topping the buyer up makes the same trade settle.
        ledger.transfer("Factory05", "Factory04", 10.0).unwrap();
        ledger.create_trade("T-fund", "Factory04", "Factory05", 10.0, 10.0).unwrap();
        ledger.settle_trade("T-fund").unwrap();
        assert_eq!(ledger.currency_balance("Factory04").unwrap(), 400.0);

        let trade = ledger.settle_trade("T-short").unwrap();
        assert_eq!(trade.status, TradeStatus::Completed);
        assert_eq!(ledger.currency_balance("Factory04").unwrap(), 0.0);
        assert_eq!(ledger.energy_balance("Factory04").unwrap(), 500.0);
    }
}
