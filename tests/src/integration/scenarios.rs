//! # Market Day
//!
//! One trading day across the account ledger, the offer book, trade
//! settlement and the query layer.

#[cfg(test)]
mod tests {
    use etn_ledger::{
        EnergyLedgerApi, EnergyStatus, InMemoryWorldState, LedgerConfig, LedgerRequest,
        OfferDirection, OfferStatus,
    };
    use etn_node::LedgerNode;
    use serde_json::Value;

    fn exec_ok(node: &mut LedgerNode<InMemoryWorldState>, request: LedgerRequest) -> Value {
        let out = node.exec(request);
        assert_eq!(out["ok"], true, "{out}");
        out["result"]["value"].clone()
    }

    fn offer(id: &str, account: &str, direction: OfferDirection, amount: f64) -> LedgerRequest {
        LedgerRequest::PlaceOffer {
            offer_id: id.to_string(),
            account_id: account.to_string(),
            direction,
            energy_amount: amount,
            price_per_kwh: 2.0,
        }
    }

    fn set_offer_status(id: &str, status: &str) -> LedgerRequest {
        LedgerRequest::UpdateOfferStatus {
            offer_id: id.to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_market_day() {
        let mut node = LedgerNode::new(
            InMemoryWorldState::new(),
            LedgerConfig::default().with_token_symbol("KWC"),
        );
        exec_ok(&mut node, LedgerRequest::InitLedger);

        // Morning: Factory04 runs short, Factory01 has spare output.
        let status = node.ledger().energy_status("Factory04").unwrap();
        assert_eq!(status.status, EnergyStatus::Deficit);
        assert_eq!(status.difference, -650.0);
        assert_eq!(
            node.ledger().energy_status("Factory01").unwrap().status,
            EnergyStatus::Surplus
        );

        exec_ok(&mut node, offer("O-buy", "Factory04", OfferDirection::Buy, 100.0));
        exec_ok(&mut node, offer("O-sell", "Factory01", OfferDirection::Sell, 150.0));
        exec_ok(&mut node, offer("O-spare", "Factory05", OfferDirection::Sell, 40.0));
        assert_eq!(node.ledger().list_active_offers().unwrap().len(), 3);

        // Matched off-ledger; settled as a trade.
        exec_ok(
            &mut node,
            LedgerRequest::CreateTrade {
                trade_id: "T-0800".into(),
                seller_id: "Factory01".into(),
                buyer_id: "Factory04".into(),
                amount: 100.0,
                price_per_unit: 2.0,
            },
        );
        let trade = exec_ok(
            &mut node,
            LedgerRequest::SettleTrade {
                trade_id: "T-0800".into(),
            },
        );
        assert_eq!(trade["status"], "completed");

        exec_ok(&mut node, set_offer_status("O-buy", "completed"));
        exec_ok(&mut node, set_offer_status("O-spare", "cancelled"));
        let rejected = node.exec(set_offer_status("O-sell", "expired"));
        assert_eq!(rejected["error"]["kind"], "InvalidArgument");

        let active = node.ledger().list_active_offers().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "O-sell");

        let closed = node.ledger().get_offer("O-buy").unwrap();
        assert_eq!(closed.status, OfferStatus::Completed);
        assert!(closed.updated_at >= closed.created_at);

        // Afternoon: meter readings and the delivered energy come in.
        exec_ok(
            &mut node,
            LedgerRequest::UpdateAvailableEnergy {
                account_id: "Factory04".into(),
                value: 350.0,
            },
        );
        exec_ok(
            &mut node,
            LedgerRequest::UpdateTelemetry {
                account_id: "Factory01".into(),
                current_generation: 120.5,
                current_consumption: 80.25,
            },
        );

        let factory01 = node.ledger().get_account("Factory01").unwrap();
        assert_eq!(factory01.current_generation, Some(120.5));
        assert_eq!(factory01.current_consumption, Some(80.25));
        assert_eq!(factory01.currency_balance, 1200.0);

        // Factory04 history: genesis, settlement, meter update.
        let history = node.ledger().account_history("Factory04").unwrap();
        let snapshots: Vec<(f64, f64, f64)> = history
            .iter()
            .filter_map(|h| h.account.as_ref())
            .map(|a| (a.energy_balance, a.currency_balance, a.available_energy))
            .collect();
        assert_eq!(
            snapshots,
            vec![(300.0, 300.0, 250.0), (400.0, 100.0, 250.0), (400.0, 100.0, 350.0)]
        );

        let report = node.status_report("Factory04").unwrap();
        assert!(report.contains("100.00 KWC"));
        assert!(report.contains("deficit (-550.00 kWh)"));
        assert_eq!(
            node.supply_report().unwrap(),
            "5 accounts, 3200.00 kWh energy, 3200.00 KWC currency"
        );
    }

    #[test]
    fn test_read_only_invocations_do_not_touch_history() {
        let mut node = LedgerNode::new(InMemoryWorldState::new(), LedgerConfig::default());
        exec_ok(&mut node, LedgerRequest::InitLedger);
        let version = node.ledger().state().last_version();

        for request in [
            LedgerRequest::ListAccounts,
            LedgerRequest::TotalSupply,
            LedgerRequest::EnergyStatus {
                account_id: "Factory02".into(),
            },
            LedgerRequest::AccountExists {
                account_id: "Factory09".into(),
            },
        ] {
            assert!(!request.is_mutating());
            exec_ok(&mut node, request);
        }

        assert_eq!(node.ledger().state().last_version(), version);
        assert_eq!(node.ledger().account_history("Factory02").unwrap().len(), 1);
    }
}
