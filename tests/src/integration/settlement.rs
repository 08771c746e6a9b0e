//! # Settlement Flows
//!
//! Trade lifecycle driven by JSON invocation streams, the way a node replays
//! an ordered log.

#[cfg(test)]
mod tests {
    use etn_ledger::{EnergyLedgerApi, InMemoryWorldState, LedgerConfig, TradeStatus};
    use etn_node::{LedgerNode, ReplaySummary};
    use serde_json::Value;

    fn replay(node: &mut LedgerNode<InMemoryWorldState>, script: &str) -> (ReplaySummary, Vec<Value>) {
        let mut output = Vec::new();
        let summary = node.replay(script.as_bytes(), &mut output).unwrap();
        let results = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        (summary, results)
    }

    fn seeded_node() -> LedgerNode<InMemoryWorldState> {
        let mut node = LedgerNode::new(InMemoryWorldState::new(), LedgerConfig::default());
        let (summary, _) = replay(&mut node, r#"{"function":"InitLedger"}"#);
        assert_eq!(summary.succeeded, 1);
        node
    }

    #[test]
    fn test_trade_lifecycle_stream() {
        let mut node = seeded_node();
        let script = r#"
{"function":"CreateTrade","args":{"tradeId":"T1","sellerId":"Factory01","buyerId":"Factory03","amount":100,"pricePerUnit":2.5}}
{"function":"GetTrade","args":{"tradeId":"T1"}}
{"function":"SettleTrade","args":{"tradeId":"T1"}}
{"function":"SettleTrade","args":{"tradeId":"T1"}}
{"function":"SettleTrade","args":{"tradeId":"T404"}}
{"function":"ListTradesForAccount","args":{"accountId":"Factory03"}}
"#;
        let (summary, results) = replay(&mut node, script);
        assert_eq!(summary, ReplaySummary { succeeded: 4, failed: 2 });

        assert_eq!(results[0]["result"]["value"]["status"], "pending");
        assert_eq!(results[0]["result"]["value"]["totalPrice"], 250.0);
        assert_eq!(results[1]["result"]["value"]["tradeId"], "T1");
        assert_eq!(results[2]["result"]["value"]["status"], "completed");
        assert_eq!(results[3]["error"]["kind"], "AlreadyCompleted");
        assert_eq!(results[4]["error"]["kind"], "NotFound");
        assert_eq!(results[5]["result"]["value"].as_array().unwrap().len(), 1);

        let ledger = node.ledger();
        assert_eq!(ledger.energy_balance("Factory01").unwrap(), 900.0);
        assert_eq!(ledger.currency_balance("Factory01").unwrap(), 1250.0);
        assert_eq!(ledger.energy_balance("Factory03").unwrap(), 600.0);
        assert_eq!(ledger.currency_balance("Factory03").unwrap(), 250.0);
    }

    #[test]
    fn test_seller_drained_after_creation() {
        let mut node = seeded_node();
        let script = r#"
{"function":"CreateTrade","args":{"tradeId":"T1","sellerId":"Factory04","buyerId":"Factory01","amount":250,"pricePerUnit":1}}
{"function":"Transfer","args":{"fromId":"Factory04","toId":"Factory05","amount":100}}
{"function":"SettleTrade","args":{"tradeId":"T1"}}
"#;
        let (summary, results) = replay(&mut node, script);
        assert_eq!(summary, ReplaySummary { succeeded: 2, failed: 1 });
        assert_eq!(results[2]["error"]["kind"], "InsufficientBalance");

        let ledger = node.ledger();
        assert_eq!(ledger.get_trade("T1").unwrap().status, TradeStatus::Pending);
        assert_eq!(ledger.energy_balance("Factory04").unwrap(), 200.0);
        assert_eq!(ledger.currency_balance("Factory01").unwrap(), 1000.0);
    }

    #[test]
    fn test_invalid_trades_are_not_recorded() {
        let mut node = seeded_node();
        let script = r#"
{"function":"CreateTrade","args":{"tradeId":"T1","sellerId":"Factory01","buyerId":"Factory01","amount":10,"pricePerUnit":1}}
{"function":"CreateTrade","args":{"tradeId":"T2","sellerId":"Factory01","buyerId":"Factory02","amount":-5,"pricePerUnit":1}}
{"function":"CreateTrade","args":{"tradeId":"T3","sellerId":"Factory01","buyerId":"Factory99","amount":10,"pricePerUnit":1}}
{"function":"CreateTrade","args":{"tradeId":"T4","sellerId":"Factory04","buyerId":"Factory01","amount":301,"pricePerUnit":1}}
{"function":"CreateTrade","args":{"tradeId":"T5","sellerId":"Factory01","buyerId":"Factory02","amount":10}}
{"function":"ListTrades"}
"#;
        let (summary, results) = replay(&mut node, script);
        assert_eq!(summary, ReplaySummary { succeeded: 1, failed: 5 });

        let kinds: Vec<&str> = results[..5]
            .iter()
            .map(|r| r["error"]["kind"].as_str().unwrap_or_default())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "InvalidArgument",
                "InvalidArgument",
                "NotFound",
                "InsufficientBalance",
                "InvalidArgument",
            ]
        );
        assert!(results[5]["result"]["value"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_free_trade_moves_energy_only() {
        let mut node = seeded_node();
        let script = r#"
{"function":"CreateTrade","args":{"tradeId":"GIFT","sellerId":"Factory02","buyerId":"Factory04","amount":75,"pricePerUnit":0}}
{"function":"SettleTrade","args":{"tradeId":"GIFT"}}
"#;
        let (summary, _) = replay(&mut node, script);
        assert_eq!(summary.failed, 0);

        let ledger = node.ledger();
        assert_eq!(ledger.energy_balance("Factory04").unwrap(), 375.0);
        assert_eq!(ledger.currency_balance("Factory04").unwrap(), 300.0);
        assert_eq!(ledger.currency_balance("Factory02").unwrap(), 800.0);
    }
}
