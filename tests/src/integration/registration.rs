//! # Registration Flows
//!
//! Identity registration through JSON invocations, the email and fiscal-id
//! indices, and rejected registrations leaving no partial records.

#[cfg(test)]
mod tests {
    use etn_ledger::{
        EnergyLedgerApi, ErrorKind, IdentityRegistration, InMemoryWorldState, LedgerConfig,
        LedgerRequest,
    };
    use etn_node::LedgerNode;
    use serde_json::{json, Value};

    fn identity(id: &str, email: &str, fiscal_id: &str) -> IdentityRegistration {
        IdentityRegistration {
            id: id.to_string(),
            name: format!("{id} Works"),
            email: email.to_string(),
            credential_hash: "c2FsdGVkLWhhc2g=".to_string(),
            location: "North Industrial Park".to_string(),
            fiscal_id: fiscal_id.to_string(),
            energy_capacity: 1500.0,
            contact_info: "+1-555-0100".to_string(),
            energy_type: "solar".to_string(),
            initial_energy: 250.0,
            initial_currency: 400.0,
        }
    }

    fn seeded_node() -> LedgerNode<InMemoryWorldState> {
        let mut node = LedgerNode::new(InMemoryWorldState::new(), LedgerConfig::default());
        assert_eq!(node.exec(LedgerRequest::InitLedger)["ok"], true);
        node
    }

    fn error_kind(envelope: &Value) -> Value {
        assert_eq!(envelope["ok"], false, "expected failure: {envelope}");
        envelope["error"]["kind"].clone()
    }

    #[test]
    fn test_identity_registration_over_json() {
        let mut node = seeded_node();

        let request = json!({
            "function": "RegisterAccountWithIdentity",
            "args": {
                "id": "Plant-A",
                "name": "Plant A",
                "email": "ops@plant-a.example",
                "credentialHash": "c2FsdGVkLWhhc2g=",
                "location": "Harbor District",
                "fiscalId": "FR-001",
                "energyCapacity": 2000,
                "contactInfo": "ops desk",
                "energyType": "wind",
                "initialEnergy": 120,
                "initialCurrency": 90
            }
        });
        let out = node.exec_line(&request.to_string());
        assert_eq!(out["ok"], true, "{out}");
        assert_eq!(out["result"]["type"], "account");
        assert_eq!(out["result"]["value"]["email"], "ops@plant-a.example");
        assert_eq!(out["result"]["value"]["availableEnergy"], 120.0);
        assert_eq!(out["result"]["value"]["dailyConsumption"], 0.0);

        let by_email = node.exec_line(
            r#"{"function":"GetAccountByEmail","args":{"email":"ops@plant-a.example"}}"#,
        );
        assert_eq!(by_email["result"]["value"]["id"], "Plant-A");
        assert_eq!(by_email["result"]["value"]["fiscalId"], "FR-001");

        let accounts = node.exec(LedgerRequest::ListAccounts);
        let ids: Vec<&str> = accounts["result"]["value"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap())
            .collect();
        assert_eq!(
            ids,
            vec!["Factory01", "Factory02", "Factory03", "Factory04", "Factory05", "Plant-A"]
        );
    }

    #[test]
    fn test_rejected_registration_leaves_nothing_behind() {
        let mut node = seeded_node();
        node.exec(LedgerRequest::RegisterAccountWithIdentity(identity(
            "Plant-A",
            "a@example.com",
            "FR-001",
        )));

        // Email clash: no account, no fiscal-id claim.
        let clash = node.exec(LedgerRequest::RegisterAccountWithIdentity(identity(
            "Plant-B",
            "a@example.com",
            "FR-002",
        )));
        assert_eq!(error_kind(&clash), "AlreadyExists");
        assert!(!node.ledger().account_exists("Plant-B").unwrap());

        // FR-002 is still free.
        let ok = node.exec(LedgerRequest::RegisterAccountWithIdentity(identity(
            "Plant-B",
            "b@example.com",
            "FR-002",
        )));
        assert_eq!(ok["ok"], true, "{ok}");

        // Fiscal-id clash leaves c@example.com unclaimed.
        let clash = node.exec(LedgerRequest::RegisterAccountWithIdentity(identity(
            "Plant-C",
            "c@example.com",
            "FR-001",
        )));
        assert_eq!(error_kind(&clash), "AlreadyExists");
        let lookup = node.exec(LedgerRequest::GetAccountByEmail {
            email: "c@example.com".into(),
        });
        assert_eq!(error_kind(&lookup), "NotFound");

        let supply = node.ledger().total_supply().unwrap();
        assert_eq!(supply.accounts, 7);
        assert_eq!(supply.energy, 3200.0 + 2.0 * 250.0);
    }

    #[test]
    fn test_identity_account_trades_like_any_other() {
        let mut node = seeded_node();
        node.exec(LedgerRequest::RegisterAccountWithIdentity(identity(
            "Plant-A",
            "a@example.com",
            "FR-001",
        )));

        let trade = node.exec_line(
            r#"{"function":"CreateTrade","args":{"tradeId":"T-A1","sellerId":"Plant-A","buyerId":"Factory02","amount":50,"pricePerUnit":3}}"#,
        );
        assert_eq!(trade["ok"], true, "{trade}");
        let settled = node.exec_line(r#"{"function":"SettleTrade","args":{"tradeId":"T-A1"}}"#);
        assert_eq!(settled["result"]["value"]["status"], "completed");

        let ledger = node.ledger();
        let plant = ledger.get_account_by_email("a@example.com").unwrap();
        assert_eq!(plant.energy_balance, 200.0);
        assert_eq!(plant.currency_balance, 550.0);
        assert_eq!(ledger.energy_balance("Factory02").unwrap(), 850.0);
    }

    #[test]
    fn test_lookup_errors_map_to_kinds() {
        let node = seeded_node();
        let err = node.ledger().get_account_by_email("nobody@example.com").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
