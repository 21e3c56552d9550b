//! Integration tests for wire formats
//!
//! Decodes representative API payloads through the response envelope and
//! checks that request payloads only carry what the caller set.

use accountstack_domain::{
    Account, ApiResponse, Insight, InsightFilters, Transaction, TransactionDraft, User,
};
use serde_json::json;

#[test]
fn test_dashboard_payloads_decode_through_envelope() {
    let user: ApiResponse<User> = serde_json::from_value(json!({
        "data": {
            "id": "user-001",
            "email": "demo@accountstack.io",
            "firstName": "Demo",
            "lastName": "User",
            "createdAt": "2024-01-15T10:30:00Z"
        }
    }))
    .unwrap();
    let user = user.into_data();
    assert_eq!(user.display_name(), "Demo User");
    assert!(user.created_at.is_some());

    let accounts: ApiResponse<Vec<Account>> = serde_json::from_value(json!({
        "data": [
            { "id": "acc-1", "name": "Checking", "type": "checking", "balance": 2500.75 },
            { "id": "acc-2", "type": "credit", "balance": -120.0, "creditLimit": 5000 }
        ],
        "total": 2
    }))
    .unwrap();
    let accounts = accounts.into_data();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[1].account_type.as_deref(), Some("credit"));
    assert_eq!(accounts[1].extra["creditLimit"], 5000);

    let insights: ApiResponse<Vec<Insight>> = serde_json::from_value(json!({
        "data": [{ "id": "ins-1", "type": "spending", "severity": "warning", "dismissed": true }]
    }))
    .unwrap();
    assert!(insights.into_data()[0].is_dismissed());
}

#[test]
fn test_transaction_roundtrip_keeps_unknown_fields() {
    let wire = json!({
        "id": "txn-1",
        "accountId": "acc-1",
        "amount": -45.2,
        "type": "debit",
        "merchant": "Corner Cafe",
        "pending": true
    });
    let transaction: Transaction = serde_json::from_value(wire.clone()).unwrap();
    assert_eq!(transaction.amount, Some(-45.2));
    assert_eq!(serde_json::to_value(&transaction).unwrap(), wire);
}

#[test]
fn test_request_payloads_omit_unset_fields() {
    let draft = TransactionDraft {
        account_id: Some("acc-1".into()),
        amount: Some(10.0),
        ..TransactionDraft::default()
    };
    assert_eq!(serde_json::to_value(&draft).unwrap(), json!({ "accountId": "acc-1", "amount": 10.0 }));

    let filters = InsightFilters { dismissed: Some(false), ..InsightFilters::default() };
    assert_eq!(serde_json::to_value(&filters).unwrap(), json!({ "dismissed": false }));
}
