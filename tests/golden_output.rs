//! Byte-exact snapshots of tool output.

mod common;

use common::{gateway, FakeOdoo};
use odoo_mcp_server::odoo::{CreateValues, Domain, ReadOptions};
use serde_json::json;

#[tokio::test]
async fn golden_search_records_output() {
    let fake = FakeOdoo::new().shared();
    let gateway = gateway(&fake, false);

    let options = ReadOptions {
        fields: Some(vec!["name".into(), "create_date".into()]),
        limit: 2,
        ..ReadOptions::default()
    };
    let text = gateway
        .search_records("res.partner", &Domain::all(), options)
        .await
        .unwrap();

    let expected = r#"{
  "records": [
    {
      "id": 1,
      "name": "Acme",
      "create_date": "2024-03-05 10:00:00",
      "_url": "http://odoo.test:8069/odoo/res.partner/1"
    },
    {
      "id": 2,
      "name": "Société Générale",
      "create_date": "2024-03-06 08:30:15",
      "_url": "http://odoo.test:8069/odoo/res.partner/2"
    }
  ],
  "total": 3,
  "limit": 2,
  "offset": 0
}"#;
    assert_eq!(text, expected, "search_records snapshot mismatch");
}

#[tokio::test]
async fn golden_create_batch_output() {
    let fake = FakeOdoo::new().shared();
    let gateway = gateway(&fake, false);

    let batch: CreateValues =
        serde_json::from_value(json!([{"name": "One"}, {"name": "Two"}])).unwrap();
    let text = gateway.create_record("res.partner", &batch).await.unwrap();

    let expected = r#"{
  "ids": [
    100,
    101
  ],
  "count": 2,
  "success": true,
  "urls": [
    "http://odoo.test:8069/odoo/res.partner/100",
    "http://odoo.test:8069/odoo/res.partner/101"
  ]
}"#;
    assert_eq!(text, expected, "create_record snapshot mismatch");
}

#[tokio::test]
async fn repeated_reads_are_byte_identical() {
    let fake = FakeOdoo::new().shared();
    let gateway = gateway(&fake, false);

    let a = gateway.get_fields("res.partner", None, None, None).await.unwrap();
    let b = gateway.get_fields("res.partner", None, None, None).await.unwrap();
    assert_eq!(a, b, "get_fields must produce byte-identical output across calls");
}
