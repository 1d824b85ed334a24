//! Integration tests for DocumentStore over the shipped and fake storages.


use folio::{
    Document, DocumentStore, InMemoryStorage, Invoice, KeyValueStorage, Receipt, StoreError,
};
use serde_json::json;
use support::clock;

fn invoices(storage: InMemoryStorage) -> DocumentStore<Invoice, InMemoryStorage> {
    DocumentStore::new(storage).with_clock(clock())
}

#[test]
fn first_save_into_empty_store() {
    let storage = InMemoryStorage::new();
    let mut store = invoices(storage.clone());

    let saved = store.save(Invoice::new().with_field("amount", 100)).unwrap();

    assert!(!saved.replaced);
    assert_eq!(saved.document.number(), Some("CON-2025-0001"));
    assert_eq!(saved.document.date_issued(), Some("2025-03-14"));
    assert!(storage.get("invoice:CON-2025-0001").unwrap().is_some());

    let report = store.load();
    assert!(report.is_clean());
    assert_eq!(report.loaded, 1);
    assert_eq!(store.documents(), &[saved.document]);
    assert_eq!(store.documents()[0].field("amount"), Some(&json!(100)));
}

#[test]
fn load_is_idempotent() {
    let mut store = invoices(InMemoryStorage::new());
    for amount in [10, 20, 30] {
        store.save(Invoice::new().with_field("amount", amount)).unwrap();
    }

    store.load();
    let first = store.documents().to_vec();
    store.load();

    assert_eq!(store.documents(), first.as_slice());
    assert_eq!(first.len(), 3);
}

#[test]
fn save_then_load_round_trips_caller_fields() {
    let storage = InMemoryStorage::new();
    let mut store = invoices(storage.clone());

    let invoice = Invoice::with_number("CON-2025-0042")
        .with_field("client", json!({ "name": "Acme", "vat": "GB123" }))
        .with_field("items", json!([{ "sku": "A1", "qty": 2 }]));
    let saved = store.save(invoice).unwrap();

    let mut reopened = invoices(storage);
    reopened.load();
    assert_eq!(reopened.get("CON-2025-0042"), Some(&saved.document));
}

#[test]
fn supplied_date_is_kept() {
    let mut store = invoices(InMemoryStorage::new());
    let mut invoice = Invoice::new();
    invoice.set_date_issued("2024-12-31".into());

    let saved = store.save(invoice).unwrap();
    assert_eq!(saved.document.date_issued(), Some("2024-12-31"));
}

#[test]
fn save_with_same_number_replaces_in_place() {
    let storage = InMemoryStorage::new();
    let mut store = invoices(storage.clone());

    store.save(Invoice::with_number("CON-2025-0001").with_field("amount", 1)).unwrap();
    store.save(Invoice::with_number("CON-2025-0002").with_field("amount", 2)).unwrap();
    let second = store
        .save(Invoice::with_number("CON-2025-0001").with_field("amount", 99))
        .unwrap();

    assert!(second.replaced);
    assert_eq!(store.len(), 2);
    assert_eq!(store.documents()[0].field("amount"), Some(&json!(99)));
    assert_eq!(storage.list("invoice:").unwrap().len(), 2);

    store.load();
    assert_eq!(store.get("CON-2025-0001"), Some(&second.document));
}

#[test]
fn delete_removes_exactly_one() {
    let mut store = invoices(InMemoryStorage::new());
    for _ in 0..3 {
        store.save(Invoice::new()).unwrap();
    }

    assert!(store.delete("CON-2025-0002").unwrap());

    let numbers: Vec<_> = store.documents().iter().filter_map(|d| d.number()).collect();
    assert_eq!(numbers, vec!["CON-2025-0001", "CON-2025-0003"]);

    store.load();
    assert_eq!(store.len(), 2);
    assert!(store.get("CON-2025-0002").is_none());
}

#[test]
fn delete_of_absent_number_is_a_no_op() {
    let mut store = invoices(InMemoryStorage::new());
    assert!(!store.delete("NOPE-0000").unwrap());
    assert!(store.is_empty());

    store.save(Invoice::new()).unwrap();
    let before = store.documents().to_vec();
    assert!(!store.delete("NOPE-0000").unwrap());
    assert_eq!(store.documents(), before.as_slice());
}

#[test]
fn malformed_entry_is_dropped_and_others_load() {
    let storage = InMemoryStorage::new();
    storage.set("invoice:CON-2025-0001", r#"{"amount":1}"#).unwrap();
    storage.set("invoice:CON-2025-0002", r#"{"amount":2"#).unwrap();
    storage.set("invoice:CON-2025-0003", r#"{"amount":3}"#).unwrap();
    storage.set("invoice:CON-2025-0004", r#"{"amount":4}"#).unwrap();

    let mut store = invoices(storage);
    let report = store.load();

    assert_eq!(report.loaded, 3);
    assert_eq!(report.skipped, vec!["invoice:CON-2025-0002".to_string()]);
    assert!(report.backing_error.is_none());
    assert!(store.get("CON-2025-0002").is_none());
    assert_eq!(store.get("CON-2025-0004").unwrap().field("amount"), Some(&json!(4)));
}

#[test]
fn key_supplies_number_for_records_without_one() {
    let storage = InMemoryStorage::new();
    storage.set("invoice:CON-2024-0007", r#"{"amount":7}"#).unwrap();
    storage
        .set("invoice:CON-2024-0008", r#"{"documentNumber":"WRONG","amount":8}"#)
        .unwrap();

    let mut store = invoices(storage);
    store.load();

    assert!(store.get("CON-2024-0007").is_some());
    assert!(store.get("CON-2024-0008").is_some());
    assert!(store.get("WRONG").is_none());
}

#[test]
fn records_from_older_field_names_load() {
    let storage = InMemoryStorage::new();
    storage
        .set("invoice:CON-2025-0001", r#"{"invoiceNumber":"CON-2025-0001","total":12.5}"#)
        .unwrap();

    let mut store = invoices(storage);
    store.load();

    let invoice = store.get("CON-2025-0001").unwrap();
    assert_eq!(invoice.field("total"), Some(&json!(12.5)));
}

#[test]
fn open_loads_existing_documents() {
    let storage = InMemoryStorage::new();
    invoices(storage.clone()).save(Invoice::new()).unwrap();

    let store = DocumentStore::<Invoice, _>::open(storage);
    assert_eq!(store.len(), 1);
}

#[test]
fn kinds_sharing_storage_stay_separate() {
    let storage = InMemoryStorage::new();
    let mut invoice_store = invoices(storage.clone());
    let mut receipt_store = DocumentStore::<Receipt, _>::new(storage.clone()).with_clock(clock());

    invoice_store.save(Invoice::new()).unwrap();
    let receipt = receipt_store.save(Receipt::new()).unwrap();

    assert_eq!(receipt.document.number(), Some("RCP-2025-0001"));
    assert_eq!(storage.len(), 2);

    invoice_store.load();
    receipt_store.load();
    assert_eq!(invoice_store.len(), 1);
    assert_eq!(receipt_store.len(), 1);

    assert!(!invoice_store.delete("RCP-2025-0001").unwrap());
    assert_eq!(receipt_store.load().loaded, 1);
}

#[test]
fn clear_all_purges_only_its_namespace() {
    let storage = InMemoryStorage::new();
    let mut store = invoices(storage.clone());
    for _ in 0..3 {
        store.save(Invoice::new()).unwrap();
    }
    storage.set("receipt:RCP-2025-0001", "{}").unwrap();

    assert_eq!(store.clear_all().unwrap(), 3);
    assert!(store.is_empty());
    assert_eq!(storage.list("invoice:").unwrap().len(), 0);
    assert_eq!(storage.list("receipt:").unwrap().len(), 1);
}

#[test]
fn selection_is_owned_by_the_caller() {
    let mut store = invoices(InMemoryStorage::new());
    store.save(Invoice::new()).unwrap();
    store.save(Invoice::new()).unwrap();

    assert!(store.current().is_none());
    let selected = store.select("CON-2025-0002").cloned();
    assert_eq!(selected.as_ref().and_then(|d| d.number()), Some("CON-2025-0002"));

    // Deleting the selected document leaves the slot alone.
    store.delete("CON-2025-0002").unwrap();
    assert_eq!(store.current(), selected.as_ref());

    assert!(store.select("CON-2099-0001").is_none());
    assert!(store.current().is_none());

    store.set_current(Some(Invoice::with_number("DRAFT")));
    assert_eq!(store.current().and_then(|d| d.number()), Some("DRAFT"));
    store.set_current(None);
    assert!(store.current().is_none());
}

#[test]
fn store_error_is_typed() {
    let err = StoreError::from(folio::StorageError::Unavailable("offline".into()));
    assert!(matches!(err, StoreError::Storage(_)));
    assert_eq!(err.to_string(), "document storage error: storage unavailable: offline");
}
