use chrono::{TimeZone, Utc};
use tidykit_core::model::todo::{decode_todos, encode_todos};
use tidykit_core::TodoItem;
use uuid::Uuid;

#[test]
fn todo_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let item = TodoItem {
        id,
        title: "Buy milk".to_string(),
        is_completed: true,
        date: Utc.with_ymd_and_hms(2025, 1, 19, 9, 30, 0).unwrap(),
    };

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["title"], "Buy milk");
    assert_eq!(json["isCompleted"], true);
    assert_eq!(json["date"], "2025-01-19T09:30:00Z");
}

#[test]
fn decodes_offset_timestamps_into_utc() {
    let json = r#"[{"id":"11111111-2222-4333-8444-555555555555","title":"x",
        "isCompleted":false,"date":"2025-01-19T18:30:00+09:00"}]"#;
    let items = decode_todos(json.as_bytes()).unwrap();
    assert_eq!(
        items[0].date,
        Utc.with_ymd_and_hms(2025, 1, 19, 9, 30, 0).unwrap()
    );
}

#[test]
fn persisted_form_round_trips_for_empty_single_and_many() {
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let many: Vec<TodoItem> = (0..25)
        .map(|n| {
            TodoItem::with_date(format!("task {n}"), base + chrono::Duration::hours(n))
                .completed(n % 3 == 0)
        })
        .collect();

    for items in [Vec::new(), many[..1].to_vec(), many] {
        let bytes = encode_todos(&items).unwrap();
        assert_eq!(decode_todos(&bytes).unwrap(), items);
    }
}

#[test]
fn decode_rejects_malformed_dates() {
    let json = r#"[{"id":"11111111-2222-4333-8444-555555555555","title":"x",
        "isCompleted":false,"date":"yesterday"}]"#;
    assert!(decode_todos(json.as_bytes()).is_err());
}
