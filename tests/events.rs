use planck::events::{JsonEventWriter, QueryCompletionEvent, StaticEventGenerator};

#[test]
fn posted_events_serialize_as_one_json_array() {
    let generator = StaticEventGenerator::new(vec![
        QueryCompletionEvent {
            query_id: "q1".to_owned(),
            output_rows: 3,
            wall_millis: 12,
        },
        QueryCompletionEvent {
            query_id: "q2".to_owned(),
            output_rows: 0,
            wall_millis: 1,
        },
    ]);
    let mut out = Vec::new();
    JsonEventWriter::write_events(&generator, &mut out).unwrap();

    let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let events = parsed.as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["query_id"], "q1");
    assert_eq!(events[0]["output_rows"], 3);
    assert_eq!(events[0]["wall_millis"], 12);
    assert_eq!(events[1]["query_id"], "q2");
    assert_eq!(events[1]["output_rows"], 0);
}

#[test]
fn no_events_still_produce_a_valid_array() {
    let generator: StaticEventGenerator<QueryCompletionEvent> = StaticEventGenerator::new(vec![]);
    let mut out = Vec::new();
    JsonEventWriter::write_events(&generator, &mut out).unwrap();
    assert_eq!(out, b"[]");
}
