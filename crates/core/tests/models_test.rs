use labwise_core::errors::LabError;
use labwise_core::models::{
    Role, SaveTimetableRequest, SlotKind, SlotRecord, SlotTime, TimetableKey, Weekday,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, json, to_string, to_value};

#[rstest]
#[case("09:00", 540)]
#[case("00:00", 0)]
#[case("23:59", 1439)]
#[case("13:05", 785)]
fn slot_time_parses_and_formats(#[case] text: &str, #[case] minutes: u16) {
    let time: SlotTime = text.parse().unwrap();
    assert_eq!(time.minutes(), minutes);
    assert_eq!(time.to_string(), text);
}

#[rstest]
#[case("24:00")]
#[case("09:60")]
#[case("9am")]
#[case("")]
#[case("09-00")]
fn slot_time_rejects_malformed_input(#[case] text: &str) {
    assert!(text.parse::<SlotTime>().is_err());
}

#[test]
fn slot_time_order_matches_string_order() {
    let earlier: SlotTime = "09:05".parse().unwrap();
    let later: SlotTime = "10:00".parse().unwrap();
    assert!(earlier < later);
    assert!(earlier.to_string() < later.to_string());
}

#[test]
fn slot_time_plus_minutes_stops_at_midnight() {
    let late: SlotTime = "23:30".parse().unwrap();
    assert!(late.plus_minutes(60).is_none());
    let morning: SlotTime = "09:00".parse().unwrap();
    assert_eq!(morning.plus_minutes(60).unwrap().to_string(), "10:00");
}

#[test]
fn slot_time_serializes_as_string() {
    let time: SlotTime = "09:00".parse().unwrap();
    assert_eq!(to_string(&time).unwrap(), "\"09:00\"");
    let back: SlotTime = from_str("\"09:00\"").unwrap();
    assert_eq!(back, time);
}

#[test]
fn weekday_round_trips_through_strings() {
    for day in Weekday::ALL {
        let parsed: Weekday = day.as_str().parse().unwrap();
        assert_eq!(parsed, day);
    }
    assert!("Sunday".parse::<Weekday>().is_err());
}

#[test]
fn slot_kind_uses_lowercase_wire_names() {
    assert_eq!(to_string(&SlotKind::Class).unwrap(), "\"class\"");
    assert_eq!(to_string(&SlotKind::Break).unwrap(), "\"break\"");
}

#[test]
fn role_uses_uppercase_wire_names() {
    assert_eq!(to_string(&Role::Teacher).unwrap(), "\"TEACHER\"");
    assert_eq!("STUDENT".parse::<Role>().unwrap(), Role::Student);
    assert!(matches!(
        "teacher".parse::<Role>(),
        Err(LabError::Validation(_))
    ));
}

fn valid_key() -> TimetableKey {
    TimetableKey {
        department: "CSE".to_string(),
        year: 3,
        academic_year: "2023-24".to_string(),
        section: "B".to_string(),
    }
}

#[test]
fn key_validation_accepts_catalog_values() {
    assert!(valid_key().validate().is_ok());
}

#[rstest]
#[case(TimetableKey { department: "NOPE".to_string(), ..valid_key() })]
#[case(TimetableKey { year: 0, ..valid_key() })]
#[case(TimetableKey { year: 5, ..valid_key() })]
#[case(TimetableKey { academic_year: "1999-00".to_string(), ..valid_key() })]
#[case(TimetableKey { section: "Z".to_string(), ..valid_key() })]
fn key_validation_rejects_off_catalog_values(#[case] key: TimetableKey) {
    assert!(matches!(key.validate(), Err(LabError::Validation(_))));
}

#[test]
fn save_request_uses_flattened_camel_case_wire_format() {
    let body = json!({
        "department": "CSE-DS",
        "year": 2,
        "academicYear": "2024-25",
        "section": "A",
        "slots": [{
            "day": "Monday",
            "startTime": "09:00",
            "endTime": "10:00",
            "subject": "AI/ML",
            "subjectCode": "CS201",
            "professor": "Dr. X"
        }]
    });

    let request: SaveTimetableRequest = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(request.key.department, "CSE-DS");
    assert_eq!(request.key.academic_year, "2024-25");
    assert_eq!(request.slots.len(), 1);
    assert_eq!(request.slots[0].day, Weekday::Monday);
    assert_eq!(request.slots[0].subject_code, "CS201");

    assert_eq!(to_value(&request).unwrap(), body);
}

#[test]
fn slot_record_wire_names() {
    let record = SlotRecord {
        day: Weekday::Friday,
        start: "14:00".parse().unwrap(),
        end: "15:00".parse().unwrap(),
        subject: "Computer Vision".to_string(),
        subject_code: "CS305".to_string(),
        professor: "Dr. Sunil Kumar".to_string(),
    };
    let value = to_value(&record).unwrap();
    assert_eq!(value["day"], "Friday");
    assert_eq!(value["startTime"], "14:00");
    assert_eq!(value["endTime"], "15:00");
    assert_eq!(value["subjectCode"], "CS305");
}
