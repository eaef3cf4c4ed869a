//! Metadata resolution, defaults, temporal/JSON encoding and the
//! primary-key tie-break, exercised through the public facade.

use chrono::{NaiveDate, NaiveDateTime};
use rowmodel::prelude::*;
use rowmodel::{ColumnDefault, registry};

#[derive(Default)]
struct Event {
    id: Option<i64>,
    title: String,
    day: Option<NaiveDate>,
    starts_at: Option<NaiveDateTime>,
    tags: Vec<String>,
    kind: Option<String>,
    state: State,
}

impl Record for Event {
    const TABLE: &'static str = "events";

    fn fields() -> Vec<FieldDef> {
        vec![
            FieldDef::column("id", SqlType::Integer)
                .primary_key()
                .auto_increment(),
            FieldDef::column("title", SqlType::VarChar)
                .length(200)
                .rule(Rule::Required),
            FieldDef::column("day", SqlType::Date),
            FieldDef::column("starts_at", SqlType::DateTime).nullable(),
            FieldDef::column("tags", SqlType::Json),
            FieldDef::column("kind", SqlType::VarChar)
                .length(20)
                .default_value("meetup"),
        ]
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::from(self.id)),
            ("title", Value::from(self.title.clone())),
            ("day", Value::from(self.day)),
            ("starts_at", Value::from(self.starts_at)),
            (
                "tags",
                Value::Array(self.tags.iter().cloned().map(Value::from).collect()),
            ),
            ("kind", Value::from(self.kind.clone())),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get("id").and_then(Value::as_i64),
            title: row
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            day: None,
            starts_at: None,
            tags: Vec::new(),
            kind: row.get("kind").and_then(Value::as_str).map(str::to_string),
            state: State::Transient,
        })
    }

    fn set_field(&mut self, field: &'static str, value: Value) -> Result<()> {
        match field {
            "id" => self.id = value.as_i64(),
            "title" => {
                self.title = value
                    .as_str()
                    .ok_or_else(|| Error::mapping("title expects text"))?
                    .to_string();
            }
            "kind" => self.kind = value.as_str().map(str::to_string),
            _ => {}
        }
        Ok(())
    }

    fn state(&self) -> State {
        self.state
    }

    fn set_state(&mut self, state: State) {
        self.state = state;
    }
}

struct Duplicated {
    state: State,
}

impl Record for Duplicated {
    const TABLE: &'static str = "duplicated";

    fn fields() -> Vec<FieldDef> {
        vec![
            FieldDef::column("code", SqlType::VarChar).primary_key(),
            FieldDef::column("legacy_code", SqlType::VarChar).primary_key(),
        ]
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("code", Value::from("a")),
            ("legacy_code", Value::from("b")),
        ]
    }

    fn from_row(_row: &Row) -> Result<Self> {
        Ok(Self {
            state: State::Transient,
        })
    }

    fn set_field(&mut self, _field: &'static str, _value: Value) -> Result<()> {
        Ok(())
    }

    fn state(&self) -> State {
        self.state
    }

    fn set_state(&mut self, state: State) {
        self.state = state;
    }
}

fn event() -> Event {
    Event {
        id: None,
        title: "RustFest".to_string(),
        day: NaiveDate::from_ymd_opt(2024, 9, 12),
        starts_at: NaiveDate::from_ymd_opt(2024, 9, 12).and_then(|d| d.and_hms_opt(18, 30, 0)),
        tags: vec!["rust".to_string(), "db".to_string()],
        kind: None,
        state: State::Transient,
    }
}

#[test]
fn columns_preserve_declaration_order_and_count() {
    let columns = event().columns().unwrap();
    let names: Vec<_> = columns.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec!["id", "title", "day", "starts_at", "tags", "kind"]
    );
}

#[test]
fn temporal_values_encode_to_canonical_strings() {
    let columns = event().columns().unwrap();

    let day = &columns.iter().find(|(name, _)| name == "day").unwrap().1;
    assert_eq!(day, &Value::Text("2024-09-12".to_string()));

    let starts = &columns
        .iter()
        .find(|(name, _)| name == "starts_at")
        .unwrap()
        .1;
    assert_eq!(starts, &Value::Text("2024-09-12 18:30:00".to_string()));
}

#[test]
fn array_values_encode_as_json_for_json_columns() {
    let columns = event().columns().unwrap();
    let tags = &columns.iter().find(|(name, _)| name == "tags").unwrap().1;
    assert_eq!(tags, &Value::Text(r#"["rust","db"]"#.to_string()));
}

#[test]
fn declared_default_applies_to_null_values() {
    let columns = event().columns().unwrap();
    let kind = &columns.iter().find(|(name, _)| name == "kind").unwrap().1;
    assert_eq!(kind, &Value::Text("meetup".to_string()));
}

#[test]
fn codec_errors_name_record_and_field() {
    struct Broken {
        state: State,
    }

    impl Record for Broken {
        const TABLE: &'static str = "broken";

        fn fields() -> Vec<FieldDef> {
            vec![FieldDef::column("at", SqlType::Date)]
        }

        fn to_row(&self) -> Vec<(&'static str, Value)> {
            // A time-only value cannot supply the date the column needs.
            vec![(
                "at",
                Value::Time(chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap()),
            )]
        }

        fn from_row(_row: &Row) -> Result<Self> {
            Ok(Self {
                state: State::Transient,
            })
        }

        fn set_field(&mut self, _field: &'static str, _value: Value) -> Result<()> {
            Ok(())
        }

        fn state(&self) -> State {
            self.state
        }

        fn set_state(&mut self, state: State) {
            self.state = state;
        }
    }

    let record = Broken {
        state: State::Transient,
    };
    let err = record.columns().unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot encode `Broken.at`: incorrect temporal/column type combination"
    );
}

#[test]
fn assign_rejects_a_temporal_mismatch_up_front() {
    let mut record = event();
    let err = record
        .assign(&[(
            "day",
            Value::Time(chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap()),
        )])
        .unwrap_err();
    assert!(matches!(err, Error::Mapping(_)));
    assert!(err.to_string().contains("day"));
}

#[test]
fn metadata_reports_primary_key_and_auto_increment() {
    let meta = registry::resolve::<Event>().unwrap();
    assert_eq!(meta.table(), "events");
    assert_eq!(meta.primary_key().unwrap().column, "id");
    assert_eq!(meta.auto_increment().unwrap().column, "id");
    assert_eq!(
        meta.column_for("kind").unwrap().default,
        ColumnDefault::Value(Value::Text("meetup".to_string()))
    );
}

#[test]
fn first_declared_primary_key_wins_every_time() {
    for _ in 0..3 {
        let meta = registry::resolve::<Duplicated>().unwrap();
        assert_eq!(meta.primary_key().unwrap().field, "code");
    }

    let record = Duplicated {
        state: State::Transient,
    };
    let (key, value) = record.primary_key().unwrap();
    assert_eq!(key.field, "code");
    assert_eq!(value, Value::Text("a".to_string()));
}

#[test]
fn assign_converts_and_skips_unknowns() {
    let mut record = event();
    record
        .assign(&[
            ("title", Value::Text("RustFest Berlin".to_string())),
            ("kind", Value::Text("conference".to_string())),
            ("organizer", Value::Text("nobody".to_string())),
        ])
        .unwrap();
    assert_eq!(record.title, "RustFest Berlin");
    assert_eq!(record.kind.as_deref(), Some("conference"));
}

#[test]
fn validation_is_reported_before_any_encoding_issue() {
    let mut record = event();
    record.title = String::new();
    let err = record.validate().unwrap_err();
    let Error::Validation(validation) = err else {
        panic!("expected validation error");
    };
    assert_eq!(validation.errors(), ["title is required"]);
}
