// Frame model - named tables of typed columns returned per query
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub name: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(flatten)]
    pub values: FieldValues,
}

/// Column storage. Every value in a column has the same type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "camelCase")]
pub enum FieldValues {
    String(Vec<String>),
    /// `None` is the unset sentinel (e.g. an alarm that has not terminated).
    Time(Vec<Option<DateTime<Utc>>>),
    Number(Vec<f64>),
}

impl FieldValues {
    pub fn len(&self) -> usize {
        match self {
            FieldValues::String(v) => v.len(),
            FieldValues::Time(v) => v.len(),
            FieldValues::Number(v) => v.len(),
        }
    }
}

impl Field {
    pub fn new(name: impl Into<String>, values: FieldValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

impl Frame {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn row_count(&self) -> usize {
        self.fields.first().map(|f| f.values.len()).unwrap_or(0)
    }

    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_frame_serialization_shape() {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let frame = Frame::new(
            "Alarms",
            vec![
                Field::new("Description", FieldValues::String(vec!["Door open".into()])),
                Field::new("Activation Time", FieldValues::Time(vec![Some(t)])),
                Field::new("Termination Time", FieldValues::Time(vec![None])),
            ],
        );

        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Alarms",
                "fields": [
                    {"name": "Description", "type": "string", "values": ["Door open"]},
                    {"name": "Activation Time", "type": "time", "values": ["2024-01-02T03:04:05Z"]},
                    {"name": "Termination Time", "type": "time", "values": [null]}
                ]
            })
        );
        assert_eq!(frame.row_count(), 1);
    }
}
