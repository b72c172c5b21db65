//! Serde implementations for Record
//!
//! Records serialize as flat JSON objects, the shape the REST endpoints
//! produce and consume. The `id` field travels inside the object; the
//! entity name does not (callers attach it after deserialization, since
//! the wire format carries no entity discriminator).

use std::collections::HashMap;

use serde::de::Deserializer;
use serde::ser::SerializeMap;
use serde::ser::Serializer;
use serde::Deserialize;
use serde::Serialize;

use super::Record;
use super::Value;

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(self.id.is_some());
        let mut map = serializer.serialize_map(Some(self.fields.len() + extra))?;

        if let Some(id) = self.id {
            map.serialize_entry("id", &id)?;
        }

        // Sorted for deterministic payloads.
        let mut keys: Vec<&String> = self.fields.keys().collect();
        keys.sort();
        for key in keys {
            if key == "id" {
                continue;
            }
            map.serialize_entry(key, &self.fields[key])?;
        }

        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields: HashMap<String, Value> = HashMap::deserialize(deserializer)?;

        let id = match fields.remove("id") {
            Some(Value::Uuid(u)) => Some(u),
            Some(Value::String(s)) => match s.parse() {
                Ok(u) => Some(u),
                Err(_) => {
                    fields.insert("id".to_string(), Value::String(s));
                    None
                }
            },
            Some(other) => {
                fields.insert("id".to_string(), other);
                None
            }
            None => None,
        };

        Ok(Record {
            entity_name: String::new(),
            id,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::model::Record;
    use crate::model::Value;

    #[test]
    fn deserializes_object_and_extracts_id() {
        let json = r#"{
            "id": "6a9f8d3e-2c41-4b88-9f1a-3a5e0c7d1102",
            "name": "Blue Clinic",
            "created_at": "2026-01-05T08:00:00Z"
        }"#;

        let record: Record = serde_json::from_str(json).unwrap();

        assert_eq!(
            record.id(),
            Some("6a9f8d3e-2c41-4b88-9f1a-3a5e0c7d1102".parse().unwrap())
        );
        assert_eq!(record.get_string("name").unwrap(), Some("Blue Clinic"));
        assert_eq!(record.get("created_at").map(Value::type_name), Some("datetime"));
    }

    #[test]
    fn serializes_id_and_sorted_fields() {
        let id: Uuid = "6a9f8d3e-2c41-4b88-9f1a-3a5e0c7d1102".parse().unwrap();
        let record = Record::with_id("clinic", id)
            .set("name", "Blue Clinic")
            .set("address", "12 Harbor Rd");

        let json = serde_json::to_string(&record).unwrap();

        assert_eq!(
            json,
            r#"{"id":"6a9f8d3e-2c41-4b88-9f1a-3a5e0c7d1102","address":"12 Harbor Rd","name":"Blue Clinic"}"#
        );
    }

    #[test]
    fn round_trips_without_id() {
        let record = Record::new("symptom").set("name", "cough");
        let json = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id(), None);
        assert_eq!(back.get_string("name").unwrap(), Some("cough"));
    }
}
