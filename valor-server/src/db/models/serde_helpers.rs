//! Common serde helpers for SurrealDB records
//!
//! RecordId fields accept both formats on input:
//! - string "table:id" (API JSON)
//! - native SurrealDB record id (database rows)
//!
//! and are always written out as "table:id" strings.

use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

/// Deserialize a list that may be stored as null
pub fn vec_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

#[derive(Debug, Clone)]
struct FlexibleRecordId(RecordId);

impl<'de> Deserialize<'de> for FlexibleRecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct FlexibleVisitor;

        impl<'de> Visitor<'de> for FlexibleVisitor {
            type Value = FlexibleRecordId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string 'table:id' or RecordId")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse::<RecordId>()
                    .map(FlexibleRecordId)
                    .map_err(|_| de::Error::custom(format!("invalid RecordId: {}", value)))
            }

            fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                RecordId::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(FlexibleRecordId)
            }
        }

        deserializer.deserialize_any(FlexibleVisitor)
    }
}

/// RecordId serialization as "table:id" string
pub mod record_id {
    use super::*;

    pub fn serialize<S>(id: &RecordId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<RecordId, D::Error>
    where
        D: Deserializer<'de>,
    {
        FlexibleRecordId::deserialize(d).map(|f| f.0)
    }
}

/// Option<RecordId> serialization
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<FlexibleRecordId>::deserialize(d).map(|opt| opt.map(|f| f.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Row {
        #[serde(with = "record_id")]
        owner: RecordId,
        #[serde(default, with = "option_record_id")]
        id: Option<RecordId>,
        #[serde(default, deserialize_with = "vec_or_empty")]
        tags: Vec<String>,
    }

    #[test]
    fn test_record_id_from_string() {
        let row: Row =
            serde_json::from_str(r#"{"owner":"user:ada","id":null,"tags":null}"#).unwrap();
        assert_eq!(row.owner, RecordId::from_table_key("user", "ada"));
        assert!(row.id.is_none());
        assert!(row.tags.is_empty());
    }

    #[test]
    fn test_record_id_serializes_as_string() {
        let row = Row {
            owner: RecordId::from_table_key("user", "ada"),
            id: Some(RecordId::from_table_key("order", "x1")),
            tags: vec![],
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["owner"], "user:ada");
        assert_eq!(json["id"], "order:x1");
    }

    #[test]
    fn test_invalid_record_id_rejected() {
        assert!(serde_json::from_str::<Row>(r#"{"owner":42}"#).is_err());
    }
}
