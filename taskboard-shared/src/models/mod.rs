/// Database models for Taskboard
///
/// - `user`: user accounts
/// - `task`: tasks and their status
///
/// Identifiers are `SERIAL` integers in the database and strings on the wire.

pub mod task;
pub mod user;

/// Serde adapter that carries integer identifiers as JSON strings
pub mod id_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(id: &i32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
