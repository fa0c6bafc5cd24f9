//! JSON serializer for human-readable snapshots.

use crate::cache::InternCache;
use crate::record::Internable;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

use super::{extract_records, CacheSerializer, SerializationError};

/// JSON serializer for human-readable snapshots.
///
/// Pretty-printed JSON for easy debugging and manual inspection of seed
/// data.
pub struct JsonSerializer;

impl CacheSerializer for JsonSerializer {
    fn serialize<T, W>(cache: &InternCache<T>, mut writer: W) -> Result<(), SerializationError>
    where
        T: Internable + Serialize,
        T::Key: Ord,
        W: Write,
    {
        let records = extract_records(cache);
        serde_json::to_writer_pretty(&mut writer, &records)?;
        Ok(())
    }

    fn deserialize<T, R>(mut reader: R) -> Result<InternCache<T>, SerializationError>
    where
        T: Internable + DeserializeOwned,
        R: Read,
    {
        let records: Vec<T> = serde_json::from_reader(&mut reader)?;
        Ok(InternCache::with_seeds(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SharedRecord;

    fn car(brand: &str, model: &str, color: &str) -> SharedRecord {
        SharedRecord::new([brand.into(), model.into(), color.into()]).unwrap()
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let cache = InternCache::with_seeds([
            car("Chevrolet", "Camaro2018", "pink"),
            car("BMW", "M5", "red"),
        ]);

        let mut buf = Vec::new();
        JsonSerializer::serialize(&cache, &mut buf).unwrap();

        let rebuilt: InternCache<SharedRecord> =
            JsonSerializer::deserialize(buf.as_slice()).unwrap();

        assert_eq!(rebuilt.len(), 2);
        let key = car("BMW", "M5", "red").intern_key();
        let record = rebuilt.get(&key).unwrap();
        assert_eq!(record.to_string(), "[BMW, M5, red]");
    }

    #[test]
    fn test_duplicate_snapshot_data_collapses() {
        // Hand-written snapshot with a duplicate-keyed record: the rebuild
        // replays it through with_seeds, so the later one wins.
        let records = vec![
            car("BMW", "M5", "red"),
            car("BMW", "X6", "white"),
            car("BMW", "M5", "red"),
        ];
        let json = serde_json::to_vec(&records).unwrap();

        let rebuilt: InternCache<SharedRecord> =
            JsonSerializer::deserialize(json.as_slice()).unwrap();
        assert_eq!(rebuilt.len(), 2);
    }

    #[test]
    fn test_deserialize_rejects_malformed_input() {
        let result: Result<InternCache<SharedRecord>, _> =
            JsonSerializer::deserialize(&b"not json"[..]);
        assert!(matches!(result, Err(SerializationError::Json(_))));
    }
}
