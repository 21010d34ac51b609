//! Phase table: the 24 hourly phase slots of one mode.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::{HOURS_PER_DAY, Hour};
use crate::vocabulary::Phase;

/// Exactly 24 slots, one per hour. A slot is either a phase name or unset.
///
/// Serialized as a 24-element array (`null` for unset). Deserialization also
/// accepts the sparse hour-keyed object form (`{"7": "Lever", ...}`) written
/// by older editors; missing hours become unset and empty strings are read
/// as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PhaseTableRepr", into = "Vec<Option<String>>")]
pub struct PhaseTable([Option<String>; HOURS_PER_DAY]);

impl PhaseTable {
    /// A table with every slot set to `phase`.
    #[must_use]
    pub fn filled(phase: &Phase) -> Self {
        Self(std::array::from_fn(|_| Some(phase.to_string())))
    }

    /// Rebuild a table from stored `(hour, name)` slots without checking the
    /// names. Hours not listed stay unset.
    pub fn from_stored<I>(slots: I) -> Self
    where
        I: IntoIterator<Item = (Hour, Option<String>)>,
    {
        let mut table = Self::default();
        for (hour, name) in slots {
            table.0[hour.index()] = normalize(name);
        }
        table
    }

    /// The phase name scheduled at `hour`, if any.
    #[must_use]
    pub fn get(&self, hour: Hour) -> Option<&str> {
        self.0[hour.index()].as_deref()
    }

    pub fn set(&mut self, hour: Hour, phase: &Phase) {
        self.0[hour.index()] = Some(phase.to_string());
    }

    /// Set every hour in `hours` to `phase`.
    pub fn set_range(&mut self, hours: std::ops::Range<u8>, phase: &Phase) {
        for slot in &mut self.0[usize::from(hours.start)..usize::from(hours.end)] {
            *slot = Some(phase.to_string());
        }
    }

    pub fn clear(&mut self, hour: Hour) {
        self.0[hour.index()] = None;
    }

    /// Iterate over `(hour, slot)` pairs in hour order.
    pub fn iter(&self) -> impl Iterator<Item = (Hour, Option<&str>)> {
        Hour::all().zip(self.0.iter().map(Option::as_deref))
    }

    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PhaseTableRepr {
    Slots(Vec<Option<String>>),
    Sparse(BTreeMap<String, Option<String>>),
}

fn normalize(slot: Option<String>) -> Option<String> {
    slot.filter(|name| !name.is_empty())
}

impl TryFrom<PhaseTableRepr> for PhaseTable {
    type Error = ValidationError;

    fn try_from(repr: PhaseTableRepr) -> Result<Self, Self::Error> {
        let mut table = Self::default();
        match repr {
            PhaseTableRepr::Slots(slots) => {
                if slots.len() != HOURS_PER_DAY {
                    return Err(ValidationError::PhaseTableLength(slots.len()));
                }
                for (slot, value) in table.0.iter_mut().zip(slots) {
                    *slot = normalize(value);
                }
            }
            PhaseTableRepr::Sparse(entries) => {
                for (key, value) in entries {
                    let hour = key
                        .trim()
                        .parse::<u32>()
                        .map_err(|_| ValidationError::InvalidHourKey(key.clone()))
                        .and_then(Hour::new)?;
                    table.0[hour.index()] = normalize(value);
                }
            }
        }
        Ok(table)
    }
}

impl From<PhaseTable> for Vec<Option<String>> {
    fn from(table: PhaseTable) -> Self {
        table.0.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Vocabulary;

    fn phase(name: &str) -> Phase {
        Vocabulary::default().phase(name).unwrap()
    }

    fn hour(h: u32) -> Hour {
        Hour::new(h).unwrap()
    }

    #[test]
    fn should_start_with_every_slot_unset() {
        let table = PhaseTable::default();
        assert!(table.is_unset());
        assert_eq!(table.iter().count(), 24);
    }

    #[test]
    fn should_set_and_clear_single_slot() {
        let mut table = PhaseTable::default();
        table.set(hour(7), &phase("Lever"));
        assert_eq!(table.get(hour(7)), Some("Lever"));
        assert_eq!(table.get(hour(8)), None);

        table.clear(hour(7));
        assert!(table.is_unset());
    }

    #[test]
    fn should_set_half_open_range() {
        let mut table = PhaseTable::default();
        table.set_range(9..17, &phase("Absence"));
        assert_eq!(table.get(hour(8)), None);
        assert_eq!(table.get(hour(9)), Some("Absence"));
        assert_eq!(table.get(hour(16)), Some("Absence"));
        assert_eq!(table.get(hour(17)), None);
    }

    #[test]
    fn should_serialize_as_24_element_array() {
        let mut table = PhaseTable::default();
        table.set(hour(0), &phase("Nuit"));
        let value = serde_json::to_value(&table).unwrap();
        let slots = value.as_array().unwrap();
        assert_eq!(slots.len(), 24);
        assert_eq!(slots[0], "Nuit");
        assert!(slots[1].is_null());
    }

    #[test]
    fn should_deserialize_full_array() {
        let mut slots = vec![serde_json::Value::Null; 24];
        slots[22] = serde_json::json!("Coucher");
        let table: PhaseTable = serde_json::from_value(serde_json::Value::Array(slots)).unwrap();
        assert_eq!(table.get(hour(22)), Some("Coucher"));
    }

    #[test]
    fn should_reject_partially_sized_array() {
        let result: Result<PhaseTable, _> = serde_json::from_str(r#"["Nuit", "Lever"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn should_deserialize_sparse_hour_keyed_object() {
        let table: PhaseTable =
            serde_json::from_str(r#"{"7": "Lever", "8": "Lever", "22": "Coucher"}"#).unwrap();
        assert_eq!(table.get(hour(7)), Some("Lever"));
        assert_eq!(table.get(hour(22)), Some("Coucher"));
        assert_eq!(table.get(hour(12)), None);
    }

    #[test]
    fn should_reject_sparse_object_with_out_of_range_hour() {
        let result: Result<PhaseTable, _> = serde_json::from_str(r#"{"24": "Nuit"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn should_rebuild_from_stored_slots() {
        let table = PhaseTable::from_stored([
            (hour(6), Some("Lever".to_string())),
            (hour(7), Some(String::new())),
            (hour(8), None),
        ]);
        assert_eq!(table.get(hour(6)), Some("Lever"));
        assert_eq!(table.get(hour(7)), None);
        assert_eq!(table.iter().filter(|(_, slot)| slot.is_some()).count(), 1);
    }

    #[test]
    fn should_read_empty_string_as_unset() {
        let table: PhaseTable = serde_json::from_str(r#"{"3": ""}"#).unwrap();
        assert!(table.is_unset());
    }
}
