use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};
use crate::error::Result;
use crate::json::{JsonPrintable, JsonWriter, quote_string};
use super::checksums::ChecksumSet;
use super::key::SerializationKey;

pub const NAME_KEY: &str = "name";
pub const CUSTOM_TARGET_CONSTRUCTOR_CLASS_KEY: &str = "customTargetConstructorClass";
pub const CHECKSUM_KEY: &str = "checksum";

type EntrySlot = Arc<Mutex<ChecksumSet>>;
type SharedKey = Arc<SerializationKey>;

#[derive(Default)]
struct Entries {
    order: Vec<(SharedKey, EntrySlot)>,
    index: HashMap<SharedKey, usize>,
}

impl Entries {
    fn get(&self, key: &SerializationKey) -> Option<EntrySlot> {
        self.index.get(key).map(|&i| Arc::clone(&self.order[i].1))
    }

    fn snapshot(&self) -> Vec<(SharedKey, EntrySlot)> {
        self.order
            .iter()
            .map(|(key, slot)| (Arc::clone(key), Arc::clone(slot)))
            .collect()
    }
}

/// One accumulator entry as seen at the time of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializationEntry {
    pub key: SerializationKey,
    pub checksums: Vec<String>,
}

/// Accumulates which classes take part in serialization and the checksums
/// seen for each.
///
/// Safe to share between any number of producer threads. Keys are kept in
/// first-insertion order, so identical call sequences print identical
/// documents. Each entry's checksums sit behind their own lock, which makes
/// lookup-or-create followed by the merge atomic per key. The table lock is
/// never held while waiting on an entry lock, and no entry lock is held while
/// writing to a sink. Entries are never removed.
#[derive(Default)]
pub struct SerializationConfig {
    entries: RwLock<Entries>,
}

impl SerializationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_target<I, S>(
        &self,
        target_class: &str,
        custom_constructor_class: Option<&str>,
        checksums: I,
    ) where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = SerializationKey::new(target_class, custom_constructor_class);
        let slot = self.slot_for(key);
        let added = slot.lock().extend(checksums);
        trace!("Recorded {} new checksum(s) for {}", added, target_class);
    }

    pub fn record_checksum(&self, target_class: &str, checksum: Option<&str>) {
        self.record_target(target_class, None, checksum);
    }

    /// Only entries without a custom constructor class are consulted.
    pub fn contains(&self, target_class: &str, checksum: &str) -> bool {
        let key = SerializationKey::new(target_class, None);
        let slot = self.entries.read().get(&key);
        slot.is_some_and(|slot| slot.lock().contains(checksum))
    }

    pub fn checksums_of(
        &self,
        target_class: &str,
        custom_constructor_class: Option<&str>,
    ) -> Option<Vec<String>> {
        let key = SerializationKey::new(target_class, custom_constructor_class);
        let slot = self.entries.read().get(&key);
        slot.map(|slot| slot.lock().to_vec())
    }

    pub fn len(&self) -> usize {
        self.entries.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> Vec<SerializationEntry> {
        let snapshot = self.entries.read().snapshot();
        snapshot
            .into_iter()
            .map(|(key, slot)| SerializationEntry {
                key: SerializationKey::clone(&key),
                checksums: slot.lock().to_vec(),
            })
            .collect()
    }

    /// Records every entry of `other` into `self`.
    pub fn merge_from(&self, other: &SerializationConfig) {
        if std::ptr::eq(self, other) {
            return;
        }
        for entry in other.entries() {
            self.record_target(
                &entry.key.target_class,
                entry.key.custom_constructor_class.as_deref(),
                &entry.checksums,
            );
        }
    }

    /// Prints the document to `sink` and flushes it.
    pub fn write_to<W: Write>(&self, sink: W) -> Result<()> {
        let mut writer = JsonWriter::new(sink);
        self.print_json(&mut writer)?;
        writer.flush()
    }

    fn slot_for(&self, key: SerializationKey) -> EntrySlot {
        if let Some(slot) = self.entries.read().get(&key) {
            return slot;
        }

        let mut entries = self.entries.write();
        if let Some(slot) = entries.get(&key) {
            return slot;
        }
        debug!("New serialization target: {}", key);
        let key: SharedKey = Arc::new(key);
        let slot: EntrySlot = Arc::default();
        let position = entries.order.len();
        entries.order.push((Arc::clone(&key), Arc::clone(&slot)));
        entries.index.insert(key, position);
        slot
    }
}

impl JsonPrintable for SerializationConfig {
    fn print_json<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<()> {
        // Writers may still be running. The entry list is copied up front and
        // each entry's checksums are copied out of its lock before printing.
        let snapshot = self.entries.read().snapshot();

        writer.append("[")?.indent();
        let mut prefix = "";
        for (key, slot) in &snapshot {
            writer.append(prefix)?;
            writer.newline()?.append("{")?.indent().newline()?;
            writer.quote(NAME_KEY)?.append(": ")?.quote(&key.target_class)?;
            if let Some(ctor) = &key.custom_constructor_class {
                writer.append(",")?.newline()?;
                writer
                    .quote(CUSTOM_TARGET_CONSTRUCTOR_CLASS_KEY)?
                    .append(": ")?
                    .quote(ctor)?;
            }
            let checksums = slot.lock().to_vec();
            if let Some(first) = checksums.first() {
                writer.append(",")?.newline()?;
                writer.quote(CHECKSUM_KEY)?.append(": ")?;
                if checksums.len() == 1 {
                    writer.quote(first)?;
                } else {
                    let joined = checksums
                        .iter()
                        .map(|c| quote_string(c))
                        .collect::<Vec<_>>()
                        .join(", ");
                    writer.append("[")?.append(&joined)?.append("]")?;
                }
            }
            writer.unindent().newline()?.append("}")?;
            prefix = ",";
        }
        writer.unindent().newline()?;
        writer.append("]")?.newline()?;
        Ok(())
    }
}
