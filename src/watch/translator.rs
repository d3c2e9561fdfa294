use tracing::trace;

use super::SnapshotCache;
use crate::codec::RecordCodec;
use crate::models::Change;
use crate::models::LrpRecord;
use crate::DecodeError;
use crate::RawMutation;

/// Turns raw mutations into typed changes for one record kind.
///
/// Keeps the last value seen per key so it can report "before" without the
/// store's help, and so rewrites of identical content are not reported.
pub struct ChangeTranslator<C: RecordCodec> {
    codec: C,
    snapshot: SnapshotCache<C::Record>,
}

impl<C: RecordCodec> ChangeTranslator<C> {
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            snapshot: SnapshotCache::new(),
        }
    }

    /// Interpret one mutation.
    ///
    /// Returns `Ok(None)` when there is nothing to report: a rewrite of the
    /// value already seen, or a delete of a key this translator never saw.
    /// A decode failure leaves the snapshot untouched.
    pub fn translate(
        &mut self,
        mutation: RawMutation,
    ) -> Result<Option<Change<C::Record>>, DecodeError> {
        let kind = <C::Record as LrpRecord>::KIND;
        match mutation {
            RawMutation::Set { key, value } => {
                let after = self.codec.decode(&key, &value)?;

                if self.snapshot.get(&key) == Some(&after) {
                    trace!(key = %key, kind, "Unchanged value, skipping");
                    return Ok(None);
                }

                let change = match self.snapshot.insert(key, after.clone()) {
                    Some(before) => Change::updated(before, after),
                    None => Change::created(after),
                };
                Ok(Some(change))
            }
            RawMutation::Delete { key } => match self.snapshot.remove(&key) {
                Some(before) => Ok(Some(Change::deleted(before))),
                None => {
                    trace!(key = %key, kind, "Delete of unseen key, skipping");
                    Ok(None)
                }
            },
        }
    }

    pub fn snapshot(&self) -> &SnapshotCache<C::Record> {
        &self.snapshot
    }
}
