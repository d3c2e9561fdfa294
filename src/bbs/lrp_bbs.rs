use std::sync::Arc;

use tracing::debug;
use tracing::instrument;

use crate::codec::BincodeCodec;
use crate::codec::RecordCodec;
use crate::models::ActualLRP;
use crate::models::ActualLRPState;
use crate::models::DesiredLRP;
use crate::models::LrpRecord;
use crate::schema::desired_lrp_schema_path_by_process_guid;
use crate::Result;
use crate::WatchError;
use crate::WatchableStore;

/// Record-level operations on desired and actual LRPs
#[derive(Debug)]
pub struct LrpBbs<S> {
    store: Arc<S>,
}

impl<S> Clone for LrpBbs<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: WatchableStore> LrpBbs<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, lrp), fields(process_guid = %lrp.process_guid))]
    pub fn desire_lrp(
        &self,
        lrp: &DesiredLRP,
    ) -> Result<()> {
        self.put(lrp)
    }

    pub fn remove_desired_lrp_by_process_guid(
        &self,
        process_guid: &str,
    ) -> Result<bool> {
        let removed = self
            .store
            .delete(&desired_lrp_schema_path_by_process_guid(process_guid))?;
        debug!(process_guid, removed, "Removed desired LRP");
        Ok(removed)
    }

    pub fn desired_lrp_by_process_guid(
        &self,
        process_guid: &str,
    ) -> Result<Option<DesiredLRP>> {
        self.get(&desired_lrp_schema_path_by_process_guid(process_guid))
    }

    /// Store `lrp` in the `Starting` state and return what was stored
    pub fn report_actual_lrp_as_starting(
        &self,
        lrp: &ActualLRP,
    ) -> Result<ActualLRP> {
        self.report_actual_lrp(lrp, ActualLRPState::Starting)
    }

    /// Store `lrp` in the `Running` state and return what was stored
    pub fn report_actual_lrp_as_running(
        &self,
        lrp: &ActualLRP,
    ) -> Result<ActualLRP> {
        self.report_actual_lrp(lrp, ActualLRPState::Running)
    }

    pub fn remove_actual_lrp(
        &self,
        lrp: &ActualLRP,
    ) -> Result<bool> {
        let removed = self.store.delete(&lrp.schema_path())?;
        debug!(
            process_guid = %lrp.process_guid,
            index = lrp.index,
            removed,
            "Removed actual LRP"
        );
        Ok(removed)
    }

    pub fn actual_lrp(
        &self,
        key: &str,
    ) -> Result<Option<ActualLRP>> {
        self.get(key)
    }

    #[instrument(skip(self, lrp), fields(process_guid = %lrp.process_guid, index = lrp.index))]
    fn report_actual_lrp(
        &self,
        lrp: &ActualLRP,
        state: ActualLRPState,
    ) -> Result<ActualLRP> {
        let mut reported = lrp.clone();
        reported.state = state;
        self.put(&reported)?;
        Ok(reported)
    }

    fn put<T: LrpRecord>(
        &self,
        record: &T,
    ) -> Result<()> {
        let raw = BincodeCodec::<T>::new().encode(record)?;
        self.store.set(&record.schema_path(), raw)?;
        Ok(())
    }

    fn get<T: LrpRecord>(
        &self,
        key: &str,
    ) -> Result<Option<T>> {
        match self.store.get(key)? {
            Some(raw) => {
                let record = BincodeCodec::<T>::new()
                    .decode(key, &raw)
                    .map_err(WatchError::Decode)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}
