//! Point-in-time reads for publication.

use patrol_common::StateSnapshot;

use crate::store::EntityStore;

impl EntityStore {
    /// Copy every incident and officer in store order.
    ///
    /// Links are published as ids only (`officerID` on incidents, nothing on
    /// officers), so the result serializes without cycles.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            incidents: self.incidents().to_vec(),
            officers: self.officers().to_vec(),
        }
    }
}
