//! In-memory subscription store with transactional writes

use crate::error::StoreError;
use crate::records::ToRecords;
use crate::store::{InstanceData, InstanceRecord, Relation, SubscriptionRecord, SubscriptionStore};
use parking_lot::RwLock;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use portclaim_lifecycle::status::validate_transition;
use portclaim_lifecycle::{InstanceId, ProductType, SubscriptionId, SubscriptionStatus};
use portclaim_ranges::VlanRangeSet;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
struct Tables {
    subscriptions: HashMap<SubscriptionId, SubscriptionRecord>,
    instances: HashMap<InstanceId, InstanceRecord>,
    owned: HashMap<SubscriptionId, Vec<InstanceId>>,
    /// Edges point from dependency to dependent ("in use by")
    relations: DiGraphMap<InstanceId, ()>,
}

#[derive(Debug, Clone)]
enum Write {
    InsertSubscription(SubscriptionRecord),
    InsertInstance(InstanceRecord),
    Relate(Relation),
    Unrelate(Relation),
    SetStatus {
        id: SubscriptionId,
        status: SubscriptionStatus,
    },
    SetVlan {
        id: InstanceId,
        vlan: VlanRangeSet,
    },
}

impl Tables {
    fn apply(&mut self, write: Write) -> Result<(), StoreError> {
        match write {
            Write::InsertSubscription(record) => {
                let id = record.subscription_id;
                if self.subscriptions.contains_key(&id) {
                    return Err(StoreError::DuplicateSubscription(id));
                }
                self.subscriptions.insert(id, record);
                self.owned.entry(id).or_default();
            }
            Write::InsertInstance(record) => {
                let id = record.instance_id;
                if self.instances.contains_key(&id) {
                    return Err(StoreError::DuplicateInstance(id));
                }
                if !self.subscriptions.contains_key(&record.subscription_id) {
                    return Err(StoreError::UnknownSubscription(record.subscription_id));
                }
                self.owned.entry(record.subscription_id).or_default().push(id);
                self.relations.add_node(id);
                self.instances.insert(id, record);
            }
            Write::Relate(relation) => {
                if relation.dependency == relation.dependent {
                    return Err(StoreError::SelfRelation(relation.dependent));
                }
                for id in [relation.dependency, relation.dependent] {
                    if !self.instances.contains_key(&id) {
                        return Err(StoreError::UnknownInstance(id));
                    }
                }
                self.relations.add_edge(relation.dependency, relation.dependent, ());
            }
            Write::Unrelate(relation) => {
                self.relations.remove_edge(relation.dependency, relation.dependent);
            }
            Write::SetStatus { id, status } => {
                let record = self
                    .subscriptions
                    .get_mut(&id)
                    .ok_or(StoreError::UnknownSubscription(id))?;
                validate_transition(record.status, status)?;
                record.status = status;
            }
            Write::SetVlan { id, vlan } => {
                let record = self
                    .instances
                    .get_mut(&id)
                    .ok_or(StoreError::UnknownInstance(id))?;
                match &mut record.data {
                    InstanceData::Sap { vlan: current } => *current = vlan,
                    _ => return Err(StoreError::NotAClaim(id)),
                }
            }
        }
        Ok(())
    }
}

/// Subscription store held in memory
///
/// Reads take a shared lock; [`StoreTransaction::commit`] applies every staged
/// write under one exclusive lock, or none of them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts staging writes
    #[must_use]
    pub fn begin(&self) -> StoreTransaction<'_> {
        StoreTransaction {
            store: self,
            writes: Vec::new(),
        }
    }

    /// Number of subscriptions
    pub fn subscription_count(&self) -> usize {
        self.inner.read().subscriptions.len()
    }

    /// Number of block instances
    pub fn instance_count(&self) -> usize {
        self.inner.read().instances.len()
    }

    /// Number of relations
    pub fn relation_count(&self) -> usize {
        self.inner.read().relations.edge_count()
    }
}

impl SubscriptionStore for MemoryStore {
    fn subscription(&self, id: SubscriptionId) -> Result<SubscriptionRecord, StoreError> {
        self.inner
            .read()
            .subscriptions
            .get(&id)
            .cloned()
            .ok_or(StoreError::UnknownSubscription(id))
    }

    fn instances_of(&self, id: SubscriptionId) -> Result<Vec<InstanceRecord>, StoreError> {
        let tables = self.inner.read();
        let owned = tables
            .owned
            .get(&id)
            .ok_or(StoreError::UnknownSubscription(id))?;
        Ok(owned
            .iter()
            .filter_map(|instance| tables.instances.get(instance).cloned())
            .collect())
    }

    fn instance(&self, id: InstanceId) -> Result<InstanceRecord, StoreError> {
        self.inner
            .read()
            .instances
            .get(&id)
            .cloned()
            .ok_or(StoreError::UnknownInstance(id))
    }

    fn in_use_by(&self, id: InstanceId) -> Result<Vec<InstanceId>, StoreError> {
        let tables = self.inner.read();
        if !tables.instances.contains_key(&id) {
            return Err(StoreError::UnknownInstance(id));
        }
        Ok(tables
            .relations
            .neighbors_directed(id, Direction::Outgoing)
            .collect())
    }

    fn subscriptions_by_product(&self, product_type: ProductType) -> Vec<SubscriptionRecord> {
        let tables = self.inner.read();
        let mut found: Vec<_> = tables
            .subscriptions
            .values()
            .filter(|record| record.product_type == product_type)
            .cloned()
            .collect();
        found.sort_by_key(|record| record.subscription_id);
        found
    }
}

/// Writes staged against a [`MemoryStore`]
///
/// Nothing is visible to readers until [`commit`](Self::commit). Dropping the
/// transaction without committing discards the staged writes.
#[derive(Debug)]
pub struct StoreTransaction<'a> {
    store: &'a MemoryStore,
    writes: Vec<Write>,
}

impl StoreTransaction<'_> {
    /// Stages a new subscription
    pub fn insert_subscription(&mut self, record: SubscriptionRecord) -> &mut Self {
        self.writes.push(Write::InsertSubscription(record));
        self
    }

    /// Stages a new block instance
    pub fn insert_instance(&mut self, record: InstanceRecord) -> &mut Self {
        self.writes.push(Write::InsertInstance(record));
        self
    }

    /// Stages every instance and relation of a block tree
    pub fn insert_blocks<T: ToRecords>(&mut self, subscription_id: SubscriptionId, root: &T) -> &mut Self {
        let records = root.to_records(subscription_id);
        self.writes
            .extend(records.instances.into_iter().map(Write::InsertInstance));
        self.writes
            .extend(records.relations.into_iter().map(Write::Relate));
        self
    }

    /// Stages "`dependent` depends on `dependency`"
    pub fn relate(&mut self, dependency: InstanceId, dependent: InstanceId) -> &mut Self {
        self.writes
            .push(Write::Relate(Relation::new(dependency, dependent)));
        self
    }

    /// Stages removal of a relation
    pub fn unrelate(&mut self, dependency: InstanceId, dependent: InstanceId) -> &mut Self {
        self.writes
            .push(Write::Unrelate(Relation::new(dependency, dependent)));
        self
    }

    /// Stages a status change, checked against the status state machine on commit
    pub fn set_status(&mut self, id: SubscriptionId, status: SubscriptionStatus) -> &mut Self {
        self.writes.push(Write::SetStatus { id, status });
        self
    }

    /// Stages a new VLAN claim for a SAP instance
    pub fn set_vlan(&mut self, id: InstanceId, vlan: VlanRangeSet) -> &mut Self {
        self.writes.push(Write::SetVlan { id, vlan });
        self
    }

    /// Number of staged writes
    #[must_use]
    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    /// Applies every staged write atomically
    ///
    /// On error the store is left untouched.
    pub fn commit(mut self) -> Result<(), StoreError> {
        let writes = std::mem::take(&mut self.writes);
        let count = writes.len();
        let mut tables = self.store.inner.write();
        let mut next = tables.clone();
        for write in writes {
            next.apply(write)?;
        }
        *tables = next;
        debug!(writes = count, "store transaction committed");
        Ok(())
    }

    /// Discards every staged write
    pub fn rollback(self) {}
}

impl Drop for StoreTransaction<'_> {
    fn drop(&mut self) {
        if !self.writes.is_empty() {
            debug!(writes = self.writes.len(), "store transaction rolled back");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portclaim_lifecycle::PortMode;

    fn port_subscription(store: &MemoryStore) -> (SubscriptionId, InstanceId) {
        let sub = SubscriptionId::new();
        let port = InstanceId::new();
        let mut tx = store.begin();
        tx.insert_subscription(SubscriptionRecord::new(
            sub,
            ProductType::Port,
            SubscriptionStatus::Active,
        ))
        .insert_instance(InstanceRecord::new(
            port,
            sub,
            InstanceData::Port {
                name: "xe-0/0/0".into(),
                mode: PortMode::Tagged,
            },
        ));
        tx.commit().unwrap();
        (sub, port)
    }

    #[test]
    fn test_commit_makes_writes_visible() {
        let store = MemoryStore::new();
        let (sub, port) = port_subscription(&store);
        assert_eq!(store.subscription(sub).unwrap().status, SubscriptionStatus::Active);
        assert_eq!(store.instances_of(sub).unwrap().len(), 1);
        assert!(store.in_use_by(port).unwrap().is_empty());
    }

    #[test]
    fn test_drop_rolls_back() {
        let store = MemoryStore::new();
        {
            let mut tx = store.begin();
            tx.insert_subscription(SubscriptionRecord::new(
                SubscriptionId::new(),
                ProductType::L2vpn,
                SubscriptionStatus::Provisioning,
            ));
            assert_eq!(tx.pending(), 1);
        }
        assert_eq!(store.subscription_count(), 0);
    }

    #[test]
    fn test_failed_commit_applies_nothing() {
        let store = MemoryStore::new();
        let (_, port) = port_subscription(&store);
        let sub = SubscriptionId::new();
        let sap = InstanceId::new();
        let mut tx = store.begin();
        tx.insert_subscription(SubscriptionRecord::new(
            sub,
            ProductType::L2vpn,
            SubscriptionStatus::Provisioning,
        ))
        .insert_instance(InstanceRecord::new(
            sap,
            sub,
            InstanceData::Sap {
                vlan: VlanRangeSet::single(10).unwrap(),
            },
        ))
        .relate(port, sap)
        .relate(InstanceId::new(), sap);
        assert!(matches!(tx.commit(), Err(StoreError::UnknownInstance(_))));
        assert_eq!(store.subscription_count(), 1);
        assert_eq!(store.relation_count(), 0);
    }

    #[test]
    fn test_status_change_follows_state_machine() {
        let store = MemoryStore::new();
        let (sub, _) = port_subscription(&store);
        let mut tx = store.begin();
        tx.set_status(sub, SubscriptionStatus::Initial);
        assert!(matches!(tx.commit(), Err(StoreError::Lifecycle(_))));

        let mut tx = store.begin();
        tx.set_status(sub, SubscriptionStatus::Terminated);
        tx.commit().unwrap();
        assert_eq!(
            store.subscription(sub).unwrap().status,
            SubscriptionStatus::Terminated
        );
    }

    #[test]
    fn test_vlan_only_on_saps() {
        let store = MemoryStore::new();
        let (_, port) = port_subscription(&store);
        let mut tx = store.begin();
        tx.set_vlan(port, VlanRangeSet::single(5).unwrap());
        assert!(matches!(tx.commit(), Err(StoreError::NotAClaim(_))));
    }
}
