//! Node directory — keyed lookup of owner and active status.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use veris_types::{Address, Height, NodeId};

use crate::error::DirectoryError;

/// A registered infrastructure node (the performance subject).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    /// The registering principal; the only identity allowed to change the
    /// node's status.
    pub owner: Address,
    pub active: bool,
    pub registered_at: Height,
}

/// Keyed directory of registered nodes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeDirectory {
    nodes: HashMap<NodeId, NodeRecord>,
}

impl NodeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node under `owner`. A node id can be registered once.
    pub fn register(
        &mut self,
        id: NodeId,
        owner: Address,
        height: Height,
    ) -> Result<(), DirectoryError> {
        if self.nodes.contains_key(&id) {
            return Err(DirectoryError::AlreadyRegistered(id.to_string()));
        }
        self.nodes.insert(
            id.clone(),
            NodeRecord {
                id,
                owner,
                active: true,
                registered_at: height,
            },
        );
        Ok(())
    }

    /// Change a node's active flag. Only the owner may do this; the admin
    /// path in the node facade uses [`set_active_admin`](Self::set_active_admin).
    pub fn set_active(
        &mut self,
        id: &NodeId,
        caller: &Address,
        active: bool,
    ) -> Result<(), DirectoryError> {
        let record = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| DirectoryError::UnknownNode(id.to_string()))?;
        if &record.owner != caller {
            return Err(DirectoryError::NotOwner {
                node: id.to_string(),
                caller: caller.to_string(),
            });
        }
        record.active = active;
        Ok(())
    }

    /// Change a node's active flag without an ownership check.
    /// The caller is responsible for authorization (admin capability).
    pub fn set_active_admin(&mut self, id: &NodeId, active: bool) -> Result<(), DirectoryError> {
        let record = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| DirectoryError::UnknownNode(id.to_string()))?;
        record.active = active;
        Ok(())
    }

    pub fn get(&self, id: &NodeId) -> Option<&NodeRecord> {
        self.nodes.get(id)
    }

    pub fn owner_of(&self, id: &NodeId) -> Option<&Address> {
        self.nodes.get(id).map(|n| &n.owner)
    }

    pub fn is_registered(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn is_active(&self, id: &NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.active)
    }

    /// Whether `caller` owns any registered node.
    pub fn owns_any(&self, caller: &Address) -> bool {
        self.nodes.values().any(|n| &n.owner == caller)
    }

    /// All node ids owned by `caller`.
    pub fn nodes_of(&self, caller: &Address) -> Vec<&NodeId> {
        self.nodes
            .values()
            .filter(|n| &n.owner == caller)
            .map(|n| &n.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(format!("vrs_{s}"))
    }

    fn nid(s: &str) -> NodeId {
        NodeId::new(s)
    }

    #[test]
    fn register_then_lookup() {
        let mut dir = NodeDirectory::new();
        dir.register(nid("n1"), addr("alice"), Height::new(10)).unwrap();

        assert!(dir.is_registered(&nid("n1")));
        assert!(dir.is_active(&nid("n1")));
        assert_eq!(dir.owner_of(&nid("n1")), Some(&addr("alice")));
        assert_eq!(dir.get(&nid("n1")).unwrap().registered_at, Height::new(10));
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut dir = NodeDirectory::new();
        dir.register(nid("n1"), addr("alice"), Height::new(0)).unwrap();
        let err = dir.register(nid("n1"), addr("bob"), Height::new(1)).unwrap_err();
        assert_eq!(err, DirectoryError::AlreadyRegistered("n1".into()));
        // First registration wins.
        assert_eq!(dir.owner_of(&nid("n1")), Some(&addr("alice")));
    }

    #[test]
    fn owner_can_deactivate_and_reactivate() {
        let mut dir = NodeDirectory::new();
        dir.register(nid("n1"), addr("alice"), Height::new(0)).unwrap();

        dir.set_active(&nid("n1"), &addr("alice"), false).unwrap();
        assert!(!dir.is_active(&nid("n1")));
        assert!(dir.is_registered(&nid("n1")), "deactivation is a soft flag");

        dir.set_active(&nid("n1"), &addr("alice"), true).unwrap();
        assert!(dir.is_active(&nid("n1")));
    }

    #[test]
    fn non_owner_cannot_change_status() {
        let mut dir = NodeDirectory::new();
        dir.register(nid("n1"), addr("alice"), Height::new(0)).unwrap();

        let err = dir.set_active(&nid("n1"), &addr("mallory"), false).unwrap_err();
        assert!(matches!(err, DirectoryError::NotOwner { .. }));
        assert!(dir.is_active(&nid("n1")));
    }

    #[test]
    fn admin_path_skips_ownership() {
        let mut dir = NodeDirectory::new();
        dir.register(nid("n1"), addr("alice"), Height::new(0)).unwrap();
        dir.set_active_admin(&nid("n1"), false).unwrap();
        assert!(!dir.is_active(&nid("n1")));
    }

    #[test]
    fn unknown_node_errors() {
        let mut dir = NodeDirectory::new();
        assert_eq!(
            dir.set_active(&nid("ghost"), &addr("a"), false).unwrap_err(),
            DirectoryError::UnknownNode("ghost".into())
        );
        assert_eq!(
            dir.set_active_admin(&nid("ghost"), false).unwrap_err(),
            DirectoryError::UnknownNode("ghost".into())
        );
        assert!(!dir.is_active(&nid("ghost")));
        assert!(dir.owner_of(&nid("ghost")).is_none());
    }

    #[test]
    fn nodes_of_lists_only_callers_nodes() {
        let mut dir = NodeDirectory::new();
        dir.register(nid("n1"), addr("alice"), Height::new(0)).unwrap();
        dir.register(nid("n2"), addr("alice"), Height::new(0)).unwrap();
        dir.register(nid("n3"), addr("bob"), Height::new(0)).unwrap();

        let mut owned = dir.nodes_of(&addr("alice"));
        owned.sort();
        assert_eq!(owned, vec![&nid("n1"), &nid("n2")]);
        assert!(dir.owns_any(&addr("bob")));
        assert!(!dir.owns_any(&addr("carol")));
    }
}
