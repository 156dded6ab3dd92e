//! Dock group membership table
//!
//! Every window stores the id of the group it belongs to; the table maps ids to
//! ordered member lists. Ids are never reused, so a retired id can never be
//! observed with new members after a group is split.

use std::collections::HashMap;
use std::fmt;

use crate::app::controller::WindowId;

/// Identity of a dock group
///
/// Two windows are in the same group if and only if they store the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

/// Table of live dock groups
#[derive(Debug, Default)]
pub struct GroupTable {
    groups: HashMap<GroupId, Vec<WindowId>>,
    next_id: u64,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh group containing only `window`
    pub fn create_singleton(&mut self, window: WindowId) -> GroupId {
        let id = GroupId(self.next_id);
        self.next_id += 1;
        self.groups.insert(id, vec![window]);
        id
    }

    /// Members of a group in insertion order; empty for a retired id
    pub fn members(&self, id: GroupId) -> &[WindowId] {
        self.groups.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, id: GroupId) -> usize {
        self.members(id).len()
    }

    pub fn contains(&self, id: GroupId, window: WindowId) -> bool {
        self.members(id).contains(&window)
    }

    pub fn is_live(&self, id: GroupId) -> bool {
        self.groups.contains_key(&id)
    }

    /// Appends `window` to a live group; returns false if it was already a member
    pub fn push(&mut self, id: GroupId, window: WindowId) -> bool {
        match self.groups.get_mut(&id) {
            Some(members) if !members.contains(&window) => {
                members.push(window);
                true
            }
            _ => false,
        }
    }

    /// Retires a group, returning its former members
    pub fn retire(&mut self, id: GroupId) -> Vec<WindowId> {
        self.groups.remove(&id).unwrap_or_default()
    }

    /// Number of live groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}
