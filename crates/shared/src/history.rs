//! Drill-down navigation through discovered locations.
//!
//! The modal shows the top of a selection stack. Selecting a location from the
//! map starts a fresh stack; selecting one of its sub-locations pushes onto it.
//! The stack holds ids only; entries are resolved against the current location
//! set on every read, so renames, moves and removals by the owner show up
//! immediately and removed entries read as absent.

use tracing::debug;

use crate::models::{find_location, find_region, Location, LocationId, Region};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationHistory {
    stack: Vec<LocationId>,
}

impl LocationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh top-level selection: the stack becomes `[id]` and the modal opens.
    pub fn select_root(&mut self, id: LocationId) {
        debug!(id = %id, "drill-down opened");
        self.stack.clear();
        self.stack.push(id);
    }

    /// Push a sub-location. Ignored while the modal is closed.
    pub fn select_sub(&mut self, id: LocationId) {
        if self.stack.is_empty() {
            return;
        }
        debug!(id = %id, depth = self.stack.len() + 1, "drill-down pushed");
        self.stack.push(id);
    }

    /// Pop back to the previous selection. Only allowed with more than one
    /// entry; returns the new top.
    pub fn back(&mut self) -> Option<&LocationId> {
        if !self.can_go_back() {
            return None;
        }
        self.stack.pop();
        debug!(depth = self.stack.len(), "drill-down back");
        self.stack.last()
    }

    pub fn close(&mut self) {
        self.stack.clear();
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    pub fn is_open(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn current_id(&self) -> Option<&LocationId> {
        self.stack.last()
    }

    /// Currently displayed location, looked up in `locations`. `None` when the
    /// modal is closed or the owner no longer has that location.
    pub fn current<'a>(&self, locations: &'a [Location]) -> Option<&'a Location> {
        self.current_id().and_then(|id| find_location(locations, id))
    }

    /// Selection path from the root, skipping entries that no longer resolve.
    pub fn path<'a>(&self, locations: &'a [Location]) -> Vec<&'a Location> {
        self.stack
            .iter()
            .filter_map(|id| find_location(locations, id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn entries(&self) -> &[LocationId] {
        &self.stack
    }
}

/// All locations whose parent is `parent_id`, in discovery order.
pub fn sub_locations<'a>(locations: &'a [Location], parent_id: &str) -> Vec<&'a Location> {
    locations
        .iter()
        .filter(|l| l.parent_location_id.as_deref() == Some(parent_id))
        .collect()
}

/// Region name for display; empty when the region is unset or unknown.
pub fn region_name<'a>(regions: &'a [Region], location: &Location) -> &'a str {
    location
        .region_id
        .as_deref()
        .and_then(|id| find_region(regions, id))
        .map(|r| r.name.as_str())
        .unwrap_or("")
}

/// Connected locations that are still known; unknown ids are omitted.
pub fn connected_locations<'a>(
    locations: &'a [Location],
    location: &Location,
) -> Vec<&'a Location> {
    location
        .connections
        .iter()
        .filter_map(|id| find_location(locations, id))
        .collect()
}
