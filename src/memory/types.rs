/*!
 * Memory Types
 * Fixed partition descriptions and occupancy metadata
 */

use crate::core::types::{Address, Pid, Size};
use serde::{Deserialize, Serialize};

/// Index into the partition table
pub type PartitionId = usize;

/// Host-supplied partition description. The layout is fixed configuration:
/// it never changes for the lifetime of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PartitionSpec {
    /// Capacity in KB
    pub capacity: Size,
    /// Reserved for the operating system, never allocatable
    pub reserved: bool,
}

impl PartitionSpec {
    pub fn user(capacity: Size) -> Self {
        Self {
            capacity,
            reserved: false,
        }
    }

    pub fn reserved(capacity: Size) -> Self {
        Self {
            capacity,
            reserved: true,
        }
    }
}

/// Current occupant of a partition. Size is cached so fragmentation is
/// computable without a table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PartitionOccupant {
    pub pid: Pid,
    pub size: Size,
}

/// A fixed memory partition. At most one occupant at any time, and
/// `occupant.size <= capacity` always holds while occupied.
#[derive(Debug, Clone)]
pub struct Partition {
    pub id: PartitionId,
    pub base_address: Address,
    pub capacity: Size,
    pub reserved: bool,
    pub occupant: Option<PartitionOccupant>,
}

impl Partition {
    /// Free for user allocation: unoccupied and not the OS partition.
    pub fn is_free(&self) -> bool {
        self.occupant.is_none() && !self.reserved
    }

    pub fn fits(&self, size: Size) -> bool {
        size <= self.capacity
    }

    /// Unused capacity within the occupied partition (0 when free).
    pub fn internal_fragmentation(&self) -> Size {
        match self.occupant {
            Some(occ) => self.capacity - occ.size,
            None => 0,
        }
    }
}
