/*!
 * Memory Management
 * Owns the fixed partition table and applies Best-Fit placement
 */

use super::types::{Partition, PartitionId, PartitionOccupant, PartitionSpec};
use crate::core::types::{Pid, Size};
use log::info;

pub struct MemoryManager {
    partitions: Vec<Partition>,
}

impl MemoryManager {
    /// Build the partition table from the configured layout. Base addresses
    /// accumulate in declaration order.
    pub fn new(layout: &[PartitionSpec]) -> Self {
        let mut base = 0;
        let partitions = layout
            .iter()
            .enumerate()
            .map(|(id, spec)| {
                let p = Partition {
                    id,
                    base_address: base,
                    capacity: spec.capacity,
                    reserved: spec.reserved,
                    occupant: None,
                };
                base += spec.capacity;
                p
            })
            .collect::<Vec<_>>();

        info!(
            "Memory manager initialized: {} partitions, {} KB total",
            partitions.len(),
            base
        );
        Self { partitions }
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn get(&self, id: PartitionId) -> &Partition {
        &self.partitions[id]
    }

    /// Whether any free partition exists.
    pub fn has_free(&self) -> bool {
        self.partitions.iter().any(|p| p.is_free())
    }

    /// Best-Fit selection: among free partitions that fit `size`, the one
    /// minimizing `capacity - size`, ties broken by smaller capacity (then
    /// by lower partition id, since the scan is stable).
    pub fn best_fit(&self, size: Size) -> Option<PartitionId> {
        self.partitions
            .iter()
            .filter(|p| p.is_free() && p.fits(size))
            .min_by_key(|p| (p.capacity - size, p.capacity))
            .map(|p| p.id)
    }

    /// Whether `size` could ever fit a non-reserved partition, ignoring
    /// occupancy. A process failing this check can never be placed.
    pub fn fits_any(&self, size: Size) -> bool {
        self.partitions
            .iter()
            .any(|p| !p.reserved && p.fits(size))
    }

    /// Largest non-reserved capacity (0 if the layout has none).
    pub fn max_user_capacity(&self) -> Size {
        self.partitions
            .iter()
            .filter(|p| !p.reserved)
            .map(|p| p.capacity)
            .max()
            .unwrap_or(0)
    }

    /// Load a process into a free partition. Returns false (and changes
    /// nothing) if the partition is reserved, occupied, or too small.
    pub fn assign(&mut self, id: PartitionId, pid: Pid, size: Size) -> bool {
        let part = &mut self.partitions[id];
        if !part.is_free() || !part.fits(size) {
            return false;
        }
        part.occupant = Some(PartitionOccupant { pid, size });
        info!(
            "Loaded P{} ({} KB) into partition {} ({} KB), internal fragmentation {} KB",
            pid,
            size,
            id,
            part.capacity,
            part.internal_fragmentation()
        );
        true
    }

    /// Vacate a partition (process terminated or swapped out). Returns the
    /// previous occupant, if any.
    pub fn release(&mut self, id: PartitionId) -> Option<PartitionOccupant> {
        let part = &mut self.partitions[id];
        let occupant = part.occupant.take();
        if let Some(occ) = occupant {
            info!(
                "Freed partition {} ({} KB), was P{}",
                id, part.capacity, occ.pid
            );
        }
        occupant
    }
}
