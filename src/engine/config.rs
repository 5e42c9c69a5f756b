/*!
 * Engine Configuration
 * Partition layout and capacity/safety limits with reference defaults
 */

use crate::core::errors::EngineError;
use crate::core::types::{EngineResult, Tick};
use crate::memory::PartitionSpec;
use serde::{Deserialize, Serialize};

/// Fixed configuration for a simulation run. The defaults reproduce the
/// reference system: one reserved OS partition plus three allocatable
/// partitions of distinct capacities, 5 system slots, 3 memory residents,
/// a cohort of 10 and a 500-tick safety bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    pub partitions: Vec<PartitionSpec>,
    /// Max processes simultaneously in {Suspended, Ready, Running}
    pub system_slot_limit: usize,
    /// Max processes simultaneously in {Ready, Running}
    pub memory_resident_limit: usize,
    /// Max processes selected for simulation from the supplied definitions
    pub cohort_limit: usize,
    /// Livelock guard: ticks after which the run is declared abnormal
    pub safety_tick_limit: Tick,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            partitions: vec![
                PartitionSpec::reserved(100),
                PartitionSpec::user(250),
                PartitionSpec::user(150),
                PartitionSpec::user(50),
            ],
            system_slot_limit: 5,
            memory_resident_limit: 3,
            cohort_limit: 10,
            safety_tick_limit: 500,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> EngineResult<()> {
        for (index, spec) in self.partitions.iter().enumerate() {
            if spec.capacity == 0 {
                return Err(EngineError::ZeroCapacityPartition { index });
            }
        }
        if !self.partitions.iter().any(|p| !p.reserved) {
            return Err(EngineError::NoAllocatablePartition);
        }
        if self.system_slot_limit == 0 {
            return Err(EngineError::ZeroLimit {
                name: "system_slot_limit",
            });
        }
        if self.memory_resident_limit == 0 {
            return Err(EngineError::ZeroLimit {
                name: "memory_resident_limit",
            });
        }
        if self.cohort_limit == 0 {
            return Err(EngineError::ZeroLimit {
                name: "cohort_limit",
            });
        }
        if self.safety_tick_limit == 0 {
            return Err(EngineError::ZeroLimit {
                name: "safety_tick_limit",
            });
        }
        Ok(())
    }
}
