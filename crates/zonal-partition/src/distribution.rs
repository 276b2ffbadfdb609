//! Materialised partition assignments.

use zonal_core::PartitionError;

/// A partition assignment over a grid's points, plus per-partition counts.
///
/// Owns its assignment so it can be computed once and reused by every
/// function space built on the same decomposition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Distribution {
    part: Vec<u32>,
    nb_partitions: usize,
    nb_pts: Vec<usize>,
}

impl Distribution {
    /// Wrap an assignment, validating that every id is in range.
    pub fn from_assignment(part: Vec<u32>, nb_partitions: usize) -> Result<Self, PartitionError> {
        let mut nb_pts = vec![0usize; nb_partitions];
        for (point, &p) in part.iter().enumerate() {
            match nb_pts.get_mut(p as usize) {
                Some(count) => *count += 1,
                None => {
                    return Err(PartitionError::AssignmentOutOfRange {
                        point,
                        partition: p,
                        nb_partitions,
                    })
                }
            }
        }
        Ok(Self {
            part,
            nb_partitions,
            nb_pts,
        })
    }

    /// A distribution that puts every point on partition 0.
    pub fn serial(npts: usize) -> Self {
        Self {
            part: vec![0; npts],
            nb_partitions: 1,
            nb_pts: vec![npts],
        }
    }

    /// Partition of a point, or `None` if the index is out of range.
    pub fn partition(&self, point: usize) -> Option<u32> {
        self.part.get(point).copied()
    }

    /// Number of partitions.
    pub fn nb_partitions(&self) -> usize {
        self.nb_partitions
    }

    /// Number of points covered.
    pub fn npts(&self) -> usize {
        self.part.len()
    }

    /// Points per partition.
    pub fn nb_pts(&self) -> &[usize] {
        &self.nb_pts
    }

    /// Size of the largest partition.
    pub fn max_pts(&self) -> usize {
        self.nb_pts.iter().copied().max().unwrap_or(0)
    }

    /// Size of the smallest partition.
    pub fn min_pts(&self) -> usize {
        self.nb_pts.iter().copied().min().unwrap_or(0)
    }

    /// The full assignment, indexed by global point.
    pub fn as_slice(&self) -> &[u32] {
        &self.part
    }

    /// Global indices of the points on partition `part`, ascending.
    pub fn owned_points(&self, part: u32) -> Vec<usize> {
        self.part
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p == part)
            .map(|(i, _)| i)
            .collect()
    }
}
