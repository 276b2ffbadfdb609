//! Function space over the points of a partitioned structured grid.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument, trace};
use zonal_core::{CommError, FieldError};
use zonal_grid::StructuredGrid;
use zonal_partition::Distribution;

use crate::comm::{Communicator, SerialComm};
use crate::function_space::{FunctionSpace, HaloBuffer};
use crate::value::FieldValue;

/// Local nodes exchanged with one peer, ordered by global index.
#[derive(Clone, Debug)]
struct HaloLink {
    peer: usize,
    nodes: Vec<usize>,
}

/// One partition's view of a structured grid.
///
/// Local node order is the owned points in ascending global index,
/// followed by the halo points in ascending global index. The halo of a
/// partition is every point owned elsewhere that neighbours one of its
/// own points (see [`StructuredGrid::neighbours`]).
///
/// Every rank derives the whole exchange topology from the shared
/// [`Distribution`], so building a `StructuredColumns` needs no
/// communication. Both ends of a link list the exchanged points by
/// ascending global index, so payloads need no index headers.
pub struct StructuredColumns {
    grid: Arc<StructuredGrid>,
    partition: usize,
    nb_partitions: usize,
    global_index: Vec<usize>,
    nb_owned: usize,
    send: Vec<HaloLink>,
    recv: Vec<HaloLink>,
    comm: Arc<dyn Communicator>,
}

/// Position of `global` within the ascending slice `sorted`.
fn locate(sorted: &[usize], global: usize) -> usize {
    sorted.partition_point(|&g| g < global)
}

impl StructuredColumns {
    /// Build the layout of partition `comm.rank()` of `distribution`.
    ///
    /// Fails with [`FieldError::Layout`] if the distribution does not
    /// cover `grid` or the communicator size differs from the partition
    /// count.
    #[instrument(skip_all, fields(rank = comm.rank(), nb_partitions = distribution.nb_partitions()))]
    pub fn new(
        grid: Arc<StructuredGrid>,
        distribution: &Distribution,
        comm: Arc<dyn Communicator>,
    ) -> Result<Self, FieldError> {
        if distribution.npts() != grid.npts() {
            return Err(FieldError::Layout {
                what: "distribution points",
                expected: grid.npts(),
                actual: distribution.npts(),
            });
        }
        let nb_partitions = distribution.nb_partitions();
        if comm.size() != nb_partitions {
            return Err(FieldError::Layout {
                what: "communicator size",
                expected: nb_partitions,
                actual: comm.size(),
            });
        }
        let rank = comm.rank();
        let part = distribution.as_slice();

        let mut needed: Vec<Vec<usize>> = vec![Vec::new(); nb_partitions];
        let mut wanted: Vec<Vec<usize>> = vec![Vec::new(); nb_partitions];
        for (point, &owner) in part.iter().enumerate() {
            let owner = owner as usize;
            for q in grid.neighbours(point)? {
                let q_owner = part[q] as usize;
                if q_owner == owner {
                    continue;
                }
                if owner == rank {
                    needed[q_owner].push(q);
                } else if q_owner == rank {
                    wanted[owner].push(q);
                }
            }
        }
        for list in needed.iter_mut().chain(wanted.iter_mut()) {
            list.sort_unstable();
            list.dedup();
        }

        let owned = distribution.owned_points(rank as u32);
        let nb_owned = owned.len();
        let mut halo: Vec<usize> = needed.iter().flatten().copied().collect();
        halo.sort_unstable();

        let recv = needed
            .iter()
            .enumerate()
            .filter(|(_, globals)| !globals.is_empty())
            .map(|(peer, globals)| HaloLink {
                peer,
                nodes: globals.iter().map(|&g| nb_owned + locate(&halo, g)).collect(),
            })
            .collect();
        let send = wanted
            .iter()
            .enumerate()
            .filter(|(_, globals)| !globals.is_empty())
            .map(|(peer, globals)| HaloLink {
                peer,
                nodes: globals.iter().map(|&g| locate(&owned, g)).collect(),
            })
            .collect();

        let mut global_index = owned;
        global_index.extend_from_slice(&halo);

        let fs = Self {
            grid,
            partition: rank,
            nb_partitions,
            global_index,
            nb_owned,
            send,
            recv,
            comm,
        };
        debug!(
            nb_owned = fs.nb_owned,
            nb_halo = fs.nb_halo(),
            peers = fs.recv.len(),
            "structured columns laid out"
        );
        Ok(fs)
    }

    /// Single-partition layout: every point owned, no halo.
    pub fn serial(grid: Arc<StructuredGrid>) -> Result<Self, FieldError> {
        let distribution = Distribution::serial(grid.npts());
        Self::new(grid, &distribution, Arc::new(SerialComm::new()))
    }

    /// The grid being laid out.
    pub fn grid(&self) -> &Arc<StructuredGrid> {
        &self.grid
    }

    /// Partition (rank) this layout belongs to.
    pub fn partition(&self) -> usize {
        self.partition
    }

    /// Total number of partitions.
    pub fn nb_partitions(&self) -> usize {
        self.nb_partitions
    }

    /// Number of owned nodes; they come first in local order.
    pub fn nb_owned(&self) -> usize {
        self.nb_owned
    }

    /// Number of halo nodes; they follow the owned nodes.
    pub fn nb_halo(&self) -> usize {
        self.global_index.len() - self.nb_owned
    }

    /// Global grid index of local node `local`.
    pub fn global_index(&self, local: usize) -> Option<usize> {
        self.global_index.get(local).copied()
    }

    /// Global grid index of every local node, in local order.
    pub fn global_indices(&self) -> &[usize] {
        &self.global_index
    }

    /// Local node holding global point `global`, if it is owned or halo here.
    pub fn local_index(&self, global: usize) -> Option<usize> {
        let (owned, halo) = self.global_index.split_at(self.nb_owned);
        let find = |s: &[usize]| s.binary_search(&global).ok();
        find(owned).or_else(|| find(halo).map(|i| self.nb_owned + i))
    }

    /// Whether local node `local` is a halo copy.
    pub fn is_halo(&self, local: usize) -> bool {
        local >= self.nb_owned && local < self.global_index.len()
    }

    /// Ranks this partition receives halo values from, ascending.
    pub fn halo_peers(&self) -> Vec<usize> {
        self.recv.iter().map(|link| link.peer).collect()
    }

    fn exchange<T: FieldValue>(&self, data: &mut [T], nb_vars: usize) -> Result<(), FieldError> {
        let expected = self.nb_nodes() * nb_vars;
        if data.len() != expected {
            return Err(FieldError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        trace!(
            rank = self.partition,
            data_type = %T::DATA_TYPE,
            nb_vars,
            sends = self.send.len(),
            recvs = self.recv.len(),
            "halo exchange start"
        );

        for link in &self.send {
            let mut out = Vec::with_capacity(link.nodes.len() * nb_vars);
            for &node in &link.nodes {
                out.extend_from_slice(&data[node * nb_vars..(node + 1) * nb_vars]);
            }
            self.comm.send(link.peer, T::into_payload(out))?;
        }

        for link in &self.recv {
            let values = T::from_payload(self.comm.recv(link.peer)?, link.peer)?;
            if values.len() != link.nodes.len() * nb_vars {
                return Err(CommError::PayloadLength {
                    peer: link.peer,
                    expected: link.nodes.len() * nb_vars,
                    actual: values.len(),
                }
                .into());
            }
            for (chunk, &node) in values.chunks_exact(nb_vars).zip(&link.nodes) {
                data[node * nb_vars..(node + 1) * nb_vars].copy_from_slice(chunk);
            }
        }

        trace!(rank = self.partition, "halo exchange done");
        Ok(())
    }
}

impl FunctionSpace for StructuredColumns {
    fn name(&self) -> &str {
        "StructuredColumns"
    }

    fn nb_nodes(&self) -> usize {
        self.global_index.len()
    }

    fn halo_exchange(&self, buffer: HaloBuffer<'_>, nb_vars: usize) -> Result<(), FieldError> {
        match buffer {
            HaloBuffer::Int32(data) => self.exchange(data, nb_vars),
            HaloBuffer::Real32(data) => self.exchange(data, nb_vars),
            HaloBuffer::Real64(data) => self.exchange(data, nb_vars),
        }
    }
}

impl fmt::Debug for StructuredColumns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredColumns")
            .field("grid", &self.grid.to_string())
            .field("partition", &self.partition)
            .field("nb_partitions", &self.nb_partitions)
            .field("nb_owned", &self.nb_owned)
            .field("nb_halo", &self.nb_halo())
            .finish()
    }
}
