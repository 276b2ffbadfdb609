//! Point-to-point transport for halo exchange.
//!
//! The [`Communicator`] trait is the seam between function spaces and
//! whatever moves bytes between workers. Two in-process transports are
//! provided: [`SerialComm`] for single-worker runs and [`ChannelComm`],
//! a group of endpoints joined by crossbeam channels, one per worker
//! thread.

use crossbeam_channel::{Receiver, Sender};
use zonal_core::{CommError, DataType};

/// An owned buffer of halo values travelling between two ranks.
#[derive(Clone, Debug, PartialEq)]
pub enum HaloPayload {
    /// 32-bit integers.
    Int32(Vec<i32>),
    /// 32-bit floats.
    Real32(Vec<f32>),
    /// 64-bit floats.
    Real64(Vec<f64>),
}

impl HaloPayload {
    /// Numeric kind of the values.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int32(_) => DataType::Int32,
            Self::Real32(_) => DataType::Real32,
            Self::Real64(_) => DataType::Real64,
        }
    }

    /// Number of values carried.
    pub fn len(&self) -> usize {
        match self {
            Self::Int32(v) => v.len(),
            Self::Real32(v) => v.len(),
            Self::Real64(v) => v.len(),
        }
    }

    /// Whether the payload carries no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered point-to-point messaging among `size()` ranks.
///
/// Messages between a given pair of ranks arrive in the order they were
/// sent. `send` must not block on the receiver, so that every rank can
/// post all of its sends before receiving.
pub trait Communicator: Send + Sync {
    /// This endpoint's rank.
    fn rank(&self) -> usize;

    /// Number of ranks in the group.
    fn size(&self) -> usize;

    /// Post `payload` to rank `dest`.
    fn send(&self, dest: usize, payload: HaloPayload) -> Result<(), CommError>;

    /// Wait for the next payload from rank `source`.
    fn recv(&self, source: usize) -> Result<HaloPayload, CommError>;
}

// ── ChannelComm ─────────────────────────────────────────────────────

/// One endpoint of an in-process communicator group.
///
/// Every ordered pair of ranks has its own unbounded channel, so sends
/// never block and per-pair ordering is preserved.
#[derive(Debug)]
pub struct ChannelComm {
    rank: usize,
    to: Vec<Sender<HaloPayload>>,
    from: Vec<Receiver<HaloPayload>>,
}

impl ChannelComm {
    /// Build a fully connected group of `size` endpoints, indexed by rank.
    ///
    /// Hand one endpoint to each worker thread.
    pub fn group(size: usize) -> Vec<ChannelComm> {
        // links[src][dest]
        let links: Vec<Vec<(Sender<HaloPayload>, Receiver<HaloPayload>)>> = (0..size)
            .map(|_| (0..size).map(|_| crossbeam_channel::unbounded()).collect())
            .collect();
        (0..size)
            .map(|rank| ChannelComm {
                rank,
                to: links[rank].iter().map(|(tx, _)| tx.clone()).collect(),
                from: links.iter().map(|row| row[rank].1.clone()).collect(),
            })
            .collect()
    }

    fn check_rank(&self, rank: usize) -> Result<(), CommError> {
        if rank >= self.to.len() {
            return Err(CommError::InvalidRank {
                rank,
                size: self.to.len(),
            });
        }
        Ok(())
    }
}

impl Communicator for ChannelComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.to.len()
    }

    fn send(&self, dest: usize, payload: HaloPayload) -> Result<(), CommError> {
        self.check_rank(dest)?;
        self.to[dest]
            .send(payload)
            .map_err(|_| CommError::Disconnected { peer: dest })
    }

    fn recv(&self, source: usize) -> Result<HaloPayload, CommError> {
        self.check_rank(source)?;
        self.from[source]
            .recv()
            .map_err(|_| CommError::Disconnected { peer: source })
    }
}

// ── SerialComm ──────────────────────────────────────────────────────

/// The single-rank communicator.
///
/// Messages to rank 0 loop back to this endpoint.
#[derive(Debug)]
pub struct SerialComm {
    inner: ChannelComm,
}

impl SerialComm {
    /// A communicator of size 1.
    pub fn new() -> Self {
        let mut group = ChannelComm::group(1);
        Self {
            inner: group.remove(0),
        }
    }
}

impl Default for SerialComm {
    fn default() -> Self {
        Self::new()
    }
}

impl Communicator for SerialComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn send(&self, dest: usize, payload: HaloPayload) -> Result<(), CommError> {
        self.inner.send(dest, payload)
    }

    fn recv(&self, source: usize) -> Result<HaloPayload, CommError> {
        self.inner.recv(source)
    }
}
