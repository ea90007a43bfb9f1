//! Replicated board: a coordinator-free, eventually-convergent operation log.
//!
//! Each replica owns an id, a vector clock, and a log of placement
//! operations. Local edits go through [`ReplicatedBoard::set`], which stamps
//! an operation for broadcast; remote batches arrive through
//! [`ReplicatedBoard::merge`], which is idempotent and order-insensitive.
//! Two replicas that have merged the same set of operations render the same
//! board, whatever the delivery order, duplication, or grouping.

use std::cmp::Ordering;

use tracing::debug;

use crate::board::{Board, Sign, Vertex};
use crate::clock::{ReplicaId, VectorClock};

/// A single stone placement contributed by some replica.
///
/// Immutable once created. Two operations are the same operation iff their
/// clock snapshots are structurally equal; that is the deduplication key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    /// The replica that originated this operation.
    pub replica: ReplicaId,
    /// Snapshot of the originator's clock just after stamping.
    pub clock: VectorClock,
    pub vertex: Vertex,
    pub sign: Sign,
}

impl Operation {
    /// The originator's own counter at stamping time.
    pub fn seq(&self) -> u64 {
        self.clock.get(self.replica)
    }

    /// Total order over operations used to sort the log.
    ///
    /// The leading key is the clock weight, which strictly increases along
    /// causal dominance, so a causally-earlier operation always sorts
    /// earlier. Concurrent operations with equal weight fall through to the
    /// replica id, a pure tie-break that every replica evaluates
    /// identically, regardless of arrival order. The final key (the
    /// originator's own counter) never differs between distinct operations
    /// of one replica at equal weight; it only pins down totality.
    pub fn log_cmp(&self, other: &Operation) -> Ordering {
        (self.clock.weight(), self.replica, self.seq()).cmp(&(
            other.clock.weight(),
            other.replica,
            other.seq(),
        ))
    }
}

/// A replica-local view of the jointly edited board.
///
/// The log is exclusively owned by this replica's event loop; cross-replica
/// consistency comes from merge convergence, not shared state. `set` and
/// `merge` are the only mutation points and both are synchronous and
/// bounded by the current log size.
#[derive(Clone, Debug)]
pub struct ReplicatedBoard {
    id: ReplicaId,
    clock: VectorClock,
    log: Vec<Operation>,
}

impl ReplicatedBoard {
    /// Create a replica with a freshly minted id and an empty log.
    pub fn new() -> Self {
        Self::with_id(ReplicaId::mint())
    }

    /// Create a replica with a caller-chosen id.
    pub fn with_id(id: ReplicaId) -> Self {
        Self {
            id,
            clock: VectorClock::new(),
            log: Vec::new(),
        }
    }

    pub fn replica_id(&self) -> ReplicaId {
        self.id
    }

    /// The local clock: the pointwise maximum over everything this replica
    /// has originated or merged.
    pub fn clock(&self) -> &VectorClock {
        &self.clock
    }

    /// The operation log in its deterministic total order.
    pub fn log(&self) -> &[Operation] {
        &self.log
    }

    /// Record a local placement and return the stamped operation for the
    /// transport collaborator to broadcast.
    pub fn set(&mut self, vertex: Vertex, sign: Sign) -> Operation {
        self.clock.increment(self.id);
        let op = Operation {
            replica: self.id,
            clock: self.clock.clone(),
            vertex,
            sign,
        };
        debug!(replica = %self.id, ?vertex, sign = op.sign.value(), "local set");
        self.insert(op.clone());
        op
    }

    /// Merge a batch of remote operations into the log.
    ///
    /// Operations whose clock snapshot is already present are dropped, so
    /// re-delivery (including re-merging a full history after a partition)
    /// has no effect. Merging is commutative and associative across batches:
    /// the resulting log depends only on the set of operations ever merged.
    pub fn merge<I>(&mut self, incoming: I)
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in incoming {
            if self.log.iter().any(|o| o.clock == op.clock) {
                debug!(replica = %self.id, origin = %op.replica, "dropped duplicate operation");
                continue;
            }
            self.clock.observe(&op.clock);
            debug!(replica = %self.id, origin = %op.replica, ?op.vertex, "merged operation");
            self.insert(op);
        }
    }

    fn insert(&mut self, op: Operation) {
        let at = match self.log.binary_search_by(|probe| probe.log_cmp(&op)) {
            Ok(i) | Err(i) => i,
        };
        self.log.insert(at, op);
    }

    /// Last-writer-wins lookup of a single vertex: the sign of the
    /// highest-ranked operation touching it, or `Empty` if none does.
    pub fn get(&self, vertex: Vertex) -> Sign {
        self.log
            .iter()
            .rev()
            .find(|op| op.vertex == vertex)
            .map(|op| op.sign)
            .unwrap_or(Sign::Empty)
    }

    /// The vertex of the highest-ranked operation, e.g. for a last-move
    /// marker in a UI.
    pub fn current_vertex(&self) -> Option<Vertex> {
        self.log.last().map(|op| op.vertex)
    }

    /// Materialize the last-writer-wins grid. Operations outside the
    /// requested dimensions are ignored.
    pub fn render(&self, width: usize, height: usize) -> Vec<Vec<Sign>> {
        let mut grid = vec![vec![Sign::Empty; width]; height];
        // Walking the log forward and overwriting leaves exactly the
        // highest-ranked sign per vertex.
        for op in &self.log {
            let (x, y) = op.vertex;
            if x < width && y < height {
                grid[y][x] = op.sign;
            }
        }
        grid
    }

    /// Replay the log through the rules engine in log order, yielding a
    /// position with captures and the suicide rule enforced on the
    /// replicated stream.
    pub fn replay(&self, width: usize, height: usize) -> Board {
        self.log
            .iter()
            .fold(Board::new(width, height), |board, op| {
                board.apply_move(op.sign, op.vertex)
            })
    }
}

impl Default for ReplicatedBoard {
    fn default() -> Self {
        Self::new()
    }
}
