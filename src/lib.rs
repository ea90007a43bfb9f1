//! Goban-Sync: a replicated Go board that converges without a coordinator.
//!
//! Two pieces compose bottom-up:
//!
//! - [`board`] - the rules engine: an immutable board position whose
//!   [`board::Board::apply_move`] resolves captures and the suicide rule
//! - [`replica`] - the replicated board: a per-replica operation log,
//!   totally ordered by vector clocks, with last-writer-wins rendering
//!
//! Around them sit thin boundary modules:
//!
//! - [`clock`] - replica identifiers and vector clocks
//! - [`coord`] - textual coordinate notation (`"D4"`, `I` skipped)
//! - [`wire`] - JSON encoding of operation batches for the transport layer
//!
//! Replicas exchange operation batches over any at-least-once transport;
//! merge is idempotent and order-insensitive, so duplicated, reordered, or
//! re-delivered batches are harmless.
//!
//! ## Example
//!
//! ```
//! use goban_sync::board::Sign;
//! use goban_sync::replica::ReplicatedBoard;
//!
//! let mut alice = ReplicatedBoard::new();
//! let mut bob = ReplicatedBoard::new();
//!
//! // Alice edits locally; the returned operation is what gets broadcast.
//! let op = alice.set((2, 2), Sign::Black);
//! bob.merge([op]);
//!
//! assert_eq!(alice.render(9, 9), bob.render(9, 9));
//! ```

pub mod board;
pub mod clock;
pub mod coord;
pub mod replica;
pub mod wire;
