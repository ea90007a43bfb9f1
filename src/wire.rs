//! Transport-boundary encoding of operation batches.
//!
//! The transport collaborator exchanges operations as JSON arrays of flat
//! records `{"id", "clock", "x", "y", "sign"}`. Decoding validates payloads
//! before anything reaches the log: bad JSON, unparseable replica ids, and
//! out-of-range sign values all surface a [`WireError`] instead of
//! corrupting a replica.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Sign;
use crate::clock::{ReplicaId, VectorClock};
use crate::replica::Operation;

/// Failure decoding an incoming operation batch.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed operation payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("sign value {0} is out of range")]
    InvalidSign(i8),
}

/// Flat wire form of one operation.
#[derive(Serialize, Deserialize)]
struct WireOperation {
    id: ReplicaId,
    clock: VectorClock,
    x: usize,
    y: usize,
    sign: i8,
}

impl From<&Operation> for WireOperation {
    fn from(op: &Operation) -> Self {
        WireOperation {
            id: op.replica,
            clock: op.clock.clone(),
            x: op.vertex.0,
            y: op.vertex.1,
            sign: op.sign.value(),
        }
    }
}

impl TryFrom<WireOperation> for Operation {
    type Error = WireError;

    fn try_from(wire: WireOperation) -> Result<Self, WireError> {
        let sign = Sign::from_i8(wire.sign).ok_or(WireError::InvalidSign(wire.sign))?;
        Ok(Operation {
            replica: wire.id,
            clock: wire.clock,
            vertex: (wire.x, wire.y),
            sign,
        })
    }
}

/// Serialize a batch of operations for broadcast.
pub fn encode_operations(ops: &[Operation]) -> Result<String, WireError> {
    let wire: Vec<WireOperation> = ops.iter().map(WireOperation::from).collect();
    Ok(serde_json::to_string(&wire)?)
}

/// Parse and validate an incoming batch. The result is safe to hand to
/// [`crate::replica::ReplicatedBoard::merge`].
pub fn decode_operations(payload: &str) -> Result<Vec<Operation>, WireError> {
    let wire: Vec<WireOperation> = serde_json::from_str(payload)?;
    wire.into_iter().map(Operation::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replica::ReplicatedBoard;

    #[test]
    fn test_roundtrip() {
        let mut r = ReplicatedBoard::with_id(ReplicaId::from_raw(7));
        let ops = vec![r.set((3, 4), Sign::Black), r.set((5, 6), Sign::White)];

        let payload = encode_operations(&ops).unwrap();
        let decoded = decode_operations(&payload).unwrap();
        assert_eq!(decoded, ops);
    }

    #[test]
    fn test_wire_shape() {
        let mut r = ReplicatedBoard::with_id(ReplicaId::from_raw(0x2a));
        let op = r.set((3, 4), Sign::White);

        let payload = encode_operations(&[op]).unwrap();
        assert_eq!(
            payload,
            r#"[{"id":"000000000000002a","clock":{"000000000000002a":1},"x":3,"y":4,"sign":-1}]"#
        );
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            decode_operations("not json"),
            Err(WireError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range_sign() {
        let payload = r#"[{"id":"01","clock":{"01":1},"x":0,"y":0,"sign":5}]"#;
        assert!(matches!(
            decode_operations(payload),
            Err(WireError::InvalidSign(5))
        ));
    }

    #[test]
    fn test_rejects_bad_replica_id() {
        let payload = r#"[{"id":"zz","clock":{},"x":0,"y":0,"sign":1}]"#;
        assert!(matches!(
            decode_operations(payload),
            Err(WireError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_missing_fields() {
        let payload = r#"[{"id":"01","x":0,"y":0,"sign":1}]"#;
        assert!(matches!(
            decode_operations(payload),
            Err(WireError::Json(_))
        ));
    }
}
