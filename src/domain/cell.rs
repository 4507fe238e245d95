// ============================================================
// Layer 3 — Recurrent Cell Kind
// ============================================================
// Which recurrent cell the classifier is built around.
//
//   Gru  — gated recurrent unit: update + reset gates,
//          a single hidden state vector
//   Lstm — long short-term memory: input, forget and output
//          gates plus a separate cell state
//
// serde stores the choice in train_config.json next to the
// weights. The `--cell` flag maps onto it in the CLI layer.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// Gated recurrent unit
    Gru,
    /// Long short-term memory
    Lstm,
}

impl CellKind {
    /// Number of gate blocks the fused input/hidden projections produce
    pub fn num_gates(self) -> usize {
        match self {
            CellKind::Gru  => 3,
            CellKind::Lstm => 4,
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKind::Gru  => write!(f, "gru"),
            CellKind::Lstm => write!(f, "lstm"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&CellKind::Lstm).unwrap(), "\"lstm\"");
        let gru: CellKind = serde_json::from_str("\"gru\"").unwrap();
        assert_eq!(gru, CellKind::Gru);
    }

    #[test]
    fn test_gate_counts() {
        assert_eq!(CellKind::Gru.num_gates(), 3);
        assert_eq!(CellKind::Lstm.num_gates(), 4);
    }
}
