//! Primitive gate operations.

/// A primitive combinational gate operation.
///
/// `And`, `Or` and `Xor` aggregate all of their inputs into a single output.
/// `Not` bundles independent inverter units, pairing each input pin with the
/// output pin at the same index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GateOp {
    /// Conjunction of all inputs.
    And,
    /// Disjunction of all inputs.
    Or,
    /// Parity of all inputs.
    Xor,
    /// Per-index inversion.
    Not,
}

impl GateOp {
    /// Returns the number of output pins for a gate built with `pairs` pin
    /// pairs.
    pub(crate) fn output_count(&self, pairs: usize) -> usize {
        match self {
            GateOp::Not => pairs,
            _ => 1,
        }
    }

    /// Folds all input levels into the aggregate output level.
    ///
    /// Only defined for the aggregate operations; `Not` is evaluated per pin
    /// pair by the propagation engine.
    pub(crate) fn fold(&self, inputs: impl Iterator<Item = bool>) -> bool {
        match self {
            GateOp::And => inputs.fold(true, |acc, level| acc && level),
            GateOp::Or => inputs.fold(false, |acc, level| acc || level),
            GateOp::Xor => inputs.fold(false, |acc, level| acc ^ level),
            GateOp::Not => unreachable!("NOT gates are evaluated per pin pair"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(GateOp::And, &[true, true, true], true)]
    #[case(GateOp::And, &[true, false, true], false)]
    #[case(GateOp::And, &[], true)]
    #[case(GateOp::Or, &[false, false], false)]
    #[case(GateOp::Or, &[false, true], true)]
    #[case(GateOp::Xor, &[true, true, true], true)]
    #[case(GateOp::Xor, &[true, true], false)]
    #[case(GateOp::Xor, &[false, false], false)]
    fn test_fold(#[case] op: GateOp, #[case] inputs: &[bool], #[case] expected: bool) {
        assert_eq!(op.fold(inputs.iter().copied()), expected);
    }

    #[test]
    fn test_output_count() {
        assert_eq!(GateOp::And.output_count(4), 1);
        assert_eq!(GateOp::Not.output_count(4), 4);
    }
}
