use tracing::trace;

use crate::{
    components::{gate::GateOp, ComponentKind},
    graph::{CircuitError, ComponentGraph},
};

/// Pushes changed pin levels through the graph until quiescence.
///
/// Propagation is depth-first and deterministic for a fixed topology: each
/// output pin wakes its attached branches in insertion order, and each branch
/// delivers one value change at a time. Because the graph is statically
/// acyclic, propagation always terminates and never fails; no convergence
/// detection is needed at runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct PropagationEngine;

impl PropagationEngine {
    /// Creates a new engine.
    pub fn new() -> Self {
        Self
    }

    /// Drives output-side pin `index` of the component with the given id to
    /// `value` and recomputes all dependent gate outputs.
    ///
    /// The usual stimulus is an [`Input`](crate::ComponentKind::Input)
    /// terminal, whose single pin is output-side pin `0`.
    ///
    /// # Errors
    ///
    /// Fails if the id is unknown or the component has no output-side pin at
    /// `index`; once the target is validated, propagation itself cannot fail.
    pub fn wake(
        &self,
        graph: &mut ComponentGraph,
        id: &str,
        index: usize,
        value: bool,
    ) -> Result<(), CircuitError> {
        if graph.get(id)?.output_pin(index).is_none() {
            return Err(CircuitError::MalformedBranch(format!(
                "{id:?} has no output pin {index}"
            )));
        }

        wake_output(graph, id, index, value);
        Ok(())
    }
}

/// Sets an output-side pin level and wakes the attached branches.
pub(crate) fn wake_output(graph: &mut ComponentGraph, id: &str, index: usize, value: bool) {
    let branch_ids = {
        let Some(pin) = graph
            .component_mut(id)
            .and_then(|c| c.output_pin_mut(index))
        else {
            return;
        };
        pin.set_active(value);
        pin.branches().to_vec()
    };

    trace!(id, index, value, "output level set");

    for branch_id in &branch_ids {
        deliver(graph, branch_id, value);
    }
}

/// Carries a level across a branch into its destination pin.
pub(crate) fn deliver(graph: &mut ComponentGraph, branch_id: &str, value: bool) {
    let Some((dest, dest_index)) = graph
        .component_mut(branch_id)
        .and_then(|c| c.set_branch_level(value))
    else {
        return;
    };

    trace!(branch = branch_id, value, "level crosses branch");
    wake_input(graph, &dest, dest_index, value);
}

/// Sets an input-side pin level and recomputes the owning component's
/// affected outputs.
pub(crate) fn wake_input(graph: &mut ComponentGraph, id: &str, index: usize, value: bool) {
    let next = {
        let Some(component) = graph.component_mut(id) else {
            return;
        };
        let Some(pin) = component.input_pin_mut(index) else {
            return;
        };
        pin.set_active(value);

        match component.kind() {
            // one inverter per pin pair; an unconnected pair is skipped
            ComponentKind::Gate {
                op: GateOp::Not,
                inputs,
                ..
            } => {
                if inputs[index].branches().is_empty() {
                    None
                } else {
                    Some((index, !value))
                }
            }
            ComponentKind::Gate { op, inputs, .. } => {
                Some((0, op.fold(inputs.iter().map(|pin| pin.is_active()))))
            }
            _ => None,
        }
    };

    if let Some((out_index, out_value)) = next {
        wake_output(graph, id, out_index, out_value);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use rstest::rstest;

    use crate::{Component, GateOp};

    use super::*;

    fn engine() -> PropagationEngine {
        PropagationEngine::new()
    }

    /// in0, in1 -> gate(op, 2 pairs) -> out0
    fn two_input_gate(op: GateOp) -> ComponentGraph {
        let mut graph = ComponentGraph::new();
        graph.add(Component::input("in0")).unwrap();
        graph.add(Component::input("in1")).unwrap();
        graph.add(Component::gate("g0", op, 2)).unwrap();
        graph.add(Component::output("out0")).unwrap();
        graph
            .add(Component::branch("br0", "in0", 0, "g0", 0))
            .unwrap();
        graph
            .add(Component::branch("br1", "in1", 0, "g0", 1))
            .unwrap();
        graph
            .add(Component::branch("br2", "g0", 0, "out0", 0))
            .unwrap();
        graph
    }

    #[rstest]
    #[case(GateOp::And, false, false, false)]
    #[case(GateOp::And, true, false, false)]
    #[case(GateOp::And, true, true, true)]
    #[case(GateOp::Or, false, false, false)]
    #[case(GateOp::Or, true, false, true)]
    #[case(GateOp::Or, true, true, true)]
    #[case(GateOp::Xor, false, false, false)]
    #[case(GateOp::Xor, true, false, true)]
    #[case(GateOp::Xor, true, true, false)]
    fn test_two_input_gate(
        #[case] op: GateOp,
        #[case] a: bool,
        #[case] b: bool,
        #[case] expected: bool,
    ) {
        let mut graph = two_input_gate(op);

        engine().wake(&mut graph, "in0", 0, a).unwrap();
        engine().wake(&mut graph, "in1", 0, b).unwrap();

        assert_eq!(graph.level("g0").unwrap(), expected);
        assert_eq!(graph.level("out0").unwrap(), expected);
    }

    #[test]
    fn test_not_bundling_skips_unconnected_pairs() {
        let mut graph = ComponentGraph::new();
        graph.add(Component::input("in0")).unwrap();
        graph.add(Component::input("in2")).unwrap();
        graph.add(Component::gate("not0", GateOp::Not, 3)).unwrap();
        graph
            .add(Component::branch("br0", "in0", 0, "not0", 0))
            .unwrap();
        graph
            .add(Component::branch("br2", "in2", 0, "not0", 2))
            .unwrap();

        engine().wake(&mut graph, "in0", 0, true).unwrap();
        engine().wake(&mut graph, "in2", 0, false).unwrap();

        let not0 = graph.get("not0").unwrap();
        assert!(!not0.output_pin(0).unwrap().is_active());
        // the unconnected pair is never evaluated
        assert!(!not0.output_pin(1).unwrap().is_active());
        assert!(not0.output_pin(2).unwrap().is_active());
    }

    #[test]
    fn test_chain_propagates_depth_first() {
        let mut graph = ComponentGraph::new();
        graph.add(Component::input("in0")).unwrap();
        graph.add(Component::output("out0")).unwrap();
        let depth = 5;
        for i in 0..depth {
            graph
                .add(Component::gate(format!("not{i}"), GateOp::Not, 1))
                .unwrap();
        }
        graph
            .add(Component::branch("br-in", "in0", 0, "not0", 0))
            .unwrap();
        for i in 1..depth {
            graph
                .add(Component::branch(
                    format!("br{i}"),
                    format!("not{}", i - 1),
                    0,
                    format!("not{i}"),
                    0,
                ))
                .unwrap();
        }
        graph
            .add(Component::branch(
                "br-out",
                format!("not{}", depth - 1),
                0,
                "out0",
                0,
            ))
            .unwrap();

        // attaching alone settles the chain: five inversions of false
        assert!(graph.level("out0").unwrap());

        engine().wake(&mut graph, "in0", 0, true).unwrap();
        assert!(!graph.level("out0").unwrap());

        engine().wake(&mut graph, "in0", 0, false).unwrap();
        assert!(graph.level("out0").unwrap());
    }

    #[test]
    fn test_attach_delivers_current_level() {
        let mut graph = ComponentGraph::new();
        graph.add(Component::input("in0")).unwrap();
        graph.add(Component::output("out0")).unwrap();

        engine().wake(&mut graph, "in0", 0, true).unwrap();
        assert!(!graph.level("out0").unwrap());

        graph
            .add(Component::branch("br0", "in0", 0, "out0", 0))
            .unwrap();
        assert!(graph.level("out0").unwrap());
        assert!(graph.level("br0").unwrap());
    }

    #[test]
    fn test_fanout_order_is_stable() {
        let mut graph = ComponentGraph::new();
        graph.add(Component::input("in0")).unwrap();
        graph.add(Component::output("a")).unwrap();
        graph.add(Component::output("b")).unwrap();
        graph.add(Component::branch("br-a", "in0", 0, "a", 0)).unwrap();
        graph.add(Component::branch("br-b", "in0", 0, "b", 0)).unwrap();

        assert_eq!(
            graph.get("in0").unwrap().output_pin(0).unwrap().branches(),
            ["br-a".to_owned(), "br-b".to_owned()]
        );

        engine().wake(&mut graph, "in0", 0, true).unwrap();
        assert!(graph.level("a").unwrap());
        assert!(graph.level("b").unwrap());
    }

    #[test]
    fn test_wake_rejects_invalid_targets() {
        let mut graph = ComponentGraph::new();
        graph.add(Component::output("out0")).unwrap();

        assert_eq!(
            engine().wake(&mut graph, "ghost", 0, true).unwrap_err(),
            CircuitError::MissingComponent("ghost".to_owned())
        );
        // an output terminal has no output-side pin to drive
        assert!(matches!(
            engine().wake(&mut graph, "out0", 0, true).unwrap_err(),
            CircuitError::MalformedBranch(_)
        ));
    }

    /// Builds a layered random DAG of two-input gates and returns the graph
    /// together with its input and output ids.
    fn random_layered_dag(seed: u64) -> (ComponentGraph, Vec<String>, Vec<String>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph = ComponentGraph::new();

        let inputs: Vec<String> = (0..4).map(|i| format!("in{i}")).collect();
        for id in &inputs {
            graph.add(Component::input(id.as_str())).unwrap();
        }

        let ops = [GateOp::And, GateOp::Or, GateOp::Xor];
        let mut previous_layer = inputs.clone();
        let mut branch = 0;
        for layer in 0..3 {
            let mut current_layer = Vec::new();
            for slot in 0..4 {
                let id = format!("g{layer}-{slot}");
                let op = ops[rng.gen_range(0..ops.len())];
                graph.add(Component::gate(id.as_str(), op, 2)).unwrap();
                for pin in 0..2 {
                    let source = &previous_layer[rng.gen_range(0..previous_layer.len())];
                    graph
                        .add(Component::branch(
                            format!("br{branch}"),
                            source.as_str(),
                            0,
                            id.as_str(),
                            pin,
                        ))
                        .unwrap();
                    branch += 1;
                }
                current_layer.push(id);
            }
            previous_layer = current_layer;
        }

        let outputs: Vec<String> = (0..4).map(|i| format!("out{i}")).collect();
        for (i, id) in outputs.iter().enumerate() {
            graph.add(Component::output(id.as_str())).unwrap();
            graph
                .add(Component::branch(
                    format!("br-out{i}"),
                    previous_layer[i].as_str(),
                    0,
                    id.as_str(),
                    0,
                ))
                .unwrap();
        }

        (graph, inputs, outputs)
    }

    #[test]
    fn test_propagation_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let stimuli: Vec<(usize, bool)> = (0..32).map(|_| (rng.gen_range(0..4), rng.gen())).collect();

        let run = |seed: u64| {
            let (mut graph, inputs, outputs) = random_layered_dag(seed);
            for (input, value) in &stimuli {
                engine()
                    .wake(&mut graph, &inputs[*input], 0, *value)
                    .unwrap();
            }
            outputs
                .iter()
                .map(|id| graph.level(id).unwrap())
                .collect::<Vec<bool>>()
        };

        assert_eq!(run(42), run(42));
        assert_eq!(run(1337), run(1337));
    }
}
