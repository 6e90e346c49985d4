#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs, unreachable_pub)]
/*!

`breadboard`

A digital-logic circuit editor core: typed elements (gates, I/O terminals,
sequential devices) with owned pins, directed wires, a fixed-iteration
propagation sweep, and a bounded undo/redo command log whose snapshots
share the textual save format.

## Simple Example

```
use breadboard::circuit::Circuit;
use breadboard::element::{ElementKind, GateOp};

let circuit = Circuit::new();

// Place two input sources, an AND gate, and an output sink
let a = circuit.add_element(ElementKind::input_source(), 100, 100);
let b = circuit.add_element(ElementKind::input_source(), 100, 200);
let gate = circuit.add_element(ElementKind::Gate(GateOp::And), 300, 150);
let out = circuit.add_element(ElementKind::output_sink(), 500, 150);

// Clone the pin handles out first; connect re-borrows every element
// while it re-propagates, so no element borrow may outlive this line
let a_out = a.borrow().pin(0);
let b_out = b.borrow().pin(0);
let gate_a = gate.borrow().pin(0);
let gate_b = gate.borrow().pin(1);
let gate_y = gate.borrow().pin(2);
let out_in = out.borrow().pin(0);

// Wire them up; endpoint order does not matter
circuit.connect(&a_out, &gate_a).unwrap();
circuit.connect(&b_out, &gate_b).unwrap();
circuit.connect(&gate_y, &out_in).unwrap();

// Drive both inputs high and let the values settle
a.borrow_mut().set_io_value(true);
b.borrow_mut().set_io_value(true);
circuit.propagate();
assert_eq!(out.borrow().io_value(), Some(true));

// Every structural edit above is undoable
assert!(circuit.can_undo());
```

*/

pub mod circuit;
mod command;
pub mod element;
pub mod graph;
pub mod pin;
pub mod table;
pub mod util;
pub mod wire;
