use breadboard::circuit::Circuit;
use breadboard::element::{ElementKind, GateOp};
use breadboard::table::TruthTable;

fn half_adder() -> Circuit {
    let circuit = Circuit::new();

    // Place the terminals and gates
    let a = circuit.add_element(ElementKind::input_source(), 100, 100);
    let b = circuit.add_element(ElementKind::input_source(), 100, 200);
    let xor = circuit.add_element(ElementKind::Gate(GateOp::Xor), 300, 100);
    let and = circuit.add_element(ElementKind::Gate(GateOp::And), 300, 200);
    let sum = circuit.add_element(ElementKind::output_sink(), 500, 100);
    let carry = circuit.add_element(ElementKind::output_sink(), 500, 200);

    a.borrow_mut().set_custom_name("A");
    b.borrow_mut().set_custom_name("B");
    sum.borrow_mut().set_custom_name("SUM");
    carry.borrow_mut().set_custom_name("CARRY");

    // Pin handles are cloned out up front; connect re-borrows the
    // elements while it re-propagates
    let a_out = a.borrow().pin(0);
    let b_out = b.borrow().pin(0);
    let xor_in = (xor.borrow().pin(0), xor.borrow().pin(1));
    let and_in = (and.borrow().pin(0), and.borrow().pin(1));
    let xor_out = xor.borrow().pin(2);
    let and_out = and.borrow().pin(2);
    let sum_in = sum.borrow().pin(0);
    let carry_in = carry.borrow().pin(0);

    // Each input fans out to both gates
    circuit.connect(&a_out, &xor_in.0).unwrap();
    circuit.connect(&a_out, &and_in.0).unwrap();
    circuit.connect(&b_out, &xor_in.1).unwrap();
    circuit.connect(&b_out, &and_in.1).unwrap();
    circuit.connect(&xor_out, &sum_in).unwrap();
    circuit.connect(&and_out, &carry_in).unwrap();

    circuit
}

fn main() {
    let circuit = half_adder();
    print!("{circuit}");
    match TruthTable::generate(&circuit) {
        Ok(table) => print!("{table}"),
        Err(e) => eprintln!("{e}"),
    }
}
