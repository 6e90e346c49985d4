use breadboard::assert_save_eq;
use breadboard::circuit::Circuit;
use breadboard::element::{ElementKind, ElementRef, GateOp};
use breadboard::pin::PinRef;

fn pin(element: &ElementRef, index: usize) -> PinRef {
    element.borrow().pin(index)
}

fn wired_circuit() -> (Circuit, ElementRef, ElementRef, ElementRef) {
    let circuit = Circuit::new();
    let input = circuit.add_element(ElementKind::input_source(), 100, 100);
    let gate = circuit.add_element(ElementKind::Gate(GateOp::And), 300, 120);
    let out = circuit.add_element(ElementKind::output_sink(), 500, 120);
    circuit.connect(&pin(&input, 0), &pin(&gate, 0)).unwrap();
    circuit.connect(&pin(&gate, 2), &pin(&out, 0)).unwrap();
    (circuit, input, gate, out)
}

#[test]
fn undo_and_redo_an_add() {
    let circuit = Circuit::new();
    circuit.add_element(ElementKind::Gate(GateOp::Xor), 300, 150);
    assert!(circuit.can_undo());

    circuit.undo();
    assert_eq!(circuit.element_count(), 0);
    assert!(!circuit.can_undo());
    assert!(circuit.can_redo());

    circuit.redo();
    assert_eq!(circuit.element_count(), 1);
    assert_eq!(circuit.elements()[0].borrow().serialize(), "3,300,150");
}

#[test]
fn undo_restores_a_deleted_element() {
    let circuit = Circuit::new();
    let input = circuit.add_element(ElementKind::input_source(), 100, 100);
    input.borrow_mut().set_io_value(true);
    input.borrow_mut().set_custom_name("A");
    let before = circuit.save_to_string();

    circuit.delete_element(&input);
    assert_eq!(circuit.element_count(), 0);

    circuit.undo();
    assert_eq!(circuit.element_count(), 1);
    assert_save_eq!(before, circuit.save_to_string());
}

#[test]
fn redo_after_undo_of_a_delete_removes_the_restored_element() {
    let circuit = Circuit::new();
    let input = circuit.add_element(ElementKind::input_source(), 100, 100);
    circuit.delete_element(&input);
    circuit.undo();
    assert_eq!(circuit.element_count(), 1);

    circuit.redo();
    assert_eq!(circuit.element_count(), 0);
    assert!(circuit.verify().is_ok());
}

#[test]
fn undo_restores_a_deleted_wire() {
    // Delete the newest wire so the restore lands in the same list slot.
    let (circuit, _, gate, out) = wired_circuit();
    let wire = pin(&out, 0).borrow().connected_wire().unwrap();
    let before = circuit.save_to_string();

    circuit.delete_wire(&wire);
    circuit.undo();
    assert_eq!(circuit.wire_count(), 2);
    assert!(pin(&gate, 2).borrow().connected_wire().is_some());
    assert!(pin(&out, 0).borrow().connected_wire().is_some());
    assert_save_eq!(before, circuit.save_to_string());
    assert!(circuit.verify().is_ok());
}

#[test]
fn redo_after_undo_of_a_wire_delete() {
    let (circuit, input, ..) = wired_circuit();
    let wire = pin(&input, 0).borrow().connected_wire().unwrap();

    circuit.delete_wire(&wire);
    circuit.undo();
    circuit.redo();
    assert_eq!(circuit.wire_count(), 1);
    assert!(pin(&input, 0).borrow().connected_wire().is_none());
    assert!(circuit.verify().is_ok());
}

#[test]
fn undo_an_added_wire() {
    let circuit = Circuit::new();
    let input = circuit.add_element(ElementKind::input_source(), 100, 100);
    let out = circuit.add_element(ElementKind::output_sink(), 300, 100);
    circuit.connect(&pin(&input, 0), &pin(&out, 0)).unwrap();

    circuit.undo();
    assert_eq!(circuit.wire_count(), 0);
    assert!(pin(&input, 0).borrow().connected_wire().is_none());
    assert!(pin(&out, 0).borrow().connected_wire().is_none());

    circuit.redo();
    assert_eq!(circuit.wire_count(), 1);
    assert!(circuit.verify().is_ok());
}

#[test]
fn redo_of_a_tap_wire_restores_nothing() {
    let (circuit, input, ..) = wired_circuit();
    let target = pin(&input, 0).borrow().connected_wire().unwrap();
    let clock = circuit.add_element(ElementKind::clock(1), 100, 300);
    circuit
        .tap_wire(&pin(&clock, 0), 700, 700, &target)
        .unwrap();
    assert_eq!(circuit.wire_count(), 3);

    circuit.undo();
    assert_eq!(circuit.wire_count(), 2);
    assert!(circuit.virtual_pins().is_empty());

    // The virtual endpoint was reclaimed with the wire, and snapshot
    // replay resolves against element pins only, so nothing comes back.
    circuit.redo();
    assert_eq!(circuit.wire_count(), 2);
    assert!(circuit.verify().is_ok());
}

#[test]
fn a_new_edit_clears_the_redo_stack() {
    let circuit = Circuit::new();
    circuit.add_element(ElementKind::input_source(), 100, 100);
    circuit.undo();
    assert!(circuit.can_redo());

    circuit.add_element(ElementKind::output_sink(), 300, 100);
    assert!(!circuit.can_redo());
}

#[test]
fn batch_delete_undoes_as_one_command() {
    let (circuit, input, gate, out) = wired_circuit();
    circuit.batch_delete(&[input, gate, out]);
    assert_eq!(circuit.element_count(), 0);

    circuit.undo();
    assert_eq!(circuit.element_count(), 3);
    assert!(circuit.verify().is_ok());

    circuit.redo();
    assert_eq!(circuit.element_count(), 0);
}

#[test]
fn history_is_capped_at_fifty_entries() {
    let circuit = Circuit::new();
    for i in 0..55 {
        circuit.add_element(ElementKind::input_source(), i * 10, 0);
    }
    assert_eq!(circuit.element_count(), 55);

    for _ in 0..60 {
        circuit.undo();
    }
    // Only the 50 newest adds were undoable.
    assert_eq!(circuit.element_count(), 5);
    assert!(!circuit.can_undo());
}

#[test]
fn history_generation_moves_on_every_stack_change() {
    let circuit = Circuit::new();
    let g0 = circuit.history_generation();
    circuit.add_element(ElementKind::input_source(), 0, 0);
    let g1 = circuit.history_generation();
    assert!(g1 > g0);

    circuit.undo();
    let g2 = circuit.history_generation();
    assert!(g2 > g1);

    circuit.redo();
    assert!(circuit.history_generation() > g2);
}

#[test]
fn undo_on_empty_history_is_a_no_op() {
    let circuit = Circuit::new();
    let generation = circuit.history_generation();
    circuit.undo();
    circuit.redo();
    assert_eq!(circuit.history_generation(), generation);
}

#[test]
fn clear_empties_the_history() {
    let circuit = Circuit::new();
    circuit.add_element(ElementKind::input_source(), 0, 0);
    circuit.clear();
    assert!(!circuit.can_undo());
    assert!(!circuit.can_redo());
    assert_eq!(circuit.element_count(), 0);
}

#[test]
fn undo_chain_walks_back_to_the_initial_state() {
    let circuit = Circuit::new();
    let input = circuit.add_element(ElementKind::input_source(), 100, 100);
    let out = circuit.add_element(ElementKind::output_sink(), 300, 100);
    circuit.connect(&pin(&input, 0), &pin(&out, 0)).unwrap();

    circuit.undo();
    circuit.undo();
    circuit.undo();
    assert_eq!(circuit.element_count(), 0);
    assert_eq!(circuit.wire_count(), 0);

    circuit.redo();
    circuit.redo();
    circuit.redo();
    assert_eq!(circuit.element_count(), 2);
    assert_eq!(circuit.wire_count(), 1);
    assert!(circuit.verify().is_ok());
}
