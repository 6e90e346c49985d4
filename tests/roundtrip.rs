use breadboard::assert_save_eq;
use breadboard::circuit::Circuit;
use breadboard::element::{Element, ElementKind, ElementRef, GateOp};
use breadboard::pin::PinRef;

fn pin(element: &ElementRef, index: usize) -> PinRef {
    element.borrow().pin(index)
}

#[test]
fn gate_line_format() {
    let gate = Element::new(ElementKind::Gate(GateOp::And), 100, 100);
    assert_eq!(gate.borrow().serialize(), "0,100,100");
    let gate = Element::new(ElementKind::Gate(GateOp::Nor), 40, -25);
    assert_eq!(gate.borrow().serialize(), "5,40,-25");
}

#[test]
fn io_line_format() {
    let input = Element::new(ElementKind::input_source(), 10, 20);
    input.borrow_mut().set_io_value(true);
    input.borrow_mut().set_custom_name("A");
    assert_eq!(input.borrow().serialize(), "6,10,20,1,A");

    let output = Element::new(ElementKind::output_sink(), 30, 40);
    assert_eq!(output.borrow().serialize(), "7,30,40,0,");
}

#[test]
fn default_io_names_serialize_empty() {
    for default in ["INPUT", "IN", "Input Pin"] {
        let input = Element::new(ElementKind::input_source(), 0, 0);
        input.borrow_mut().set_custom_name(default);
        assert_eq!(input.borrow().serialize(), "6,0,0,0,", "name {default:?}");
    }
    let input = Element::new(ElementKind::input_source(), 0, 0);
    input.borrow_mut().set_custom_name("CARRY_IN");
    assert_eq!(input.borrow().serialize(), "6,0,0,0,CARRY_IN");
}

#[test]
fn clock_and_sequential_line_formats() {
    let clock = Element::new(ElementKind::clock(4), 50, 60);
    assert_eq!(clock.borrow().serialize(), "8,50,60,4,1");

    let latch = Element::new(ElementKind::rs_latch(), 1, 2);
    assert_eq!(latch.borrow().serialize(), "9,1,2,0,1");

    let ff = Element::new(ElementKind::d_flip_flop(), 3, 4);
    assert_eq!(ff.borrow().serialize(), "10,3,4,0");

    let reg = Element::new(ElementKind::register(), 5, 6);
    assert_eq!(reg.borrow().serialize(), "13,5,6,0,0,0,0");
}

#[test]
fn deserialize_restores_state() {
    let input = Element::deserialize("6,10,20,1,A").unwrap();
    let input = input.borrow();
    assert_eq!(input.x(), 10);
    assert_eq!(input.y(), 20);
    assert_eq!(input.io_value(), Some(true));
    assert_eq!(input.display_name(), "A");

    let ff = Element::deserialize("10,3,4,1").unwrap();
    assert_eq!(ff.borrow().serialize(), "10,3,4,1");

    let clock = Element::deserialize("8,50,60,4,0").unwrap();
    assert_eq!(clock.borrow().serialize(), "8,50,60,4,0");
}

#[test]
fn deserialize_rejects_garbage() {
    assert!(Element::deserialize("").is_none());
    assert!(Element::deserialize("banana").is_none());
    assert!(Element::deserialize("0,100").is_none());
    assert!(Element::deserialize("6,abc,3,0,").is_none());
    assert!(Element::deserialize("99,1,2").is_none(), "unknown tag");
    assert!(
        Element::deserialize("8,50,60,4").is_none(),
        "clock line missing the enabled flag"
    );
}

fn sample_circuit() -> Circuit {
    let circuit = Circuit::new();
    let a = circuit.add_element(ElementKind::input_source(), 100, 100);
    let b = circuit.add_element(ElementKind::input_source(), 100, 200);
    let gate = circuit.add_element(ElementKind::Gate(GateOp::Xor), 300, 150);
    let out = circuit.add_element(ElementKind::output_sink(), 500, 150);
    circuit.add_element(ElementKind::d_flip_flop(), 300, 400);
    circuit.add_element(ElementKind::clock(2), 100, 400);
    a.borrow_mut().set_io_value(true);
    a.borrow_mut().set_custom_name("A");
    circuit.connect(&pin(&a, 0), &pin(&gate, 0)).unwrap();
    circuit.connect(&pin(&b, 0), &pin(&gate, 1)).unwrap();
    circuit.connect(&pin(&gate, 2), &pin(&out, 0)).unwrap();
    circuit
}

#[test]
fn circuit_round_trip() {
    let circuit = sample_circuit();
    let text = circuit.save_to_string();

    let reloaded = Circuit::new();
    reloaded.load_from_string(&text);
    assert_eq!(reloaded.element_count(), circuit.element_count());
    assert_eq!(reloaded.wire_count(), circuit.wire_count());
    assert!(reloaded.verify().is_ok());
    assert_save_eq!(text, reloaded.save_to_string());
}

#[test]
fn display_matches_save_text() {
    let circuit = sample_circuit();
    assert_eq!(circuit.to_string(), circuit.save_to_string());
}

#[test]
fn file_round_trip() {
    let circuit = sample_circuit();
    let path = std::env::temp_dir().join("breadboard_roundtrip.txt");
    circuit.save_to_file(&path).unwrap();
    let reloaded = Circuit::new();
    reloaded.load_from_file(&path).unwrap();
    assert_save_eq!(circuit.save_to_string(), reloaded.save_to_string());
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn load_from_missing_file_is_an_error() {
    let circuit = Circuit::new();
    assert!(
        circuit
            .load_from_file("/nonexistent/breadboard.txt")
            .is_err()
    );
}

#[test]
fn wire_between_same_direction_pins_is_skipped() {
    // Both coordinates resolve to input pins of the gate, so the wire is
    // dropped during load.
    let circuit = Circuit::new();
    circuit.load_from_string("0,100,100\nWIRE,60,80,60,120\n");
    assert_eq!(circuit.element_count(), 1);
    assert_eq!(circuit.wire_count(), 0);
}

#[test]
fn wire_resolution_tolerates_small_offsets() {
    let circuit = Circuit::new();
    // Input output pin at (120, 100), output sink input pin at (280, 100);
    // the wire line is off by a few units on each endpoint.
    circuit.load_from_string("6,100,100,0,\n7,300,100,0,\nWIRE,123,98,277,103\n");
    assert_eq!(circuit.wire_count(), 1);

    let circuit = Circuit::new();
    circuit.load_from_string("6,100,100,0,\n7,300,100,0,\nWIRE,126,100,280,100\n");
    assert_eq!(circuit.wire_count(), 0, "six units off resolves nothing");
}

#[test]
fn wire_lines_resolve_after_all_elements() {
    // Wire line first in the file; the two-pass load still resolves it.
    let circuit = Circuit::new();
    circuit.load_from_string("WIRE,120,100,280,100\n6,100,100,0,\n7,300,100,0,\n");
    assert_eq!(circuit.element_count(), 2);
    assert_eq!(circuit.wire_count(), 1);
}

#[test]
fn malformed_lines_are_skipped() {
    let circuit = Circuit::new();
    circuit.load_from_string("banana\n6,100,100,0,\nWIRE,1,2\n7,300,100,0,\n\n");
    assert_eq!(circuit.element_count(), 2);
    assert_eq!(circuit.wire_count(), 0);
}
