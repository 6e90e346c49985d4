/*!

  Directed wires between pins.

*/

use crate::pin::PinRef;
use std::cell::RefCell;
use std::rc::Rc;

/// A shared handle to a [Wire].
pub type WireRef = Rc<RefCell<Wire>>;

/// A directed connection carrying a value from an output pin to an input pin.
///
/// Construction normalizes the endpoint order, so `output_pin` always drives
/// and `input_pin` always receives regardless of the order the user drew the
/// connection in.
#[derive(Debug)]
pub struct Wire {
    output_pin: PinRef,
    input_pin: PinRef,
}

impl Wire {
    /// Creates a wire between two pins of opposite direction, normalizing so
    /// the driving pin comes first. Returns [None] if both pins have the
    /// same direction.
    pub fn new(a: PinRef, b: PinRef) -> Option<WireRef> {
        let a_input = a.borrow().is_input();
        let b_input = b.borrow().is_input();
        let (output_pin, input_pin) = match (a_input, b_input) {
            (false, true) => (a, b),
            (true, false) => (b, a),
            _ => return None,
        };
        Some(Rc::new(RefCell::new(Wire {
            output_pin,
            input_pin,
        })))
    }

    /// Returns the driving endpoint.
    pub fn output_pin(&self) -> &PinRef {
        &self.output_pin
    }

    /// Returns the receiving endpoint.
    pub fn input_pin(&self) -> &PinRef {
        &self.input_pin
    }

    /// Copies the driving pin's value onto the receiving pin.
    pub fn update(&self) {
        let value = self.output_pin.borrow().value();
        self.input_pin.borrow_mut().set_value(value);
    }

    /// Returns `true` if `pin` is one of this wire's endpoints.
    pub fn touches(&self, pin: &PinRef) -> bool {
        Rc::ptr_eq(&self.output_pin, pin) || Rc::ptr_eq(&self.input_pin, pin)
    }

    /// Returns `true` if either endpoint is a circuit-owned virtual pin.
    pub fn has_virtual_endpoint(&self) -> bool {
        self.output_pin.borrow().is_virtual() || self.input_pin.borrow().is_virtual()
    }

    /// Serializes the wire for a save file: endpoint coordinates only,
    /// driving pin first. The loader re-resolves pins by position.
    pub fn save_line(&self) -> String {
        let out = self.output_pin.borrow();
        let inp = self.input_pin.borrow();
        format!("WIRE,{},{},{},{}", out.x(), out.y(), inp.x(), inp.y())
    }

    /// Serializes the wire for a command snapshot: coordinates plus the
    /// direction flag of each endpoint, so replay can re-validate direction.
    pub fn snapshot_line(&self) -> String {
        let out = self.output_pin.borrow();
        let inp = self.input_pin.borrow();
        format!(
            "WIRE,{},{},{},{},{},{}",
            out.x(),
            out.y(),
            if out.is_input() { 1 } else { 0 },
            inp.x(),
            inp.y(),
            if inp.is_input() { 1 } else { 0 }
        )
    }
}
