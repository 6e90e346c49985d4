/*!

  Connection points on circuit elements.

*/

use crate::element::Element;
use crate::wire::Wire;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A shared handle to a [Pin].
pub type PinRef = Rc<RefCell<Pin>>;

/// A directional connection point carrying one boolean value.
///
/// A pin is owned by its element (or, for virtual pins, by the circuit) and
/// holds only weak back-references to its owner and to the wire connected to
/// it, so a lookup through a removed entity yields [None] instead of a stale
/// reference.
#[derive(Debug)]
pub struct Pin {
    x: i32,
    y: i32,
    input: bool,
    value: bool,
    owner: Weak<RefCell<Element>>,
    wire: Weak<RefCell<Wire>>,
    virtual_pin: bool,
}

impl Pin {
    /// Creates a pin belonging to the element behind `owner`.
    pub(crate) fn new(x: i32, y: i32, input: bool, owner: Weak<RefCell<Element>>) -> PinRef {
        Rc::new(RefCell::new(Self {
            x,
            y,
            input,
            value: false,
            owner,
            wire: Weak::new(),
            virtual_pin: false,
        }))
    }

    /// Creates a circuit-owned virtual input pin, used to tap a wire mid-span.
    pub(crate) fn new_virtual(x: i32, y: i32) -> PinRef {
        Rc::new(RefCell::new(Self {
            x,
            y,
            input: true,
            value: false,
            owner: Weak::new(),
            wire: Weak::new(),
            virtual_pin: true,
        }))
    }

    /// Returns the x coordinate of the pin.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Returns the y coordinate of the pin.
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Returns `true` if this pin receives a value (as opposed to driving one).
    pub fn is_input(&self) -> bool {
        self.input
    }

    /// Returns the current logic value of the pin.
    pub fn value(&self) -> bool {
        self.value
    }

    /// Sets the logic value of the pin.
    pub fn set_value(&mut self, value: bool) {
        self.value = value;
    }

    /// Returns `true` if this is a circuit-owned virtual pin.
    pub fn is_virtual(&self) -> bool {
        self.virtual_pin
    }

    /// Moves the pin to an absolute position.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Returns the element owning this pin, if it is still alive.
    /// Virtual pins have no owner.
    pub fn owner(&self) -> Option<Rc<RefCell<Element>>> {
        self.owner.upgrade()
    }

    /// Returns the wire connected to this pin, if any.
    pub fn connected_wire(&self) -> Option<Rc<RefCell<Wire>>> {
        self.wire.upgrade()
    }

    /// Points the wire back-reference at `wire`.
    pub(crate) fn set_connected_wire(&mut self, wire: Weak<RefCell<Wire>>) {
        self.wire = wire;
    }

    /// Clears the wire back-reference.
    pub(crate) fn clear_connected_wire(&mut self) {
        self.wire = Weak::new();
    }

    /// Returns `true` if the wire back-reference points at `wire`.
    pub(crate) fn is_connected_to(&self, wire: &Rc<RefCell<Wire>>) -> bool {
        self.wire
            .upgrade()
            .is_some_and(|w| Rc::ptr_eq(&w, wire))
    }

    /// Returns `true` if `(x, y)` lies within `tolerance` of the pin on both axes.
    pub fn is_near(&self, x: i32, y: i32, tolerance: i32) -> bool {
        (self.x - x).abs() <= tolerance && (self.y - y).abs() <= tolerance
    }
}
