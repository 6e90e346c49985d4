/*!

  The circuit: the owning container for elements, wires, and virtual pins,
  plus the propagation sweep, the command log, and the textual save format.

  All edit methods take `&self`; the collections live behind [RefCell] so a
  single [Circuit] can be threaded through editor code without exclusive
  borrows. Handles returned to callers are [Rc] clones and stay valid (but
  inert) after the entity is removed from the circuit.

*/

use crate::command::{BatchEntry, Command, History};
use crate::element::{Element, ElementKind, ElementRef};
use crate::pin::{Pin, PinRef};
use crate::wire::{Wire, WireRef};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::Path;
use std::rc::Rc;

/// Pin lookups by position accept this much slack on each axis.
const PIN_TOLERANCE: i32 = 5;

/// Number of settle iterations per propagation sweep. Enough for a value to
/// cross five series stages; deeper chains settle over repeated sweeps.
const SWEEP_ITERATIONS: usize = 5;

/// An editable, simulatable collection of elements and wires.
///
/// The circuit records every structural edit (element/wire add and delete)
/// in a bounded command log; moves, selection, and value toggles are not
/// recorded. See [Circuit::undo] and [Circuit::redo].
///
/// Edit methods re-propagate before returning and the sweep borrows every
/// element mutably, so callers must not hold an element borrow across
/// them. Clone pin handles out first ([crate::element::Element::pin])
/// instead of passing `&element.borrow().pins()[i]` inline.
#[derive(Debug, Default)]
pub struct Circuit {
    elements: RefCell<Vec<ElementRef>>,
    wires: RefCell<Vec<WireRef>>,
    virtual_pins: RefCell<Vec<PinRef>>,
    history: RefCell<History>,
    restoring: Cell<bool>,
    simulating: Cell<bool>,
    generation: Cell<u64>,
}

impl Circuit {
    /// Creates an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns handles to every element, in insertion order.
    pub fn elements(&self) -> Vec<ElementRef> {
        self.elements.borrow().clone()
    }

    /// Returns handles to every wire, in insertion order.
    pub fn wires(&self) -> Vec<WireRef> {
        self.wires.borrow().clone()
    }

    /// Returns handles to every circuit-owned virtual pin.
    pub fn virtual_pins(&self) -> Vec<PinRef> {
        self.virtual_pins.borrow().clone()
    }

    /// Returns the number of elements.
    pub fn element_count(&self) -> usize {
        self.elements.borrow().len()
    }

    /// Returns the number of wires.
    pub fn wire_count(&self) -> usize {
        self.wires.borrow().len()
    }

    /// Returns every input source, in insertion order.
    pub fn input_elements(&self) -> Vec<ElementRef> {
        self.elements
            .borrow()
            .iter()
            .filter(|e| e.borrow().is_input_source())
            .cloned()
            .collect()
    }

    /// Returns every output sink, in insertion order.
    pub fn output_elements(&self) -> Vec<ElementRef> {
        self.elements
            .borrow()
            .iter()
            .filter(|e| e.borrow().is_output_sink())
            .cloned()
            .collect()
    }

    // ------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------

    /// Places a new element, records the edit, and re-propagates.
    pub fn add_element(&self, kind: ElementKind, x: i32, y: i32) -> ElementRef {
        let element = Element::new(kind, x, y);
        self.elements.borrow_mut().push(element.clone());
        let snapshot = element.borrow().serialize();
        self.record(Command::AddElement {
            element: Some(element.clone()),
            snapshot,
        });
        self.propagate();
        element
    }

    /// Connects two pins of opposite direction, normalizing so the wire
    /// runs output to input. Returns [None] without side effects if both
    /// pins have the same direction.
    pub fn connect(&self, a: &PinRef, b: &PinRef) -> Option<WireRef> {
        let wire = Wire::new(a.clone(), b.clone())?;
        self.attach(&wire);
        self.wires.borrow_mut().push(wire.clone());
        let snapshot = wire.borrow().snapshot_line();
        self.record(Command::AddWire {
            wire: Some(wire.clone()),
            snapshot,
        });
        self.propagate();
        Some(wire)
    }

    /// Taps an existing wire: creates a circuit-owned virtual pin at
    /// `(x, y)` on `target` and wires `from` to it. Returns [None] if
    /// `from` is not an output pin or `target` is not in the circuit.
    ///
    /// Undoing a tap is one-way: the virtual pin is reclaimed together
    /// with the wire, and snapshot replay resolves endpoints against
    /// element pins only, so a later redo restores nothing.
    pub fn tap_wire(&self, from: &PinRef, x: i32, y: i32, target: &WireRef) -> Option<WireRef> {
        if from.borrow().is_input() {
            return None;
        }
        if !self.wires.borrow().iter().any(|w| Rc::ptr_eq(w, target)) {
            return None;
        }
        let tap = Pin::new_virtual(x, y);
        let wire = Wire::new(from.clone(), tap.clone())?;
        self.virtual_pins.borrow_mut().push(tap);
        self.attach(&wire);
        self.wires.borrow_mut().push(wire.clone());
        let snapshot = wire.borrow().snapshot_line();
        self.record(Command::AddWire {
            wire: Some(wire.clone()),
            snapshot,
        });
        self.propagate();
        Some(wire)
    }

    /// Removes an element and every wire touching its pins, records the
    /// edit, and re-propagates. No-op if the element is not in the circuit.
    pub fn delete_element(&self, element: &ElementRef) {
        if !self
            .elements
            .borrow()
            .iter()
            .any(|e| Rc::ptr_eq(e, element))
        {
            return;
        }
        let snapshot = element.borrow().serialize();
        self.remove_element_silent(element);
        self.record(Command::DeleteElement {
            element: Some(element.clone()),
            snapshot,
        });
        self.propagate();
    }

    /// Removes a wire, clearing both endpoints' back-references and any
    /// virtual endpoint pin, records the edit, and re-propagates. No-op if
    /// the wire is not in the circuit.
    pub fn delete_wire(&self, wire: &WireRef) {
        if !self.wires.borrow().iter().any(|w| Rc::ptr_eq(w, wire)) {
            return;
        }
        let snapshot = wire.borrow().snapshot_line();
        self.unlink_wire(wire);
        self.record(Command::DeleteWire {
            wire: Some(wire.clone()),
            snapshot,
        });
        self.propagate();
    }

    /// Removes several elements as one undoable command.
    pub fn batch_delete(&self, elements: &[ElementRef]) {
        let present: Vec<ElementRef> = elements
            .iter()
            .filter(|e| {
                self.elements
                    .borrow()
                    .iter()
                    .any(|existing| Rc::ptr_eq(existing, e))
            })
            .cloned()
            .collect();
        if present.is_empty() {
            return;
        }
        let mut entries = Vec::with_capacity(present.len());
        for element in &present {
            entries.push(BatchEntry {
                element: Some(element.clone()),
                snapshot: element.borrow().serialize(),
            });
            self.remove_element_silent(element);
        }
        self.record(Command::BatchDelete { entries });
        self.propagate();
    }

    /// Removes every selected element as one undoable command.
    pub fn delete_selected(&self) {
        let selected: Vec<ElementRef> = self
            .elements
            .borrow()
            .iter()
            .filter(|e| e.borrow().is_selected())
            .cloned()
            .collect();
        self.batch_delete(&selected);
    }

    /// Empties the circuit and the command log.
    pub fn clear(&self) {
        self.elements.borrow_mut().clear();
        self.wires.borrow_mut().clear();
        self.virtual_pins.borrow_mut().clear();
        self.history.borrow_mut().clear();
        self.touch_history();
    }

    /// Points both endpoint pins' wire back-references at `wire`.
    fn attach(&self, wire: &WireRef) {
        let w = wire.borrow();
        w.output_pin()
            .borrow_mut()
            .set_connected_wire(Rc::downgrade(wire));
        w.input_pin()
            .borrow_mut()
            .set_connected_wire(Rc::downgrade(wire));
    }

    /// Detaches and removes a wire. Both endpoints' back-references are
    /// cleared (only if they still point at this wire), and a virtual
    /// endpoint pin is dropped from the circuit's virtual pin list.
    fn unlink_wire(&self, wire: &WireRef) {
        {
            let w = wire.borrow();
            for pin in [w.output_pin(), w.input_pin()] {
                if pin.borrow().is_connected_to(wire) {
                    pin.borrow_mut().clear_connected_wire();
                }
                if pin.borrow().is_virtual() {
                    self.virtual_pins
                        .borrow_mut()
                        .retain(|p| !Rc::ptr_eq(p, pin));
                }
            }
        }
        self.wires.borrow_mut().retain(|w| !Rc::ptr_eq(w, wire));
    }

    /// Removes a wire without recording a command. Command replay path.
    pub(crate) fn remove_wire_silent(&self, wire: &WireRef) {
        self.unlink_wire(wire);
    }

    /// Removes an element and its attached wires without recording a
    /// command. Wire teardown goes through the same unlink path as
    /// [Circuit::delete_wire].
    pub(crate) fn remove_element_silent(&self, element: &ElementRef) {
        let attached: Vec<WireRef> = {
            let el = element.borrow();
            self.wires
                .borrow()
                .iter()
                .filter(|w| el.pins().iter().any(|p| w.borrow().touches(p)))
                .cloned()
                .collect()
        };
        for wire in &attached {
            self.unlink_wire(wire);
        }
        self.elements
            .borrow_mut()
            .retain(|e| !Rc::ptr_eq(e, element));
    }

    /// Re-materializes an element from its snapshot line. Command replay
    /// path; returns the new handle so the command can target it later.
    pub(crate) fn restore_element(&self, snapshot: &str) -> Option<ElementRef> {
        let element = Element::deserialize(snapshot)?;
        self.elements.borrow_mut().push(element.clone());
        Some(element)
    }

    /// Re-materializes a wire from its snapshot line, resolving endpoints
    /// by position and re-validating each recorded direction flag.
    pub(crate) fn restore_wire(&self, snapshot: &str) -> Option<WireRef> {
        let mut fields = snapshot.trim().split(',');
        if fields.next()? != "WIRE" {
            return None;
        }
        let sx: i32 = fields.next()?.trim().parse().ok()?;
        let sy: i32 = fields.next()?.trim().parse().ok()?;
        let s_input = fields.next()?.trim() == "1";
        let ex: i32 = fields.next()?.trim().parse().ok()?;
        let ey: i32 = fields.next()?.trim().parse().ok()?;
        let e_input = fields.next()?.trim() == "1";
        let a = self.find_pin_at(sx, sy)?;
        let b = self.find_pin_at(ex, ey)?;
        if a.borrow().is_input() != s_input || b.borrow().is_input() != e_input {
            return None;
        }
        let wire = Wire::new(a, b)?;
        self.attach(&wire);
        self.wires.borrow_mut().push(wire.clone());
        Some(wire)
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// Finds an element pin within the position tolerance. Virtual pins
    /// are not searched; they cannot be connection targets by position.
    pub fn find_pin_at(&self, x: i32, y: i32) -> Option<PinRef> {
        for element in self.elements.borrow().iter() {
            for pin in element.borrow().pins() {
                if pin.borrow().is_near(x, y, PIN_TOLERANCE) {
                    return Some(pin.clone());
                }
            }
        }
        None
    }

    /// Finds the topmost element whose bounding box contains `(x, y)`.
    pub fn find_element_at(&self, x: i32, y: i32) -> Option<ElementRef> {
        self.elements
            .borrow()
            .iter()
            .rev()
            .find(|e| e.borrow().bounding_box().contains(x, y))
            .cloned()
    }

    // ------------------------------------------------------------------
    // Simulation
    // ------------------------------------------------------------------

    /// Runs the fixed-iteration combinational sweep: input sources, wires,
    /// gates, wires again, output sinks. Sequential elements are left
    /// untouched; they advance only through [Circuit::tick].
    ///
    /// # Panics
    ///
    /// Panics if the caller holds a borrow of any element; the sweep
    /// borrows each one mutably.
    pub fn propagate(&self) {
        let elements = self.elements.borrow().clone();
        let wires = self.wires.borrow().clone();
        for _ in 0..SWEEP_ITERATIONS {
            for element in &elements {
                let mut el = element.borrow_mut();
                if el.is_input_source() {
                    el.update();
                }
            }
            for wire in &wires {
                wire.borrow().update();
            }
            for element in &elements {
                let mut el = element.borrow_mut();
                if el.is_gate() {
                    el.update();
                }
            }
            for wire in &wires {
                wire.borrow().update();
            }
            for element in &elements {
                let mut el = element.borrow_mut();
                if el.is_output_sink() {
                    el.update();
                }
            }
        }
    }

    /// Advances sequential logic by one step: every clock updates once,
    /// then the settle sweep runs with edge-triggered devices included in
    /// the gate stage. Edge detection fires at most once per tick because
    /// the clock level is stable throughout the settle sweep.
    ///
    /// # Panics
    ///
    /// Panics if the caller holds a borrow of any element; the sweep
    /// borrows each one mutably.
    pub fn tick(&self) {
        let elements = self.elements.borrow().clone();
        let wires = self.wires.borrow().clone();
        for element in &elements {
            let mut el = element.borrow_mut();
            if el.is_clock() {
                el.update();
            }
        }
        for _ in 0..SWEEP_ITERATIONS {
            for element in &elements {
                let mut el = element.borrow_mut();
                if el.is_input_source() {
                    el.update();
                }
            }
            for wire in &wires {
                wire.borrow().update();
            }
            for element in &elements {
                let mut el = element.borrow_mut();
                if el.is_gate() || (el.is_sequential() && !el.is_clock()) {
                    el.update();
                }
            }
            for wire in &wires {
                wire.borrow().update();
            }
            for element in &elements {
                let mut el = element.borrow_mut();
                if el.is_output_sink() {
                    el.update();
                }
            }
        }
    }

    /// Returns `true` while the simulation is running.
    pub fn is_simulating(&self) -> bool {
        self.simulating.get()
    }

    /// Marks the simulation as running.
    pub fn start_simulation(&self) {
        self.simulating.set(true);
    }

    /// Stops the simulation, drives every input source low, and
    /// re-propagates.
    pub fn stop_simulation(&self) {
        self.simulating.set(false);
        for element in self.elements.borrow().iter() {
            let mut el = element.borrow_mut();
            if el.is_input_source() {
                el.set_io_value(false);
            }
        }
        self.propagate();
    }

    // ------------------------------------------------------------------
    // Undo / redo
    // ------------------------------------------------------------------

    /// Reverts the most recent committed edit, if any.
    pub fn undo(&self) {
        let command = self.history.borrow_mut().pop_undo();
        let Some(mut command) = command else {
            return;
        };
        self.restoring.set(true);
        command.undo(self);
        self.restoring.set(false);
        self.history.borrow_mut().push_redo(command);
        self.touch_history();
        self.propagate();
    }

    /// Re-applies the most recently undone edit, if any.
    pub fn redo(&self) {
        let command = self.history.borrow_mut().pop_redo();
        let Some(mut command) = command else {
            return;
        };
        self.restoring.set(true);
        command.redo(self);
        self.restoring.set(false);
        self.history.borrow_mut().push_undo(command);
        self.touch_history();
        self.propagate();
    }

    /// Returns `true` if there is a committed edit to revert.
    pub fn can_undo(&self) -> bool {
        self.history.borrow().can_undo()
    }

    /// Returns `true` if there is an undone edit to re-apply.
    pub fn can_redo(&self) -> bool {
        self.history.borrow().can_redo()
    }

    /// A counter bumped whenever the undo/redo stacks change. UI layers
    /// poll it together with [Circuit::can_undo]/[Circuit::can_redo]
    /// instead of being called back.
    pub fn history_generation(&self) -> u64 {
        self.generation.get()
    }

    fn record(&self, command: Command) {
        if self.restoring.get() {
            return;
        }
        self.history.borrow_mut().record(command);
        self.touch_history();
    }

    fn touch_history(&self) {
        self.generation.set(self.generation.get() + 1);
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// Serializes the whole circuit: one element line per element, then
    /// one wire line per wire.
    pub fn save_to_string(&self) -> String {
        let mut out = String::new();
        for element in self.elements.borrow().iter() {
            out.push_str(&element.borrow().serialize());
            out.push('\n');
        }
        for wire in self.wires.borrow().iter() {
            out.push_str(&wire.borrow().save_line());
            out.push('\n');
        }
        out
    }

    /// Replaces the circuit's contents with the parse of `text`.
    ///
    /// The load is two-pass: every element line first, then every wire
    /// line, so wires resolve against the full set of pins. Malformed
    /// lines and wires whose endpoints cannot be resolved are skipped
    /// without error.
    pub fn load_from_string(&self, text: &str) {
        self.clear();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("WIRE") {
                continue;
            }
            if let Some(element) = Element::deserialize(line) {
                self.elements.borrow_mut().push(element);
            }
        }
        for line in text.lines() {
            let line = line.trim();
            if line.starts_with("WIRE") {
                let _ = self.load_wire_line(line);
            }
        }
        self.propagate();
    }

    /// Writes the save text to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        std::fs::write(path, self.save_to_string())
            .map_err(|e| format!("failed to write {}: {e}", path.display()))
    }

    /// Replaces the circuit's contents with the parse of a file.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        self.load_from_string(&text);
        Ok(())
    }

    /// Parses a file-format wire line (`WIRE,sx,sy,ex,ey`), resolving both
    /// endpoints by position. Direction validation happens in [Wire::new].
    fn load_wire_line(&self, line: &str) -> Option<WireRef> {
        let mut fields = line.trim().split(',');
        if fields.next()? != "WIRE" {
            return None;
        }
        let sx: i32 = fields.next()?.trim().parse().ok()?;
        let sy: i32 = fields.next()?.trim().parse().ok()?;
        let ex: i32 = fields.next()?.trim().parse().ok()?;
        let ey: i32 = fields.next()?.trim().parse().ok()?;
        let a = self.find_pin_at(sx, sy)?;
        let b = self.find_pin_at(ex, ey)?;
        let wire = Wire::new(a, b)?;
        self.attach(&wire);
        self.wires.borrow_mut().push(wire.clone());
        Some(wire)
    }

    // ------------------------------------------------------------------
    // Integrity
    // ------------------------------------------------------------------

    /// Checks referential integrity and returns the first violation found.
    ///
    /// Verified properties: wire endpoints have opposite directions; every
    /// endpoint's wire back-reference resolves to a wire still in the
    /// circuit; every non-virtual endpoint's owner element is still in the
    /// circuit; every virtual pin is an endpoint of some wire.
    pub fn verify(&self) -> Result<(), String> {
        let elements = self.elements.borrow();
        let wires = self.wires.borrow();
        for wire in wires.iter() {
            let w = wire.borrow();
            if w.output_pin().borrow().is_input() || !w.input_pin().borrow().is_input() {
                return Err("wire endpoints have matching directions".to_string());
            }
            for pin in [w.output_pin(), w.input_pin()] {
                let p = pin.borrow();
                match p.connected_wire() {
                    Some(back) if wires.iter().any(|w| Rc::ptr_eq(w, &back)) => (),
                    Some(_) => {
                        return Err(format!(
                            "pin at ({}, {}) references a wire no longer in the circuit",
                            p.x(),
                            p.y()
                        ));
                    }
                    None => (),
                }
                if !p.is_virtual() {
                    let owner = p
                        .owner()
                        .ok_or_else(|| format!("pin at ({}, {}) has a dead owner", p.x(), p.y()))?;
                    if !elements.iter().any(|e| Rc::ptr_eq(e, &owner)) {
                        return Err(format!(
                            "pin at ({}, {}) belongs to a removed element",
                            p.x(),
                            p.y()
                        ));
                    }
                }
            }
        }
        for pin in self.virtual_pins.borrow().iter() {
            if !wires.iter().any(|w| w.borrow().touches(pin)) {
                let p = pin.borrow();
                return Err(format!(
                    "virtual pin at ({}, {}) is attached to no wire",
                    p.x(),
                    p.y()
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.save_to_string())
    }
}
