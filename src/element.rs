/*!

  Circuit elements: combinational gates, I/O terminals, and sequential
  devices, modeled as one closed tagged union.

  The variant set is fixed, so everything that dispatches over elements
  (the propagation sweep, the serialized-line factory, display surfaces)
  matches exhaustively instead of going through an open trait object.

*/

use crate::pin::{Pin, PinRef};
use bitvec::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// A shared handle to an [Element].
pub type ElementRef = Rc<RefCell<Element>>;

/// Integer variant tags, shared by the save format and command snapshots.
const TAG_AND: u32 = 0;
const TAG_OR: u32 = 1;
const TAG_NOT: u32 = 2;
const TAG_XOR: u32 = 3;
const TAG_NAND: u32 = 4;
const TAG_NOR: u32 = 5;
const TAG_INPUT: u32 = 6;
const TAG_OUTPUT: u32 = 7;
const TAG_CLOCK: u32 = 8;
const TAG_RS_LATCH: u32 = 9;
const TAG_D_FLIP_FLOP: u32 = 10;
const TAG_JK_FLIP_FLOP: u32 = 11;
const TAG_T_FLIP_FLOP: u32 = 12;
const TAG_REGISTER: u32 = 13;

/// Auto-generated terminal labels that must not survive a save/load
/// round-trip as if they were user-assigned names.
const DEFAULT_IO_NAMES: [&str; 6] = [
    "INPUT",
    "OUTPUT",
    "IN",
    "OUT",
    "Input Pin",
    "Output Pin",
];

/// The boolean function computed by a combinational gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub enum GateOp {
    /// Output is high iff both inputs are high
    And,
    /// Output is high iff either input is high
    Or,
    /// Output is the negation of the single input
    Not,
    /// Output is high iff the inputs differ
    Xor,
    /// Negated AND
    Nand,
    /// Negated OR
    Nor,
}

impl GateOp {
    /// Returns the number of input pins the gate takes.
    pub fn arity(&self) -> usize {
        match self {
            GateOp::Not => 1,
            _ => 2,
        }
    }

    /// Applies the gate's truth table. `b` is ignored for [GateOp::Not].
    pub fn eval(&self, a: bool, b: bool) -> bool {
        match self {
            GateOp::And => a && b,
            GateOp::Or => a || b,
            GateOp::Not => !a,
            GateOp::Xor => a != b,
            GateOp::Nand => !(a && b),
            GateOp::Nor => !(a || b),
        }
    }

    /// Returns the gate's name as used in display surfaces.
    pub fn name(&self) -> &'static str {
        match self {
            GateOp::And => "AND",
            GateOp::Or => "OR",
            GateOp::Not => "NOT",
            GateOp::Xor => "XOR",
            GateOp::Nand => "NAND",
            GateOp::Nor => "NOR",
        }
    }

    fn tag(&self) -> u32 {
        match self {
            GateOp::And => TAG_AND,
            GateOp::Or => TAG_OR,
            GateOp::Not => TAG_NOT,
            GateOp::Xor => TAG_XOR,
            GateOp::Nand => TAG_NAND,
            GateOp::Nor => TAG_NOR,
        }
    }

    fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            TAG_AND => Some(GateOp::And),
            TAG_OR => Some(GateOp::Or),
            TAG_NOT => Some(GateOp::Not),
            TAG_XOR => Some(GateOp::Xor),
            TAG_NAND => Some(GateOp::Nand),
            TAG_NOR => Some(GateOp::Nor),
            _ => None,
        }
    }
}

/// The closed set of element variants, each carrying its own state.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// A stateless combinational gate
    Gate(GateOp),
    /// A value source driven by the user; it has no input pin
    Input {
        /// The stored boolean copied to the output pin on update
        value: bool,
        /// Optional user-assigned display name
        name: String,
    },
    /// A value sink mirroring its input pin for display and queries
    Output {
        /// The stored boolean copied from the input pin on update
        value: bool,
        /// Optional user-assigned display name
        name: String,
    },
    /// A tick-divided square-wave source
    Clock {
        /// Number of updates between output flips
        frequency: u32,
        /// Updates seen since the last flip
        counter: u32,
        /// Current output level
        value: bool,
        /// A disabled clock ignores updates entirely
        enabled: bool,
    },
    /// A level-triggered set/reset latch
    RsLatch {
        /// The Q output
        q: bool,
        /// The Q' output; not always the negation of Q (see [Element::update])
        q_not: bool,
    },
    /// A rising-edge D flip-flop
    DFlipFlop {
        /// The Q output
        q: bool,
        /// Clock level seen on the previous update
        last_clock: bool,
    },
    /// A rising-edge JK flip-flop
    JkFlipFlop {
        /// The Q output
        q: bool,
        /// Clock level seen on the previous update
        last_clock: bool,
    },
    /// A rising-edge toggle flip-flop
    TFlipFlop {
        /// The Q output
        q: bool,
        /// Clock level seen on the previous update
        last_clock: bool,
    },
    /// A 4-bit parallel-load register
    Register {
        /// The stored bits, mirrored to the output pins every update
        bits: BitVec,
        /// Clock level seen on the previous update
        last_clock: bool,
    },
}

impl ElementKind {
    /// Returns a fresh input source with no custom name.
    pub fn input_source() -> Self {
        ElementKind::Input {
            value: false,
            name: String::new(),
        }
    }

    /// Returns a fresh output sink with no custom name.
    pub fn output_sink() -> Self {
        ElementKind::Output {
            value: false,
            name: String::new(),
        }
    }

    /// Returns an enabled clock with the given tick divisor.
    pub fn clock(frequency: u32) -> Self {
        ElementKind::Clock {
            frequency,
            counter: 0,
            value: false,
            enabled: true,
        }
    }

    /// Returns an RS latch holding Q=0, Q'=1.
    pub fn rs_latch() -> Self {
        ElementKind::RsLatch { q: false, q_not: true }
    }

    /// Returns a D flip-flop holding Q=0.
    pub fn d_flip_flop() -> Self {
        ElementKind::DFlipFlop {
            q: false,
            last_clock: false,
        }
    }

    /// Returns a JK flip-flop holding Q=0.
    pub fn jk_flip_flop() -> Self {
        ElementKind::JkFlipFlop {
            q: false,
            last_clock: false,
        }
    }

    /// Returns a T flip-flop holding Q=0.
    pub fn t_flip_flop() -> Self {
        ElementKind::TFlipFlop {
            q: false,
            last_clock: false,
        }
    }

    /// Returns a 4-bit register cleared to zero.
    pub fn register() -> Self {
        ElementKind::Register {
            bits: bitvec![0; 4],
            last_clock: false,
        }
    }

    /// Returns the integer variant tag used as the first save-format field.
    pub fn tag(&self) -> u32 {
        match self {
            ElementKind::Gate(op) => op.tag(),
            ElementKind::Input { .. } => TAG_INPUT,
            ElementKind::Output { .. } => TAG_OUTPUT,
            ElementKind::Clock { .. } => TAG_CLOCK,
            ElementKind::RsLatch { .. } => TAG_RS_LATCH,
            ElementKind::DFlipFlop { .. } => TAG_D_FLIP_FLOP,
            ElementKind::JkFlipFlop { .. } => TAG_JK_FLIP_FLOP,
            ElementKind::TFlipFlop { .. } => TAG_T_FLIP_FLOP,
            ElementKind::Register { .. } => TAG_REGISTER,
        }
    }

    /// Pin positions and directions relative to an element placed at `(x, y)`.
    /// Inputs come first; the order is fixed and relied upon by `update`.
    fn pin_layout(&self, x: i32, y: i32) -> Vec<(i32, i32, bool)> {
        match self {
            ElementKind::Gate(op) if op.arity() == 1 => {
                vec![(x - 40, y, true), (x + 40, y, false)]
            }
            ElementKind::Gate(_) => vec![
                (x - 40, y - 20, true),
                (x - 40, y + 20, true),
                (x + 40, y, false),
            ],
            ElementKind::Input { .. } => vec![(x + 20, y, false)],
            ElementKind::Output { .. } => vec![(x - 20, y, true)],
            ElementKind::Clock { .. } => vec![(x + 20, y, false)],
            ElementKind::RsLatch { .. } => vec![
                (x - 20, y - 15, true),
                (x - 20, y + 15, true),
                (x + 20, y - 10, false),
                (x + 20, y + 10, false),
            ],
            ElementKind::DFlipFlop { .. } => vec![
                (x - 20, y - 15, true),
                (x - 20, y, true),
                (x + 20, y - 10, false),
                (x + 20, y + 10, false),
            ],
            ElementKind::JkFlipFlop { .. } => vec![
                (x - 20, y - 20, true),
                (x - 20, y, true),
                (x - 20, y + 20, true),
                (x + 20, y - 10, false),
                (x + 20, y + 10, false),
            ],
            ElementKind::TFlipFlop { .. } => vec![
                (x - 20, y - 10, true),
                (x - 20, y + 10, true),
                (x + 20, y - 10, false),
                (x + 20, y + 10, false),
            ],
            ElementKind::Register { .. } => {
                let mut layout: Vec<(i32, i32, bool)> =
                    (0..4).map(|i| (x - 30, y - 30 + i * 15, true)).collect();
                layout.push((x - 30, y + 30, true)); // CLK
                layout.push((x - 30, y + 45, true)); // LOAD
                layout.extend((0..4).map(|i| (x + 30, y - 30 + i * 15, false)));
                layout
            }
        }
    }
}

/// An axis-aligned rectangle around an element, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct BoundingBox {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width of the box
    pub width: i32,
    /// Height of the box
    pub height: i32,
}

impl BoundingBox {
    /// Returns `true` if `(x, y)` lies inside the rectangle, edges included.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// A placed circuit component with fixed pin geometry.
///
/// Pin count and layout are fixed at construction per variant and never
/// change afterwards; moving an element shifts its pins by the same delta.
#[derive(Debug)]
pub struct Element {
    kind: ElementKind,
    x: i32,
    y: i32,
    selected: bool,
    pins: Vec<PinRef>,
}

impl Element {
    /// Creates an element of the given kind at `(x, y)`, with the
    /// variant-fixed pin layout. The pins hold weak back-references to the
    /// returned handle.
    pub fn new(kind: ElementKind, x: i32, y: i32) -> ElementRef {
        let element = Rc::new(RefCell::new(Element {
            kind,
            x,
            y,
            selected: false,
            pins: Vec::new(),
        }));
        let layout = element.borrow().kind.pin_layout(x, y);
        let pins = layout
            .into_iter()
            .map(|(px, py, input)| Pin::new(px, py, input, Rc::downgrade(&element)))
            .collect();
        element.borrow_mut().pins = pins;
        element
    }

    /// Returns the element's variant and state.
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Returns the element's variant and state mutably.
    pub fn kind_mut(&mut self) -> &mut ElementKind {
        &mut self.kind
    }

    /// Returns the x coordinate of the element's anchor point.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Returns the y coordinate of the element's anchor point.
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Returns `true` if the element is part of the current selection.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Marks the element as selected or not. Selection is transient editor
    /// state and never serialized.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Returns the element's pins, inputs first.
    pub fn pins(&self) -> &[PinRef] {
        &self.pins
    }

    /// Returns an owned handle to the pin at `index`, inputs first.
    ///
    /// Unlike indexing into [Element::pins], the returned handle does not
    /// keep the element borrowed, so it can be passed straight to circuit
    /// edit methods.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for the element's pin count.
    pub fn pin(&self, index: usize) -> PinRef {
        self.pins[index].clone()
    }

    /// Returns the element's input pins.
    pub fn input_pins(&self) -> Vec<PinRef> {
        self.pins
            .iter()
            .filter(|p| p.borrow().is_input())
            .cloned()
            .collect()
    }

    /// Returns the element's output pins.
    pub fn output_pins(&self) -> Vec<PinRef> {
        self.pins
            .iter()
            .filter(|p| !p.borrow().is_input())
            .cloned()
            .collect()
    }

    /// Moves the element, shifting every pin by the same delta.
    pub fn set_position(&mut self, x: i32, y: i32) {
        let dx = x - self.x;
        let dy = y - self.y;
        self.x = x;
        self.y = y;
        for pin in &self.pins {
            let mut pin = pin.borrow_mut();
            let (px, py) = (pin.x(), pin.y());
            pin.set_position(px + dx, py + dy);
        }
    }

    /// Returns the bounding rectangle used for hit testing and layout.
    pub fn bounding_box(&self) -> BoundingBox {
        let (dx, dy, width, height) = match &self.kind {
            ElementKind::Gate(_) => (-50, -40, 100, 80),
            ElementKind::Input { .. } | ElementKind::Output { .. } => (-15, -15, 30, 30),
            ElementKind::Clock { .. } => (-15, -15, 30, 30),
            ElementKind::RsLatch { .. }
            | ElementKind::DFlipFlop { .. }
            | ElementKind::TFlipFlop { .. } => (-20, -25, 40, 50),
            ElementKind::JkFlipFlop { .. } => (-20, -30, 40, 60),
            ElementKind::Register { .. } => (-30, -40, 60, 80),
        };
        BoundingBox {
            x: self.x + dx,
            y: self.y + dy,
            width,
            height,
        }
    }

    /// Returns `true` for gate variants.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, ElementKind::Gate(_))
    }

    /// Returns `true` for input sources.
    pub fn is_input_source(&self) -> bool {
        matches!(self.kind, ElementKind::Input { .. })
    }

    /// Returns `true` for output sinks.
    pub fn is_output_sink(&self) -> bool {
        matches!(self.kind, ElementKind::Output { .. })
    }

    /// Returns `true` for clock elements.
    pub fn is_clock(&self) -> bool {
        matches!(self.kind, ElementKind::Clock { .. })
    }

    /// Returns `true` for clocks and edge-triggered devices, which the
    /// plain combinational sweep leaves untouched.
    pub fn is_sequential(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::Clock { .. }
                | ElementKind::RsLatch { .. }
                | ElementKind::DFlipFlop { .. }
                | ElementKind::JkFlipFlop { .. }
                | ElementKind::TFlipFlop { .. }
                | ElementKind::Register { .. }
        )
    }

    /// Returns the stored boolean of an I/O terminal, or [None] for other
    /// element kinds.
    pub fn io_value(&self) -> Option<bool> {
        match &self.kind {
            ElementKind::Input { value, .. } | ElementKind::Output { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Sets the stored boolean of an I/O terminal. Toggling an input
    /// source's value is how the user drives the simulation. No-op for
    /// other element kinds.
    pub fn set_io_value(&mut self, value: bool) {
        match &mut self.kind {
            ElementKind::Input { value: v, .. } | ElementKind::Output { value: v, .. } => {
                *v = value;
            }
            _ => (),
        }
    }

    /// Assigns a custom display name to an I/O terminal. No-op for other
    /// element kinds.
    pub fn set_custom_name(&mut self, new_name: &str) {
        match &mut self.kind {
            ElementKind::Input { name, .. } | ElementKind::Output { name, .. } => {
                new_name.clone_into(name);
            }
            _ => (),
        }
    }

    /// Returns the element's type name ("AND", "CLOCK", "RS_FLIPFLOP", ...).
    pub fn name(&self) -> &'static str {
        match &self.kind {
            ElementKind::Gate(op) => op.name(),
            ElementKind::Input { .. } => "INPUT",
            ElementKind::Output { .. } => "OUTPUT",
            ElementKind::Clock { .. } => "CLOCK",
            ElementKind::RsLatch { .. } => "RS_FLIPFLOP",
            ElementKind::DFlipFlop { .. } => "D_FLIPFLOP",
            ElementKind::JkFlipFlop { .. } => "JK_FLIPFLOP",
            ElementKind::TFlipFlop { .. } => "T_FLIPFLOP",
            ElementKind::Register { .. } => "REGISTER",
        }
    }

    /// Returns the human-facing name shown in status and property surfaces.
    /// I/O terminals prefer their custom name when one is set.
    pub fn display_name(&self) -> String {
        match &self.kind {
            ElementKind::Gate(op) => format!("{} Gate", op.name()),
            ElementKind::Input { name, .. } if !name.is_empty() => name.clone(),
            ElementKind::Input { .. } => "Input Pin".to_string(),
            ElementKind::Output { name, .. } if !name.is_empty() => name.clone(),
            ElementKind::Output { .. } => "Output Pin".to_string(),
            ElementKind::Clock { frequency, .. } => format!("Clock ({frequency}Hz)"),
            ElementKind::RsLatch { .. } => "RS Flip-Flop".to_string(),
            ElementKind::DFlipFlop { .. } => "D Flip-Flop".to_string(),
            ElementKind::JkFlipFlop { .. } => "JK Flip-Flop".to_string(),
            ElementKind::TFlipFlop { .. } => "T Flip-Flop".to_string(),
            ElementKind::Register { .. } => "4-bit Register".to_string(),
        }
    }

    /// Recomputes output pin values from current input pin values.
    ///
    /// Gates are pure functions of their inputs. Edge-triggered devices
    /// compare the clock pin against the level seen on the previous call;
    /// `last_clock` advances unconditionally, edge or not. Missing pins
    /// (which cannot occur post-construction) make this a no-op.
    pub fn update(&mut self) {
        match &mut self.kind {
            ElementKind::Gate(op) => {
                let arity = op.arity();
                if self.pins.len() < arity + 1 {
                    return;
                }
                let a = self.pins[0].borrow().value();
                let b = if arity == 2 {
                    self.pins[1].borrow().value()
                } else {
                    false
                };
                self.pins[arity].borrow_mut().set_value(op.eval(a, b));
            }
            ElementKind::Input { value, .. } => {
                if let Some(pin) = self.pins.first() {
                    pin.borrow_mut().set_value(*value);
                }
            }
            ElementKind::Output { value, .. } => {
                if let Some(pin) = self.pins.first() {
                    *value = pin.borrow().value();
                }
            }
            ElementKind::Clock {
                frequency,
                counter,
                value,
                enabled,
            } => {
                if !*enabled {
                    return;
                }
                *counter += 1;
                if *counter >= *frequency {
                    *value = !*value;
                    *counter = 0;
                }
                if let Some(pin) = self.pins.first() {
                    pin.borrow_mut().set_value(*value);
                }
            }
            ElementKind::RsLatch { q, q_not } => {
                if self.pins.len() < 4 {
                    return;
                }
                let s = self.pins[0].borrow().value();
                let r = self.pins[1].borrow().value();
                if s && !r {
                    *q = true;
                    *q_not = false;
                } else if !s && r {
                    *q = false;
                    *q_not = true;
                } else if s && r {
                    // Both asserted is represented explicitly, not latched.
                    *q = true;
                    *q_not = true;
                }
                self.pins[2].borrow_mut().set_value(*q);
                self.pins[3].borrow_mut().set_value(*q_not);
            }
            ElementKind::DFlipFlop { q, last_clock } => {
                if self.pins.len() < 4 {
                    return;
                }
                let d = self.pins[0].borrow().value();
                let clock = self.pins[1].borrow().value();
                if clock && !*last_clock {
                    *q = d;
                }
                *last_clock = clock;
                self.pins[2].borrow_mut().set_value(*q);
                self.pins[3].borrow_mut().set_value(!*q);
            }
            ElementKind::JkFlipFlop { q, last_clock } => {
                if self.pins.len() < 5 {
                    return;
                }
                let j = self.pins[0].borrow().value();
                let k = self.pins[1].borrow().value();
                let clock = self.pins[2].borrow().value();
                if clock && !*last_clock {
                    if j && !k {
                        *q = true;
                    } else if !j && k {
                        *q = false;
                    } else if j && k {
                        *q = !*q;
                    }
                }
                *last_clock = clock;
                self.pins[3].borrow_mut().set_value(*q);
                self.pins[4].borrow_mut().set_value(!*q);
            }
            ElementKind::TFlipFlop { q, last_clock } => {
                if self.pins.len() < 4 {
                    return;
                }
                let t = self.pins[0].borrow().value();
                let clock = self.pins[1].borrow().value();
                if clock && !*last_clock && t {
                    *q = !*q;
                }
                *last_clock = clock;
                self.pins[2].borrow_mut().set_value(*q);
                self.pins[3].borrow_mut().set_value(!*q);
            }
            ElementKind::Register { bits, last_clock } => {
                if self.pins.len() < 10 {
                    return;
                }
                let clock = self.pins[4].borrow().value();
                let load = self.pins[5].borrow().value();
                if clock && !*last_clock && load {
                    for i in 0..4 {
                        let d = self.pins[i].borrow().value();
                        bits.set(i, d);
                    }
                }
                *last_clock = clock;
                for i in 0..4 {
                    self.pins[6 + i].borrow_mut().set_value(bits[i]);
                }
            }
        }
    }

    /// Serializes the element to its one-line save-format record.
    ///
    /// I/O terminal names equal to an auto-generated default are written as
    /// empty so a reload does not mistake them for custom names.
    pub fn serialize(&self) -> String {
        let tag = self.kind.tag();
        let bit = |b: bool| if b { 1 } else { 0 };
        match &self.kind {
            ElementKind::Gate(_) => format!("{},{},{}", tag, self.x, self.y),
            ElementKind::Input { value, name } | ElementKind::Output { value, name } => {
                let name = if DEFAULT_IO_NAMES.contains(&name.as_str()) {
                    ""
                } else {
                    name.as_str()
                };
                format!("{},{},{},{},{}", tag, self.x, self.y, bit(*value), name)
            }
            ElementKind::Clock {
                frequency, enabled, ..
            } => format!(
                "{},{},{},{},{}",
                tag,
                self.x,
                self.y,
                frequency,
                bit(*enabled)
            ),
            ElementKind::RsLatch { q, q_not } => format!(
                "{},{},{},{},{}",
                tag,
                self.x,
                self.y,
                bit(*q),
                bit(*q_not)
            ),
            ElementKind::DFlipFlop { q, .. }
            | ElementKind::JkFlipFlop { q, .. }
            | ElementKind::TFlipFlop { q, .. } => {
                format!("{},{},{},{}", tag, self.x, self.y, bit(*q))
            }
            ElementKind::Register { bits, .. } => format!(
                "{},{},{},{},{},{},{}",
                tag,
                self.x,
                self.y,
                bit(bits[0]),
                bit(bits[1]),
                bit(bits[2]),
                bit(bits[3])
            ),
        }
    }

    /// Reconstructs an element from a save-format line.
    ///
    /// Returns [None] for lines with too few fields, unparsable numbers, or
    /// an unknown variant tag; callers skip such lines and continue.
    pub fn deserialize(line: &str) -> Option<ElementRef> {
        let mut fields = line.trim().split(',');
        let tag: u32 = fields.next()?.trim().parse().ok()?;
        let x: i32 = fields.next()?.trim().parse().ok()?;
        let y: i32 = fields.next()?.trim().parse().ok()?;
        let kind = match tag {
            TAG_AND..=TAG_NOR => ElementKind::Gate(GateOp::from_tag(tag)?),
            TAG_INPUT | TAG_OUTPUT => {
                let value = parse_bit(fields.next()?)?;
                let name = fields.next().unwrap_or("").trim().to_string();
                if tag == TAG_INPUT {
                    ElementKind::Input { value, name }
                } else {
                    ElementKind::Output { value, name }
                }
            }
            TAG_CLOCK => {
                let frequency: u32 = fields.next()?.trim().parse().ok()?;
                let enabled = parse_bit(fields.next()?)?;
                ElementKind::Clock {
                    frequency,
                    counter: 0,
                    value: false,
                    enabled,
                }
            }
            TAG_RS_LATCH => {
                let q = parse_bit(fields.next()?)?;
                let q_not = parse_bit(fields.next()?)?;
                ElementKind::RsLatch { q, q_not }
            }
            TAG_D_FLIP_FLOP => ElementKind::DFlipFlop {
                q: parse_bit(fields.next()?)?,
                last_clock: false,
            },
            TAG_JK_FLIP_FLOP => ElementKind::JkFlipFlop {
                q: parse_bit(fields.next()?)?,
                last_clock: false,
            },
            TAG_T_FLIP_FLOP => ElementKind::TFlipFlop {
                q: parse_bit(fields.next()?)?,
                last_clock: false,
            },
            TAG_REGISTER => {
                let mut bits = bitvec![0; 4];
                for i in 0..4 {
                    bits.set(i, parse_bit(fields.next()?)?);
                }
                ElementKind::Register {
                    bits,
                    last_clock: false,
                }
            }
            _ => return None,
        };
        Some(Element::new(kind, x, y))
    }
}

fn parse_bit(field: &str) -> Option<bool> {
    field.trim().parse::<i32>().ok().map(|v| v != 0)
}
