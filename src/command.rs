/*!

  The undo/redo command log.

  A command is recorded after its edit has already been applied, so
  `undo`/`redo` only ever move the circuit between two known states.
  Commands carry textual snapshots in the save format plus, where a command
  removes something, the live handle it would remove again. Undo
  re-materializes from the snapshot and stores the fresh handle back, so a
  later redo targets the restored entity rather than a dead one.

*/

use crate::circuit::Circuit;
use crate::element::ElementRef;
use crate::wire::WireRef;

/// Maximum number of undoable commands retained; the oldest is evicted.
pub(crate) const MAX_HISTORY: usize = 50;

/// One element of a batch deletion.
#[derive(Debug)]
pub(crate) struct BatchEntry {
    pub(crate) element: Option<ElementRef>,
    pub(crate) snapshot: String,
}

/// A committed structural edit, replayable in both directions.
#[derive(Debug)]
pub(crate) enum Command {
    AddElement {
        element: Option<ElementRef>,
        snapshot: String,
    },
    AddWire {
        wire: Option<WireRef>,
        snapshot: String,
    },
    DeleteElement {
        element: Option<ElementRef>,
        snapshot: String,
    },
    DeleteWire {
        wire: Option<WireRef>,
        snapshot: String,
    },
    BatchDelete {
        entries: Vec<BatchEntry>,
    },
}

impl Command {
    /// Reverts the edit this command recorded.
    pub(crate) fn undo(&mut self, circuit: &Circuit) {
        match self {
            Command::AddElement { element, .. } => {
                if let Some(element) = element.take() {
                    circuit.remove_element_silent(&element);
                }
            }
            Command::AddWire { wire, .. } => {
                if let Some(wire) = wire.take() {
                    circuit.remove_wire_silent(&wire);
                }
            }
            Command::DeleteElement { element, snapshot } => {
                *element = circuit.restore_element(snapshot);
            }
            Command::DeleteWire { wire, snapshot } => {
                *wire = circuit.restore_wire(snapshot);
            }
            Command::BatchDelete { entries } => {
                for entry in entries.iter_mut() {
                    entry.element = circuit.restore_element(&entry.snapshot);
                }
            }
        }
    }

    /// Re-applies the edit this command recorded.
    pub(crate) fn redo(&mut self, circuit: &Circuit) {
        match self {
            Command::AddElement { element, snapshot } => {
                *element = circuit.restore_element(snapshot);
            }
            Command::AddWire { wire, snapshot } => {
                *wire = circuit.restore_wire(snapshot);
            }
            Command::DeleteElement { element, .. } => {
                if let Some(element) = element.take() {
                    circuit.remove_element_silent(&element);
                }
            }
            Command::DeleteWire { wire, .. } => {
                if let Some(wire) = wire.take() {
                    circuit.remove_wire_silent(&wire);
                }
            }
            Command::BatchDelete { entries } => {
                for entry in entries.iter_mut() {
                    if let Some(element) = entry.element.take() {
                        circuit.remove_element_silent(&element);
                    }
                }
            }
        }
    }
}

/// The two command stacks, bounded at [MAX_HISTORY] undoable entries.
#[derive(Debug, Default)]
pub(crate) struct History {
    undo: Vec<Command>,
    redo: Vec<Command>,
}

impl History {
    /// Records a freshly committed edit. Evicts the oldest entry at
    /// capacity and invalidates the redo stack.
    pub(crate) fn record(&mut self, command: Command) {
        if self.undo.len() >= MAX_HISTORY {
            self.undo.remove(0);
        }
        self.undo.push(command);
        self.redo.clear();
    }

    /// Returns an undone command to the undo stack without invalidating the
    /// redo stack. Used by the redo path.
    pub(crate) fn push_undo(&mut self, command: Command) {
        if self.undo.len() >= MAX_HISTORY {
            self.undo.remove(0);
        }
        self.undo.push(command);
    }

    pub(crate) fn push_redo(&mut self, command: Command) {
        self.redo.push(command);
    }

    pub(crate) fn pop_undo(&mut self) -> Option<Command> {
        self.undo.pop()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Command> {
        self.redo.pop()
    }

    pub(crate) fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub(crate) fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
