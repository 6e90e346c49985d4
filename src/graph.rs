/*!

  Graph-style analyses over a circuit.

*/

use crate::circuit::Circuit;
use crate::element::{Element, ElementRef};
#[cfg(feature = "graph")]
use petgraph::graph::DiGraph;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A common trait of analyses that can be performed on a circuit.
/// An analysis becomes stale when the circuit is modified.
pub trait Analysis<'a>
where
    Self: Sized + 'a,
{
    /// Construct the analysis for the current state of the circuit.
    fn build(circuit: &'a Circuit) -> Result<Self, String>;
}

/// A table that maps each element to the elements its outputs drive.
///
/// Wires ending in a virtual pin have no sink element and contribute no
/// edge.
pub struct FanOutTable<'a> {
    // A reference to the underlying circuit
    _circuit: &'a Circuit,
    // Maps a driving element to the elements it drives
    fan_out: HashMap<*const RefCell<Element>, Vec<ElementRef>>,
}

impl FanOutTable<'_> {
    /// Returns an iterator over the elements driven by `element`.
    pub fn get_users(&self, element: &ElementRef) -> impl Iterator<Item = ElementRef> {
        self.fan_out
            .get(&Rc::as_ptr(element))
            .into_iter()
            .flat_map(|users| users.iter().cloned())
    }

    /// Returns `true` if any wire carries `element`'s output somewhere.
    pub fn has_users(&self, element: &ElementRef) -> bool {
        self.fan_out
            .get(&Rc::as_ptr(element))
            .is_some_and(|users| !users.is_empty())
    }
}

impl<'a> Analysis<'a> for FanOutTable<'a> {
    fn build(circuit: &'a Circuit) -> Result<Self, String> {
        let mut fan_out: HashMap<*const RefCell<Element>, Vec<ElementRef>> = HashMap::new();
        for wire in circuit.wires() {
            let w = wire.borrow();
            let Some(driver) = w.output_pin().borrow().owner() else {
                continue;
            };
            let Some(sink) = w.input_pin().borrow().owner() else {
                continue;
            };
            fan_out.entry(Rc::as_ptr(&driver)).or_default().push(sink);
        }
        Ok(FanOutTable {
            _circuit: circuit,
            fan_out,
        })
    }
}

/// A petgraph view of the circuit: one node per element labeled with its
/// display name, one edge per wire running driver to sink.
#[cfg(feature = "graph")]
pub struct ConnectivityGraph<'a> {
    _circuit: &'a Circuit,
    graph: DiGraph<String, ()>,
}

#[cfg(feature = "graph")]
impl ConnectivityGraph<'_> {
    /// Return a reference to the graph constructed by this analysis.
    pub fn get_graph(&self) -> &DiGraph<String, ()> {
        &self.graph
    }
}

#[cfg(feature = "graph")]
impl<'a> Analysis<'a> for ConnectivityGraph<'a> {
    fn build(circuit: &'a Circuit) -> Result<Self, String> {
        circuit.verify()?;
        let mut mapping = HashMap::new();
        let mut graph = DiGraph::new();

        for element in circuit.elements() {
            let id = graph.add_node(element.borrow().display_name());
            mapping.insert(Rc::as_ptr(&element), id);
        }

        for wire in circuit.wires() {
            let w = wire.borrow();
            let (Some(src), Some(dst)) = (
                w.output_pin().borrow().owner(),
                w.input_pin().borrow().owner(),
            ) else {
                continue;
            };
            graph.add_edge(mapping[&Rc::as_ptr(&src)], mapping[&Rc::as_ptr(&dst)], ());
        }

        Ok(Self {
            _circuit: circuit,
            graph,
        })
    }
}
