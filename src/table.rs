/*!

  Truth-table generation.

  Enumerates every combination of a circuit's input sources, propagates,
  and records the output sinks. The circuit is returned to its pre-existing
  input values afterwards, so generating a table is observationally pure.

*/

use crate::circuit::Circuit;
use bitvec::prelude::*;
use std::fmt;

/// Enumeration is capped at this many input sources.
const MAX_TABLE_INPUTS: usize = 16;

/// An exhaustive input/output table for a combinational circuit.
///
/// Rows are ordered by input combination, counting up with the first input
/// source as the most significant bit.
#[derive(Debug, Clone, PartialEq)]
pub struct TruthTable {
    inputs: Vec<String>,
    outputs: Vec<String>,
    rows: Vec<(BitVec, BitVec)>,
}

impl TruthTable {
    /// Generates the table for `circuit` by forcing each input combination
    /// and running [Circuit::propagate].
    ///
    /// Fails if the circuit has no input sources, or more than 16 of them
    /// (65536 rows is the enumeration cap).
    pub fn generate(circuit: &Circuit) -> Result<Self, String> {
        let inputs = circuit.input_elements();
        let outputs = circuit.output_elements();
        if inputs.is_empty() {
            return Err("circuit has no input sources".to_string());
        }
        if inputs.len() > MAX_TABLE_INPUTS {
            return Err(format!(
                "too many input sources for a truth table: {} (limit is {MAX_TABLE_INPUTS})",
                inputs.len()
            ));
        }
        let saved: Vec<bool> = inputs
            .iter()
            .map(|e| e.borrow().io_value().unwrap_or(false))
            .collect();
        let mut rows = Vec::with_capacity(1usize << inputs.len());
        for combination in 0u32..(1u32 << inputs.len()) {
            let mut in_bits = BitVec::with_capacity(inputs.len());
            for (i, input) in inputs.iter().enumerate() {
                let bit = (combination >> (inputs.len() - 1 - i)) & 1 == 1;
                input.borrow_mut().set_io_value(bit);
                in_bits.push(bit);
            }
            circuit.propagate();
            let out_bits: BitVec = outputs
                .iter()
                .map(|o| o.borrow().io_value().unwrap_or(false))
                .collect();
            rows.push((in_bits, out_bits));
        }
        for (input, value) in inputs.iter().zip(saved) {
            input.borrow_mut().set_io_value(value);
        }
        circuit.propagate();
        Ok(TruthTable {
            inputs: inputs.iter().map(|e| e.borrow().display_name()).collect(),
            outputs: outputs.iter().map(|e| e.borrow().display_name()).collect(),
            rows,
        })
    }

    /// Returns the display names of the input columns.
    pub fn input_names(&self) -> &[String] {
        &self.inputs
    }

    /// Returns the display names of the output columns.
    pub fn output_names(&self) -> &[String] {
        &self.outputs
    }

    /// Returns the table rows as (input bits, output bits) pairs.
    pub fn rows(&self) -> &[(BitVec, BitVec)] {
        &self.rows
    }

    /// Returns the number of rows (2^inputs).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Exports the table as JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, String> {
        #[derive(::serde::Serialize)]
        struct TableJson<'a> {
            inputs: &'a [String],
            outputs: &'a [String],
            rows: &'a [(BitVec, BitVec)],
        }
        serde_json::to_string_pretty(&TableJson {
            inputs: &self.inputs,
            outputs: &self.outputs,
            rows: &self.rows,
        })
        .map_err(|e| e.to_string())
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in &self.inputs {
            write!(f, "{name} ")?;
        }
        write!(f, "|")?;
        for name in &self.outputs {
            write!(f, " {name}")?;
        }
        writeln!(f)?;
        for (in_bits, out_bits) in &self.rows {
            for (bit, name) in in_bits.iter().by_vals().zip(&self.inputs) {
                write!(f, "{:>width$} ", u8::from(bit), width = name.len())?;
            }
            write!(f, "|")?;
            for (bit, name) in out_bits.iter().by_vals().zip(&self.outputs) {
                write!(f, " {:>width$}", u8::from(bit), width = name.len())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
