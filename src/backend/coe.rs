//! Xilinx memory initialisation (COE) files.

use std::io;

use itertools::Itertools;
use malachite::num::arithmetic::traits::CeilingLogBase2;

use crate::memory::MemoryBank;
use crate::utils::integer::ceil_log2;

/// Writes one bank as a COE file, preceded by a comment header describing
/// its contents and the function `source` it was computed from.
///
/// The reported data width is the width needed by the largest stored word,
/// which may fall short of the `target_width` the words are padded to.
pub fn write_bank<W: io::Write>(
    out: &mut W,
    bank: &MemoryBank,
    target_width: u32,
    source: &str,
) -> io::Result<()> {
    let max_value = bank.max_value();
    let data_width = if *max_value <= 1u32 {
        0
    } else {
        max_value.ceiling_log_base_2()
    };

    let depth = bank.len() as u64;
    let address_width = if depth == 0 { 0 } else { ceil_log2(depth) };

    writeln!(
        out,
        "; Data bit width: {} (Target: {target_width})",
        data_width.max(1)
    )?;
    writeln!(out, "; Data bit depth: {depth}")?;
    writeln!(out, "; Input address width: {}", address_width.max(1))?;
    writeln!(out, ";")?;
    writeln!(out, "; Memory bank #{}", bank.index())?;
    writeln!(out, "; Function:")?;

    for line in source.lines() {
        writeln!(out, "; {line}")?;
    }

    writeln!(out, ";")?;
    writeln!(out)?;

    writeln!(out, "memory_initialization_radix=16;")?;
    writeln!(out, "memory_initialization_vector=")?;

    let values = bank
        .values()
        .iter()
        .format_with(",\n", |value, f| f(&format_args!("{value:x}")));

    writeln!(out, "{values};")
}
