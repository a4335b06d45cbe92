//! Verilog wrappers around the generated block RAMs.

use std::io;

use crate::memory::MemoryGeometry;

const PORTS: [char; 2] = ['a', 'b'];

fn write_ports<W: io::Write>(out: &mut W) -> io::Result<()> {
    for (i, port) in PORTS.into_iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }

        writeln!(out, "  input                          clk{port},")?;
        writeln!(out, "  input                          en{port},")?;
        writeln!(out, "  input  [ADDRESS_BIT_WIDTH-1:0] addr{port},")?;

        let sep = if i + 1 < PORTS.len() { "," } else { "" };

        writeln!(out, "  output [DATA_BIT_WIDTH-1:0]    dout{port}{sep}")?;
    }

    Ok(())
}

/// Writes `memory_compute_sub_memory`, a module instantiating the bank
/// selected by its `BANK_NUMBER` parameter.
pub fn write_sub_memory<W: io::Write>(
    out: &mut W,
    memory_name: &str,
    geometry: &MemoryGeometry,
) -> io::Result<()> {
    let banks = geometry.num_sub_memories();

    writeln!(out, "`timescale 1ns / 1ps")?;
    writeln!(out)?;
    writeln!(out, "module memory_compute_sub_memory #(")?;
    writeln!(out, "  parameter BANK_NUMBER       = {banks},")?;
    writeln!(
        out,
        "  parameter ADDRESS_BIT_WIDTH = {},",
        geometry.sub_address_width
    )?;
    writeln!(out, "  parameter DATA_BIT_WIDTH    = {}", geometry.data_width)?;
    writeln!(out, ")(")?;
    write_ports(out)?;
    writeln!(out, ");")?;
    writeln!(out)?;
    writeln!(out, "generate")?;
    writeln!(out, "case (BANK_NUMBER)")?;

    for bank in 0..banks {
        writeln!(out, "  {bank}: begin")?;
        writeln!(out, "    {memory_name}_{bank} memory_inst (")?;
        writeln!(
            out,
            "      .clka(clka), .ena(ena), .addra(addra), .douta(douta),"
        )?;
        writeln!(
            out,
            "      .clkb(clkb), .enb(enb), .addrb(addrb), .doutb(doutb)"
        )?;
        writeln!(out, "    );")?;
        writeln!(out, "  end")?;
        writeln!(out)?;
    }

    writeln!(out, "  default: begin")?;
    writeln!(out, "    error_module();")?;
    writeln!(out, "  end")?;
    writeln!(out, "endcase")?;
    writeln!(out, "endgenerate")?;
    writeln!(out)?;
    writeln!(out, "endmodule")
}

/// Writes `memory_compute`, the dual-port memory covering the whole
/// address space.
///
/// The high address bits select a bank and the low bits address within
/// it. Bank outputs are multiplexed by the selector registered alongside
/// the read, matching the one-cycle read latency of the block RAMs.
pub fn write_top<W: io::Write>(
    out: &mut W,
    geometry: &MemoryGeometry,
) -> io::Result<()> {
    writeln!(out, "`timescale 1ns / 1ps")?;
    writeln!(out)?;
    writeln!(out, "module memory_compute #(")?;
    writeln!(
        out,
        "  parameter ADDRESS_BIT_WIDTH            = {},",
        geometry.address_width
    )?;
    writeln!(
        out,
        "  parameter DATA_BIT_WIDTH               = {},",
        geometry.data_width
    )?;
    writeln!(
        out,
        "  parameter NUM_SUB_MEMORIES             = {},",
        geometry.num_sub_memories()
    )?;
    writeln!(
        out,
        "  parameter MEMORY_SELECTOR_BIT_WIDTH    = {},",
        geometry.selector_width
    )?;
    writeln!(
        out,
        "  parameter SUB_MEMORY_ADDRESS_BIT_WIDTH = {}",
        geometry.sub_address_width
    )?;
    writeln!(out, ")(")?;
    write_ports(out)?;
    writeln!(out, ");")?;
    writeln!(out)?;

    if geometry.selector_width == 0 {
        write_single_bank(out)?;
    } else {
        write_bank_array(out)?;
    }

    writeln!(out)?;
    writeln!(out, "endmodule")
}

fn write_single_bank<W: io::Write>(out: &mut W) -> io::Result<()> {
    // The bank may be deeper than the address space, so addresses are
    // zero-extended.
    for port in PORTS {
        writeln!(
            out,
            "wire [SUB_MEMORY_ADDRESS_BIT_WIDTH-1:0] sub_addr{port} = \
             addr{port};"
        )?;
    }

    writeln!(out)?;
    writeln!(out, "memory_compute_sub_memory #(")?;
    writeln!(out, "  .BANK_NUMBER(0),")?;
    writeln!(out, "  .ADDRESS_BIT_WIDTH(SUB_MEMORY_ADDRESS_BIT_WIDTH),")?;
    writeln!(out, "  .DATA_BIT_WIDTH(DATA_BIT_WIDTH)")?;
    writeln!(out, ") sub_memory (")?;

    for (i, port) in PORTS.into_iter().enumerate() {
        let sep = if i + 1 < PORTS.len() { "," } else { "" };

        writeln!(
            out,
            "  .clk{port}(clk{port}), .en{port}(en{port}), \
             .addr{port}(sub_addr{port}), .dout{port}(dout{port}){sep}"
        )?;
    }

    writeln!(out, ");")
}

fn write_bank_array<W: io::Write>(out: &mut W) -> io::Result<()> {
    for port in PORTS {
        writeln!(
            out,
            "wire [MEMORY_SELECTOR_BIT_WIDTH-1:0]    selector_{port} = \
             addr{port}[ADDRESS_BIT_WIDTH-1:SUB_MEMORY_ADDRESS_BIT_WIDTH];"
        )?;
        writeln!(
            out,
            "wire [SUB_MEMORY_ADDRESS_BIT_WIDTH-1:0] sub_addr{port} = \
             addr{port}[SUB_MEMORY_ADDRESS_BIT_WIDTH-1:0];"
        )?;
        writeln!(
            out,
            "wire [DATA_BIT_WIDTH-1:0]               \
             bank_dout{port} [0:NUM_SUB_MEMORIES-1];"
        )?;
        writeln!(
            out,
            "reg  [MEMORY_SELECTOR_BIT_WIDTH-1:0]    selector_{port}_q;"
        )?;
        writeln!(out)?;
    }

    for port in PORTS {
        writeln!(out, "always @(posedge clk{port}) begin")?;
        writeln!(out, "  if (en{port})")?;
        writeln!(out, "    selector_{port}_q <= selector_{port};")?;
        writeln!(out, "end")?;
        writeln!(out)?;
    }

    writeln!(out, "genvar i;")?;
    writeln!(out, "generate")?;
    writeln!(
        out,
        "  for (i = 0; i < NUM_SUB_MEMORIES; i = i + 1) begin : bank"
    )?;
    writeln!(out, "    memory_compute_sub_memory #(")?;
    writeln!(out, "      .BANK_NUMBER(i),")?;
    writeln!(out, "      .ADDRESS_BIT_WIDTH(SUB_MEMORY_ADDRESS_BIT_WIDTH),")?;
    writeln!(out, "      .DATA_BIT_WIDTH(DATA_BIT_WIDTH)")?;
    writeln!(out, "    ) sub_memory (")?;

    for (i, port) in PORTS.into_iter().enumerate() {
        let sep = if i + 1 < PORTS.len() { "," } else { "" };

        writeln!(out, "      .clk{port}(clk{port}),")?;
        writeln!(out, "      .en{port}(en{port} && selector_{port} == i),")?;
        writeln!(out, "      .addr{port}(sub_addr{port}),")?;
        writeln!(out, "      .dout{port}(bank_dout{port}[i]){sep}")?;
    }

    writeln!(out, "    );")?;
    writeln!(out, "  end")?;
    writeln!(out, "endgenerate")?;
    writeln!(out)?;

    for port in PORTS {
        writeln!(
            out,
            "assign dout{port} = bank_dout{port}[selector_{port}_q];"
        )?;
    }

    Ok(())
}
