//! Vivado build script.

use std::io;
use std::path::Path;

use crate::memory::MemoryGeometry;

/// Vivado's source fileset.
const SOURCE_SET: &str = "sources_1";

/// Writes a TCL script that creates, generates and synthesises one
/// dual-port ROM IP per bank, initialised from the COE files in
/// `coe_dir`.
///
/// After each launched run the script waits for the run started
/// `max_concurrent_runs - 1` launches earlier, bounding the number of
/// synthesis runs in flight.
pub fn write_script<W: io::Write>(
    out: &mut W,
    memory_name: &str,
    project_dir: &Path,
    coe_dir: &Path,
    geometry: &MemoryGeometry,
    max_concurrent_runs: u64,
) -> io::Result<()> {
    let max_concurrent_runs = max_concurrent_runs.max(1);

    let project_name = project_dir
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();

    let user_files =
        project_dir.join(format!("{project_name}.ip_user_files"));
    let user_files = user_files.display();
    let sim_libs =
        project_dir.join(format!("{project_name}.cache/compile_simlib"));
    let sim_libs = sim_libs.display();

    let width = geometry.data_width;
    let depth = geometry.sub_memory_depth();

    for bank in 0..geometry.num_sub_memories() {
        let ip = format!("{memory_name}_{bank}");
        let coe_file = coe_dir.join(format!("{ip}.coe"));
        let ip_file = project_dir
            .join(format!("{project_name}.srcs"))
            .join(SOURCE_SET)
            .join(format!("ip/{ip}/{ip}.xci"));
        let ip_file = ip_file.display();

        writeln!(
            out,
            "create_ip -name blk_mem_gen -vendor xilinx.com -library ip \
             -version 8.4 -module_name {ip}"
        )?;

        let properties = [
            ("Component_Name", ip.clone()),
            ("Memory_Type", "Dual_Port_ROM".into()),
            ("Assume_Synchronous_Clk", "true".into()),
            ("Write_Width_A", width.to_string()),
            ("Write_Depth_A", depth.to_string()),
            ("Read_Width_A", width.to_string()),
            ("Enable_A", "Use_ENA_Pin".into()),
            ("Write_Width_B", width.to_string()),
            ("Read_Width_B", width.to_string()),
            ("Enable_B", "Use_ENB_Pin".into()),
            ("Register_PortA_Output_of_Memory_Primitives", "false".into()),
            ("Register_PortB_Output_of_Memory_Primitives", "false".into()),
            ("Load_Init_File", "true".into()),
            ("Coe_File", coe_file.display().to_string()),
            ("Port_A_Write_Rate", "0".into()),
            ("Port_B_Clock", "100".into()),
            ("Port_B_Enable_Rate", "100".into()),
        ];

        write!(out, "set_property -dict [list")?;

        for (key, value) in &properties {
            write!(out, " CONFIG.{key} {{{value}}}")?;
        }

        writeln!(out, "] [get_ips {ip}]")?;

        writeln!(
            out,
            "generate_target {{instantiation_template}} \
             [get_files {ip_file}]"
        )?;
        writeln!(out, "update_compile_order -fileset {SOURCE_SET}")?;
        writeln!(out, "generate_target all [get_files {ip_file}]")?;
        writeln!(
            out,
            "catch {{ config_ip_cache -export [get_ips -all {ip}] }}"
        )?;
        writeln!(
            out,
            "export_ip_user_files -of_objects [get_files {ip_file}] \
             -no_script -sync -force -quiet"
        )?;
        writeln!(
            out,
            "create_ip_run [get_files -of_objects \
             [get_fileset {SOURCE_SET}] {ip_file}]"
        )?;
        writeln!(out, "launch_runs {ip}_synth_1")?;
        writeln!(
            out,
            "export_simulation -of_objects [get_files {ip_file}] \
             -directory {user_files}/sim_scripts \
             -ip_user_files_dir {user_files} \
             -ipstatic_source_dir {user_files}/ipstatic \
             -lib_map_path [list {{modelsim={sim_libs}/modelsim}} \
             {{questa={sim_libs}/questa}} {{ies={sim_libs}/ies}} \
             {{xcelium={sim_libs}/xcelium}} {{vcs={sim_libs}/vcs}} \
             {{riviera={sim_libs}/riviera}}] \
             -use_ip_compiled_libs -force -quiet"
        )?;

        if bank + 1 >= max_concurrent_runs {
            let waited = bank + 1 - max_concurrent_runs;

            writeln!(out, "wait_on_run {memory_name}_{waited}_synth_1")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(geometry: &MemoryGeometry, max_concurrent_runs: u64) -> String {
        let mut out = Vec::new();

        write_script(
            &mut out,
            "f_13b_16b",
            Path::new("/work/vivado_builder"),
            Path::new("/work/f_13b_16b"),
            geometry,
            max_concurrent_runs,
        )
        .unwrap();

        String::from_utf8(out).unwrap()
    }

    fn geometry() -> MemoryGeometry {
        MemoryGeometry::plan(13, 16, 18 * 1024).unwrap()
    }

    #[test]
    fn one_ip_per_bank() {
        let script = render(&geometry(), 1);

        assert_eq!(script.matches("create_ip -name blk_mem_gen").count(), 8);
        assert!(script.contains(
            "set_property -dict [list CONFIG.Component_Name {f_13b_16b_3} \
             CONFIG.Memory_Type {Dual_Port_ROM}"
        ));
        assert!(script.contains(
            "CONFIG.Write_Width_A {16} CONFIG.Write_Depth_A {1024}"
        ));
        assert!(script.contains(
            "CONFIG.Coe_File {/work/f_13b_16b/f_13b_16b_7.coe}"
        ));
        assert!(script.contains(
            "generate_target all [get_files /work/vivado_builder/\
             vivado_builder.srcs/sources_1/ip/f_13b_16b_0/f_13b_16b_0.xci]"
        ));
    }

    #[test]
    fn waits_bound_concurrent_runs() {
        let waits = |runs| {
            render(&geometry(), runs)
                .lines()
                .filter_map(|line| line.strip_prefix("wait_on_run "))
                .map(str::to_owned)
                .collect::<Vec<_>>()
        };

        assert_eq!(waits(1).len(), 8);
        assert_eq!(waits(1)[0], "f_13b_16b_0_synth_1");
        assert_eq!(
            waits(6),
            [
                "f_13b_16b_0_synth_1",
                "f_13b_16b_1_synth_1",
                "f_13b_16b_2_synth_1",
            ]
        );
        assert!(waits(16).is_empty());
    }

    #[test]
    fn wait_follows_its_launch() {
        let script = render(&geometry(), 2);
        let lines: Vec<_> = script.lines().collect();

        let launch = lines
            .iter()
            .position(|line| *line == "launch_runs f_13b_16b_1_synth_1");
        let wait = lines
            .iter()
            .position(|line| *line == "wait_on_run f_13b_16b_0_synth_1");

        assert_eq!(wait, launch.map(|i| i + 2));
    }
}
