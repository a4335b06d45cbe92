//! Memory generation driver.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::backend::{MemoryWriter, WriteError};
use crate::function::TableFunction;
use crate::memory::{BankDistributor, EvaluationError};

/// What a completed generation produced.
#[derive(Debug)]
pub struct Summary {
    pub banks: u64,
    pub overflows: usize,
    pub script: PathBuf,
}

/// Streams every bank of `distributor` to disk, then writes the Verilog
/// wrappers and the Vivado script.
///
/// Banks are written as they are produced, so a failure leaves the banks
/// completed before it in place.
pub fn generate<F: TableFunction>(
    mut distributor: BankDistributor<F>,
    writer: &MemoryWriter,
    project_dir: &Path,
    max_concurrent_runs: u64,
) -> Result<Summary, GenerateError<F::Error>> {
    log::info!("Creating coe files for each sub-memory...");

    let mut banks = 0;

    for bank in distributor.by_ref() {
        let bank = bank?;
        let path = writer.write_bank(&bank)?;

        log::debug!("Wrote {}", path.display());

        banks += 1;
    }

    log::info!("Creating the verilog files...");

    writer.write_verilog()?;

    log::info!("Creating the tcl script for vivado...");

    let script = writer.write_script(project_dir, max_concurrent_runs)?;

    log::info!("-command: 'source {}'", script.display());

    Ok(Summary {
        banks,
        overflows: distributor.overflows().len(),
        script,
    })
}

#[derive(Debug)]
pub enum GenerateError<E> {
    Evaluation(EvaluationError<E>),
    Write(WriteError),
}

impl<E> From<EvaluationError<E>> for GenerateError<E> {
    fn from(err: EvaluationError<E>) -> Self {
        GenerateError::Evaluation(err)
    }
}

impl<E> From<WriteError> for GenerateError<E> {
    fn from(err: WriteError) -> Self {
        GenerateError::Write(err)
    }
}

impl<E: fmt::Display> fmt::Display for GenerateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerateError::Evaluation(err) => write!(f, "{err}"),
            GenerateError::Write(err) => write!(f, "{err}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for GenerateError<E> {}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::process;

    use super::*;
    use crate::config::Config;
    use crate::fpcore::{self, FPCoreParser};

    const CONFIG: &str = "vivado-project-directory: /work/vivado_builder
function:
  name: halve
  arguments:
    - { name: x, type: float, width: 8, precision: 4 }
  output-type: float
  output-width: 8
  output-precision: 4
";

    const SOURCE: &str = "(FPCore halve (x) (/ x 2))";

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(name: &str) -> TempDir {
            let dir = std::env::temp_dir()
                .join(format!("memgen-{name}-{}", process::id()));

            let _ = fs::remove_dir_all(&dir);
            fs::create_dir_all(&dir).unwrap();

            TempDir(dir)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn writes_every_file() {
        let tmp = TempDir::new("generate");
        let config = Config::from_yaml(CONFIG).unwrap();
        let spec = &config.function;

        let defs = FPCoreParser::parse_file(SOURCE).unwrap();
        let function = fpcore::bind(&defs, spec).unwrap();

        let distributor = BankDistributor::new(spec, function, 64).unwrap();
        let geometry = *distributor.geometry();
        let name = spec.memory_name();

        assert_eq!(name, "halve_8b_8b");
        assert_eq!(geometry.num_sub_memories(), 32);

        let writer =
            MemoryWriter::create(&tmp.0, &name, geometry, SOURCE).unwrap();

        let summary =
            generate(distributor, &writer, &config.project_dir, 4).unwrap();

        assert_eq!(summary.banks, 32);
        assert_eq!(summary.overflows, 0);
        assert_eq!(summary.script, tmp.0.join(&name).join("halve_8b_8b.tcl"));

        let dir = tmp.0.join(&name);

        for file in [
            "halve_8b_8b_0.coe",
            "halve_8b_8b_31.coe",
            "memory_compute.v",
            "memory_compute_sub_memory.v",
            "halve_8b_8b.tcl",
        ] {
            assert!(dir.join(file).is_file(), "{file} missing");
        }

        // 0x48 encodes 4.0 and 0x40 encodes 2.0
        let bank = fs::read_to_string(dir.join("halve_8b_8b_9.coe")).unwrap();
        let values = bank.split("vector=\n").nth(1).unwrap();

        assert!(values.starts_with("40,\n"), "{values}");
        assert!(bank.contains("; Function:\n; (FPCore halve (x) (/ x 2))\n"));
    }

    #[test]
    fn existing_directory_is_an_error() {
        let tmp = TempDir::new("existing");
        let geometry = crate::memory::MemoryGeometry::plan(4, 8, 64).unwrap();

        fs::create_dir(tmp.0.join("taken")).unwrap();

        let err = MemoryWriter::create(&tmp.0, "taken", geometry, "")
            .err()
            .unwrap();

        assert_eq!(err.path, tmp.0.join("taken"));
        assert_eq!(err.source.kind(), std::io::ErrorKind::AlreadyExists);
    }
}
