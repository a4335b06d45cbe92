//! Output files for the Xilinx toolchain.

pub mod coe;
pub mod tcl;
pub mod verilog;

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::memory::{MemoryBank, MemoryGeometry};

/// Writes the files of one memory into a fresh directory.
pub struct MemoryWriter<'a> {
    dir: PathBuf,
    memory_name: &'a str,
    geometry: MemoryGeometry,
    /// Function source, quoted in each COE header.
    source: &'a str,
}

impl<'a> MemoryWriter<'a> {
    /// Creates the directory `working_dir/memory_name`, which must not
    /// already exist.
    pub fn create(
        working_dir: &Path,
        memory_name: &'a str,
        geometry: MemoryGeometry,
        source: &'a str,
    ) -> Result<MemoryWriter<'a>, WriteError> {
        let dir = working_dir.join(memory_name);

        fs::create_dir(&dir).map_err(|source| WriteError {
            path: dir.clone(),
            source,
        })?;

        Ok(MemoryWriter {
            dir,
            memory_name,
            geometry,
            source,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `{memory}_{index}.coe`.
    pub fn write_bank(&self, bank: &MemoryBank) -> Result<PathBuf, WriteError> {
        let name = format!("{}_{}.coe", self.memory_name, bank.index());

        self.write_file(&name, |out| {
            coe::write_bank(out, bank, self.geometry.data_width, self.source)
        })
    }

    /// Writes `memory_compute_sub_memory.v` and `memory_compute.v`.
    pub fn write_verilog(&self) -> Result<(), WriteError> {
        self.write_file("memory_compute_sub_memory.v", |out| {
            verilog::write_sub_memory(out, self.memory_name, &self.geometry)
        })?;

        self.write_file("memory_compute.v", |out| {
            verilog::write_top(out, &self.geometry)
        })?;

        Ok(())
    }

    /// Writes `{memory}.tcl`.
    pub fn write_script(
        &self,
        project_dir: &Path,
        max_concurrent_runs: u64,
    ) -> Result<PathBuf, WriteError> {
        let name = format!("{}.tcl", self.memory_name);

        self.write_file(&name, |out| {
            tcl::write_script(
                out,
                self.memory_name,
                project_dir,
                &self.dir,
                &self.geometry,
                max_concurrent_runs,
            )
        })
    }

    fn write_file<F>(&self, name: &str, write: F) -> Result<PathBuf, WriteError>
    where
        F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
    {
        let path = self.dir.join(name);

        let result = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .and_then(|file| {
                let mut out = BufWriter::new(file);

                write(&mut out)?;
                out.flush()
            });

        match result {
            Ok(()) => Ok(path),
            Err(source) => Err(WriteError { path, source }),
        }
    }
}

#[derive(Debug)]
pub struct WriteError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "cannot write `{}`: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
