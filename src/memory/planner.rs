use std::fmt;

use crate::domain::MAX_ADDRESS_WIDTH;
use crate::utils::integer::floor_log2;

/// Capacity of one 18 Kb block RAM in bits.
pub const DEFAULT_BANK_CAPACITY: u64 = 18 * 1024;

/// Partition of one logical memory into equally sized banks.
///
/// The address splits into a high `selector_width`-bit bank selector and a
/// low `sub_address_width`-bit address within the bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryGeometry {
    pub address_width: u32,
    pub data_width: u32,
    pub sub_address_width: u32,
    pub selector_width: u32,
    pub bank_capacity: u64,
}

impl MemoryGeometry {
    /// Plans the banks for `2^address_width` words of `data_width` bits,
    /// each bank holding at most `bank_capacity` bits.
    ///
    /// # Examples
    ///
    /// ```
    /// # use memgen::memory::MemoryGeometry;
    /// #
    /// let geometry = MemoryGeometry::plan(14, 8, 18 * 1024).unwrap();
    ///
    /// assert_eq!(geometry.sub_address_width, 11);
    /// assert_eq!(geometry.selector_width, 3);
    /// assert_eq!(geometry.num_sub_memories(), 8);
    /// assert_eq!(geometry.sub_memory_depth(), 2048);
    /// ```
    pub fn plan(
        address_width: u32,
        data_width: u32,
        bank_capacity: u64,
    ) -> Result<MemoryGeometry, CapacityError> {
        if address_width > MAX_ADDRESS_WIDTH {
            return Err(CapacityError::AddressTooWide(address_width));
        }

        if data_width == 0 {
            return Err(CapacityError::EmptyWord);
        }

        let words = bank_capacity / u64::from(data_width);

        if words == 0 {
            return Err(CapacityError::Exceeded {
                data_width,
                bank_capacity,
            });
        }

        let sub_address_width = floor_log2(words);

        Ok(MemoryGeometry {
            address_width,
            data_width,
            sub_address_width,
            selector_width: address_width.saturating_sub(sub_address_width),
            bank_capacity,
        })
    }

    /// Number of banks, `2^selector_width`.
    pub fn num_sub_memories(&self) -> u64 {
        1 << self.selector_width
    }

    /// Words per bank, `2^sub_address_width`.
    ///
    /// A single bank may be deeper than the domain it stores.
    pub fn sub_memory_depth(&self) -> u64 {
        1 << self.sub_address_width
    }

    /// Number of words stored, `2^address_width`.
    pub fn total_words(&self) -> u64 {
        1 << self.address_width
    }

    pub fn data_bits(&self) -> u128 {
        u128::from(self.total_words()) * u128::from(self.data_width)
    }

    pub fn bank_bits(&self) -> u128 {
        u128::from(self.num_sub_memories()) * u128::from(self.bank_capacity)
    }

    /// Share of the reserved bank capacity holding data, in percent.
    pub fn utilisation(&self) -> f64 {
        100.0 * self.data_bits() as f64 / self.bank_bits() as f64
    }
}

impl fmt::Display for MemoryGeometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kbits = |bits: u128| bits as f64 / 1024.0;

        writeln!(f, "Memory configuration:")?;
        writeln!(f, "-Total input width:      {}", self.address_width)?;
        writeln!(f, "-Total output width:     {}", self.data_width)?;
        writeln!(f, "-Number of sub-memories: {}", self.num_sub_memories())?;
        writeln!(
            f,
            "-Total data memory:      {}k-bits",
            kbits(self.data_bits())
        )?;
        write!(
            f,
            "-Total block RAM memory: {}k-bits ({:.2}% utilised)",
            kbits(self.bank_bits()),
            self.utilisation()
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapacityError {
    Exceeded { data_width: u32, bank_capacity: u64 },
    EmptyWord,
    AddressTooWide(u32),
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CapacityError::Exceeded {
                data_width,
                bank_capacity,
            } => write!(
                f,
                "a {data_width}-bit word does not fit a bank of \
                 {bank_capacity} bits"
            ),
            CapacityError::EmptyWord => {
                write!(f, "data width must be positive")
            }
            CapacityError::AddressTooWide(width) => write!(
                f,
                "address width {width} exceeds {MAX_ADDRESS_WIDTH} bits"
            ),
        }
    }
}

impl std::error::Error for CapacityError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_domain_fits_one_bank() {
        let geometry = MemoryGeometry::plan(10, 8, DEFAULT_BANK_CAPACITY);

        assert_eq!(
            geometry,
            Ok(MemoryGeometry {
                address_width: 10,
                data_width: 8,
                sub_address_width: 11,
                selector_width: 0,
                bank_capacity: DEFAULT_BANK_CAPACITY,
            })
        );

        let geometry = geometry.unwrap();

        assert_eq!(geometry.num_sub_memories(), 1);
        assert_eq!(geometry.sub_memory_depth(), 2048);
    }

    #[test]
    fn wide_words_need_more_banks() {
        let geometry = MemoryGeometry::plan(12, 32, DEFAULT_BANK_CAPACITY);
        let geometry = geometry.unwrap();

        assert_eq!(geometry.sub_address_width, 9);
        assert_eq!(geometry.num_sub_memories(), 8);
    }

    #[test]
    fn word_wider_than_bank() {
        assert_eq!(
            MemoryGeometry::plan(4, 64, 32),
            Err(CapacityError::Exceeded {
                data_width: 64,
                bank_capacity: 32
            })
        );
        assert!(MemoryGeometry::plan(4, 32, 32).is_ok());
    }

    #[test]
    fn report() {
        let geometry = MemoryGeometry::plan(14, 8, DEFAULT_BANK_CAPACITY);
        let report = geometry.unwrap().to_string();

        assert_eq!(
            report,
            "Memory configuration:\n\
             -Total input width:      14\n\
             -Total output width:     8\n\
             -Number of sub-memories: 8\n\
             -Total data memory:      128k-bits\n\
             -Total block RAM memory: 144k-bits (88.89% utilised)"
        );
    }
}
