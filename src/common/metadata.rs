use std::fmt::{Display, Formatter};
use std::ops::{Deref, Not};

use super::codec::Mode;
use super::error::{QRError, QRResult};
use super::mask::MaskPattern;
use super::version_db::{
    BlockStructure, ALIGNMENT_PATTERN_POSITIONS, BLOCK_STRUCTURE, DATA_CODEWORDS, TOTAL_CODEWORDS,
};

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Version {
    pub fn new(version: usize) -> QRResult<Self> {
        match version {
            1..=40 => Ok(Self(version)),
            _ => Err(QRError::InvalidVersion(version)),
        }
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    pub fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[self.0 - 1]
    }

    pub fn block_structure(self, ecl: ECLevel) -> BlockStructure {
        BLOCK_STRUCTURE[self.0 - 1][ecl as usize]
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        DATA_CODEWORDS[self.0 - 1][ecl as usize]
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    pub fn total_codewords(self) -> usize {
        TOTAL_CODEWORDS[self.0 - 1]
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        self.block_structure(ecl).ecc_per_block
    }

    pub fn remainder_bits(self) -> usize {
        match self.0 {
            2..=6 => 7,
            14..=20 | 28..=34 => 3,
            21..=27 => 4,
            _ => 0,
        }
    }

    pub const fn mode_bits(self) -> usize {
        4
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        match (mode, self.0) {
            (Mode::Numeric, 1..=9) => 10,
            (Mode::Numeric, 10..=26) => 12,
            (Mode::Numeric, _) => 14,
            (Mode::Alphanumeric, 1..=9) => 9,
            (Mode::Alphanumeric, 10..=26) => 11,
            (Mode::Alphanumeric, _) => 13,
            (Mode::Byte, 1..=9) => 8,
            (Mode::Byte, _) => 16,
        }
    }

    // 18 bit BCH(18,6) codeword, only drawn from version 7 onwards
    pub fn info(self) -> u32 {
        bch_encode(self.0 as u32, VERSION_INFO_GENERATOR, VERSION_INFO_EC_BIT_LEN)
    }
}

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<usize> for Version {
    type Error = QRError;
    fn try_from(version: usize) -> Result<Self, Self::Error> {
        Self::new(version)
    }
}


// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    pub fn format_bits(self) -> u32 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }
}

impl TryFrom<char> for ECLevel {
    type Error = QRError;
    fn try_from(level: char) -> Result<Self, Self::Error> {
        match level {
            'L' => Ok(Self::L),
            'M' => Ok(Self::M),
            'Q' => Ok(Self::Q),
            'H' => Ok(Self::H),
            _ => Err(QRError::InvalidECLevel(level)),
        }
    }
}

#[cfg(test)]
mod ec_level_tests {
    use super::ECLevel;
    use crate::error::QRError;

    #[test]
    fn test_try_from_char() {
        assert_eq!(ECLevel::try_from('L'), Ok(ECLevel::L));
        assert_eq!(ECLevel::try_from('H'), Ok(ECLevel::H));
        assert_eq!(ECLevel::try_from('m'), Err(QRError::InvalidECLevel('m')));
    }
}

// Format info
//------------------------------------------------------------------------------

// 15 bit BCH(15,5) codeword of ec level and mask, xored with the fixed format mask
pub fn format_info(ecl: ECLevel, mask: MaskPattern) -> u32 {
    let data = (ecl.format_bits() << 3) | *mask as u32;
    bch_encode(data, FORMAT_INFO_GENERATOR, FORMAT_INFO_EC_BIT_LEN) ^ FORMAT_INFO_MASK
}

const fn bch_encode(data: u32, generator: u32, ec_len: usize) -> u32 {
    let mut rem = data << ec_len;
    let mut i = 32;
    while i > ec_len {
        i -= 1;
        if rem & (1 << i) != 0 {
            rem ^= generator << (i - ec_len);
        }
    }
    (data << ec_len) | rem
}

#[cfg(test)]
mod format_info_tests {
    use test_case::test_case;

    use super::{format_info, ECLevel};
    use crate::mask::MaskPattern;

    #[test_case(ECLevel::M, 0, 0x5412)]
    #[test_case(ECLevel::M, 5, 0x40CE)]
    #[test_case(ECLevel::L, 0, 0x77C4)]
    #[test_case(ECLevel::L, 7, 0x6976)]
    #[test_case(ECLevel::H, 0, 0x1689)]
    #[test_case(ECLevel::H, 4, 0x0762)]
    #[test_case(ECLevel::Q, 0, 0x355F)]
    #[test_case(ECLevel::Q, 7, 0x2BED)]
    fn test_format_info(ecl: ECLevel, mask: u8, info: u32) {
        assert_eq!(format_info(ecl, MaskPattern::new(mask).unwrap()), info);
    }

    #[test]
    fn test_format_info_distance() {
        let infos = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H]
            .iter()
            .flat_map(|&e| (0..8).map(move |m| format_info(e, MaskPattern::new(m).unwrap())))
            .collect::<Vec<_>>();
        for (i, a) in infos.iter().enumerate() {
            for b in infos.iter().skip(i + 1) {
                assert!((a ^ b).count_ones() >= 7, "Format infos {a:#x} and {b:#x} too close");
            }
        }
    }
}

// Metadata
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Metadata {
    pub size: usize,
    pub version: Version,
    pub ec_level: ECLevel,
    pub mask: Option<MaskPattern>,
}

impl Metadata {
    pub fn new(version: Version, ec_level: ECLevel, mask: Option<MaskPattern>) -> Self {
        Self { size: version.width(), version, ec_level, mask }
    }
}

impl Display for Metadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.mask {
            Some(m) => write!(
                f,
                "{{ Size: {}, Version: {}, Ec level: {:?}, Mask: {} }}",
                self.size, *self.version, self.ec_level, *m
            ),
            None => write!(
                f,
                "{{ Size: {}, Version: {}, Ec level: {:?}, Mask: None }}",
                self.size, *self.version, self.ec_level
            ),
        }
    }
}

// Global constants
//------------------------------------------------------------------------------

pub static FORMAT_INFO_BIT_LEN: usize = 15;

static FORMAT_INFO_EC_BIT_LEN: usize = 10;

static FORMAT_INFO_GENERATOR: u32 = 0b10100110111;

static FORMAT_INFO_MASK: u32 = 0b101010000010010;

pub static VERSION_INFO_BIT_LEN: usize = 18;

static VERSION_INFO_EC_BIT_LEN: usize = 12;

static VERSION_INFO_GENERATOR: u32 = 0b1111100100101;
