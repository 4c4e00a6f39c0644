use std::ops::Deref;

use crate::error::{QRError, QRResult};
use crate::iter::EncRegionIter;
use crate::mask::MaskPattern;
use crate::metadata::*;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QR {
    grid: Box<[Module]>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w].into_boxed_slice(), w, ver, ecl, mask: None }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn metadata(&self) -> Metadata {
        Metadata::new(self.ver, self.ecl, self.mask)
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    // Rows of modules, dark as true
    pub fn to_matrix(&self) -> QRResult<Vec<Vec<bool>>> {
        if let Some(i) = self.grid.iter().position(|m| matches!(m, Module::Empty)) {
            return Err(QRError::EmptyModule { r: i / self.w, c: i % self.w });
        }
        let rows = self.grid.chunks(self.w);
        Ok(rows.map(|row| row.iter().map(|m| **m == Color::Dark).collect()).collect())
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    // Negative coordinates wrap around from the bottom or right edge
    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Finder with its separator, clipped at the symbol edge
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Func(Color::Light),
                        (3 | -3, _) | (_, 3 | -3) => Module::Func(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Func(Color::Light),
                        _ => Module::Func(Color::Dark),
                    },
                );
            }
        }
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let last = self.w as i16 - 9;
        self.draw_line(6, 8, 6, last);
        self.draw_line(8, 6, last, 6);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                self.set(r1, j, Module::Func(Color::from(j & 1 == 0)));
            }
        } else {
            for i in r1..=r2 {
                self.set(i, c1, Module::Func(Color::from(i & 1 == 0)));
            }
        }
    }

    // Always dark module beside the bottom left finder, at (4 * version + 9, 8)
    fn draw_dark_module(&mut self) {
        self.set(-8, 8, Module::Func(Color::Dark));
    }
}

#[cfg(test)]
mod timing_pattern_tests {
    use crate::builder::{Module, QR};
    use crate::metadata::{Color, ECLevel, Version};

    #[test]
    fn test_timing_pattern_1() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        qr.draw_timing_pattern();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........fFfFf........\n\
             .....................\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n"
        );
    }

    #[test]
    fn test_dark_module() {
        for v in [1, 7, 40] {
            let ver = Version::new(v).unwrap();
            let mut qr = QR::new(ver, ECLevel::H);
            qr.draw_dark_module();
            assert_eq!(qr.get(4 * v as i16 + 9, 8), Module::Func(Color::Dark));
            assert_eq!(qr.count_dark_modules(), 1);
        }
    }
}

// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        // Centers overlapping a finder
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Func(Color::Dark),
                        _ => Module::Func(Color::Light),
                    },
                )
            }
        }
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl QR {
    // Finders, timing, dark module, alignment, plus light placeholders in the
    // format and version areas
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_dark_module();
        self.draw_alignment_patterns();
        self.reserve_format_area();
        self.reserve_version_area();
    }
}


// Format & version info
//------------------------------------------------------------------------------

impl QR {
    fn reserve_format_area(&mut self) {
        self.draw_format_info(0);
    }

    fn reserve_version_area(&mut self) {
        if *self.ver >= 7 {
            self.draw_version_number(0);
        }
    }

    // Writes both copies of the format info and re-asserts the dark module
    pub fn draw_format_info(&mut self, format_info: u32) {
        let (off, on) = (Module::Format(Color::Light), Module::Format(Color::Dark));
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_MAIN);
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_SIDE);
        self.draw_dark_module();
    }

    // No-op below version 7
    pub fn draw_version_info(&mut self) {
        if *self.ver >= 7 {
            self.draw_version_number(self.ver.info());
        }
    }

    fn draw_version_number(&mut self, ver_info: u32) {
        let (off, on) = (Module::Version(Color::Light), Module::Version(Color::Dark));
        self.draw_number(ver_info, VERSION_INFO_BIT_LEN, off, on, &VERSION_INFO_COORDS_TR);
        self.draw_number(ver_info, VERSION_INFO_BIT_LEN, off, on, &VERSION_INFO_COORDS_BL);
    }

    // Most significant bit first
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for &(r, c) in coords {
            if number & mask == 0 {
                self.set(r, c, off_clr);
            } else {
                self.set(r, c, on_clr);
            }
            mask >>= 1;
        }
    }

    #[cfg(test)]
    pub(crate) fn read_number(&self, coords: &[(i16, i16)]) -> u32 {
        coords.iter().fold(0, |n, &(r, c)| (n << 1) | (*self.get(r, c) == Color::Dark) as u32)
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    // Places interleaved codewords MSB first along the zig-zag path, then fills
    // leftover remainder modules with light
    pub fn draw_encoding_region(&mut self, codewords: &[u8]) -> QRResult<()> {
        let expected = self.ver.total_codewords();
        if codewords.len() != expected {
            return Err(QRError::DataLengthMismatch { expected, found: codewords.len() });
        }

        let mut coords = EncRegionIter::new(self.ver)
            .filter(|&(r, c)| matches!(self.get(r, c), Module::Empty))
            .collect::<Vec<_>>()
            .into_iter();

        for (i, &byte) in codewords.iter().enumerate() {
            for b in (0..8).rev() {
                let Some((r, c)) = coords.next() else {
                    return Err(QRError::CodewordOutOfRange { index: i, total: expected });
                };
                self.set(r, c, Module::Data(Color::from((byte >> b) & 1 == 1)));
            }
        }

        let remainder = coords.len();
        debug_assert_eq!(
            remainder,
            self.ver.remainder_bits(),
            "Remainder modules {remainder} don't match version remainder bits"
        );
        for (r, c) in coords {
            self.set(r, c, Module::Data(Color::Light));
        }
        Ok(())
    }

    // Flips data modules where the pattern holds and writes the format info
    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_function();
        let w = self.w;
        for (i, m) in self.grid.iter_mut().enumerate() {
            if let Module::Data(clr) = *m {
                if mask_fn(i % w, i / w) {
                    *m = Module::Data(!clr);
                }
            }
        }
        let info = format_info(self.ecl, pattern);
        self.draw_format_info(info);
    }

    // Modules holding interleaved codeword `index`, most significant bit first
    pub fn codeword_modules(&self, index: usize) -> QRResult<[(usize, usize); 8]> {
        let total = self.ver.total_codewords();
        if index >= total {
            return Err(QRError::CodewordOutOfRange { index, total });
        }

        let mut layout = QR::new(self.ver, self.ecl);
        layout.draw_all_function_patterns();
        let mut coords = EncRegionIter::new(self.ver)
            .filter(|&(r, c)| matches!(layout.get(r, c), Module::Empty))
            .skip(index * 8);

        let mut res = [(0, 0); 8];
        for slot in res.iter_mut() {
            let (r, c) = coords.next().ok_or(QRError::CodewordOutOfRange { index, total })?;
            *slot = (r as usize, c as usize);
        }
        Ok(res)
    }
}


// Global constants
//------------------------------------------------------------------------------

pub(crate) static FORMAT_INFO_COORDS_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

pub(crate) static FORMAT_INFO_COORDS_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

pub(crate) static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (5, -9),
    (5, -10),
    (5, -11),
    (4, -9),
    (4, -10),
    (4, -11),
    (3, -9),
    (3, -10),
    (3, -11),
    (2, -9),
    (2, -10),
    (2, -11),
    (1, -9),
    (1, -10),
    (1, -11),
    (0, -9),
    (0, -10),
    (0, -11),
];

pub(crate) static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-9, 5),
    (-10, 5),
    (-11, 5),
    (-9, 4),
    (-10, 4),
    (-11, 4),
    (-9, 3),
    (-10, 3),
    (-11, 3),
    (-9, 2),
    (-10, 2),
    (-11, 2),
    (-9, 1),
    (-10, 1),
    (-11, 1),
    (-9, 0),
    (-10, 0),
    (-11, 0),
];
