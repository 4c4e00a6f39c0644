use std::ops::Deref;

use log::debug;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        if pattern < 8 {
            Ok(Self(pattern))
        } else {
            Err(QRError::InvalidMaskingPattern(pattern))
        }
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..8).map(Self)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// x is the column, y is the row
mod mask_functions {
    pub fn checkerboard(x: usize, y: usize) -> bool {
        (x + y) & 1 == 0
    }

    pub fn horizontal_lines(_: usize, y: usize) -> bool {
        y & 1 == 0
    }

    pub fn vertical_lines(x: usize, _: usize) -> bool {
        x % 3 == 0
    }

    pub fn diagonal_lines(x: usize, y: usize) -> bool {
        (x + y) % 3 == 0
    }

    pub fn large_checkerboard(x: usize, y: usize) -> bool {
        ((y >> 1) + (x / 3)) & 1 == 0
    }

    pub fn fields(x: usize, y: usize) -> bool {
        ((x * y) & 1) + ((x * y) % 3) == 0
    }

    pub fn diamonds(x: usize, y: usize) -> bool {
        (((x * y) & 1) + ((x * y) % 3)) & 1 == 0
    }

    pub fn meadow(x: usize, y: usize) -> bool {
        (((x + y) & 1) + ((x * y) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_function(self) -> fn(usize, usize) -> bool {
        match self.0 {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            _ => mask_functions::meadow,
        }
    }
}


// Mask selection
//------------------------------------------------------------------------------

pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let (best_mask, best_penalty) = MaskPattern::all()
        .map(|m| {
            let mut candidate = qr.clone();
            candidate.apply_mask(m);
            (m, compute_total_penalty(&candidate))
        })
        .min_by_key(|&(_, pen)| pen)
        .unwrap_or((MaskPattern(0), 0));
    debug!("Best mask {} with penalty {best_penalty}", *best_mask);
    qr.apply_mask(best_mask);
    best_mask
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let adj_pen = compute_adjacent_penalty(qr);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen_h = compute_finder_pattern_penalty(qr, true);
    let fp_pen_v = compute_finder_pattern_penalty(qr, false);
    let bal_pen = compute_balance_penalty(qr);
    adj_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

fn compute_adjacent_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width();
    let mut cols = vec![(Color::Dark, 0); w];
    for r in 0..w {
        let mut last = Color::Dark;
        let mut consec_row_len = 0;
        for (c, col) in cols.iter_mut().enumerate() {
            let clr = *qr.get(r as i16, c as i16);
            if c == 0 || last != clr {
                last = clr;
                consec_row_len = 0;
            }
            consec_row_len += 1;
            if consec_row_len == 5 {
                pen += 3;
            } else if consec_row_len > 5 {
                pen += 1;
            }
            if r == 0 || col.0 != clr {
                col.0 = clr;
                col.1 = 0;
            }
            col.1 += 1;
            if col.1 == 5 {
                pen += 3;
            } else if col.1 > 5 {
                pen += 1;
            }
        }
    }
    pen
}

fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

fn compute_finder_pattern_penalty(qr: &QR, is_hor: bool) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    static PATTERN: [Color; 7] = [
        Color::Dark,
        Color::Light,
        Color::Dark,
        Color::Dark,
        Color::Dark,
        Color::Light,
        Color::Dark,
    ];
    for i in 0..w {
        let get = |j: i16| if is_hor { *qr.get(i, j) } else { *qr.get(j, i) };
        // Out of bounds counts as light quiet zone
        let is_light = |j: i16| j < 0 || j >= w || get(j) == Color::Light;
        for j in 0..w - 6 {
            if (j..j + 7).map(get).eq(PATTERN.iter().copied())
                && ((j - 4..j).all(is_light) || (j + 7..j + 11).all(is_light))
            {
                pen += 40;
            }
        }
    }
    pen
}

fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark_cnt = qr.count_dark_modules();
    let w = qr.width();
    let tot = w * w;
    let percent = dark_cnt * 100 / tot;
    let deviation = percent.abs_diff(50);
    (deviation / 5 * 10) as u32
}

#[cfg(test)]
mod penalty_tests {
    use super::{apply_best_mask, compute_total_penalty, MaskPattern};
    use crate::builder::QR;
    use crate::metadata::{ECLevel, Version};

    fn placed_qr() -> QR {
        let ver = Version::new(1).unwrap();
        let mut qr = QR::new(ver, ECLevel::M);
        qr.draw_all_function_patterns();
        let codewords = (0..26).map(|i| (i * 37 + 11) as u8).collect::<Vec<_>>();
        qr.draw_encoding_region(&codewords).unwrap();
        qr
    }

    #[test]
    fn test_best_mask_has_min_penalty() {
        let mut qr = placed_qr();
        let penalties = MaskPattern::all()
            .map(|m| {
                let mut candidate = qr.clone();
                candidate.apply_mask(m);
                compute_total_penalty(&candidate)
            })
            .collect::<Vec<_>>();
        let best = apply_best_mask(&mut qr);
        assert_eq!(qr.mask(), Some(best));
        assert_eq!(penalties[*best as usize], *penalties.iter().min().unwrap());
    }

    #[test]
    fn test_finder_patterns_always_penalised() {
        let qr = placed_qr();
        // Each finder is seen once per direction with its light separator as quiet zone
        assert!(super::compute_finder_pattern_penalty(&qr, true) >= 120);
        assert!(super::compute_finder_pattern_penalty(&qr, false) >= 120);
    }
}
