use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

// Walks column pairs from the right edge, upwards then downwards alternately,
// right module before left, skipping the vertical timing column. Every cell
// outside the timing column is visited once, function modules included.
pub struct EncRegionIter {
    r: i16,
    c: i16,
    width: i16,
}

impl EncRegionIter {
    pub const fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { r: w - 1, c: w - 1, width: w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.c < 0 {
            return None;
        }
        let adjusted_col = if self.c <= VERT_TIMING_COL { self.c + 1 } else { self.c };
        let res = (self.r, self.c);
        let col_type = (self.width - adjusted_col) % 4;
        match col_type {
            2 if self.r > 0 => {
                self.r -= 1;
                self.c += 1;
            }
            0 if self.r < self.width - 1 => {
                self.r += 1;
                self.c += 1;
            }
            0 | 2 if self.c == VERT_TIMING_COL + 1 => {
                self.c -= 2;
            }
            _ => {
                self.c -= 1;
            }
        }
        Some(res)
    }
}

#[cfg(test)]
mod iter_tests {
    use std::collections::HashSet;

    use super::EncRegionIter;
    use crate::metadata::Version;

    #[test]
    fn test_enc_region_iter_start() {
        let coords = EncRegionIter::new(Version::new(1).unwrap()).take(6).collect::<Vec<_>>();
        assert_eq!(coords, [(20, 20), (20, 19), (19, 20), (19, 19), (18, 20), (18, 19)]);
    }

    #[test]
    fn test_enc_region_iter_turns() {
        let coords = EncRegionIter::new(Version::new(1).unwrap()).collect::<Vec<_>>();
        // Top of the first column pair turns down into the next pair
        let pos = coords.iter().position(|&rc| rc == (0, 19)).unwrap();
        assert_eq!(coords[pos + 1..pos + 4], [(0, 18), (0, 17), (1, 18)]);
        // Timing column is skipped
        let pos = coords.iter().position(|&rc| rc == (0, 7)).unwrap();
        assert_eq!(coords[pos + 1..pos + 3], [(0, 5), (0, 4)]);
        assert_eq!(coords.last(), Some(&(20, 0)));
    }

    #[test]
    fn test_enc_region_iter_covers_all_but_timing_col() {
        for v in 1..=40 {
            let ver = Version::new(v).unwrap();
            let w = ver.width() as i16;
            let coords = EncRegionIter::new(ver).collect::<Vec<_>>();
            let uniq = coords.iter().copied().collect::<HashSet<_>>();
            assert_eq!(coords.len(), uniq.len(), "Version {v}");
            assert_eq!(coords.len(), (w * (w - 1)) as usize, "Version {v}");
            assert!(coords.iter().all(|&(r, c)| c != 6 && (0..w).contains(&r) && (0..w).contains(&c)));
        }
    }
}

// Global constants
//------------------------------------------------------------------------------

const VERT_TIMING_COL: i16 = 6;
