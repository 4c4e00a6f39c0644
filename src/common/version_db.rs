// Error correction block layout per version and EC level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct BlockStructure {
    pub ecc_per_block: usize,
    pub group1_blocks: usize,
    pub group1_data_len: usize,
    pub group2_blocks: usize,
    pub group2_data_len: usize,
}

impl BlockStructure {
    pub fn block_count(&self) -> usize {
        self.group1_blocks + self.group2_blocks
    }

    pub fn data_len(&self) -> usize {
        self.group1_blocks * self.group1_data_len + self.group2_blocks * self.group2_data_len
    }

    pub fn ecc_len(&self) -> usize {
        self.block_count() * self.ecc_per_block
    }
}

const fn bs(
    ecc_per_block: usize,
    group1_blocks: usize,
    group1_data_len: usize,
    group2_blocks: usize,
    group2_data_len: usize,
) -> BlockStructure {
    BlockStructure { ecc_per_block, group1_blocks, group1_data_len, group2_blocks, group2_data_len }
}

// Index: [version - 1][L, M, Q, H]
pub(crate) static BLOCK_STRUCTURE: [[BlockStructure; 4]; 40] = [
    [bs(7, 1, 19, 0, 0), bs(10, 1, 16, 0, 0), bs(13, 1, 13, 0, 0), bs(17, 1, 9, 0, 0)],
    [bs(10, 1, 34, 0, 0), bs(16, 1, 28, 0, 0), bs(22, 1, 22, 0, 0), bs(28, 1, 16, 0, 0)],
    [bs(15, 1, 55, 0, 0), bs(26, 1, 44, 0, 0), bs(18, 2, 17, 0, 0), bs(22, 2, 13, 0, 0)],
    [bs(20, 1, 80, 0, 0), bs(18, 2, 32, 0, 0), bs(26, 2, 24, 0, 0), bs(16, 4, 9, 0, 0)],
    [bs(26, 1, 108, 0, 0), bs(24, 2, 43, 0, 0), bs(18, 2, 15, 2, 16), bs(22, 2, 11, 2, 12)],
    [bs(18, 2, 68, 0, 0), bs(16, 4, 27, 0, 0), bs(24, 4, 19, 0, 0), bs(28, 4, 15, 0, 0)],
    [bs(20, 2, 78, 0, 0), bs(18, 4, 31, 0, 0), bs(18, 2, 14, 4, 15), bs(26, 4, 13, 1, 14)],
    [bs(24, 2, 97, 0, 0), bs(22, 2, 38, 2, 39), bs(22, 4, 18, 2, 19), bs(26, 4, 14, 2, 15)],
    [bs(30, 2, 116, 0, 0), bs(22, 3, 36, 2, 37), bs(20, 4, 16, 4, 17), bs(24, 4, 12, 4, 13)],
    [bs(18, 2, 68, 2, 69), bs(26, 4, 43, 1, 44), bs(24, 6, 19, 2, 20), bs(28, 6, 15, 2, 16)],
    [bs(20, 4, 81, 0, 0), bs(30, 1, 50, 4, 51), bs(28, 4, 22, 4, 23), bs(24, 3, 12, 8, 13)],
    [bs(24, 2, 92, 2, 93), bs(22, 6, 36, 2, 37), bs(26, 4, 20, 6, 21), bs(28, 7, 14, 4, 15)],
    [bs(26, 4, 107, 0, 0), bs(22, 8, 37, 1, 38), bs(24, 8, 20, 4, 21), bs(22, 12, 11, 4, 12)],
    [bs(30, 3, 115, 1, 116), bs(24, 4, 40, 5, 41), bs(20, 11, 16, 5, 17), bs(24, 11, 12, 5, 13)],
    [bs(22, 5, 87, 1, 88), bs(24, 5, 41, 5, 42), bs(30, 5, 24, 7, 25), bs(24, 11, 12, 7, 13)],
    [bs(24, 5, 98, 1, 99), bs(28, 7, 45, 3, 46), bs(24, 15, 19, 2, 20), bs(30, 3, 15, 13, 16)],
    [bs(28, 1, 107, 5, 108), bs(28, 10, 46, 1, 47), bs(28, 1, 22, 15, 23), bs(28, 2, 14, 17, 15)],
    [bs(30, 5, 120, 1, 121), bs(26, 9, 43, 4, 44), bs(28, 17, 22, 1, 23), bs(28, 2, 14, 19, 15)],
    [bs(28, 3, 113, 4, 114), bs(26, 3, 44, 11, 45), bs(26, 17, 21, 4, 22), bs(26, 9, 13, 16, 14)],
    [bs(28, 3, 107, 5, 108), bs(26, 3, 41, 13, 42), bs(30, 15, 24, 5, 25), bs(28, 15, 15, 10, 16)],
    [bs(28, 4, 116, 4, 117), bs(26, 17, 42, 0, 0), bs(28, 17, 22, 6, 23), bs(30, 19, 16, 6, 17)],
    [bs(28, 2, 111, 7, 112), bs(28, 17, 46, 0, 0), bs(30, 7, 24, 16, 25), bs(24, 34, 13, 0, 0)],
    [bs(30, 4, 121, 5, 122), bs(28, 4, 47, 14, 48), bs(30, 11, 24, 14, 25), bs(30, 16, 15, 14, 16)],
    [bs(30, 6, 117, 4, 118), bs(28, 6, 45, 14, 46), bs(30, 11, 24, 16, 25), bs(30, 30, 16, 2, 17)],
    [bs(26, 8, 106, 4, 107), bs(28, 8, 47, 13, 48), bs(30, 7, 24, 22, 25), bs(30, 22, 15, 13, 16)],
    [bs(28, 10, 114, 2, 115), bs(28, 19, 46, 4, 47), bs(28, 28, 22, 6, 23), bs(30, 33, 16, 4, 17)],
    [bs(30, 8, 122, 4, 123), bs(28, 22, 45, 3, 46), bs(30, 8, 23, 26, 24), bs(30, 12, 15, 28, 16)],
    [bs(30, 3, 117, 10, 118), bs(28, 3, 45, 23, 46), bs(30, 4, 24, 31, 25), bs(30, 11, 15, 31, 16)],
    [bs(30, 7, 116, 7, 117), bs(28, 21, 45, 7, 46), bs(30, 1, 23, 37, 24), bs(30, 19, 15, 26, 16)],
    [bs(30, 5, 115, 10, 116), bs(28, 19, 47, 10, 48), bs(30, 15, 24, 25, 25), bs(30, 23, 15, 25, 16)],
    [bs(30, 13, 115, 3, 116), bs(28, 2, 46, 29, 47), bs(30, 42, 24, 1, 25), bs(30, 23, 15, 28, 16)],
    [bs(30, 17, 115, 0, 0), bs(28, 10, 46, 23, 47), bs(30, 10, 24, 35, 25), bs(30, 19, 15, 35, 16)],
    [bs(30, 17, 115, 1, 116), bs(28, 14, 46, 21, 47), bs(30, 29, 24, 19, 25), bs(30, 11, 15, 46, 16)],
    [bs(30, 13, 115, 6, 116), bs(28, 14, 46, 23, 47), bs(30, 44, 24, 7, 25), bs(30, 59, 16, 1, 17)],
    [bs(30, 12, 121, 7, 122), bs(28, 12, 47, 26, 48), bs(30, 39, 24, 14, 25), bs(30, 22, 15, 41, 16)],
    [bs(30, 6, 121, 14, 122), bs(28, 6, 47, 34, 48), bs(30, 46, 24, 10, 25), bs(30, 2, 15, 64, 16)],
    [bs(30, 17, 122, 4, 123), bs(28, 29, 46, 14, 47), bs(30, 49, 24, 10, 25), bs(30, 24, 15, 46, 16)],
    [bs(30, 4, 122, 18, 123), bs(28, 13, 46, 32, 47), bs(30, 48, 24, 14, 25), bs(30, 42, 15, 32, 16)],
    [bs(30, 20, 117, 4, 118), bs(28, 40, 47, 7, 48), bs(30, 43, 24, 22, 25), bs(30, 10, 15, 67, 16)],
    [bs(30, 19, 118, 6, 119), bs(28, 18, 47, 31, 48), bs(30, 34, 24, 34, 25), bs(30, 20, 15, 61, 16)],
];

// Data codeword capacity
//------------------------------------------------------------------------------

// Index: [version - 1][L, M, Q, H]
pub(crate) static DATA_CODEWORDS: [[usize; 4]; 40] = [
    [19, 16, 13, 9],
    [34, 28, 22, 16],
    [55, 44, 34, 26],
    [80, 64, 48, 36],
    [108, 86, 62, 46],
    [136, 108, 76, 60],
    [156, 124, 88, 66],
    [194, 154, 110, 86],
    [232, 182, 132, 100],
    [274, 216, 154, 122],
    [324, 254, 180, 140],
    [370, 290, 206, 158],
    [428, 334, 244, 180],
    [461, 365, 261, 197],
    [523, 415, 295, 223],
    [589, 453, 325, 253],
    [647, 507, 367, 283],
    [721, 563, 397, 313],
    [795, 627, 445, 341],
    [861, 669, 485, 385],
    [932, 714, 512, 406],
    [1006, 782, 568, 442],
    [1094, 860, 614, 464],
    [1174, 914, 664, 514],
    [1276, 1000, 718, 538],
    [1370, 1062, 754, 596],
    [1468, 1128, 808, 628],
    [1531, 1193, 871, 661],
    [1631, 1267, 911, 701],
    [1735, 1373, 985, 745],
    [1843, 1455, 1033, 793],
    [1955, 1541, 1115, 845],
    [2071, 1631, 1171, 901],
    [2191, 1725, 1231, 961],
    [2306, 1812, 1286, 986],
    [2434, 1914, 1354, 1054],
    [2566, 1992, 1426, 1096],
    [2702, 2102, 1502, 1142],
    [2812, 2216, 1582, 1222],
    [2956, 2334, 1666, 1276],
];

// Index: version - 1
pub(crate) static TOTAL_CODEWORDS: [usize; 40] = [
    26, 44, 70, 100, 134, 172, 196, 242, 292, 346,
    404, 466, 532, 581, 655, 733, 815, 901, 991, 1085,
    1156, 1258, 1364, 1474, 1588, 1706, 1828, 1921, 2051, 2185,
    2323, 2465, 2611, 2761, 2876, 3034, 3196, 3362, 3532, 3706,
];
// Alignment pattern centers
//------------------------------------------------------------------------------

// Index: version - 1
pub(crate) static ALIGNMENT_PATTERN_POSITIONS: [&[i16]; 40] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

#[cfg(test)]
mod version_db_tests {
    use super::{ALIGNMENT_PATTERN_POSITIONS, BLOCK_STRUCTURE, DATA_CODEWORDS, TOTAL_CODEWORDS};

    #[test]
    fn test_block_structure_matches_capacity() {
        for v in 0..40 {
            for e in 0..4 {
                let blk = BLOCK_STRUCTURE[v][e];
                assert_eq!(blk.data_len(), DATA_CODEWORDS[v][e], "Version {}, Ec level {e}", v + 1);
                assert_eq!(
                    blk.data_len() + blk.ecc_len(),
                    TOTAL_CODEWORDS[v],
                    "Version {}, Ec level {e}",
                    v + 1
                );
                if blk.group2_blocks > 0 {
                    assert_eq!(blk.group2_data_len, blk.group1_data_len + 1);
                }
            }
        }
    }

    #[test]
    fn test_total_codewords_match_module_count() {
        for v in 1..=40usize {
            let w = v * 4 + 17;
            let align = ALIGNMENT_PATTERN_POSITIONS[v - 1].len();
            let align_count = if align == 0 { 0 } else { align * align - 3 };
            let mut func = 3 * 64 + 2 * 15 + 1 + 2 * (w - 16);
            func += align_count * 25;
            if align > 2 {
                // Alignment patterns sitting on the timing lines
                func -= 2 * (align - 2) * 5;
            }
            if v >= 7 {
                func += 36;
            }
            let data_modules = w * w - func;
            assert_eq!(data_modules >> 3, TOTAL_CODEWORDS[v - 1], "Version {v}");
        }
    }
}
