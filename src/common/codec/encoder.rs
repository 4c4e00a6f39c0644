pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use std::borrow::Cow;
    use std::ops::Range;

    use encoding_rs::mem::{encode_latin1_lossy, is_str_latin1};
    use log::debug;

    use super::writer::{
        eci_designator_len, pad_remaining_capacity, push_eci_header, push_header, push_message,
        push_terminator,
    };
    use crate::codec::{Mode, Utf8Policy, UTF8_ECI_ASSIGNMENT};
    use crate::error::{QRError, QRResult};
    use crate::metadata::{ECLevel, Version};
    use crate::BitStream;

    // Bit length of every segment written before the pad codewords
    #[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
    pub struct SegmentLengths {
        pub eci_header: usize,
        pub mode_indicator: usize,
        pub char_count: usize,
        pub message: usize,
        pub terminator: usize,
        pub byte_padding: usize,
    }

    impl SegmentLengths {
        pub fn total(&self) -> usize {
            self.eci_header
                + self.mode_indicator
                + self.char_count
                + self.message
                + self.terminator
                + self.byte_padding
        }
    }

    #[derive(Debug, PartialEq, Eq, Clone)]
    pub struct EncodedData {
        pub mode: Mode,
        pub version: Version,
        pub ec_level: ECLevel,
        pub utf8: bool,
        pub segments: SegmentLengths,
        pub pad_bytes: Vec<u8>,
        pub data: Vec<u8>,
    }

    impl EncodedData {
        // Leading bytes holding header, message, terminator and bit padding
        pub fn message_byte_len(&self) -> usize {
            self.segments.total().div_ceil(8)
        }

        pub fn padding_range(&self) -> Range<usize> {
            self.message_byte_len()..self.data.len()
        }

        pub fn with_zeroed_padding(&self) -> Self {
            let range = self.padding_range();
            let mut res = self.clone();
            res.data[range.clone()].fill(0);
            res.pad_bytes = vec![0; range.len()];
            res
        }

        pub fn replace_padding(&self, bytes: &[u8]) -> QRResult<Self> {
            let range = self.padding_range();
            if bytes.len() != range.len() {
                return Err(QRError::DataLengthMismatch { expected: range.len(), found: bytes.len() });
            }
            let mut res = self.clone();
            res.data[range].copy_from_slice(bytes);
            res.pad_bytes = bytes.to_vec();
            Ok(res)
        }
    }

    pub fn encode(msg: &str, mode: Mode, ecl: ECLevel, utf8: Utf8Policy) -> QRResult<EncodedData> {
        let ver = find_min_version(msg, mode, ecl, utf8)?;
        encode_with_version(msg, mode, ver, ecl, utf8)
    }

    pub fn encode_with_version(
        msg: &str,
        mode: Mode,
        ver: Version,
        ecl: ECLevel,
        utf8: Utf8Policy,
    ) -> QRResult<EncodedData> {
        let payload = Payload::prepare(msg, mode, utf8)?;
        let capacity = ver.data_bit_capacity(ecl);
        let required = payload.bit_len(mode, ver);
        if required > capacity {
            return Err(QRError::DataTooLong { required, capacity });
        }

        let mut bs = BitStream::new(capacity);
        let mut segments = SegmentLengths::default();
        if let Some(eci) = payload.eci {
            segments.eci_header = measure(&mut bs, |bs| push_eci_header(eci, bs));
        }
        let len_bits = ver.char_cnt_bits(mode);
        let char_cnt = payload.bytes.len();
        segments.mode_indicator =
            measure(&mut bs, |bs| bs.push_bits(mode as u8, ver.mode_bits()));
        segments.char_count = measure(&mut bs, |bs| push_header(char_cnt, len_bits, bs));
        segments.message = measure(&mut bs, |bs| push_message(mode, &payload.bytes, bs));
        segments.terminator = measure(&mut bs, push_terminator);
        let pad_start = segments.total();
        pad_remaining_capacity(&mut bs);
        segments.byte_padding = (8 - (pad_start & 7)) & 7;

        debug_assert_eq!(bs.len(), capacity, "Bit stream not filled to capacity");

        let data = bs.into_bytes();
        let pad_bytes = data[segments.total() >> 3..].to_vec();
        debug!(
            "Encoded {} bits of {mode:?} data into {} codewords with {} pad bytes",
            segments.total(),
            data.len(),
            pad_bytes.len()
        );

        Ok(EncodedData {
            mode,
            version: ver,
            ec_level: ecl,
            utf8: payload.eci.is_some(),
            segments,
            pad_bytes,
            data,
        })
    }

    // Smallest version that fits, falling back to version 10 when none does
    pub fn find_min_version(
        msg: &str,
        mode: Mode,
        ecl: ECLevel,
        utf8: Utf8Policy,
    ) -> QRResult<Version> {
        let payload = Payload::prepare(msg, mode, utf8)?;
        for v in 1..=40 {
            let ver = Version::new(v)?;
            if payload.bit_len(mode, ver) <= ver.data_bit_capacity(ecl) {
                return Ok(ver);
            }
        }
        debug!("No version fits {} bytes at ec level {ecl:?}", payload.bytes.len());
        Version::new(FALLBACK_VERSION)
    }

    fn measure(bs: &mut BitStream, push: impl FnOnce(&mut BitStream)) -> usize {
        let start = bs.len();
        push(bs);
        bs.len() - start
    }

    // Message bytes as they go into the stream, plus the ECI assignment if any
    struct Payload<'a> {
        bytes: Cow<'a, [u8]>,
        eci: Option<u32>,
    }

    impl<'a> Payload<'a> {
        fn prepare(msg: &'a str, mode: Mode, utf8: Utf8Policy) -> QRResult<Self> {
            if mode != Mode::Byte {
                if let Some(ch) = msg.chars().find(|&c| !mode.contains(c)) {
                    return Err(QRError::InvalidChar { ch, mode });
                }
                return Ok(Self { bytes: Cow::Borrowed(msg.as_bytes()), eci: None });
            }

            let use_utf8 = match utf8 {
                Utf8Policy::Always => true,
                Utf8Policy::Auto => !is_str_latin1(msg),
                Utf8Policy::Never => {
                    if let Some(ch) = msg.chars().find(|&c| c as u32 > 0xFF) {
                        return Err(QRError::InvalidChar { ch, mode });
                    }
                    false
                }
            };

            if use_utf8 {
                Ok(Self { bytes: Cow::Borrowed(msg.as_bytes()), eci: Some(UTF8_ECI_ASSIGNMENT) })
            } else {
                Ok(Self { bytes: encode_latin1_lossy(msg), eci: None })
            }
        }

        fn bit_len(&self, mode: Mode, ver: Version) -> usize {
            let eci_bits = match self.eci {
                Some(eci) => ver.mode_bits() + eci_designator_len(eci),
                None => 0,
            };
            eci_bits + ver.mode_bits() + ver.char_cnt_bits(mode) + mode.encoded_len(self.bytes.len())
        }
    }

    static FALLBACK_VERSION: usize = 10;

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::codec::{Mode, ECI_MODE_INDICATOR, PADDING_CODEWORDS};
    use crate::BitStream;

    pub fn eci_designator_len(assignment: u32) -> usize {
        match assignment {
            0..=127 => 8,
            128..=16383 => 16,
            _ => 24,
        }
    }

    pub fn push_eci_header(assignment: u32, out: &mut BitStream) {
        out.push_bits(ECI_MODE_INDICATOR, 4);
        push_eci_designator(assignment, out);
    }

    fn push_eci_designator(assignment: u32, out: &mut BitStream) {
        debug_assert!(assignment < 1_000_000, "Invalid ECI assignment: {assignment}");
        match assignment {
            0..=127 => out.push_bits(assignment, 8),
            128..=16383 => out.push_bits((0b10 << 14) | assignment, 16),
            _ => out.push_bits((0b110 << 21) | assignment, 24),
        }
    }

    pub fn push_header(char_cnt: usize, len_bits: usize, out: &mut BitStream) {
        debug_assert!(
            char_cnt < (1 << len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {len_bits}"
        );
        out.push_bits(char_cnt as u16, len_bits);
    }

    pub fn push_message(mode: Mode, data: &[u8], out: &mut BitStream) {
        match mode {
            Mode::Numeric => push_numeric_data(data, out),
            Mode::Alphanumeric => push_alphanumeric_data(data, out),
            Mode::Byte => push_byte_data(data, out),
        }
    }

    fn push_numeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(3) {
            let len = (chunk.len() * 10 + 2) / 3;
            let data = Mode::Numeric.encode_chunk(chunk);
            out.push_bits(data, len);
        }
    }

    fn push_alphanumeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(2) {
            let len = (chunk.len() * 11 + 1) / 2;
            let data = Mode::Alphanumeric.encode_chunk(chunk);
            out.push_bits(data, len);
        }
    }

    fn push_byte_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(1) {
            let data = Mode::Byte.encode_chunk(chunk);
            out.push_bits(data, 8);
        }
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            let padding_bits_len = 8 - offset;
            out.push_bits(0, padding_bits_len);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        let offset = out.len() & 7;
        debug_assert!(
            offset == 0,
            "Bit offset should be zero before padding codewords: {}",
            offset
        );

        let remain_byte_capacity = out.remaining() >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

    #[cfg(test)]
    mod writer_tests {
        use test_case::test_case;

        use super::{
            push_alphanumeric_data, push_byte_data, push_eci_header, push_header,
            push_numeric_data, push_padding_bits, push_padding_codewords, push_terminator,
            PADDING_CODEWORDS,
        };
        use crate::codec::Mode;
        use crate::metadata::{ECLevel, Version};
        use crate::BitStream;

        fn v1_stream() -> BitStream {
            let ver = Version::new(1).unwrap();
            BitStream::new(ver.data_bit_capacity(ECLevel::L))
        }

        #[test_case(1, Mode::Numeric, 1023, vec![0b11111111, 0b11000000])]
        #[test_case(1, Mode::Alphanumeric, 511, vec![0b11111111, 0b10000000])]
        #[test_case(1, Mode::Byte, 255, vec![0b11111111])]
        #[test_case(10, Mode::Numeric, 4095, vec![0b11111111, 0b11110000])]
        #[test_case(10, Mode::Alphanumeric, 2047, vec![0b11111111, 0b11100000])]
        #[test_case(27, Mode::Numeric, 16383, vec![0b11111111, 0b11111100])]
        #[test_case(27, Mode::Byte, 65535, vec![0b11111111, 0b11111111])]
        fn test_push_header(v: usize, mode: Mode, char_cnt: usize, exp: Vec<u8>) {
            let ver = Version::new(v).unwrap();
            let mut bs = BitStream::new(ver.data_bit_capacity(ECLevel::L));
            push_header(char_cnt, ver.char_cnt_bits(mode), &mut bs);
            assert_eq!(bs.data(), exp);
        }

        #[test]
        fn test_push_numeric_data() {
            let mut bs = v1_stream();
            push_numeric_data("01234567".as_bytes(), &mut bs);
            assert_eq!(bs.data(), vec![0b00000011, 0b00010101, 0b10011000, 0b01100000]);
            let mut bs = v1_stream();
            push_numeric_data("8".as_bytes(), &mut bs);
            assert_eq!(bs.data(), vec![0b10000000]);
        }

        #[test]
        fn test_push_alphanumeric_data() {
            let mut bs = v1_stream();
            push_alphanumeric_data("AC-42".as_bytes(), &mut bs);
            assert_eq!(bs.data(), vec![0b00111001, 0b11011100, 0b11100100, 0b00100000])
        }

        #[test]
        fn test_push_byte_data() {
            let mut bs = v1_stream();
            push_byte_data("a".as_bytes(), &mut bs);
            assert_eq!(bs.data(), vec![0b01100001])
        }

        #[test_case(26, vec![0b01110001, 0b10100000], 12)]
        #[test_case(1000, vec![0b01111000, 0b00111110, 0b10000000], 20)]
        #[test_case(100000, vec![0b01111100, 0b00011000, 0b01101010, 0b00000000], 28)]
        fn test_push_eci_header(assignment: u32, exp: Vec<u8>, len: usize) {
            let mut bs = BitStream::new(64);
            push_eci_header(assignment, &mut bs);
            assert_eq!(bs.data(), exp);
            assert_eq!(bs.len(), len);
        }

        #[test]
        fn test_push_terminator() {
            let mut bs = v1_stream();
            let capacity = bs.capacity() >> 3;
            bs.push_bits(0b1, 1);
            push_terminator(&mut bs);
            assert_eq!(bs.data(), vec![0b10000000]);
            assert_eq!(bs.len() & 7, 5);
            push_padding_bits(&mut bs);
            for _ in 0..capacity - 1 {
                bs.push_bits(0b11111111, 8);
            }
            push_terminator(&mut bs);
            assert_eq!(bs.len(), bs.capacity());
        }

        #[test]
        fn test_push_padding_bits() {
            let mut bs = v1_stream();
            bs.push_bits(0b1, 1);
            push_padding_bits(&mut bs);
            assert_eq!(bs.data(), vec![0b10000000]);
            assert_eq!(bs.len() & 7, 0);
        }

        #[test]
        fn test_push_padding_codewords() {
            let mut bs = v1_stream();
            bs.push_bits(0b1, 1);
            push_padding_bits(&mut bs);
            push_padding_codewords(&mut bs);
            let mut output = vec![0b10000000];
            output.extend(PADDING_CODEWORDS.iter().cycle().take(18));
            assert_eq!(bs.data(), output);
        }
    }
}
