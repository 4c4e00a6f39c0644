mod qr;

pub use qr::{Module, QR};

use log::debug;

use crate::codec::{encode, encode_with_version, EncodedData, Mode, Utf8Policy};
use crate::ec::{
    calculate_ecc_for_blocks, error_correction_capacity, interleave_blocks, split_into_blocks,
    Block,
};
use crate::error::{QRError, QRResult};
use crate::mask::{apply_best_mask, MaskPattern};
use crate::metadata::{ECLevel, Version};

pub struct QRBuilder<'a> {
    content: &'a str,
    mode: Option<Mode>,
    version: Option<Version>,
    ec_level: ECLevel,
    utf8: Utf8Policy,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            mode: None,
            version: None,
            ec_level: ECLevel::M,
            utf8: Utf8Policy::Auto,
            mask: None,
        }
    }

    pub fn content(&mut self, content: &'a str) -> &mut Self {
        self.content = content;
        self
    }

    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = Some(mode);
        self
    }

    pub fn unset_mode(&mut self) -> &mut Self {
        self.mode = None;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn utf8(&mut self, utf8: Utf8Policy) -> &mut Self {
        self.utf8 = utf8;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn metadata(&self) -> String {
        let version = match self.version {
            Some(v) => (*v).to_string(),
            None => "None".to_string(),
        };
        let mode = match self.mode {
            Some(m) => format!("{m:?}"),
            None => "None".to_string(),
        };
        let mask = match self.mask {
            Some(m) => (*m).to_string(),
            None => "None".to_string(),
        };
        format!(
            "{{ Version: {version}, Ec level: {:?}, Mode: {mode}, Utf8: {:?}, Mask: {mask} }}",
            self.ec_level, self.utf8
        )
    }
}

#[cfg(test)]
mod qrbuilder_util_tests {
    use super::QRBuilder;
    use crate::codec::{Mode, Utf8Policy};
    use crate::mask::MaskPattern;
    use crate::metadata::{ECLevel, Version};

    #[test]
    fn test_metadata() {
        let mut qr_builder = QRBuilder::new("Hello, world!");
        assert_eq!(
            qr_builder.metadata(),
            "{ Version: None, Ec level: M, Mode: None, Utf8: Auto, Mask: None }"
        );
        qr_builder
            .version(Version::new(1).unwrap())
            .ec_level(ECLevel::L)
            .mode(Mode::Byte)
            .utf8(Utf8Policy::Never)
            .mask(MaskPattern::new(3).unwrap());
        assert_eq!(
            qr_builder.metadata(),
            "{ Version: 1, Ec level: L, Mode: Byte, Utf8: Never, Mask: 3 }"
        );
        qr_builder.unset_version().unset_mode().unset_mask();
        assert_eq!(
            qr_builder.metadata(),
            "{ Version: None, Ec level: L, Mode: None, Utf8: Never, Mask: None }"
        );
    }
}

// Builder pipeline
//------------------------------------------------------------------------------

// Every intermediate product of one build, for callers that inspect or edit
// stages before rebuilding
#[derive(Debug, Clone)]
pub struct Encoding {
    pub encoded: EncodedData,
    pub blocks: Vec<Block>,
    pub codewords: Vec<u8>,
    pub qr: QR,
}

impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        Ok(self.encode()?.qr)
    }

    pub fn encode(&self) -> QRResult<Encoding> {
        debug!("Generating QR {}...", self.metadata());

        let mode = self.mode.unwrap_or_else(|| Mode::detect(self.content));

        debug!("Encoding content in {mode:?} mode...");
        let encoded = match self.version {
            Some(v) => encode_with_version(self.content, mode, v, self.ec_level, self.utf8)?,
            None => {
                debug!("Finding smallest version...");
                encode(self.content, mode, self.ec_level, self.utf8)?
            }
        };
        let version = encoded.version;

        debug!("Splitting into blocks & computing ecc...");
        let blocks = split_into_blocks(&encoded.data, version, self.ec_level)?;
        let blocks = calculate_ecc_for_blocks(&blocks)?;

        debug!("Interleaving blocks...");
        let codewords = interleave_blocks(&blocks);

        let qr = place_codewords(&codewords, version, self.ec_level, self.mask)?;
        report(&qr, &encoded);

        Ok(Encoding { encoded, blocks, codewords, qr })
    }
}

// Symbol for pre-padded data codewords. Recomputes ecc, interleaving and
// placement so edited data bytes or a new mask can be tried without
// re-encoding the content. Without a mask the lowest penalty mask is chosen.
pub fn build_matrix(
    data: &[u8],
    version: Version,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
) -> QRResult<QR> {
    let expected = version.data_codewords(ec_level);
    if data.len() != expected {
        return Err(QRError::DataLengthMismatch { expected, found: data.len() });
    }

    let blocks = calculate_ecc_for_blocks(&split_into_blocks(data, version, ec_level)?)?;
    let codewords = interleave_blocks(&blocks);
    place_codewords(&codewords, version, ec_level, mask)
}

fn place_codewords(
    codewords: &[u8],
    version: Version,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
) -> QRResult<QR> {
    debug!("Constructing QR...");
    let mut qr = QR::new(version, ec_level);

    debug!("Drawing functional patterns...");
    qr.draw_all_function_patterns();

    debug!("Drawing encoding region...");
    qr.draw_encoding_region(codewords)?;

    debug!("Drawing version info...");
    qr.draw_version_info();

    match mask {
        Some(m) => {
            debug!("Applying mask {}...", *m);
            qr.apply_mask(m);
        }
        None => {
            debug!("Finding & applying best mask...");
            apply_best_mask(&mut qr);
        }
    }

    // Surfaces an unset module as an error instead of returning a partial symbol
    qr.to_matrix()?;
    Ok(qr)
}

fn report(qr: &QR, encoded: &EncodedData) {
    let version = qr.version();
    let total_modules = qr.width() * qr.width();
    let dark_modules = qr.count_dark_modules();
    let data_len = version.data_codewords(qr.ec_level());
    let ec_capacity = error_correction_capacity(version, qr.ec_level());

    debug!("QR generated successfully: {}", qr.metadata());
    debug!("Data capacity: {data_len}, Error capacity: {ec_capacity}");
    debug!(
        "Message bytes: {}, Pad bytes: {}, Utf8: {}",
        encoded.message_byte_len(),
        encoded.pad_bytes.len(),
        encoded.utf8
    );
    debug!(
        "Dark cells: {dark_modules}, Light cells: {}, Balance: {}%",
        total_modules - dark_modules,
        dark_modules * 100 / total_modules
    );
}

#[cfg(test)]
mod builder_tests {
    use test_case::test_case;

    use super::{build_matrix, Module, QRBuilder, QR};
    use crate::codec::{Mode, Utf8Policy};
    use crate::ec::{
        calculate_ecc_for_blocks, interleave_blocks, interleaved_index, split_into_blocks,
    };
    use crate::error::{ErrorKind, QRError};
    use crate::iter::EncRegionIter;
    use crate::mask::{compute_total_penalty, MaskPattern};
    use crate::metadata::{format_info, Color, ECLevel, Version};

    // Unmasks the encoding region and reads the codewords back in placement order
    fn read_codewords(qr: &QR) -> Vec<u8> {
        let ver = qr.version();
        let mut layout = QR::new(ver, qr.ec_level());
        layout.draw_all_function_patterns();
        let mask_fn = qr.mask().unwrap().mask_function();
        let bits = EncRegionIter::new(ver)
            .filter(|&(r, c)| matches!(layout.get(r, c), Module::Empty))
            .map(|(r, c)| (*qr.get(r, c) == Color::Dark) ^ mask_fn(c as usize, r as usize))
            .collect::<Vec<_>>();
        bits.chunks_exact(8)
            .take(ver.total_codewords())
            .map(|byte| byte.iter().fold(0u8, |b, &bit| (b << 1) | bit as u8))
            .collect()
    }

    #[test]
    fn test_hello_world_1m() {
        let enc = QRBuilder::new("HELLO WORLD")
            .version(Version::new(1).unwrap())
            .ec_level(ECLevel::M)
            .encode()
            .unwrap();

        assert_eq!(enc.encoded.mode, Mode::Alphanumeric);
        assert_eq!(
            enc.encoded.data,
            b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11"
        );
        assert_eq!(enc.blocks.len(), 1);
        assert_eq!(enc.blocks[0].ecc(), b"\xc4\x23\x27\x77\xeb\xd7\xe7\xe2\x5d\x17");
        assert_eq!(enc.codewords.len(), 26);
        assert_eq!(enc.codewords[..16], enc.encoded.data[..]);
        assert_eq!(read_codewords(&enc.qr), enc.codewords);
    }

    #[test]
    fn test_defaults() {
        let qr = QRBuilder::new("HELLO WORLD").build().unwrap();
        assert_eq!(*qr.version(), 1);
        assert_eq!(qr.ec_level(), ECLevel::M);
        assert!(qr.mask().is_some());
        assert_eq!(qr.width(), 21);
    }

    #[test]
    fn test_empty_content() {
        let enc = QRBuilder::new("").encode().unwrap();
        assert_eq!(enc.encoded.mode, Mode::Byte);
        assert_eq!(*enc.qr.version(), 1);
        assert!(enc.qr.to_matrix().is_ok());
    }

    #[test]
    fn test_explicit_mask() {
        let mask = MaskPattern::new(5).unwrap();
        let qr = QRBuilder::new("01234567").ec_level(ECLevel::Q).mask(mask).build().unwrap();
        assert_eq!(qr.mask(), Some(mask));
        let info = format_info(ECLevel::Q, mask);
        assert_eq!(qr.read_number(&super::qr::FORMAT_INFO_COORDS_MAIN), info);
        assert_eq!(qr.read_number(&super::qr::FORMAT_INFO_COORDS_SIDE), info);
    }

    #[test]
    fn test_best_mask_has_lowest_penalty() {
        let mut builder = QRBuilder::new("Best mask selection, version 2 or so");
        let best = builder.build().unwrap();
        let best_penalty = compute_total_penalty(&best);
        for m in MaskPattern::all() {
            let qr = builder.mask(m).build().unwrap();
            assert!(best_penalty <= compute_total_penalty(&qr), "Mask {}", *m);
        }
    }

    #[test]
    fn test_version_info_drawn() {
        let ver = Version::new(7).unwrap();
        let content = "1234567890".repeat(15);
        let qr = QRBuilder::new(&content)
            .version(ver)
            .ec_level(ECLevel::H)
            .build()
            .unwrap();
        assert_eq!(qr.read_number(&super::qr::VERSION_INFO_COORDS_TR), ver.info());
        assert_eq!(qr.read_number(&super::qr::VERSION_INFO_COORDS_BL), ver.info());
    }

    #[test_case("Hello, world!".to_string(), 1, ECLevel::L)]
    #[test_case("TEST".to_string(), 1, ECLevel::M)]
    #[test_case("12345".to_string(), 1, ECLevel::Q)]
    #[test_case("OK".to_string(), 1, ECLevel::H)]
    #[test_case("A11111111111111".repeat(11), 7, ECLevel::M)]
    #[test_case("aAAAAAA1111111111111AAAAAAa".repeat(3), 7, ECLevel::Q)]
    #[test_case("1234567890".repeat(15), 7, ECLevel::H)]
    #[test_case("Grüße, 世界! 🌎".repeat(5), 10, ECLevel::L)]
    #[test_case("A11111111111111".repeat(20), 10, ECLevel::M)]
    #[test_case("1234567890".repeat(28), 10, ECLevel::H)]
    #[test_case("1234567890".repeat(145), 27, ECLevel::H)]
    #[test_case("A111111111111111".repeat(97), 40, ECLevel::M)]
    #[test_case("1234567890".repeat(305), 40, ECLevel::H)]
    fn test_builder(content: String, version: usize, ec_level: ECLevel) {
        let version = Version::new(version).unwrap();
        let enc = QRBuilder::new(&content).version(version).ec_level(ec_level).encode().unwrap();

        assert_eq!(enc.qr.version(), version);
        assert_eq!(enc.qr.ec_level(), ec_level);
        assert_eq!(enc.encoded.data.len(), version.data_codewords(ec_level));
        assert_eq!(enc.codewords.len(), version.total_codewords());

        let matrix = enc.qr.to_matrix().unwrap();
        assert_eq!(matrix.len(), version.width());
        assert!(matrix.iter().all(|row| row.len() == version.width()));
        assert_eq!(read_codewords(&enc.qr), enc.codewords);
    }

    #[test]
    fn test_builder_data_overflow() {
        let content = "1234567890".repeat(306);
        let err = QRBuilder::new(&content)
            .version(Version::new(40).unwrap())
            .ec_level(ECLevel::H)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    }

    #[test]
    fn test_explicit_version_too_small() {
        let content = "A".repeat(30);
        let err = QRBuilder::new(&content).version(Version::new(1).unwrap()).build().unwrap_err();
        assert!(matches!(err, QRError::DataTooLong { .. }));
    }

    #[test]
    fn test_invalid_char_for_mode() {
        let err = QRBuilder::new("12a4").mode(Mode::Numeric).build().unwrap_err();
        assert_eq!(err, QRError::InvalidChar { ch: 'a', mode: Mode::Numeric });
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_latin1_only_policy() {
        let err = QRBuilder::new("🌎").utf8(Utf8Policy::Never).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_build_matrix_5q() {
        let data = b"CUF\x86W&U\xc2w2\x06\x12\x06g&\xf6\xf6B\x07v\x86\xf2\x07&V\x16\xc6\xc7\x92\x06\
                    \xb6\xe6\xf7w2\x07v\x86W&R\x06\x86\x972\x07F\xf7vV\xc2\x06\x972\x10\xec\x11\xec\
                    \x11\xec\x11\xec";
        let ver = Version::new(5).unwrap();
        let mask = MaskPattern::new(2).unwrap();
        let qr = build_matrix(data, ver, ECLevel::Q, Some(mask)).unwrap();

        let blocks = split_into_blocks(data, ver, ECLevel::Q).unwrap();
        let blocks = calculate_ecc_for_blocks(&blocks).unwrap();
        assert_eq!(read_codewords(&qr), interleave_blocks(&blocks));
        assert_eq!(qr.mask(), Some(mask));
    }

    #[test]
    fn test_build_matrix_matches_builder() {
        let mask = MaskPattern::new(6).unwrap();
        let enc = QRBuilder::new("https://example.com/qr?id=42").mask(mask).encode().unwrap();
        let ver = enc.encoded.version;
        let qr = build_matrix(&enc.encoded.data, ver, ECLevel::M, Some(mask)).unwrap();
        assert_eq!(qr, enc.qr);
    }

    #[test]
    fn test_build_matrix_length_mismatch() {
        let ver = Version::new(1).unwrap();
        let err = build_matrix(&[0; 15], ver, ECLevel::M, None).unwrap_err();
        assert_eq!(err, QRError::DataLengthMismatch { expected: 16, found: 15 });
    }

    #[test]
    fn test_rebuild_with_edited_padding() {
        let enc = QRBuilder::new("PAD").version(Version::new(2).unwrap()).encode().unwrap();
        let ver = enc.encoded.version;
        let pad_len = enc.encoded.padding_range().len();
        let edited = enc.encoded.replace_padding(&vec![0xAB; pad_len]).unwrap();

        let qr = build_matrix(&edited.data, ver, ECLevel::M, None).unwrap();
        let matrix = qr.to_matrix().unwrap();
        let mask_fn = qr.mask().unwrap().mask_function();
        for i in edited.padding_range() {
            let index = interleaved_index(ver, ECLevel::M, i).unwrap();
            let byte = qr
                .codeword_modules(index)
                .unwrap()
                .iter()
                .fold(0u8, |b, &(r, c)| (b << 1) | (matrix[r][c] ^ mask_fn(c, r)) as u8);
            assert_eq!(byte, 0xAB, "Data codeword {i} at interleaved index {index}");
        }
    }
}
