pub mod symbol;

pub use symbol::QRSymbol;

use crate::common::bits::BitBuffer;
use crate::common::charset::CharacterSet;
use crate::common::ec::{ReedSolomonEncoder, QR_CODE_FIELD};
use crate::common::error::{QRError, QRResult};
use crate::common::grid::ByteGrid;
use crate::common::mask::{compute_total_penalty, MaskPattern};
use crate::common::matrix::build_matrix;
use crate::common::metadata::{alphanumeric_code, ECLevel, Mode, Version};

// Encode hints
//------------------------------------------------------------------------------

/// Optional knobs for one encode call. Everything defaults to "let the
/// encoder decide".
#[derive(Debug, Default, Clone, Copy)]
pub struct EncodeHints {
    /// Pin the symbol version instead of searching for the smallest fit
    pub version: Option<Version>,
    /// Pin the mask pattern instead of scoring all eight
    pub mask: Option<MaskPattern>,
    /// Byte mode text encoding; a non-default hint also emits an ECI segment
    pub character_set: Option<CharacterSet>,
    /// Prefix the payload with the FNC1-in-first-position indicator
    pub gs1: bool,
    /// Quiet zone width recorded on the symbol for downstream renderers
    pub margin: Option<u32>,
}

pub(crate) const DEFAULT_QUIET_ZONE: u32 = 4;

// Encoder
//------------------------------------------------------------------------------

/// Runs the whole pipeline: mode choice, header and data bitstreams, version
/// search, termination and padding, block split with error correction,
/// interleaving, mask selection and matrix construction.
pub fn encode(content: &str, ec_level: ECLevel, hints: &EncodeHints) -> QRResult<QRSymbol> {
    if content.is_empty() {
        return Err(QRError::InvalidArgument("empty contents"));
    }

    let charset = hints.character_set.unwrap_or(CharacterSet::Iso8859_1);
    let mode = choose_mode(content);

    // Header segments ahead of the payload: ECI only for an explicitly
    // hinted character set, FNC1 only for GS1 content
    let mut header_bits = BitBuffer::new();
    if mode == Mode::Byte && hints.character_set.is_some() {
        append_eci(charset, &mut header_bits)?;
    }
    if hints.gs1 {
        append_mode_info(Mode::Fnc1First, &mut header_bits)?;
    }
    append_mode_info(mode, &mut header_bits)?;

    // Payload bits are collected separately so their size can drive the
    // version search before the length field is written
    let mut data_bits = BitBuffer::new();
    append_bytes(content, mode, &mut data_bits, charset)?;

    let version = match hints.version {
        Some(version) => {
            let bits_needed = calculate_bits_needed(mode, &header_bits, &data_bits, version);
            if !will_fit(bits_needed, version, ec_level) {
                return Err(QRError::DataTooBig);
            }
            version
        }
        None => recommend_version(ec_level, mode, &header_bits, &data_bits)?,
    };

    let mut header_and_data_bits = BitBuffer::new();
    header_and_data_bits.append_buffer(&header_bits);
    // Byte mode counts encoded bytes, the character modes count characters
    let num_letters =
        if mode == Mode::Byte { data_bits.size_in_bytes() } else { content.chars().count() };
    append_length_info(num_letters, version, mode, &mut header_and_data_bits)?;
    header_and_data_bits.append_buffer(&data_bits);

    let ec_blocks = version.ec_blocks(ec_level);
    let num_data_bytes = version.total_codewords() - ec_blocks.total_ec_codewords();
    terminate_bits(num_data_bytes, &mut header_and_data_bits)?;

    let final_bits = interleave_with_ec_bytes(
        &header_and_data_bits,
        version.total_codewords(),
        num_data_bytes,
        ec_blocks.num_blocks,
    )?;

    let dimension = version.width();
    let mut grid = ByteGrid::new(dimension, dimension);
    let mask = match hints.mask {
        Some(mask) => mask,
        None => choose_mask_pattern(&final_bits, ec_level, version, &mut grid)?,
    };
    build_matrix(&final_bits, ec_level, version, mask, &mut grid)?;

    Ok(QRSymbol::new(mode, ec_level, version, mask, grid, hints.margin.unwrap_or(DEFAULT_QUIET_ZONE)))
}

/// Greedy single-segment mode choice: any character outside the
/// alphanumeric table forces byte mode for the whole payload, digits-only
/// content is numeric, anything else in the table is alphanumeric.
pub fn choose_mode(content: &str) -> Mode {
    let mut has_numeric = false;
    let mut has_alphanumeric = false;
    for c in content.chars() {
        if c.is_ascii_digit() {
            has_numeric = true;
        } else if alphanumeric_code(c).is_some() {
            has_alphanumeric = true;
        } else {
            return Mode::Byte;
        }
    }
    if has_alphanumeric {
        return Mode::Alphanumeric;
    }
    if has_numeric {
        return Mode::Numeric;
    }
    Mode::Byte
}

// Version selection
//------------------------------------------------------------------------------

/// Two-pass fixed point: the length field width depends on the version,
/// which depends on the total bit count, which includes the length field.
/// Guess with version 1's width, then correct once. A single correction pass
/// is an approximation, not proven optimal at every tier boundary.
fn recommend_version(
    ec_level: ECLevel,
    mode: Mode,
    header_bits: &BitBuffer,
    data_bits: &BitBuffer,
) -> QRResult<Version> {
    let provisional_bits_needed =
        calculate_bits_needed(mode, header_bits, data_bits, Version::new(1));
    let provisional_version = choose_version(provisional_bits_needed, ec_level)?;

    let bits_needed = calculate_bits_needed(mode, header_bits, data_bits, provisional_version);
    choose_version(bits_needed, ec_level)
}

fn calculate_bits_needed(
    mode: Mode,
    header_bits: &BitBuffer,
    data_bits: &BitBuffer,
    version: Version,
) -> usize {
    header_bits.len() + mode.char_count_bits(version) + data_bits.len()
}

// Linear scan in increasing order, so the smallest fitting version wins
fn choose_version(num_input_bits: usize, ec_level: ECLevel) -> QRResult<Version> {
    for number in 1..=40 {
        let version = Version::new(number);
        if will_fit(num_input_bits, version, ec_level) {
            return Ok(version);
        }
    }
    Err(QRError::DataTooBig)
}

fn will_fit(num_input_bits: usize, version: Version, ec_level: ECLevel) -> bool {
    version.data_codewords(ec_level) >= num_input_bits.div_ceil(8)
}

// Bitstream assembly
//------------------------------------------------------------------------------

fn append_mode_info(mode: Mode, bits: &mut BitBuffer) -> QRResult<()> {
    bits.append_bits(mode.indicator(), 4)
}

fn append_eci(charset: CharacterSet, bits: &mut BitBuffer) -> QRResult<()> {
    append_mode_info(Mode::Eci, bits)?;
    // Single byte designator form, enough for assignments up to 127
    bits.append_bits(charset.eci_value(), 8)
}

fn append_length_info(
    num_letters: usize,
    version: Version,
    mode: Mode,
    bits: &mut BitBuffer,
) -> QRResult<()> {
    let num_bits = mode.char_count_bits(version);
    if num_letters >= 1 << num_bits {
        return Err(QRError::DataTooBig);
    }
    bits.append_bits(num_letters as u32, num_bits)
}

fn append_bytes(
    content: &str,
    mode: Mode,
    bits: &mut BitBuffer,
    charset: CharacterSet,
) -> QRResult<()> {
    match mode {
        Mode::Numeric => append_numeric_bytes(content, bits),
        Mode::Alphanumeric => append_alphanumeric_bytes(content, bits),
        Mode::Byte => append_8bit_bytes(content, bits, charset),
        _ => Err(QRError::InternalConsistency("unexpected mode for data segment")),
    }
}

fn append_numeric_bytes(content: &str, bits: &mut BitBuffer) -> QRResult<()> {
    debug_assert!(content.bytes().all(|b| b.is_ascii_digit()), "Invalid numeric data");

    // Three digits pack into 10 bits, the trailing two into 7, one into 4
    for chunk in content.as_bytes().chunks(3) {
        let value = chunk.iter().fold(0u16, |n, &b| n * 10 + (b - b'0') as u16);
        bits.append_bits(value, (chunk.len() * 10 + 2) / 3)?;
    }
    Ok(())
}

fn append_alphanumeric_bytes(content: &str, bits: &mut BitBuffer) -> QRResult<()> {
    let mut chars = content.chars();
    while let Some(c1) = chars.next() {
        let code1 = alphanumeric_code(c1)
            .ok_or(QRError::EncodingError("character not in alphanumeric table"))?;
        match chars.next() {
            // Two characters pack into 11 bits base 45
            Some(c2) => {
                let code2 = alphanumeric_code(c2)
                    .ok_or(QRError::EncodingError("character not in alphanumeric table"))?;
                bits.append_bits(code1 * 45 + code2, 11)?;
            }
            None => bits.append_bits(code1, 6)?,
        }
    }
    Ok(())
}

fn append_8bit_bytes(content: &str, bits: &mut BitBuffer, charset: CharacterSet) -> QRResult<()> {
    for byte in charset.encode(content)? {
        bits.append_bits(byte, 8)?;
    }
    Ok(())
}

/// Appends up to four terminator bits, zero-pads to the byte boundary, then
/// fills whole bytes with the alternating pad codewords until the stream is
/// exactly `num_data_bytes` long.
fn terminate_bits(num_data_bytes: usize, bits: &mut BitBuffer) -> QRResult<()> {
    let capacity = num_data_bytes * 8;
    if bits.len() > capacity {
        return Err(QRError::DataTooBig);
    }
    for _ in 0..4 {
        if bits.len() >= capacity {
            break;
        }
        bits.append_bit(false);
    }
    let num_bits_in_last_byte = bits.len() & 0x07;
    if num_bits_in_last_byte > 0 {
        for _ in num_bits_in_last_byte..8 {
            bits.append_bit(false);
        }
    }
    let num_padding_bytes = num_data_bytes - bits.size_in_bytes();
    for i in 0..num_padding_bytes {
        bits.append_bits(PADDING_CODEWORDS[i & 1], 8)?;
    }
    if bits.len() != capacity {
        return Err(QRError::InternalConsistency("terminated stream size does not equal capacity"));
    }
    Ok(())
}

// Block split & interleaving
//------------------------------------------------------------------------------

// One Reed-Solomon block: its slice of data codewords paired with the error
// correction codewords computed for it.
struct CodewordBlock {
    data: Vec<u8>,
    ec: Vec<u8>,
}

/// Per-block codeword counts derived from the totals. Blocks come in at most
/// two sizes since the totals rarely divide evenly; the larger blocks sit at
/// the end and carry one extra data codeword each.
fn num_data_and_ec_bytes_for_block(
    num_total_bytes: usize,
    num_data_bytes: usize,
    num_blocks: usize,
    block_id: usize,
) -> QRResult<(usize, usize)> {
    if block_id >= num_blocks {
        return Err(QRError::InvalidArgument("block id too large"));
    }
    let num_blocks_in_group2 = num_total_bytes % num_blocks;
    let num_blocks_in_group1 = num_blocks - num_blocks_in_group2;
    let num_total_bytes_in_group1 = num_total_bytes / num_blocks;
    let num_total_bytes_in_group2 = num_total_bytes_in_group1 + 1;
    let num_data_bytes_in_group1 = num_data_bytes / num_blocks;
    let num_data_bytes_in_group2 = num_data_bytes_in_group1 + 1;
    let num_ec_bytes_in_group1 = num_total_bytes_in_group1 - num_data_bytes_in_group1;
    let num_ec_bytes_in_group2 = num_total_bytes_in_group2 - num_data_bytes_in_group2;
    if num_ec_bytes_in_group1 != num_ec_bytes_in_group2 {
        return Err(QRError::InternalConsistency("ec bytes mismatch between block groups"));
    }
    if num_total_bytes
        != (num_data_bytes_in_group1 + num_ec_bytes_in_group1) * num_blocks_in_group1
            + (num_data_bytes_in_group2 + num_ec_bytes_in_group2) * num_blocks_in_group2
    {
        return Err(QRError::InternalConsistency("total bytes mismatch across blocks"));
    }
    if block_id < num_blocks_in_group1 {
        Ok((num_data_bytes_in_group1, num_ec_bytes_in_group1))
    } else {
        Ok((num_data_bytes_in_group2, num_ec_bytes_in_group2))
    }
}

/// Slices the padded stream into blocks, computes error correction per
/// block, then emits byte i of every data block in block order followed by
/// byte i of every EC block. Short blocks simply run out first.
fn interleave_with_ec_bytes(
    bits: &BitBuffer,
    num_total_bytes: usize,
    num_data_bytes: usize,
    num_blocks: usize,
) -> QRResult<BitBuffer> {
    if bits.size_in_bytes() != num_data_bytes {
        return Err(QRError::InternalConsistency("bit stream does not match data byte count"));
    }

    let mut encoder = ReedSolomonEncoder::new(&QR_CODE_FIELD);
    let mut blocks = Vec::with_capacity(num_blocks);
    let mut data_bytes_offset = 0;
    let mut max_num_data_bytes = 0;
    let mut max_num_ec_bytes = 0;
    for block_id in 0..num_blocks {
        let (num_data_in_block, num_ec_in_block) =
            num_data_and_ec_bytes_for_block(num_total_bytes, num_data_bytes, num_blocks, block_id)?;
        let data = bits.to_bytes(8 * data_bytes_offset, num_data_in_block);
        let ec = generate_ec_bytes(&mut encoder, &data, num_ec_in_block)?;
        max_num_data_bytes = max_num_data_bytes.max(data.len());
        max_num_ec_bytes = max_num_ec_bytes.max(ec.len());
        data_bytes_offset += num_data_in_block;
        blocks.push(CodewordBlock { data, ec });
    }
    if num_data_bytes != data_bytes_offset {
        return Err(QRError::InternalConsistency("data bytes do not match block offsets"));
    }

    let mut result = BitBuffer::with_capacity(num_total_bytes * 8);
    for i in 0..max_num_data_bytes {
        for block in &blocks {
            if i < block.data.len() {
                result.append_bits(block.data[i], 8)?;
            }
        }
    }
    for i in 0..max_num_ec_bytes {
        for block in &blocks {
            if i < block.ec.len() {
                result.append_bits(block.ec[i], 8)?;
            }
        }
    }
    if num_total_bytes != result.size_in_bytes() {
        return Err(QRError::InternalConsistency("interleaved size does not match total codewords"));
    }
    Ok(result)
}

fn generate_ec_bytes(
    encoder: &mut ReedSolomonEncoder,
    data: &[u8],
    num_ec_bytes: usize,
) -> QRResult<Vec<u8>> {
    let mut codewords = data.to_vec();
    codewords.resize(data.len() + num_ec_bytes, 0);
    encoder.encode(&mut codewords, num_ec_bytes)?;
    Ok(codewords.split_off(data.len()))
}

// Mask selection
//------------------------------------------------------------------------------

// Builds the symbol once per pattern into the shared scratch grid and keeps
// the strict minimum, so ties break to the lowest index.
fn choose_mask_pattern(
    bits: &BitBuffer,
    ec_level: ECLevel,
    version: Version,
    grid: &mut ByteGrid,
) -> QRResult<MaskPattern> {
    let mut min_penalty = u32::MAX;
    let mut best_pattern = MaskPattern::new(0);
    for pattern in 0..8 {
        let mask = MaskPattern::new(pattern);
        build_matrix(bits, ec_level, version, mask, grid)?;
        let penalty = compute_total_penalty(grid);
        if penalty < min_penalty {
            min_penalty = penalty;
            best_pattern = mask;
        }
    }
    Ok(best_pattern)
}

// Global constants
//------------------------------------------------------------------------------

/// Pad codewords alternated over the unused data capacity
pub(crate) static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

#[cfg(test)]
mod encoder_tests {
    use test_case::test_case;

    use super::*;

    fn bits_to_string(bits: &BitBuffer) -> String {
        (0..bits.len()).map(|i| if bits.get(i) { '1' } else { '0' }).collect()
    }

    #[test_case("123456", Mode::Numeric)]
    #[test_case("0", Mode::Numeric)]
    #[test_case("HELLO WORLD", Mode::Alphanumeric)]
    #[test_case("A1", Mode::Alphanumeric)]
    #[test_case("$%*+-./:", Mode::Alphanumeric)]
    #[test_case("hello", Mode::Byte)]
    #[test_case("123a", Mode::Byte)]
    #[test_case("HELLO WORLD!", Mode::Byte)]
    #[test_case("héllo", Mode::Byte)]
    fn test_choose_mode(content: &str, exp_mode: Mode) {
        assert_eq!(choose_mode(content), exp_mode);
    }

    #[test]
    fn test_append_mode_info() {
        let mut bits = BitBuffer::new();
        append_mode_info(Mode::Numeric, &mut bits).unwrap();
        assert_eq!(bits_to_string(&bits), "0001");
        let mut bits = BitBuffer::new();
        append_mode_info(Mode::Fnc1First, &mut bits).unwrap();
        append_mode_info(Mode::Byte, &mut bits).unwrap();
        assert_eq!(bits_to_string(&bits), "01010100");
    }

    #[test]
    fn test_append_eci() {
        let mut bits = BitBuffer::new();
        append_eci(CharacterSet::Utf8, &mut bits).unwrap();
        assert_eq!(bits_to_string(&bits), "011100011010");
    }

    #[test]
    fn test_append_numeric_bytes() {
        let mut bits = BitBuffer::new();
        append_numeric_bytes("012", &mut bits).unwrap();
        assert_eq!(bits_to_string(&bits), "0000001100");
        let mut bits = BitBuffer::new();
        append_numeric_bytes("01234567", &mut bits).unwrap();
        assert_eq!(bits_to_string(&bits), "000000110001010110011000011");
        let mut bits = BitBuffer::new();
        append_numeric_bytes("8", &mut bits).unwrap();
        assert_eq!(bits_to_string(&bits), "1000");
    }

    #[test]
    fn test_append_alphanumeric_bytes() {
        let mut bits = BitBuffer::new();
        append_alphanumeric_bytes("A", &mut bits).unwrap();
        assert_eq!(bits_to_string(&bits), "001010");
        let mut bits = BitBuffer::new();
        append_alphanumeric_bytes("AB", &mut bits).unwrap();
        assert_eq!(bits_to_string(&bits), "00111001101");
        let mut bits = BitBuffer::new();
        append_alphanumeric_bytes("ABC", &mut bits).unwrap();
        assert_eq!(bits_to_string(&bits), "00111001101001100");
    }

    #[test]
    fn test_append_alphanumeric_invalid_char() {
        let mut bits = BitBuffer::new();
        assert_eq!(
            append_alphanumeric_bytes("abc", &mut bits),
            Err(QRError::EncodingError("character not in alphanumeric table"))
        );
    }

    #[test]
    fn test_append_8bit_bytes() {
        let mut bits = BitBuffer::new();
        append_8bit_bytes("abc", &mut bits, CharacterSet::Iso8859_1).unwrap();
        assert_eq!(bits_to_string(&bits), "011000010110001001100011");
    }

    #[test]
    fn test_append_length_info() {
        let mut bits = BitBuffer::new();
        append_length_info(1, Version::new(1), Mode::Numeric, &mut bits).unwrap();
        assert_eq!(bits.len(), 10);
        let mut bits = BitBuffer::new();
        append_length_info(255, Version::new(1), Mode::Byte, &mut bits).unwrap();
        assert_eq!(bits_to_string(&bits), "11111111");
        let mut bits = BitBuffer::new();
        assert_eq!(
            append_length_info(256, Version::new(1), Mode::Byte, &mut bits),
            Err(QRError::DataTooBig)
        );
    }

    #[test]
    fn test_terminate_bits() {
        let mut bits = BitBuffer::new();
        terminate_bits(1, &mut bits).unwrap();
        assert_eq!(bits_to_string(&bits), "00000000");

        let mut bits = BitBuffer::new();
        bits.append_bits(0u8, 3).unwrap();
        terminate_bits(3, &mut bits).unwrap();
        assert_eq!(bits_to_string(&bits), "000000001110110000010001");

        let mut bits = BitBuffer::new();
        bits.append_bits(0u8, 5).unwrap();
        terminate_bits(2, &mut bits).unwrap();
        assert_eq!(bits_to_string(&bits), "0000000000000000");
    }

    #[test]
    fn test_terminate_bits_stops_terminator_at_capacity() {
        let mut bits = BitBuffer::new();
        for _ in 0..7 {
            bits.append_bit(true);
        }
        terminate_bits(1, &mut bits).unwrap();
        assert_eq!(bits_to_string(&bits), "11111110");
    }

    #[test]
    fn test_terminate_bits_overflow() {
        let mut bits = BitBuffer::new();
        bits.append_bits(0u16, 9).unwrap();
        assert_eq!(terminate_bits(1, &mut bits), Err(QRError::DataTooBig));
    }

    #[test]
    fn test_padding_alternates() {
        let mut bits = BitBuffer::new();
        bits.append_bits(0xFFu8, 8).unwrap();
        terminate_bits(6, &mut bits).unwrap();
        assert_eq!(bits.to_bytes(0, 6), vec![0xFF, 0x00, 0xEC, 0x11, 0xEC, 0x11]);
    }

    // Worked example from version 7-H: 196 codewords, 66 data, 5 blocks
    #[test]
    fn test_num_data_and_ec_bytes_for_block() {
        assert_eq!(num_data_and_ec_bytes_for_block(26, 9, 1, 0).unwrap(), (9, 17));
        assert_eq!(num_data_and_ec_bytes_for_block(70, 26, 2, 0).unwrap(), (13, 22));
        assert_eq!(num_data_and_ec_bytes_for_block(196, 66, 5, 0).unwrap(), (13, 26));
        assert_eq!(num_data_and_ec_bytes_for_block(196, 66, 5, 4).unwrap(), (14, 26));
        assert!(num_data_and_ec_bytes_for_block(196, 66, 5, 5).is_err());
    }

    #[test]
    fn test_block_split_consistent_for_all_versions() {
        for v in 1..=40u8 {
            let version = Version::new(v);
            for ecl in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
                let total = version.total_codewords();
                let data = version.data_codewords(ecl);
                let num_blocks = version.ec_blocks(ecl).num_blocks;
                let mut data_sum = 0;
                let mut ec_sum = 0;
                for block_id in 0..num_blocks {
                    let (d, e) =
                        num_data_and_ec_bytes_for_block(total, data, num_blocks, block_id).unwrap();
                    data_sum += d;
                    ec_sum += e;
                }
                assert_eq!(data_sum, data, "version {v}, level {ecl:?}");
                assert_eq!(data_sum + ec_sum, total, "version {v}, level {ecl:?}");
            }
        }
    }

    #[test]
    fn test_interleave_single_block() {
        let data = b" [\x0bx\xd1r\xdcMC@\xec\x11\xec";
        let mut bits = BitBuffer::new();
        for &byte in data {
            bits.append_bits(byte, 8).unwrap();
        }
        let final_bits = interleave_with_ec_bytes(&bits, 26, 13, 1).unwrap();
        let mut exp = data.to_vec();
        exp.extend_from_slice(b"\xa8H\x16R\xd96\x9c\x00.\x0f\xb4z\x10");
        assert_eq!(final_bits.to_bytes(0, 26), exp);
    }

    #[test]
    fn test_interleave_multi_block() {
        // Version 5-Q: 134 codewords, 62 data split 15+15+16+16, 18 EC each
        let data = b"CUF\x86W&U\xc2w2\x06\x12\x06g&\xf6\xf6B\x07v\x86\xf2\x07&V\x16\xc6\xc7\x92\x06\
                     \xb6\xe6\xf7w2\x07v\x86W&R\x06\x86\x972\x07F\xf7vV\xc2\x06\x972\x10\xec\x11\xec\
                     \x11\xec\x11\xec";
        let mut bits = BitBuffer::new();
        for &byte in data.iter() {
            bits.append_bits(byte, 8).unwrap();
        }
        let final_bits = interleave_with_ec_bytes(&bits, 134, 62, 4).unwrap();
        let out = final_bits.to_bytes(0, 134);
        // Data section interleaves block heads first
        assert_eq!(out[0], data[0]);
        assert_eq!(out[1], data[15]);
        assert_eq!(out[2], data[30]);
        assert_eq!(out[3], data[46]);
        assert_eq!(out[4], data[1]);
        // The two longer blocks finish the data section alone
        assert_eq!(out[60], data[45]);
        assert_eq!(out[61], data[61]);
        // EC section starts with the first EC byte of every block
        assert_eq!(out[62], 0xD5);
        assert_eq!(out[63], 0x57);
        assert_eq!(out[64], 0x94);
        assert_eq!(out[65], 0xEB);
        assert_eq!(out[133], 0xEC);
    }

    #[test]
    fn test_interleave_size_mismatch() {
        let mut bits = BitBuffer::new();
        bits.append_bits(0u8, 8).unwrap();
        assert!(matches!(
            interleave_with_ec_bytes(&bits, 26, 13, 1),
            Err(QRError::InternalConsistency(_))
        ));
    }

    #[test]
    fn test_recommend_version_smallest_fit() {
        let mut header_bits = BitBuffer::new();
        append_mode_info(Mode::Byte, &mut header_bits).unwrap();
        let mut data_bits = BitBuffer::new();
        append_8bit_bytes(&"a".repeat(20), &mut data_bits, CharacterSet::Iso8859_1).unwrap();
        let version =
            recommend_version(ECLevel::L, Mode::Byte, &header_bits, &data_bits).unwrap();
        assert_eq!(version, Version::new(2));
    }

    // The byte mode length field widens from 8 to 16 bits at version 10
    #[test_case(230, 9)]
    #[test_case(231, 10)]
    fn test_recommend_version_tier_boundary(len: usize, exp_version: u8) {
        let mut header_bits = BitBuffer::new();
        append_mode_info(Mode::Byte, &mut header_bits).unwrap();
        let mut data_bits = BitBuffer::new();
        append_8bit_bytes(&"a".repeat(len), &mut data_bits, CharacterSet::Iso8859_1).unwrap();
        let version =
            recommend_version(ECLevel::L, Mode::Byte, &header_bits, &data_bits).unwrap();
        assert_eq!(version, Version::new(exp_version));
    }

    #[test]
    fn test_recommend_version_too_big() {
        let mut header_bits = BitBuffer::new();
        append_mode_info(Mode::Byte, &mut header_bits).unwrap();
        let mut data_bits = BitBuffer::new();
        append_8bit_bytes(&"a".repeat(2953), &mut data_bits, CharacterSet::Iso8859_1).unwrap();
        assert_eq!(
            recommend_version(ECLevel::L, Mode::Byte, &header_bits, &data_bits),
            Err(QRError::DataTooBig)
        );
    }

    // The published worked example: mode, version, terminated stream and
    // interleaved codewords for "HELLO WORLD" at level Q
    #[test]
    fn test_reference_stream_hello_world() {
        let content = "HELLO WORLD";
        let ec_level = ECLevel::Q;
        let mode = choose_mode(content);
        assert_eq!(mode, Mode::Alphanumeric);

        let mut header_bits = BitBuffer::new();
        append_mode_info(mode, &mut header_bits).unwrap();
        let mut data_bits = BitBuffer::new();
        append_bytes(content, mode, &mut data_bits, CharacterSet::Iso8859_1).unwrap();
        let version = recommend_version(ec_level, mode, &header_bits, &data_bits).unwrap();
        assert_eq!(version, Version::new(1));

        let mut bits = BitBuffer::new();
        bits.append_buffer(&header_bits);
        append_length_info(content.len(), version, mode, &mut bits).unwrap();
        bits.append_buffer(&data_bits);
        let num_data_bytes = version.data_codewords(ec_level);
        terminate_bits(num_data_bytes, &mut bits).unwrap();
        assert_eq!(bits.to_bytes(0, 13), b" [\x0bx\xd1r\xdcMC@\xec\x11\xec");

        let final_bits = interleave_with_ec_bytes(&bits, 26, 13, 1).unwrap();
        let mut exp = b" [\x0bx\xd1r\xdcMC@\xec\x11\xec".to_vec();
        exp.extend_from_slice(b"\xa8H\x16R\xd96\x9c\x00.\x0f\xb4z\x10");
        assert_eq!(final_bits.to_bytes(0, 26), exp);
    }

    #[test]
    fn test_reference_stream_hello_world_level_m() {
        // Same payload at level M pads to 16 data codewords
        let content = "HELLO WORLD";
        let mode = choose_mode(content);
        let mut bits = BitBuffer::new();
        append_mode_info(mode, &mut bits).unwrap();
        append_length_info(11, Version::new(1), mode, &mut bits).unwrap();
        append_bytes(content, mode, &mut bits, CharacterSet::Iso8859_1).unwrap();
        terminate_bits(16, &mut bits).unwrap();
        assert_eq!(bits.to_bytes(0, 16), b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11");
    }

    #[test]
    fn test_choose_mask_pattern_deterministic() {
        let version = Version::new(1);
        let ec_level = ECLevel::Q;
        let mut bits = BitBuffer::new();
        for _ in 0..version.total_codewords() {
            bits.append_bits(0b01011101u8, 8).unwrap();
        }
        let w = version.width();
        let mut grid = ByteGrid::new(w, w);
        let first = choose_mask_pattern(&bits, ec_level, version, &mut grid).unwrap();
        let second = choose_mask_pattern(&bits, ec_level, version, &mut grid).unwrap();
        assert_eq!(first, second);
    }
}
