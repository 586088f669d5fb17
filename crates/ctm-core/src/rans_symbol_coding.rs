#[derive(Debug, Clone, Copy, Default)]
pub struct RAnsSymbol {
    pub prob: u32,
    pub cum_prob: u32,
}

pub const MIN_RANS_PRECISION_BITS: u32 = 12;
pub const MAX_RANS_PRECISION_BITS: u32 = 20;

pub fn compute_rans_unclamped_precision(symbols_bit_length: u32) -> u32 {
    (3 * symbols_bit_length) / 2
}

pub fn compute_rans_precision_from_unique_symbols_bit_length(symbols_bit_length: u32) -> u32 {
    let prec = compute_rans_unclamped_precision(symbols_bit_length);
    prec.clamp(MIN_RANS_PRECISION_BITS, MAX_RANS_PRECISION_BITS)
}

/// Picks the rANS precision for a stream with `num_unique_symbols` distinct
/// symbols. Higher compression levels spend more table bits for finer
/// probabilities.
pub fn rans_precision_for_level(num_unique_symbols: u32, compression_level: u32) -> u32 {
    let mut bit_length = 32 - num_unique_symbols.leading_zeros();
    if compression_level < 4 {
        bit_length = bit_length.saturating_sub(2);
    } else if compression_level < 6 {
        bit_length = bit_length.saturating_sub(1);
    } else if compression_level > 8 {
        bit_length += 3;
    } else if compression_level > 6 {
        bit_length += 2;
    }
    compute_rans_precision_from_unique_symbols_bit_length(bit_length.max(1))
}
