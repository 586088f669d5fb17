use crate::ans::{AnsCoder, ANS_IO_BASE};
use crate::encoder_buffer::EncoderBuffer;
use crate::rans_symbol_coding::RAnsSymbol;
use crate::status::{CtmError, Status};

pub struct RAnsSymbolEncoder<const RANS_PRECISION_BITS: u32> {
    ans: AnsCoder,
    probability_table: Vec<RAnsSymbol>,
    num_symbols: usize,
}

impl<const RANS_PRECISION_BITS: u32> Default for RAnsSymbolEncoder<RANS_PRECISION_BITS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const RANS_PRECISION_BITS: u32> RAnsSymbolEncoder<RANS_PRECISION_BITS> {
    const RANS_PRECISION: u32 = 1 << RANS_PRECISION_BITS;
    const L_RANS_BASE: u32 = Self::RANS_PRECISION * 4;

    pub fn new() -> Self {
        Self {
            ans: AnsCoder::new(Self::L_RANS_BASE),
            probability_table: Vec::new(),
            num_symbols: 0,
        }
    }

    /// Normalizes `frequencies` to the rANS precision and writes the
    /// resulting probability table to `buffer`.
    pub fn create(&mut self, frequencies: &[u64], buffer: &mut EncoderBuffer) -> Status {
        let total_freq: u64 = frequencies.iter().sum();
        if total_freq == 0 {
            return Err(CtmError::LzmaError("cannot build a table for zero symbols".into()));
        }
        let max_valid_symbol = frequencies.iter().rposition(|&f| f > 0).unwrap_or(0);
        let num_symbols = max_valid_symbol + 1;
        if num_symbols as u64 > Self::RANS_PRECISION as u64 {
            return Err(CtmError::LzmaError(format!(
                "{} symbols exceed rANS precision {}",
                num_symbols,
                Self::RANS_PRECISION
            )));
        }
        self.num_symbols = num_symbols;
        self.probability_table = vec![RAnsSymbol::default(); num_symbols];

        let total_freq_d = total_freq as f64;
        let rans_precision_d = Self::RANS_PRECISION as f64;

        let mut total_rans_prob: u32 = 0;
        for (entry, &freq) in self.probability_table.iter_mut().zip(frequencies) {
            let prob = freq as f64 / total_freq_d;
            let mut rans_prob = (prob * rans_precision_d + 0.5) as u32;
            if rans_prob == 0 && freq > 0 {
                rans_prob = 1;
            }
            entry.prob = rans_prob;
            total_rans_prob += rans_prob;
        }

        // Rounding leaves the total slightly off; settle the difference on the
        // most probable symbols, never dropping a used symbol below 1.
        while total_rans_prob != Self::RANS_PRECISION {
            let (max_id, max_prob) = self.most_probable_symbol();
            if total_rans_prob < Self::RANS_PRECISION {
                self.probability_table[max_id].prob += Self::RANS_PRECISION - total_rans_prob;
                total_rans_prob = Self::RANS_PRECISION;
            } else {
                let fix = (total_rans_prob - Self::RANS_PRECISION).min(max_prob.saturating_sub(1));
                if fix == 0 {
                    return Err(CtmError::LzmaError("unable to normalize frequency table".into()));
                }
                self.probability_table[max_id].prob -= fix;
                total_rans_prob -= fix;
            }
        }

        let mut total_prob = 0;
        for entry in self.probability_table.iter_mut() {
            entry.cum_prob = total_prob;
            total_prob += entry.prob;
        }

        self.encode_table(buffer)
    }

    fn most_probable_symbol(&self) -> (usize, u32) {
        let mut best = (0, 0);
        for (i, s) in self.probability_table.iter().enumerate() {
            if s.prob > best.1 {
                best = (i, s.prob);
            }
        }
        best
    }

    fn encode_table(&self, buffer: &mut EncoderBuffer) -> Status {
        buffer.encode_varint(self.num_symbols as u64);

        let mut i = 0;
        while i < self.num_symbols {
            let prob = self.probability_table[i].prob;
            let mut num_extra_bytes = 0;
            if prob >= (1 << 6) {
                num_extra_bytes += 1;
                if prob >= (1 << 14) {
                    num_extra_bytes += 1;
                    if prob >= (1 << 22) {
                        return Err(CtmError::InternalError(format!(
                            "probability {} does not fit the table encoding",
                            prob
                        )));
                    }
                }
            }

            if prob == 0 {
                // Runs of up to 64 unused symbols share one byte.
                let mut offset = 0;
                while offset < (1 << 6) - 1 {
                    if i + offset + 1 >= self.num_symbols {
                        break;
                    }
                    if self.probability_table[i + offset + 1].prob > 0 {
                        break;
                    }
                    offset += 1;
                }
                buffer.encode_u8(((offset as u8) << 2) | 3);
                i += offset;
            } else {
                buffer.encode_u8(((prob as u8) << 2) | (num_extra_bytes & 3));
                for b in 0..num_extra_bytes {
                    buffer.encode_u8((prob >> (8 * (b + 1) - 2)) as u8);
                }
            }
            i += 1;
        }
        Ok(())
    }

    pub fn start_encoding(&mut self) {
        self.ans = AnsCoder::new(Self::L_RANS_BASE);
    }

    pub fn encode_symbol(&mut self, symbol: u32) {
        let sym = self.probability_table[symbol as usize];
        self.rans_write(sym);
    }

    /// Flushes the coder state and appends `varint size` + data to `buffer`.
    pub fn end_encoding(&mut self, buffer: &mut EncoderBuffer) -> Status {
        self.ans.write_end()?;
        let data = self.ans.data();
        buffer.encode_varint(data.len() as u64);
        buffer.encode_data(data);
        Ok(())
    }

    fn rans_write(&mut self, sym: RAnsSymbol) {
        let p = sym.prob;
        while self.ans.state >= Self::L_RANS_BASE / Self::RANS_PRECISION * ANS_IO_BASE * p {
            self.ans.buf.push((self.ans.state % ANS_IO_BASE) as u8);
            self.ans.state /= ANS_IO_BASE;
        }
        self.ans.state =
            (self.ans.state / p) * Self::RANS_PRECISION + (self.ans.state % p) + sym.cum_prob;
    }
}
