use crate::ans::AnsDecoder;
use crate::decoder_buffer::DecoderBuffer;
use crate::rans_symbol_coding::RAnsSymbol;
use crate::status::{CtmError, Status};

pub struct RAnsSymbolDecoder<'a, const RANS_PRECISION_BITS: u32> {
    ans: Option<AnsDecoder<'a>>,
    probability_table: Vec<RAnsSymbol>,
    lut: Vec<u32>,
}

impl<'a, const RANS_PRECISION_BITS: u32> Default for RAnsSymbolDecoder<'a, RANS_PRECISION_BITS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const RANS_PRECISION_BITS: u32> RAnsSymbolDecoder<'a, RANS_PRECISION_BITS> {
    const RANS_PRECISION: u32 = 1 << RANS_PRECISION_BITS;
    const L_RANS_BASE: u32 = Self::RANS_PRECISION * 4;

    pub fn new() -> Self {
        Self {
            ans: None,
            probability_table: Vec::new(),
            lut: Vec::new(),
        }
    }

    pub fn num_symbols(&self) -> usize {
        self.probability_table.len()
    }

    /// Reads the probability table written by the encoder's `create`.
    pub fn create(&mut self, buffer: &mut DecoderBuffer) -> Status {
        let num_symbols = buffer.decode_varint()?;
        if num_symbols == 0 || num_symbols > Self::RANS_PRECISION as u64 {
            return Err(malformed(format!("bad symbol count {}", num_symbols)));
        }
        let num_symbols = num_symbols as usize;
        self.probability_table = vec![RAnsSymbol::default(); num_symbols];

        let mut i = 0;
        while i < num_symbols {
            let b = buffer.decode_u8()?;
            let mode = b & 3;
            if mode == 3 {
                // Run of zero-probability symbols.
                let offset = (b >> 2) as usize;
                if i + offset >= num_symbols {
                    return Err(malformed("zero run past the end of the table"));
                }
                i += offset;
            } else {
                let mut prob = (b >> 2) as u32;
                for b_idx in 0..mode as usize {
                    let extra = buffer.decode_u8()?;
                    prob |= (extra as u32) << (8 * (b_idx + 1) - 2);
                }
                self.probability_table[i].prob = prob;
            }
            i += 1;
        }

        self.lut = vec![0; Self::RANS_PRECISION as usize];
        let mut cum_prob: u32 = 0;
        for (i, entry) in self.probability_table.iter_mut().enumerate() {
            entry.cum_prob = cum_prob;
            let end = cum_prob.saturating_add(entry.prob);
            if end > Self::RANS_PRECISION {
                return Err(malformed("probabilities exceed the rANS precision"));
            }
            for slot in &mut self.lut[cum_prob as usize..end as usize] {
                *slot = i as u32;
            }
            cum_prob = end;
        }
        if cum_prob != Self::RANS_PRECISION {
            return Err(malformed("probabilities do not sum to the rANS precision"));
        }
        Ok(())
    }

    /// Reads `varint size` + coded data and positions the coder at its end.
    pub fn start_decoding(&mut self, buffer: &mut DecoderBuffer<'a>) -> Status {
        let bytes_to_read = buffer.decode_varint()?;
        if bytes_to_read > buffer.remaining_size() as u64 {
            return Err(malformed("coded data is longer than the block"));
        }
        let data = buffer.decode_slice(bytes_to_read as usize)?;
        self.ans = Some(AnsDecoder::read_init(data, Self::L_RANS_BASE)?);
        Ok(())
    }

    pub fn decode_symbol(&mut self) -> u32 {
        let Some(ans) = self.ans.as_mut() else {
            return 0;
        };
        ans.read_normalize();
        let quo = ans.state / Self::RANS_PRECISION;
        let rem = ans.state % Self::RANS_PRECISION;
        let symbol_id = self.lut[rem as usize];

        let sym = &self.probability_table[symbol_id as usize];
        ans.state = quo * sym.prob + rem - sym.cum_prob;
        symbol_id
    }
}

fn malformed(msg: impl Into<String>) -> CtmError {
    CtmError::LzmaError(msg.into())
}
