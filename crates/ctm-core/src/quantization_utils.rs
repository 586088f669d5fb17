use num_traits::ToPrimitive;

use crate::status::{invalid_argument, StatusResult};

/// Maps floats onto a grid of fixed step, rounding to nearest.
#[derive(Debug, Default, Clone, Copy)]
pub struct Quantizer {
    inverse_step: f32,
}

impl Quantizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails unless `step` is a positive finite number.
    pub fn with_step(step: f32) -> StatusResult<Self> {
        let mut quantizer = Self::new();
        quantizer.init_with_step(step)?;
        Ok(quantizer)
    }

    pub fn init_with_step(&mut self, step: f32) -> StatusResult<()> {
        if !(step > 0.0 && step.is_finite()) {
            return Err(invalid_argument(format!("quantization step {} must be > 0", step)));
        }
        self.inverse_step = 1.0 / step;
        Ok(())
    }

    pub fn inverse_step(&self) -> f32 {
        self.inverse_step
    }

    /// Fails when the quantized value does not fit an `i32`, which happens
    /// when the step is far too small for the magnitude of the data.
    pub fn quantize_float(&self, val: f32) -> StatusResult<i32> {
        let scaled = (val * self.inverse_step + 0.5).floor();
        scaled.to_i32().ok_or_else(|| {
            invalid_argument(format!(
                "value {} overflows the quantization range (step {})",
                val,
                1.0 / self.inverse_step
            ))
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Dequantizer {
    step: f32,
}

impl Dequantizer {
    pub fn with_step(step: f32) -> Self {
        Self { step }
    }

    pub fn dequantize_float(&self, val: i32) -> f32 {
        val as f32 * self.step
    }
}
