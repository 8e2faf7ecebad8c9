//! Float to 16-bit sample quantization

/// Scale applied to normalized samples (largest positive i16)
pub const QUANT_SCALE: f64 = 32767.0;

const WRAP: f64 = 65536.0;

/// Quantize one normalized sample.
///
/// The product is taken in f64, where `sample * 32767` is exact, and
/// truncated toward zero. There is no clamp: the integer is reduced modulo
/// 2^16 into the signed 16-bit range, the same way a store into a 16-bit
/// typed array behaves. NaN and infinities become 0.
#[inline]
pub fn quantize_sample(sample: f32) -> i16 {
    let scaled = (f64::from(sample) * QUANT_SCALE).trunc();
    if !scaled.is_finite() {
        return 0;
    }
    scaled.rem_euclid(WRAP) as u32 as u16 as i16
}

/// Quantize a whole channel. Output length always equals input length.
pub fn quantize(samples: &[f32]) -> Vec<i16> {
    samples.iter().map(|&s| quantize_sample(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scale_values() {
        assert_eq!(quantize_sample(1.0), 32767);
        assert_eq!(quantize_sample(-1.0), -32767);
        assert_eq!(quantize_sample(0.0), 0);
    }

    #[test]
    fn truncates_toward_zero() {
        // 0.5 * 32767 = 16383.5
        assert_eq!(quantize_sample(0.5), 16383);
        assert_eq!(quantize_sample(-0.5), -16383);
        assert_eq!(quantize_sample(0.00001), 0);
    }

    #[test]
    fn out_of_range_wraps() {
        // 1.5 * 32767 = 49150.5 -> 49150 -> 49150 - 65536
        assert_eq!(quantize_sample(1.5), -16386);
        assert_eq!(quantize_sample(-1.5), 16386);
        // exactly 2.0 -> 65534 -> -2
        assert_eq!(quantize_sample(2.0), -2);
    }

    #[test]
    fn large_values_wrap_modulo_16_bits() {
        // 1e6 * 32767 = 32767000000 = 499984 * 65536 + 48576
        assert_eq!(quantize_sample(1.0e6), -16960);
        // -70000 * 32767 = -2293690000 = -34999 * 65536 + 4464
        assert_eq!(quantize_sample(-70000.0), 4464);
    }

    #[test]
    fn product_is_not_rounded_up_before_truncation() {
        // In f32 this product rounds to 5.0; the exact value is just below it.
        assert_eq!(quantize_sample(0.000_152_592_55), 4);
        assert_eq!(quantize_sample(0.000_396_740_62), 12);
        assert_eq!(quantize_sample(0.000_549_333_17), 17);
    }

    #[test]
    fn non_finite_is_zero() {
        assert_eq!(quantize_sample(f32::NAN), 0);
        assert_eq!(quantize_sample(f32::INFINITY), 0);
        assert_eq!(quantize_sample(f32::NEG_INFINITY), 0);
    }

    #[test]
    fn every_in_range_value_matches_exact_truncation() {
        for i in 0..=200_000u32 {
            let sample = i as f32 / 200_000.0;
            let exact = (f64::from(sample) * 32767.0).trunc() as i16;
            assert_eq!(quantize_sample(sample), exact, "sample {}", sample);
            assert_eq!(quantize_sample(-sample), -exact, "sample {}", -sample);
        }
    }

    #[test]
    fn preserves_length_and_is_deterministic() {
        let samples: Vec<f32> = (0..2000).map(|i| ((i as f32) * 0.013).sin()).collect();
        let first = quantize(&samples);
        let second = quantize(&samples);
        assert_eq!(first.len(), samples.len());
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input() {
        assert!(quantize(&[]).is_empty());
    }
}
