//! Control valve hydraulics from its flow coefficient.

use crate::constants::KV_CONSTANT;

/// Headloss (m) across the valve at flow `q_lps` for flow coefficient `kv_m3h`.
///
/// `dh = q² · 132.15 / Kv²` with q in l/s and Kv in m³/h.
pub fn kv_headloss_m(q_lps: f64, kv_m3h: f64) -> f64 {
    q_lps * q_lps * KV_CONSTANT / (kv_m3h * kv_m3h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_point() {
        let dh = kv_headloss_m(5016.0, 21038.45);
        assert!((dh - 7.51).abs() < 0.05);
    }

    #[test]
    fn zero_flow_no_loss() {
        assert_eq!(kv_headloss_m(0.0, 21038.45), 0.0);
    }
}
