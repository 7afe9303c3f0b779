// sf-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, Length as UomLength, MassDensity as UomMassDensity,
    Power as UomPower, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type Density = UomMassDensity;
pub type Length = UomLength;
pub type Power = UomPower;
pub type VolumeRate = UomVolumeRate;

/// Liters per second to m³/h.
#[inline]
pub fn lps_to_m3h(q_lps: f64) -> f64 {
    q_lps * 3.6
}

/// m³/h to liters per second.
#[inline]
pub fn m3h_to_lps(q_m3h: f64) -> f64 {
    q_m3h / 3.6
}

/// Volumetric flow from liters per second.
#[inline]
pub fn lps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(v / 1000.0)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn mps2(v: f64) -> Accel {
    use uom::si::acceleration::meter_per_second_squared;
    Accel::new::<meter_per_second_squared>(v)
}

/// Power expressed in kilowatts.
#[inline]
pub fn to_kw(p: Power) -> f64 {
    use uom::si::power::kilowatt;
    p.get::<kilowatt>()
}

/// Hydraulic power `rho * g * Q * H`.
#[inline]
pub fn hydraulic_power(rho: Density, g: Accel, q: VolumeRate, head: Length) -> Power {
    rho * g * q * head
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _q = lps(1254.0);
        let _h = m(26.12);
        let _rho = kg_per_m3(1025.0);
        let _g = mps2(9.81);
    }

    #[test]
    fn flow_conversions() {
        assert!((lps_to_m3h(1000.0) - 3600.0).abs() < 1e-9);
        assert!((m3h_to_lps(3600.0) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn hydraulic_power_in_kw() {
        let p = hydraulic_power(kg_per_m3(1000.0), mps2(10.0), lps(1000.0), m(10.0));
        assert!((to_kw(p) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_flow_is_zero_power() {
        let p = hydraulic_power(kg_per_m3(1025.0), mps2(9.81), lps(0.0), m(26.12));
        assert_eq!(to_kw(p), 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::numeric::{Tolerances, nearly_equal};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn lps_m3h_round_trip(x in -1.0e7_f64..1.0e7_f64) {
            let tol = Tolerances { abs: 1e-9, rel: 1e-12 };
            prop_assert!(nearly_equal(m3h_to_lps(lps_to_m3h(x)), x, tol));
        }
    }
}
