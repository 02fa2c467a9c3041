//! Content-based fingerprints of the inputs that produced a result set.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// The inputs of one minimization, in model units (bar, K).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSnapshot<'a> {
    pub model: &'a str,
    pub pressure: f64,
    pub temperature: f64,
    pub composition: &'a [f64],
}

/// Bit patterns of the snapshot values; `-0.0` folds into `0.0` and every NaN
/// into one canonical NaN.
#[derive(Serialize)]
struct CanonicalSnapshot<'a> {
    model: &'a str,
    pressure: u64,
    temperature: u64,
    composition: Vec<u64>,
}

fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

/// SHA-256 of a serialized [`ConfigSnapshot`], lowercase hex.
///
/// Values are hashed by bit pattern, so non-finite inputs stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(snapshot: &ConfigSnapshot<'_>) -> Self {
        let canonical = CanonicalSnapshot {
            model: snapshot.model,
            pressure: canonical_bits(snapshot.pressure),
            temperature: canonical_bits(snapshot.temperature),
            composition: snapshot.composition.iter().copied().map(canonical_bits).collect(),
        };
        let mut hasher = Sha256::new();
        let json = serde_json::to_string(&canonical).unwrap_or_default();
        hasher.update(json.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(composition: &[f64]) -> ConfigSnapshot<'_> {
        ConfigSnapshot {
            model: "simple",
            pressure: 20_000.0,
            temperature: 1500.0,
            composition,
        }
    }

    #[test]
    fn fingerprint_stability() {
        let bulk = [38.5, 2.82, 50.5, 5.88];
        assert_eq!(Fingerprint::of(&snapshot(&bulk)), Fingerprint::of(&snapshot(&bulk)));
        assert_eq!(Fingerprint::of(&snapshot(&bulk)).as_str().len(), 64);
    }

    #[test]
    fn fingerprint_differs_for_different_inputs() {
        let a = [38.5, 2.82, 50.5, 5.88];
        let b = [38.5, 2.82, 50.5, 5.89];
        assert_ne!(Fingerprint::of(&snapshot(&a)), Fingerprint::of(&snapshot(&b)));

        let mut hot = snapshot(&a);
        hot.temperature = 1600.0;
        assert_ne!(Fingerprint::of(&hot), Fingerprint::of(&snapshot(&a)));
    }

    #[test]
    fn non_finite_inputs_are_distinct() {
        let inf = Fingerprint::of(&snapshot(&[f64::INFINITY]));
        let nan = Fingerprint::of(&snapshot(&[f64::NAN]));
        let neg_inf = Fingerprint::of(&snapshot(&[f64::NEG_INFINITY]));
        assert_ne!(inf, nan);
        assert_ne!(inf, neg_inf);
        assert_ne!(nan, neg_inf);
        assert_eq!(nan, Fingerprint::of(&snapshot(&[-f64::NAN])));
    }

    #[test]
    fn signed_zero_is_one_input() {
        assert_eq!(
            Fingerprint::of(&snapshot(&[-0.0, 1.0])),
            Fingerprint::of(&snapshot(&[0.0, 1.0]))
        );
    }
}
