//! Dimensional analysis types
//!
//! A `Dimension` is an opaque tag for a physical quality. Dimensions are
//! compared by identity: two dimensions created with the same symbol are
//! still different dimensions.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use mensura_core::Power;

static NEXT_DIMENSION_ID: AtomicU64 = AtomicU64::new(0);

/// The predefined dimensions, created together so their ids are stable
/// relative to each other.
static PREDEFINED: LazyLock<[Dimension; 8]> = LazyLock::new(|| {
    [
        Dimension::new(""),
        Dimension::new("T"),
        Dimension::new("L"),
        Dimension::new("M"),
        Dimension::new("I"),
        Dimension::new("N"),
        Dimension::new("J"),
        Dimension::new("Θ"),
    ]
});

pub static DIMENSIONLESS: LazyLock<Dimension> = LazyLock::new(|| PREDEFINED[0].clone());
pub static TIME: LazyLock<Dimension> = LazyLock::new(|| PREDEFINED[1].clone());
pub static LENGTH: LazyLock<Dimension> = LazyLock::new(|| PREDEFINED[2].clone());
pub static MASS: LazyLock<Dimension> = LazyLock::new(|| PREDEFINED[3].clone());
pub static CURRENT: LazyLock<Dimension> = LazyLock::new(|| PREDEFINED[4].clone());
pub static AMOUNT: LazyLock<Dimension> = LazyLock::new(|| PREDEFINED[5].clone());
pub static LUMINOSITY: LazyLock<Dimension> = LazyLock::new(|| PREDEFINED[6].clone());
pub static TEMPERATURE: LazyLock<Dimension> = LazyLock::new(|| PREDEFINED[7].clone());

#[derive(Debug)]
struct DimensionInner {
    id: u64,
    symbol: String,
}

/// A physical dimension, shared by reference
#[derive(Clone)]
pub struct Dimension(Arc<DimensionInner>);

impl Dimension {
    pub fn new(symbol: impl Into<String>) -> Self {
        let id = NEXT_DIMENSION_ID.fetch_add(1, Ordering::Relaxed);
        Dimension(Arc::new(DimensionInner {
            id,
            symbol: symbol.into(),
        }))
    }

    /// Creation sequence number, unique within the process
    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn symbol(&self) -> &str {
        &self.0.symbol
    }

    pub fn is_dimensionless(&self) -> bool {
        *self == *DIMENSIONLESS
    }
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Dimension {}

impl Hash for Dimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl PartialOrd for Dimension {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dimension {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.id.cmp(&other.0.id)
    }
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dimension({}#{})", self.0.symbol, self.0.id)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.symbol)
    }
}

/// Mapping from dimension to exponent, derived from a unit's constituents.
///
/// Base units sharing a dimension are merged; zero exponents are dropped.
/// Informational only: unit compatibility is decided on base units.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DimensionSignature(Vec<(Dimension, Power)>);

impl DimensionSignature {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Dimension, Power)>,
    {
        let mut merged: BTreeMap<Dimension, Power> = BTreeMap::new();
        for (dimension, power) in pairs {
            let slot = merged.entry(dimension).or_insert(Power::ZERO);
            *slot = &*slot + &power;
        }
        DimensionSignature(merged.into_iter().filter(|(_, p)| !p.is_zero()).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Dimension, Power)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exponent of `dimension`, zero when absent
    pub fn power_of(&self, dimension: &Dimension) -> Power {
        self.0
            .iter()
            .find(|(d, _)| d == dimension)
            .map(|(_, p)| p.clone())
            .unwrap_or(Power::ZERO)
    }
}

impl fmt::Display for DimensionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .filter(|(d, _)| !d.symbol().is_empty())
            .map(|(d, p)| {
                if *p == Power::ONE {
                    d.symbol().to_string()
                } else {
                    format!("{}^{}", d.symbol(), p)
                }
            })
            .collect();

        if parts.is_empty() {
            write!(f, "1")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_not_symbol() {
        let a = Dimension::new("X");
        let b = Dimension::new("X");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_predefined_shared() {
        assert_eq!(*TIME, *TIME);
        assert_ne!(*TIME, *LENGTH);
        assert!(DIMENSIONLESS.is_dimensionless());
        assert!(!MASS.is_dimensionless());
        assert!(TIME.id() < LENGTH.id());
    }

    #[test]
    fn test_signature_merges() {
        let sig = DimensionSignature::from_pairs([
            (LENGTH.clone(), Power::from(1)),
            (TIME.clone(), Power::from(-1)),
            (LENGTH.clone(), Power::from(1)),
        ]);
        assert_eq!(sig.power_of(&LENGTH), Power::from(2));
        assert_eq!(sig.power_of(&TIME), Power::from(-1));
        assert_eq!(sig.power_of(&MASS), Power::ZERO);
    }

    #[test]
    fn test_signature_drops_zero() {
        let sig = DimensionSignature::from_pairs([
            (LENGTH.clone(), Power::from(1)),
            (LENGTH.clone(), Power::from(-1)),
        ]);
        assert!(sig.is_empty());
        assert_eq!(sig.to_string(), "1");
    }

    #[test]
    fn test_signature_display() {
        let sig = DimensionSignature::from_pairs([
            (LENGTH.clone(), Power::from(1)),
            (TIME.clone(), Power::from(-2)),
        ]);
        // ordered by dimension id: T before L
        assert_eq!(sig.to_string(), "T^-2 L");
    }
}
