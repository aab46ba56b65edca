//! Fuzzy membership model.
//!
//! Maps a scalar reading onto graded linguistic categories.  Each
//! dimension has exactly five categories, so a [`MembershipSet`] is an
//! enum-indexed array rather than a string-keyed map.
//!
//! ```text
//!  degree
//!   1.0 ┤      /\            ____________
//!       │     /  \          /            \
//!   0.0 ┼────/────\────────/──────────────\────▶ x
//!           a  b   c      a  b          c  d
//!           triangular       trapezoidal
//! ```
//!
//! Curves may overlap, so the degrees of one set need not sum to 1.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Number of categories in every dimension.
pub const CATEGORY_COUNT: usize = 5;

/// Degrees at or below this value are dropped from the reasoning record.
pub const SIGNIFICANT_DEGREE: f64 = 0.1;

// ───────────────────────────────────────────────────────────────
// Shape functions
// ───────────────────────────────────────────────────────────────

/// Triangular membership: 0 outside `(a, c)`, peak 1 at `b`.
///
/// A degenerate side (`a == b` or `b == c`) yields 0 on that side.
pub fn triangular(x: f64, a: f64, b: f64, c: f64) -> f64 {
    let degree = if x <= a || x >= c {
        0.0
    } else if x <= b {
        if b == a { 0.0 } else { (x - a) / (b - a) }
    } else if c == b {
        0.0
    } else {
        (c - x) / (c - b)
    };
    degree.clamp(0.0, 1.0)
}

/// Trapezoidal membership: 0 outside `(a, d)`, plateau 1 on `(b, c]`.
pub fn trapezoidal(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    let degree = if x <= a || x >= d {
        0.0
    } else if x <= b {
        if b == a { 0.0 } else { (x - a) / (b - a) }
    } else if x <= c {
        1.0
    } else if d == c {
        0.0
    } else {
        (d - x) / (d - c)
    };
    degree.clamp(0.0, 1.0)
}

/// A piecewise-linear membership curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Triangular { a: f64, b: f64, c: f64 },
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
}

impl Curve {
    /// Degree of membership of `x` in this curve.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Self::Triangular { a, b, c } => triangular(x, a, b, c),
            Self::Trapezoidal { a, b, c, d } => trapezoidal(x, a, b, c, d),
        }
    }

    /// Open support interval; the degree is 0 outside it.
    pub fn support(&self) -> (f64, f64) {
        match *self {
            Self::Triangular { a, c, .. } => (a, c),
            Self::Trapezoidal { a, d, .. } => (a, d),
        }
    }
}

const fn tri(a: f64, b: f64, c: f64) -> Curve {
    Curve::Triangular { a, b, c }
}

const fn trap(a: f64, b: f64, c: f64, d: f64) -> Curve {
    Curve::Trapezoidal { a, b, c, d }
}

// ───────────────────────────────────────────────────────────────
// Categories
// ───────────────────────────────────────────────────────────────

/// A closed set of linguistic categories for one dimension.
///
/// `ALL` is the declaration order; it decides dominant-category ties.
pub trait Category: Copy + Eq + core::fmt::Debug + 'static {
    const ALL: [Self; CATEGORY_COUNT];

    /// Position in [`Category::ALL`].
    fn index(self) -> usize;

    /// Wire name (snake_case).
    fn name(self) -> &'static str;

    /// Fixed risk weight: 0 = no risk, 1 = maximum risk.
    fn risk_weight(self) -> f64;
}

macro_rules! category_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $wire:literal, $weight:expr;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)*
        }

        impl Category for $name {
            const ALL: [Self; CATEGORY_COUNT] = [$(Self::$variant,)*];

            fn index(self) -> usize {
                self as usize
            }

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)*
                }
            }

            fn risk_weight(self) -> f64 {
                match self {
                    $(Self::$variant => $weight,)*
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

category_enum! {
    /// Temperature bands (°C).
    TemperatureBand {
        VeryCold => "very_cold", 0.9;
        Cold => "cold", 0.7;
        Comfortable => "comfortable", 0.0;
        Warm => "warm", 0.6;
        VeryHot => "very_hot", 1.0;
    }
}

category_enum! {
    /// Relative humidity bands (%).
    HumidityBand {
        VeryDry => "very_dry", 0.8;
        Dry => "dry", 0.6;
        Comfortable => "comfortable", 0.0;
        Humid => "humid", 0.6;
        VeryHumid => "very_humid", 0.9;
    }
}

category_enum! {
    /// Animal state inferred from presence and movement signal energy.
    PetState {
        NoDetection => "no_detection", 0.9;
        EmptyCage => "empty_cage", 0.3;
        PetSleeping => "pet_sleeping", 0.0;
        PetActive => "pet_active", 0.0;
        PetRestless => "pet_restless", 0.8;
    }
}

/// Temperature curves, indexed like [`TemperatureBand::ALL`].
pub const TEMPERATURE_CURVES: [Curve; CATEGORY_COUNT] = [
    tri(-10.0, 0.0, 10.0),
    tri(5.0, 10.0, 18.0),
    trap(18.0, 22.0, 28.0, 32.0),
    tri(28.0, 32.0, 35.0),
    tri(32.0, 38.0, 45.0),
];

/// Humidity curves, indexed like [`HumidityBand::ALL`].
pub const HUMIDITY_CURVES: [Curve; CATEGORY_COUNT] = [
    tri(0.0, 20.0, 40.0),
    tri(30.0, 45.0, 55.0),
    trap(50.0, 55.0, 75.0, 80.0),
    tri(75.0, 82.0, 90.0),
    tri(85.0, 92.0, 100.0),
];

// ───────────────────────────────────────────────────────────────
// MembershipSet
// ───────────────────────────────────────────────────────────────

/// Degree of membership for every category of one dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MembershipSet<C: Category> {
    degrees: [f64; CATEGORY_COUNT],
    _category: core::marker::PhantomData<C>,
}

impl<C: Category> MembershipSet<C> {
    /// Build from degrees listed in declaration order.
    pub fn from_degrees(degrees: [f64; CATEGORY_COUNT]) -> Self {
        Self {
            degrees,
            _category: core::marker::PhantomData,
        }
    }

    fn from_curves(x: f64, curves: &[Curve; CATEGORY_COUNT]) -> Self {
        Self::from_degrees((*curves).map(|curve| curve.degree(x)))
    }

    pub fn degree(&self, category: C) -> f64 {
        self.degrees[category.index()]
    }

    /// `(category, degree)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (C, f64)> + '_ {
        C::ALL.into_iter().map(|c| (c, self.degrees[c.index()]))
    }

    /// Category with the highest degree.  The first declared wins a tie.
    pub fn dominant(&self) -> (C, f64) {
        let mut best = (C::ALL[0], self.degrees[0]);
        for (category, degree) in self.iter().skip(1) {
            if degree > best.1 {
                best = (category, degree);
            }
        }
        best
    }

    /// Entries above [`SIGNIFICANT_DEGREE`], rounded to 3 decimals.
    pub fn significant(&self) -> SignificantDegrees<C> {
        let mut entries = heapless::Vec::new();
        for (category, degree) in self.iter() {
            if degree > SIGNIFICANT_DEGREE {
                // Capacity equals CATEGORY_COUNT, push cannot fail.
                let _ = entries.push((category, round3(degree)));
            }
        }
        SignificantDegrees { entries }
    }
}

/// Filtered membership view kept in a decision's reasoning record.
///
/// Serialises as a `{ "category": degree }` map in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct SignificantDegrees<C: Category> {
    entries: heapless::Vec<(C, f64), CATEGORY_COUNT>,
}

impl<C: Category> SignificantDegrees<C> {
    pub fn get(&self, category: C) -> Option<f64> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, d)| *d)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(C, f64)> {
        self.entries.iter()
    }
}

impl<C: Category> Serialize for SignificantDegrees<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, degree) in &self.entries {
            map.serialize_entry(category.name(), degree)?;
        }
        map.end()
    }
}

/// Round to 3 decimal places (reasoning and wire output precision).
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

// ───────────────────────────────────────────────────────────────
// Per-dimension classification
// ───────────────────────────────────────────────────────────────

/// Classify a temperature (°C).
pub fn temperature(celsius: f64) -> MembershipSet<TemperatureBand> {
    MembershipSet::from_curves(celsius, &TEMPERATURE_CURVES)
}

/// Classify a relative humidity (%).
pub fn humidity(percent: f64) -> MembershipSet<HumidityBand> {
    MembershipSet::from_curves(percent, &HUMIDITY_CURVES)
}

/// Classify the animal state from presence and movement signal energy (0–100).
///
/// Signals above 100 saturate at 1.0 after normalisation.
pub fn pet_state(presence_signal: u32, movement_signal: u32) -> MembershipSet<PetState> {
    let p = normalise_signal(presence_signal);
    let m = normalise_signal(movement_signal);
    let present = presence_signal > 0;

    let no_detection = if present { 0.0 } else { 1.0 };
    let empty_cage = if present { p * (1.0 - m) } else { 0.0 };
    let pet_sleeping = p * (1.0 - m) * 0.8;
    let pet_active = p * m;
    let pet_restless = if p > 0.8 && m > 0.8 { p * m } else { 0.0 };

    MembershipSet::from_degrees(
        [no_detection, empty_cage, pet_sleeping, pet_active, pet_restless]
            .map(|d: f64| d.clamp(0.0, 1.0)),
    )
}

fn normalise_signal(signal: u32) -> f64 {
    (f64::from(signal) / 100.0).clamp(0.0, 1.0)
}
