//! Fuzzy green-time extension engine
//!
//! Mamdani-style inference: triangular membership functions, min/max rule
//! evaluation, clipped aggregation and a discrete centroid. The engine only
//! holds its membership definitions, so `extend` is a pure function of its
//! inputs.

use super::config::{Breakpoints, DomainConfig, FuzzyConfig, QueueVariableConfig};

/// Triangular membership function defined by `(left, peak, right)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangularTerm {
    pub left: f32,
    pub peak: f32,
    pub right: f32,
}

impl TriangularTerm {
    pub fn new(left: f32, peak: f32, right: f32) -> Self {
        Self { left, peak, right }
    }

    /// Degree of membership of `x`, in `[0, 1]`.
    ///
    /// A degenerate side (`left == peak` or `peak == right`) is a vertical
    /// edge, so a triangle collapsed to a point is 1 there and 0 elsewhere.
    pub fn membership(&self, x: f32) -> f32 {
        if x < self.left || x > self.right {
            0.0
        } else if x == self.peak {
            1.0
        } else if x < self.peak {
            (x - self.left) / (self.peak - self.left)
        } else {
            (self.right - x) / (self.right - self.peak)
        }
    }
}

impl From<Breakpoints> for TriangularTerm {
    fn from([left, peak, right]: Breakpoints) -> Self {
        Self::new(left, peak, right)
    }
}

/// Closed numeric axis sampled at a fixed step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyDomain {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl FuzzyDomain {
    pub fn clamp(&self, x: f32) -> f32 {
        if x.is_nan() {
            return self.min;
        }
        x.clamp(self.min, self.max)
    }

    /// Sample points `min, min + step, ..., max`
    pub fn points(&self) -> impl Iterator<Item = f32> + '_ {
        let count = ((self.max - self.min) / self.step).round() as usize;
        (0..=count).map(move |i| self.min + i as f32 * self.step)
    }
}

impl From<DomainConfig> for FuzzyDomain {
    fn from(domain: DomainConfig) -> Self {
        Self {
            min: domain.min,
            max: domain.max,
            step: domain.step,
        }
    }
}

/// Degrees of membership of one crisp queue length
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QueueLevels {
    pub few: f32,
    pub small: f32,
    pub medium: f32,
    pub many: f32,
}

#[derive(Debug, Clone, PartialEq)]
struct QueueVariable {
    domain: FuzzyDomain,
    few: TriangularTerm,
    small: TriangularTerm,
    medium: TriangularTerm,
    many: TriangularTerm,
}

impl QueueVariable {
    fn fuzzify(&self, value: f32) -> QueueLevels {
        let x = self.domain.clamp(value);
        QueueLevels {
            few: self.few.membership(x),
            small: self.small.membership(x),
            medium: self.medium.membership(x),
            many: self.many.membership(x),
        }
    }
}

impl From<&QueueVariableConfig> for QueueVariable {
    fn from(config: &QueueVariableConfig) -> Self {
        Self {
            domain: config.domain.into(),
            few: config.few.into(),
            small: config.small.into(),
            medium: config.medium.into(),
            many: config.many.into(),
        }
    }
}

/// Activation level of each output term
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExtensionActivation {
    pub zero: f32,
    pub short: f32,
    pub medium: f32,
    pub long: f32,
}

/// Which rule table an extension decision uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionRound {
    /// First decision of a green phase; "long" is reachable
    First,
    /// Any later decision of the same green phase; "long" is disabled
    Subsequent,
}

impl From<u32> for ExtensionRound {
    fn from(round: u32) -> Self {
        if round == 0 {
            ExtensionRound::First
        } else {
            ExtensionRound::Subsequent
        }
    }
}

/// Converts queue measurements into a crisp green extension in seconds
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyExtensionEngine {
    arriving: QueueVariable,
    waiting: QueueVariable,
    output: FuzzyDomain,
    zero: TriangularTerm,
    short: TriangularTerm,
    medium: TriangularTerm,
    long: TriangularTerm,
}

impl Default for FuzzyExtensionEngine {
    fn default() -> Self {
        Self::new(&FuzzyConfig::default())
    }
}

impl FuzzyExtensionEngine {
    pub fn new(config: &FuzzyConfig) -> Self {
        Self {
            arriving: (&config.arriving).into(),
            waiting: (&config.waiting).into(),
            output: config.extension.domain.into(),
            zero: config.extension.zero.into(),
            short: config.extension.short.into(),
            medium: config.extension.medium.into(),
            long: config.extension.long.into(),
        }
    }

    /// Fuzzify the arriving (green axis) and waiting (red axis) queue lengths
    pub fn fuzzify(&self, arriving: f32, waiting: f32) -> (QueueLevels, QueueLevels) {
        (self.arriving.fuzzify(arriving), self.waiting.fuzzify(waiting))
    }

    /// Evaluate the rule base and fold rule strengths into output activations
    pub fn activate(
        &self,
        a: &QueueLevels,
        w: &QueueLevels,
        round: ExtensionRound,
    ) -> ExtensionActivation {
        let r1 = a.few;
        let r2 = a.small.min(w.few.max(w.small));
        let r3 = a.small.min(w.medium.max(w.many));
        let r4 = a.medium.min(w.few.max(w.small));
        let r5 = a.medium.min(w.medium.max(w.many));
        let r6 = a.many.min(w.few);
        let r7 = a.many.min(w.small.max(w.medium));
        let r8 = a.many.min(w.many);

        match round {
            ExtensionRound::First => ExtensionActivation {
                zero: r1.max(r3),
                short: r2.max(r5).max(r8),
                medium: r4.max(r7),
                long: r6,
            },
            ExtensionRound::Subsequent => ExtensionActivation {
                zero: r1.max(r2).max(r3).max(r5).max(r8),
                short: r4.max(r7),
                medium: r6,
                long: 0.0,
            },
        }
    }

    /// Aggregate output membership at `x`: each term clipped at its
    /// activation, then the pointwise maximum
    pub fn aggregate(&self, activation: &ExtensionActivation, x: f32) -> f32 {
        let zero = self.zero.membership(x).min(activation.zero);
        let short = self.short.membership(x).min(activation.short);
        let medium = self.medium.membership(x).min(activation.medium);
        let long = self.long.membership(x).min(activation.long);
        zero.max(short).max(medium).max(long)
    }

    /// Centroid of the aggregate curve over the sampled output domain.
    /// An all-zero curve yields 0.
    pub fn defuzzify(&self, activation: &ExtensionActivation) -> f32 {
        let mut weighted = 0.0;
        let mut total = 0.0;
        for x in self.output.points() {
            let mu = self.aggregate(activation, x);
            weighted += x * mu;
            total += mu;
        }
        if total <= 0.0 {
            return 0.0;
        }
        self.output.clamp(weighted / total)
    }

    /// Green extension in seconds for the given queue averages
    pub fn extend(&self, arriving: f32, waiting: f32, round: ExtensionRound) -> f32 {
        let (a, w) = self.fuzzify(arriving, waiting);
        let activation = self.activate(&a, &w, round);
        self.defuzzify(&activation)
    }
}
