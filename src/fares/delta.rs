//! Price change classification and deal alert decisions

use std::fmt;

/// Direction of a leg's price since the previous good reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trend {
    /// Price dropped by the contained amount
    Decreased(f64),
    /// Price rose by the contained amount
    Increased(f64),
    Unchanged,
    /// Delta was NaN or infinite
    Indeterminate,
}

impl Trend {
    /// `delta` is previous minus current, so positive means cheaper
    pub fn classify(delta: f64) -> Self {
        if !delta.is_finite() {
            Trend::Indeterminate
        } else if delta > 0.0 {
            Trend::Decreased(delta.abs())
        } else if delta < 0.0 {
            Trend::Increased(delta.abs())
        } else {
            Trend::Unchanged
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Trend::Decreased(by) => format!("decreased by {}", by),
            Trend::Increased(by) => format!("increased by {}", by),
            Trend::Unchanged => "no change".to_string(),
            Trend::Indeterminate => "unknown".to_string(),
        }
    }

    /// Short tag appended to log lines, e.g. `(down $10)`
    pub fn tag(&self) -> Option<String> {
        match self {
            Trend::Decreased(by) => Some(format!("(down ${})", by)),
            Trend::Increased(by) => Some(format!("(up ${})", by)),
            Trend::Unchanged => Some("(no change)".to_string()),
            Trend::Indeterminate => None,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareDelta {
    pub amount: f64,
    pub trend: Trend,
}

impl FareDelta {
    pub fn between(previous: Option<f64>, current: f64) -> Self {
        let amount = previous.unwrap_or(current) - current;
        Self {
            amount,
            trend: Trend::classify(amount),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareDeltas {
    pub outbound: FareDelta,
    pub inbound: FareDelta,
    pub roundtrip: FareDelta,
}

/// A threshold crossed this cycle. Re-fires every cycle the condition holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DealAlert {
    OneWay {
        outbound: f64,
        inbound: f64,
        threshold: u32,
    },
    Roundtrip {
        total: f64,
        threshold: u32,
    },
}

impl DealAlert {
    pub fn message(&self) -> String {
        match self {
            DealAlert::OneWay { outbound, inbound, .. } => format!(
                "Deal alert! Lowest fare has hit ${} (outbound) and ${} (return)",
                outbound, inbound
            ),
            DealAlert::Roundtrip { total, .. } => {
                format!("Roundtrip deal alert! Lowest fare has hit ${}", total)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    /// Outbound or return delta was non-finite; history and alerts are skipped
    Invalid,
}

/// Everything `evaluate` decides about one summary
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub deltas: FareDeltas,
    pub alerts: Vec<DealAlert>,
    pub validity: Validity,
}

impl Evaluation {
    pub fn is_valid(&self) -> bool {
        self.validity == Validity::Valid
    }
}
