use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Readout formatting and element classification.
pub struct DisplayOptions {
    /// Decimal places of the time readout.
    #[schemars(title = "Time Precision", range(min = 0, max = 8))]
    pub time_precision: usize,
    /// Mantissa decimal places of tooltip values.
    #[schemars(title = "Tooltip Precision", range(min = 0, max = 8))]
    pub tooltip_precision: usize,
    /// Node types treated as compound containers and never animated.
    #[schemars(skip)]
    pub compound_kinds: Vec<String>,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            time_precision: 2,
            tooltip_precision: 2,
            compound_kinds: vec!["community".to_owned(), "compartment".to_owned()],
        }
    }
}

impl DisplayOptions {
    /// Time readout text, e.g. `12.50`.
    #[must_use]
    pub fn time_label(&self, time: f64) -> String {
        format!("{time:.prec$}", prec = self.time_precision)
    }

    /// Tooltip text in exponent notation with an explicit exponent sign,
    /// e.g. `1.23e+4` or `5.00e-3`.
    #[must_use]
    pub fn tooltip_label(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_owned();
        }
        if value.is_infinite() {
            let sign = if value < 0.0 { "-" } else { "" };
            return format!("{sign}Infinity");
        }
        let text = format!("{value:.prec$e}", prec = self.tooltip_precision);
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => {
                format!("{mantissa}e+{exp}")
            }
            _ => text,
        }
    }
}
