//! Numeric cell values with explicit missing-value handling.

/// Tokens read as a missing value, in addition to the empty field.
pub const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A numeric cell: either a value or missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    Present(f64),
    #[default]
    Missing,
}

impl Value {
    /// Parse a field. Returns `None` if the field is neither a float nor a
    /// missing-value token.
    pub fn parse(field: &str) -> Option<Self> {
        let field = field.trim();
        if is_missing_token(field) {
            return Some(Value::Missing);
        }
        let v: f64 = field.parse().ok()?;
        if v.is_nan() {
            Some(Value::Missing)
        } else {
            Some(Value::Present(v))
        }
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Arithmetic mean of the present values.
    ///
    /// Missing values are skipped. If nothing is present (including an empty
    /// input) the mean is `Missing`.
    pub fn mean<I>(values: I) -> Value
    where
        I: IntoIterator<Item = Value>,
    {
        let mut acc = MeanAccumulator::default();
        for v in values {
            acc.push(v);
        }
        acc.finish()
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        match v {
            Some(x) if !x.is_nan() => Value::Present(x),
            _ => Value::Missing,
        }
    }
}

/// Running mean over a column, skipping missing cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    #[inline]
    pub fn push(&mut self, value: Value) {
        if let Value::Present(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    pub fn finish(&self) -> Value {
        if self.count == 0 {
            Value::Missing
        } else {
            Value::Present(self.sum / self.count as f64)
        }
    }
}

#[inline]
pub fn is_missing_token(field: &str) -> bool {
    field.is_empty() || MISSING_TOKENS.contains(&field)
}
