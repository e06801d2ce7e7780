use serde::Serialize;
use std::fmt;

/// A single cell as read from a source table, before any coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Build a cell from raw delimited text; blank fields become `Empty`.
    pub fn from_text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(value) => value.is_nan(),
            CellValue::Text(text) => text.trim().is_empty(),
            CellValue::Bool(_) => false,
        }
    }

    /// Numeric coercion: finite numbers pass, text is parsed after trimming,
    /// everything else is missing.
    pub fn as_coordinate(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(value) => *value,
            CellValue::Text(text) => text.trim().parse::<f64>().ok()?,
            CellValue::Empty | CellValue::Bool(_) => return None,
        };

        value.is_finite().then_some(value)
    }

    /// Stringified form used for identifiers; `None` when the cell is missing.
    pub fn as_label(&self) -> Option<String> {
        if self.is_missing() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            // Spreadsheet integers arrive as floats; show them without a fraction
            CellValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            CellValue::Number(value) => write!(f, "{}", value),
            CellValue::Text(text) => write!(f, "{}", text),
            CellValue::Bool(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(CellValue::Number(3450000.0).as_coordinate(), Some(3450000.0));
        assert_eq!(
            CellValue::Text(" 5801000.5 ".to_string()).as_coordinate(),
            Some(5801000.5)
        );
        assert_eq!(CellValue::Text("N/A".to_string()).as_coordinate(), None);
        assert_eq!(CellValue::Text("nan".to_string()).as_coordinate(), None);
        assert_eq!(CellValue::Number(f64::NAN).as_coordinate(), None);
        assert_eq!(CellValue::Number(f64::INFINITY).as_coordinate(), None);
        assert_eq!(CellValue::Bool(true).as_coordinate(), None);
        assert_eq!(CellValue::Empty.as_coordinate(), None);
    }

    #[test]
    fn test_display_and_labels() {
        assert_eq!(CellValue::Number(1234.0).to_string(), "1234");
        assert_eq!(CellValue::Number(12.5).to_string(), "12.5");
        assert_eq!(
            CellValue::Text("B-17".to_string()).as_label(),
            Some("B-17".to_string())
        );
        assert_eq!(CellValue::from_text("   "), CellValue::Empty);
        assert_eq!(CellValue::Empty.as_label(), None);
    }
}
