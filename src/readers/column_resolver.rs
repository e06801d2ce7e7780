use crate::error::{ProcessingError, Result};

/// Zero-based index of a spreadsheet column letter (`A` → 0 … `Z` → 25).
pub fn column_letter_index(reference: &str) -> Result<usize> {
    let mut chars = reference.chars();

    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_uppercase() => {
            Ok((letter as u8 - b'A') as usize)
        }
        _ => Err(ProcessingError::InvalidColumnReference(reference.to_string())),
    }
}

/// Spreadsheet letter for a zero-based index, as shown by `inspect`.
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = index + 1;

    while remaining > 0 {
        let rem = (remaining - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        remaining = (remaining - 1) / 26;
    }

    letters.iter().rev().collect()
}

/// Resolve a column reference against the table headers.
///
/// An exact header match wins; otherwise the reference must be a single
/// uppercase letter addressing a column that exists.
pub fn resolve_column(headers: &[String], reference: &str) -> Result<usize> {
    if let Some(index) = headers.iter().position(|header| header == reference) {
        return Ok(index);
    }

    let index = column_letter_index(reference)?;
    if index >= headers.len() {
        return Err(ProcessingError::ColumnOutOfRange {
            reference: reference.to_string(),
            index,
            column_count: headers.len(),
        });
    }

    Ok(index)
}
