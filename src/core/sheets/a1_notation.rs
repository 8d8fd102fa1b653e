// A1 notation: `B2`, `Sheet1!B2`, `'My Sheet'!C3`.
//
// Only single cells resolve here. Ranges like `A1:D10` go through the values API
// instead, which takes A1 ranges verbatim.

use super::sheets_models::{CellTarget, Sheet, Spreadsheet};
use crate::core::errors::AddressError;

/// Converts column letters to a zero-based index: `A` -> 0, `Z` -> 25, `AA` -> 26.
///
/// Each letter is a digit 1..=26 in bijective base 26, so there is no zero digit
/// and the final subtraction turns the 1-based column number into an index.
pub fn column_to_index(letters: &str) -> Result<u32, AddressError> {
    let invalid = || AddressError::InvalidColumn(letters.to_string());

    if letters.is_empty() {
        return Err(invalid());
    }

    let mut number: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(invalid());
        }
        let digit = (c.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
        number = number
            .checked_mul(26)
            .and_then(|n| n.checked_add(digit))
            .ok_or_else(invalid)?;
    }

    Ok(number - 1)
}

/// Inverse of [`column_to_index`]: 0 -> `A`, 26 -> `AA`.
pub fn index_to_column(index: u32) -> String {
    let mut n = index as u64 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A cell reference split into its column letters and 1-based row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRef {
    pub column: u32,
    pub row: u32,
}

/// Parses `<letters><digits>`; anything else, including ranges, is rejected.
pub fn parse_cell_ref(cell: &str) -> Result<CellRef, AddressError> {
    let cell = cell.trim();
    let not_single = || AddressError::NotSingleCell(cell.to_string());

    let split = cell
        .char_indices()
        .find(|(_, c)| !c.is_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(cell.len());
    let (letters, digits) = cell.split_at(split);

    if letters.is_empty() || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(not_single());
    }

    let column = column_to_index(letters)?;
    let row: u32 = digits
        .parse()
        .map_err(|_| AddressError::InvalidRow(cell.to_string()))?;
    if row == 0 {
        return Err(AddressError::InvalidRow(cell.to_string()));
    }

    Ok(CellRef { column, row })
}

/// Splits `Sheet!A1` into `(Some("Sheet"), "A1")`. Single quotes around the
/// sheet name are stripped and doubled quotes inside them unescaped.
pub fn split_sheet_prefix(address: &str) -> (Option<String>, &str) {
    match address.rsplit_once('!') {
        Some((sheet, cell)) => {
            let sheet = sheet.trim();
            let name = if sheet.len() >= 2 && sheet.starts_with('\'') && sheet.ends_with('\'') {
                sheet[1..sheet.len() - 1].replace("''", "'")
            } else {
                sheet.to_string()
            };
            (Some(name), cell)
        }
        None => (None, address),
    }
}

/// Quotes a sheet title for use in an A1 address.
pub fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Resolves a single-cell address against a spreadsheet's sheet list.
pub fn resolve_cell_target(
    spreadsheet: &Spreadsheet,
    address: &str,
) -> Result<CellTarget, AddressError> {
    let first = spreadsheet.sheets.first().ok_or(AddressError::NoSheets)?;

    let (sheet_name, cell) = split_sheet_prefix(address.trim());
    let sheet: &Sheet = match sheet_name {
        Some(name) => spreadsheet
            .sheets
            .iter()
            .find(|s| s.properties.title == name)
            .ok_or(AddressError::SheetNotFound(name))?,
        None => first,
    };

    let cell_ref = parse_cell_ref(cell)?;
    let row_index = cell_ref.row - 1;

    Ok(CellTarget {
        sheet_id: sheet.properties.sheet_id,
        sheet_title: sheet.properties.title.clone(),
        start_row_index: row_index,
        end_row_index: row_index + 1,
        start_column_index: cell_ref.column,
        end_column_index: cell_ref.column + 1,
        a1: format!(
            "{}!{}{}",
            quote_sheet_title(&sheet.properties.title),
            index_to_column(cell_ref.column),
            cell_ref.row
        ),
    })
}
