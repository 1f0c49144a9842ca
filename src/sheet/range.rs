//! A1-style range addressing.

/// Sheet name of an A1 range (`"Tasks!A1:H40"` → `Some("Tasks")`).
///
/// Quoted names (`'My Sheet'!A:Z`) are returned with the quotes removed.
#[must_use]
pub fn sheet_name(range: &str) -> Option<String> {
    let (name, _) = range.rsplit_once('!')?;
    let name = name
        .strip_prefix('\'')
        .and_then(|n| n.strip_suffix('\''))
        .map_or_else(|| name.to_string(), |n| n.replace("''", "'"));
    Some(name)
}

/// Single-column range covering `rows` data rows below the header,
/// i.e. `<sheet>!<L>2:<L><rows+1>`.
#[must_use]
pub fn column_range(sheet: Option<&str>, letter: &str, rows: usize) -> String {
    let cells = format!("{letter}2:{letter}{}", rows + 1);
    match sheet {
        Some(name) => format!("{}!{cells}", quote_sheet(name)),
        None => cells,
    }
}

fn quote_sheet(name: &str) -> String {
    if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}
