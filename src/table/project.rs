use super::{RawTable, Record};

/// Header plus the records built from every non-blank data row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub header: Vec<String>,
    pub records: Vec<Record>,
}

/// Project a raw grid into records keyed by its first row.
///
///  - header cells are trimmed
///  - rows whose every cell trims to empty are dropped
///  - short rows pad with `""`, cells past the header width are discarded
///
/// Never fails: an empty grid gives an empty header and no records.
pub fn project(table: &RawTable) -> Projection {
    let header: Vec<String> = match table.first() {
        Some(row) => row.iter().map(|c| c.trim().to_string()).collect(),
        None => return Projection::default(),
    };

    let records = table
        .iter()
        .skip(1)
        .filter(|row| !is_blank(row))
        .map(|row| {
            let mut rec = Record::with_capacity(header.len());
            for (i, name) in header.iter().enumerate() {
                let cell = row.get(i).map(|c| c.trim()).unwrap_or("");
                rec.insert(name, cell.to_string());
            }
            rec
        })
        .collect();

    Projection { header, records }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}
