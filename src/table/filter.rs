use super::Record;

/// Keep records whose `field` equals `value`, ignoring case and
/// surrounding whitespace. An empty `value` keeps everything; a
/// whitespace-only one is a real filter matching blank cells.
/// Records without `field` compare as `""`.
pub fn filter_by_field(records: Vec<Record>, field: &str, value: &str) -> Vec<Record> {
    if value.is_empty() {
        return records;
    }
    let wanted = value.trim().to_lowercase();

    records
        .into_iter()
        .filter(|rec| rec.get(field).unwrap_or("").trim().to_lowercase() == wanted)
        .collect()
}
