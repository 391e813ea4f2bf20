use crate::model::{Criteria, SchemeRecord, WILDCARD};

/// Return the records matching every criterion, in input order.
///
/// A criterion holds when the record's attribute contains it (case-insensitively) or
/// the attribute is exactly the wildcard marker. An empty criterion therefore
/// matches every record in its column.
pub fn filter_schemes<'a, I>(records: I, criteria: &Criteria) -> Vec<&'a SchemeRecord>
where
    I: IntoIterator<Item = &'a SchemeRecord>,
{
    let needles = criteria.values().map(str::to_lowercase);
    records
        .into_iter()
        .filter(|record| {
            record
                .eligibility_attributes()
                .iter()
                .zip(&needles)
                .all(|(value, needle)| attribute_matches(value, needle))
        })
        .collect()
}

fn attribute_matches(value: &str, lowered_needle: &str) -> bool {
    value == WILDCARD || value.to_lowercase().contains(lowered_needle)
}
