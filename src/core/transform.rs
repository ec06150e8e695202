use crate::core::{MemberRecord, MemberRow};
use serde_json::Value;

fn empty_list() -> Value {
    Value::Array(Vec::new())
}

/// Maps a camelCase input member onto a `members` row.
pub fn to_row(record: &MemberRecord, tree_slug: &str) -> MemberRow {
    MemberRow {
        id: record.field_or("id", Value::Null),
        name: record.field_or("name", Value::from("")),
        gender: record.field_or("gender", Value::from("male")),
        birth_date: record.field_or("birthDate", Value::Null),
        death_date: record.field_or("deathDate", Value::Null),
        is_deceased: record.field_or("isDeceased", Value::Bool(false)),
        place_of_birth: record.field_or("placeOfBirth", Value::Null),
        occupation: record.field_or("occupation", Value::Null),
        education: record.field_or("education", Value::Null),
        address: record.field_or("address", Value::Null),
        phone: record.field_or("phone", Value::Null),
        email: record.field_or("email", Value::Null),
        biography: record.field_or("biography", Value::Null),
        photo: record.field_or("photo", Value::Null),
        children: record.field_or("children", empty_list()),
        parents: record.field_or("parents", empty_list()),
        spouses: record.field_or("spouses", empty_list()),
        tree_slug: tree_slug.to_string(),
    }
}

pub fn to_rows(records: &[MemberRecord], tree_slug: &str) -> Vec<MemberRow> {
    records.iter().map(|r| to_row(r, tree_slug)).collect()
}
