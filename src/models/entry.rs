use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::kv_store)]
/// One persisted key with its serialized value.
pub struct Entry {
    pub key: String,
    pub value: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::kv_store)]
/// Insertable form of [`Entry`].
pub struct NewEntry<'a> {
    pub key: &'a str,
    pub value: &'a str,
}
