use diesel::sql_types::{Date, Nullable, Text};

diesel::define_sql_function! {
    /// PostgreSQL `date_trunc(field, source)` - truncates a date to the given precision (e.g. 'month')
    fn date_trunc(field: Text, source: Nullable<Date>) -> Nullable<diesel::sql_types::Timestamptz>;
}
