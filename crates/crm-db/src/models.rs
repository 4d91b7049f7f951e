use diesel::prelude::*;

pub const PENDING_STATUS: &str = "Pending";

#[derive(Identifiable, Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub job: String,
    pub address: String,
    pub id_number: String,
    pub phone: String,
    pub doy: String,
    pub email: String,
    pub delivery_date: Option<jiff_diesel::Date>,
    pub status: String,
}

/// A customer to insert. A `None` name is left to the column default, so
/// the database rejects it through the NOT NULL constraint.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewCustomer {
    pub name: Option<String>,
    pub job: String,
    pub address: String,
    pub id_number: String,
    pub phone: String,
    pub doy: String,
    pub email: String,
    pub delivery_date: Option<jiff_diesel::Date>,
    pub status: String,
}

/// Replacement values for every writable column of an existing customer.
/// A `None` delivery date clears the stored one.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct CustomerChanges {
    pub name: String,
    pub job: String,
    pub address: String,
    pub id_number: String,
    pub phone: String,
    pub doy: String,
    pub email: String,
    pub delivery_date: Option<jiff_diesel::Date>,
    pub status: String,
}

#[derive(Identifiable, Queryable, Selectable, Associations, Debug)]
#[diesel(table_name = crate::schema::customer_room)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(belongs_to(Customer))]
pub struct Room {
    pub id: i32,
    pub room_name: String,
    pub customer_id: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::customer_room)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRoom {
    pub room_name: Option<String>,
    pub customer_id: i32,
}

#[derive(Queryable, Debug, PartialEq, Eq)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeDeleted {
    pub rooms: usize,
    pub customers: usize,
}
