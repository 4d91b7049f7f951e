use diesel::prelude::*;
use diesel_async::{
    pooled_connection::{
        mobc::{Builder, Pool},
        AsyncDieselConnectionManager,
    },
    scoped_futures::ScopedFutureExt,
    AsyncConnection, AsyncPgConnection, RunQueryDsl, SimpleAsyncConnection,
};
use std::time::Duration;

pub mod models;
mod schema;
mod sql_functions;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("getting connection from pool: {0}")]
    GetConnectionPool(#[from] mobc::Error<diesel_async::pooled_connection::PoolError>),
    #[error("result failure: {0}")]
    Result(#[from] diesel::result::Error),
    #[error("deleting customer rooms: {0}")]
    DeleteRooms(#[source] diesel::result::Error),
    #[error("deleting customer: {0}")]
    DeleteCustomer(#[source] diesel::result::Error),
    #[error("Not Found")]
    NotFound,
}

#[derive(Clone, Debug)]
pub struct Store {
    pool: Pool<AsyncPgConnection>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub db_url: String,
    pub max_open: u64,
    pub max_idle: u64,
    #[serde(with = "humantime_serde", default)]
    pub max_lifetime: Option<Duration>,
    #[serde(with = "humantime_serde", default)]
    pub max_idle_lifetime: Option<Duration>,
    #[serde(with = "humantime_serde")]
    pub timeout_for_get: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_url: String::new(),
            max_open: 10,
            max_idle: 2,
            max_lifetime: None,
            max_idle_lifetime: None,
            timeout_for_get: Duration::from_secs(5),
        }
    }
}

/// Builds the store. Connections are opened lazily on first use, so an
/// unreachable database only shows up once a query runs.
pub fn create(config: &Config) -> Store {
    Store {
        pool: create_pool(config),
    }
}

fn create_pool(config: &Config) -> mobc::Pool<AsyncDieselConnectionManager<AsyncPgConnection>> {
    let builder = Builder::new()
        .max_open(config.max_open)
        .max_idle(config.max_idle)
        .max_lifetime(
            config
                .max_lifetime
                .map(|v| v.max(Duration::from_secs(3600))),
        )
        .max_idle_lifetime(
            config
                .max_idle_lifetime
                .map(|v| v.max(Duration::from_secs(900))),
        )
        .get_timeout(Some(config.timeout_for_get.max(Duration::from_secs(1))));
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.db_url);
    builder.build(manager)
}

impl Store {
    async fn connection(
        &self,
    ) -> Result<mobc::Connection<AsyncDieselConnectionManager<AsyncPgConnection>>, Error> {
        self.pool.get().await.map_err(Into::into)
    }

    #[tracing::instrument(skip(self))]
    pub async fn check_connection(&self) -> Result<(), Error> {
        let mut conn = self.connection().await?;
        conn.batch_execute("SELECT 1").await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<models::Customer>, Error> {
        use schema::customers::dsl::*;
        let mut conn = self.connection().await?;
        let all_customers = customers
            .select(models::Customer::as_select())
            .load(&mut conn)
            .await?;
        Ok(all_customers)
    }

    #[tracing::instrument(skip(self))]
    pub async fn load_customer_by_id(
        &self,
        customer_id: i32,
    ) -> Result<Option<models::Customer>, Error> {
        use schema::customers::dsl::*;
        let mut conn = self.connection().await?;
        match customers
            .find(customer_id)
            .select(models::Customer::as_select())
            .first(&mut conn)
            .await
        {
            Ok(loaded_customer) => Ok(Some(loaded_customer)),
            Err(diesel::result::Error::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_customer(
        &self,
        new_customer: models::NewCustomer,
    ) -> Result<models::Customer, Error> {
        use schema::customers;
        let mut conn = self.connection().await?;
        let created_customer = diesel::insert_into(customers::table)
            .values(&new_customer)
            .returning(models::Customer::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(created_customer)
    }

    /// Overwrites every column of the customer. Fails with [`Error::NotFound`]
    /// when no row has the given id.
    #[tracing::instrument(skip(self))]
    pub async fn update_customer(
        &self,
        customer_id: i32,
        changes: models::CustomerChanges,
    ) -> Result<(), Error> {
        use schema::customers;
        let mut conn = self.connection().await?;
        match diesel::update(customers::table.find(customer_id))
            .set(&changes)
            .execute(&mut conn)
            .await
        {
            Ok(0) => Err(Error::NotFound),
            Ok(_) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Removes the customer's rooms and then the customer in one transaction.
    /// A missing customer is not an error; both counts are simply zero.
    #[tracing::instrument(skip(self))]
    pub async fn delete_customer_with_rooms(
        &self,
        customer_id: i32,
    ) -> Result<models::CascadeDeleted, Error> {
        self.connection()
            .await?
            .transaction(move |conn| {
                use schema::{customer_room, customers};
                async move {
                    let deleted_rooms = diesel::delete(
                        customer_room::table.filter(customer_room::customer_id.eq(customer_id)),
                    )
                    .execute(conn)
                    .await
                    .map_err(Error::DeleteRooms)?;
                    let deleted_customers = diesel::delete(customers::table.find(customer_id))
                        .execute(conn)
                        .await
                        .map_err(Error::DeleteCustomer)?;
                    Ok::<_, Error>(models::CascadeDeleted {
                        rooms: deleted_rooms,
                        customers: deleted_customers,
                    })
                }
                .scope_boxed()
            })
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_rooms_for_customer(
        &self,
        owner_id: i32,
    ) -> Result<Vec<models::Room>, Error> {
        use schema::customer_room::dsl::*;
        let mut conn = self.connection().await?;
        let rooms = customer_room
            .filter(customer_id.eq(owner_id))
            .select(models::Room::as_select())
            .load(&mut conn)
            .await?;
        Ok(rooms)
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_room(&self, new_room: models::NewRoom) -> Result<models::Room, Error> {
        use schema::customer_room;
        let mut conn = self.connection().await?;
        let room = diesel::insert_into(customer_room::table)
            .values(&new_room)
            .returning(models::Room::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(room)
    }

    /// Counts customers per status whose delivery date falls in the database's
    /// current calendar month. Statuses without any such customer are absent.
    #[tracing::instrument(skip(self))]
    pub async fn count_statuses_for_current_month(
        &self,
    ) -> Result<Vec<models::StatusCount>, Error> {
        use diesel::dsl::{count_star, sql};
        use diesel::sql_types::{Date, Nullable};
        use schema::customers::dsl::*;
        use sql_functions::date_trunc;
        let current_date = sql::<Nullable<Date>>("CURRENT_DATE");
        let mut conn = self.connection().await?;
        let counts = customers
            .filter(date_trunc("month", delivery_date).eq(date_trunc("month", current_date)))
            .group_by(status)
            .select((status, count_star()))
            .load::<models::StatusCount>(&mut conn)
            .await?;
        Ok(counts)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_pending_customers(&self) -> Result<Vec<models::Customer>, Error> {
        use schema::customers::dsl::*;
        let mut conn = self.connection().await?;
        let pending = customers
            .filter(status.eq(models::PENDING_STATUS))
            .order(delivery_date.asc())
            .select(models::Customer::as_select())
            .load(&mut conn)
            .await?;
        Ok(pending)
    }
}
