//! MongoDB-backed employee store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use tracing::{debug, info, instrument};

use crate::config::{Config, StoreBackend};
use crate::error::StoreError;
use crate::metrics::{self, StoreTimer};

use super::store::{EmployeeStore, StoreOperation};
use super::types::{Employee, EmployeeDocument, EmployeeFields, EmployeeId};

const APP_NAME: &str = "hrms-api";

/// Employee store over a single MongoDB collection.
///
/// The driver client pools connections internally, so one instance is shared
/// by every request.
#[derive(Debug, Clone)]
pub struct MongoEmployeeStore {
    /// Database handle, used for admin commands.
    database: Database,
    /// Typed employee collection.
    collection: Collection<EmployeeDocument>,
}

impl MongoEmployeeStore {
    /// Connect to the store described by `config`.
    ///
    /// The first round-trip is bounded by `connect_timeout_seconds`; a store
    /// that is unreachable within that window yields
    /// [`StoreError::ConnectTimeout`]. Server selection keeps the driver
    /// default so the outer bound is the one that fires.
    #[instrument(skip(config), fields(database = %config.mongodb_database, collection = %config.employees_collection))]
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let timeout = config.connect_timeout();

        let mut options = ClientOptions::parse(config.mongodb_uri.as_str())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        options.app_name = Some(APP_NAME.to_string());
        options.connect_timeout = Some(timeout);

        let client =
            Client::with_options(options).map_err(|e| StoreError::Connection(e.to_string()))?;
        let store = Self::from_client(
            &client,
            &config.mongodb_database,
            &config.employees_collection,
        );

        match tokio::time::timeout(timeout, store.ping()).await {
            Ok(Ok(())) => {
                info!("Connected to MongoDB");
                Ok(store)
            }
            Ok(Err(e)) => Err(StoreError::Connection(e.to_string())),
            Err(_) => Err(StoreError::ConnectTimeout {
                seconds: config.connect_timeout_seconds,
            }),
        }
    }

    /// Wrap an already-configured client.
    pub fn from_client(client: &Client, database: &str, collection: &str) -> Self {
        let database = client.database(database);
        let collection = database.collection::<EmployeeDocument>(collection);
        Self {
            database,
            collection,
        }
    }
}

/// Count a failed operation before handing the error back.
fn tracked<T>(
    operation: StoreOperation,
    result: Result<T, mongodb::error::Error>,
) -> Result<T, StoreError> {
    result.map_err(|e| {
        metrics::inc_store_failures(operation);
        StoreError::Driver(e)
    })
}

#[async_trait]
impl EmployeeStore for MongoEmployeeStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Mongo
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> Result<(), StoreError> {
        let _timer = StoreTimer::new(StoreOperation::Ping);
        tracked(
            StoreOperation::Ping,
            self.database.run_command(doc! { "ping": 1 }).await,
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        let _timer = StoreTimer::new(StoreOperation::List);
        let cursor = tracked(StoreOperation::List, self.collection.find(doc! {}).await)?;
        let docs: Vec<EmployeeDocument> =
            tracked(StoreOperation::List, cursor.try_collect().await)?;

        debug!(count = docs.len(), "Listed employees");
        Ok(docs.into_iter().map(Employee::from).collect())
    }

    #[instrument(skip(self, fields), fields(name = %fields.name))]
    async fn insert(&self, fields: &EmployeeFields) -> Result<EmployeeId, StoreError> {
        let _timer = StoreTimer::new(StoreOperation::Insert);
        let result = tracked(
            StoreOperation::Insert,
            self.collection
                .clone_with_type::<EmployeeFields>()
                .insert_one(fields)
                .await,
        )?;

        let oid = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::UnexpectedInsertedId(result.inserted_id.to_string()))?;

        debug!(id = %oid, "Inserted employee");
        Ok(EmployeeId::from(oid))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get(&self, id: EmployeeId) -> Result<Employee, StoreError> {
        let _timer = StoreTimer::new(StoreOperation::Get);
        let found = tracked(
            StoreOperation::Get,
            self.collection
                .find_one(doc! { "_id": id.object_id() })
                .await,
        )?;

        found
            .map(Employee::from)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    #[instrument(skip(self, fields), fields(id = %id))]
    async fn update(&self, id: EmployeeId, fields: &EmployeeFields) -> Result<(), StoreError> {
        let _timer = StoreTimer::new(StoreOperation::Update);
        let update = doc! {
            "$set": {
                "name": fields.name.as_str(),
                "salary": fields.salary,
                "age": fields.age,
            }
        };

        let previous = tracked(
            StoreOperation::Update,
            self.collection
                .find_one_and_update(doc! { "_id": id.object_id() }, update)
                .await,
        )?;

        match previous {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound { id: id.to_string() }),
        }
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: EmployeeId) -> Result<u64, StoreError> {
        let _timer = StoreTimer::new(StoreOperation::Delete);
        let result = tracked(
            StoreOperation::Delete,
            self.collection
                .delete_one(doc! { "_id": id.object_id() })
                .await,
        )?;

        Ok(result.deleted_count)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64, StoreError> {
        let _timer = StoreTimer::new(StoreOperation::Count);
        tracked(
            StoreOperation::Count,
            self.collection.count_documents(doc! {}).await,
        )
    }
}
