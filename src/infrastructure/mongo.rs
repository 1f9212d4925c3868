use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{
    options::{ClientOptions, FindOneAndUpdateOptions, ReturnDocument},
    Client, Collection,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::customer::{
    BirthDate, Customer, CustomerFields, CustomerId, CustomerRepository, MemberNo, NewCustomer,
};
use crate::domain::{DataAccessError, Entity};
use crate::Database;

#[derive(Clone)]
pub struct MongoCustomerRepository {
    collection: Collection<CustomerDocument>,
}

impl MongoCustomerRepository {
    pub fn new(database: &mongodb::Database, collection: &str) -> Self {
        Self {
            collection: database.collection(collection),
        }
    }

    /// クライアントを生成し、pingで疎通を確認してから返す
    pub async fn connect(config: &Database) -> Result<Self, DataAccessError> {
        let mut options = ClientOptions::parse(&config.url).await?;
        options
            .app_name
            .get_or_insert_with(|| env!("CARGO_PKG_NAME").to_owned());
        let client = Client::with_options(options)?;
        let database = client.database(&config.name);
        database.run_command(doc! { "ping": 1 }, None).await?;
        info!("MongoDBに接続しました: {}.{}", config.name, config.collection);
        Ok(Self::new(&database, &config.collection))
    }
}

#[async_trait]
impl CustomerRepository for MongoCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, DataAccessError> {
        let documents: Vec<CustomerDocument> =
            self.collection.find(None, None).await?.try_collect().await?;
        Ok(documents.into_iter().map(Customer::from).collect())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError> {
        Ok(self
            .collection
            .find_one(doc! { "_id": *id }, None)
            .await?
            .map(Customer::from))
    }

    async fn create(&self, fields: CustomerFields) -> Result<Customer, DataAccessError> {
        let customer = Customer::create(CustomerId::generate(), fields)?;
        self.collection
            .insert_one(CustomerDocument::from(&customer), None)
            .await?;
        debug!("{} {} を登録", Customer::ENTITY_NAME, customer.id());
        Ok(customer)
    }

    async fn update_by_id(
        &self,
        id: CustomerId,
        fields: CustomerFields,
    ) -> Result<Option<Customer>, DataAccessError> {
        fields.validate()?;
        if fields.is_empty() {
            return self.find_by_id(id).await;
        }
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(self
            .collection
            .find_one_and_update(
                doc! { "_id": *id },
                doc! { "$set": set_document(&fields) },
                options,
            )
            .await?
            .map(Customer::from))
    }

    async fn delete_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "_id": *id }, None)
            .await?
            .map(Customer::from))
    }
}

/// 保存形式。生年月日はUTCの0時として日付型で保持する。
#[derive(Clone, Debug, Serialize, Deserialize)]
struct CustomerDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    dob: bson::DateTime,
    memberno: MemberNo,
    interest: String,
}

impl From<&Customer> for CustomerDocument {
    fn from(value: &Customer) -> Self {
        Self {
            id: *value.id(),
            name: value.name().to_owned(),
            dob: bson::DateTime::from_chrono(value.dob().midnight_utc()),
            memberno: value.memberno().clone(),
            interest: value.interest().to_owned(),
        }
    }
}

impl From<CustomerDocument> for Customer {
    fn from(value: CustomerDocument) -> Self {
        Customer::new(
            value.id.into(),
            NewCustomer {
                name: value.name,
                dob: BirthDate::from(value.dob.to_chrono()),
                memberno: value.memberno,
                interest: value.interest,
            },
        )
    }
}

fn set_document(fields: &CustomerFields) -> Document {
    let mut set = Document::new();
    if let Some(name) = &fields.name {
        set.insert("name", name.as_str());
    }
    if let Some(dob) = fields.dob {
        set.insert("dob", bson::DateTime::from_chrono(dob.midnight_utc()));
    }
    if let Some(memberno) = &fields.memberno {
        set.insert("memberno", memberno.as_str());
    }
    if let Some(interest) = &fields.interest {
        set.insert("interest", interest.as_str());
    }
    set
}
