use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::customer::{Customer, CustomerFields, CustomerId, CustomerRepository};
use crate::domain::{DataAccessError, Entity};

/// プロセス内に顧客を保持するリポジトリ
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<Vec<Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, DataAccessError> {
        Ok(self.customers.read().await.clone())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError> {
        Ok(self
            .customers
            .read()
            .await
            .iter()
            .find(|c| c.id() == id)
            .cloned())
    }

    async fn create(&self, fields: CustomerFields) -> Result<Customer, DataAccessError> {
        let customer = Customer::create(CustomerId::generate(), fields)?;
        self.customers.write().await.push(customer.clone());
        Ok(customer)
    }

    async fn update_by_id(
        &self,
        id: CustomerId,
        fields: CustomerFields,
    ) -> Result<Option<Customer>, DataAccessError> {
        let mut customers = self.customers.write().await;
        match customers.iter_mut().find(|c| c.id() == id) {
            Some(customer) => {
                customer.apply(fields)?;
                Ok(Some(customer.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError> {
        let mut customers = self.customers.write().await;
        let index = customers.iter().position(|c| c.id() == id);
        Ok(index.map(|index| customers.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> CustomerFields {
        CustomerFields {
            name: Some("Jane Doe".to_owned()),
            dob: Some("1990-01-01".parse().unwrap()),
            memberno: Some("1".into()),
            interest: Some("chess".to_owned()),
        }
    }

    #[tokio::test]
    async fn test_create_then_find_all() {
        let repo = InMemoryCustomerRepository::new();
        let customer = repo.create(fields()).await.unwrap();
        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].fields(), fields());
        assert_eq!(all[0].id(), customer.id());
        assert_eq!(all, repo.find_all().await.unwrap());
    }

    #[tokio::test]
    async fn test_create_missing_field_is_not_stored() {
        let repo = InMemoryCustomerRepository::new();
        let error = repo
            .create(CustomerFields {
                name: Some("A".to_owned()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(error.is_validation());
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let repo = InMemoryCustomerRepository::new();
        let customer = repo.create(fields()).await.unwrap();
        let updated = repo
            .update_by_id(
                customer.id(),
                CustomerFields {
                    interest: Some("X".to_owned()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.interest(), "X");
        assert_eq!(updated.name(), customer.name());
        assert_eq!(updated.dob(), customer.dob());
        assert_eq!(updated.memberno(), customer.memberno());
        assert_eq!(repo.find_by_id(customer.id()).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_field() {
        let repo = InMemoryCustomerRepository::new();
        let customer = repo.create(fields()).await.unwrap();
        let error = repo
            .update_by_id(
                customer.id(),
                CustomerFields {
                    name: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(error.is_validation());
        assert_eq!(repo.find_by_id(customer.id()).await.unwrap(), Some(customer));
    }

    #[tokio::test]
    async fn test_delete_is_final() {
        let repo = InMemoryCustomerRepository::new();
        let customer = repo.create(fields()).await.unwrap();
        assert_eq!(
            repo.delete_by_id(customer.id()).await.unwrap(),
            Some(customer.clone())
        );
        assert_eq!(repo.delete_by_id(customer.id()).await.unwrap(), None);
        assert_eq!(
            repo.update_by_id(customer.id(), fields()).await.unwrap(),
            None
        );
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
