use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use crate::entities::contact;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub account_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateContact {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub account_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContact {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub account_id: Option<i64>,
}

impl Contact {
    fn from_model(model: contact::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone: model.phone,
            job_title: model.job_title,
            account_id: model.account_id,
            created_at: model.created_at,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub async fn count<C: ConnectionTrait>(db: &C) -> Result<i64, DbErr> {
        let count = contact::Entity::find().count(db).await?;
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        let record = contact::Entity::find_by_id(id).one(db).await?;
        Ok(record.map(Self::from_model))
    }

    /// All contacts in insertion order, for foreign-key pickers.
    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = contact::Entity::find()
            .order_by_asc(contact::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn find_by_account_id<C: ConnectionTrait>(
        db: &C,
        account_id: i64,
    ) -> Result<Vec<Self>, DbErr> {
        let records = contact::Entity::find()
            .filter(contact::Column::AccountId.eq(account_id))
            .order_by_asc(contact::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    /// List newest-first; `search` matches first name, last name, or email.
    pub async fn search<C: ConnectionTrait>(
        db: &C,
        search: Option<&str>,
    ) -> Result<Vec<Self>, DbErr> {
        let mut query = contact::Entity::find();
        if let Some(needle) = search.filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(contact::Column::FirstName.contains(needle))
                    .add(contact::Column::LastName.contains(needle))
                    .add(contact::Column::Email.contains(needle)),
            );
        }
        let records = query
            .order_by_desc(contact::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn create<C: ConnectionTrait>(db: &C, data: &CreateContact) -> Result<Self, DbErr> {
        let active = contact::ActiveModel {
            first_name: Set(data.first_name.clone()),
            last_name: Set(data.last_name.clone()),
            email: Set(data.email.clone()),
            phone: Set(data.phone.clone()),
            job_title: Set(data.job_title.clone()),
            account_id: Set(data.account_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    /// Overwrite every editable field. `created_at` is immutable.
    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: i64,
        data: &UpdateContact,
    ) -> Result<Self, DbErr> {
        let record = contact::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Contact not found".to_string()))?;

        let mut active: contact::ActiveModel = record.into();
        active.first_name = Set(data.first_name.clone());
        active.last_name = Set(data.last_name.clone());
        active.email = Set(data.email.clone());
        active.phone = Set(data.phone.clone());
        active.job_title = Set(data.job_title.clone());
        active.account_id = Set(data.account_id);

        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;
    use crate::models::account::{Account, CreateAccount};

    async fn setup() -> DBService {
        DBService::new("sqlite::memory:").await.unwrap()
    }

    fn contact(first: &str, last: &str, email: &str, account_id: Option<i64>) -> CreateContact {
        CreateContact {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: Some(email.to_string()),
            phone: None,
            job_title: None,
            account_id,
        }
    }

    #[tokio::test]
    async fn search_by_unique_email_substring_returns_exactly_one() {
        let db = setup().await;
        Contact::create(&db.pool, &contact("John", "Smith", "john.smith@acme.com", None))
            .await
            .unwrap();
        Contact::create(&db.pool, &contact("Sarah", "Johnson", "sarah.j@techstart.io", None))
            .await
            .unwrap();

        let hits = Contact::search(&db.pool, Some("techstart")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_name(), "Sarah Johnson");
    }

    #[tokio::test]
    async fn search_matches_first_and_last_name() {
        let db = setup().await;
        Contact::create(&db.pool, &contact("John", "Smith", "js@acme.com", None))
            .await
            .unwrap();
        Contact::create(&db.pool, &contact("Sarah", "Johnson", "sj@other.io", None))
            .await
            .unwrap();

        // "John" appears in a first name and within "Johnson".
        let hits = Contact::search(&db.pool, Some("John")).await.unwrap();
        assert_eq!(hits.len(), 2);

        let hits = Contact::search(&db.pool, Some("Smith")).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn find_by_account_id_only_returns_linked_contacts() {
        let db = setup().await;
        let account = Account::create(
            &db.pool,
            &CreateAccount {
                name: "Acme".to_string(),
                industry: None,
                phone: None,
                website: None,
                address: None,
            },
        )
        .await
        .unwrap();

        Contact::create(
            &db.pool,
            &contact("John", "Doe", "jd@acme.com", Some(account.id)),
        )
        .await
        .unwrap();
        Contact::create(&db.pool, &contact("Free", "Agent", "fa@none.io", None))
            .await
            .unwrap();

        let linked = Contact::find_by_account_id(&db.pool, account.id).await.unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].full_name(), "John Doe");
    }

    #[tokio::test]
    async fn update_can_unlink_the_account() {
        let db = setup().await;
        let account = Account::create(
            &db.pool,
            &CreateAccount {
                name: "Acme".to_string(),
                industry: None,
                phone: None,
                website: None,
                address: None,
            },
        )
        .await
        .unwrap();
        let created = Contact::create(
            &db.pool,
            &contact("John", "Doe", "jd@acme.com", Some(account.id)),
        )
        .await
        .unwrap();

        let updated = Contact::update(
            &db.pool,
            created.id,
            &UpdateContact {
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                email: None,
                phone: None,
                job_title: None,
                account_id: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.account_id, None);
        assert_eq!(updated.email, None);
    }
}
