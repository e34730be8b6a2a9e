use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::entities::account;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub industry: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccount {
    pub name: String,
    pub industry: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

/// Full-field overwrite; every edit form submits the complete record.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAccount {
    pub name: String,
    pub industry: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

impl Account {
    fn from_model(model: account::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            industry: model.industry,
            phone: model.phone,
            website: model.website,
            address: model.address,
            created_at: model.created_at,
        }
    }

    pub async fn count<C: ConnectionTrait>(db: &C) -> Result<i64, DbErr> {
        let count = account::Entity::find().count(db).await?;
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        let record = account::Entity::find_by_id(id).one(db).await?;
        Ok(record.map(Self::from_model))
    }

    /// All accounts in insertion order, for foreign-key pickers.
    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = account::Entity::find()
            .order_by_asc(account::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    /// List newest-first, optionally narrowed to names containing `search`.
    pub async fn search<C: ConnectionTrait>(
        db: &C,
        search: Option<&str>,
    ) -> Result<Vec<Self>, DbErr> {
        let mut query = account::Entity::find();
        if let Some(needle) = search.filter(|s| !s.is_empty()) {
            query = query.filter(account::Column::Name.contains(needle));
        }
        let records = query
            .order_by_desc(account::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn find_recent<C: ConnectionTrait>(db: &C, limit: u64) -> Result<Vec<Self>, DbErr> {
        let records = account::Entity::find()
            .order_by_desc(account::Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn create<C: ConnectionTrait>(db: &C, data: &CreateAccount) -> Result<Self, DbErr> {
        let active = account::ActiveModel {
            name: Set(data.name.clone()),
            industry: Set(data.industry.clone()),
            phone: Set(data.phone.clone()),
            website: Set(data.website.clone()),
            address: Set(data.address.clone()),
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
        data: &UpdateAccount,
    ) -> Result<Self, DbErr> {
        let record = account::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Account not found".to_string()))?;

        let mut active: account::ActiveModel = record.into();
        active.name = Set(data.name.clone());
        active.industry = Set(data.industry.clone());
        active.phone = Set(data.phone.clone());
        active.website = Set(data.website.clone());
        active.address = Set(data.address.clone());

        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;

    async fn setup() -> DBService {
        DBService::new("sqlite::memory:").await.unwrap()
    }

    fn acme() -> CreateAccount {
        CreateAccount {
            name: "Acme Corporation".to_string(),
            industry: Some("Manufacturing".to_string()),
            phone: Some("555-0100".to_string()),
            website: Some("www.acme.com".to_string()),
            address: None,
        }
    }

    #[tokio::test]
    async fn create_then_read_round_trips() {
        let db = setup().await;
        let created = Account::create(&db.pool, &acme()).await.unwrap();

        let found = Account::find_by_id(&db.pool, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "Acme Corporation");
        assert_eq!(found.industry.as_deref(), Some("Manufacturing"));
        assert_eq!(found.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_overwrites_fields_but_not_created_at() {
        let db = setup().await;
        let created = Account::create(&db.pool, &acme()).await.unwrap();

        let updated = Account::update(
            &db.pool,
            created.id,
            &UpdateAccount {
                name: "Acme Corp".to_string(),
                industry: None,
                phone: None,
                website: None,
                address: Some("1 Main St".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Acme Corp");
        assert_eq!(updated.industry, None);
        assert_eq!(updated.address.as_deref(), Some("1 Main St"));
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_missing_account_is_record_not_found() {
        let db = setup().await;
        let err = Account::update(
            &db.pool,
            99,
            &UpdateAccount {
                name: "Ghost".to_string(),
                industry: None,
                phone: None,
                website: None,
                address: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DbErr::RecordNotFound(_)));
    }

    #[tokio::test]
    async fn search_matches_name_substring() {
        let db = setup().await;
        Account::create(&db.pool, &acme()).await.unwrap();
        Account::create(
            &db.pool,
            &CreateAccount {
                name: "TechStart Inc".to_string(),
                industry: None,
                phone: None,
                website: None,
                address: None,
            },
        )
        .await
        .unwrap();

        let hits = Account::search(&db.pool, Some("Tech")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "TechStart Inc");

        let all = Account::search(&db.pool, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
