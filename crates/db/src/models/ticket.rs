use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::entities::ticket;
pub use crate::types::{TicketPriority, TicketState};

/// Derive the next ticket number from the current ticket count.
///
/// This is a pure function of the count at call time, not a stored counter:
/// two concurrent creators can compute the same number before either commits.
/// The unique index on `tickets.number` rejects the second writer.
pub fn ticket_number(existing: u64) -> String {
    format!("INC{:07}", existing + 1)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub number: String,
    pub short_description: String,
    pub description: Option<String>,
    pub state: TicketState,
    pub priority: TicketPriority,
    pub category: Option<String>,
    pub assigned_to: Option<String>,
    pub account_id: Option<i64>,
    pub contact_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicket {
    pub short_description: String,
    pub description: Option<String>,
    pub state: TicketState,
    pub priority: TicketPriority,
    pub category: Option<String>,
    pub assigned_to: Option<String>,
    pub account_id: Option<i64>,
    pub contact_id: Option<i64>,
}

/// Full-field overwrite; `number` and `created_at` stay immutable.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTicket {
    pub short_description: String,
    pub description: Option<String>,
    pub state: TicketState,
    pub priority: TicketPriority,
    pub category: Option<String>,
    pub assigned_to: Option<String>,
    pub account_id: Option<i64>,
    pub contact_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub state: Option<TicketState>,
    pub priority: Option<TicketPriority>,
    pub search: Option<String>,
}

impl Ticket {
    fn from_model(model: ticket::Model) -> Self {
        Self {
            id: model.id,
            number: model.number,
            short_description: model.short_description,
            description: model.description,
            state: model.state,
            priority: model.priority,
            category: model.category,
            assigned_to: model.assigned_to,
            account_id: model.account_id,
            contact_id: model.contact_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
        ticket::Entity::find().count(db).await
    }

    pub async fn count_open<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
        ticket::Entity::find()
            .filter(ticket::Column::State.is_in(TicketState::OPEN))
            .count(db)
            .await
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        let record = ticket::Entity::find_by_id(id).one(db).await?;
        Ok(record.map(Self::from_model))
    }

    /// List newest-first. State and priority filters are exact matches; the
    /// search term matches the ticket number or the short description.
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        filter: &TicketFilter,
    ) -> Result<Vec<Self>, DbErr> {
        let mut query = ticket::Entity::find();
        if let Some(state) = &filter.state {
            query = query.filter(ticket::Column::State.eq(state.clone()));
        }
        if let Some(priority) = &filter.priority {
            query = query.filter(ticket::Column::Priority.eq(priority.clone()));
        }
        if let Some(needle) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(ticket::Column::Number.contains(needle))
                    .add(ticket::Column::ShortDescription.contains(needle)),
            );
        }
        let records = query
            .order_by_desc(ticket::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn find_recent<C: ConnectionTrait>(db: &C, limit: u64) -> Result<Vec<Self>, DbErr> {
        let records = ticket::Entity::find()
            .order_by_desc(ticket::Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn find_by_account_id<C: ConnectionTrait>(
        db: &C,
        account_id: i64,
    ) -> Result<Vec<Self>, DbErr> {
        let records = ticket::Entity::find()
            .filter(ticket::Column::AccountId.eq(account_id))
            .order_by_desc(ticket::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn find_by_contact_id<C: ConnectionTrait>(
        db: &C,
        contact_id: i64,
    ) -> Result<Vec<Self>, DbErr> {
        let records = ticket::Entity::find()
            .filter(ticket::Column::ContactId.eq(contact_id))
            .order_by_desc(ticket::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    /// Ticket count per distinct state, for the dashboard chart.
    pub async fn count_by_state<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Vec<(TicketState, i64)>, DbErr> {
        ticket::Entity::find()
            .select_only()
            .column(ticket::Column::State)
            .column_as(ticket::Column::Id.count(), "count")
            .group_by(ticket::Column::State)
            .into_tuple()
            .all(db)
            .await
    }

    /// Ticket count per distinct priority, for the dashboard chart.
    pub async fn count_by_priority<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Vec<(TicketPriority, i64)>, DbErr> {
        ticket::Entity::find()
            .select_only()
            .column(ticket::Column::Priority)
            .column_as(ticket::Column::Id.count(), "count")
            .group_by(ticket::Column::Priority)
            .into_tuple()
            .all(db)
            .await
    }

    /// Insert a new ticket, deriving its number from the current count.
    ///
    /// Callers should run this inside a transaction so the count and the
    /// insert observe the same snapshot; see [`ticket_number`] for the
    /// documented race under concurrent creation.
    pub async fn create<C: ConnectionTrait>(db: &C, data: &CreateTicket) -> Result<Self, DbErr> {
        let number = ticket_number(Self::count(db).await?);
        let now = Utc::now();
        let active = ticket::ActiveModel {
            number: Set(number),
            short_description: Set(data.short_description.clone()),
            description: Set(data.description.clone()),
            state: Set(data.state.clone()),
            priority: Set(data.priority.clone()),
            category: Set(data.category.clone()),
            assigned_to: Set(data.assigned_to.clone()),
            account_id: Set(data.account_id),
            contact_id: Set(data.contact_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    /// Overwrite every editable field and stamp `updated_at`.
    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: i64,
        data: &UpdateTicket,
    ) -> Result<Self, DbErr> {
        let record = ticket::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Ticket not found".to_string()))?;

        let mut active: ticket::ActiveModel = record.into();
        active.short_description = Set(data.short_description.clone());
        active.description = Set(data.description.clone());
        active.state = Set(data.state.clone());
        active.priority = Set(data.priority.clone());
        active.category = Set(data.category.clone());
        active.assigned_to = Set(data.assigned_to.clone());
        active.account_id = Set(data.account_id);
        active.contact_id = Set(data.contact_id);
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DBService, TransactionTrait};

    async fn setup() -> DBService {
        DBService::new("sqlite::memory:").await.unwrap()
    }

    fn new_ticket(short_description: &str) -> CreateTicket {
        CreateTicket {
            short_description: short_description.to_string(),
            description: None,
            state: TicketState::default(),
            priority: TicketPriority::default(),
            category: None,
            assigned_to: None,
            account_id: None,
            contact_id: None,
        }
    }

    #[test]
    fn ticket_number_is_inc_plus_zero_padded_count() {
        assert_eq!(ticket_number(0), "INC0000001");
        assert_eq!(ticket_number(41), "INC0000042");
        assert_eq!(ticket_number(9_999_999), "INC10000000");
    }

    #[tokio::test]
    async fn numbers_are_assigned_sequentially() {
        let db = setup().await;
        for expected in ["INC0000001", "INC0000002", "INC0000003"] {
            let tx = db.pool.begin().await.unwrap();
            let created = Ticket::create(&tx, &new_ticket("Printer not working"))
                .await
                .unwrap();
            tx.commit().await.unwrap();
            assert_eq!(created.number, expected);
        }
        assert_eq!(Ticket::count(&db.pool).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn update_advances_updated_at_and_keeps_number() {
        let db = setup().await;
        let created = Ticket::create(&db.pool, &new_ticket("Email not syncing"))
            .await
            .unwrap();

        let updated = Ticket::update(
            &db.pool,
            created.id,
            &UpdateTicket {
                short_description: "Email not syncing".to_string(),
                description: Some("IMAP timeouts".to_string()),
                state: TicketState::InProgress,
                priority: TicketPriority::High,
                category: None,
                assigned_to: Some("Support Team".to_string()),
                account_id: None,
                contact_id: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.number, created.number);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert!(updated.updated_at >= updated.created_at);
        assert_eq!(updated.state, TicketState::InProgress);
    }

    #[tokio::test]
    async fn list_filters_are_exact_and_intersect() {
        let db = setup().await;
        let mut closed_high = new_ticket("VPN connection failing");
        closed_high.state = TicketState::Closed;
        closed_high.priority = TicketPriority::High;
        let mut closed_low = new_ticket("Password reset needed");
        closed_low.state = TicketState::Closed;
        closed_low.priority = TicketPriority::Low;
        let open = new_ticket("Application crashing");

        Ticket::create(&db.pool, &closed_high).await.unwrap();
        Ticket::create(&db.pool, &closed_low).await.unwrap();
        Ticket::create(&db.pool, &open).await.unwrap();

        let closed = Ticket::list(
            &db.pool,
            &TicketFilter {
                state: Some(TicketState::Closed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(closed.len(), 2);
        assert!(closed.iter().all(|t| t.state == TicketState::Closed));

        let both = Ticket::list(
            &db.pool,
            &TicketFilter {
                state: Some(TicketState::Closed),
                priority: Some(TicketPriority::High),
                search: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].short_description, "VPN connection failing");
    }

    #[tokio::test]
    async fn search_matches_number_or_short_description() {
        let db = setup().await;
        Ticket::create(&db.pool, &new_ticket("Database performance slow"))
            .await
            .unwrap();
        Ticket::create(&db.pool, &new_ticket("Security alert investigation"))
            .await
            .unwrap();

        let by_description = Ticket::list(
            &db.pool,
            &TicketFilter {
                search: Some("performance".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].number, "INC0000001");

        let by_number = Ticket::list(
            &db.pool,
            &TicketFilter {
                search: Some("INC0000002".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_number.len(), 1);
        assert_eq!(
            by_number[0].short_description,
            "Security alert investigation"
        );
    }

    #[tokio::test]
    async fn duplicate_number_is_rejected_by_the_unique_index() {
        let db = setup().await;
        Ticket::create(&db.pool, &new_ticket("Backup restoration needed"))
            .await
            .unwrap();

        // Simulates the concurrent-creation race: a second writer arriving
        // with a number derived from a stale count.
        let now = chrono::Utc::now();
        let stale = crate::entities::ticket::ActiveModel {
            number: sea_orm::Set("INC0000001".to_string()),
            short_description: sea_orm::Set("Duplicate".to_string()),
            state: sea_orm::Set(TicketState::New),
            priority: sea_orm::Set(TicketPriority::Medium),
            created_at: sea_orm::Set(now),
            updated_at: sea_orm::Set(now),
            ..Default::default()
        };
        let err = stale.insert(&db.pool).await.unwrap_err();
        assert!(err.to_string().to_lowercase().contains("unique"));
    }
}
