use std::collections::HashMap;

use sea_orm::{ConnectionTrait, DbErr};
use serde::Serialize;

use crate::models::{account::Account, contact::Contact, ticket::Ticket};

const RECENT_TICKETS: u64 = 10;
const RECENT_ACCOUNTS: u64 = 5;

/// Everything the dashboard page needs, recomputed from current data on
/// every request.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub total_tickets: u64,
    pub open_tickets: u64,
    pub total_accounts: i64,
    pub total_contacts: i64,
    pub recent_tickets: Vec<Ticket>,
    pub recent_accounts: Vec<Account>,
    pub tickets_by_state: HashMap<String, i64>,
    pub tickets_by_priority: HashMap<String, i64>,
}

impl Dashboard {
    pub async fn load<C: ConnectionTrait>(db: &C) -> Result<Self, DbErr> {
        let tickets_by_state = Ticket::count_by_state(db)
            .await?
            .into_iter()
            .map(|(state, count)| (state.to_string(), count))
            .collect();
        let tickets_by_priority = Ticket::count_by_priority(db)
            .await?
            .into_iter()
            .map(|(priority, count)| (priority.to_string(), count))
            .collect();

        Ok(Self {
            total_tickets: Ticket::count(db).await?,
            open_tickets: Ticket::count_open(db).await?,
            total_accounts: Account::count(db).await?,
            total_contacts: Contact::count(db).await?,
            recent_tickets: Ticket::find_recent(db, RECENT_TICKETS).await?,
            recent_accounts: Account::find_recent(db, RECENT_ACCOUNTS).await?,
            tickets_by_state,
            tickets_by_priority,
        })
    }
}
