use sea_orm::entity::prelude::*;

use crate::types::{TicketPriority, TicketState};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
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
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
