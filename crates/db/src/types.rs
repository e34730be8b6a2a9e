use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Ticket lifecycle states. Stored under their display spelling so the data
/// matches what the forms submit.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum TicketState {
    #[default]
    #[sea_orm(string_value = "New")]
    New,
    #[sea_orm(string_value = "In Progress")]
    #[serde(rename = "In Progress")]
    #[strum(serialize = "In Progress")]
    InProgress,
    #[sea_orm(string_value = "On Hold")]
    #[serde(rename = "On Hold")]
    #[strum(serialize = "On Hold")]
    OnHold,
    #[sea_orm(string_value = "Resolved")]
    Resolved,
    #[sea_orm(string_value = "Closed")]
    Closed,
}

impl TicketState {
    /// States counted as "open" on the dashboard.
    pub const OPEN: [TicketState; 3] = [
        TicketState::New,
        TicketState::InProgress,
        TicketState::OnHold,
    ];
}

#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum TicketPriority {
    #[sea_orm(string_value = "Critical")]
    Critical,
    #[sea_orm(string_value = "High")]
    High,
    #[default]
    #[sea_orm(string_value = "Medium")]
    Medium,
    #[sea_orm(string_value = "Low")]
    Low,
}

#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum TaskState {
    #[default]
    #[sea_orm(string_value = "Open")]
    Open,
    #[sea_orm(string_value = "In Progress")]
    #[serde(rename = "In Progress")]
    #[strum(serialize = "In Progress")]
    InProgress,
    #[sea_orm(string_value = "Completed")]
    Completed,
}

#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum TaskPriority {
    #[sea_orm(string_value = "Critical")]
    Critical,
    #[sea_orm(string_value = "High")]
    High,
    #[default]
    #[sea_orm(string_value = "Medium")]
    Medium,
    #[sea_orm(string_value = "Low")]
    Low,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn ticket_state_round_trips_display_spelling() {
        assert_eq!(TicketState::InProgress.to_string(), "In Progress");
        assert_eq!(
            TicketState::from_str("On Hold").unwrap(),
            TicketState::OnHold
        );
        assert!(TicketState::from_str("Bogus").is_err());
    }

    #[test]
    fn defaults_match_form_defaults() {
        assert_eq!(TicketState::default(), TicketState::New);
        assert_eq!(TicketPriority::default(), TicketPriority::Medium);
        assert_eq!(TaskState::default(), TaskState::Open);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn serde_uses_display_spelling() {
        let json = serde_json::to_string(&TicketState::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let back: TicketState = serde_json::from_str("\"Closed\"").unwrap();
        assert_eq!(back, TicketState::Closed);
    }
}
