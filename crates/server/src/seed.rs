use chrono::{Duration, Utc};
use db::models::{
    account::{Account, CreateAccount},
    contact::{Contact, CreateContact},
};
use db::types::{TaskPriority, TaskState, TicketPriority, TicketState};
use db::{DbErr, entities};
use rand::{Rng, seq::SliceRandom};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

const ACCOUNTS: [(&str, &str, &str, &str); 5] = [
    ("Acme Corporation", "Manufacturing", "555-0100", "www.acme.com"),
    ("TechStart Inc", "Technology", "555-0200", "www.techstart.io"),
    ("Global Logistics", "Transportation", "555-0300", "www.globallog.com"),
    ("HealthCare Plus", "Healthcare", "555-0400", "www.hcplus.com"),
    ("EduLearn Systems", "Education", "555-0500", "www.edulearn.edu"),
];

// (first, last, email, job title, index into ACCOUNTS)
const CONTACTS: [(&str, &str, &str, &str, usize); 7] = [
    ("John", "Smith", "john.smith@acme.com", "CEO", 0),
    ("Sarah", "Johnson", "sarah.j@techstart.io", "CTO", 1),
    ("Mike", "Williams", "mike.w@globallog.com", "Operations Manager", 2),
    ("Emily", "Brown", "emily.b@hcplus.com", "Director", 3),
    ("David", "Lee", "david.lee@edulearn.edu", "Principal", 4),
    ("Lisa", "Garcia", "lisa.g@acme.com", "IT Manager", 0),
    ("James", "Wilson", "james.w@techstart.io", "Developer", 1),
];

const TICKET_SUBJECTS: [&str; 12] = [
    "Unable to login to system",
    "Email not syncing",
    "Printer not working",
    "Software installation request",
    "Network connectivity issues",
    "Password reset needed",
    "VPN connection failing",
    "Application crashing",
    "Request for new equipment",
    "Database performance slow",
    "Security alert investigation",
    "Backup restoration needed",
];

const TASK_TITLES: [&str; 5] = [
    "Follow up with Acme Corp",
    "Prepare quarterly report",
    "Review support tickets",
    "Update documentation",
    "Team meeting preparation",
];

const CATEGORIES: [&str; 5] = ["Hardware", "Software", "Network", "Account", "Other"];
const ASSIGNEES: [Option<&str>; 4] = [Some("Admin"), Some("Support Team"), Some("IT Dept"), None];
const TASK_ASSIGNEES: [Option<&str>; 3] = [Some("Admin"), Some("Support Team"), None];

/// Populate an empty store with demo data. A no-op whenever any account
/// already exists, so it runs at most once per database. The RNG is injected
/// so tests can seed deterministically.
pub async fn ensure_seed_data<C, R>(db: &C, rng: &mut R) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
    R: Rng,
{
    if Account::count(db).await? > 0 {
        return Ok(false);
    }

    let mut account_ids = Vec::with_capacity(ACCOUNTS.len());
    for (name, industry, phone, website) in ACCOUNTS {
        let account = Account::create(
            db,
            &CreateAccount {
                name: name.to_string(),
                industry: Some(industry.to_string()),
                phone: Some(phone.to_string()),
                website: Some(website.to_string()),
                address: None,
            },
        )
        .await?;
        account_ids.push(account.id);
    }

    let mut contact_ids = Vec::with_capacity(CONTACTS.len());
    for (first, last, email, job_title, account_index) in CONTACTS {
        let contact = Contact::create(
            db,
            &CreateContact {
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: Some(email.to_string()),
                phone: None,
                job_title: Some(job_title.to_string()),
                account_id: Some(account_ids[account_index]),
            },
        )
        .await?;
        contact_ids.push(contact.id);
    }

    let states = [
        TicketState::New,
        TicketState::InProgress,
        TicketState::OnHold,
        TicketState::Resolved,
        TicketState::Closed,
    ];
    let priorities = [
        TicketPriority::Critical,
        TicketPriority::High,
        TicketPriority::Medium,
        TicketPriority::Low,
    ];

    // Tickets carry backdated timestamps, so they go through the entity
    // layer directly rather than `Ticket::create`.
    for (i, subject) in TICKET_SUBJECTS.iter().enumerate() {
        let created_at = Utc::now() - Duration::days(rng.gen_range(0..=30));
        let ticket = entities::ticket::ActiveModel {
            number: Set(db::models::ticket::ticket_number(i as u64)),
            short_description: Set(subject.to_string()),
            description: Set(Some(format!("Detailed description for: {subject}"))),
            state: Set(states.choose(rng).cloned().unwrap_or_default()),
            priority: Set(priorities.choose(rng).cloned().unwrap_or_default()),
            category: Set(CATEGORIES.choose(rng).map(|c| c.to_string())),
            assigned_to: Set(ASSIGNEES.choose(rng).copied().flatten().map(String::from)),
            account_id: Set(account_ids.choose(rng).copied()),
            contact_id: Set(contact_ids.choose(rng).copied()),
            created_at: Set(created_at),
            updated_at: Set(created_at),
            ..Default::default()
        };
        ticket.insert(db).await?;
    }

    let task_states = [TaskState::Open, TaskState::InProgress, TaskState::Completed];
    let task_priorities = [
        TaskPriority::Critical,
        TaskPriority::High,
        TaskPriority::Medium,
        TaskPriority::Low,
    ];
    for title in TASK_TITLES {
        let task = entities::task::ActiveModel {
            title: Set(title.to_string()),
            description: Set(Some(format!("Description for {title}"))),
            due_date: Set(Some(Utc::now() + Duration::days(rng.gen_range(1..=14)))),
            state: Set(task_states.choose(rng).cloned().unwrap_or_default()),
            priority: Set(task_priorities.choose(rng).cloned().unwrap_or_default()),
            assigned_to: Set(TASK_ASSIGNEES
                .choose(rng)
                .copied()
                .flatten()
                .map(String::from)),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        task.insert(db).await?;
    }

    tracing::info!(
        accounts = ACCOUNTS.len(),
        contacts = CONTACTS.len(),
        tickets = TICKET_SUBJECTS.len(),
        tasks = TASK_TITLES.len(),
        "seeded demo data"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use db::DBService;
    use db::models::ticket::{Ticket, TicketFilter};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[tokio::test]
    async fn seeds_once_and_only_against_an_empty_store() {
        let db = DBService::new("sqlite::memory:").await.unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        assert!(ensure_seed_data(&db.pool, &mut rng).await.unwrap());
        assert!(!ensure_seed_data(&db.pool, &mut rng).await.unwrap());

        assert_eq!(Account::count(&db.pool).await.unwrap(), 5);
        assert_eq!(Contact::count(&db.pool).await.unwrap(), 7);
        assert_eq!(Ticket::count(&db.pool).await.unwrap(), 12);

        let tickets = Ticket::list(&db.pool, &TicketFilter::default())
            .await
            .unwrap();
        assert!(tickets.iter().any(|t| t.number == "INC0000001"));
        assert!(tickets.iter().any(|t| t.number == "INC0000012"));
        assert!(tickets.iter().all(|t| t.updated_at >= t.created_at));
    }

    #[tokio::test]
    async fn same_rng_seed_produces_identical_fixtures() {
        let a = DBService::new("sqlite::memory:").await.unwrap();
        let b = DBService::new("sqlite::memory:").await.unwrap();

        ensure_seed_data(&a.pool, &mut StdRng::seed_from_u64(42))
            .await
            .unwrap();
        ensure_seed_data(&b.pool, &mut StdRng::seed_from_u64(42))
            .await
            .unwrap();

        let tickets_a = Ticket::list(&a.pool, &TicketFilter::default())
            .await
            .unwrap();
        let tickets_b = Ticket::list(&b.pool, &TicketFilter::default())
            .await
            .unwrap();
        let states_a: Vec<_> = tickets_a.iter().map(|t| (t.number.clone(), t.state.clone())).collect();
        let states_b: Vec<_> = tickets_b.iter().map(|t| (t.number.clone(), t.state.clone())).collect();
        assert_eq!(states_a, states_b);
    }
}
