use chrono::{DateTime, Utc};
use sea_orm::sea_query::NullOrdering;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, Order, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use crate::entities::task;
pub use crate::types::{TaskPriority, TaskState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub state: TaskState,
    pub priority: TaskPriority,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub state: TaskState,
    pub priority: TaskPriority,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub state: TaskState,
    pub priority: TaskPriority,
    pub assigned_to: Option<String>,
}

impl Task {
    fn from_model(model: task::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            due_date: model.due_date,
            state: model.state,
            priority: model.priority,
            assigned_to: model.assigned_to,
            created_at: model.created_at,
        }
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        let record = task::Entity::find_by_id(id).one(db).await?;
        Ok(record.map(Self::from_model))
    }

    /// List soonest-due-first; tasks without a due date sort last. SQLite
    /// would otherwise put NULLs first on an ascending sort.
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        state: Option<TaskState>,
    ) -> Result<Vec<Self>, DbErr> {
        let mut query = task::Entity::find();
        if let Some(state) = state {
            query = query.filter(task::Column::State.eq(state));
        }
        let records = query
            .order_by_with_nulls(task::Column::DueDate, Order::Asc, NullOrdering::Last)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn create<C: ConnectionTrait>(db: &C, data: &CreateTask) -> Result<Self, DbErr> {
        let active = task::ActiveModel {
            title: Set(data.title.clone()),
            description: Set(data.description.clone()),
            due_date: Set(data.due_date),
            state: Set(data.state.clone()),
            priority: Set(data.priority.clone()),
            assigned_to: Set(data.assigned_to.clone()),
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
        data: &UpdateTask,
    ) -> Result<Self, DbErr> {
        let record = task::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Task not found".to_string()))?;

        let mut active: task::ActiveModel = record.into();
        active.title = Set(data.title.clone());
        active.description = Set(data.description.clone());
        active.due_date = Set(data.due_date);
        active.state = Set(data.state.clone());
        active.priority = Set(data.priority.clone());
        active.assigned_to = Set(data.assigned_to.clone());

        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::DBService;

    async fn setup() -> DBService {
        DBService::new("sqlite::memory:").await.unwrap()
    }

    fn new_task(title: &str, due_in_days: Option<i64>) -> CreateTask {
        CreateTask {
            title: title.to_string(),
            description: None,
            due_date: due_in_days.map(|d| Utc::now() + Duration::days(d)),
            state: TaskState::default(),
            priority: TaskPriority::default(),
            assigned_to: None,
        }
    }

    #[tokio::test]
    async fn list_orders_by_due_date_with_undated_tasks_last() {
        let db = setup().await;
        Task::create(&db.pool, &new_task("No due date", None))
            .await
            .unwrap();
        Task::create(&db.pool, &new_task("Due later", Some(14)))
            .await
            .unwrap();
        Task::create(&db.pool, &new_task("Due soon", Some(1)))
            .await
            .unwrap();

        let tasks = Task::list(&db.pool, None).await.unwrap();
        let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Due soon", "Due later", "No due date"]);
    }

    #[tokio::test]
    async fn list_filters_on_state() {
        let db = setup().await;
        let mut completed = new_task("Prepare quarterly report", Some(3));
        completed.state = TaskState::Completed;
        Task::create(&db.pool, &completed).await.unwrap();
        Task::create(&db.pool, &new_task("Review support tickets", Some(2)))
            .await
            .unwrap();

        let open = Task::list(&db.pool, Some(TaskState::Open)).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].title, "Review support tickets");
    }

    #[tokio::test]
    async fn update_can_clear_the_due_date() {
        let db = setup().await;
        let created = Task::create(&db.pool, &new_task("Update documentation", Some(5)))
            .await
            .unwrap();

        let updated = Task::update(
            &db.pool,
            created.id,
            &UpdateTask {
                title: "Update documentation".to_string(),
                description: None,
                due_date: None,
                state: TaskState::InProgress,
                priority: TaskPriority::Low,
                assigned_to: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.due_date, None);
        assert_eq!(updated.state, TaskState::InProgress);
        assert_eq!(updated.created_at, created.created_at);
    }
}
