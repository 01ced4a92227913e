//! Stateless query layer over the task collection. Every view is
//! re-derived from the full collection on each call; views are
//! independent and may overlap.

use time::Date;

use crate::tasks::model::Task;

/// "My Day": due today, or created today when no due date is set.
pub fn todos_for_today(tasks: &[Task], today: Date) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| match t.due_date {
            Some(due) => due == today,
            None => t.created_at.date() == today,
        })
        .collect()
}

pub fn important_todos(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| t.important).collect()
}

/// Every task with a due date, past or future.
pub fn planned_todos(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| t.due_date.is_some()).collect()
}

pub fn assigned_todos(tasks: &[Task]) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| t.assigned_to.as_deref().is_some_and(|a| !a.is_empty()))
        .collect()
}

/// Due strictly before the start of `today` and still open.
pub fn is_overdue(task: &Task, today: Date) -> bool {
    task.due_date.is_some_and(|due| due < today) && !task.completed
}

/// Due strictly after `today`.
pub fn upcoming_todos(tasks: &[Task], today: Date) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| t.due_date.is_some_and(|due| due > today))
        .collect()
}

/// Tasks due on one calendar day.
pub fn due_on(tasks: &[Task], day: Date) -> Vec<&Task> {
    tasks.iter().filter(|t| t.due_date == Some(day)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::model::Priority;
    use time::macros::{date, datetime};
    use time::OffsetDateTime;
    use uuid::Uuid;

    const TODAY: Date = date!(2026 - 08 - 04);
    const YESTERDAY: Date = date!(2026 - 08 - 03);
    const TOMORROW: Date = date!(2026 - 08 - 05);

    fn task(text: &str, created_at: OffsetDateTime) -> Task {
        Task {
            id: Uuid::new_v4(),
            text: text.into(),
            completed: false,
            important: false,
            priority: Priority::Medium,
            due_date: None,
            category: None,
            assigned_to: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn texts(view: Vec<&Task>) -> Vec<&str> {
        view.into_iter().map(|t| t.text.as_str()).collect()
    }

    /// The four-task example: A due today, B due yesterday, C undated but
    /// created today, D merely important.
    fn fixture() -> Vec<Task> {
        let created_today = datetime!(2026 - 08 - 04 09:30 UTC);
        let created_earlier = datetime!(2026 - 07 - 30 14:00 UTC);

        let mut a = task("A", created_earlier);
        a.due_date = Some(TODAY);
        let mut b = task("B", created_earlier);
        b.due_date = Some(YESTERDAY);
        let c = task("C", created_today);
        let mut d = task("D", created_earlier);
        d.important = true;
        vec![a, b, c, d]
    }

    #[test]
    fn today_view_takes_due_today_and_undated_created_today() {
        let tasks = fixture();
        assert_eq!(texts(todos_for_today(&tasks, TODAY)), ["A", "C"]);
    }

    #[test]
    fn overdue_flags_only_open_past_due_tasks() {
        let tasks = fixture();
        let flags: Vec<_> = tasks.iter().map(|t| is_overdue(t, TODAY)).collect();
        assert_eq!(flags, [false, true, false, false]);
    }

    #[test]
    fn overdue_ignores_completed_tasks() {
        let mut tasks = fixture();
        tasks[1].completed = true;
        assert!(!is_overdue(&tasks[1], TODAY));
    }

    #[test]
    fn important_view_is_flag_driven() {
        let tasks = fixture();
        assert_eq!(texts(important_todos(&tasks)), ["D"]);
    }

    #[test]
    fn planned_view_takes_any_due_date() {
        let tasks = fixture();
        assert_eq!(texts(planned_todos(&tasks)), ["A", "B"]);
    }

    #[test]
    fn assigned_view_requires_a_nonempty_assignee() {
        let mut tasks = fixture();
        tasks[0].assigned_to = Some("Me".into());
        tasks[1].assigned_to = Some("".into());
        assert_eq!(texts(assigned_todos(&tasks)), ["A"]);
    }

    #[test]
    fn important_and_planned_views_overlap() {
        let mut tasks = fixture();
        // An important task with a due date shows up in both views.
        tasks[0].important = true;
        assert_eq!(texts(important_todos(&tasks)), ["A", "D"]);
        assert_eq!(texts(planned_todos(&tasks)), ["A", "B"]);
    }

    #[test]
    fn upcoming_is_strictly_future() {
        let mut tasks = fixture();
        tasks[3].due_date = Some(TOMORROW);
        assert_eq!(texts(upcoming_todos(&tasks, TODAY)), ["D"]);
    }

    #[test]
    fn due_on_matches_one_calendar_day() {
        let tasks = fixture();
        assert_eq!(texts(due_on(&tasks, YESTERDAY)), ["B"]);
        assert!(due_on(&tasks, TOMORROW).is_empty());
    }
}
