use chrono::NaiveDateTime;
use pfd_domain::{GoalStatus, SavingsGoal, SavingsGoalProgress};

use crate::time::Clock;

pub struct SavingsService;

impl SavingsService {
    /// Recomputes percentage, remaining and status from the stored fields.
    /// A goal at or above target is completed whatever its deadline says.
    pub fn progress(goal: &SavingsGoal, clock: &dyn Clock) -> SavingsGoalProgress {
        let percentage = if goal.target_amount > 0.0 {
            (goal.current_amount / goal.target_amount) * 100.0
        } else {
            0.0
        };
        let overdue = goal.deadline.is_some_and(|deadline| clock.now() > deadline);
        let status = if percentage >= 100.0 {
            GoalStatus::Completed
        } else if overdue {
            GoalStatus::Overdue
        } else if percentage > 0.0 {
            GoalStatus::InProgress
        } else {
            GoalStatus::NotStarted
        };
        SavingsGoalProgress {
            goal: goal.clone(),
            percentage,
            remaining: goal.target_amount - goal.current_amount,
            status,
        }
    }

    pub fn refresh_all(goals: &[SavingsGoal], clock: &dyn Clock) -> Vec<SavingsGoalProgress> {
        goals.iter().map(|goal| Self::progress(goal, clock)).collect()
    }

    pub fn active(goals: &[SavingsGoalProgress]) -> Vec<&SavingsGoalProgress> {
        goals
            .iter()
            .filter(|goal| goal.status != GoalStatus::Completed)
            .collect()
    }

    pub fn completed(goals: &[SavingsGoalProgress]) -> Vec<&SavingsGoalProgress> {
        goals
            .iter()
            .filter(|goal| goal.status == GoalStatus::Completed)
            .collect()
    }

    pub fn overdue(goals: &[SavingsGoalProgress]) -> Vec<&SavingsGoalProgress> {
        goals
            .iter()
            .filter(|goal| goal.status == GoalStatus::Overdue)
            .collect()
    }

    /// Stable sort: overdue, due within a week, due within a month, the
    /// rest, completed last.
    pub fn sort_by_priority(goals: &mut [SavingsGoalProgress], clock: &dyn Clock) {
        let now = clock.now();
        goals.sort_by_key(|goal| priority(goal, now));
    }
}

fn priority(goal: &SavingsGoalProgress, now: NaiveDateTime) -> u8 {
    match goal.status {
        GoalStatus::Overdue => 0,
        GoalStatus::Completed => 4,
        _ => match goal.goal.deadline {
            Some(deadline) => {
                let days = days_until(deadline, now);
                if days <= 7 {
                    1
                } else if days <= 30 {
                    2
                } else {
                    3
                }
            }
            None => 3,
        },
    }
}

/// Whole days until `deadline`, rounded up.
fn days_until(deadline: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let millis = (deadline - now).num_milliseconds();
    let per_day = 24 * 60 * 60 * 1000;
    millis.div_euclid(per_day) + i64::from(millis.rem_euclid(per_day) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedClock;
    use chrono::Duration;

    fn clock() -> FixedClock {
        FixedClock::at_noon(2024, 6, 1).unwrap()
    }

    #[test]
    fn completion_ignores_passed_deadline() {
        let goal = SavingsGoal::new("Laptop", 1000.0, "USD")
            .with_current_amount(1200.0)
            .with_deadline(clock().0 - Duration::days(10));
        let progress = SavingsService::progress(&goal, &clock());
        assert_eq!(progress.status, GoalStatus::Completed);
        assert_eq!(progress.percentage, 120.0);
        assert_eq!(progress.remaining, -200.0);
    }

    #[test]
    fn status_state_machine() {
        let past = clock().0 - Duration::days(1);
        let future = clock().0 + Duration::days(1);
        let cases = [
            (0.0, None, GoalStatus::NotStarted),
            (0.0, Some(future), GoalStatus::NotStarted),
            (0.0, Some(past), GoalStatus::Overdue),
            (300.0, None, GoalStatus::InProgress),
            (300.0, Some(past), GoalStatus::Overdue),
        ];
        for (current, deadline, expected) in cases {
            let mut goal = SavingsGoal::new("Trip", 1000.0, "USD").with_current_amount(current);
            goal.deadline = deadline;
            assert_eq!(SavingsService::progress(&goal, &clock()).status, expected);
        }
    }

    #[test]
    fn zero_target_is_zero_percent() {
        let goal = SavingsGoal::new("Nothing", 0.0, "USD").with_current_amount(50.0);
        let progress = SavingsService::progress(&goal, &clock());
        assert_eq!(progress.percentage, 0.0);
        assert_eq!(progress.status, GoalStatus::NotStarted);
    }

    #[test]
    fn priority_ordering_is_stable() {
        let now = clock().0;
        let goals = vec![
            SavingsGoal::new("done", 10.0, "USD").with_current_amount(10.0),
            SavingsGoal::new("someday", 100.0, "USD").with_current_amount(1.0),
            SavingsGoal::new("month", 100.0, "USD").with_deadline(now + Duration::days(20)),
            SavingsGoal::new("late", 100.0, "USD").with_deadline(now - Duration::days(2)),
            SavingsGoal::new("week", 100.0, "USD").with_deadline(now + Duration::days(3)),
            SavingsGoal::new("later", 100.0, "USD"),
        ];
        let mut progress = SavingsService::refresh_all(&goals, &clock());
        SavingsService::sort_by_priority(&mut progress, &clock());
        let names: Vec<_> = progress.iter().map(|p| p.goal.name.as_str()).collect();
        assert_eq!(names, vec!["late", "week", "month", "someday", "later", "done"]);

        assert_eq!(SavingsService::active(&progress).len(), 5);
        assert_eq!(SavingsService::completed(&progress).len(), 1);
        assert_eq!(SavingsService::overdue(&progress).len(), 1);
    }
}
