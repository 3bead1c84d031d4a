//! Fixed Fall 2025 due-date schedule the AI matches assignments against.

const FALL_2025_SCHEDULE: &str = "Fall 2025 Academic Schedule:
Week 1 (Aug 26): Syllabus Quiz - Due: 2025-08-30T23:59:00-04:00
Week 2 (Sep 2): Introduction Discussion - Due: 2025-09-06T23:59:00-04:00
Week 3 (Sep 9): Assignment 1 - Due: 2025-09-13T23:59:00-04:00
Week 4 (Sep 16): Quiz 1 - Due: 2025-09-20T23:59:00-04:00
Week 5 (Sep 23): Discussion Post 2 - Due: 2025-09-27T23:59:00-04:00
Week 6 (Sep 30): Assignment 2 - Due: 2025-10-04T23:59:00-04:00
Week 7 (Oct 7): Midterm Project - Due: 2025-10-11T23:59:00-04:00
Week 8 (Oct 14): Quiz 2 - Due: 2025-10-18T23:59:00-04:00
Week 9 (Oct 21): Research Paper Draft - Due: 2025-10-25T23:59:00-04:00
Week 10 (Oct 28): Assignment 3 - Due: 2025-11-01T23:59:00-04:00
Week 11 (Nov 4): Discussion Post 3 - Due: 2025-11-08T23:59:00-04:00
Week 12 (Nov 11): Presentation - Due: 2025-11-15T23:59:00-04:00
Week 13 (Nov 18): Final Paper - Due: 2025-11-22T23:59:00-04:00
Week 14 (Nov 25): Thanksgiving Break - No assignments
Week 15 (Dec 2): Final Project - Due: 2025-12-06T23:59:00-04:00
Finals Week: Final Exam - Due: 2025-12-13T23:59:00-04:00";

/// Generate the Fall 2025 schedule.
pub const fn fall_2025_schedule() -> &'static str {
    FALL_2025_SCHEDULE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_covers_the_semester() {
        let schedule = fall_2025_schedule();
        assert_eq!(schedule.lines().count(), 17);
        assert!(schedule.starts_with("Fall 2025 Academic Schedule:"));
        assert!(schedule.contains("Syllabus Quiz - Due: 2025-08-30T23:59:00-04:00"));
        assert!(schedule.ends_with("Final Exam - Due: 2025-12-13T23:59:00-04:00"));
    }

    #[test]
    fn test_every_due_date_uses_eastern_offset() {
        let dates: Vec<&str> = fall_2025_schedule()
            .lines()
            .filter_map(|line| line.split("Due: ").nth(1))
            .collect();
        assert_eq!(dates.len(), 15);
        for date in dates {
            assert!(date.ends_with("-04:00"), "{date}");
            assert!(chrono::DateTime::parse_from_rfc3339(date).is_ok(), "{date}");
        }
    }
}
