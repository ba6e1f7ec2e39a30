// SPDX-License-Identifier: MIT

//! Badge catalog and unlock rules.
//!
//! Unlock criteria are a closed rule table rather than string-dispatched
//! categories, so the rule set is exhaustive and statically checkable.

use serde::Serialize;

/// A badge in the catalog (read-mostly, shown in the UI).
#[derive(Debug, Clone, Serialize)]
pub struct Badge {
    /// Badge ID (stable, referenced from UserAggregate.badges)
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Description shown on unlock
    pub description: &'static str,
    /// Declared reward amount. Presentation only: awarding a badge never
    /// feeds this back into the points total, which would reopen the
    /// duplicate-award race the commutative update protocol avoids.
    pub points_reward: i64,
}

/// Criterion a user's aggregates must meet to unlock a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeCriterion {
    /// Total points at or above the threshold
    PointsAtLeast(i64),
    /// Enrollments at 100% completion at or above the threshold
    CoursesCompletedAtLeast(u32),
}

/// One row of the unlock rule table.
#[derive(Debug, Clone, Copy)]
pub struct BadgeRule {
    pub badge_id: &'static str,
    pub criterion: BadgeCriterion,
}

/// Fixed, ordered unlock rule table.
pub const BADGE_RULES: [BadgeRule; 6] = [
    BadgeRule {
        badge_id: "first_100",
        criterion: BadgeCriterion::PointsAtLeast(100),
    },
    BadgeRule {
        badge_id: "point_collector",
        criterion: BadgeCriterion::PointsAtLeast(500),
    },
    BadgeRule {
        badge_id: "point_master",
        criterion: BadgeCriterion::PointsAtLeast(1000),
    },
    BadgeRule {
        badge_id: "first_course",
        criterion: BadgeCriterion::CoursesCompletedAtLeast(1),
    },
    BadgeRule {
        badge_id: "course_explorer",
        criterion: BadgeCriterion::CoursesCompletedAtLeast(5),
    },
    BadgeRule {
        badge_id: "course_master",
        criterion: BadgeCriterion::CoursesCompletedAtLeast(10),
    },
];

/// Badge catalog entries matching the rule table.
pub const BADGE_CATALOG: [Badge; 6] = [
    Badge {
        id: "first_100",
        name: "Century",
        description: "Earn your first 100 points",
        points_reward: 10,
    },
    Badge {
        id: "point_collector",
        name: "Point Collector",
        description: "Earn 500 points",
        points_reward: 25,
    },
    Badge {
        id: "point_master",
        name: "Point Master",
        description: "Earn 1000 points",
        points_reward: 50,
    },
    Badge {
        id: "first_course",
        name: "Graduate",
        description: "Complete your first course",
        points_reward: 20,
    },
    Badge {
        id: "course_explorer",
        name: "Course Explorer",
        description: "Complete 5 courses",
        points_reward: 50,
    },
    Badge {
        id: "course_master",
        name: "Course Master",
        description: "Complete 10 courses",
        points_reward: 100,
    },
];

impl BadgeCriterion {
    /// Check the criterion against a user's current aggregates.
    pub fn is_met(&self, points: i64, completed_courses: u32) -> bool {
        match *self {
            BadgeCriterion::PointsAtLeast(threshold) => points >= threshold,
            BadgeCriterion::CoursesCompletedAtLeast(threshold) => completed_courses >= threshold,
        }
    }
}

/// Evaluate the rule table and return badge IDs the user qualifies for
/// but does not yet hold, in rule-table order.
pub fn newly_qualified(points: i64, completed_courses: u32, held: &[String]) -> Vec<&'static str> {
    BADGE_RULES
        .iter()
        .filter(|rule| rule.criterion.is_met(points, completed_courses))
        .filter(|rule| !held.iter().any(|b| b == rule.badge_id))
        .map(|rule| rule.badge_id)
        .collect()
}
