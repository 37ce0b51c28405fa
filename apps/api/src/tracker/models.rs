//! Job tracker records. JSON is camelCase; enum values keep their display names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Board column, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Wishlist,
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl JobStatus {
    pub const COLUMNS: [JobStatus; 5] = [
        JobStatus::Wishlist,
        JobStatus::Applied,
        JobStatus::Interview,
        JobStatus::Offer,
        JobStatus::Rejected,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Med,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: String,
    pub company: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub status: JobStatus,
    pub priority: Priority,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Position within the status column.
    #[serde(default)]
    pub order: i64,
}

/// Reassigns `order` to 0..n-1 within each status column, keeping the
/// relative order of equal keys. Record sequence is unchanged.
pub fn normalize_orders(mut jobs: Vec<JobRecord>) -> Vec<JobRecord> {
    for status in JobStatus::COLUMNS {
        let mut column: Vec<usize> = jobs
            .iter()
            .enumerate()
            .filter(|(_, job)| job.status == status)
            .map(|(i, _)| i)
            .collect();
        column.sort_by_key(|&i| jobs[i].order);
        for (position, i) in column.into_iter().enumerate() {
            jobs[i].order = position as i64;
        }
    }
    jobs
}

/// Starter board shown when nothing has been saved yet.
pub fn seed_jobs(now: DateTime<Utc>) -> Vec<JobRecord> {
    let job = |id: &str, company: &str, title: &str, location: &str, status, priority, notes: &str| {
        JobRecord {
            id: id.to_string(),
            company: company.to_string(),
            title: title.to_string(),
            location: Some(location.to_string()),
            url: None,
            status,
            priority,
            updated_at: now,
            notes: Some(notes.to_string()),
            order: 0,
        }
    };

    vec![
        job("1", "Acme Corp", "Software Engineer (Intern)", "Remote", JobStatus::Wishlist, Priority::High, ""),
        job("2", "Globex", "Data Scientist", "Boston, MA", JobStatus::Applied, Priority::Med, "Applied via referral"),
        job("3", "Initech", "Full-Stack Engineer", "NYC", JobStatus::Interview, Priority::High, "Phone screen scheduled"),
        job(
            "4",
            "Umbrella",
            "ML Engineer",
            "Remote",
            JobStatus::Offer,
            Priority::High,
            "Offer received \u{2013} review comp",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, status: JobStatus, order: i64) -> JobRecord {
        JobRecord {
            id: id.to_string(),
            company: "C".to_string(),
            title: "T".to_string(),
            location: None,
            url: None,
            status,
            priority: Priority::Med,
            updated_at: Utc::now(),
            notes: None,
            order,
        }
    }

    #[test]
    fn test_normalize_orders_is_dense_per_column() {
        let jobs = vec![
            record("a", JobStatus::Applied, 7),
            record("b", JobStatus::Wishlist, -1),
            record("c", JobStatus::Applied, 2),
            record("d", JobStatus::Wishlist, 3),
            record("e", JobStatus::Applied, 2),
        ];
        let out = normalize_orders(jobs);
        let view: Vec<(&str, i64)> = out.iter().map(|j| (j.id.as_str(), j.order)).collect();
        // c and e tie on 2; the stable sort keeps c first.
        assert_eq!(view, vec![("a", 2), ("b", 0), ("c", 0), ("d", 1), ("e", 1)]);
    }

    #[test]
    fn test_normalize_orders_is_idempotent() {
        let once = normalize_orders(seed_jobs(Utc::now()));
        let twice = normalize_orders(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_seed_has_four_jobs_across_columns() {
        let seed = seed_jobs(Utc::now());
        assert_eq!(seed.len(), 4);
        assert_eq!(seed[0].company, "Acme Corp");
        assert_eq!(seed[3].status, JobStatus::Offer);
    }

    #[test]
    fn test_json_uses_camel_case_and_display_names() {
        let value = serde_json::to_value(record("x", JobStatus::Interview, 0)).unwrap();
        assert_eq!(value["status"], "Interview");
        assert_eq!(value["priority"], "Med");
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("location").is_none(), "absent optionals are omitted");
    }
}
