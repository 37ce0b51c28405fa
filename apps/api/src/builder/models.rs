//! Structured résumé form state.
//!
//! Every list entry carries a stable id so clients can edit or remove it
//! without relying on positions. JSON is camelCase; missing fields default.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Header {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

impl Header {
    /// Non-empty contact fields in display order: location, email, phone, linkedin, github.
    pub fn contact_parts(&self) -> Vec<&str> {
        [
            self.location.as_deref(),
            Some(self.email.as_str()),
            Some(self.phone.as_str()),
            self.linkedin.as_deref(),
            self.github.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub location: Option<String>,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub title: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub location: Option<String>,
    /// Markdown.
    pub notes: Option<String>,
    pub project_links: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub title: String,
    /// Markdown.
    pub description: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub header: Header,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    /// Comma-separated skills, rendered as plain wrapped text.
    pub technical: String,
    /// Markdown.
    pub other: String,
}

/// The entry lists that can be added to or removed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySection {
    Education,
    Experience,
    Projects,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn remove_by_id<T>(items: &mut Vec<T>, id: &str, key: impl Fn(&T) -> &str) -> bool {
    let before = items.len();
    items.retain(|item| key(item) != id);
    items.len() != before
}

impl ResumeData {
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Example résumé used to prefill the form.
    pub fn seed() -> Self {
        Self {
            header: Header {
                name: "Alex Rivera".to_string(),
                email: "alex.rivera@example.com".to_string(),
                phone: "+1-555-010-2030".to_string(),
                location: Some("Portland, ME (open to relocation)".to_string()),
                linkedin: Some("linkedin.com/in/alex-rivera".to_string()),
                github: Some("github.com/alexrivera".to_string()),
            },
            education: vec![
                Education {
                    id: "1".to_string(),
                    school: "Northeastern University".to_string(),
                    degree: "Master of Science in Data Science".to_string(),
                    start: Some("Sep. 2025".to_string()),
                    end: Some("June 2027".to_string()),
                    location: Some("Portland, ME".to_string()),
                    gpa: Some("4.0".to_string()),
                },
                Education {
                    id: "2".to_string(),
                    school: "State Technical University".to_string(),
                    degree: "Bachelor of Science in Software Engineering".to_string(),
                    start: Some("Sep. 2017".to_string()),
                    end: Some("June 2022".to_string()),
                    location: Some("Springfield".to_string()),
                    gpa: None,
                },
            ],
            experience: vec![
                Experience {
                    id: "1".to_string(),
                    company: "Carbon Analytics Co.".to_string(),
                    title: "Front-end Developer".to_string(),
                    start: Some("Jan 2025".to_string()),
                    end: Some("July 2025".to_string()),
                    location: Some("Remote".to_string()),
                    notes: Some(
                        "- Built real-time emissions analytics dashboards using **React** + Redux\n\
                         - Cut reporting latency and boosted throughput by 30%"
                            .to_string(),
                    ),
                    project_links: vec!["Project Link".to_string()],
                },
                Experience {
                    id: "2".to_string(),
                    company: "Learning Labs".to_string(),
                    title: "Software Engineer".to_string(),
                    start: Some("Feb 2023".to_string()),
                    end: Some("Dec 2024".to_string()),
                    location: Some("Palo Alto, CA".to_string()),
                    notes: Some(
                        "- Built an adaptive learning platform with personalized paths and quizzes\n\
                         - Onboarded 2,000 students in 8 weeks and increased engagement by 50%"
                            .to_string(),
                    ),
                    project_links: vec!["Project 1 Link".to_string(), "Project 2 Link".to_string()],
                },
            ],
            projects: vec![Project {
                id: "p1".to_string(),
                title: "Subscriber Analytics for a Local News Trust".to_string(),
                description: "End-to-end ML pipeline for subscriber churn models and visualizations."
                    .to_string(),
                link: None,
            }],
            technical: "Python, JavaScript (ES6+), TypeScript, React, Next.js, FastAPI, Node.js, \
                        PostgreSQL, Redis, Docker, GCP, Machine Learning (scikit-learn, PyTorch)"
                .to_string(),
            other: String::new(),
        }
    }

    pub fn add_education(&mut self) -> String {
        let id = new_id();
        self.education.push(Education {
            id: id.clone(),
            ..Default::default()
        });
        id
    }

    pub fn add_experience(&mut self) -> String {
        let id = new_id();
        self.experience.push(Experience {
            id: id.clone(),
            ..Default::default()
        });
        id
    }

    pub fn add_project(&mut self) -> String {
        let id = new_id();
        self.projects.push(Project {
            id: id.clone(),
            ..Default::default()
        });
        id
    }

    pub fn remove_education(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.education, id, |e| e.id.as_str())
    }

    pub fn remove_experience(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.experience, id, |e| e.id.as_str())
    }

    pub fn remove_project(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.projects, id, |p| p.id.as_str())
    }

    /// Appends a blank entry to `section` and returns its id.
    pub fn add_entry(&mut self, section: EntrySection) -> String {
        match section {
            EntrySection::Education => self.add_education(),
            EntrySection::Experience => self.add_experience(),
            EntrySection::Projects => self.add_project(),
        }
    }

    pub fn remove_entry(&mut self, section: EntrySection, id: &str) -> bool {
        match section {
            EntrySection::Education => self.remove_education(id),
            EntrySection::Experience => self.remove_experience(id),
            EntrySection::Projects => self.remove_project(id),
        }
    }
}
