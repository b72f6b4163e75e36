//! View models for the job list, bookmarks and detail screens.

use crate::state::SessionState;
use common::{Job, JobId};
use reqwest::Url;
use serde::Serialize;

pub const NOT_SPECIFIED: &str = "Not specified";
pub const NO_DESCRIPTION: &str = "No description provided.";
pub const NO_CATEGORY: &str = "Industry not specified";
pub const JOB_NOT_FOUND: &str =
    "Job not found. It may have been removed or is no longer available.";

/// Compact job summary shown in lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobCard {
    pub id: JobId,
    pub title: String,
    pub company_name: String,
    pub thumbnail: String,
    pub place: Option<String>,
    pub salary: Option<String>,
    pub experience: Option<String>,
    pub whatsapp_no: Option<String>,
    pub job_category: Option<String>,
    pub bookmarked: bool,
}

impl JobCard {
    pub fn new(job: &Job, bookmarked: bool) -> Self {
        let details = &job.primary_details;
        Self {
            id: job.id,
            title: job.title.clone(),
            company_name: job.company_name.clone(),
            thumbnail: job.thumbnail().to_string(),
            place: non_empty(&details.place),
            salary: non_empty(&details.salary),
            experience: non_empty(&details.experience),
            whatsapp_no: non_empty(&job.whatsapp_no),
            job_category: non_empty(&job.job_category),
            bookmarked,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.trim().is_empty()).map(str::to_string)
}

fn or_placeholder(value: &Option<String>, placeholder: &str) -> String {
    non_empty(value).unwrap_or_else(|| placeholder.to_string())
}

/// What the job list screen should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ListScreen {
    Loading,
    Error { message: String },
    Empty,
    Jobs {
        jobs: Vec<JobCard>,
        /// Show the "loading more" indicator below the list.
        footer_loading: bool,
    },
}

impl ListScreen {
    pub fn from_session(session: &SessionState) -> Self {
        if session.jobs.is_empty() {
            if session.loading {
                return ListScreen::Loading;
            }
            if let Some(message) = &session.error {
                return ListScreen::Error {
                    message: message.clone(),
                };
            }
            return ListScreen::Empty;
        }

        ListScreen::Jobs {
            jobs: cards(&session.jobs, session),
            footer_loading: session.has_more && session.loading,
        }
    }
}

/// What the bookmarks screen should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BookmarksScreen {
    Loading,
    Error { message: String },
    Empty,
    Jobs { jobs: Vec<JobCard> },
}

impl BookmarksScreen {
    pub fn from_session(session: &SessionState) -> Self {
        if session.loading && session.bookmarked_jobs.is_empty() {
            return BookmarksScreen::Loading;
        }
        if let Some(message) = &session.error {
            return BookmarksScreen::Error {
                message: message.clone(),
            };
        }
        if session.bookmarked_jobs.is_empty() {
            return BookmarksScreen::Empty;
        }
        BookmarksScreen::Jobs {
            jobs: cards(&session.bookmarked_jobs, session),
        }
    }
}

fn cards(jobs: &[Job], session: &SessionState) -> Vec<JobCard> {
    jobs.iter()
        .map(|job| JobCard::new(job, session.is_bookmarked(job.id)))
        .collect()
}

/// Ways to reach the employer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub phone: String,
    pub tel_url: String,
    pub whatsapp_url: Option<String>,
}

impl Contact {
    fn for_job(job: &Job) -> Option<Self> {
        let phone = non_empty(&job.whatsapp_no)?.trim().to_string();

        let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
        let message = format!("Hi, I'm interested in the job: {}", job.title);
        let whatsapp_url = Url::parse_with_params(
            &format!("https://wa.me/{}", digits),
            &[("text", message.as_str())],
        )
        .ok()
        .map(String::from);

        Some(Self {
            tel_url: format!("tel:{}", phone),
            phone,
            whatsapp_url,
        })
    }
}

/// Full job description screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDetail {
    pub id: JobId,
    pub title: String,
    pub company_name: String,
    pub image: String,
    pub location: String,
    pub salary: String,
    pub experience: String,
    pub education: String,
    pub job_type: Option<String>,
    pub description: String,
    pub category: String,
    pub bookmarked: bool,
    pub contact: Option<Contact>,
}

impl JobDetail {
    pub fn new(job: &Job, bookmarked: bool) -> Self {
        let details = &job.primary_details;
        Self {
            id: job.id,
            title: job.title.clone(),
            company_name: job.company_name.clone(),
            image: job.hero_image().to_string(),
            location: or_placeholder(&details.place, NOT_SPECIFIED),
            salary: or_placeholder(&details.salary, NOT_SPECIFIED),
            experience: or_placeholder(&details.experience, NOT_SPECIFIED),
            education: or_placeholder(&details.qualification, NOT_SPECIFIED),
            job_type: non_empty(&details.job_type),
            description: or_placeholder(&job.other_details, NO_DESCRIPTION),
            category: or_placeholder(&job.job_category, NO_CATEGORY),
            bookmarked,
            contact: Contact::for_job(job),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Creative, DEFAULT_IMAGE_URL};

    fn session_with(jobs: Vec<Job>, bookmarked: Vec<Job>) -> SessionState {
        SessionState {
            jobs,
            bookmarked_jobs: bookmarked,
            loading: false,
            ..SessionState::new()
        }
    }

    #[test]
    fn test_list_screen_states() {
        let mut session = SessionState::new();
        assert_eq!(ListScreen::from_session(&session), ListScreen::Loading);

        session.loading = false;
        assert_eq!(ListScreen::from_session(&session), ListScreen::Empty);

        session.error = Some("boom".to_string());
        assert_eq!(
            ListScreen::from_session(&session),
            ListScreen::Error {
                message: "boom".to_string()
            }
        );

        // Errors are not shown over an existing list.
        session.jobs = vec![Job::new(1, "Cook", "Cafe")];
        session.loading = true;
        match ListScreen::from_session(&session) {
            ListScreen::Jobs {
                jobs,
                footer_loading,
            } => {
                assert_eq!(jobs.len(), 1);
                assert!(footer_loading);
            }
            other => panic!("unexpected screen: {:?}", other),
        }
    }

    #[test]
    fn test_footer_hidden_when_exhausted() {
        let mut session = session_with(vec![Job::new(1, "a", "b")], vec![]);
        session.loading = true;
        session.has_more = false;
        assert!(matches!(
            ListScreen::from_session(&session),
            ListScreen::Jobs {
                footer_loading: false,
                ..
            }
        ));
    }

    #[test]
    fn test_bookmarks_screen_states() {
        let job = Job::new(3, "Driver", "Acme");
        let session = session_with(vec![job.clone()], vec![]);
        assert_eq!(BookmarksScreen::from_session(&session), BookmarksScreen::Empty);

        let session = session_with(vec![], vec![job.clone()]);
        match BookmarksScreen::from_session(&session) {
            BookmarksScreen::Jobs { jobs } => {
                assert_eq!(jobs[0].id, 3);
                assert!(jobs[0].bookmarked);
            }
            other => panic!("unexpected screen: {:?}", other),
        }

        let mut session = session_with(vec![], vec![job]);
        session.error = Some("Failed to load bookmarked jobs".to_string());
        assert!(matches!(
            BookmarksScreen::from_session(&session),
            BookmarksScreen::Error { .. }
        ));
    }

    #[test]
    fn test_card_marks_bookmarked_jobs() {
        let mut job = Job::new(1, "Cook", "Cafe");
        job.primary_details.place = Some("Delhi".to_string());
        job.primary_details.salary = Some("  ".to_string());
        let session = session_with(vec![job.clone()], vec![job]);

        let screen = ListScreen::from_session(&session);
        let ListScreen::Jobs { jobs, .. } = screen else {
            panic!("expected jobs");
        };
        assert!(jobs[0].bookmarked);
        assert_eq!(jobs[0].place.as_deref(), Some("Delhi"));
        assert_eq!(jobs[0].salary, None);
        assert_eq!(jobs[0].thumbnail, DEFAULT_IMAGE_URL);
    }

    #[test]
    fn test_detail_placeholders() {
        let detail = JobDetail::new(&Job::new(1, "Cook", "Cafe"), false);
        assert_eq!(detail.location, NOT_SPECIFIED);
        assert_eq!(detail.salary, NOT_SPECIFIED);
        assert_eq!(detail.experience, NOT_SPECIFIED);
        assert_eq!(detail.education, NOT_SPECIFIED);
        assert_eq!(detail.description, NO_DESCRIPTION);
        assert_eq!(detail.category, NO_CATEGORY);
        assert_eq!(detail.image, DEFAULT_IMAGE_URL);
        assert_eq!(detail.contact, None);
    }

    #[test]
    fn test_detail_contact_links() {
        let mut job = Job::new(1, "Cook", "Cafe");
        job.whatsapp_no = Some("+91 98765 43210".to_string());
        job.other_details = Some("Morning shift".to_string());
        job.creatives = Some(vec![Creative {
            file: "https://img/full.jpg".to_string(),
            thumb_url: "https://img/thumb.jpg".to_string(),
        }]);

        let detail = JobDetail::new(&job, true);
        assert!(detail.bookmarked);
        assert_eq!(detail.description, "Morning shift");
        assert_eq!(detail.image, "https://img/full.jpg");

        let contact = detail.contact.unwrap();
        assert_eq!(contact.tel_url, "tel:+91 98765 43210");
        let whatsapp = Url::parse(&contact.whatsapp_url.unwrap()).unwrap();
        assert_eq!(whatsapp.path(), "/919876543210");
        let text: Vec<_> = whatsapp.query_pairs().collect();
        assert_eq!(text[0].1, "Hi, I'm interested in the job: Cook");
    }
}
