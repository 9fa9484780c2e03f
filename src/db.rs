use anyhow::Context;
use serde_json::{json, Value};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::AnalysisInput;
use crate::config::Settings;
use crate::error::AnalysisError;
use crate::models::{
    ApplicationRecord, IndustrySkill, JobPosting, MentorshipInterest, PeerProfile,
    SubjectProfile,
};
use crate::skills::{parse_skill_cell, parse_skills};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub enum SubjectKey<'a> {
    Email(&'a str),
    Id(Uuid),
}

impl std::fmt::Display for SubjectKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectKey::Email(email) => write!(f, "email {email}"),
            SubjectKey::Id(id) => write!(f, "id {id}"),
        }
    }
}

fn subject_from_row(row: &PgRow) -> SubjectProfile {
    SubjectProfile {
        id: row.get("id"),
        name: row.get("full_name"),
        branch: row.get("branch"),
        cohort: row.get("cohort"),
        skills: parse_skills(row.get("skills")),
    }
}

fn peer_from_row(row: &PgRow) -> PeerProfile {
    PeerProfile {
        id: row.get("id"),
        name: row.get("full_name"),
        headline: row.get("headline"),
        skills: parse_skills(row.get("skills")),
        year_of_passing: row.get("year_of_passing"),
    }
}

pub async fn fetch_subject(pool: &PgPool, key: SubjectKey<'_>) -> anyhow::Result<SubjectProfile> {
    let query = match key {
        SubjectKey::Email(email) => sqlx::query(
            "SELECT id, full_name, role, branch, cohort, skills \
             FROM alumni_skills.users WHERE email = $1",
        )
        .bind(email),
        SubjectKey::Id(id) => sqlx::query(
            "SELECT id, full_name, role, branch, cohort, skills \
             FROM alumni_skills.users WHERE id = $1",
        )
        .bind(id),
    };

    let row = query
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AnalysisError::SubjectNotFound(key.to_string()))?;

    let role: String = row.get("role");
    if role != "student" {
        return Err(AnalysisError::NotAStudent {
            name: row.get("full_name"),
            role,
        }
        .into());
    }

    Ok(subject_from_row(&row))
}

pub async fn fetch_cohort_students(
    pool: &PgPool,
    cohort: &str,
) -> anyhow::Result<Vec<SubjectProfile>> {
    let rows = sqlx::query(
        "SELECT id, full_name, branch, cohort, skills \
         FROM alumni_skills.users \
         WHERE role = 'student' AND cohort = $1 \
         ORDER BY full_name",
    )
    .bind(cohort)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(subject_from_row).collect())
}

pub async fn fetch_branch_alumni(
    pool: &PgPool,
    branch: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<PeerProfile>> {
    let Some(branch) = branch.filter(|b| !b.trim().is_empty()) else {
        return Ok(Vec::new());
    };

    let rows = sqlx::query(
        "SELECT id, full_name, headline, skills, year_of_passing \
         FROM alumni_skills.users \
         WHERE role = 'alumni' AND branch = $1 \
         LIMIT $2",
    )
    .bind(branch)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(peer_from_row).collect())
}

pub async fn fetch_active_jobs(pool: &PgPool, limit: i64) -> anyhow::Result<Vec<JobPosting>> {
    let rows = sqlx::query(
        "SELECT id, title, salary, skills \
         FROM alumni_skills.jobs \
         WHERE status = 'approved' \
         ORDER BY created_at DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| JobPosting {
            id: row.get("id"),
            title: row.get("title"),
            skills: parse_skills(row.get("skills")),
            salary: row.get("salary"),
        })
        .collect())
}

pub async fn fetch_connected_alumni(
    pool: &PgPool,
    student_id: Uuid,
) -> anyhow::Result<Vec<PeerProfile>> {
    let rows = sqlx::query(
        "SELECT u.id, u.full_name, u.headline, u.skills, u.year_of_passing \
         FROM alumni_skills.connections c \
         JOIN alumni_skills.users u \
           ON (c.responder_id = u.id AND c.requester_id = $1) \
           OR (c.requester_id = u.id AND c.responder_id = $1) \
         WHERE c.status = 'accepted' AND u.role = 'alumni'",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(peer_from_row).collect())
}

pub async fn fetch_applications(
    pool: &PgPool,
    student_id: Uuid,
) -> anyhow::Result<Vec<ApplicationRecord>> {
    let rows = sqlx::query(
        "SELECT j.title, j.skills, a.status \
         FROM alumni_skills.applications a \
         JOIN alumni_skills.jobs j ON j.id = a.job_id \
         WHERE a.applicant_id = $1 \
         ORDER BY a.applied_at DESC",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| ApplicationRecord {
            job_title: row.get("title"),
            job_skills: parse_skills(row.get("skills")),
            status: row.get("status"),
        })
        .collect())
}

pub async fn fetch_mentorship_requests(
    pool: &PgPool,
    student_id: Uuid,
) -> anyhow::Result<Vec<MentorshipInterest>> {
    let rows = sqlx::query(
        "SELECT mentor_id, topic, status \
         FROM alumni_skills.mentorship_requests \
         WHERE student_id = $1",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| MentorshipInterest {
            mentor_id: row.get("mentor_id"),
            topic: row.get("topic"),
            status: row.get("status"),
        })
        .collect())
}

pub async fn fetch_industry_skills(
    pool: &PgPool,
    limit: i64,
) -> anyhow::Result<Vec<IndustrySkill>> {
    let rows = sqlx::query(
        "SELECT id, skill_name, category, demand_level, related_skills, upvotes, downvotes \
         FROM alumni_skills.industry_skills \
         WHERE is_active \
         ORDER BY upvotes - downvotes DESC, skill_name \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| IndustrySkill {
            id: row.get("id"),
            name: row.get("skill_name"),
            category: row.get("category"),
            demand_level: row.get("demand_level"),
            related_skills: parse_skills(row.get("related_skills")),
            upvotes: row.get("upvotes"),
            downvotes: row.get("downvotes"),
        })
        .collect())
}

pub struct StudentActivity {
    pub connected: Vec<PeerProfile>,
    pub applications: Vec<ApplicationRecord>,
    pub mentorship: Vec<MentorshipInterest>,
}

pub async fn fetch_student_activity(
    pool: &PgPool,
    student_id: Uuid,
) -> anyhow::Result<StudentActivity> {
    let (connected, applications, mentorship) = tokio::try_join!(
        fetch_connected_alumni(pool, student_id),
        fetch_applications(pool, student_id),
        fetch_mentorship_requests(pool, student_id),
    )?;

    Ok(StudentActivity {
        connected,
        applications,
        mentorship,
    })
}

pub async fn load_analysis_input(
    pool: &PgPool,
    settings: &Settings,
    subject: SubjectProfile,
) -> anyhow::Result<AnalysisInput> {
    let (population, jobs, activity) = tokio::try_join!(
        fetch_branch_alumni(pool, subject.branch.as_deref(), settings.population_limit),
        fetch_active_jobs(pool, settings.job_limit),
        fetch_student_activity(pool, subject.id),
    )?;

    debug!(
        student = %subject.id,
        population = population.len(),
        jobs = jobs.len(),
        connected = activity.connected.len(),
        "loaded analysis input"
    );

    Ok(AnalysisInput {
        subject,
        population,
        jobs,
        connected: activity.connected,
        applications: activity.applications,
        mentorship: activity.mentorship,
    })
}

#[allow(clippy::too_many_arguments)]
async fn upsert_user(
    pool: &PgPool,
    full_name: &str,
    email: &str,
    role: &str,
    branch: Option<&str>,
    cohort: Option<&str>,
    year_of_passing: Option<i32>,
    headline: Option<&str>,
    skills: Option<Value>,
) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query(
        r#"
        INSERT INTO alumni_skills.users
        (id, full_name, email, role, branch, cohort, year_of_passing, headline, skills)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (email) DO UPDATE
        SET full_name = EXCLUDED.full_name,
            role = EXCLUDED.role,
            branch = EXCLUDED.branch,
            cohort = EXCLUDED.cohort,
            year_of_passing = EXCLUDED.year_of_passing,
            headline = EXCLUDED.headline,
            skills = EXCLUDED.skills
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(full_name)
    .bind(email)
    .bind(role)
    .bind(branch)
    .bind(cohort)
    .bind(year_of_passing)
    .bind(headline)
    .bind(skills)
    .fetch_one(pool)
    .await?
    .get("id");

    Ok(id)
}

async fn insert_job(
    pool: &PgPool,
    source_key: &str,
    title: &str,
    company: &str,
    salary: Option<&str>,
    skills: Value,
    status: &str,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO alumni_skills.jobs (id, source_key, title, company, salary, skills, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(source_key)
    .bind(title)
    .bind(company)
    .bind(salary)
    .bind(skills)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

async fn id_for(pool: &PgPool, query: &str, key: &str) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query(query)
        .bind(key)
        .fetch_one(pool)
        .await
        .with_context(|| format!("no row for {key}"))?
        .get("id");
    Ok(id)
}

async fn user_id(pool: &PgPool, email: &str) -> anyhow::Result<Uuid> {
    id_for(pool, "SELECT id FROM alumni_skills.users WHERE email = $1", email).await
}

async fn job_id(pool: &PgPool, source_key: &str) -> anyhow::Result<Uuid> {
    id_for(pool, "SELECT id FROM alumni_skills.jobs WHERE source_key = $1", source_key).await
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let users = vec![
        (
            "Isha Kulkarni",
            "isha.kulkarni@alumni-connect.edu",
            "student",
            "Computer Engineering",
            Some("2026"),
            None,
            None,
            json!(["Python", "SQL", "Git"]),
        ),
        // written by the legacy profile form, which stored a JSON string
        (
            "Rohan Verma",
            "rohan.verma@alumni-connect.edu",
            "student",
            "Computer Engineering",
            Some("2026"),
            None,
            None,
            json!("[\"Java\",\"HTML\",\"CSS\"]"),
        ),
        (
            "Sara Khan",
            "sara.khan@alumni-connect.edu",
            "student",
            "Information Technology",
            Some("2025"),
            None,
            None,
            json!(["JavaScript"]),
        ),
        (
            "Ananya Rao",
            "ananya.rao@alumni-connect.edu",
            "alumni",
            "Computer Engineering",
            None,
            Some(2018),
            Some("Senior Backend Engineer at Flipkart"),
            json!(["Python", "Go", "Kubernetes", "PostgreSQL", "Docker", "AWS"]),
        ),
        (
            "Karan Shah",
            "karan.shah@alumni-connect.edu",
            "alumni",
            "Computer Engineering",
            None,
            Some(2020),
            Some("Frontend Engineer at Razorpay"),
            json!(["JavaScript", "React", "TypeScript", "CSS", "Git"]),
        ),
        (
            "Priya Nair",
            "priya.nair@alumni-connect.edu",
            "alumni",
            "Computer Engineering",
            None,
            Some(2016),
            Some("Data Engineer at Swiggy"),
            json!(["Python", "SQL", "Spark", "Airflow", "AWS"]),
        ),
        (
            "Vikram Das",
            "vikram.das@alumni-connect.edu",
            "alumni",
            "Computer Engineering",
            None,
            Some(2021),
            Some("Full Stack Developer"),
            json!(["React", "Node.js", "PostgreSQL", "Docker"]),
        ),
        (
            "Meera Iyer",
            "meera.iyer@alumni-connect.edu",
            "alumni",
            "Computer Engineering",
            None,
            Some(2019),
            None,
            Value::Null,
        ),
        (
            "Nikhil Bose",
            "nikhil.bose@alumni-connect.edu",
            "alumni",
            "Information Technology",
            None,
            Some(2017),
            Some("Cloud Engineer at Infosys"),
            json!(["AWS", "Terraform", "Linux", "JavaScript"]),
        ),
    ];

    for (name, email, role, branch, cohort, year, headline, skills) in users {
        upsert_user(
            pool,
            name,
            email,
            role,
            Some(branch),
            cohort,
            year,
            headline,
            Some(skills),
        )
        .await?;
    }

    let jobs = vec![
        (
            "seed-job-001",
            "Backend Engineer",
            "Zerodha",
            Some("18-24 LPA"),
            json!(["Go", "PostgreSQL", "Docker"]),
            "approved",
        ),
        (
            "seed-job-002",
            "Data Engineer",
            "Swiggy",
            Some("15-20 LPA"),
            json!(["Python", "Spark", "Airflow", "SQL"]),
            "approved",
        ),
        (
            "seed-job-003",
            "Frontend Developer",
            "Razorpay",
            None,
            json!(["React", "TypeScript", "CSS"]),
            "approved",
        ),
        (
            "seed-job-004",
            "Cloud Associate",
            "Infosys",
            Some("8 LPA"),
            json!("[\"AWS\",\"Linux\",\"Python\"]"),
            "approved",
        ),
        (
            "seed-job-005",
            "Platform Intern",
            "Flipkart",
            Some("60k/month"),
            json!(["Kubernetes", "Docker", "Go"]),
            "approved",
        ),
        ("seed-job-006", "QA Analyst", "TCS", None, json!(["Selenium"]), "pending"),
    ];

    for (source_key, title, company, salary, skills, status) in jobs {
        insert_job(pool, source_key, title, company, salary, skills, status).await?;
    }

    let connections = vec![
        ("isha.kulkarni@alumni-connect.edu", "ananya.rao@alumni-connect.edu", "accepted"),
        ("priya.nair@alumni-connect.edu", "isha.kulkarni@alumni-connect.edu", "accepted"),
        ("isha.kulkarni@alumni-connect.edu", "karan.shah@alumni-connect.edu", "pending"),
        ("rohan.verma@alumni-connect.edu", "karan.shah@alumni-connect.edu", "accepted"),
    ];

    for (requester, responder, status) in connections {
        let requester_id = user_id(pool, requester).await?;
        let responder_id = user_id(pool, responder).await?;
        sqlx::query(
            r#"
            INSERT INTO alumni_skills.connections (id, requester_id, responder_id, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (requester_id, responder_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(requester_id)
        .bind(responder_id)
        .bind(status)
        .execute(pool)
        .await?;
    }

    let applications = vec![
        ("isha.kulkarni@alumni-connect.edu", "seed-job-002", "applied"),
        ("isha.kulkarni@alumni-connect.edu", "seed-job-004", "screening"),
        ("rohan.verma@alumni-connect.edu", "seed-job-003", "applied"),
    ];

    for (email, source_key, status) in applications {
        let applicant_id = user_id(pool, email).await?;
        let job_id = job_id(pool, source_key).await?;
        sqlx::query(
            r#"
            INSERT INTO alumni_skills.applications (id, job_id, applicant_id, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (job_id, applicant_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job_id)
        .bind(applicant_id)
        .bind(status)
        .execute(pool)
        .await?;
    }

    let mentorship = vec![
        (
            "isha.kulkarni@alumni-connect.edu",
            "priya.nair@alumni-connect.edu",
            "Breaking into data engineering",
            "pending",
        ),
        (
            "rohan.verma@alumni-connect.edu",
            "karan.shah@alumni-connect.edu",
            "React portfolio review",
            "accepted",
        ),
    ];

    for (student, mentor, topic, status) in mentorship {
        let student_id = user_id(pool, student).await?;
        let mentor_id = user_id(pool, mentor).await?;
        sqlx::query(
            r#"
            INSERT INTO alumni_skills.mentorship_requests (id, student_id, mentor_id, topic, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (student_id, mentor_id, topic) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(mentor_id)
        .bind(topic)
        .bind(status)
        .execute(pool)
        .await?;
    }

    let industry = vec![
        ("Kubernetes", "tool", "software", "high", json!(["Docker", "Linux"]), 24, 2),
        ("TypeScript", "language", "software", "high", json!(["JavaScript"]), 31, 1),
        ("dbt", "tool", "data_science", "medium", json!(["SQL"]), 12, 3),
        ("System Design", "technical", "software", "high", json!(["Java", "Go"]), 40, 0),
        ("Stakeholder Communication", "soft_skill", "software", "medium", Value::Null, 9, 1),
    ];

    for (name, category, field, demand, related, upvotes, downvotes) in industry {
        sqlx::query(
            r#"
            INSERT INTO alumni_skills.industry_skills
            (id, skill_name, category, industry, demand_level, related_skills, upvotes, downvotes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (skill_name) DO UPDATE
            SET upvotes = EXCLUDED.upvotes, downvotes = EXCLUDED.downvotes
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(category)
        .bind(field)
        .bind(demand)
        .bind(related)
        .bind(upvotes)
        .bind(downvotes)
        .execute(pool)
        .await?;
    }

    info!("seed data applied");
    Ok(())
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ImportKind {
    Profiles,
    Jobs,
}

pub async fn import_csv(
    pool: &PgPool,
    csv_path: &std::path::Path,
    kind: ImportKind,
) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct ProfileRow {
        full_name: String,
        email: String,
        role: String,
        branch: Option<String>,
        cohort: Option<String>,
        year_of_passing: Option<i32>,
        headline: Option<String>,
        skills: Option<String>,
    }

    #[derive(serde::Deserialize)]
    struct JobRow {
        source_key: Option<String>,
        title: String,
        company: String,
        salary: Option<String>,
        skills: Option<String>,
        status: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    match kind {
        ImportKind::Profiles => {
            for result in reader.deserialize::<ProfileRow>() {
                let row = result?;
                let skills = parse_skill_cell(row.skills.as_deref().unwrap_or_default());
                upsert_user(
                    pool,
                    &row.full_name,
                    &row.email,
                    &row.role,
                    row.branch.as_deref(),
                    row.cohort.as_deref(),
                    row.year_of_passing,
                    row.headline.as_deref(),
                    Some(json!(skills)),
                )
                .await?;
                inserted += 1;
            }
        }
        ImportKind::Jobs => {
            for result in reader.deserialize::<JobRow>() {
                let row = result?;
                let skills = parse_skill_cell(row.skills.as_deref().unwrap_or_default());
                let source_key = row
                    .source_key
                    .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));
                let added = insert_job(
                    pool,
                    &source_key,
                    &row.title,
                    &row.company,
                    row.salary.as_deref(),
                    json!(skills),
                    row.status.as_deref().unwrap_or("approved"),
                )
                .await?;
                if added {
                    inserted += 1;
                }
            }
        }
    }

    debug!(path = %csv_path.display(), inserted, "csv import finished");
    Ok(inserted)
}
