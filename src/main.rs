use std::path::PathBuf;

use anyhow::Context;
use chrono::{Datelike, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};
use uuid::Uuid;

mod aggregate;
mod analysis;
mod cache;
mod config;
mod db;
mod error;
mod gaps;
mod industry;
mod models;
mod narrate;
mod paths;
mod report;
mod skills;

use crate::aggregate::MarketDemand;
use crate::analysis::{AnalysisInput, BranchPopulations};
use crate::cache::{SystemClock, TtlCache};
use crate::config::Settings;
use crate::db::{ImportKind, SubjectKey};

#[derive(Parser)]
#[command(name = "alumni-skill-gap")]
#[command(about = "Skill-gap analysis for students against alumni and the job market", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SubjectArgs {
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    id: Option<Uuid>,
}

impl SubjectArgs {
    fn key(&self) -> anyhow::Result<SubjectKey<'_>> {
        match (&self.email, self.id) {
            (_, Some(id)) => Ok(SubjectKey::Id(id)),
            (Some(email), None) => Ok(SubjectKey::Email(email)),
            (None, None) => anyhow::bail!("pass --email or --id"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import profiles or job postings from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, value_enum)]
        kind: ImportKind,
    },
    /// Print the skill-gap analysis for one student as JSON
    Analyze {
        #[command(flatten)]
        subject: SubjectArgs,
        #[arg(long)]
        pretty: bool,
    },
    /// Generate a markdown report for one student
    Report {
        #[command(flatten)]
        subject: SubjectArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Rank the students of a cohort by critical skill gaps
    Cohort {
        #[arg(long)]
        cohort: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Compare one student with the skills alumni flag as industry requirements
    Industry {
        #[command(flatten)]
        subject: SubjectArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let settings = cli.settings;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await
        .context("failed to connect to Postgres")?;
    debug!(max_connections = settings.max_connections, "connected to Postgres");

    let current_year = Utc::now().year();

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv, kind } => {
            let inserted = db::import_csv(&pool, &csv, kind).await?;
            println!("Imported {inserted} rows from {}.", csv.display());
        }
        Commands::Analyze { subject, pretty } => {
            let student = db::fetch_subject(&pool, subject.key()?).await?;
            let input = db::load_analysis_input(&pool, &settings, student).await?;
            let report = analysis::analyze(&input, current_year);
            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{json}");
        }
        Commands::Report { subject, out } => {
            let student = db::fetch_subject(&pool, subject.key()?).await?;
            let input = db::load_analysis_input(&pool, &settings, student).await?;
            let report = report::build_report(&analysis::analyze(&input, current_year));
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Cohort { cohort, limit } => {
            let students = db::fetch_cohort_students(&pool, &cohort).await?;
            if students.is_empty() {
                println!("No students found in cohort {cohort}.");
                return Ok(());
            }

            let jobs = db::fetch_active_jobs(&pool, settings.job_limit).await?;
            let market = MarketDemand::from_jobs(&jobs);
            let mut populations: BranchPopulations<SystemClock> =
                TtlCache::new(Duration::seconds(settings.cache_ttl_secs));

            let (conn, population_limit) = (&pool, settings.population_limit);
            let mut reports = Vec::with_capacity(students.len());
            for student in students {
                let population = analysis::branch_population(
                    &mut populations,
                    student.branch.as_deref(),
                    |branch| async move {
                        db::fetch_branch_alumni(conn, Some(branch.as_str()), population_limit)
                            .await
                    },
                )
                .await?;

                let activity = db::fetch_student_activity(&pool, student.id).await?;
                let input = AnalysisInput {
                    subject: student,
                    population: Vec::new(),
                    jobs: Vec::new(),
                    connected: activity.connected,
                    applications: activity.applications,
                    mentorship: activity.mentorship,
                };
                reports.push(analysis::analyze_with(&input, &population, &market, current_year));
            }
            info!(
                students = reports.len(),
                branches = populations.len(),
                jobs = market.jobs,
                "cohort analyzed"
            );

            analysis::rank_cohort(&mut reports);

            println!("Students in cohort {cohort} by critical skill gaps:");
            for report in reports.iter().take(limit) {
                let gaps = &report.skill_gap_analysis;
                let top: Vec<&str> = gaps
                    .missing_skills
                    .iter()
                    .take(3)
                    .map(|gap| gap.skill.as_str())
                    .collect();
                println!(
                    "- {} ({}) {} critical / {} total gaps; top: {}",
                    report.student.name,
                    report.student.branch.as_deref().unwrap_or("no branch"),
                    gaps.critical_gaps,
                    gaps.total_gaps,
                    if top.is_empty() { "none".to_string() } else { top.join(", ") }
                );
            }
        }
        Commands::Industry { subject } => {
            let student = db::fetch_subject(&pool, subject.key()?).await?;
            let catalogue = db::fetch_industry_skills(&pool, settings.industry_limit).await?;
            let result = industry::match_industry_skills(&student.skills, &catalogue);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
