use std::collections::HashSet;

use crate::aggregate::{MarketDemand, PopulationStats};
use crate::models::{CurrentSkillStat, DemandLevel, SkillGap};

pub const MAX_REPORTED_GAPS: usize = 15;
pub const MAX_COMMON_ROLES: usize = 3;
pub const CRITICAL_SCORE: u32 = 70;

const SUB_SCORE_CAP: f64 = 50.0;

#[derive(Debug, Clone, Default)]
pub struct GapAnalysis {
    pub missing: Vec<SkillGap>,
    pub total_gaps: usize,
    // counted before truncation
    pub critical_gaps: usize,
}

pub fn importance_score(
    alumni_count: usize,
    population: usize,
    job_count: usize,
    jobs: usize,
) -> u32 {
    let alumni_score = share(alumni_count, population);
    let job_score = share(job_count, jobs);
    (alumni_score + job_score).round() as u32
}

fn share(count: usize, total: usize) -> f64 {
    (count as f64 / total.max(1) as f64 * SUB_SCORE_CAP).min(SUB_SCORE_CAP)
}

pub fn gap_demand_level(score: u32) -> DemandLevel {
    match score {
        71.. => DemandLevel::High,
        41..=70 => DemandLevel::Medium,
        _ => DemandLevel::Low,
    }
}

pub fn current_demand_level(job_count: usize) -> DemandLevel {
    match job_count {
        11.. => DemandLevel::High,
        6..=10 => DemandLevel::Medium,
        _ => DemandLevel::Low,
    }
}

fn common_roles(
    skill: &str,
    population: &PopulationStats,
    market: &MarketDemand,
) -> Vec<String> {
    let roles = match market.demand(skill) {
        Some(demand) if !demand.roles.is_empty() => demand.roles.as_slice(),
        _ => population.roles(skill),
    };
    roles.iter().take(MAX_COMMON_ROLES).cloned().collect()
}

/// Equal scores keep candidate order: peer skills first, then skills that only
/// appear in postings, each in first-seen order.
pub fn score_gaps(
    subject_skills: &[String],
    population: &PopulationStats,
    market: &MarketDemand,
) -> GapAnalysis {
    let owned: HashSet<&str> = subject_skills.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    let candidates = population
        .skills()
        .map(|entry| entry.skill.as_str())
        .chain(market.skills().map(|entry| entry.skill.as_str()))
        .filter(|skill| !owned.contains(skill))
        .filter(|skill| seen.insert(*skill));

    let mut gaps: Vec<SkillGap> = candidates
        .map(|skill| {
            let alumni_count = population.frequency(skill);
            let demand = market.demand(skill);
            let job_count = market.count(skill);
            let score =
                importance_score(alumni_count, population.population, job_count, market.jobs);

            SkillGap {
                skill: skill.to_string(),
                importance_score: score,
                alumni_with_skill: alumni_count,
                jobs_requiring: job_count,
                demand_level: gap_demand_level(score),
                avg_salary: demand.and_then(|d| d.salary_sample.clone()),
                common_roles: common_roles(skill, population, market),
            }
        })
        .collect();

    gaps.sort_by(|a, b| b.importance_score.cmp(&a.importance_score));

    let total_gaps = gaps.len();
    let critical_gaps = gaps
        .iter()
        .filter(|gap| gap.importance_score > CRITICAL_SCORE)
        .count();
    gaps.truncate(MAX_REPORTED_GAPS);

    GapAnalysis {
        missing: gaps,
        total_gaps,
        critical_gaps,
    }
}

pub fn value_current_skills(
    subject_skills: &[String],
    population: &PopulationStats,
    market: &MarketDemand,
) -> Vec<CurrentSkillStat> {
    subject_skills
        .iter()
        .map(|skill| {
            let demand = market.demand(skill);
            let job_count = market.count(skill);

            CurrentSkillStat {
                skill: skill.clone(),
                proficiency_level: "Intermediate".to_string(),
                alumni_with_skill: population.frequency(skill),
                jobs_requiring: job_count,
                demand_level: current_demand_level(job_count),
                market_value: demand.and_then(|d| d.salary_sample.clone()),
                common_roles: common_roles(skill, population, market),
            }
        })
        .collect()
}
