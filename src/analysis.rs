use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::aggregate::{MarketDemand, PopulationStats};
use crate::cache::{Clock, TtlCache};
use crate::gaps::{self, MAX_COMMON_ROLES};
use crate::models::{
    ApplicationRecord, CareerPath, JobPosting, MarketIntelligence, MentorshipInterest,
    PeerProfile, SkillGapAnalysis, SkillGapReport, StudentSummary, SubjectProfile,
};
use crate::narrate::{self, NarrationContext};
use crate::paths;

const TOP_DEMAND_SKILLS: usize = 10;

#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub subject: SubjectProfile,
    pub population: Vec<PeerProfile>,
    pub jobs: Vec<JobPosting>,
    pub connected: Vec<PeerProfile>,
    pub applications: Vec<ApplicationRecord>,
    pub mentorship: Vec<MentorshipInterest>,
}

pub fn analyze(input: &AnalysisInput, current_year: i32) -> SkillGapReport {
    let population = PopulationStats::from_peers(&input.population);
    let market = MarketDemand::from_jobs(&input.jobs);
    analyze_with(input, &population, &market, current_year)
}

/// `input.population` and `input.jobs` are ignored.
pub fn analyze_with(
    input: &AnalysisInput,
    population: &PopulationStats,
    market: &MarketDemand,
    current_year: i32,
) -> SkillGapReport {
    let subject = &input.subject;
    let skills = &subject.skills;

    let gap_analysis = gaps::score_gaps(skills, population, market);
    let current = gaps::value_current_skills(skills, population, market);
    let learning_paths = paths::build_learning_paths(&input.connected, skills, current_year);
    let career_insights = paths::career_insights(&input.applications, &input.connected, skills);

    debug!(
        student = %subject.id,
        total_gaps = gap_analysis.total_gaps,
        critical_gaps = gap_analysis.critical_gaps,
        population = population.population,
        jobs = market.jobs,
        "scored skill gaps"
    );

    let ctx = NarrationContext {
        subject,
        gaps: &gap_analysis,
        connected: &input.connected,
        applications: &input.applications,
        mentorship: &input.mentorship,
    };
    let ai_insights = narrate::generate_insights(&ctx);
    let recommendations = narrate::generate_recommendations(&ctx);

    SkillGapReport {
        student: StudentSummary {
            name: subject.name.clone(),
            branch: subject.branch.clone(),
            cohort: subject.cohort.clone(),
            current_skills: skills.len(),
        },
        skill_gap_analysis: SkillGapAnalysis {
            current_skills: current,
            total_gaps: gap_analysis.total_gaps,
            critical_gaps: gap_analysis.critical_gaps,
            missing_skills: gap_analysis.missing,
        },
        career_path: CareerPath {
            connected_alumni: input.connected.len(),
            learning_paths,
            career_insights,
        },
        market_intelligence: MarketIntelligence {
            total_jobs_analyzed: market.jobs,
            total_alumni_analyzed: population.population,
            top_demand_skills: market.top(TOP_DEMAND_SKILLS, MAX_COMMON_ROLES),
        },
        ai_insights,
        recommendations,
    }
}

pub type BranchPopulations<C> = TtlCache<String, Arc<PopulationStats>, C>;

pub async fn branch_population<C, F, Fut>(
    cache: &mut BranchPopulations<C>,
    branch: Option<&str>,
    fetch: F,
) -> anyhow::Result<Arc<PopulationStats>>
where
    C: Clock,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = anyhow::Result<Vec<PeerProfile>>>,
{
    let Some(branch) = branch.filter(|b| !b.trim().is_empty()) else {
        return Ok(Arc::new(PopulationStats::default()));
    };

    let key = branch.to_string();
    cache
        .get_or_try_insert_with(key.clone(), || async move {
            let peers = fetch(key).await?;
            debug!(peers = peers.len(), "fetched branch population");
            Ok(Arc::new(PopulationStats::from_peers(&peers)))
        })
        .await
}

pub fn rank_cohort(reports: &mut [SkillGapReport]) {
    reports.sort_by(|a, b| {
        let a = &a.skill_gap_analysis;
        let b = &b.skill_gap_analysis;
        b.critical_gaps
            .cmp(&a.critical_gaps)
            .then(b.total_gaps.cmp(&a.total_gaps))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SystemClock;
    use crate::models::DemandLevel;
    use chrono::Duration;
    use serde_json::json;
    use uuid::Uuid;

    fn to_vec(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn peer(skills: &[&str]) -> PeerProfile {
        PeerProfile {
            id: Uuid::new_v4(),
            name: "Vikram Das".to_string(),
            headline: Some("Frontend Engineer".to_string()),
            skills: to_vec(skills),
            year_of_passing: Some(2021),
        }
    }

    fn input(skills: &[&str]) -> AnalysisInput {
        named("Isha Kulkarni", skills)
    }

    fn named(name: &str, skills: &[&str]) -> AnalysisInput {
        AnalysisInput {
            subject: SubjectProfile {
                id: Uuid::new_v4(),
                name: name.to_string(),
                branch: Some("Computer Engineering".to_string()),
                cohort: Some("2026".to_string()),
                skills: to_vec(skills),
            },
            population: Vec::new(),
            jobs: Vec::new(),
            connected: Vec::new(),
            applications: Vec::new(),
            mentorship: Vec::new(),
        }
    }

    #[test]
    fn react_scenario_end_to_end() {
        let mut data = input(&["Python"]);
        data.population = (0..6).map(|_| peer(&["React"])).collect();
        data.population.extend((0..4).map(|_| peer(&["HTML"])));
        data.jobs = (0..5)
            .map(|_| JobPosting {
                id: Uuid::new_v4(),
                title: "Frontend Developer".to_string(),
                skills: to_vec(&["React"]),
                salary: None,
            })
            .collect();

        let report = analyze(&data, 2026);
        let gaps = &report.skill_gap_analysis;
        let react = gaps
            .missing_skills
            .iter()
            .find(|g| g.skill == "React")
            .expect("react gap");
        assert_eq!(react.importance_score, 80);
        assert_eq!(react.demand_level, DemandLevel::High);
        assert_eq!(gaps.missing_skills[0].skill, "React");
        assert_eq!(gaps.total_gaps, 2);
        assert_eq!(gaps.critical_gaps, 1);
        assert_eq!(report.market_intelligence.total_alumni_analyzed, 10);
        assert_eq!(report.market_intelligence.top_demand_skills[0].demand, 5);
    }

    #[test]
    fn empty_world_yields_empty_analysis() {
        let report = analyze(&input(&["Go"]), 2026);
        let gaps = &report.skill_gap_analysis;
        assert!(gaps.missing_skills.is_empty());
        assert_eq!(gaps.total_gaps, 0);
        assert_eq!(gaps.critical_gaps, 0);
        assert_eq!(gaps.current_skills.len(), 1);
        assert_eq!(report.student.current_skills, 1);
        assert!(report.career_path.learning_paths.is_empty());
    }

    #[test]
    fn payload_uses_camel_case_shape() {
        let mut data = input(&["A"]);
        data.connected = vec![peer(&["A", "B", "C", "D", "E", "F"])];

        let value = serde_json::to_value(analyze(&data, 2026)).expect("serialize");
        assert_eq!(value["student"]["currentSkills"], json!(1));
        assert_eq!(value["skillGapAnalysis"]["totalGaps"], json!(0));
        assert_eq!(value["careerPath"]["connectedAlumni"], json!(1));
        assert_eq!(
            value["careerPath"]["learningPaths"][0]["estimatedTimeToReach"],
            json!("3-4 months")
        );
        assert_eq!(value["marketIntelligence"]["totalJobsAnalyzed"], json!(0));
        assert_eq!(value["aiInsights"][0]["type"], json!("skill_coverage"));
        assert_eq!(value["aiInsights"][0]["priority"], json!("low"));
        assert!(value["recommendations"].as_array().is_some());
    }

    fn ranked(name: &str, critical: usize, total: usize) -> SkillGapReport {
        let mut report = analyze(&named(name, &[]), 2026);
        report.skill_gap_analysis.critical_gaps = critical;
        report.skill_gap_analysis.total_gaps = total;
        report
    }

    #[test]
    fn cohort_ranks_by_critical_then_total() {
        let mut reports = vec![
            ranked("Aarav", 1, 9),
            ranked("Bhavna", 3, 4),
            ranked("Chetan", 1, 12),
            ranked("Diya", 0, 20),
        ];

        rank_cohort(&mut reports);
        let names: Vec<_> = reports.iter().map(|r| r.student.name.as_str()).collect();
        assert_eq!(names, vec!["Bhavna", "Chetan", "Aarav", "Diya"]);
    }

    #[test]
    fn cohort_ties_keep_input_order() {
        let mut reports = vec![
            ranked("Esha", 2, 5),
            ranked("Farhan", 2, 5),
            ranked("Gauri", 2, 5),
        ];

        rank_cohort(&mut reports);
        let names: Vec<_> = reports.iter().map(|r| r.student.name.as_str()).collect();
        assert_eq!(names, vec!["Esha", "Farhan", "Gauri"]);
    }

    #[test]
    fn shared_aggregates_score_each_student_separately() {
        let peers: Vec<PeerProfile> = (0..4).map(|_| peer(&["React", "SQL"])).collect();
        let population = PopulationStats::from_peers(&peers);
        let market = MarketDemand::default();

        let first = analyze_with(&named("Harsh", &["React"]), &population, &market, 2026);
        let second = analyze_with(&named("Ira", &["Go"]), &population, &market, 2026);

        assert_eq!(first.skill_gap_analysis.total_gaps, 1);
        assert_eq!(second.skill_gap_analysis.total_gaps, 2);
        assert_eq!(first.market_intelligence.total_alumni_analyzed, 4);
        assert_eq!(second.market_intelligence.total_alumni_analyzed, 4);
    }

    #[tokio::test]
    async fn branch_population_is_fetched_once_per_branch() {
        let mut cache: BranchPopulations<SystemClock> = TtlCache::new(Duration::seconds(300));
        let mut fetched = Vec::new();

        for branch in ["Computer Engineering", "Mechanical", "Computer Engineering"] {
            let stats = branch_population(&mut cache, Some(branch), |key| {
                fetched.push(key);
                async { Ok(vec![peer(&["React"]), peer(&["SQL"])]) }
            })
            .await
            .expect("population");
            assert_eq!(stats.population, 2);
        }

        assert_eq!(fetched, vec!["Computer Engineering", "Mechanical"]);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn blank_and_missing_branches_skip_the_fetch() {
        let mut cache: BranchPopulations<SystemClock> = TtlCache::new(Duration::seconds(300));
        let mut calls = 0;

        for branch in [None, Some(""), Some("   ")] {
            let stats = branch_population(&mut cache, branch, |_| {
                calls += 1;
                async { Ok(vec![peer(&["React"])]) }
            })
            .await
            .expect("population");
            assert_eq!(stats.population, 0);
        }

        assert_eq!(calls, 0);
        assert_eq!(cache.len(), 0);
    }
}
