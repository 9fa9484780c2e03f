use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SubjectProfile {
    pub id: Uuid,
    pub name: String,
    pub branch: Option<String>,
    pub cohort: Option<String>,
    pub skills: Vec<String>,
}

/// An alumni profile, used both as a population member and as a mentor.
#[derive(Debug, Clone)]
pub struct PeerProfile {
    pub id: Uuid,
    pub name: String,
    pub headline: Option<String>,
    pub skills: Vec<String>,
    pub year_of_passing: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct JobPosting {
    pub id: Uuid,
    pub title: String,
    pub skills: Vec<String>,
    pub salary: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApplicationRecord {
    pub job_title: String,
    pub job_skills: Vec<String>,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct MentorshipInterest {
    pub mentor_id: Uuid,
    pub topic: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustrySkill {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub demand_level: String,
    pub related_skills: Vec<String>,
    pub upvotes: i32,
    pub downvotes: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DemandLevel {
    High,
    Medium,
    Low,
}

impl DemandLevel {
    pub fn label(self) -> &'static str {
        match self {
            DemandLevel::High => "High",
            DemandLevel::Medium => "Medium",
            DemandLevel::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    pub skill: String,
    pub importance_score: u32,
    pub alumni_with_skill: usize,
    pub jobs_requiring: usize,
    pub demand_level: DemandLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_salary: Option<String>,
    pub common_roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSkillStat {
    pub skill: String,
    pub proficiency_level: String,
    pub alumni_with_skill: usize,
    pub jobs_requiring: usize,
    pub demand_level: DemandLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_value: Option<String>,
    pub common_roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    pub mentor_id: Uuid,
    pub mentor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentor_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<i32>,
    pub skills_to_learn: Vec<String>,
    pub estimated_time_to_reach: String,
    pub recommended_actions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerInsights {
    pub target_roles: Vec<String>,
    pub skills_needed_for_target_roles: Vec<String>,
    pub alumni_in_target_roles: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    SkillCoverage,
    CareerReadiness,
    NetworkValue,
    NetworkBuilding,
    HighImpactSkills,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub actionable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    SkillDevelopment,
    Networking,
    JobSearch,
    SkillValidation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillItem {
    pub skill: String,
    pub reason: String,
    pub demand: DemandLevel,
    pub estimated_time: String,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionItem {
    pub action: String,
    pub benefit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecommendationItem {
    Skill(SkillItem),
    Action(ActionItem),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationBundle {
    pub category: RecommendationCategory,
    pub title: String,
    pub description: String,
    pub items: Vec<RecommendationItem>,
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub name: String,
    pub branch: Option<String>,
    pub cohort: Option<String>,
    pub current_skills: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapAnalysis {
    pub current_skills: Vec<CurrentSkillStat>,
    pub missing_skills: Vec<SkillGap>,
    pub total_gaps: usize,
    pub critical_gaps: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPath {
    pub connected_alumni: usize,
    pub learning_paths: Vec<LearningPath>,
    pub career_insights: CareerInsights,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandSkill {
    pub skill: String,
    pub demand: usize,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketIntelligence {
    pub total_jobs_analyzed: usize,
    pub total_alumni_analyzed: usize,
    pub top_demand_skills: Vec<DemandSkill>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapReport {
    pub student: StudentSummary,
    pub skill_gap_analysis: SkillGapAnalysis,
    pub career_path: CareerPath,
    pub market_intelligence: MarketIntelligence,
    pub ai_insights: Vec<Insight>,
    pub recommendations: Vec<RecommendationBundle>,
}
