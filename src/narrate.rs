use std::collections::HashSet;

use crate::gaps::{GapAnalysis, CRITICAL_SCORE};
use crate::models::{
    ActionItem, ApplicationRecord, Insight, InsightKind, MentorshipInterest, PeerProfile,
    Priority, RecommendationBundle, RecommendationCategory, RecommendationItem, SkillItem,
    SubjectProfile,
};

const PRIORITY_SKILLS: usize = 5;
const NETWORK_TARGET: usize = 5;
const BUSY_APPLICATION_COUNT: usize = 3;

pub struct NarrationContext<'a> {
    pub subject: &'a SubjectProfile,
    pub gaps: &'a GapAnalysis,
    pub connected: &'a [PeerProfile],
    pub applications: &'a [ApplicationRecord],
    pub mentorship: &'a [MentorshipInterest],
}

fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

pub fn generate_insights(ctx: &NarrationContext<'_>) -> Vec<Insight> {
    let mut insights = vec![skill_coverage(ctx)];
    insights.extend(career_readiness(ctx));
    insights.push(network(ctx));
    insights.extend(high_impact_skills(ctx));
    insights
}

// coverage < 50 -> high, < 75 -> medium, otherwise low
fn skill_coverage(ctx: &NarrationContext<'_>) -> Insight {
    let held = ctx.subject.skills.len();
    let coverage = percentage(held, held + ctx.gaps.total_gaps);
    let branch = ctx.subject.branch.as_deref().unwrap_or("your branch");

    let (advice, priority) = match coverage {
        0..=49 => (
            "Focus on building foundational skills to catch up with your peers.",
            Priority::High,
        ),
        50..=74 => (
            "You're on the right track! Focus on high-demand skills to stand out.",
            Priority::Medium,
        ),
        _ => (
            "Excellent! You're well-positioned. Consider specializing in niche areas.",
            Priority::Low,
        ),
    };

    Insight {
        kind: InsightKind::SkillCoverage,
        title: "Your Skill Coverage".to_string(),
        message: format!(
            "You have {coverage}% of the skills commonly found in {branch} alumni. {advice}"
        ),
        score: Some(coverage),
        priority,
        actionable: false,
        action: None,
        skills: Vec::new(),
    }
}

// readiness < 60 -> high, otherwise medium
fn career_readiness(ctx: &NarrationContext<'_>) -> Option<Insight> {
    if ctx.applications.is_empty() {
        return None;
    }

    let mut applied: Vec<&str> = Vec::new();
    for skill in ctx.applications.iter().flat_map(|a| a.job_skills.iter()) {
        if !applied.contains(&skill.as_str()) {
            applied.push(skill);
        }
    }

    let owned: HashSet<&str> = ctx.subject.skills.iter().map(String::as_str).collect();
    let matching = applied.iter().filter(|skill| owned.contains(**skill)).count();
    let readiness = percentage(matching, applied.len());
    let count = ctx.applications.len();

    let (advice, priority) = if readiness < 60 {
        let missing: Vec<&str> = applied
            .iter()
            .copied()
            .filter(|skill| !owned.contains(skill))
            .take(3)
            .collect();
        (
            format!(
                "Focus on learning {} to improve your chances.",
                missing.join(", ")
            ),
            Priority::High,
        )
    } else {
        (
            "You're well-prepared for the roles you're targeting!".to_string(),
            Priority::Medium,
        )
    };

    Some(Insight {
        kind: InsightKind::CareerReadiness,
        title: "Job Application Readiness".to_string(),
        message: format!(
            "Based on your {count} job applications, you have {readiness}% of the required skills. {advice}"
        ),
        score: Some(readiness),
        priority,
        actionable: false,
        action: None,
        skills: Vec::new(),
    })
}

// connected alumni -> medium, none -> high
fn network(ctx: &NarrationContext<'_>) -> Insight {
    if ctx.connected.is_empty() {
        return Insight {
            kind: InsightKind::NetworkBuilding,
            title: "Build Your Network".to_string(),
            message: "You haven't connected with any alumni yet. Building connections can \
                      provide mentorship, job referrals, and insider knowledge about career paths."
                .to_string(),
            score: Some(0),
            priority: Priority::High,
            actionable: true,
            action: Some("Connect with alumni".to_string()),
            skills: Vec::new(),
        };
    }

    let owned: HashSet<&str> = ctx.subject.skills.iter().map(String::as_str).collect();
    let pool: HashSet<&str> = ctx
        .connected
        .iter()
        .flat_map(|alumni| alumni.skills.iter().map(String::as_str))
        .collect();
    let learnable = pool.iter().filter(|skill| !owned.contains(*skill)).count();

    let open_requests: Vec<&MentorshipInterest> = ctx
        .mentorship
        .iter()
        .filter(|request| matches!(request.status.as_str(), "pending" | "accepted"))
        .collect();
    let nudge = if open_requests.is_empty() {
        "Consider requesting mentorship sessions!".to_string()
    } else {
        let topics: Vec<&str> = open_requests
            .iter()
            .map(|request| request.topic.as_str())
            .take(3)
            .collect();
        format!(
            "Follow up with your {} open mentorship requests ({}).",
            open_requests.len(),
            topics.join(", ")
        )
    };

    Insight {
        kind: InsightKind::NetworkValue,
        title: "Your Network's Knowledge Pool".to_string(),
        message: format!(
            "Your {} connected alumni collectively have {} unique skills. You can learn {} new skills from them. {}",
            ctx.connected.len(),
            pool.len(),
            learnable,
            nudge
        ),
        score: Some(learnable as u32),
        priority: Priority::Medium,
        actionable: true,
        action: Some("Request mentorship".to_string()),
        skills: Vec::new(),
    }
}

// always high when present
fn high_impact_skills(ctx: &NarrationContext<'_>) -> Option<Insight> {
    let critical: Vec<&str> = ctx
        .gaps
        .missing
        .iter()
        .filter(|gap| gap.importance_score > CRITICAL_SCORE)
        .map(|gap| gap.skill.as_str())
        .collect();
    if critical.is_empty() {
        return None;
    }

    let named: Vec<&str> = critical.iter().copied().take(3).collect();
    Some(Insight {
        kind: InsightKind::HighImpactSkills,
        title: "High-Impact Skill Gaps".to_string(),
        message: format!(
            "{} critical skills are missing from your profile: {}. These are in high demand and \
             could significantly boost your career prospects.",
            ctx.gaps.critical_gaps,
            named.join(", ")
        ),
        score: None,
        priority: Priority::High,
        actionable: true,
        action: None,
        skills: critical.iter().take(5).map(|s| s.to_string()).collect(),
    })
}

fn action(action: &str, benefit: &str, priority: Option<Priority>) -> RecommendationItem {
    RecommendationItem::Action(ActionItem {
        action: action.to_string(),
        benefit: benefit.to_string(),
        priority,
    })
}

pub fn generate_recommendations(ctx: &NarrationContext<'_>) -> Vec<RecommendationBundle> {
    let mut bundles = Vec::new();

    let top: Vec<_> = ctx.gaps.missing.iter().take(PRIORITY_SKILLS).collect();
    if !top.is_empty() {
        bundles.push(RecommendationBundle {
            category: RecommendationCategory::SkillDevelopment,
            title: "Priority Skills to Learn".to_string(),
            description: "Based on market demand and alumni success patterns".to_string(),
            items: top
                .into_iter()
                .map(|gap| {
                    RecommendationItem::Skill(SkillItem {
                        skill: gap.skill.clone(),
                        reason: format!("{} jobs require this skill", gap.jobs_requiring),
                        demand: gap.demand_level,
                        estimated_time: "2-3 months".to_string(),
                        resources: vec![
                            "Online courses".to_string(),
                            "Practice projects".to_string(),
                            "Alumni mentorship".to_string(),
                        ],
                    })
                })
                .collect(),
            priority: Priority::High,
        });
    }

    if ctx.connected.len() < NETWORK_TARGET {
        bundles.push(RecommendationBundle {
            category: RecommendationCategory::Networking,
            title: "Expand Your Network".to_string(),
            description: "Connect with alumni who can guide your career path".to_string(),
            items: vec![
                action(
                    "Connect with 3-5 alumni in your target role",
                    "Get insider knowledge and potential referrals",
                    Some(Priority::High),
                ),
                action(
                    "Request mentorship from experienced professionals",
                    "Personalized guidance and skill development",
                    Some(Priority::Medium),
                ),
            ],
            priority: Priority::High,
        });
    }

    let pending = ctx
        .applications
        .iter()
        .filter(|a| a.status == "applied")
        .count();
    if pending > BUSY_APPLICATION_COUNT {
        bundles.push(RecommendationBundle {
            category: RecommendationCategory::JobSearch,
            title: "Optimize Your Job Search".to_string(),
            description: "Strategic approach to improve success rate".to_string(),
            items: vec![
                action(
                    "Focus on roles matching 70%+ of your skills",
                    "Higher chance of getting interviews",
                    None,
                ),
                action(
                    "Get resume reviewed by alumni in target companies",
                    "Insider tips and potential referrals",
                    None,
                ),
                action(
                    "Build projects showcasing missing skills",
                    "Demonstrate learning ability to employers",
                    None,
                ),
            ],
            priority: Priority::Medium,
        });
    }

    bundles.push(RecommendationBundle {
        category: RecommendationCategory::SkillValidation,
        title: "Validate Your Skills".to_string(),
        description: "Prove your expertise to employers".to_string(),
        items: vec![
            action(
                "Build portfolio projects",
                "Tangible proof of your abilities",
                Some(Priority::High),
            ),
            action(
                "Contribute to open source",
                "Real-world experience and visibility",
                Some(Priority::Medium),
            ),
            action(
                "Get certifications for key skills",
                "Industry-recognized credentials",
                Some(Priority::Medium),
            ),
        ],
        priority: Priority::Medium,
    });

    bundles
}
