use std::fmt::Write;

use crate::models::{Priority, RecommendationItem, SkillGapReport};

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    }
}

pub fn build_report(report: &SkillGapReport) -> String {
    let mut output = String::new();
    let student = &report.student;
    let gaps = &report.skill_gap_analysis;

    let _ = writeln!(output, "# Skill Gap Report: {}", student.name);
    let _ = writeln!(
        output,
        "Branch {} / cohort {} / {} skills on profile",
        student.branch.as_deref().unwrap_or("unknown"),
        student.cohort.as_deref().unwrap_or("unknown"),
        student.current_skills
    );
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Skill Gaps ({} total, {} critical)",
        gaps.total_gaps, gaps.critical_gaps
    );

    if gaps.missing_skills.is_empty() {
        let _ = writeln!(output, "No skill gaps found against peers or open roles.");
    } else {
        for gap in &gaps.missing_skills {
            let _ = write!(
                output,
                "- {}: score {} ({} demand), {} alumni, {} jobs",
                gap.skill,
                gap.importance_score,
                gap.demand_level.label(),
                gap.alumni_with_skill,
                gap.jobs_requiring
            );
            if let Some(salary) = &gap.avg_salary {
                let _ = write!(output, ", salary {salary}");
            }
            let _ = writeln!(output);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Current Skills");

    if gaps.current_skills.is_empty() {
        let _ = writeln!(output, "No skills listed on the profile.");
    } else {
        for stat in &gaps.current_skills {
            let _ = writeln!(
                output,
                "- {}: {} demand, {} alumni, {} jobs",
                stat.skill,
                stat.demand_level.label(),
                stat.alumni_with_skill,
                stat.jobs_requiring
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Learning Paths ({} connected alumni)",
        report.career_path.connected_alumni
    );

    if report.career_path.learning_paths.is_empty() {
        let _ = writeln!(output, "No connected alumni to learn from yet.");
    } else {
        for path in &report.career_path.learning_paths {
            let skills = if path.skills_to_learn.is_empty() {
                "nothing new".to_string()
            } else {
                path.skills_to_learn.join(", ")
            };
            let _ = writeln!(
                output,
                "- {} ({}): {} in {}",
                path.mentor_name,
                path.mentor_role.as_deref().unwrap_or("alumni"),
                skills,
                path.estimated_time_to_reach
            );
        }
    }

    let market = &report.market_intelligence;
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Market ({} jobs, {} alumni analyzed)",
        market.total_jobs_analyzed, market.total_alumni_analyzed
    );

    if market.top_demand_skills.is_empty() {
        let _ = writeln!(output, "No active job postings in this window.");
    } else {
        for skill in &market.top_demand_skills {
            let _ = writeln!(
                output,
                "- {}: {} postings ({})",
                skill.skill,
                skill.demand,
                skill.roles.join(", ")
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Insights");
    for insight in &report.ai_insights {
        let _ = writeln!(
            output,
            "- [{}] {}: {}",
            priority_label(insight.priority),
            insight.title,
            insight.message
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendations");
    for bundle in &report.recommendations {
        let _ = writeln!(
            output,
            "### {} ({} priority)",
            bundle.title,
            priority_label(bundle.priority)
        );
        for item in &bundle.items {
            match item {
                RecommendationItem::Skill(skill) => {
                    let _ = writeln!(output, "- {}: {}", skill.skill, skill.reason);
                }
                RecommendationItem::Action(action) => {
                    let _ = writeln!(output, "- {} ({})", action.action, action.benefit);
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisInput};
    use crate::models::{JobPosting, PeerProfile, SubjectProfile};
    use uuid::Uuid;

    fn sample_input() -> AnalysisInput {
        AnalysisInput {
            subject: SubjectProfile {
                id: Uuid::new_v4(),
                name: "Aditi Joshi".to_string(),
                branch: Some("Information Technology".to_string()),
                cohort: Some("2025".to_string()),
                skills: vec!["Java".to_string()],
            },
            population: vec![PeerProfile {
                id: Uuid::new_v4(),
                name: "Nikhil Bose".to_string(),
                headline: Some("Cloud Engineer".to_string()),
                skills: vec!["AWS".to_string(), "Java".to_string()],
                year_of_passing: Some(2017),
            }],
            jobs: vec![JobPosting {
                id: Uuid::new_v4(),
                title: "Cloud Associate".to_string(),
                skills: vec!["AWS".to_string()],
                salary: Some("8 LPA".to_string()),
            }],
            connected: Vec::new(),
            applications: Vec::new(),
            mentorship: Vec::new(),
        }
    }

    #[test]
    fn report_lists_gaps_and_sections() {
        let report = build_report(&analyze(&sample_input(), 2026));
        assert!(report.starts_with("# Skill Gap Report: Aditi Joshi"));
        assert!(report.contains("## Skill Gaps (1 total, 1 critical)"));
        assert!(report.contains("- AWS: score 100 (High demand), 1 alumni, 1 jobs, salary 8 LPA"));
        assert!(report.contains("No connected alumni to learn from yet."));
        assert!(report.contains("- AWS: 1 postings (Cloud Associate)"));
        assert!(report.contains("### Validate Your Skills (medium priority)"));
    }
}
