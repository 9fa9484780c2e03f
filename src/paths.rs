use std::collections::HashSet;

use crate::models::{ApplicationRecord, CareerInsights, LearningPath, PeerProfile};

pub const MAX_LEARNING_PATHS: usize = 3;
pub const MAX_SKILLS_TO_LEARN: usize = 5;
const MAX_TARGET_ROLE_APPLICATIONS: usize = 3;
const MAX_TARGET_ROLE_SKILLS: usize = 8;

/// Expects the full skill delta, not the truncated display list.
pub fn estimated_time(missing: usize) -> String {
    format!("{}-{} months", missing.div_ceil(2), (missing * 2).div_ceil(3))
}

pub fn build_learning_paths(
    mentors: &[PeerProfile],
    subject_skills: &[String],
    current_year: i32,
) -> Vec<LearningPath> {
    let owned: HashSet<&str> = subject_skills.iter().map(String::as_str).collect();

    mentors
        .iter()
        .take(MAX_LEARNING_PATHS)
        .map(|mentor| {
            let delta: Vec<&String> = mentor
                .skills
                .iter()
                .filter(|skill| !owned.contains(skill.as_str()))
                .collect();

            let first_action = match delta.first() {
                Some(skill) => format!("Learn {skill}"),
                None => "Connect more".to_string(),
            };

            LearningPath {
                mentor_id: mentor.id,
                mentor_name: mentor.name.clone(),
                mentor_role: mentor.headline.clone(),
                years_experience: mentor.year_of_passing.map(|year| current_year - year),
                skills_to_learn: delta
                    .iter()
                    .take(MAX_SKILLS_TO_LEARN)
                    .map(|skill| skill.to_string())
                    .collect(),
                estimated_time_to_reach: estimated_time(delta.len()),
                recommended_actions: vec![
                    first_action,
                    "Request mentorship session".to_string(),
                    "Apply to similar roles".to_string(),
                ],
            }
        })
        .collect()
}

pub fn career_insights(
    applications: &[ApplicationRecord],
    connected: &[PeerProfile],
    subject_skills: &[String],
) -> CareerInsights {
    let owned: HashSet<&str> = subject_skills.iter().map(String::as_str).collect();

    let mut target_roles: Vec<String> = Vec::new();
    for application in applications.iter().take(MAX_TARGET_ROLE_APPLICATIONS) {
        if !target_roles.contains(&application.job_title) {
            target_roles.push(application.job_title.clone());
        }
    }

    let mut needed: Vec<String> = Vec::new();
    for skill in applications.iter().flat_map(|a| a.job_skills.iter()) {
        if needed.len() == MAX_TARGET_ROLE_SKILLS {
            break;
        }
        if !owned.contains(skill.as_str()) && !needed.contains(skill) {
            needed.push(skill.clone());
        }
    }

    let applied_titles: Vec<String> = applications
        .iter()
        .map(|a| a.job_title.to_lowercase())
        .collect();
    let alumni_in_target_roles = connected
        .iter()
        .filter(|alumni| {
            alumni.headline.as_deref().is_some_and(|headline| {
                let headline = headline.to_lowercase();
                applied_titles.iter().any(|title| headline.contains(title))
            })
        })
        .count();

    CareerInsights {
        target_roles,
        skills_needed_for_target_roles: needed,
        alumni_in_target_roles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn mentor(headline: &str, skills: &[&str]) -> PeerProfile {
        PeerProfile {
            id: Uuid::new_v4(),
            name: "Ananya Rao".to_string(),
            headline: Some(headline.to_string()),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            year_of_passing: Some(2018),
        }
    }

    fn application(title: &str, skills: &[&str]) -> ApplicationRecord {
        ApplicationRecord {
            job_title: title.to_string(),
            job_skills: skills.iter().map(|s| s.to_string()).collect(),
            status: "applied".to_string(),
        }
    }

    #[test]
    fn time_estimate_rounds_both_bounds_up() {
        assert_eq!(estimated_time(0), "0-0 months");
        assert_eq!(estimated_time(1), "1-1 months");
        assert_eq!(estimated_time(5), "3-4 months");
        assert_eq!(estimated_time(9), "5-6 months");
    }

    #[test]
    fn path_caps_display_list_but_estimates_full_delta() {
        let mentors = vec![mentor(
            "Staff Engineer",
            &["A", "B", "C", "D", "E", "F", "G", "H"],
        )];
        let paths = build_learning_paths(&mentors, &["A".to_string()], 2026);

        let path = &paths[0];
        assert_eq!(path.skills_to_learn, vec!["B", "C", "D", "E", "F"]);
        assert_eq!(path.estimated_time_to_reach, "4-5 months");
        assert_eq!(path.years_experience, Some(8));
        assert_eq!(path.recommended_actions[0], "Learn B");
    }

    #[test]
    fn five_skill_delta_takes_three_to_four_months() {
        let mentors = vec![mentor("Architect", &["A", "B", "C", "D", "E", "F"])];
        let paths = build_learning_paths(&mentors, &["A".to_string()], 2026);
        assert_eq!(paths[0].skills_to_learn.len(), 5);
        assert_eq!(paths[0].estimated_time_to_reach, "3-4 months");
    }

    #[test]
    fn mentor_without_new_skills_suggests_connecting() {
        let mentors = vec![mentor("Analyst", &["SQL"])];
        let paths = build_learning_paths(&mentors, &["SQL".to_string()], 2026);
        assert!(paths[0].skills_to_learn.is_empty());
        assert_eq!(paths[0].recommended_actions[0], "Connect more");
    }

    #[test]
    fn at_most_three_mentors_are_used() {
        let mentors: Vec<_> = (0..5).map(|_| mentor("SRE", &["Linux"])).collect();
        assert_eq!(build_learning_paths(&mentors, &[], 2026).len(), 3);
    }

    #[test]
    fn career_insights_track_target_roles() {
        let applications = vec![
            application("Data Engineer", &["Spark", "SQL"]),
            application("Data Engineer", &["Airflow"]),
            application("ML Engineer", &["PyTorch"]),
            application("Analyst", &["Excel"]),
        ];
        let connected = vec![
            mentor("Senior Data Engineer at Acme", &[]),
            mentor("Product Manager", &[]),
        ];

        let insights = career_insights(&applications, &connected, &["SQL".to_string()]);
        assert_eq!(insights.target_roles, vec!["Data Engineer", "ML Engineer"]);
        assert_eq!(
            insights.skills_needed_for_target_roles,
            vec!["Spark", "Airflow", "PyTorch", "Excel"]
        );
        assert_eq!(insights.alumni_in_target_roles, 1);
    }
}
