use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::models::IndustrySkill;

const SKILLS_PER_CATEGORY: usize = 5;
const TOP_GAPS: usize = 10;
const RECOMMENDATIONS: usize = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGaps {
    pub category: String,
    pub count: usize,
    pub skills: Vec<IndustrySkill>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryMatch {
    pub match_percentage: u32,
    pub total_industry_skills: usize,
    pub matched_skills: usize,
    pub missing_skills: usize,
    pub high_demand_gaps: usize,
    pub gaps_by_category: Vec<CategoryGaps>,
    pub top_gaps: Vec<IndustrySkill>,
    pub recommendations: Vec<IndustrySkill>,
    pub current_skills: usize,
}

pub fn match_industry_skills(
    subject_skills: &[String],
    industry: &[IndustrySkill],
) -> IndustryMatch {
    let owned: HashSet<String> = subject_skills.iter().map(|s| s.to_lowercase()).collect();

    let missing: Vec<&IndustrySkill> = industry
        .iter()
        .filter(|skill| !owned.contains(&skill.name.to_lowercase()))
        .collect();

    let mut gaps_by_category: Vec<CategoryGaps> = Vec::new();
    for skill in &missing {
        let slot = match gaps_by_category
            .iter()
            .position(|group| group.category == skill.category)
        {
            Some(slot) => slot,
            None => {
                gaps_by_category.push(CategoryGaps {
                    category: skill.category.clone(),
                    count: 0,
                    skills: Vec::new(),
                });
                gaps_by_category.len() - 1
            }
        };
        let group = &mut gaps_by_category[slot];
        group.count += 1;
        if group.skills.len() < SKILLS_PER_CATEGORY {
            group.skills.push((*skill).clone());
        }
    }

    let high_demand: Vec<&IndustrySkill> = missing
        .iter()
        .copied()
        .filter(|skill| skill.demand_level.eq_ignore_ascii_case("high"))
        .collect();

    let mut recommended_ids: HashSet<Uuid> = HashSet::new();
    let mut recommendations = Vec::new();
    'skills: for held in subject_skills.iter().map(|s| s.to_lowercase()) {
        for skill in industry {
            if recommendations.len() == RECOMMENDATIONS {
                break 'skills;
            }
            let related = skill
                .related_skills
                .iter()
                .any(|related| related.to_lowercase() == held);
            if related && recommended_ids.insert(skill.id) {
                recommendations.push(skill.clone());
            }
        }
    }

    let total = industry.len();
    let matched = total - missing.len();
    let match_percentage = if total == 0 {
        0
    } else {
        (matched as f64 / total as f64 * 100.0).round() as u32
    };

    IndustryMatch {
        match_percentage,
        total_industry_skills: total,
        matched_skills: matched,
        missing_skills: missing.len(),
        high_demand_gaps: high_demand.len(),
        gaps_by_category,
        top_gaps: high_demand.into_iter().take(TOP_GAPS).cloned().collect(),
        recommendations,
        current_skills: owned.len(),
    }
}
