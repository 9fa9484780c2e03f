use std::collections::HashMap;

use tracing::trace;

use crate::models::{DemandSkill, JobPosting, PeerProfile};

#[derive(Debug, Clone)]
struct OrderedTally<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for OrderedTally<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> OrderedTally<T> {
    fn entry(&mut self, skill: &str, init: impl FnOnce() -> T) -> &mut T {
        let existing = self.index.get(skill).copied();
        let slot = match existing {
            Some(slot) => slot,
            None => {
                self.entries.push(init());
                self.index.insert(skill.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[slot]
    }

    fn get(&self, skill: &str) -> Option<&T> {
        self.index.get(skill).map(|&slot| &self.entries[slot])
    }
}

fn push_distinct(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeerSkill {
    pub skill: String,
    pub holders: usize,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PopulationStats {
    pub population: usize,
    tally: OrderedTally<PeerSkill>,
}

impl PopulationStats {
    pub fn from_peers(peers: &[PeerProfile]) -> Self {
        let mut tally = OrderedTally::default();

        for peer in peers {
            let role = peer.headline.as_deref().filter(|h| !h.trim().is_empty());
            for skill in &peer.skills {
                let entry = tally.entry(skill, || PeerSkill {
                    skill: skill.clone(),
                    holders: 0,
                    roles: Vec::new(),
                });
                entry.holders += 1;
                if let Some(role) = role {
                    push_distinct(&mut entry.roles, role);
                }
            }
        }

        Self {
            population: peers.len(),
            tally,
        }
    }

    pub fn frequency(&self, skill: &str) -> usize {
        self.tally.get(skill).map_or(0, |entry| entry.holders)
    }

    pub fn roles(&self, skill: &str) -> &[String] {
        self.tally
            .get(skill)
            .map(|entry| entry.roles.as_slice())
            .unwrap_or_default()
    }

    pub fn skills(&self) -> impl Iterator<Item = &PeerSkill> {
        self.tally.entries.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillDemand {
    pub skill: String,
    pub count: usize,
    pub salary_sample: Option<String>,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MarketDemand {
    pub jobs: usize,
    tally: OrderedTally<SkillDemand>,
}

impl MarketDemand {
    pub fn from_jobs(jobs: &[JobPosting]) -> Self {
        let mut tally = OrderedTally::default();

        for job in jobs {
            trace!(job = %job.id, skills = job.skills.len(), "tallying posting");
            let salary = job.salary.as_deref().filter(|s| !s.trim().is_empty());
            for skill in &job.skills {
                let entry = tally.entry(skill, || SkillDemand {
                    skill: skill.clone(),
                    count: 0,
                    salary_sample: None,
                    roles: Vec::new(),
                });
                entry.count += 1;
                push_distinct(&mut entry.roles, &job.title);
                if let Some(salary) = salary {
                    entry.salary_sample = Some(salary.to_string());
                }
            }
        }

        Self {
            jobs: jobs.len(),
            tally,
        }
    }

    pub fn demand(&self, skill: &str) -> Option<&SkillDemand> {
        self.tally.get(skill)
    }

    pub fn count(&self, skill: &str) -> usize {
        self.demand(skill).map_or(0, |entry| entry.count)
    }

    pub fn skills(&self) -> impl Iterator<Item = &SkillDemand> {
        self.tally.entries.iter()
    }

    // ties keep first-seen order
    pub fn top(&self, limit: usize, role_limit: usize) -> Vec<DemandSkill> {
        let mut ranked: Vec<&SkillDemand> = self.tally.entries.iter().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
            .into_iter()
            .take(limit)
            .map(|entry| DemandSkill {
                skill: entry.skill.clone(),
                demand: entry.count,
                roles: entry.roles.iter().take(role_limit).cloned().collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn peer(headline: Option<&str>, skills: &[&str]) -> PeerProfile {
        PeerProfile {
            id: Uuid::new_v4(),
            name: "Priya Nair".to_string(),
            headline: headline.map(str::to_string),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            year_of_passing: Some(2019),
        }
    }

    fn job(title: &str, salary: Option<&str>, skills: &[&str]) -> JobPosting {
        JobPosting {
            id: Uuid::new_v4(),
            title: title.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            salary: salary.map(str::to_string),
        }
    }

    #[test]
    fn population_counts_holders_and_distinct_roles() {
        let peers = vec![
            peer(Some("Backend Engineer"), &["Rust", "SQL"]),
            peer(Some("Backend Engineer"), &["Rust"]),
            peer(None, &["Rust", "Docker"]),
        ];

        let stats = PopulationStats::from_peers(&peers);
        assert_eq!(stats.population, 3);
        assert_eq!(stats.frequency("Rust"), 3);
        assert_eq!(stats.frequency("SQL"), 1);
        assert_eq!(stats.frequency("Kotlin"), 0);

        let rust = stats.skills().next().expect("first skill");
        assert_eq!(rust.skill, "Rust");
        assert_eq!(rust.roles, vec!["Backend Engineer"]);
    }

    #[test]
    fn empty_inputs_produce_empty_aggregates() {
        let stats = PopulationStats::from_peers(&[]);
        let market = MarketDemand::from_jobs(&[]);
        assert_eq!(stats.population, 0);
        assert_eq!(stats.skills().count(), 0);
        assert_eq!(market.jobs, 0);
        assert!(market.top(10, 3).is_empty());
    }

    #[test]
    fn salary_sample_is_last_write_wins() {
        let jobs = vec![
            job("Data Analyst", Some("6-8 LPA"), &["SQL"]),
            job("Data Engineer", None, &["SQL"]),
            job("BI Developer", Some("10 LPA"), &["SQL"]),
        ];

        let market = MarketDemand::from_jobs(&jobs);
        let sql = market.demand("SQL").expect("SQL demand");
        assert_eq!(sql.count, 3);
        assert_eq!(sql.salary_sample.as_deref(), Some("10 LPA"));
        assert_eq!(sql.roles.len(), 3);
    }

    #[test]
    fn top_demand_is_ranked_with_stable_ties() {
        let jobs = vec![
            job("A", None, &["Go", "Rust"]),
            job("B", None, &["Rust", "Kafka"]),
            job("C", None, &["Kafka"]),
        ];

        let top = MarketDemand::from_jobs(&jobs).top(2, 3);
        let names: Vec<_> = top.iter().map(|d| d.skill.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Kafka"]);
        assert_eq!(top[0].demand, 2);
    }
}
