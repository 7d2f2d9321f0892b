//! Skill self-assessment scoring.
//!
//! Ratings are on a 1–5 scale. Each category's percentage is its mean rating / 5;
//! individual ratings classify a skill as strong (≥ 4), to improve (2 to < 4) or
//! missing (< 2).

use serde::{Deserialize, Serialize};

use crate::assessment::learning::{suggest_course, CourseSuggestion};

pub const TECHNICAL: &str = "Technical Skills";
pub const SOFT: &str = "Soft Skills";
pub const MANAGEMENT: &str = "Management Skills";
pub const ANALYTICAL: &str = "Analytical";
pub const CREATIVE: &str = "Creative";

const MAX_RATING: f64 = 5.0;
const STRONG_THRESHOLD: f64 = 4.0;
const IMPROVE_THRESHOLD: f64 = 2.0;

fn default_skill_type() -> String {
    TECHNICAL.to_string()
}

/// One self-rated skill as submitted by the assessment form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRating {
    pub name: String,
    #[serde(rename = "type", default = "default_skill_type")]
    pub skill_type: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentageScores {
    #[serde(rename = "Technical Skills")]
    pub technical: String,
    #[serde(rename = "Soft Skills")]
    pub soft: String,
    #[serde(rename = "Management Skills")]
    pub management: String,
    #[serde(rename = "Analytical")]
    pub analytical: String,
    #[serde(rename = "Creative")]
    pub creative: String,
}

/// Percentage per category, formatted like `"72.5%"`. Unknown categories are ignored.
pub fn percentage_scores(ratings: &[SkillRating]) -> PercentageScores {
    let category = |name: &str| {
        let scores: Vec<f64> = ratings
            .iter()
            .filter(|r| r.skill_type == name)
            .map(|r| r.score)
            .collect();
        let percentage = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64 / MAX_RATING * 100.0
        };
        format!("{percentage:.1}%")
    };

    PercentageScores {
        technical: category(TECHNICAL),
        soft: category(SOFT),
        management: category(MANAGEMENT),
        analytical: category(ANALYTICAL),
        creative: category(CREATIVE),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillStanding {
    Strong,
    ToImprove,
    Missing,
}

pub fn classify(score: f64) -> SkillStanding {
    if score >= STRONG_THRESHOLD {
        SkillStanding::Strong
    } else if score >= IMPROVE_THRESHOLD {
        SkillStanding::ToImprove
    } else {
        SkillStanding::Missing
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillGaps {
    pub strong: Vec<String>,
    pub to_improve: Vec<String>,
    pub missing: Vec<String>,
}

pub fn identify_skill_gaps(ratings: &[SkillRating]) -> SkillGaps {
    let mut gaps = SkillGaps::default();
    for rating in ratings {
        let bucket = match classify(rating.score) {
            SkillStanding::Strong => &mut gaps.strong,
            SkillStanding::ToImprove => &mut gaps.to_improve,
            SkillStanding::Missing => &mut gaps.missing,
        };
        bucket.push(rating.name.clone());
    }
    gaps
}

/// Response body of the assessment endpoint; also what gets persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub percentage_scores: PercentageScores,
    pub strong_skills: Vec<String>,
    pub skills_to_improve: Vec<CourseSuggestion>,
    pub missing_skills: Vec<CourseSuggestion>,
}

pub fn assess(ratings: &[SkillRating]) -> AssessmentReport {
    let gaps = identify_skill_gaps(ratings);
    AssessmentReport {
        percentage_scores: percentage_scores(ratings),
        strong_skills: gaps.strong,
        skills_to_improve: gaps.to_improve.iter().map(|s| suggest_course(s)).collect(),
        missing_skills: gaps.missing.iter().map(|s| suggest_course(s)).collect(),
    }
}

/// Skill offered by the assessment form.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSkill {
    pub id: u32,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub skill_type: &'static str,
}

pub const SKILL_CATALOG: &[CatalogSkill] = &[
    CatalogSkill {
        id: 1,
        name: "Python Programming",
        skill_type: TECHNICAL,
    },
    CatalogSkill {
        id: 2,
        name: "Data Analysis",
        skill_type: TECHNICAL,
    },
    CatalogSkill {
        id: 3,
        name: "Communication",
        skill_type: SOFT,
    },
    CatalogSkill {
        id: 4,
        name: "Project Management",
        skill_type: MANAGEMENT,
    },
    CatalogSkill {
        id: 5,
        name: "Problem Solving",
        skill_type: ANALYTICAL,
    },
    CatalogSkill {
        id: 6,
        name: "Creative Thinking",
        skill_type: CREATIVE,
    },
    CatalogSkill {
        id: 7,
        name: "JavaScript",
        skill_type: TECHNICAL,
    },
    CatalogSkill {
        id: 8,
        name: "Leadership",
        skill_type: MANAGEMENT,
    },
    CatalogSkill {
        id: 9,
        name: "Critical Thinking",
        skill_type: ANALYTICAL,
    },
    CatalogSkill {
        id: 10,
        name: "Design Thinking",
        skill_type: CREATIVE,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(name: &str, skill_type: &str, score: f64) -> SkillRating {
        SkillRating {
            name: name.to_string(),
            skill_type: skill_type.to_string(),
            score,
        }
    }

    #[test]
    fn test_percentage_per_category() {
        let ratings = vec![
            rating("Python", TECHNICAL, 4.0),
            rating("SQL", TECHNICAL, 3.0),
            rating("Communication", SOFT, 5.0),
            rating("Juggling", "Circus", 5.0),
        ];
        let scores = percentage_scores(&ratings);
        assert_eq!(scores.technical, "70.0%");
        assert_eq!(scores.soft, "100.0%");
        assert_eq!(scores.management, "0.0%");
        assert_eq!(scores.creative, "0.0%");
    }

    #[test]
    fn test_classification_thresholds() {
        assert_eq!(classify(5.0), SkillStanding::Strong);
        assert_eq!(classify(4.0), SkillStanding::Strong);
        assert_eq!(classify(3.9), SkillStanding::ToImprove);
        assert_eq!(classify(2.0), SkillStanding::ToImprove);
        assert_eq!(classify(1.5), SkillStanding::Missing);
        assert_eq!(classify(0.0), SkillStanding::Missing);
    }

    #[test]
    fn test_assess_builds_report() {
        let ratings = vec![
            rating("Python", TECHNICAL, 5.0),
            rating("Leadership", MANAGEMENT, 3.0),
            rating("Design Thinking", CREATIVE, 1.0),
        ];
        let report = assess(&ratings);
        assert_eq!(report.strong_skills, vec!["Python"]);
        assert_eq!(report.skills_to_improve[0].skill, "Leadership");
        assert_eq!(report.skills_to_improve[0].course, "Coursera: Leadership");
        assert_eq!(report.missing_skills[0].skill, "Design Thinking");
        assert!(report.missing_skills[0].link.contains("Design+Thinking"));
    }

    #[test]
    fn test_rating_defaults() {
        let parsed: SkillRating = serde_json::from_str(r#"{"name": "Rust"}"#).unwrap();
        assert_eq!(parsed.skill_type, TECHNICAL);
        assert_eq!(parsed.score, 0.0);
    }

    #[test]
    fn test_report_wire_names() {
        let json = serde_json::to_value(assess(&[rating("Python", TECHNICAL, 4.5)])).unwrap();
        assert_eq!(json["percentageScores"]["Technical Skills"], "90.0%");
        assert_eq!(json["strongSkills"][0], "Python");
        assert!(json["skillsToImprove"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_skill_catalog_has_ten_entries() {
        assert_eq!(SKILL_CATALOG.len(), 10);
        assert_eq!(SKILL_CATALOG[6].name, "JavaScript");
    }
}
