//! Learning links: search pages on course providers for a given skill.

use std::collections::BTreeSet;

use reqwest::Url;
use serde::Serialize;
use tracing::warn;

struct LearningProvider {
    site: &'static str,
    search_url: &'static str,
    query_param: &'static str,
}

/// Ordered by preference; the first provider supplies the assessment course suggestion.
const PROVIDERS: &[LearningProvider] = &[
    LearningProvider {
        site: "Coursera",
        search_url: "https://www.coursera.org/search",
        query_param: "query",
    },
    LearningProvider {
        site: "Udemy",
        search_url: "https://www.udemy.com/courses/search/",
        query_param: "q",
    },
    LearningProvider {
        site: "edX",
        search_url: "https://www.edx.org/search",
        query_param: "q",
    },
    LearningProvider {
        site: "YouTube",
        search_url: "https://www.youtube.com/results",
        query_param: "search_query",
    },
];

const NO_COURSE: &str = "No course available";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningLink {
    pub site: String,
    pub url: String,
}

/// One search link per provider.
pub fn learning_links(skill: &str) -> Vec<LearningLink> {
    let skill = skill.trim();
    if skill.is_empty() {
        return vec![];
    }
    PROVIDERS
        .iter()
        .filter_map(|provider| {
            match Url::parse_with_params(provider.search_url, &[(provider.query_param, skill)]) {
                Ok(url) => Some(LearningLink {
                    site: provider.site.to_string(),
                    url: url.to_string(),
                }),
                Err(e) => {
                    warn!("Skipping {} link for '{skill}': {e}", provider.site);
                    None
                }
            }
        })
        .collect()
}

/// Course suggestion attached to a skill in an assessment report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSuggestion {
    pub skill: String,
    pub course: String,
    pub link: String,
}

pub fn suggest_course(skill: &str) -> CourseSuggestion {
    match learning_links(skill).into_iter().next() {
        Some(link) => CourseSuggestion {
            skill: skill.to_string(),
            course: format!("{}: {}", link.site, skill.trim()),
            link: link.url,
        },
        None => CourseSuggestion {
            skill: skill.to_string(),
            course: NO_COURSE.to_string(),
            link: String::new(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningResource {
    pub skill: String,
    pub site: String,
    pub resource: String,
}

/// Links for every distinct skill across both lists, skills in sorted order.
pub fn recommend_resources(
    missing_skills: &[String],
    skills_to_improve: &[String],
) -> Vec<LearningResource> {
    let skills: BTreeSet<&str> = missing_skills
        .iter()
        .chain(skills_to_improve)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    skills
        .into_iter()
        .flat_map(|skill| {
            learning_links(skill)
                .into_iter()
                .map(move |link| LearningResource {
                    skill: skill.to_string(),
                    site: link.site,
                    resource: link.url,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_cover_every_provider() {
        let links = learning_links("Rust");
        let sites: Vec<_> = links.iter().map(|l| l.site.as_str()).collect();
        assert_eq!(sites, vec!["Coursera", "Udemy", "edX", "YouTube"]);
        assert_eq!(links[0].url, "https://www.coursera.org/search?query=Rust");
    }

    #[test]
    fn test_links_encode_the_query() {
        let links = learning_links("C++ & data analysis");
        assert_eq!(
            links[1].url,
            "https://www.udemy.com/courses/search/?q=C%2B%2B+%26+data+analysis"
        );
    }

    #[test]
    fn test_blank_skill_has_no_links() {
        assert!(learning_links("   ").is_empty());
        let suggestion = suggest_course(" ");
        assert_eq!(suggestion.course, "No course available");
        assert_eq!(suggestion.link, "");
    }

    #[test]
    fn test_suggest_course_uses_first_provider() {
        let suggestion = suggest_course("Leadership");
        assert_eq!(suggestion.course, "Coursera: Leadership");
        assert!(suggestion.link.starts_with("https://www.coursera.org/"));
    }

    #[test]
    fn test_recommend_resources_dedupes_and_sorts() {
        let missing = vec!["sql".to_string(), "Excel".to_string()];
        let improve = vec!["sql ".to_string(), "".to_string()];
        let resources = recommend_resources(&missing, &improve);

        assert_eq!(resources.len(), 2 * PROVIDERS.len());
        assert_eq!(resources[0].skill, "Excel");
        assert_eq!(resources[PROVIDERS.len()].skill, "sql");
        assert_eq!(resources[0].site, "Coursera");
    }

    #[test]
    fn test_recommend_resources_empty() {
        assert!(recommend_resources(&[], &[]).is_empty());
    }
}
