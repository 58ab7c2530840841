//! Skill list normalization and skill-category tagging.

use anyhow::Result;
use once_cell::sync::Lazy;
use polars::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::types::columns::{REQUIRED_SKILLS, SKILL_CATEGORY};
use crate::utils::{has_column, set_column, string_values};

static CANONICAL_SKILLS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("javascript", "JavaScript"),
        ("python", "Python"),
        ("java", "Java"),
        ("php", "PHP"),
        ("react", "React"),
        ("vue", "Vue.js"),
        ("angular", "Angular"),
        ("node", "Node.js"),
        ("nodejs", "Node.js"),
        ("mysql", "MySQL"),
        ("postgresql", "PostgreSQL"),
        ("mongodb", "MongoDB"),
    ])
});

/// Category tags in output order, each with the keywords that select it.
const SKILL_CATEGORIES: [(&str, &[&str]); 5] = [
    ("Frontend", &["react", "vue", "angular", "javascript", "html", "css"]),
    ("Backend", &["python", "java", "php", "node", "django", "laravel"]),
    ("Database", &["mysql", "postgresql", "mongodb", "sql"]),
    ("DevOps", &["docker", "kubernetes", "aws", "azure", "devops"]),
    ("Data", &["pandas", "numpy", "tableau", "powerbi", "analytics"]),
];

const GENERAL_CATEGORY: &str = "General";

/// Maps free-text skill lists to canonical names and derives `skill_category`.
#[derive(Debug, Clone)]
pub struct SkillNormalizer {
    default_skills: String,
}

impl Default for SkillNormalizer {
    fn default() -> Self {
        Self::new("General Programming")
    }
}

impl SkillNormalizer {
    pub fn new(default_skills: impl Into<String>) -> Self {
        Self {
            default_skills: default_skills.into(),
        }
    }

    pub fn normalize(&self, df: DataFrame) -> Result<DataFrame> {
        let raw = if has_column(&df, REQUIRED_SKILLS) {
            string_values(&df, REQUIRED_SKILLS)?
        } else {
            vec![None; df.height()]
        };

        let skills: Vec<String> = raw
            .iter()
            .map(|v| self.normalize_skills(v.as_deref()))
            .collect();
        let categories: Vec<String> = skills.iter().map(|s| Self::categorize(s)).collect();

        let mut df = df;
        set_column(&mut df, Series::new(REQUIRED_SKILLS.into(), skills))?;
        set_column(&mut df, Series::new(SKILL_CATEGORY.into(), categories))?;
        Ok(df)
    }

    /// Canonicalize one comma-separated skill list.
    ///
    /// Tokens are trimmed and looked up case-insensitively; unknown tokens
    /// keep their trimmed spelling. Duplicates are dropped keeping the first
    /// occurrence. An empty result yields the default skill string.
    pub fn normalize_skills(&self, raw: Option<&str>) -> String {
        let Some(raw) = raw else {
            return self.default_skills.clone();
        };

        let mut seen = HashSet::new();
        let mut skills: Vec<&str> = Vec::new();
        for token in raw.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let canonical = CANONICAL_SKILLS
                .get(token.to_lowercase().as_str())
                .copied()
                .unwrap_or(token);
            if seen.insert(canonical) {
                skills.push(canonical);
            }
        }

        if skills.is_empty() {
            self.default_skills.clone()
        } else {
            skills.join(", ")
        }
    }

    /// Tag a normalized skill string by keyword substring membership.
    pub fn categorize(skills: &str) -> String {
        let lower = skills.to_lowercase();
        let tags: Vec<&str> = SKILL_CATEGORIES
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(tag, _)| *tag)
            .collect();

        if tags.is_empty() {
            GENERAL_CATEGORY.to_string()
        } else {
            tags.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dedups_preserving_order() {
        let normalizer = SkillNormalizer::default();
        assert_eq!(
            normalizer.normalize_skills(Some("javascript, REACT, javascript")),
            "JavaScript, React"
        );
        assert_eq!(
            normalizer.normalize_skills(Some("nodejs, Node, docker")),
            "Node.js, docker"
        );
    }

    #[test]
    fn test_normalize_empty_input() {
        let normalizer = SkillNormalizer::default();
        assert_eq!(normalizer.normalize_skills(None), "General Programming");
        assert_eq!(normalizer.normalize_skills(Some(" , ,")), "General Programming");
    }

    #[test]
    fn test_categorize_multi_membership() {
        assert_eq!(SkillNormalizer::categorize("JavaScript, React"), "Frontend, Backend");
        assert_eq!(SkillNormalizer::categorize("Python, MySQL"), "Backend, Database");
        assert_eq!(SkillNormalizer::categorize("Excel"), "General");
        assert_eq!(SkillNormalizer::categorize("Docker, Tableau"), "DevOps, Data");
    }

    #[test]
    fn test_normalize_frame_adds_category() {
        let df = df!["required_skills" => [Some("python, django"), None]].unwrap();
        let df = SkillNormalizer::default().normalize(df).unwrap();

        assert_eq!(
            string_values(&df, "required_skills").unwrap(),
            vec![
                Some("Python, django".to_string()),
                Some("General Programming".to_string())
            ]
        );
        assert_eq!(
            string_values(&df, "skill_category").unwrap(),
            vec![Some("Backend".to_string()), Some("General".to_string())]
        );
    }
}
