//! Built-in job tables for the exports the static site is built from.
//!
//! A config file can name one of these with `preset:` instead of listing jobs.

use crate::config::{ExportJob, RenderKind};

/// Every category published on the site.
pub const CATEGORY_KEYS: &[&str] = &[
    "css",
    "es6",
    "functional-programming",
    "javascript-design-patterns",
    "reactjs",
    "flutter",
    "vuejs",
    "js-unit-testing",
    "redux",
    "typescript",
    "web-performance",
    "web-components",
    "webpack",
    "pwa",
    "react-native",
    "angular",
    "ux",
    "nextjs",
    "gatsbyjs",
];

fn snacks_of(key: &str) -> String {
    format!("/codersnacks-asoc-snack-categories?codersnacks_category.key={key}")
}

fn quizzes_of(key: &str) -> String {
    format!("/codersnacks-asoc-snack-quizs?codersnacks_category.key={key}")
}

/// `categories.json` plus a snacks and a quizzes file per category.
pub fn json_jobs() -> Vec<ExportJob> {
    let mut jobs = vec![ExportJob::new(
        "categories.json",
        "/codersnacks-categories",
        RenderKind::Json,
    )];
    for key in CATEGORY_KEYS {
        jobs.push(ExportJob::new(
            format!("{key}.snacks.json"),
            snacks_of(key),
            RenderKind::Json,
        ));
        jobs.push(ExportJob::new(
            format!("{key}.quizzes.json"),
            quizzes_of(key),
            RenderKind::Quizzes,
        ));
    }
    jobs
}

/// One digest post per category.
pub fn category_post_jobs() -> Vec<ExportJob> {
    CATEGORY_KEYS
        .iter()
        .map(|key| ExportJob::new(*key, snacks_of(key), RenderKind::CategoryDigest))
        .collect()
}

/// One article post per snack.
pub fn article_jobs() -> Vec<ExportJob> {
    vec![ExportJob::new("codersnacks", "/codersnacks", RenderKind::Articles)]
}

/// One main-content post per snack.
pub fn main_content_jobs() -> Vec<ExportJob> {
    vec![ExportJob::new(
        "codersnacks",
        "/codersnacks",
        RenderKind::MainContent,
    )]
}

/// Look a preset up by the name used in config files.
pub fn by_name(name: &str) -> Option<Vec<ExportJob>> {
    match name {
        "json" => Some(json_jobs()),
        "category_posts" => Some(category_post_jobs()),
        "articles" => Some(article_jobs()),
        "main_content" => Some(main_content_jobs()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_preset_pairs_snacks_and_quizzes() {
        let jobs = json_jobs();
        assert_eq!(jobs.len(), 1 + 2 * CATEGORY_KEYS.len());
        assert_eq!(jobs[0].name, "categories.json");
        let quizzes = jobs
            .iter()
            .filter(|j| j.render == RenderKind::Quizzes)
            .count();
        assert_eq!(quizzes, CATEGORY_KEYS.len());
        assert!(jobs
            .iter()
            .any(|j| j.name == "css.quizzes.json"
                && j.path == "/codersnacks-asoc-snack-quizs?codersnacks_category.key=css"));
    }

    #[test]
    fn unknown_preset_is_none() {
        assert!(by_name("category_posts").is_some());
        assert!(by_name("everything").is_none());
    }
}
