//! Persona text and prompt-category selection.
//!
//! The persona block is the fixed instruction-and-fact text prepended to
//! every model call. A pure keyword classifier picks a category variant
//! so the relay can lead with whichever section the visitor is asking
//! about; the persona text itself stays data-driven and swappable.

/// Display name used for assistant turns and the trailing reply cue.
pub const PERSONA_NAME: &str = "Rowan";

/// Prompt variant selected from the visitor's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptCategory {
    Default,
    Skills,
    Experience,
    Projects,
    Certifications,
    Resume,
    Dashboard,
}

/// Keyword table searched in declared order; the first hit wins.
const CATEGORY_KEYWORDS: &[(PromptCategory, &[&str])] = &[
    (
        PromptCategory::Skills,
        &["skill", "stack", "technolog", "language", "tool"],
    ),
    (
        PromptCategory::Experience,
        &["experience", "work", "job", "career", "company"],
    ),
    (
        PromptCategory::Projects,
        &["project", "built", "portfolio"],
    ),
    (
        PromptCategory::Certifications,
        &["certif", "course", "bootcamp"],
    ),
    (PromptCategory::Resume, &["resume", "cv"]),
    (
        PromptCategory::Dashboard,
        &["dashboard", "power bi", "tableau"],
    ),
];

/// Classify a message into a prompt category.
///
/// Case-insensitive substring search over [`CATEGORY_KEYWORDS`] in
/// declared order. Pure function of the message text; `Default` when no
/// keyword matches.
pub fn classify(message: &str) -> PromptCategory {
    let lowered = message.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|kw| lowered.contains(kw)) {
            return *category;
        }
    }
    PromptCategory::Default
}

/// The persona block for a category: the base persona, plus a short
/// focus instruction for non-default categories.
pub fn base_prompt(category: PromptCategory) -> String {
    match category_focus(category) {
        Some(focus) => format!("{PERSONA_BASE}\n\n{focus}"),
        None => PERSONA_BASE.to_string(),
    }
}

fn category_focus(category: PromptCategory) -> Option<&'static str> {
    match category {
        PromptCategory::Default => None,
        PromptCategory::Skills => Some(
            "The visitor is asking about skills. Lead with the skills section and name concrete tools.",
        ),
        PromptCategory::Experience => Some(
            "The visitor is asking about work experience. Lead with roles, employers, and dates.",
        ),
        PromptCategory::Projects => Some(
            "The visitor is asking about projects. Pick the most relevant project and describe what it does.",
        ),
        PromptCategory::Certifications => {
            Some("The visitor is asking about certifications. List them plainly.")
        }
        PromptCategory::Resume => Some(
            "The visitor wants the resume. Point to the resume link and offer a short summary.",
        ),
        PromptCategory::Dashboard => Some(
            "The visitor is asking about dashboards. Describe the Power BI work and what it shows.",
        ),
    }
}

const PERSONA_BASE: &str = "\
You are Rowan Hale, a friendly, down-to-earth data scientist. You're chatting with
someone interested in your skills or projects.

Style guide:
- Talk casually and clearly, like texting a friend.
- Keep replies short: 2-4 lines. Expand only if the visitor asks for more.
- Use markdown: bold for highlights, inline code for tools, bullets when helpful.
- Never make things up. Stick to the facts below.
- Only share links when they are relevant to the question.
- If asked \"Are you AI?\" or \"Is this really Rowan?\", say: I'm an AI assistant
  trained on Rowan's portfolio to answer questions. You can always reach out on
  LinkedIn!

Knowledge base

Experience:
- Data Scientist @ Helix Analytics (2023 - present)
- Data Analyst @ Brightpath Labs (2021 - 2023)

Skills:
- Languages: Python, SQL, R
- Libraries: Pandas, NumPy, scikit-learn, Matplotlib
- ML: NLP, gradient boosting, K-means, logistic regression
- Data viz: Power BI, Tableau
- Big data: Spark (working knowledge)
- Tools: Git, Jupyter, Flask, Streamlit

Projects:
- Churn Radar: churn prediction service for a subscription business
- Expense Lens: personal finance tracker with charts
- Table Harvester: pulls tables out of arbitrary web pages
- Customer Segmentation: K-means clustering on retail data
- Movie Recommender: collaborative filtering system
- Mobile Trends Dashboard: Power BI report on telecom usage data

Certifications:
- Certified Data Scientist (IABAC)
- 100 Days of Code: Python Pro Bootcamp
- AWS Cloud Technical Essentials

Links:
- Resume: /resume
- Portfolio: /projects
- GitHub: github.com/rowanhale
- LinkedIn: linkedin.com/in/rowanhale";

#[cfg(test)]
mod tests {
    use super::*;

    // -- classify --

    #[test]
    fn classifies_each_category() {
        assert_eq!(classify("what skills do you have"), PromptCategory::Skills);
        assert_eq!(classify("tell me about your experience"), PromptCategory::Experience);
        assert_eq!(classify("show me a cool project"), PromptCategory::Projects);
        assert_eq!(classify("any certifications?"), PromptCategory::Certifications);
        assert_eq!(classify("can I see your resume"), PromptCategory::Resume);
        assert_eq!(classify("what about the dashboard"), PromptCategory::Dashboard);
    }

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(classify("WHAT SKILLS?"), PromptCategory::Skills);
        assert_eq!(classify("Power BI experience?"), PromptCategory::Experience);
    }

    #[test]
    fn first_matching_category_wins() {
        // Both "skill" and "project" appear; Skills comes first in the table.
        assert_eq!(
            classify("what skills did you use in your projects"),
            PromptCategory::Skills
        );
        // "work" hits Experience before "resume" hits Resume.
        assert_eq!(
            classify("resume of your work history"),
            PromptCategory::Experience
        );
    }

    #[test]
    fn unmatched_messages_fall_back_to_default() {
        assert_eq!(classify("hello there"), PromptCategory::Default);
        assert_eq!(classify(""), PromptCategory::Default);
    }

    #[test]
    fn keyword_prefixes_match_inflections() {
        assert_eq!(classify("are you certified?"), PromptCategory::Certifications);
        assert_eq!(classify("which technologies do you like"), PromptCategory::Skills);
    }

    // -- base_prompt --

    #[test]
    fn default_prompt_is_the_base_block() {
        assert_eq!(base_prompt(PromptCategory::Default), PERSONA_BASE);
    }

    #[test]
    fn category_prompts_append_a_focus_line() {
        let skills = base_prompt(PromptCategory::Skills);
        assert!(skills.starts_with(PERSONA_BASE));
        assert!(skills.contains("asking about skills"));

        let resume = base_prompt(PromptCategory::Resume);
        assert!(resume.contains("resume link"));
    }

    #[test]
    fn base_prompt_is_deterministic() {
        assert_eq!(
            base_prompt(PromptCategory::Projects),
            base_prompt(PromptCategory::Projects)
        );
    }

    #[test]
    fn persona_mentions_its_name() {
        assert!(PERSONA_BASE.contains(PERSONA_NAME));
    }
}
