use regex::Regex;
use std::sync::LazyLock;

/// Seniority word, stack word, then Engineer/Developer.
static JOB_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(Senior|Junior|Lead|Staff|Principal)?\s*(Software|Backend|Frontend|Full[- ]?Stack|Platform|DevOps)\s*(Engineer|Developer)",
    )
    .expect("job title pattern is valid")
});

static LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(Remote|San Francisco|New York|NYC|Boston|Austin|Seattle|Los Angeles|LA|Denver|Chicago|Toronto|London|California|Texas|Massachusetts)\b",
    )
    .expect("location pattern is valid")
});

const JOB_TEXT_KEYWORDS: [&str; 3] = ["engineer", "developer", "software"];
const JOB_URL_SEGMENTS: [&str; 3] = ["/job", "/position", "/career"];
const JOB_CLASS_KEYWORDS: [&str; 3] = ["job", "position", "career"];

/// Words that never name a company even when capitalised.
pub const COMPANY_STOP_WORDS: [&str; 15] = [
    "software", "engineer", "developer", "senior", "junior", "lead", "at", "in", "for", "the",
    "and", "or", "with", "to", "from",
];

/// First job-title match in `text`, trimmed.
pub fn find_job_title(text: &str) -> Option<&str> {
    JOB_TITLE
        .find(text)
        .map(|m| m.as_str().trim())
        .filter(|t| !t.is_empty())
}

/// First known city/region/remote literal in `text`, as written.
pub fn find_location(text: &str) -> Option<&str> {
    LOCATION.find(text).map(|m| m.as_str())
}

/// Own text of an element looks like a job posting.
pub fn has_job_keywords(text: &str) -> bool {
    if text.chars().count() <= 10 {
        return false;
    }
    let lower = text.to_lowercase();
    JOB_TEXT_KEYWORDS.iter().any(|k| lower.contains(k))
}

pub fn has_job_url(href: &str) -> bool {
    JOB_URL_SEGMENTS.iter().any(|s| href.contains(s))
}

pub fn has_job_class(class_name: &str) -> bool {
    JOB_CLASS_KEYWORDS.iter().any(|k| class_name.contains(k))
}

pub fn is_company_stop_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    COMPANY_STOP_WORDS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_match_includes_seniority_and_is_trimmed() {
        assert_eq!(
            find_job_title("Acme is hiring a Senior Backend Engineer in Boston"),
            Some("Senior Backend Engineer")
        );
        assert_eq!(
            find_job_title("Join us as   software developer today"),
            Some("software developer")
        );
        assert_eq!(
            find_job_title("Full-Stack Developer wanted"),
            Some("Full-Stack Developer")
        );
    }

    #[test]
    fn bare_engineer_is_not_a_title_match() {
        assert_eq!(find_job_title("Data Engineer at Acme"), None);
        assert_eq!(find_job_title("Account Executive"), None);
    }

    #[test]
    fn location_is_word_bounded() {
        assert_eq!(find_location("Acme, New York office"), Some("New York"));
        assert_eq!(find_location("fully remote role"), Some("remote"));
        assert_eq!(find_location("Atlanta"), None);
        assert_eq!(find_location("Platform Engineer"), None);
    }

    #[test]
    fn keyword_signal_needs_more_than_ten_characters() {
        assert!(!has_job_keywords("engineer"));
        assert!(has_job_keywords("We need an Engineer"));
        assert!(has_job_keywords("SOFTWARE company news"));
        assert!(!has_job_keywords("Quarterly newsletter"));
    }

    #[test]
    fn url_and_class_signals() {
        assert!(has_job_url("/jobs/123"));
        assert!(has_job_url("https://x.io/careers"));
        assert!(!has_job_url("/about"));
        assert!(has_job_class("card job-tile"));
        assert!(!has_job_class("card"));
    }

    #[test]
    fn stop_words_are_case_insensitive() {
        assert!(is_company_stop_word("The"));
        assert!(is_company_stop_word("SENIOR"));
        assert!(!is_company_stop_word("Acme"));
    }
}
