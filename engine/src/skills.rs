use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    /// Technology skills recognized in free text. Used to seed a résumé's
    /// skill set when the caller declares none, and by the importer to tag
    /// postings whose provider record carries no skill list.
    pub static ref SKILL_LEXICON: HashSet<&'static str> = {
        let skills: &[&str] = &[
            "python", "java", "c++", "c#", "javascript", "typescript", "react", "node",
            "sql", "postgresql", "mysql", "mongodb", "redis", "graphql",
            "aws", "azure", "gcp", "docker", "kubernetes", "git", "linux", "bash",
            "flask", "django", "html", "css",
            "pandas", "numpy", "tensorflow", "scikit",
        ];
        skills.iter().copied().collect()
    };
}

/// Tokens from an already-normalized set that are known skills.
pub fn extract_skills(keywords: &HashSet<String>) -> HashSet<String> {
    keywords
        .iter()
        .filter(|k| SKILL_LEXICON.contains(k.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::normalize;

    #[test]
    fn lexicon_hits_survive_normalization() {
        let keywords = normalize("Shipped services on Docker and Kubernetes, scripting in Bash.");
        let skills = extract_skills(&keywords);
        assert!(skills.contains("docker"));
        assert!(skills.contains("kubernetes"));
        assert!(skills.contains("bash"));
        assert!(!skills.contains("services"));
    }
}
