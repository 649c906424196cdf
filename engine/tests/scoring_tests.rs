use std::collections::HashSet;

use engine::score::{category_bonus, jaccard, skill_token_bonus, title_bonus};
use engine::{match_all, score_one, EngineError, JobPosting, ResumeProfile, ScoringWeights};

fn skill_set(skills: &[&str]) -> HashSet<String> {
    skills.iter().map(|s| s.to_string()).collect()
}

fn posting(id: &str, title: &str, description: &str) -> JobPosting {
    JobPosting {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        ..Default::default()
    }
}

/// The worked example: keywords {python, sql, agile} against description
/// tokens {python, react, agile}, posting skills {python}, category
/// "engineering", title "Python Developer".
fn example_pair() -> (ResumeProfile, JobPosting) {
    let resume = ResumeProfile::new("Python SQL Agile", &["Python".into(), "SQL".into()]);
    let job = JobPosting {
        category: Some("engineering".to_string()),
        skills: skill_set(&["python"]),
        ..posting("job-1", "Python Developer", "Python React Agile")
    };
    (resume, job)
}

#[test]
fn example_scenario_is_reproducible() {
    let (resume, job) = example_pair();
    assert_eq!(resume.keywords, skill_set(&["python", "sql", "agile"]));
    assert_eq!(resume.skills, skill_set(&["python", "sql"]));

    let breakdown = score_one(&resume, &job, &ScoringWeights::default());
    assert_eq!(breakdown.similarity_score, 0.5);
    assert_eq!(breakdown.token_bonus, 1.0);
    assert_eq!(breakdown.category_bonus, 0.0);
    assert_eq!(breakdown.title_bonus, 0.5);
    assert_eq!(breakdown.total_bonus, 1.5);
    // 0.5 * 0.6 + 1.5 * (0.4 / 3) = 0.5
    assert_eq!(breakdown.match_percentage, 50);
}

#[test]
fn scoring_is_deterministic() {
    let (resume, job) = example_pair();
    let weights = ScoringWeights::default();
    let first = score_one(&resume, &job, &weights);
    for _ in 0..10 {
        assert_eq!(score_one(&resume, &job, &weights), first);
    }
}

#[test]
fn identical_keyword_sets_score_identically() {
    let (_, job) = example_pair();
    let a = ResumeProfile::new("Python SQL Agile", &[]);
    let b = ResumeProfile::new("agile... PYTHON; sql", &[]);
    assert_eq!(a.keywords, b.keywords);
    let weights = ScoringWeights::default();
    assert_eq!(score_one(&a, &job, &weights), score_one(&b, &job, &weights));
}

#[test]
fn components_and_percentage_stay_in_bounds() {
    let weights = ScoringWeights::default();
    let resume = ResumeProfile::new(
        "Python developer, SQL, react, docker, kubernetes, engineering background",
        &["python".into()],
    );
    let postings = vec![
        example_pair().1,
        posting("empty", "", ""),
        JobPosting {
            category: Some("engineering".to_string()),
            skills: skill_set(&["python", "sql", "react", "docker"]),
            ..posting("max", "Python SQL React Docker Kubernetes Engineering", "Python developer, SQL, react, docker, kubernetes, engineering background")
        },
    ];
    for job in &postings {
        let b = score_one(&resume, job, &weights);
        for component in [b.similarity_score, b.token_bonus, b.category_bonus, b.title_bonus] {
            assert!((0.0..=1.0).contains(&component), "component out of range: {component}");
        }
        assert!((0.0..=3.0).contains(&b.total_bonus));
        assert!(b.match_percentage <= 100);
    }
}

#[test]
fn saturated_posting_caps_at_100() {
    // Perfect similarity and all three bonuses maxed: raw hits 1.0 exactly.
    let resume = ResumeProfile::new("Python engineering", &[]);
    let job = JobPosting {
        category: Some("engineering".to_string()),
        skills: skill_set(&["python"]),
        ..posting("sat", "Python Engineering", "Python engineering")
    };
    let b = score_one(&resume, &job, &ScoringWeights::default());
    assert_eq!(b.similarity_score, 1.0);
    assert_eq!(b.total_bonus, 3.0);
    assert_eq!(b.match_percentage, 100);
}

#[test]
fn empty_resume_floors_at_zero() {
    let resume = ResumeProfile::from_text("");
    let (_, job) = example_pair();
    let b = score_one(&resume, &job, &ScoringWeights::default());
    assert_eq!(b.match_percentage, 0);
    assert_eq!(b.similarity_score, 0.0);
    assert_eq!(b.total_bonus, 0.0);
}

#[test]
fn posting_without_signal_scores_zero() {
    let resume = ResumeProfile::new("Python SQL Agile", &[]);
    let job = posting("blank", "Regional Sales Lead", "");
    let b = score_one(&resume, &job, &ScoringWeights::default());
    assert_eq!(b.match_percentage, 0);
}

#[test]
fn jaccard_of_empty_sets_is_zero() {
    let empty: HashSet<String> = HashSet::new();
    let some = skill_set(&["python"]);
    assert_eq!(jaccard(&empty, &some), 0.0);
    assert_eq!(jaccard(&some, &empty), 0.0);
    assert_eq!(jaccard(&empty, &empty), 0.0);
}

#[test]
fn no_declared_posting_skills_earns_no_token_bonus() {
    let resume = ResumeProfile::new("Python SQL Agile", &[]);
    let job = posting("noskills", "Python Developer", "Python everywhere");
    assert_eq!(skill_token_bonus(&resume, &job), 0.0);
}

#[test]
fn token_bonus_never_decreases_when_adding_a_matching_skill() {
    let resume = ResumeProfile::new("Python SQL Agile", &["python".into(), "sql".into()]);
    let mut job = JobPosting {
        skills: skill_set(&["python", "fortran"]),
        ..posting("mono", "Developer", "")
    };
    let before = skill_token_bonus(&resume, &job);
    job.skills.insert("sql".to_string());
    let after = skill_token_bonus(&resume, &job);
    assert!(after >= before, "token bonus decreased: {before} -> {after}");
}

#[test]
fn category_bonus_is_binary() {
    let resume = ResumeProfile::new("Engineering lead with Python", &[]);
    let mut job = JobPosting {
        category: Some("Engineering".to_string()),
        ..posting("cat", "Lead", "")
    };
    assert_eq!(category_bonus(&resume, &job), 1.0);
    job.category = Some("Hospitality & Catering".to_string());
    assert_eq!(category_bonus(&resume, &job), 0.0);
    job.category = None;
    assert_eq!(category_bonus(&resume, &job), 0.0);
}

#[test]
fn title_bonus_is_overlap_ratio() {
    let resume = ResumeProfile::new("Python SQL Agile", &[]);
    let job = posting("title", "Python Developer", "");
    assert_eq!(title_bonus(&resume, &job), 0.5);
    let no_title = posting("no-title", "", "");
    assert_eq!(title_bonus(&resume, &no_title), 0.0);
}

#[test]
fn batch_is_complete_and_keyed_by_id() {
    let resume = ResumeProfile::new("Python SQL Agile", &[]);
    let postings: Vec<JobPosting> = (0..25)
        .map(|i| posting(&format!("job-{i}"), "Python Developer", "Python React Agile"))
        .collect();
    let outcomes = match_all(&resume, &postings, &ScoringWeights::default());
    assert_eq!(outcomes.len(), postings.len());
    for p in &postings {
        assert!(outcomes.contains_key(&p.id));
    }
}

#[test]
fn invalid_posting_fails_in_isolation() {
    let resume = ResumeProfile::new("Python SQL Agile", &[]);
    let postings = vec![
        example_pair().1,
        posting("  ", "Ghost Posting", "Python"),
        posting("job-2", "SQL Analyst", "SQL reporting"),
    ];
    let outcomes = match_all(&resume, &postings, &ScoringWeights::default());
    assert_eq!(outcomes.len(), 3);

    let failed = &outcomes["  "];
    assert!(!failed.is_scored());
    assert_eq!(failed.match_percentage(), 0);
    match failed {
        engine::MatchOutcome::Failed { error, .. } => assert!(error.contains("id")),
        other => panic!("expected failure outcome, got {other:?}"),
    }

    assert!(outcomes["job-1"].is_scored());
    assert!(outcomes["job-2"].is_scored());
    assert!(outcomes["job-2"].match_percentage() > 0);
}

#[test]
fn duplicate_ids_keep_the_first_outcome() {
    let resume = ResumeProfile::new("Python SQL Agile", &[]);
    let postings = vec![
        posting("dup", "Python Developer", "Python React Agile"),
        posting("dup", "Unrelated", ""),
    ];
    let outcomes = match_all(&resume, &postings, &ScoringWeights::default());
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes["dup"].match_percentage() > 0);
}

#[test]
fn repeated_batches_do_not_cross_contaminate() {
    let (_, job) = example_pair();
    let postings = vec![job];
    let weights = ScoringWeights::default();
    let python = ResumeProfile::new("Python SQL Agile", &["python".into(), "sql".into()]);
    let chef = ResumeProfile::new("Pastry chef, patisserie, menus", &[]);

    let first = match_all(&python, &postings, &weights);
    let _ = match_all(&chef, &postings, &weights);
    let again = match_all(&python, &postings, &weights);
    assert_eq!(
        first["job-1"].match_percentage(),
        again["job-1"].match_percentage()
    );
}

#[test]
fn weight_validation_rejects_bad_configs() {
    assert!(ScoringWeights::default().validate().is_ok());

    let negative = ScoringWeights { similarity: -0.1, bonus: 0.1 };
    assert!(matches!(negative.validate(), Err(EngineError::Configuration(_))));

    let nan = ScoringWeights { similarity: f64::NAN, bonus: 0.1 };
    assert!(matches!(nan.validate(), Err(EngineError::Configuration(_))));

    let zero = ScoringWeights { similarity: 0.0, bonus: 0.0 };
    assert!(matches!(zero.validate(), Err(EngineError::Configuration(_))));
}

#[test]
fn profile_extracts_lexicon_skills_from_text() {
    let resume = ResumeProfile::from_text("Built pipelines with Docker, Kubernetes and PostgreSQL.");
    assert!(resume.skills.contains("docker"));
    assert!(resume.skills.contains("kubernetes"));
    assert!(resume.skills.contains("postgresql"));
    assert!(!resume.skills.contains("pipelines"));
}
