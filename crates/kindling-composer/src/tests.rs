use super::*;
use kindling_core::signature::{jaccard, parse_signature};
use kindling_history::HistoryStore;
use tempfile::TempDir;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

/// Two single-template topics. `preamble` lands above every table, `topics` inside `[topics]`.
fn config_with(preamble: &str, topics: &str, cooldowns: &str) -> Config {
    let toml_str = format!(
        r#"
{preamble}

[generation]
candidate_count = 5
deterministic_by_date = true

[length]
min = 0
max = 400

[cooldowns]
{cooldowns}

[similarity]
mode = "ngram"
threshold = 0.75
history_size = 10

[topics]
{topics}

[tones]
calm = 1.0

[constraints.none]
text = ""

[twists.none]
text = ""

[[templates]]
id = "alpha_template"
format = "question"
allowed_topics = ["alpha"]
base_text = "Alpha prompt about {{item}}."
variable_pools = {{ item = ["tea", "coffee"] }}

[[templates]]
id = "beta_template"
format = "question"
allowed_topics = ["beta"]
base_text = "Beta prompt about {{item}}."
variable_pools = {{ item = ["rain", "sun"] }}
"#
    );
    Config::from_toml_str(&toml_str).unwrap()
}

const DEFAULT_COOLDOWNS: &str = "template_days = 21\ntopic_days = 5\ntone_days = 3\n\
                                 constraint_days = 10\ntwist_days = 10";

fn config() -> Config {
    config_with("", "alpha = 1.0\nbeta = 1.0", DEFAULT_COOLDOWNS)
}

async fn composer_in(dir: &TempDir, name: &str, config: Config) -> Composer {
    let path = dir.path().join(name);
    let store = HistoryStore::open(path.to_str().unwrap()).await.unwrap();
    Composer::new(config, store)
}

fn unrelated(date: NaiveDate, topic: &str, template_id: &str) -> Candidate {
    Candidate::new(
        date,
        topic,
        template_id,
        "question",
        "calm",
        "none",
        "none",
        "Completely different words here.",
    )
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_same_date_and_history_give_same_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let a = composer_in(&dir, "a.sqlite", config()).await;
    let b = composer_in(&dir, "b.sqlite", config()).await;

    let first = a.generate_candidates(day(1), None).await.unwrap();
    let second = b.generate_candidates(day(1), None).await.unwrap();
    assert_eq!(first, second);

    let chosen_a = a.compose(day(1), None).await.unwrap();
    let chosen_b = b.compose(day(1), None).await.unwrap();
    assert_eq!(chosen_a, chosen_b);
}

#[tokio::test]
async fn test_entropy_mode_still_produces_valid_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config();
    cfg.generation.deterministic_by_date = false;
    let composer = composer_in(&dir, "h.sqlite", cfg).await;
    let chosen = composer.preview(day(1), None).await.unwrap();
    assert!(["alpha_template", "beta_template"].contains(&chosen.template_id.as_str()));
}

// ---------------------------------------------------------------------------
// Cooldowns and novelty
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_cooled_down_topic_and_template_switch_next_day() {
    let dir = tempfile::tempdir().unwrap();
    // The date seed alone picks beta on day 1; pin alpha so the switch is alpha -> beta.
    let cfg = config_with("", "alpha = 1000.0\nbeta = 0.001", DEFAULT_COOLDOWNS);
    let composer = composer_in(&dir, "h.sqlite", cfg).await;

    let first = composer.compose(day(1), None).await.unwrap();
    assert_eq!(first.template_id, "alpha_template");
    assert_eq!(first.topic_bucket, "alpha");

    let second = composer.compose(day(2), None).await.unwrap();
    assert_eq!(second.template_id, "beta_template");
    assert_eq!(second.topic_bucket, "beta");
    assert!(second.prompt_text().starts_with("Beta prompt about "));
}

#[tokio::test]
async fn test_recent_history_blocks_topic_and_template() {
    let dir = tempfile::tempdir().unwrap();
    let composer = composer_in(&dir, "h.sqlite", config()).await;
    composer
        .persist(&unrelated(day(9), "alpha", "alpha_template"))
        .await
        .unwrap();

    for candidate in composer.generate_candidates(day(10), None).await.unwrap() {
        assert_eq!(candidate.topic_bucket, "beta");
        assert_eq!(candidate.template_id, "beta_template");
    }
}

#[tokio::test]
async fn test_starved_pool_waives_cooldown() {
    let dir = tempfile::tempdir().unwrap();
    // One topic, one template that never cools down.
    let toml_str = r#"
        [length]
        min = 0

        [topics]
        alpha = 1.0

        [tones]
        calm = 1.0

        [constraints]
        none = 1.0

        [twists]
        none = 1.0

        [[templates]]
        id = "alpha_template"
        format = "question"
        allowed_topics = ["alpha"]
        base_text = "Alpha prompt about tea."
        cooldown_days = 0
    "#;
    let cfg = Config::from_toml_str(toml_str).unwrap();
    let composer = composer_in(&dir, "h.sqlite", cfg).await;
    composer
        .persist(&unrelated(day(1), "alpha", "alpha_template"))
        .await
        .unwrap();

    let chosen = composer.compose(day(2), None).await.unwrap();
    assert_eq!(chosen.topic_bucket, "alpha");
    assert_eq!(chosen.tone, "calm");
    assert_eq!(chosen.prompt_text(), "Alpha prompt about tea.");
}

#[tokio::test]
async fn test_consecutive_days_stay_novel_and_in_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let cooldowns = "template_days = 2\ntopic_days = 2\ntone_days = 0\n\
                     constraint_days = 0\ntwist_days = 0";
    let cfg = config_with("", "alpha = 1.0\nbeta = 1.0", cooldowns);
    let threshold = cfg.similarity.threshold;
    let composer = composer_in(&dir, "h.sqlite", cfg).await;

    let mut chosen: Vec<Candidate> = Vec::new();
    for d in 1..=4 {
        let today = composer.compose(day(d), None).await.unwrap();
        assert!(today.length() <= 400);
        let own = parse_signature(today.signature());
        for earlier in &chosen {
            let sim = jaccard(&own, &parse_signature(earlier.signature()));
            assert!(sim < threshold, "day {d} too close to {}", earlier.prompt_text());
        }
        if let Some(yesterday) = chosen.last() {
            assert_ne!(today.topic_bucket, yesterday.topic_bucket);
            assert_ne!(today.template_id, yesterday.template_id);
        }
        chosen.push(today);
    }
    assert_eq!(composer.store().count().await.unwrap(), 4);
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_everything_banned_exhausts_generation() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_with(
        "banned_phrases = [\"PROMPT\"]",
        "alpha = 1.0\nbeta = 1.0",
        DEFAULT_COOLDOWNS,
    );
    let composer = composer_in(&dir, "h.sqlite", cfg).await;

    let err = composer.compose(day(1), Some(3)).await.unwrap_err();
    assert!(matches!(
        err,
        KindlingError::GenerationExhausted { attempts } if attempts == 3 * ATTEMPTS_PER_CANDIDATE
    ));
    assert_eq!(composer.store().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_missing_placeholder_values_surface_render_error() {
    let dir = tempfile::tempdir().unwrap();
    let toml_str = r#"
        [topics]
        alpha = 1.0

        [tones]
        calm = 1.0

        [constraints]
        none = 1.0

        [twists]
        none = 1.0

        [[templates]]
        id = "broken"
        format = "question"
        allowed_topics = ["alpha"]
        base_text = "Tell me about {thing}."
    "#;
    let cfg = Config::from_toml_str(toml_str).unwrap();
    let composer = composer_in(&dir, "h.sqlite", cfg).await;

    let err = composer.compose(day(1), None).await.unwrap_err();
    assert!(matches!(err, KindlingError::TemplateRender { ref template, .. } if template == "broken"));
    assert_eq!(composer.store().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_zero_count_override_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let composer = composer_in(&dir, "h.sqlite", config()).await;
    assert!(matches!(
        composer.generate_candidates(day(1), Some(0)).await,
        Err(KindlingError::Config(_))
    ));
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_preview_does_not_touch_history() {
    let dir = tempfile::tempdir().unwrap();
    let composer = composer_in(&dir, "h.sqlite", config()).await;
    let previewed = composer.preview(day(1), None).await.unwrap();
    assert_eq!(composer.store().count().await.unwrap(), 0);

    let composed = composer.compose(day(1), None).await.unwrap();
    assert_eq!(previewed, composed);
    assert_eq!(composer.store().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_composed_prompt_round_trips_through_history() {
    let dir = tempfile::tempdir().unwrap();
    let composer = composer_in(&dir, "h.sqlite", config()).await;
    let chosen = composer.compose(day(3), None).await.unwrap();

    let stored = composer.store().fetch_recent(1).await.unwrap();
    let record = &stored[0];
    assert_eq!(record.date, day(3));
    assert_eq!(record.topic_bucket, chosen.topic_bucket);
    assert_eq!(record.template_id, chosen.template_id);
    assert_eq!(record.format, chosen.format);
    assert_eq!(record.tone, chosen.tone);
    assert_eq!(record.constraint_label, chosen.constraint_label);
    assert_eq!(record.twist, chosen.twist);
    assert_eq!(record.prompt_text, chosen.prompt_text());
    assert_eq!(record.signature, chosen.signature());
    assert_eq!(record.length, chosen.length());
    assert!(record.engagement_score.is_none());
}

#[tokio::test]
async fn test_candidate_json_shape() {
    let dir = tempfile::tempdir().unwrap();
    let composer = composer_in(&dir, "h.sqlite", config()).await;
    let chosen = composer.preview(day(1), None).await.unwrap();
    let json = serde_json::to_value(&chosen).unwrap();
    assert_eq!(json["date"], "2024-01-01");
    assert!(json["score"].is_number());
    assert_eq!(json["length"], chosen.length());
}

#[tokio::test]
async fn test_embedding_mode_composes_with_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config();
    cfg.similarity.mode = kindling_core::config::SimilarityMode::Embedding;
    let composer = composer_in(&dir, "h.sqlite", cfg).await;
    assert!(composer.compose(day(1), None).await.is_ok());
}
