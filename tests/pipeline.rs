// Integration tests for the ingest -> search -> context path.
// Runs fully offline with the hashing embedder and temp directories.

use mimic::chunking::ChunkUnit;
use mimic::config::Settings;
use mimic::orchestrator::Orchestrator;
use mimic::rag::{get_context, NO_CONTEXT};
use std::path::Path;
use tempfile::TempDir;

const INTERVIEW_SRT: &str = "1\r\n00:00:00,000 --> 00:00:03,000\r\nThe analytical engine weaves algebraic patterns\r\n\r\n2\r\n00:00:03,000 --> 00:00:06,000\r\njust as the jacquard loom weaves flowers and leaves\r\n\r\n3\r\n00:00:06,000 --> 00:00:09,000\r\n42\r\npoetical science matters\r\n";

fn settings(root: &Path) -> Settings {
    let mut settings = Settings::default().with_data_root(root);
    settings.embedding.provider = "hashing".to_string();
    settings.embedding.dimensions = 256;
    settings.chunking.unit = ChunkUnit::Words;
    settings.chunking.window_size = 8;
    settings.chunking.overlap = 2;
    settings
}

fn orchestrator(dir: &TempDir) -> Orchestrator {
    Orchestrator::new(settings(dir.path())).unwrap()
}

fn write_file(dir: &TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_ingest_caption_file_then_query() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator(&dir);
    let input = write_file(&dir, "interview.en.srt", INTERVIEW_SRT);

    let result = orch.ingest("Ada Lovelace", &input).await.unwrap();
    // 18 words, window 8, step 6 -> 3 chunks
    assert_eq!(result.chunks_indexed, 3);
    assert_eq!(result.source, "interview");

    let index = orch.knowledge_base().index("Ada Lovelace");
    let hits = index.search("jacquard loom weaves flowers", 2).await;
    assert_eq!(hits.len(), 2);
    assert!(hits[0].score <= hits[1].score);
    assert!(hits.iter().all(|h| h.chunk.persona == "Ada Lovelace"));

    let context = get_context(&index, "poetical science", 3).await;
    assert!(context.starts_with("[Source: interview]\n"));
    assert_eq!(context.matches("\n\n---\n\n").count(), 2);
    assert!(!context.contains("42"));
}

#[tokio::test]
async fn test_exact_chunk_text_is_top_hit() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator(&dir);
    orch.ingest_text(
        "Grace",
        "one two three four five six seven eight nine ten eleven twelve thirteen fourteen",
        "counting",
    )
    .await
    .unwrap();

    let index = orch.knowledge_base().index("Grace");
    let hits = index.search("seven eight nine ten eleven twelve thirteen fourteen", 1).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].chunk.chunk_index, 1);
    assert!(hits[0].score.abs() < 1e-5);
}

#[tokio::test]
async fn test_collections_survive_reopen_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    {
        let orch = orchestrator(&dir);
        orch.ingest_text("Marie", "radium and polonium glow", "lab-notes")
            .await
            .unwrap();
    }

    let orch = orchestrator(&dir);
    let kb = orch.knowledge_base();
    assert_eq!(kb.stats("Marie").await.document_count, 1);
    assert_eq!(kb.record("marie").unwrap().unwrap().sources, vec!["lab-notes"]);

    assert!(kb.delete("Marie").await.unwrap());
    assert_eq!(kb.index("Marie").count().await, 0);
    assert!(kb.index("Marie").search("radium", 5).await.is_empty());
    assert!(kb.record("Marie").unwrap().is_none());
    assert!(!kb.delete("Marie").await.unwrap());
}

#[tokio::test]
async fn test_personas_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator(&dir);
    orch.ingest_text("Alice", "rabbits and pocket watches", "wonderland")
        .await
        .unwrap();
    orch.ingest_text("Bob", "rabbits in the garden", "allotment")
        .await
        .unwrap();

    let kb = orch.knowledge_base();
    assert_eq!(kb.list_personas().await, vec!["alice", "bob"]);

    let alice_hits = kb.index("Alice").search("rabbits", 10).await;
    assert_eq!(alice_hits.len(), 1);
    assert_eq!(alice_hits[0].chunk.source, "wonderland");
    assert_eq!(alice_hits[0].chunk.persona, "Alice");
}

#[tokio::test]
async fn test_case_variants_share_a_collection() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator(&dir);
    orch.ingest_text("Alice", "first", "a").await.unwrap();
    orch.ingest_text("alice", "second", "b").await.unwrap();

    let kb = orch.knowledge_base();
    assert_eq!(kb.list_personas().await, vec!["alice"]);
    assert_eq!(kb.stats("ALICE").await.document_count, 2);
    assert_eq!(kb.stats("Alice").await.collection_name, "persona_alice");
}

#[tokio::test]
async fn test_missing_and_empty_personas_return_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator(&dir);
    let kb = orch.knowledge_base();

    let missing = get_context(&kb.index("Nobody"), "anything", 5).await;

    kb.create("Empty").await.unwrap();
    assert!(kb.exists("Empty").await);
    let empty = get_context(&kb.index("Empty"), "anything", 5).await;

    assert_eq!(missing, NO_CONTEXT);
    assert_eq!(empty, NO_CONTEXT);
}

#[tokio::test]
async fn test_invalid_chunk_settings_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut bad = settings(dir.path());
    bad.chunking.overlap = bad.chunking.window_size;

    assert!(matches!(
        Orchestrator::new(bad),
        Err(mimic::MimicError::InvalidChunkParameters { .. })
    ));
}

#[tokio::test]
async fn test_persona_names_with_dots_and_blanks() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator(&dir);

    let result = orch
        .ingest_text("Wait... What", "an ellipsis in the name", "aside")
        .await
        .unwrap();
    assert_eq!(result.chunks_indexed, 1);

    assert!(orch.ingest_text("   ", "hello world again", "src").await.is_err());

    let kb = orch.knowledge_base();
    assert_eq!(kb.list_personas().await, vec!["wait... what"]);
    assert!(!kb.exists("   ").await);
    let context = get_context(&kb.index("wait... what"), "ellipsis", 1).await;
    assert!(context.starts_with("[Source: aside]\n"));
}
