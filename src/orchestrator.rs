//! Pipeline orchestrator for Mimic.
//!
//! Coordinates ingestion from caption fetching to indexing, and keeps each
//! persona's source list up to date.

use crate::captions::{fetch_transcript, parse_input, CaptionSource, NormalizedTranscript, YtDlpCaptionSource};
use crate::chunking::{ChunkingConfig, TextChunker};
use crate::config::Settings;
use crate::embedding::{create_embedder, Embedder};
use crate::error::{MimicError, Result};
use crate::knowledge_base::KnowledgeBase;
use crate::vector_store::{
    checked_collection_key, MemoryVectorStore, SqliteVectorStore, VectorStore,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Maximum length of an exported transcript file stem.
const MAX_FILENAME_CHARS: usize = 100;

/// Build the vector store named by the settings.
pub fn create_vector_store(settings: &Settings) -> Result<Arc<dyn VectorStore>> {
    match settings.storage.provider.to_lowercase().as_str() {
        "sqlite" => Ok(Arc::new(SqliteVectorStore::new(settings.collections_dir()))),
        "memory" => Ok(Arc::new(MemoryVectorStore::new())),
        other => Err(MimicError::Config(format!(
            "Unknown storage provider: {}",
            other
        ))),
    }
}

/// Replace characters that are invalid in file names and cap the length.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c => c,
        })
        .take(MAX_FILENAME_CHARS)
        .collect()
}

/// The main orchestrator for the Mimic pipeline.
pub struct Orchestrator {
    settings: Settings,
    knowledge_base: KnowledgeBase,
    chunker: TextChunker,
}

impl Orchestrator {
    /// Create an orchestrator from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let embedder = create_embedder(&settings.embedding)?;
        let vector_store = create_vector_store(&settings)?;
        Self::with_components(settings, vector_store, embedder)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        vector_store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        settings.validate()?;

        let chunker = TextChunker::new(ChunkingConfig::from(&settings.chunking))?;
        let knowledge_base = KnowledgeBase::new(vector_store, embedder, settings.personas_dir());

        Ok(Self {
            settings,
            knowledge_base,
            chunker,
        })
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn fetch_timeout(&self) -> u64 {
        self.settings.captions.fetch_timeout_seconds
    }

    /// Ingest one video or caption file into a persona.
    #[instrument(skip(self), fields(input = %input))]
    pub async fn ingest(&self, persona: &str, input: &str) -> Result<IngestResult> {
        let (source, content_id) = parse_input(input, self.fetch_timeout()).ok_or_else(|| {
            MimicError::InvalidInput(format!("Could not parse input: {}", input))
        })?;

        self.ingest_from(source.as_ref(), persona, &content_id)
            .await
            .map_err(|e| MimicError::ingestion(&content_id, e))
    }

    /// Ingest one content item from an explicit caption source.
    pub async fn ingest_from(
        &self,
        source: &dyn CaptionSource,
        persona: &str,
        content_id: &str,
    ) -> Result<IngestResult> {
        info!("Fetching captions for {}", content_id);
        let transcript =
            fetch_transcript(source, content_id, &self.settings.captions.preferred_languages)
                .await?;

        let mut result = self
            .ingest_text(persona, &transcript.text, transcript.source_name())
            .await?;
        result.content_id = transcript.id;
        Ok(result)
    }

    /// Ingest every video of a playlist or channel.
    ///
    /// Entries are ingested one after another; a failing entry is recorded
    /// and skipped.
    #[instrument(skip(self))]
    pub async fn ingest_playlist(
        &self,
        persona: &str,
        url: &str,
        limit: Option<usize>,
    ) -> Result<PlaylistReport> {
        let source = YtDlpCaptionSource::new(self.fetch_timeout());
        let entries = source.list_entries(url, limit).await?;

        let mut report = PlaylistReport::default();
        for entry in entries {
            match self.ingest_from(&source, persona, &entry.id).await {
                Ok(result) => report.ingested.push(result),
                Err(e) => {
                    let err = MimicError::ingestion(&entry.id, e);
                    warn!("{}", err);
                    report.failed.push(err);
                }
            }
        }

        info!(
            "Playlist done: {} ingested, {} failed",
            report.ingested.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Chunk and index already-normalized text under `source`.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn ingest_text(&self, persona: &str, text: &str, source: &str) -> Result<IngestResult> {
        checked_collection_key(persona)?;
        let chunks = self.chunker.chunk(text, source, persona)?;

        if chunks.is_empty() {
            warn!("No usable text in {}", source);
            return Ok(IngestResult {
                persona: persona.to_string(),
                source: source.to_string(),
                content_id: source.to_string(),
                chunks_indexed: 0,
            });
        }

        info!("Indexing {} chunks from {}", chunks.len(), source);
        let chunks_indexed = self.knowledge_base.index(persona).add(chunks).await?;

        // Chunks are already committed; a record failure only loses bookkeeping.
        if let Err(e) = self.knowledge_base.add_source(persona, source) {
            warn!("Indexed {} but could not record source {}: {}", persona, source, e);
        }

        Ok(IngestResult {
            persona: persona.to_string(),
            source: source.to_string(),
            content_id: source.to_string(),
            chunks_indexed,
        })
    }

    /// Ingest a plain-text transcript file. The source defaults to the file stem.
    pub async fn ingest_file(
        &self,
        persona: &str,
        path: &Path,
        source_name: Option<&str>,
    ) -> Result<IngestResult> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            MimicError::ingestion(path.display().to_string(), MimicError::Io(e))
        })?;

        let source = match source_name {
            Some(name) => name.to_string(),
            None => path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("transcript")
                .to_string(),
        };

        self.ingest_text(persona, &text, &source).await
    }

    /// Fetch and normalize a transcript without indexing it.
    pub async fn fetch_transcript(&self, input: &str) -> Result<NormalizedTranscript> {
        let (source, content_id) = parse_input(input, self.fetch_timeout()).ok_or_else(|| {
            MimicError::InvalidInput(format!("Could not parse input: {}", input))
        })?;

        fetch_transcript(
            source.as_ref(),
            &content_id,
            &self.settings.captions.preferred_languages,
        )
        .await
    }

    /// Write a transcript to `output`, or to the transcripts directory under
    /// a name derived from its title.
    pub fn save_transcript(
        &self,
        transcript: &NormalizedTranscript,
        output: Option<&Path>,
    ) -> Result<PathBuf> {
        let path = match output {
            Some(path) => path.to_path_buf(),
            None => self
                .settings
                .transcripts_dir()
                .join(format!("{}.txt", sanitize_filename(transcript.source_name()))),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &transcript.text)?;

        info!("Saved transcript to {:?}", path);
        Ok(path)
    }
}

/// Result of ingesting one content item.
#[derive(Debug, Clone)]
pub struct IngestResult {
    /// Persona the content was added to.
    pub persona: String,
    /// Source name stored with every chunk.
    pub source: String,
    /// Content identifier (video ID, file path or source name).
    pub content_id: String,
    /// Number of chunks indexed.
    pub chunks_indexed: usize,
}

/// Outcome of a playlist ingestion.
#[derive(Debug, Default)]
pub struct PlaylistReport {
    pub ingested: Vec<IngestResult>,
    pub failed: Vec<MimicError>,
}

impl PlaylistReport {
    pub fn chunks_indexed(&self) -> usize {
        self.ingested.iter().map(|r| r.chunks_indexed).sum()
    }
}
