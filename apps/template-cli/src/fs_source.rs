//! Documents read from the local file system; the document id is the path

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shared_types::RawDocument;
use template_pipeline::{DocumentSource, SourceError};

pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    /// Relative ids resolve against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, id: &str) -> PathBuf {
        let path = Path::new(id);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

fn source_error(id: &str, err: std::io::Error) -> SourceError {
    match err.kind() {
        ErrorKind::NotFound => SourceError::NotFound(id.to_string()),
        ErrorKind::PermissionDenied => SourceError::AccessDenied(id.to_string()),
        ErrorKind::InvalidData => SourceError::Unreadable(format!("{}: {}", id, err)),
        _ => SourceError::Transient(format!("{}: {}", id, err)),
    }
}

#[async_trait]
impl DocumentSource for FsDocumentSource {
    async fn fetch_document_text(&self, id: &str) -> Result<RawDocument, SourceError> {
        let path = self.resolve(id);
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| source_error(id, e))?;
        let modified = tokio::fs::metadata(&path)
            .await
            .and_then(|m| m.modified())
            .map_err(|e| source_error(id, e))?;

        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.to_string());

        let mut document = RawDocument::from_text(id, title, text);
        document.modified_at = DateTime::<Utc>::from(modified);
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_files_relative_to_root() {
        let dir = std::env::temp_dir().join(format!("template-cli-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("contrato.txt"), "Contratante: {{cliente_nome}}")
            .await
            .unwrap();

        let source = FsDocumentSource::new(&dir);
        let document = source.fetch_document_text("contrato.txt").await.unwrap();
        assert_eq!(document.title, "contrato.txt");
        assert_eq!(document.word_count, 2);

        let metadata = source.fetch_metadata("contrato.txt").await.unwrap();
        assert_eq!(metadata.id, "contrato.txt");

        assert_eq!(
            source.fetch_document_text("missing.txt").await.unwrap_err(),
            SourceError::NotFound("missing.txt".to_string())
        );

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_non_utf8_file_is_not_transient() {
        let dir = std::env::temp_dir().join(format!("template-cli-bin-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("scan.pdf"), [0xff, 0xfe, 0xfd]).await.unwrap();

        let source = FsDocumentSource::new(&dir);
        let err = source.fetch_document_text("scan.pdf").await.unwrap_err();
        assert!(matches!(err, SourceError::Unreadable(ref message) if message.starts_with("scan.pdf")));
        assert!(!template_pipeline::PipelineError::from(err).is_transient());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
