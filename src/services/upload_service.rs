use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

use crate::config::UploadConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Banner,
    Regulation,
}

impl UploadKind {
    pub fn directory(&self) -> &'static str {
        match self {
            UploadKind::Banner => "banners",
            UploadKind::Regulation => "regulations",
        }
    }

    pub fn max_bytes(&self, config: &UploadConfig) -> usize {
        match self {
            UploadKind::Banner => config.banner_max_bytes,
            UploadKind::Regulation => config.regulation_max_bytes,
        }
    }

    /// File extension for an accepted content type
    pub fn extension_for(&self, content_type: &str) -> Option<&'static str> {
        match (self, content_type) {
            (UploadKind::Banner, "image/jpeg") => Some("jpg"),
            (UploadKind::Banner, "image/png") => Some("png"),
            (UploadKind::Banner, "image/webp") => Some("webp"),
            (UploadKind::Regulation, "application/pdf") => Some("pdf"),
            _ => None,
        }
    }

    fn accepted(&self) -> &'static str {
        match self {
            UploadKind::Banner => "JPEG, PNG or WebP image",
            UploadKind::Regulation => "PDF document",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredUpload {
    pub url: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Expected a {0}")]
    UnsupportedType(&'static str),
    #[error("File is empty")]
    Empty,
    #[error("File exceeds the {0} byte limit")]
    TooLarge(usize),
    #[error("Failed to store file: {0}")]
    Io(#[from] std::io::Error),
}

pub struct UploadService {
    root: PathBuf,
    public_prefix: String,
}

impl UploadService {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            root: config.dir.clone(),
            public_prefix: config.public_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Check type and size before anything touches the disk
    pub fn check(
        kind: UploadKind,
        content_type: &str,
        len: usize,
        config: &UploadConfig,
    ) -> Result<&'static str, UploadError> {
        let extension = kind
            .extension_for(content_type)
            .ok_or(UploadError::UnsupportedType(kind.accepted()))?;
        if len == 0 {
            return Err(UploadError::Empty);
        }
        let max = kind.max_bytes(config);
        if len > max {
            return Err(UploadError::TooLarge(max));
        }
        Ok(extension)
    }

    pub async fn store(
        &self,
        kind: UploadKind,
        extension: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredUpload, UploadError> {
        let dir = self.root.join(kind.directory());
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = dir.join(&file_name);
        tokio::fs::write(&path, bytes).await?;

        tracing::info!("Stored {} upload at {}", kind.directory(), path.display());

        Ok(StoredUpload {
            url: format!("{}/{}/{}", self.public_prefix, kind.directory(), file_name),
            content_type: content_type.to_string(),
            size: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_matching_types() {
        let config = UploadConfig::default();
        assert_eq!(UploadService::check(UploadKind::Banner, "image/png", 10, &config).unwrap(), "png");
        assert_eq!(UploadService::check(UploadKind::Regulation, "application/pdf", 10, &config).unwrap(), "pdf");
        assert!(matches!(
            UploadService::check(UploadKind::Banner, "application/pdf", 10, &config),
            Err(UploadError::UnsupportedType(_))
        ));
        assert!(matches!(
            UploadService::check(UploadKind::Regulation, "image/png", 10, &config),
            Err(UploadError::UnsupportedType(_))
        ));
    }

    #[test]
    fn enforces_size_limits() {
        let config = UploadConfig::default();
        assert!(matches!(
            UploadService::check(UploadKind::Banner, "image/jpeg", 0, &config),
            Err(UploadError::Empty)
        ));
        assert!(matches!(
            UploadService::check(UploadKind::Banner, "image/jpeg", config.banner_max_bytes + 1, &config),
            Err(UploadError::TooLarge(_))
        ));
        assert!(UploadService::check(UploadKind::Regulation, "application/pdf", config.banner_max_bytes + 1, &config).is_ok());
    }

    #[tokio::test]
    async fn stores_under_kind_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = UploadConfig { dir: dir.path().to_path_buf(), ..UploadConfig::default() };
        let service = UploadService::new(&config);

        let stored = service
            .store(UploadKind::Regulation, "pdf", "application/pdf", b"%PDF-1.4")
            .await
            .unwrap();

        assert!(stored.url.starts_with("/uploads/regulations/"));
        assert!(stored.url.ends_with(".pdf"));
        assert_eq!(stored.size, 8);

        let file_name = stored.url.rsplit('/').next().unwrap();
        let on_disk = dir.path().join("regulations").join(file_name);
        assert_eq!(std::fs::read(on_disk).unwrap(), b"%PDF-1.4");
    }
}
