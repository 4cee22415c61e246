use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and subtitle path utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories as needed
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Write raw bytes to a file, creating parent directories as needed
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Delete a file if it exists
    pub fn remove_file<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove file: {:?}", path))?;
        }
        Ok(())
    }
}

/// Deterministic layout of the subtitle directory tree.
///
/// Translated files live under
/// `{root}/{provider}/{languageCode}/{mediaId}[/season{N}]/{mediaId}-translated[-{episode}]-1.srt`
/// (movies omit the episode segment). Raw downloads skip the provider
/// segment, since they are provider-independent input material.
#[derive(Debug, Clone)]
pub struct SubtitlePathScheme {
    root: PathBuf,
}

impl SubtitlePathScheme {
    /// Create a scheme rooted at the given directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory of the tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the translated file for one media item
    pub fn translated_dir(
        &self,
        provider: &str,
        language_code: &str,
        media_id: &str,
        season: Option<u32>,
    ) -> PathBuf {
        let mut dir = self.root.join(provider).join(language_code).join(media_id);
        if let Some(season) = season {
            dir = dir.join(format!("season{}", season));
        }
        dir
    }

    /// Full path of the translated subtitle file
    pub fn translated_path(
        &self,
        provider: &str,
        language_code: &str,
        media_id: &str,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> PathBuf {
        let dir = self.translated_dir(provider, language_code, media_id, season);
        let filename = match episode {
            Some(episode) => format!("{}-translated-{}-1.srt", media_id, episode),
            None => format!("{}-translated-1.srt", media_id),
        };
        dir.join(filename)
    }

    /// Directory holding raw downloaded candidate files
    pub fn download_dir(&self, language_code: &str, media_id: &str, season: Option<u32>) -> PathBuf {
        let mut dir = self.root.join(language_code).join(media_id);
        if let Some(season) = season {
            dir = dir.join(format!("season{}", season));
        }
        dir
    }

    /// Path of the n-th downloaded candidate file (1-based ordinal)
    pub fn download_path(
        &self,
        language_code: &str,
        media_id: &str,
        season: Option<u32>,
        episode: Option<u32>,
        ordinal: usize,
    ) -> PathBuf {
        let dir = self.download_dir(language_code, media_id, season);
        let filename = match episode {
            Some(episode) => format!("{}-subtitle_{}-{}.srt", media_id, episode, ordinal),
            None => format!("{}-subtitle-{}.srt", media_id, ordinal),
        };
        dir.join(filename)
    }

    /// Path of the translated file relative to the root, with forward
    /// slashes, usable as a URL suffix
    pub fn translated_url_path(
        &self,
        provider: &str,
        language_code: &str,
        media_id: &str,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> String {
        let mut segments = vec![
            "subtitles".to_string(),
            provider.to_string(),
            language_code.to_string(),
            media_id.to_string(),
        ];
        if let Some(season) = season {
            segments.push(format!("season{}", season));
        }
        match episode {
            Some(episode) => segments.push(format!("{}-translated-{}-1.srt", media_id, episode)),
            None => segments.push(format!("{}-translated-1.srt", media_id)),
        }
        segments.join("/")
    }
}
