/*!
 * Unit tests for file operations and the subtitle path scheme
 */

use std::path::PathBuf;

use sublingo::file_utils::{FileManager, SubtitlePathScheme};

use crate::common::create_temp_dir;

#[test]
fn test_write_to_file_withMissingParents_shouldCreateThem() {
    let temp_dir = create_temp_dir().unwrap();
    let nested = temp_dir.path().join("a").join("b").join("file.srt");

    FileManager::write_to_file(&nested, "content").unwrap();

    assert!(FileManager::file_exists(&nested));
    assert_eq!(FileManager::read_to_string(&nested).unwrap(), "content");
}

#[test]
fn test_remove_file_withMissingFile_shouldBeNoOp() {
    let temp_dir = create_temp_dir().unwrap();
    assert!(FileManager::remove_file(temp_dir.path().join("missing.srt")).is_ok());
}

#[test]
fn test_translated_path_withSeries_shouldIncludeSeasonAndEpisode() {
    let scheme = SubtitlePathScheme::new("subtitles");
    let path = scheme.translated_path("googlefree", "fre", "tt0903747", Some(1), Some(5));

    assert_eq!(
        path,
        PathBuf::from("subtitles/googlefree/fre/tt0903747/season1/tt0903747-translated-5-1.srt")
    );
}

#[test]
fn test_translated_path_withMovie_shouldOmitSeasonAndEpisode() {
    let scheme = SubtitlePathScheme::new("subtitles");
    let path = scheme.translated_path("openai", "es", "tt0111161", None, None);

    assert_eq!(
        path,
        PathBuf::from("subtitles/openai/es/tt0111161/tt0111161-translated-1.srt")
    );
}

#[test]
fn test_download_path_withSeries_shouldSkipProviderSegment() {
    let scheme = SubtitlePathScheme::new("subtitles");
    let path = scheme.download_path("fre", "tt0903747", Some(1), Some(5), 1);

    assert_eq!(
        path,
        PathBuf::from("subtitles/fre/tt0903747/season1/tt0903747-subtitle_5-1.srt")
    );
}

#[test]
fn test_download_path_withSecondCandidate_shouldUseOrdinal() {
    let scheme = SubtitlePathScheme::new("subtitles");
    let path = scheme.download_path("es", "tt0111161", None, None, 2);

    assert_eq!(
        path,
        PathBuf::from("subtitles/es/tt0111161/tt0111161-subtitle-2.srt")
    );
}

#[test]
fn test_translated_url_path_shouldUseForwardSlashes() {
    let scheme = SubtitlePathScheme::new("/var/data/subtitles");
    let url_path = scheme.translated_url_path("googlefree", "fre", "tt0903747", Some(2), Some(3));

    assert_eq!(
        url_path,
        "subtitles/googlefree/fre/tt0903747/season2/tt0903747-translated-3-1.srt"
    );
}

#[test]
fn test_translated_url_path_withMovie_shouldMatchTranslatedFilename() {
    let scheme = SubtitlePathScheme::new("subtitles");
    let url_path = scheme.translated_url_path("openai", "es", "tt0111161", None, None);

    assert_eq!(url_path, "subtitles/openai/es/tt0111161/tt0111161-translated-1.srt");
}
