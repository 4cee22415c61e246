/*!
 * Unit tests for the SQLite repository
 */

use sublingo::database::models::{QueueRecord, SubtitleRecord};
use sublingo::database::Repository;

fn record(media_id: &str, season: u32, episode: u32, language_code: &str) -> SubtitleRecord {
    SubtitleRecord {
        media_id: media_id.to_string(),
        content_type: if season > 0 { "series" } else { "movie" }.to_string(),
        season,
        episode,
        language_code: language_code.to_string(),
        file_path: format!("subtitles/x/{}/file.srt", media_id),
    }
}

#[test]
fn test_get_existing_withNoRecords_shouldReturnEmpty() {
    let repo = Repository::new_in_memory().unwrap();
    let paths = tokio_test::block_on(repo.get_existing("tt0111161", None, None, "fre")).unwrap();
    assert!(paths.is_empty());
}

#[tokio::test]
async fn test_record_resolved_thenGetExisting_shouldReturnFilePath() {
    let repo = Repository::new_in_memory().unwrap();
    repo.record_resolved(&record("tt0111161", 0, 0, "fre"))
        .await
        .unwrap();

    let paths = repo
        .get_existing("tt0111161", None, None, "fre")
        .await
        .unwrap();
    assert_eq!(paths, vec!["subtitles/x/tt0111161/file.srt"]);
}

#[tokio::test]
async fn test_get_existing_withDifferentLanguage_shouldNotMatch() {
    let repo = Repository::new_in_memory().unwrap();
    repo.record_resolved(&record("tt0111161", 0, 0, "fre"))
        .await
        .unwrap();

    let paths = repo
        .get_existing("tt0111161", None, None, "spa")
        .await
        .unwrap();
    assert!(paths.is_empty());
}

#[tokio::test]
async fn test_get_existing_withEpisodeKey_shouldDistinguishEpisodes() {
    let repo = Repository::new_in_memory().unwrap();
    repo.record_resolved(&record("tt0903747", 1, 2, "fre"))
        .await
        .unwrap();

    assert!(!repo
        .get_existing("tt0903747", Some(1), Some(2), "fre")
        .await
        .unwrap()
        .is_empty());
    assert!(repo
        .get_existing("tt0903747", Some(1), Some(3), "fre")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_record_resolved_withSameKeyTwice_shouldReplace() {
    let repo = Repository::new_in_memory().unwrap();

    let mut first = record("tt0111161", 0, 0, "fre");
    repo.record_resolved(&first).await.unwrap();

    first.file_path = "subtitles/x/tt0111161/replacement.srt".to_string();
    repo.record_resolved(&first).await.unwrap();

    let paths = repo
        .get_existing("tt0111161", None, None, "fre")
        .await
        .unwrap();
    assert_eq!(paths, vec!["subtitles/x/tt0111161/replacement.srt"]);
}

#[tokio::test]
async fn test_delete_resolved_shouldRemoveOnlyThatKey() {
    let repo = Repository::new_in_memory().unwrap();
    repo.record_resolved(&record("tt0111161", 0, 0, "fre"))
        .await
        .unwrap();
    repo.record_resolved(&record("tt0111161", 0, 0, "spa"))
        .await
        .unwrap();

    repo.delete_resolved("tt0111161", None, None, "fre")
        .await
        .unwrap();

    assert!(repo
        .get_existing("tt0111161", None, None, "fre")
        .await
        .unwrap()
        .is_empty());
    assert!(!repo
        .get_existing("tt0111161", None, None, "spa")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_series_registration_shouldBeIdempotent() {
    let repo = Repository::new_in_memory().unwrap();

    assert!(!repo.series_exists("tt0903747").await.unwrap());
    repo.record_series("tt0903747", "series").await.unwrap();
    assert!(repo.series_exists("tt0903747").await.unwrap());

    // A second registration is a no-op, not an error
    repo.record_series("tt0903747", "series").await.unwrap();
    assert!(repo.series_exists("tt0903747").await.unwrap());
}

#[tokio::test]
async fn test_queue_tracking_insertAndDelete_shouldRoundTrip() {
    let repo = Repository::new_in_memory().unwrap();
    let queue_record = QueueRecord {
        media_id: "tt0903747".to_string(),
        season: 1,
        episode: 2,
        subtitle_count: 1,
        language_code: "fre".to_string(),
    };

    assert!(!repo
        .queue_contains("tt0903747", Some(1), Some(2), "fre")
        .await
        .unwrap());

    repo.queue_insert(&queue_record).await.unwrap();
    assert!(repo
        .queue_contains("tt0903747", Some(1), Some(2), "fre")
        .await
        .unwrap());

    repo.queue_delete("tt0903747", Some(1), Some(2), "fre")
        .await
        .unwrap();
    assert!(!repo
        .queue_contains("tt0903747", Some(1), Some(2), "fre")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_queue_insert_withSameKeyTwice_shouldNotFail() {
    let repo = Repository::new_in_memory().unwrap();
    let queue_record = QueueRecord {
        media_id: "tt0111161".to_string(),
        season: 0,
        episode: 0,
        subtitle_count: 2,
        language_code: "es".to_string(),
    };

    repo.queue_insert(&queue_record).await.unwrap();
    repo.queue_insert(&queue_record).await.unwrap();
    assert!(repo
        .queue_contains("tt0111161", None, None, "es")
        .await
        .unwrap());
}
