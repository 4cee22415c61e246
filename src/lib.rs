/*!
 * # Sublingo
 *
 * A Rust library for sourcing subtitles from third-party providers and
 * translating them into a target language.
 *
 * ## Features
 *
 * - Ordered multi-source subtitle resolution with language fallback
 * - SRT cue parsing and serialization with verbatim timing
 * - Batched, parity-checked translation with bounded retries
 * - Translation providers: Google Translate (free endpoint) and any
 *   OpenAI-compatible API
 * - Single-worker job queue serializing translation work
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `app_controller`: Request orchestration
 * - `source_resolver`: Ordered fallback across subtitle sources
 * - `subtitle_codec`: SRT cue parsing and serialization
 * - `translation`: Batch translation engine and diagnostics
 * - `job_queue`: Serialized job execution with bounded retries
 * - `pipeline`: The per-job download/translate/persist worker body
 * - `placeholder`: Sentinel subtitle files for pending jobs
 * - `providers`: Clients for subtitle sources and translation APIs
 * - `database`: SQLite persistence for resolved subtitles
 * - `language_utils`: ISO language code utilities
 * - `file_utils`: File system operations and the subtitle path scheme
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod file_utils;
pub mod job_queue;
pub mod language_utils;
pub mod pipeline;
pub mod placeholder;
pub mod providers;
pub mod source_resolver;
pub mod subtitle_codec;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{AppController, MediaTarget, SubtitleAnswer};
pub use errors::{AppError, PipelineError, ProviderError, TranslationError};
pub use language_utils::{codes_match, to_2_letter, to_3_letter};
pub use source_resolver::{ResolveRequest, SourceResolver};
pub use subtitle_codec::{parse_srt, serialize_srt, SubtitleCue};
