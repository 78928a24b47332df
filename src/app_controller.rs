use anyhow::{anyhow, Result};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::acquisition::SubtitleAcquirer;
use crate::fetch::Fetcher;
use crate::fetch::http::HttpFetcher;
use crate::file_utils::FileManager;
use crate::request::AcquisitionRequest;
use crate::retry::RetryPolicy;
use crate::srt_codec::{self, CaptionTrack};
use crate::subtitle_cache::SubtitleCache;
use crate::errors::AcquireError;

// @module: Application controller for subtitle acquisition

/// Main application controller: wires config, fetcher, and acquirer
/// together and runs the CLI-facing workflows
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Acquirer the fetch workflows run through
    acquirer: SubtitleAcquirer,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let retry = RetryPolicy::new(
            config.acquisition.retry_count,
            Duration::from_millis(config.acquisition.retry_backoff_ms),
        );
        let fetcher: Arc<dyn Fetcher> =
            Arc::new(HttpFetcher::with_retry(config.acquisition.timeout_secs, retry));

        Ok(Self::assemble(config, fetcher))
    }

    /// Create a controller over an injected fetcher; tests script the
    /// transport this way
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::assemble(config, fetcher)
    }

    fn assemble(config: Config, fetcher: Arc<dyn Fetcher>) -> Self {
        let mut acquirer = SubtitleAcquirer::new(fetcher, config.acquisition.relays.clone());
        if config.acquisition.cache_enabled {
            acquirer = acquirer.with_cache(SubtitleCache::new(true));
        }

        Self { config, acquirer }
    }

    /// Acquire subtitles for a title, one track per configured language.
    /// Existing output files are skipped unless force_overwrite is set.
    pub async fn run_fetch(
        &self,
        title: &str,
        year: Option<u16>,
        imdb_id: Option<&str>,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        FileManager::ensure_dir(&output_dir)?;

        let languages = self.config.normalized_languages()?;
        let multi_progress = MultiProgress::new();

        let mut success_count = 0;
        let mut skip_count = 0;
        let mut error_count = 0;

        for language in &languages {
            let mut request =
                AcquisitionRequest::new(title, year, language, self.config.source)?;
            if let Some(id) = imdb_id {
                request = request.with_imdb_id(id);
            }

            let output_path = FileManager::generate_output_path(
                &request.dash_slug(),
                &output_dir,
                language,
                "srt",
            );

            if output_path.exists() && !force_overwrite {
                warn!(
                    "Skipping {}, subtitle already exists (use -f to force overwrite)",
                    output_path.display()
                );
                skip_count += 1;
                continue;
            }

            let spinner = Self::add_spinner(
                &multi_progress,
                format!("Looking up '{}' ({})", title, request.label_language()),
            );

            let outcome = self.acquirer.acquire(&request).await;
            spinner.finish_and_clear();

            match outcome {
                Ok(track) => {
                    self.save_track(&track, &output_path)?;
                    success_count += 1;
                }
                Err(e) => {
                    Self::report_failure(title, language, &e);
                    error_count += 1;
                }
            }
        }

        info!(
            "Acquisition completed in {}: {} written, {} skipped, {} failed",
            Self::format_duration(start_time.elapsed()),
            success_count,
            skip_count,
            error_count
        );

        if error_count > 0 && success_count == 0 {
            return Err(anyhow!("No subtitles could be acquired for '{}'", title));
        }

        Ok(())
    }

    /// Acquire subtitles from one user-supplied URL, bypassing the source
    /// catalogue. The relay fallback still applies.
    pub async fn run_fetch_url(
        &self,
        url: &str,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<()> {
        FileManager::ensure_dir(&output_dir)?;

        let language = self.config.normalized_languages()?.into_iter().next();
        let stem = Self::stem_from_url(url);
        let output_path = FileManager::generate_output_path(
            &stem,
            &output_dir,
            language.as_deref().unwrap_or("und"),
            "srt",
        );

        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {}, subtitle already exists (use -f to force overwrite)",
                output_path.display()
            );
            return Ok(());
        }

        let multi_progress = MultiProgress::new();
        let spinner = Self::add_spinner(&multi_progress, format!("Fetching {}", url));

        let outcome = self
            .acquirer
            .acquire_from_url(url, language.as_deref())
            .await;
        spinner.finish_and_clear();

        match outcome {
            Ok(track) => self.save_track(&track, &output_path),
            Err(e) => {
                Self::report_failure(url, language.as_deref().unwrap_or("?"), &e);
                Err(anyhow!("No subtitles could be acquired from {}", url))
            }
        }
    }

    /// Parse local .srt files (a single file or every .srt under a
    /// directory), logging a per-file summary. With normalize set, each
    /// file is re-emitted in canonical form as {stem}.normalized.srt.
    pub async fn run_parse(
        &self,
        input_path: PathBuf,
        normalize: bool,
        force_overwrite: bool,
    ) -> Result<()> {
        let files = if input_path.is_file() {
            vec![input_path]
        } else if input_path.is_dir() {
            let mut files = FileManager::find_files(&input_path, "srt")?;
            files.sort();
            files
        } else {
            return Err(anyhow!("Input path does not exist: {:?}", input_path));
        };

        if files.is_empty() {
            return Err(anyhow!("No .srt files found"));
        }

        let mut parsed_count = 0;
        for file in &files {
            match self.parse_one(file, normalize, force_overwrite) {
                Ok(()) => parsed_count += 1,
                Err(e) => error!("Error parsing {}: {}", file.display(), e),
            }
        }

        info!("Parsed {} of {} file(s)", parsed_count, files.len());

        if parsed_count == 0 {
            return Err(anyhow!("No file could be parsed"));
        }

        Ok(())
    }

    fn parse_one(&self, file: &Path, normalize: bool, force_overwrite: bool) -> Result<()> {
        let content = FileManager::read_to_string(file)?;
        let records = srt_codec::parse(&content);

        if records.is_empty() {
            return Err(anyhow!("no caption records found"));
        }

        info!(
            "{}: {} records spanning {}",
            file.display(),
            records.len(),
            srt_codec::format_timecode(records.last().map(|r| r.end_secs).unwrap_or(0.0))
        );

        if !normalize {
            return Ok(());
        }

        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        let output_path = file
            .parent()
            .unwrap_or(Path::new("."))
            .join(format!("{}.normalized.srt", stem));

        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {}, file already exists (use -f to force overwrite)",
                output_path.display()
            );
            return Ok(());
        }

        let track = CaptionTrack::new(stem, records)?;
        FileManager::write_to_file(&output_path, &track.to_srt_string())?;
        info!("Success: {}", output_path.display());

        Ok(())
    }

    /// Write an acquired track to disk
    fn save_track(&self, track: &CaptionTrack, output_path: &Path) -> Result<()> {
        track.write_to_srt(output_path)?;

        info!(
            "Success: {} ({}, {} records)",
            output_path.display(),
            track.label,
            track.record_count()
        );

        Ok(())
    }

    /// Log an acquisition failure with its full attempt trail
    fn report_failure(subject: &str, language: &str, error: &AcquireError) {
        error!("Could not acquire subtitles for '{}' ({}): {}", subject, language, error);

        for attempt in error.attempts() {
            warn!("  tried {}", attempt);
        }
    }

    fn add_spinner(multi_progress: &MultiProgress, message: String) -> ProgressBar {
        let spinner = multi_progress.add(ProgressBar::new_spinner());
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }

    /// Derive an output file stem from a manual URL, falling back to
    /// "subtitle" when the path carries no usable name
    fn stem_from_url(url: &str) -> String {
        let stem = url
            .rsplit('/')
            .next()
            .unwrap_or("")
            .split(['?', '#'])
            .next()
            .unwrap_or("")
            .trim_end_matches(".srt");

        if stem.is_empty() {
            debug!("URL {} has no usable file name, using 'subtitle'", url);
            "subtitle".to_string()
        } else {
            stem.to_string()
        }
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
