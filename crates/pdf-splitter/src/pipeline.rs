//! End-to-end split job

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::SplitterConfig;
use crate::error::Result;
use crate::ingestion::PdfSource;
use crate::output::{create_zip, sanitize_file_stem, write_manifest, FileNamer, GroupWriter};
use crate::progress::ProgressReporter;
use crate::splitting::BoundarySplitter;
use crate::types::{DocumentGroup, ManifestRow, OutputMode, Page, RowStatus};
use crate::upload::{RcloneUploader, Uploader};

/// Summary of a completed job
#[derive(Debug, Clone)]
pub struct JobReport {
    /// Pages in the source document
    pub page_count: usize,
    /// Groups in document order
    pub groups: Vec<DocumentGroup>,
    /// One manifest row per group
    pub rows: Vec<ManifestRow>,
    /// Output files, same order as `groups`
    pub files: Vec<PathBuf>,
    pub manifest_path: PathBuf,
    /// Zip bundle, in zip mode
    pub bundle_path: Option<PathBuf>,
    /// Link to the uploaded manifest or bundle
    pub artifact_link: Option<String>,
}

impl JobReport {
    /// Groups whose upload failed
    pub fn upload_failures(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.status, RowStatus::UploadFailed(_)))
            .count()
    }
}

/// Splits a PDF, writes its groups, uploads them and records the manifest
pub struct Splitter {
    config: SplitterConfig,
    boundary: BoundarySplitter,
    uploader: Option<Box<dyn Uploader>>,
    progress: ProgressReporter,
}

impl Splitter {
    /// Create a splitter, with rclone uploads when a remote is configured
    pub fn new(config: SplitterConfig) -> Result<Self> {
        config.validate()?;
        let boundary = BoundarySplitter::new(&config.markers)?;
        let uploader = RcloneUploader::from_config(&config.upload)
            .map(|u| Box::new(u) as Box<dyn Uploader>);

        Ok(Self {
            config,
            boundary,
            uploader,
            progress: ProgressReporter::stdout(),
        })
    }

    /// Replace the uploader
    pub fn with_uploader(mut self, uploader: Box<dyn Uploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Replace the progress sink
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Run a job on the PDF at `input`
    pub fn run(&mut self, input: &Path) -> Result<JobReport> {
        self.progress.send("Starting job...");

        let source = PdfSource::open(input)?;
        self.progress.send(format!("{} Pages found", source.page_count()));

        let pages = source.pages(Duration::from_secs(self.config.extraction.timeout_secs));
        self.process(&source, &pages)
    }

    /// Group, write, upload and record already-extracted pages of `source`
    pub fn process(&mut self, source: &PdfSource, pages: &[Page]) -> Result<JobReport> {
        let total = pages.len();
        let progress = &mut self.progress;
        let groups = self.boundary.split_observed(pages, |page, marker| {
            progress.send(format!("Scanning page {} of {}", page.index + 1, total));
            if let Some(m) = marker {
                match &m.name {
                    Some(name) => progress.send(format!("Match found: {} - {}", m.identifier, name)),
                    None => progress.send(format!("Match found: {}", m.identifier)),
                }
            }
        })?;

        if groups.len() == 1 && !groups[0].has_marker {
            self.progress.send(format!(
                "No matches found; writing entire document as '{}'",
                groups[0].identifier
            ));
        }
        tracing::info!(
            "{} group(s) from {} page(s) (preamble: {})",
            groups.len(),
            total,
            self.boundary.preamble()
        );

        let files = self.write_groups(source, &groups)?;
        let (rows, uploaded) = self.upload_groups(&groups, &files)?;

        let manifest_path = self.config.manifest_path();
        write_manifest(&manifest_path, &rows, self.config.output.mode.delimiter())?;
        self.progress
            .send(format!("Manifest written to: {}", manifest_path.display()));

        let bundle_path = match self.config.output.mode {
            OutputMode::Zip => {
                self.progress.send("Preparing Zip File");
                let mut entries = files.clone();
                entries.push(manifest_path.clone());
                let dest = self.config.output.dir.join(format!("{}.zip", source.stem()));
                let bundle = create_zip(&entries, &dest)?;
                self.progress
                    .send(format!("Zip available at: {}", bundle.display()));
                Some(bundle)
            }
            OutputMode::Csv | OutputMode::Tsv => None,
        };

        let artifact = bundle_path.as_deref().unwrap_or(&manifest_path);
        let artifact_link = self.upload_artifact(artifact);

        if self.config.upload.delete_after_upload {
            for path in &uploaded {
                if let Err(e) = std::fs::remove_file(path) {
                    tracing::warn!("Could not remove {}: {}", path.display(), e);
                }
            }
        }

        let report = JobReport {
            page_count: total,
            groups,
            rows,
            files,
            manifest_path,
            bundle_path,
            artifact_link,
        };
        self.progress.send(format!(
            "Done: {} document(s), {} upload failure(s)",
            report.groups.len(),
            report.upload_failures()
        ));
        Ok(report)
    }

    /// Write every group; the first failure aborts the rest
    fn write_groups(&mut self, source: &PdfSource, groups: &[DocumentGroup]) -> Result<Vec<PathBuf>> {
        let writer = GroupWriter::new(source.document(), &self.config.output.dir)?;
        let mut namer = FileNamer::new("pdf");
        let fallback = &self.config.markers.fallback_identifier;

        let mut files = Vec::with_capacity(groups.len());
        for group in groups {
            let file_name = namer.next(&sanitize_file_stem(&group.identifier, fallback));
            self.progress
                .send(format!("Creating separate PDF for: {}", group.identifier));
            let path = writer.write(group, &file_name)?;
            self.progress.send(format!("Written: {}", file_name));
            files.push(path);
        }
        Ok(files)
    }

    /// Upload written groups; recoverable failures become manifest rows
    fn upload_groups(
        &mut self,
        groups: &[DocumentGroup],
        files: &[PathBuf],
    ) -> Result<(Vec<ManifestRow>, Vec<PathBuf>)> {
        let mut rows = Vec::with_capacity(groups.len());
        let mut uploaded = Vec::new();

        if self.uploader.is_some() {
            self.progress.send("Uploading output files");
        }

        for (group, path) in groups.iter().zip(files) {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            let Some(uploader) = &self.uploader else {
                rows.push(ManifestRow::new(group, file_name, None, RowStatus::Written));
                continue;
            };

            self.progress.send(format!("Uploading: {}", file_name));
            match uploader.upload(path) {
                Ok(link) => {
                    rows.push(ManifestRow::new(group, file_name, Some(link), RowStatus::Uploaded));
                    uploaded.push(path.clone());
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("Upload of {} failed: {}", file_name, e);
                    self.progress.send(format!("Upload failed: {}", file_name));
                    rows.push(ManifestRow::new(
                        group,
                        file_name,
                        None,
                        RowStatus::UploadFailed(e.to_string()),
                    ));
                }
                Err(e) => return Err(e),
            }
        }

        Ok((rows, uploaded))
    }

    /// Upload the manifest or bundle and report its link
    fn upload_artifact(&mut self, artifact: &Path) -> Option<String> {
        let uploader = self.uploader.as_ref()?;
        match uploader.upload(artifact) {
            Ok(link) => {
                self.progress
                    .send(format!("Success! You can download your file here: {}", link));
                Some(link)
            }
            Err(e) => {
                tracing::warn!("Upload of {} failed: {}", artifact.display(), e);
                self.progress
                    .send(format!("Upload failed: {}", artifact.display()));
                None
            }
        }
    }
}
