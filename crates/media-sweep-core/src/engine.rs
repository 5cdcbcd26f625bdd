use crate::collectors::{CollectOptions, FeatureFlags, ReferenceCollector, StaticFeatures};
use crate::config::AppConfig;
use crate::deletion::{delete_candidates, DeletionReport, FileRemover, LocalFs};
use crate::error::Error;
use crate::extract::Pipeline;
use crate::media_root::MediaRoot;
use crate::progress::ProgressReporter;
use crate::reference::{ReferenceSet, ReferenceSetBuilder};
use crate::scanner::{self, ExclusionSet, FileEntry, ScanResult};
use crate::storage::{SqliteStore, TextSource};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct SweepEngine {
    config: AppConfig,
    media_root: MediaRoot,
    exclusions: ExclusionSet,
}

#[derive(Debug)]
pub struct SweepReport {
    pub referenced_paths: usize,
    pub scan: ScanResult,
    pub collect_duration: Duration,
    pub scan_duration: Duration,
}

impl SweepReport {
    pub fn total_files(&self) -> usize {
        self.scan.all_files.len()
    }

    pub fn candidates(&self) -> &[FileEntry] {
        &self.scan.candidates
    }
}

impl SweepEngine {
    pub fn new(config: AppConfig) -> Self {
        let media_root = MediaRoot::new(&config.media_root);
        let exclusions = ExclusionSet::new(&config.exclude);
        Self {
            config,
            media_root,
            exclusions,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    /// Run the collection and scan phases against the configured SQLite snapshot.
    pub fn scan(&self, reporter: &dyn ProgressReporter) -> Result<SweepReport, Error> {
        let store = SqliteStore::open(Path::new(&self.config.database_path))?;
        let features = StaticFeatures::new(&self.config.integrations);
        self.scan_with_source(&store, &features, reporter)
    }

    /// Run the sweep up to the candidate list:
    /// 1. Check the media root is a readable directory
    /// 2. Collect references from every source into a frozen set
    /// 3. Walk the media root and diff it against the set
    pub fn scan_with_source(
        &self,
        source: &dyn TextSource,
        features: &dyn FeatureFlags,
        reporter: &dyn ProgressReporter,
    ) -> Result<SweepReport, Error> {
        let root = self.media_root.for_listing()?;
        info!("Media root: {}", root.display());
        debug!("Exclusions: {:?}", self.exclusions.prefixes());

        // Phase 1: Collect
        info!("Collecting references...");
        let collect_start = Instant::now();
        let references = self.collect_references(source, features, reporter);
        let collect_duration = collect_start.elapsed();
        info!(
            "Collected {} referenced paths in {:.2}s",
            references.len(),
            collect_duration.as_secs_f64()
        );

        // Phase 2: Scan
        info!("Scanning media files...");
        reporter.on_scan_start();
        let scan_start = Instant::now();
        let scan = scanner::scan_media_tree(&root, &references, &self.exclusions, reporter)?;
        let scan_duration = scan_start.elapsed();
        info!(
            "Scan completed in {:.2}s: {} files, {} unreferenced",
            scan_duration.as_secs_f64(),
            scan.all_files.len(),
            scan.candidates.len()
        );
        reporter.on_scan_complete(
            scan.all_files.len(),
            scan.candidates.len(),
            scan_duration.as_secs_f64(),
        );

        Ok(SweepReport {
            referenced_paths: references.len(),
            scan,
            collect_duration,
            scan_duration,
        })
    }

    pub fn collect_references(
        &self,
        source: &dyn TextSource,
        features: &dyn FeatureFlags,
        reporter: &dyn ProgressReporter,
    ) -> ReferenceSet {
        reporter.on_collect_start();
        let start = Instant::now();
        let options = CollectOptions {
            scan_whole_store: self.config.scan_whole_store,
        };
        let collector = ReferenceCollector::new(options, features);
        let mut builder = ReferenceSetBuilder::new(Pipeline::new(self.config.extraction_mode()));
        collector.collect_all(source, &mut builder, reporter);
        let references = builder.build();
        reporter.on_collect_complete(references.len(), start.elapsed().as_secs_f64());
        references
    }

    /// Delete the report's candidates from the media root.
    pub fn delete(
        &self,
        report: &SweepReport,
        reporter: &dyn ProgressReporter,
    ) -> Result<DeletionReport, Error> {
        self.delete_with(report.candidates(), &LocalFs, reporter)
    }

    pub fn delete_with(
        &self,
        candidates: &[FileEntry],
        remover: &dyn FileRemover,
        reporter: &dyn ProgressReporter,
    ) -> Result<DeletionReport, Error> {
        let root = self.media_root.for_deletion()?;
        info!("Deleting {} files under {}", candidates.len(), root.display());
        Ok(delete_candidates(
            &root,
            candidates,
            &self.exclusions,
            remover,
            reporter,
        ))
    }
}
