use std::sync::atomic::{AtomicUsize, Ordering};

use console::{Term, style};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::constants::progress::{SPINNER_FRAMES, TICK_INTERVAL};
use crate::gitlab::FetchSummary;
use crate::utils::string::pluralize;

// Progress bar style templates as constants
const PROGRESS_BAR_TEMPLATE: &str =
    "{msg} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {per_sec}";
const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";

pub struct ProgressReporter {
    term: Term,
    spinner_position: AtomicUsize,
    multi_progress: MultiProgress,
    current_bar: Option<ProgressBar>,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter {
    pub fn new() -> Self {
        let term = Term::stderr();
        Self {
            term,
            spinner_position: AtomicUsize::new(0),
            multi_progress: MultiProgress::new(),
            current_bar: None,
        }
    }

    pub fn create_progress_bar(&mut self, len: u64, message: &str) -> ProgressBar {
        let pb = self.multi_progress.add(ProgressBar::new(len));
        // The template is a constant, a parse failure would only drop styling
        if let Ok(bar_style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
            pb.set_style(bar_style.progress_chars("█▉▊▋▌▍▎▏ "));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(TICK_INTERVAL);
        pb
    }

    pub fn create_spinner(&mut self, message: &str) -> ProgressBar {
        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
            pb.set_style(spinner_style.tick_strings(SPINNER_FRAMES));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(TICK_INTERVAL);
        pb
    }

    fn next_spinner_frame(&self) -> &'static str {
        let pos = self.spinner_position.fetch_add(1, Ordering::Relaxed) % SPINNER_FRAMES.len();
        SPINNER_FRAMES[pos]
    }

    pub fn start_project_scan(&mut self) {
        let _ = self.term.clear_line();
        eprintln!("{} Listing GitLab projects...", style("🔍").cyan());
        let spinner = self.create_spinner("Fetching the first page...");
        self.current_bar = Some(spinner);
    }

    pub fn scanned_page(&self, page: usize, projects_so_far: usize) {
        if let Some(ref pb) = self.current_bar {
            pb.set_message(format!(
                "Page {page}: {projects_so_far} {} so far...",
                pluralize("project", projects_so_far)
            ));
        }
    }

    pub fn finish_project_scan(&mut self, count: usize) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
        let _ = self.term.clear_line();
        if count == 0 {
            eprintln!("\r{} No projects visible with this token", style("✗").red());
        } else {
            eprintln!(
                "\r{} Found {} {}",
                style("✓").green(),
                style(count).yellow().bold(),
                pluralize("project", count)
            );
        }
    }

    pub fn start_download(&mut self, total_projects: usize) -> ProgressBar {
        let pb = self.create_progress_bar(total_projects as u64, "Downloading go.mod files");
        self.current_bar = Some(pb.clone());
        pb
    }

    pub fn finish_download(&mut self, summary: &FetchSummary) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
        eprintln!(
            "{} Cached {} {}",
            style("✓").green(),
            style(summary.downloaded).yellow().bold(),
            pluralize("manifest", summary.downloaded)
        );
        if summary.errors > 0 {
            eprintln!(
                "{} {} {} could not be downloaded",
                style("⚠").yellow().bold(),
                style(summary.errors).red().bold(),
                pluralize("project", summary.errors)
            );
        }
    }

    pub fn start_graph_building(&mut self, total_records: usize) -> ProgressBar {
        let pb = self.create_progress_bar(total_records as u64, "Building dependency graph");
        self.current_bar = Some(pb.clone());
        pb
    }

    pub fn analyzing_module(&self, name: &str) {
        if let Some(ref pb) = self.current_bar {
            pb.set_message(format!("Connecting module: {name}"));
            pb.inc(1);
        } else {
            let _ = self.term.clear_line();
            eprint!(
                "\r{} Connecting module: {}... ",
                style(self.next_spinner_frame()).yellow(),
                style(name).green()
            );
        }
    }

    pub fn finish_graph_building(&mut self, modules: usize, dependencies: usize) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
        let _ = self.term.clear_line();
        eprintln!(
            "\r{} Graph built: {} {}, {} {}",
            style("✓").green(),
            style(modules).yellow().bold(),
            pluralize("module", modules),
            style(dependencies).yellow().bold(),
            pluralize("dependency", dependencies)
        );
    }
}
