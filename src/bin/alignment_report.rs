use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use massalign::{
    aggregate_reports, compute_pair_report, read_paragraphs, AlignerConfig, DocumentAligner,
    DocumentAlignerBuilder, DocumentAlignment, Meta, PairReport, Paragraph, Report,
};

#[path = "alignment_report/json_report_formatter.rs"]
mod json_report_formatter;
#[path = "alignment_report/text_report_formatter.rs"]
mod text_report_formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    /// Aligned paragraph and sentence groups as plain text.
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "alignment_report")]
#[command(about = "Align two comparable documents and report on the alignment")]
struct Args {
    /// Source document: one sentence per line, blank lines between paragraphs.
    #[arg(long, env = "MASSALIGN_REPORT_SOURCE")]
    source: PathBuf,
    #[arg(long, env = "MASSALIGN_REPORT_TARGET")]
    target: PathBuf,
    /// JSON aligner configuration; defaults apply to missing fields.
    #[arg(long, env = "MASSALIGN_REPORT_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "MASSALIGN_REPORT_STOP_WORDS")]
    stop_words: Option<PathBuf>,
    #[arg(long, env = "MASSALIGN_REPORT_OUT")]
    out: Option<PathBuf>,
    #[arg(
        long,
        env = "MASSALIGN_REPORT_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Json
    )]
    output_format: OutputFormat,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let source_path = args.source.clone();
    let target_path = args.target.clone();
    require_path_exists(&source_path, "Missing source document.")?;
    require_path_exists(&target_path, "Missing target document.")?;

    let aligner = build_aligner(&args, &source_path, &target_path)?;
    let source = read_paragraphs(&source_path)
        .map_err(|err| format!("Failed to read source document: {err}"))?;
    let target = read_paragraphs(&target_path)
        .map_err(|err| format!("Failed to read target document: {err}"))?;

    let started = Instant::now();
    let alignment = align_with_progress(&aligner, &source, &target);
    // stdout carries the listing in text mode.
    eprintln!(
        "{}",
        status_line(alignment.paragraph_pairs.len(), started.elapsed())
    );

    match args.output_format {
        OutputFormat::Json => {
            let paragraphs =
                compute_pair_report("paragraphs", &alignment.paragraph_path, source.len(), target.len());
            let sentences: Vec<PairReport> = alignment
                .paragraph_pairs
                .iter()
                .enumerate()
                .map(|(idx, pair)| {
                    compute_pair_report(
                        &format!("paragraph-group-{idx:04}"),
                        &pair.sentence_path,
                        pair.source_sentences.len(),
                        pair.target_sentences.len(),
                    )
                })
                .collect();
            let aggregates = aggregate_reports(&sentences);
            let sentence_params = aligner.sentence_params();

            let report = Report {
                schema_version: 1,
                meta: Meta {
                    generated_at: Utc::now().to_rfc3339(),
                    source_path: source_path.to_string_lossy().into_owned(),
                    target_path: target_path.to_string_lossy().into_owned(),
                    paragraph_acceptable_similarity: aligner.paragraph_acceptable_similarity(),
                    sentence_acceptable_similarity: sentence_params.acceptable_similarity,
                    similarity_slack: sentence_params.similarity_slack,
                    paragraph_pair_count: alignment.paragraph_pairs.len(),
                },
                paragraphs,
                sentences,
                aggregates,
            };

            let out_path = resolve_out_path(&repo_root, args.out.as_ref());
            json_report_formatter::write_report(&out_path, &report)?;
            println!("{}", out_path.display());
        }
        OutputFormat::Text => {
            let out_path = args.out.as_ref().map(|path| resolve_path(&repo_root, path));
            text_report_formatter::write_listing(out_path.as_deref(), &alignment)?;
            if let Some(path) = out_path {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

fn build_aligner(
    args: &Args,
    source_path: &Path,
    target_path: &Path,
) -> Result<DocumentAligner, String> {
    let mut config = match args.config.as_ref() {
        Some(path) => AlignerConfig::load(path)
            .map_err(|err| format!("Failed to load aligner config: {err}"))?,
        None => AlignerConfig::default(),
    };
    if let Some(stop_words) = args.stop_words.as_ref() {
        config.stop_words_path = Some(stop_words.to_string_lossy().into_owned());
    }
    if config.training_documents.is_empty() {
        config.training_documents = vec![
            source_path.to_string_lossy().into_owned(),
            target_path.to_string_lossy().into_owned(),
        ];
    }

    DocumentAlignerBuilder::new(config)
        .build()
        .map_err(|err| format!("Failed to build DocumentAligner: {err}"))
}

fn align_with_progress(
    aligner: &DocumentAligner,
    source: &[Paragraph],
    target: &[Paragraph],
) -> DocumentAlignment {
    if source.is_empty() || target.is_empty() {
        return aligner.align(source, target);
    }

    let paragraph_path = aligner.align_paragraphs(source, target);
    let progress = ProgressBar::new(paragraph_path.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message("aligning sentences...");

    let mut paragraph_pairs = Vec::with_capacity(paragraph_path.len());
    for node in &paragraph_path {
        progress.set_message(format!("{:?} <-> {:?}", node.source, node.target));
        paragraph_pairs.push(aligner.align_paragraph_pair(node, source, target));
        progress.inc(1);
    }
    progress.finish_with_message("done");

    DocumentAlignment {
        paragraph_path,
        paragraph_pairs,
    }
}

fn resolve_out_path(repo_root: &Path, out: Option<&PathBuf>) -> PathBuf {
    if let Some(path) = out {
        return resolve_path(repo_root, path);
    }

    let run_id = Utc::now().format("%Y%m%dT%H%M%SZ");
    repo_root
        .join("target")
        .join("alignment_reports")
        .join(format!("alignment-report-{run_id}.json"))
}

fn resolve_path(repo_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        repo_root.join(path)
    }
}

fn status_line(paragraph_groups: usize, elapsed: Duration) -> String {
    format!(
        "aligned {paragraph_groups} paragraph group(s) in {}",
        format_duration_hms(elapsed)
    )
}

fn format_duration_hms(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    let hours = total_ms / 3_600_000;
    let rem_after_hours = total_ms % 3_600_000;
    let minutes = rem_after_hours / 60_000;
    let rem_after_minutes = rem_after_hours % 60_000;
    let seconds = rem_after_minutes / 1_000;
    let millis = rem_after_minutes % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

fn require_path_exists(path: &Path, message: &str) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    Err(format!("{message} Missing path: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_reports_groups_and_elapsed_time() {
        assert_eq!(
            status_line(3, Duration::from_millis(3_723_045)),
            "aligned 3 paragraph group(s) in 01:02:03.045"
        );
    }

    #[test]
    fn relative_out_path_resolves_under_repo_root() {
        let root = Path::new("/repo");
        assert_eq!(
            resolve_path(root, Path::new("reports/out.json")),
            PathBuf::from("/repo/reports/out.json")
        );
        assert_eq!(
            resolve_path(root, Path::new("/tmp/out.json")),
            PathBuf::from("/tmp/out.json")
        );
    }
}
