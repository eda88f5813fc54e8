use anyhow::{Context, Result};
use star_core::{
    suggested_file_name, FollowupGenerator, JsonExporter, QuestionBank, QuestionKind,
    QuestionSource, RewriteOutcome, Rewriter, Rubric, SessionExporter, SessionRecord,
    TextReportExporter,
};
use star_runtime::{EnhancedRewriter, RuntimeConfig};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::args::{AnswerInput, Cli, Command, EnhanceArgs, ExportFormat, Format};
use crate::output;

pub fn run(cli: Cli) -> Result<()> {
    let rubric = load_rubric(cli.rubric.as_deref())?;

    match cli.command {
        Command::Evaluate { input, format } => {
            let answer = read_answer(&input)?;
            let evaluation = star_core::evaluate_with_rubric(&answer, &rubric);
            match output::structured(&evaluation, format)? {
                Some(doc) => print!("{}", ensure_newline(doc)),
                None => print!("{}", output::evaluation(&evaluation)),
            }
        }

        Command::Rewrite {
            question,
            input,
            notes,
            enhance,
            format,
        } => {
            let answer = read_answer(&input)?;
            let mut outcome = Rewriter::new(&rubric).rewrite_with_notes(&question, &answer);
            if let Some(enhancer) = enhanced_rewriter(&enhance, &rubric)? {
                let report = block_on(enhancer.rewrite(&question, &answer))?;
                outcome.rewritten_answer = report.output;
            }
            print_rewrite(&outcome, notes, format)?;
        }

        Command::Followups {
            question,
            input,
            enhance,
            format,
        } => {
            let answer = read_answer(&input)?;
            let questions = match enhanced_rewriter(&enhance, &rubric)? {
                Some(enhancer) => block_on(enhancer.followups(&question, &answer))?.output,
                None => FollowupGenerator::new(&rubric).generate(&question, &answer),
            };
            match output::structured(&questions, format)? {
                Some(doc) => print!("{}", ensure_newline(doc)),
                None => print!("{}", output::followups(&questions)),
            }
        }

        Command::Session {
            question,
            input,
            no_rewrite,
            export,
            out,
        } => {
            let answer = read_answer(&input)?;
            let record = SessionRecord::build(
                &question,
                question_kind(&question),
                &answer,
                &rubric,
                !no_rewrite,
            );

            let exporter: Box<dyn SessionExporter> = match export {
                ExportFormat::Text => Box::new(TextReportExporter),
                ExportFormat::Json => Box::new(JsonExporter),
            };
            let document = exporter.export(&record).context("Failed to export session")?;

            match out {
                Some(path) => {
                    let path = export_path(path, &question, exporter.file_extension());
                    fs::write(&path, ensure_newline(document))
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Saved session to {}", path.display());
                }
                None => print!("{}", ensure_newline(document)),
            }
        }

        Command::Questions { search } => {
            let bank = QuestionBank::with_samples();
            let listing = match search.as_deref() {
                Some(term) => output::questions(bank.search(term)),
                None => output::questions(bank.questions()),
            };
            print!("{}", listing);
        }

        Command::Rubric { check } => match check {
            Some(path) => {
                let checked = Rubric::from_yaml_file(&path)
                    .with_context(|| format!("Invalid rubric {}", path.display()))?;
                println!("{}: valid rubric '{}'", path.display(), checked.name);
            }
            None => print!("{}", rubric.to_yaml().context("Failed to serialize rubric")?),
        },
    }

    Ok(())
}

fn load_rubric(path: Option<&Path>) -> Result<Rubric> {
    match path {
        Some(path) => Rubric::from_yaml_file(path)
            .with_context(|| format!("Failed to load rubric from {}", path.display())),
        None => Ok(Rubric::default()),
    }
}

/// The answer from `--answer`, `--file`, or standard input.
fn read_answer(input: &AnswerInput) -> Result<String> {
    if let Some(answer) = &input.answer {
        return Ok(answer.clone());
    }

    let bytes = match &input.file {
        Some(path) => {
            fs::read(path).with_context(|| format!("Failed to read answer from {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read answer from stdin")?;
            buf
        }
    };
    Ok(star_core::text::normalize_bytes(&bytes))
}

fn question_kind(question: &str) -> QuestionKind {
    let bank = QuestionBank::with_samples();
    let is_sample = bank
        .questions()
        .iter()
        .any(|q| q.text.eq_ignore_ascii_case(question.trim()));
    if is_sample {
        QuestionKind::Sample
    } else {
        QuestionKind::Custom
    }
}

fn export_path(out: PathBuf, question: &str, extension: &str) -> PathBuf {
    if out.is_dir() {
        out.join(suggested_file_name(question, extension))
    } else {
        out
    }
}

fn enhanced_rewriter(args: &EnhanceArgs, rubric: &Rubric) -> Result<Option<EnhancedRewriter>> {
    let Some(path) = &args.runtime_config else {
        return Ok(None);
    };

    let yaml = fs::read_to_string(path)
        .with_context(|| format!("Failed to read runtime config {}", path.display()))?;
    let config = RuntimeConfig::from_yaml(&yaml)
        .with_context(|| format!("Invalid runtime config {}", path.display()))?;

    let rewriter = EnhancedRewriter::builder()
        .rubric(rubric.clone())
        .config(config)
        .build()
        .context("Failed to set up model enhancement")?;
    Ok(Some(rewriter))
}

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

fn print_rewrite(outcome: &RewriteOutcome, notes: bool, format: Format) -> Result<()> {
    if let Some(doc) = output::structured(outcome, format)? {
        print!("{}", ensure_newline(doc));
        return Ok(());
    }

    println!("{}", outcome.rewritten_answer);
    if notes {
        println!();
        println!("Improvement notes:");
        println!("{}", outcome.improvement_notes);
        println!();
        println!("Follow-up questions:");
        print!("{}", output::followups(&outcome.followups));
    }
    Ok(())
}

fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
