//! Document commands: classify, analyze, translate and ask.

use std::path::PathBuf;

use console::style;

use crate::analysis::{Language, Operation};
use crate::config::Settings;
use crate::pipeline::{has_content, DocumentPipeline, IngestedBatch};

use super::super::helpers::{print_result, read_documents};

/// Build the pipeline, then extract and classify the given files.
async fn load(
    settings: &Settings,
    files: &[PathBuf],
) -> anyhow::Result<(DocumentPipeline, IngestedBatch)> {
    let pipeline = DocumentPipeline::from_settings(settings)?;
    let documents = read_documents(files).await?;

    eprintln!(
        "{} Extracting text from {} document(s)...",
        style("→").cyan(),
        documents.len()
    );
    let batch = pipeline.ingest(&documents).await;

    if !has_content(&batch.text) {
        anyhow::bail!("No text could be extracted. Upload a document first.");
    }

    eprintln!(
        "  {} {} characters, type: {}",
        style("✓").green(),
        batch.text.chars().count(),
        style(&batch.doc_type.label).bold()
    );
    Ok((pipeline, batch))
}

pub async fn cmd_classify(settings: &Settings, files: &[PathBuf]) -> anyhow::Result<()> {
    let (_, batch) = load(settings, files).await?;
    println!("{}", batch.doc_type.label);
    println!("{} {}", style("Category:").dim(), batch.doc_type.category);
    Ok(())
}

pub async fn cmd_analyze(
    settings: &Settings,
    files: &[PathBuf],
    operation: Operation,
    language: Language,
) -> anyhow::Result<()> {
    let (pipeline, batch) = load(settings, files).await?;
    let result = pipeline
        .analyze(operation, &batch.text, &batch.doc_type, language)
        .await;
    print_result(&result)
}

pub async fn cmd_translate(
    settings: &Settings,
    files: &[PathBuf],
    language: Language,
) -> anyhow::Result<()> {
    let (pipeline, batch) = load(settings, files).await?;
    let result = pipeline.translate_excerpt(&batch.text, language).await;
    print_result(&result)
}

pub async fn cmd_ask(
    settings: &Settings,
    files: &[PathBuf],
    question: &str,
    language: Language,
) -> anyhow::Result<()> {
    let (pipeline, batch) = load(settings, files).await?;
    let result = pipeline
        .ask(question, &batch.text, &batch.doc_type, language)
        .await;
    print_result(&result)
}
