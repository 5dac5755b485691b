//! Shared helper functions for CLI commands.

use std::path::PathBuf;

use console::style;

use crate::ocr::UploadedDocument;
use crate::session::AnalysisResult;

/// Read files from disk in the order given.
pub async fn read_documents(paths: &[PathBuf]) -> anyhow::Result<Vec<UploadedDocument>> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        documents.push(UploadedDocument::new(name, content));
    }
    Ok(documents)
}

/// Print a result; failed results become the command's error.
pub fn print_result(result: &AnalysisResult) -> anyhow::Result<()> {
    if result.failed {
        eprintln!("{} {}", style("✗").red(), style(&result.label).bold());
        anyhow::bail!("{}", result.text);
    }

    println!("\n{}", style(&result.label).bold());
    println!("{}", "-".repeat(50));
    println!("{}", result.text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_read_documents_keeps_order_and_names() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("b.pdf");
        let second = dir.path().join("a.pdf");
        std::fs::File::create(&first)
            .unwrap()
            .write_all(b"one")
            .unwrap();
        std::fs::File::create(&second)
            .unwrap()
            .write_all(b"two")
            .unwrap();

        let docs = read_documents(&[first, second]).await.unwrap();
        assert_eq!(docs[0].name, "b.pdf");
        assert_eq!(docs[1].content, b"two");
    }

    #[tokio::test]
    async fn test_missing_file_errors() {
        let err = read_documents(&[PathBuf::from("/nonexistent/x.pdf")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/x.pdf"));
    }
}
