//! Configuration check command.

use console::style;

use crate::config::{ConfigError, Settings};

/// Print the resolved configuration, or why it is unusable.
pub fn cmd_check(settings: Result<Settings, ConfigError>) -> anyhow::Result<()> {
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{} {}", style("✗").red(), e);
            return Err(e.into());
        }
    };

    println!("\n{}", style("Configuration").bold());
    println!("{}", "-".repeat(50));

    let source = settings
        .source_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults + environment".to_string());
    println!("  {:<18} {}", "Config", source);
    println!("  {:<18} {}", "LLM provider", settings.llm.provider);
    println!("  {:<18} {}", "LLM model", settings.llm.model());
    println!("  {:<18} {}", "LLM endpoint", settings.llm.endpoint());
    println!("  {:<18} {}", "Bind", settings.server.bind);
    let ttl = match settings.server.session_ttl() {
        Some(ttl) => format!("{}s", ttl.as_secs()),
        None => "never".to_string(),
    };
    println!("  {:<18} {}", "Session expiry", ttl);

    println!("\n{}", style("Capabilities").bold());
    println!("{}", "-".repeat(50));
    print_capability("OCR (Cloud Vision)", settings.capabilities.ocr, "GOOGLE_VISION_API_KEY");
    print_capability(
        "Translation",
        settings.capabilities.translation,
        "GOOGLE_TRANSLATE_API_KEY",
    );

    Ok(())
}

fn print_capability(name: &str, on: bool, key_var: &str) {
    if on {
        println!("  {:<18} {}", name, style("✓ enabled").green());
    } else {
        println!(
            "  {:<18} {} {}",
            name,
            style("○ disabled").yellow(),
            style(format!("(set GOOGLE_CLOUD_API_KEY or {})", key_var)).dim()
        );
    }
}
