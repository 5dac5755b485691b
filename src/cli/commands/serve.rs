//! Web server command.

use console::style;

use crate::config::Settings;

const DEFAULT_PORT: u16 = 8501;

/// Start the HTTP API.
pub async fn cmd_serve(settings: &Settings, bind: Option<&str>) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind.unwrap_or(settings.server.bind.as_str()));

    let caps = settings.capabilities;
    println!(
        "{} LLM: {} ({})",
        style("→").cyan(),
        settings.llm.provider,
        settings.llm.model()
    );
    println!(
        "{} OCR: {}  Translation service: {}",
        style("→").cyan(),
        enabled(caps.ocr),
        enabled(caps.translation)
    );
    println!(
        "{} Starting demystify API at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, &host, port).await
}

fn enabled(on: bool) -> console::StyledObject<&'static str> {
    if on {
        style("enabled").green()
    } else {
        style("disabled").dim()
    }
}

/// Parse a bind address that can be:
/// - Just a port: "8501" -> 127.0.0.1:8501
/// - Just a host: "0.0.0.0" -> 0.0.0.0:8501
/// - Host and port: "0.0.0.0:9000" -> 0.0.0.0:9000
fn parse_bind_address(bind: &str) -> (String, u16) {
    if let Ok(port) = bind.parse::<u16>() {
        return ("127.0.0.1".to_string(), port);
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return (host.to_string(), port);
        }
    }

    (bind.to_string(), DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_address() {
        assert_eq!(parse_bind_address("9000"), ("127.0.0.1".to_string(), 9000));
        assert_eq!(parse_bind_address("0.0.0.0"), ("0.0.0.0".to_string(), 8501));
        assert_eq!(
            parse_bind_address("localhost:8080"),
            ("localhost".to_string(), 8080)
        );
    }
}
