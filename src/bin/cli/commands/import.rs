use std::path::Path;

use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, topic: &str, file: &Path, format: &OutputFormat) -> Result<()> {
    let raw = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?
    };

    let items = app
        .provider
        .import(topic, &raw)
        .with_context(|| format!("Failed to import topic '{}'", topic))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "topic": topic.trim().to_lowercase(),
                "language": app.provider.config().language,
                "count": items.len(),
                "items": items,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Imported {} items into '{}'", items.len(), topic.trim().to_lowercase());
        }
    }

    Ok(())
}
