use anyhow::Result;

use lingo_lib::srs::Clock;

use super::{due_label, paint, GRAY, GREEN, YELLOW};
use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    topic: &str,
    due_only: bool,
    limit: Option<usize>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let items = app.topic_items(topic)?;
    let mut queue = if due_only {
        app.session.due_items(&items)
    } else {
        app.session.order_items(&items)
    };
    if let Some(limit) = limit {
        queue.truncate(limit);
    }

    let records = app.session.repository().load_records();
    let now = app.session.clock().now_millis();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = queue
                .iter()
                .map(|item| {
                    let record = records.get(&item.id).copied().unwrap_or_default();
                    serde_json::json!({
                        "item": item,
                        "record": record,
                        "due": record.is_due(now),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if queue.is_empty() {
                println!("Nothing to review.");
                return Ok(());
            }

            let max_word_len = queue.iter().map(|i| i.word.chars().count()).max().unwrap_or(4).max(4);

            println!("{:<width$}  {:<10} Translation", "Word", "Due", width = max_word_len);
            for item in &queue {
                let record = records.get(&item.id).copied().unwrap_or_default();
                let label = due_label(&record, now);
                let color = match label.as_str() {
                    "new" => GREEN,
                    "due" => YELLOW,
                    _ => GRAY,
                };
                println!(
                    "{:<width$}  {} {}",
                    item.word,
                    paint(&format!("{:<10}", label), color, use_color),
                    item.translation,
                    width = max_word_len
                );
            }

            println!("\n{} items", queue.len());
        }
    }

    Ok(())
}
