use anyhow::Result;

use lingo_lib::content::VocabularyItem;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, topic: Option<&str>, format: &OutputFormat) -> Result<()> {
    let items: Vec<VocabularyItem> = match topic {
        Some(topic) => app.topic_items(topic)?,
        None => app.all_items()?.into_iter().map(|r| r.item).collect(),
    };
    let stats = app.session.stats(&items);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            let scope = topic.unwrap_or("all topics");
            println!("{} ({})", scope, app.config.content.language);
            println!("  Total:    {}", stats.total_items);
            println!("  New:      {}", stats.new_items);
            println!("  Lapsed:   {}", stats.lapsed_items);
            println!("  Learning: {}", stats.learning_items);
            println!("  Mature:   {}", stats.mature_items);
            println!("  Due now:  {}", stats.due_items);
        }
    }

    Ok(())
}

pub fn run_topics(app: &App, format: &OutputFormat) -> Result<()> {
    let topics: Vec<(String, usize)> = app
        .provider
        .all_topic_items()?
        .into_iter()
        .map(|(topic, items)| (topic, items.len()))
        .collect();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = topics
                .iter()
                .map(|(topic, count)| {
                    serde_json::json!({
                        "topic": topic,
                        "count": count,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if topics.is_empty() {
                println!("No topics cached. Use `lingo-cli import <topic> <file>`.");
                return Ok(());
            }

            let max_len = topics.iter().map(|(t, _)| t.len()).max().unwrap_or(5).max(5);
            println!("{:<width$} Items", "Topic", width = max_len + 1);
            for (topic, count) in &topics {
                println!("{:<width$} {}", topic, count, width = max_len + 1);
            }
        }
    }

    Ok(())
}
