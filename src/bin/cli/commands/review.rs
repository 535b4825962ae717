use anyhow::Result;

use lingo_lib::srs::{format_interval, Clock, Difficulty, SchedulingRecord};

use super::{due_label, next_review_time};
use crate::app::App;
use crate::OutputFormat;

fn record_json(item_id: &str, word: Option<&str>, record: &SchedulingRecord) -> serde_json::Value {
    serde_json::json!({
        "id": item_id,
        "word": word,
        "record": record,
        "status": record.status(),
        "nextReview": next_review_time(record),
    })
}

fn print_record(app: &App, record: &SchedulingRecord) {
    let now = app.session.clock().now_millis();
    println!("  Status:      {:?} ({})", record.status(), due_label(record, now));
    println!("  Interval:    {}", format_interval(record.interval));
    println!("  Ease:        {:.2}", record.ease_factor);
    println!("  Repetitions: {}", record.repetition_count);
    if let Some(next) = next_review_time(record) {
        println!("  Next review: {}", next);
    }
}

pub fn run_grade(app: &App, query: &str, difficulty: &str, format: &OutputFormat) -> Result<()> {
    let (item_id, resolved) = app.resolve_id(query)?;
    if Difficulty::from_label(difficulty).is_none() {
        log::warn!("Unknown difficulty '{}', grading as medium", difficulty);
    }

    let record = match app.session.grade_item(&item_id, difficulty) {
        Ok(record) => record,
        Err(e) if e.is_storage_full() => {
            return Err(anyhow::Error::new(e).context(
                "Grade was not saved: the store is full (raise storage.quota_bytes or free disk space)",
            ));
        }
        Err(e) => return Err(anyhow::Error::new(e).context("Grade was not saved")),
    };
    let word = resolved.as_ref().map(|r| r.item.word.as_str());

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record_json(&item_id, word, &record))?);
        }
        OutputFormat::Plain => {
            println!("Graded {} as {}", word.unwrap_or(&item_id), difficulty);
            print_record(app, &record);
        }
    }

    Ok(())
}

pub fn run_show(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let (item_id, resolved) = app.resolve_id(query)?;
    let record = app.session.get_due_record(&item_id);

    match format {
        OutputFormat::Json => {
            let word = resolved.as_ref().map(|r| r.item.word.as_str());
            println!("{}", serde_json::to_string_pretty(&record_json(&item_id, word, &record))?);
        }
        OutputFormat::Plain => {
            match &resolved {
                Some(r) => {
                    println!("{} - {} [{}]", r.item.word, r.item.translation, r.topic);
                    if let Some(example) = &r.item.example {
                        println!("  \"{}\"", example);
                    }
                }
                None => println!("{}", item_id),
            }
            println!("  ID:          {}", item_id);
            print_record(app, &record);
        }
    }

    Ok(())
}

pub fn run_preview(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let (item_id, _) = app.resolve_id(query)?;
    let preview = app.session.preview(&item_id);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
        OutputFormat::Plain => {
            for (difficulty, days) in Difficulty::ALL
                .iter()
                .zip([preview.hard, preview.medium, preview.easy])
            {
                println!("{:<7} {}", difficulty.label(), format_interval(days));
            }
        }
    }

    Ok(())
}
