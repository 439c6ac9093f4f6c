//! Glucolog CLI
//!
//! Command-line interface for Glucolog operations:
//! - Log readings
//! - List and delete readings
//! - Show trend reports
//! - Recognise a meal photo
//! - Check status

use anyhow::{bail, Context};
use chrono::{Duration, Local, Utc};
use clap::{Parser, Subcommand};
use glucolog::api::dto::{
    DeleteRecordResponse, HealthResponse, RecognizeResponse, RecordListResponse,
    SaveRecordResponse,
};
use glucolog::nutrition::Gender;
use glucolog::report::{ChartData, Report};
use glucolog::storage::{parse_glucose_value, MealTiming};
use std::path::PathBuf;

/// Widest chart bar printed by `report`
const MAX_BAR_WIDTH: usize = 60;

#[derive(Parser)]
#[command(name = "glucolog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal blood-glucose log")]
#[command(long_about = "Glucolog keeps a local log of blood-glucose readings.\nLog readings before or after meals and review daily and weekly trends.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8090", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log a reading (mmol/L)
    Log {
        /// Glucose value, e.g. 6.4
        value: String,
        /// Meal timing: before_meal or after_meal
        #[arg(short = 'm', long = "meal", default_value = "before_meal")]
        meal: MealTiming,
        /// Timestamp (default: now). Supports: "now", "yesterday", ISO 8601, Unix millis
        #[arg(short, long)]
        time: Option<String>,
        /// Free-text notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// List readings
    List {
        /// Window: all, today, 7days, or a duration like 30d
        #[arg(short, long, default_value = "all")]
        last: String,
    },

    /// Delete a reading by id
    Delete {
        /// Record id
        id: String,
    },

    /// Show a trend report
    Report {
        /// Window: today, 7days, 30days
        #[arg(short, long, default_value = "7days")]
        window: String,
    },

    /// Recognise the foods in a photo and judge the meal
    Food {
        /// Image URI or path
        image: String,
        /// Daily budget to compare against: male or female
        #[arg(short, long, default_value = "male")]
        gender: Gender,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Log {
            value,
            meal,
            time,
            notes,
        } => {
            let value = parse_glucose_value(&value)?;
            let timestamp = parse_timestamp(time.as_deref())?;

            let body = serde_json::json!({
                "value": value,
                "type": meal,
                "timestamp": timestamp,
                "notes": notes,
            });

            let response = client
                .post(format!("{}/api/v1/records", cli.api_url))
                .json(&body)
                .send()
                .await
                .with_context(|| connect_hint(&cli.api_url))?;

            if !response.status().is_success() {
                return fail("Failed to log reading", response).await;
            }

            let saved: SaveRecordResponse = response.json().await?;
            let record = &saved.record.record;
            println!(
                "Logged {:.1} mmol/L ({}) at {} [{}]",
                record.value,
                record.kind.label(),
                record.formatted_time(&Local),
                saved.record.status.label()
            );
        }

        Commands::List { last } => {
            let url = match last.trim().to_lowercase().as_str() {
                "all" => format!("{}/api/v1/records", cli.api_url),
                "today" => format!("{}/api/v1/records/today", cli.api_url),
                "7days" | "7d" => format!("{}/api/v1/records/last7days", cli.api_url),
                other => {
                    let end = Utc::now();
                    let start = end
                        .checked_sub_signed(parse_duration(other)?)
                        .with_context(|| format!("Duration {} reaches too far back", other))?;
                    format!(
                        "{}/api/v1/records/range?start={}&end={}",
                        cli.api_url,
                        start.timestamp_millis(),
                        end.timestamp_millis()
                    )
                }
            };

            let response = client
                .get(&url)
                .send()
                .await
                .with_context(|| connect_hint(&cli.api_url))?;

            if !response.status().is_success() {
                return fail("Failed to list readings", response).await;
            }

            let list: RecordListResponse = response.json().await?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&list)?),
                _ => print_records(&list),
            }
        }

        Commands::Delete { id } => {
            let response = client
                .delete(format!("{}/api/v1/records/{}", cli.api_url, id))
                .send()
                .await
                .with_context(|| connect_hint(&cli.api_url))?;

            if !response.status().is_success() {
                return fail("Failed to delete reading", response).await;
            }

            let deleted: DeleteRecordResponse = response.json().await?;
            if deleted.removed {
                println!("Deleted {}", deleted.id);
            } else {
                println!("No reading with id {}", deleted.id);
            }
        }

        Commands::Report { window } => {
            let response = client
                .get(format!("{}/api/v1/report", cli.api_url))
                .query(&[("window", window.as_str())])
                .send()
                .await
                .with_context(|| connect_hint(&cli.api_url))?;

            if !response.status().is_success() {
                return fail("Failed to build report", response).await;
            }

            let report: Report = response.json().await?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                _ => print_report(&report),
            }
        }

        Commands::Food { image, gender } => {
            let response = client
                .post(format!("{}/api/v1/food/recognize", cli.api_url))
                .json(&serde_json::json!({ "image": image, "gender": gender }))
                .send()
                .await
                .with_context(|| connect_hint(&cli.api_url))?;

            if !response.status().is_success() {
                return fail("Failed to recognise meal", response).await;
            }

            let recognized: RecognizeResponse = response.json().await?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&recognized)?),
                _ => print_meal(&recognized),
            }
        }

        Commands::Status => {
            let response = client.get(format!("{}/health", cli.api_url)).send().await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: HealthResponse = resp.json().await?;

                    println!("Glucolog v{}", health.version);
                    println!();
                    println!("API Status: {}", health.status);
                    println!("Storage:    {} ({} readings)", health.storage, health.record_count);
                    println!("Recognizer: {}", health.recognizer);
                    println!();
                    println!("Uptime: {}", format_duration(health.uptime_seconds));
                }
                Ok(resp) => {
                    bail!("API returned error: {}", resp.status());
                }
                Err(e) => {
                    eprintln!("Make sure the Glucolog API server is running:");
                    eprintln!("  cargo run --bin glucolog-api");
                    return Err(e).context(connect_hint(&cli.api_url));
                }
            }
        }

        Commands::Config { output } => {
            let config = glucolog::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn connect_hint(api_url: &str) -> String {
    format!("Cannot connect to Glucolog API at {}", api_url)
}

/// Turn a non-2xx response into an error carrying the server's message
async fn fail(action: &str, response: reqwest::Response) -> anyhow::Result<()> {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|body| body["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(text);

    bail!("{} ({}): {}", action, status, message)
}

fn parse_timestamp(input: Option<&str>) -> anyhow::Result<i64> {
    match input {
        None | Some("now") => Ok(Utc::now().timestamp_millis()),
        Some("yesterday") => Ok((Utc::now() - Duration::days(1)).timestamp_millis()),
        Some(s) => {
            if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
                Ok(dt.timestamp_millis())
            } else if let Ok(ts) = s.parse::<i64>() {
                Ok(ts)
            } else {
                bail!("Invalid timestamp format: {}", s)
            }
        }
    }
}

fn parse_duration(s: &str) -> anyhow::Result<Duration> {
    let s = s.trim().to_lowercase();

    let duration = if let Some(days) = s.strip_suffix('d') {
        Duration::try_days(days.parse()?)
    } else if let Some(weeks) = s.strip_suffix('w') {
        Duration::try_weeks(weeks.parse()?)
    } else if let Some(months) = s.strip_suffix('m') {
        months
            .parse::<i64>()?
            .checked_mul(30)
            .and_then(Duration::try_days)
    } else {
        bail!("Invalid duration format: {}. Use: all, today, 7d, 4w, 3m", s)
    };

    duration.with_context(|| format!("Duration out of range: {}", s))
}

/// Two characters per mmol/L, capped at `MAX_BAR_WIDTH`
fn chart_bar(value: f64) -> String {
    let width = (value * 2.0).round().clamp(0.0, MAX_BAR_WIDTH as f64) as usize;
    "#".repeat(width)
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn print_records(list: &RecordListResponse) {
    if list.records.is_empty() {
        println!("No readings yet.");
        println!();
        println!("Log your first reading with:");
        println!("  glucolog-cli log 5.6");
        return;
    }

    println!(
        "{:<17} {:>6}  {:<12} {:<10} {}",
        "Time", "mmol/L", "Meal", "Status", "Notes"
    );
    println!("{}", "-".repeat(64));

    for dto in &list.records {
        let record = &dto.record;
        println!(
            "{:<17} {:>6.1}  {:<12} {:<10} {}",
            record.formatted_time(&Local),
            record.value,
            record.kind.label(),
            dto.status.label(),
            record.notes
        );
    }

    println!();
    println!("{} readings", list.total);
}

fn print_meal(recognized: &RecognizeResponse) {
    let Some(data) = &recognized.result.data else {
        println!("Could not recognise the meal. Try another photo.");
        return;
    };

    println!("{:<24} {:>8} {:>8} {:>9}", "Food", "Portion", "kcal", "Carbs (g)");
    println!("{}", "-".repeat(52));
    for food in &data.foods {
        println!(
            "{:<24} {:>8} {:>8.0} {:>9.1}",
            food.name, food.portion, food.nutrition.calories, food.nutrition.carbs
        );
    }

    let total = &data.total_nutrition;
    println!();
    println!(
        "Total: {:.0} kcal, {:.1} g carbs, {:.1} g sugar, {:.1} g fiber",
        total.calories, total.carbs, total.sugar, total.fiber
    );

    if let Some(assessment) = &recognized.assessment {
        let daily = &assessment.daily_percentage;
        println!();
        println!("Share of daily budget ({}):", assessment.gender);
        println!(
            "  Carbs {:.0}%  Sugar {:.0}%  Calories {:.0}%",
            daily.carbs, daily.sugar, daily.calories
        );
        println!(
            "  Carbs per meal: {}  Fiber: {}",
            assessment.carbs.label(),
            assessment.fiber.label()
        );

        println!();
        for food in &assessment.foods {
            println!("  {:<24} GI {:>3} ({})", food.name, food.gi, food.level.label());
        }
    }
}

fn print_report(report: &Report) {
    let stats = &report.stats;

    println!("Report: {} ({} readings)", report.window, report.record_count);
    println!();

    if report.record_count == 0 {
        println!("No readings in this window.");
        return;
    }

    println!("  Average: {:.1} mmol/L", stats.average);
    println!("  Highest: {:.1} mmol/L", stats.highest);
    println!("  Lowest:  {:.1} mmol/L", stats.lowest);
    println!();
    println!(
        "  Normal {} / High {} / Low {}  ({:.0}% in range)",
        stats.normal_count,
        stats.high_count,
        stats.low_count,
        stats.in_range_percent()
    );

    if let ChartData::Series(series) = &report.chart {
        println!();
        for (label, value) in series.points() {
            println!("  {:>6} {:>5.1} {}", label, value, chart_bar(value));
        }
    }

    println!();
    println!("{}", report.advisory.message());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30d").unwrap(), Duration::days(30));
        assert_eq!(parse_duration("4W").unwrap(), Duration::weeks(4));
        assert_eq!(parse_duration("3m").unwrap(), Duration::days(90));
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn test_parse_duration_out_of_range() {
        assert!(parse_duration("99999999999999d").is_err());
        assert!(parse_duration("99999999999999w").is_err());
        assert!(parse_duration("999999999999999999m").is_err());
    }

    #[test]
    fn test_chart_bar_is_clamped() {
        assert_eq!(chart_bar(5.0), "##########");
        assert_eq!(chart_bar(-3.0), "");
        assert_eq!(chart_bar(1e308).len(), MAX_BAR_WIDTH);
        assert_eq!(chart_bar(f64::NAN), "");
    }
}
