//! Glucolog demo
//!
//! Seeds a throwaway store with a week of readings and logs the reports for
//! every window.

use chrono::{Local, Utc};
use glucolog::nutrition::{
    recognize_with_timeout, Gender, ImageRef, MealAssessment, MockFoodRecognizer,
};
use glucolog::query::{ReportWindow, DAY_MILLIS};
use glucolog::report::Report;
use glucolog::storage::*;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "glucolog=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Glucolog v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = std::env::temp_dir().join(format!("glucolog-demo-{}", std::process::id()));
    let store = RecordStore::open(&StoreConfig::new(&data_dir))?;

    seed_week(&store).await?;

    let records = store.try_get_all().await?;
    tracing::info!("Store holds {} readings", records.len());

    // Demo: reports for every window
    let now = Utc::now().timestamp_millis();
    for window in ReportWindow::all() {
        let report = Report::generate(&records, *window, now, &Local);
        tracing::info!(
            "{:>6}: {} readings, avg {:.1}, high {}, low {}, {:?}",
            window.to_string(),
            report.record_count,
            report.stats.average,
            report.stats.high_count,
            report.stats.low_count,
            report.advisory
        );
    }

    // Demo: delete the newest reading
    if let Some(newest) = records.first() {
        let removed = store.try_delete_by_id(&newest.id).await?;
        tracing::info!("Deleted {} (removed: {})", newest.id, removed);
    }

    // Demo: meal recognition
    let recognizer = MockFoodRecognizer::new(Duration::from_millis(200));
    let meal = recognize_with_timeout(
        &recognizer,
        &ImageRef::new("file:///demo/lunch.jpg"),
        Duration::from_secs(5),
    )
    .await?;
    tracing::info!(
        "Recognized {} foods: {} kcal, {} g carbs",
        meal.foods.len(),
        meal.total_nutrition.calories,
        meal.total_nutrition.carbs
    );

    let assessment = MealAssessment::of(&meal, Gender::default());
    tracing::info!(
        "Meal uses {:.0}% of the daily carbs budget, carbs {}, fiber {}",
        assessment.daily_percentage.carbs,
        assessment.carbs.label(),
        assessment.fiber.label()
    );
    for food in &assessment.foods {
        tracing::info!("  {}: GI {} ({})", food.name, food.gi, food.level.label());
    }

    std::fs::remove_dir_all(&data_dir)?;
    tracing::info!("Demo complete");
    Ok(())
}

/// Two readings a day for the past week
async fn seed_week(store: &RecordStore) -> StorageResult<()> {
    let now = Utc::now().timestamp_millis();
    let fasting = [5.2, 5.8, 6.1, 4.9, 5.5, 7.0, 5.3];
    let post_meal = [7.4, 9.6, 8.2, 6.9, 11.3, 8.8, 7.1];

    for day in 0..7 {
        let base = now - (day as i64) * DAY_MILLIS;

        let before = GlucoseRecord::with_timestamp(
            store.generate_id(),
            fasting[day],
            MealTiming::BeforeMeal,
            base - 3 * 3_600_000,
        );
        store.try_save(before).await?;

        let after = GlucoseRecord::with_timestamp(
            store.generate_id(),
            post_meal[day],
            MealTiming::AfterMeal,
            base - 3_600_000,
        )
        .notes("lunch");
        store.try_save(after).await?;
    }

    Ok(())
}
