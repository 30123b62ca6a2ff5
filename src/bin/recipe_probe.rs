//! Runs one recipe against the configured live provider.
//!
//! Usage: recipe-probe <decorations|menu|tasks|timeline> <guests> <party details...>
//!
//! Menu hints come from the APPETIZERS, MAIN_COURSES, SIDE_DISHES, DESSERTS,
//! BEVERAGES and OTHER_ITEMS environment variables.

use anyhow::Result;
use axum::body::Bytes;
use party_planner_svc::config::Config;
use party_planner_svc::error::AppError;
use party_planner_svc::generation::build_generator;
use party_planner_svc::models::GeneratedPlan;
use party_planner_svc::pipeline::run_recipe;
use party_planner_svc::recipe::PlanKind;
use serde_json::{Map, Value};

const MENU_HINT_VARS: [(&str, &str); 6] = [
    ("appetizers", "APPETIZERS"),
    ("mainCourses", "MAIN_COURSES"),
    ("sideDishes", "SIDE_DISHES"),
    ("desserts", "DESSERTS"),
    ("beverages", "BEVERAGES"),
    ("otherItems", "OTHER_ITEMS"),
];

fn request_body(guests: String, details: String) -> Bytes {
    let mut body = Map::new();
    // Numeric guest counts go out as numbers, like a browser form would send them.
    let guests = guests
        .parse::<u64>()
        .map(Value::from)
        .unwrap_or(Value::String(guests));
    body.insert("guests".to_string(), guests);
    body.insert("partyDetails".to_string(), Value::String(details));
    for (field, var) in MENU_HINT_VARS {
        if let Ok(hint) = std::env::var(var) {
            body.insert(field.to_string(), Value::String(hint));
        }
    }
    Bytes::from(Value::Object(body).to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let (Some(kind), Some(guests)) = (args.next(), args.next()) else {
        return Err(anyhow::anyhow!(
            "usage: recipe-probe <decorations|menu|tasks|timeline> <guests> <party details...>"
        ));
    };
    let kind: PlanKind = kind.parse()?;
    let details = args.collect::<Vec<_>>().join(" ");

    let config = Config::from_env()?;
    println!("Provider: {:?} ({})", config.provider, config.model);
    println!("Recipe: {} -> {}", kind, kind.recipe().path);
    println!("{}", "=".repeat(50));

    let generator = build_generator(&config)?;
    let body = request_body(guests, details);

    let value = match run_recipe(generator.as_ref(), kind.recipe(), body).await {
        Ok(value) => value,
        Err(AppError::Generation { error, details }) => {
            println!("Generation failed: {}", error);
            println!("Details: {}", details);
            return Err(anyhow::anyhow!(details));
        }
        Err(other) => return Err(anyhow::anyhow!("Request rejected: {:?}", other)),
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    println!("{}", "─".repeat(60));

    match GeneratedPlan::from_value(kind, value) {
        Ok(plan) => println!("Plan matches the {} shape with {} entries", plan.kind(), plan.len()),
        Err(e) => println!("Plan does not match the {} shape: {}", kind, e),
    }

    Ok(())
}
