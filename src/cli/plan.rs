//! Interactive trip planner

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::config::AppConfig;
use crate::domain::agent::{geo, TripRequest};
use crate::domain::travel::CabinClass;
use crate::infrastructure::logging;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    // Keep the interactive session readable; logs go up from warn only
    logging::init_logging(&logging::LoggingConfig {
        level: "warn".to_string(),
        format: config.logging.format,
    });

    let state = crate::create_app_state(&config).await?;
    let agent = state.agent;

    println!("=== TravelAI - Full Trip Planner ===\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let origin_city = prompt(&mut lines, "From city: ")?;
    let destination_city = prompt(&mut lines, "To city: ")?;
    let depart_date = prompt(&mut lines, "Depart date (YYYY-MM-DD): ")?;
    let return_date = prompt(&mut lines, "Return date (YYYY-MM-DD): ")?;

    let passengers = prompt(&mut lines, "Passengers (default 2): ")?
        .parse::<u32>()
        .unwrap_or(2);

    let cabin_raw = prompt(
        &mut lines,
        "Cabin class (economy/premium_economy/business/first) [default economy]: ",
    )?;
    let cabin_class = if cabin_raw.is_empty() {
        CabinClass::Economy
    } else {
        CabinClass::from_str(&cabin_raw)?
    };

    let interests_raw = prompt(
        &mut lines,
        "Your interests (food/nightlife/history/adventure/etc) [default sightseeing]: ",
    )?;
    let interests = if interests_raw.is_empty() {
        "sightseeing".to_string()
    } else {
        interests_raw
    };

    let max_budget = prompt(
        &mut lines,
        "Approx TOTAL budget for the whole trip in INR (optional, press Enter to skip): ",
    )?
    .parse::<f64>()
    .ok();

    if let (Ok(depart), Ok(ret)) = (
        geo::normalize_date(&depart_date),
        geo::normalize_date(&return_date),
    ) {
        println!("\nComputed trip length: {} day(s)\n", geo::trip_days(&depart, &ret));
    }
    println!("Generating your full itinerary... Please wait...\n");

    let request = TripRequest {
        origin_city,
        destination_city,
        depart_date,
        return_date,
        passengers,
        cabin_class,
        interests: Some(interests),
        max_budget,
    };

    let mut itinerary = match agent.plan_trip(&request).await {
        Ok(itinerary) => itinerary,
        Err(e) => {
            eprintln!("Failed to generate trip: {}", e);
            return Ok(());
        }
    };

    println!("=== INITIAL ITINERARY ===\n");
    println!("{}", itinerary);

    loop {
        println!("\nYou can now tweak your plan.");
        println!("Examples:");
        println!("  - make it more budget friendly");
        println!("  - add more nightlife on day 2");
        println!("  - reduce travel time, keep places nearby");
        println!("Type 'done' to finish.\n");

        let change = prompt(&mut lines, "What would you like to change? ")?;

        if matches!(change.to_lowercase().as_str(), "done" | "exit" | "quit" | "no" | "n") {
            println!("\nFinal itinerary confirmed. Have a great trip!");
            break;
        }

        println!("\nUpdating your itinerary...\n");
        match agent.refine_itinerary(&itinerary, &change).await {
            Ok(updated) => {
                itinerary = updated;
                println!("=== UPDATED ITINERARY ===\n");
                println!("{}", itinerary);
            }
            Err(e) => eprintln!("Failed to refine trip: {}", e),
        }
    }

    Ok(())
}

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
) -> anyhow::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    match lines.next() {
        Some(line) => Ok(line?.trim().to_string()),
        None => anyhow::bail!("stdin closed"),
    }
}
