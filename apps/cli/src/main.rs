#![deny(warnings)]

//! Headless calculator: load client and market data plus a YAML profile, print the tables.

use anyhow::{bail, Context, Result};
use calc_combat::TimeScale;
use calc_core::{ActionId, CharacterInputs, EngineConfig, PriceOverrides, Skill};
use calc_runtime::{Calculator, EnhancementRequest};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    data: Option<PathBuf>,
    market: Option<PathBuf>,
    profile: Option<PathBuf>,
    version: bool,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--data" => args.data = it.next().map(PathBuf::from),
            "--market" => args.market = it.next().map(PathBuf::from),
            "--profile" => args.profile = it.next().map(PathBuf::from),
            "--version" => args.version = true,
            _ => {}
        }
    }
    args
}

#[derive(Debug, Deserialize)]
struct CombatRequest {
    zone: ActionId,
    kph: f64,
    #[serde(default)]
    scale: TimeScale,
}

/// Everything the operator would enter in the calculator UI.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Profile {
    engine: EngineConfig,
    character: CharacterInputs,
    buffs: Vec<String>,
    price_overrides: PriceOverrides,
    action_type: Option<String>,
    tool_level: Option<u32>,
    combat: Option<CombatRequest>,
    enhancement: Option<EnhancementRequest>,
    market_search: Option<String>,
}

fn load_profile(path: Option<&PathBuf>) -> Result<Profile> {
    let Some(path) = path else {
        return Ok(Profile::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading profile {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing profile {}", path.display()))
}

fn version_line() -> String {
    format!("cowculator {} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_SHA"))
}

fn fmt_num(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.2}")
    } else {
        "∞".to_string()
    }
}

fn print_actions(calc: &Calculator, profile: &Profile, action_type: &str) {
    let table = calc.action_table(action_type, &profile.character, &profile.buffs);
    if let Some(message) = table.buffs.error_message() {
        println!("! {message}");
    }
    println!(
        "{:<28} {:>5} {:>8} {:>6} {:>10} {:>12} {:>12}",
        "Action", "Req", "Seconds", "Eff", "XP/h", "Profit/h", "Net/h"
    );
    for row in &table.rows {
        println!(
            "{:<28} {:>5} {:>8} {:>6} {:>10} {:>12} {:>12}",
            row.name,
            row.level_requirement,
            fmt_num(row.seconds),
            fmt_num(row.efficiency),
            fmt_num(row.experience_per_hour),
            fmt_num(row.profit_per_hour),
            fmt_num(row.net_profit_per_hour)
        );
    }
    let items: Vec<&str> = calc
        .relevant_items(action_type)
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    println!("Relevant items: {}", items.join(", "));
    let teas: Vec<&str> = calc
        .available_buffs(action_type)
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    println!("Available teas: {}", teas.join(", "));

    if let (Some(skill), Some(level)) = (Skill::from_action_type(action_type), profile.tool_level) {
        for (tool, bonus) in calc.tool_bonuses(skill, level) {
            println!("Tool {} +{level}: {}%", tool.name, fmt_num(bonus));
        }
    }
    if profile.character.target_level.is_some() {
        for row in &table.rows {
            if let Some(p) = calc.progression(&row.action, &profile.character, &profile.buffs) {
                println!(
                    "To level {} via {}: {} actions, {} h",
                    p.target_level,
                    row.name,
                    fmt_num(p.actions_needed),
                    fmt_num(p.hours_needed)
                );
            }
        }
    }
}

fn print_combat(calc: &mut Calculator, request: &CombatRequest) -> Result<()> {
    let Some(report) = calc.combat_report(&request.zone, request.kph, request.scale) else {
        bail!("unknown combat zone {}", request.zone);
    };
    let period = match request.scale {
        TimeScale::Hour => "h",
        TimeScale::Day => "day",
    };
    println!("Encounters at {} kph in {}", fmt_num(report.kph), report.zone);
    for row in &report.encounters {
        println!("  {:<24} {:>8}", row.name, fmt_num(row.rate));
    }
    println!(
        "{:<28} {:>12} {:>10} {:>14}",
        "Item",
        format!("Drops/{period}"),
        "Coin/item",
        format!("Coin/{period}")
    );
    for row in &report.loot.rows {
        println!(
            "{:<28} {:>12} {:>10} {:>14}",
            row.name,
            fmt_num(row.drops_per_hour),
            row.coin_per_item,
            fmt_num(row.coin_per_hour)
        );
    }
    println!("Total coin/{period}: {}", fmt_num(report.loot.total_coin_per_hour));
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    if args.version {
        println!("{}", version_line());
        return Ok(());
    }
    let Some(data_path) = args.data.as_ref() else {
        bail!("usage: cli --data <client.json> [--market <market.json>] [--profile <profile.yaml>]");
    };
    info!(?args, "starting CLI");

    let data = data_pipeline::load_reference_data(data_path)?;
    let snapshot = args
        .market
        .as_ref()
        .map(data_pipeline::load_market_snapshot)
        .transpose()?;
    let market = data_pipeline::build_market_book(&data, snapshot.as_ref());
    let profile = load_profile(args.profile.as_ref())?;

    let mut calc = Calculator::new(data, market, &profile.engine);
    for (item, price) in &profile.price_overrides {
        calc.set_override(item.clone(), Some(*price));
    }

    if let Some(action_type) = profile.action_type.as_deref() {
        print_actions(&calc, &profile, action_type);
    }
    if let Some(request) = &profile.combat {
        print_combat(&mut calc, request)?;
    }
    if let Some(request) = &profile.enhancement {
        let plan = calc
            .enhancement_plan(request, &profile.character, &profile.buffs)
            .with_context(|| format!("unknown item {}", request.item))?;
        println!(
            "Enhance {} to +{}: {} attempts, {} protections, {} h, {} coin",
            request.item,
            plan.target_level,
            fmt_num(plan.expected_attempts),
            fmt_num(plan.expected_protections),
            fmt_num(plan.expected_hours),
            fmt_num(plan.total_cost)
        );
    }
    if let Some(search) = profile.market_search.as_deref() {
        for row in calc.market_listing(search) {
            let show = |p: Option<rust_decimal::Decimal>| p.map_or("-".to_string(), |p| p.to_string());
            println!("{:<28} {:>10} {:>10}", row.name, show(row.ask), show(row.bid));
        }
    }
    Ok(())
}
