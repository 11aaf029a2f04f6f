use analytics::{AnalyticsEngine, PerformanceStats, RankedTrade};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use compound::{currency_symbol, CalculatorInput, ContributionType, ReturnPeriod};
use configuration::{AnalyticsSettings, ExpectancyFormula, RiskRewardFallback, WeekdayBuckets};
use core_types::{Period, Trade};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use serde_json::json;
use std::path::{Path, PathBuf};

mod demo;
mod logging;

/// The main entry point for the trading journal analytics tool.
fn main() -> Result<()> {
    // A missing .env file is fine; it only carries optional overrides.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;
    cli.overrides.apply(&mut config.analytics);
    config.validate().context("Invalid command-line overrides")?;

    let _log_guard = logging::init_logging(&config.logging)?;
    tracing::debug!(analytics = ?config.analytics, "Settings resolved.");

    let engine = AnalyticsEngine::new(config.analytics);
    let output = Output { json: cli.json };

    // Execute the appropriate command
    match cli.command {
        Commands::Stats(args) => handle_stats(&engine, args, output),
        Commands::Weekdays(args) => handle_weekdays(&engine, args, output),
        Commands::Hourly(args) => handle_hourly(&engine, args, output),
        Commands::Daily(args) => handle_daily(&engine, args, output),
        Commands::Exits(args) => handle_exits(&engine, args, output),
        Commands::Series(args) => handle_series(&engine, args, output),
        Commands::Compound(args) => handle_compound(args, output),
        Commands::Demo(args) => handle_demo(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Performance analytics for a trading journal exported as JSON.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of ./journal.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    overrides: AnalyticsOverrides,

    #[command(subcommand)]
    command: Commands,
}

/// Command-line overrides for the `[analytics]` configuration section.
#[derive(Args)]
struct AnalyticsOverrides {
    /// Offset of the local clock from UTC, in minutes (e.g. 180 or -300).
    #[arg(long, global = true, allow_negative_numbers = true)]
    utc_offset: Option<i32>,

    /// Which days the weekday breakdown reports on.
    #[arg(long, global = true, value_enum)]
    weekday_buckets: Option<WeekdayBuckets>,

    /// Risk/reward reported for trades without a planned stop and target.
    #[arg(long, global = true, value_enum)]
    risk_reward_fallback: Option<RiskRewardFallback>,

    /// Expectancy formula used by the performance summary.
    #[arg(long, global = true, value_enum)]
    expectancy: Option<ExpectancyFormula>,
}

impl AnalyticsOverrides {
    fn apply(&self, settings: &mut AnalyticsSettings) {
        if let Some(offset) = self.utc_offset {
            settings.utc_offset_minutes = offset;
        }
        if let Some(buckets) = self.weekday_buckets {
            settings.weekday_buckets = buckets;
        }
        if let Some(fallback) = self.risk_reward_fallback {
            settings.risk_reward_fallback = fallback;
        }
        if let Some(formula) = self.expectancy {
            settings.expectancy_formula = formula;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Summary statistics for a reporting period.
    Stats(StatsArgs),
    /// Performance per day of the week, with the best and worst day.
    Weekdays(TradesArg),
    /// Performance per hour of entry.
    Hourly(HourlyArgs),
    /// Journal summary of a single day.
    Daily(DailyArgs),
    /// Where winning trades were closed.
    Exits(TradesArg),
    /// Equity curve, daily totals and the best and worst trades.
    Series(SeriesArgs),
    /// Project compound growth of an account.
    Compound(CompoundArgs),
    /// Print a generated demo journal as JSON.
    Demo(DemoArgs),
}

#[derive(Args)]
struct TradesArg {
    /// JSON file holding an array of trades.
    #[arg(long)]
    trades: PathBuf,
}

#[derive(Args)]
struct StatsArgs {
    #[command(flatten)]
    input: TradesArg,
    #[arg(long, value_enum, default_value_t = Period::All)]
    period: Period,
    /// Reference instant for the period window (RFC 3339). Defaults to now.
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

#[derive(Args)]
struct HourlyArgs {
    #[command(flatten)]
    input: TradesArg,
    /// Also list hours without any trades.
    #[arg(long)]
    all_hours: bool,
}

#[derive(Args)]
struct DailyArgs {
    #[command(flatten)]
    input: TradesArg,
    /// The day to summarize (format: YYYY-MM-DD), in the configured offset.
    #[arg(long)]
    date: NaiveDate,
}

#[derive(Args)]
struct SeriesArgs {
    #[command(flatten)]
    input: TradesArg,
    /// Number of days of daily totals, ending today.
    #[arg(long, default_value_t = 30)]
    days: u32,
    /// How many best and worst trades to list.
    #[arg(long, default_value_t = 5)]
    top: usize,
    /// Reference instant for "today" (RFC 3339). Defaults to now.
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

#[derive(Args)]
struct CompoundArgs {
    /// Starting balance.
    #[arg(long)]
    principal: Decimal,
    /// Return per period, in percent.
    #[arg(long, allow_negative_numbers = true)]
    rate: Decimal,
    #[arg(long, value_enum, default_value_t = ReturnPeriod::Monthly)]
    period: ReturnPeriod,
    /// Number of periods to simulate.
    #[arg(long)]
    count: u32,
    #[arg(long, value_enum, default_value_t = ContributionType::None)]
    contribution_type: ContributionType,
    /// Amount added or withdrawn at the end of every period.
    #[arg(long)]
    amount: Option<Decimal>,
    #[arg(long, default_value = "USD")]
    currency: String,
}

#[derive(Args)]
struct DemoArgs {
    /// Number of calendar days to cover, ending today.
    #[arg(long, default_value_t = 30)]
    days: u32,
    /// Seed for a reproducible journal.
    #[arg(long)]
    seed: Option<u64>,
}

// ==============================================================================
// Input and Output
// ==============================================================================

/// Reads and validates a journal export.
fn load_trades(path: &Path) -> Result<Vec<Trade>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read trades from {}", path.display()))?;
    let trades: Vec<Trade> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse trades in {}", path.display()))?;

    for trade in &trades {
        trade
            .validate()
            .with_context(|| format!("Trade {} in {} is invalid", trade.id, path.display()))?;
    }

    tracing::info!(count = trades.len(), path = %path.display(), "Trades loaded.");
    Ok(trades)
}

#[derive(Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    /// Prints `value` as JSON when requested, otherwise the table built by `render`.
    fn emit<T, F>(self, value: &T, render: F) -> Result<()>
    where
        T: serde::Serialize,
        F: FnOnce(&T),
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            render(value);
        }
        Ok(())
    }
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn pct(value: Decimal) -> String {
    format!("{value:.2}%")
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn handle_stats(engine: &AnalyticsEngine, args: StatsArgs, output: Output) -> Result<()> {
    let trades = load_trades(&args.input.trades)?;
    let now = args.now.unwrap_or_else(Utc::now);
    let stats = engine.performance_stats(&trades, args.period, now);

    output.emit(&stats, |stats| {
        println!("Performance ({} period)", stats.period);
        println!("{}", stats_table(stats));
    })
}

fn stats_table(stats: &PerformanceStats) -> Table {
    let mut table = table(vec!["Metric", "Value"]);
    table
        .add_row(vec!["Trades".to_string(), stats.trade_count.to_string()])
        .add_row(vec![
            "Wins / Losses / Breakeven".to_string(),
            format!("{} / {} / {}", stats.win_count, stats.loss_count, stats.breakeven_count),
        ])
        .add_row(vec!["Win rate".to_string(), pct(stats.win_rate)])
        .add_row(vec!["Total return".to_string(), pct(stats.total_return_percent)])
        .add_row(vec!["Best trade".to_string(), pct(stats.best_trade_percent)])
        .add_row(vec!["Worst trade".to_string(), pct(stats.worst_trade_percent)])
        .add_row(vec!["Average win".to_string(), pct(stats.average_win_percent)])
        .add_row(vec!["Average loss".to_string(), pct(stats.average_loss_percent)])
        .add_row(vec!["Expectancy".to_string(), format!("{:.2}", stats.expectancy_percent)])
        .add_row(vec![
            "Average R:R".to_string(),
            format!("{:.2}", stats.average_risk_reward_ratio),
        ])
        .add_row(vec!["Longest win streak".to_string(), stats.max_win_streak.to_string()])
        .add_row(vec!["Longest loss streak".to_string(), stats.max_loss_streak.to_string()])
        .add_row(vec![
            "Average duration".to_string(),
            format!("{} min", stats.average_duration_minutes),
        ]);
    table
}

fn handle_weekdays(engine: &AnalyticsEngine, args: TradesArg, output: Output) -> Result<()> {
    let trades = load_trades(&args.trades)?;
    let days = engine.weekday_stats(&trades);
    let best_worst = engine.best_worst_days(&trades);
    let report = json!({ "days": days, "bestWorst": best_worst });

    output.emit(&report, |_| {
        let mut table = table(vec!["Day", "Trades", "Win rate", "Total", "Average", "Largest win", "Largest loss"]);
        for day in &days {
            table.add_row(vec![
                day.day_of_week.to_string(),
                day.trade_count.to_string(),
                pct(day.win_rate),
                pct(day.total_return_percent),
                pct(day.average_return_percent),
                pct(day.largest_win_percent),
                pct(day.largest_loss_percent),
            ]);
        }
        println!("{table}");
        if let Some(best_worst) = &best_worst {
            println!(
                "Best day: {} ({}), worst day: {} ({})",
                best_worst.best.day_of_week,
                pct(best_worst.best.average_return_percent),
                best_worst.worst.day_of_week,
                pct(best_worst.worst.average_return_percent),
            );
        }
    })
}

fn handle_hourly(engine: &AnalyticsEngine, args: HourlyArgs, output: Output) -> Result<()> {
    let trades = load_trades(&args.input.trades)?;
    let hourly = engine.hourly_performance(&trades);

    output.emit(&hourly, |hourly| {
        let mut table = table(vec!["Hour", "Trades", "Win rate", "Total", "Average win", "Average loss"]);
        for (hour, stats) in hourly {
            if stats.trade_count == 0 && !args.all_hours {
                continue;
            }
            table.add_row(vec![
                format!("{hour:02}:00"),
                stats.trade_count.to_string(),
                pct(stats.win_rate),
                pct(stats.total_return_percent),
                pct(stats.average_win_percent),
                pct(stats.average_loss_percent),
            ]);
        }
        println!("{table}");
    })
}

fn handle_daily(engine: &AnalyticsEngine, args: DailyArgs, output: Output) -> Result<()> {
    let trades = load_trades(&args.input.trades)?;
    let summary = engine.daily_summary(&trades, args.date);

    output.emit(&summary, |summary| {
        println!("{} ({})", summary.date, summary.day_of_week);
        let mut table = table(vec!["Metric", "Value"]);
        table
            .add_row(vec!["Trades".to_string(), summary.trade_count.to_string()])
            .add_row(vec![
                "Wins / Losses / Breakeven".to_string(),
                format!("{} / {} / {}", summary.win_count, summary.loss_count, summary.breakeven_count),
            ])
            .add_row(vec!["Win rate".to_string(), pct(summary.win_rate)])
            .add_row(vec!["Total return".to_string(), pct(summary.total_return_percent)]);
        for (label, trade) in [("Best trade", &summary.best_trade), ("Worst trade", &summary.worst_trade)] {
            if let Some(trade) = trade {
                let metrics = engine.trade_metrics(trade);
                table.add_row(vec![
                    label.to_string(),
                    format!("{} {} {}", trade.symbol, trade.direction, pct(metrics.trade_return_percent)),
                ]);
            }
        }
        println!("{table}");
        for note in &summary.notes {
            println!("- {note}");
        }
    })
}

fn handle_exits(engine: &AnalyticsEngine, args: TradesArg, output: Output) -> Result<()> {
    let trades = load_trades(&args.trades)?;
    let analysis = engine.exit_analysis(&trades);

    output.emit(&analysis, |analysis| {
        if !analysis.histogram.is_empty() {
            let mut table = table(vec!["Exit band", "Trades", "Share"]);
            for bin in &analysis.histogram {
                table.add_row(vec![bin.to_string(), bin.count.to_string(), pct(bin.percentage)]);
            }
            println!("{table}");
            println!(
                "Winning exits ranged from {} to {}, averaging {}.",
                pct(analysis.exit_range_min),
                pct(analysis.exit_range_max),
                pct(analysis.average_exit_percent),
            );
        }
        println!("{}", analysis.analysis_note);
    })
}

fn handle_series(engine: &AnalyticsEngine, args: SeriesArgs, output: Output) -> Result<()> {
    let trades = load_trades(&args.input.trades)?;
    let now = args.now.unwrap_or_else(Utc::now);

    let cumulative = engine.cumulative_returns(&trades);
    let daily = engine.daily_returns(&trades, args.days, now);
    let ranked = engine.top_and_bottom_trades(&trades, args.top);
    let report = json!({ "cumulative": cumulative, "daily": daily, "ranked": ranked });

    output.emit(&report, |_| {
        if let Some(last) = cumulative.last() {
            println!(
                "Cumulative return after {} trades: {}",
                cumulative.len(),
                pct(last.cumulative_return_percent)
            );
        }

        let mut days = table(vec!["Date", "Trades", "Total"]);
        for day in &daily {
            days.add_row(vec![
                day.date.to_string(),
                day.trade_count.to_string(),
                pct(day.total_return_percent),
            ]);
        }
        println!("{days}");

        println!("Best trades");
        println!("{}", ranked_table(&ranked.best));
        println!("Worst trades");
        println!("{}", ranked_table(&ranked.worst));
    })
}

fn ranked_table(ranked: &[RankedTrade]) -> Table {
    let mut table = table(vec!["Entered", "Symbol", "Direction", "Return"]);
    for entry in ranked {
        table.add_row(vec![
            entry.trade.entry_time.format("%Y-%m-%d %H:%M").to_string(),
            entry.trade.symbol.clone(),
            entry.trade.direction.to_string(),
            pct(entry.metrics.trade_return_percent),
        ]);
    }
    table
}

fn handle_compound(args: CompoundArgs, output: Output) -> Result<()> {
    let input = CalculatorInput {
        currency: args.currency,
        principal: args.principal,
        return_rate: args.rate,
        return_period: args.period,
        period_count: args.count,
        contribution_type: args.contribution_type,
        contribution_amount: args.amount,
    };
    input.validate().context("Invalid compound calculator input")?;
    let result = compound::simulate(&input);

    output.emit(&result, |result| {
        let symbol = currency_symbol(&result.input.currency);
        let mut table = table(vec!["Period", "Year", "Month", "Balance", "Period interest", "Cumulative interest"]);
        for point in &result.trajectory {
            table.add_row(vec![
                point.periods_completed.to_string(),
                point.year.to_string(),
                point.month.to_string(),
                format!("{symbol}{:.2}", point.balance),
                format!("{symbol}{:.2}", point.period_interest),
                format!("{symbol}{:.2}", point.cumulative_interest),
            ]);
        }
        println!("{table}");
        println!(
            "Final balance {symbol}{:.2}, interest {symbol}{:.2} on {symbol}{:.2} invested ({}).",
            result.final_balance,
            result.total_interest_earned,
            result.total_principal_invested,
            pct(result.total_return_percent),
        );
    })
}

fn handle_demo(args: DemoArgs) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let trades = demo::generate_demo_trades(args.days, Utc::now(), &mut rng);

    tracing::info!(seed, count = trades.len(), "Demo journal generated.");
    println!("{}", serde_json::to_string_pretty(&trades)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::error::ConfigError;
    use configuration::Config;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["journal"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn overrides_replace_configured_settings() {
        let cli = parse(&[
            "weekdays",
            "--trades",
            "t.json",
            "--utc-offset",
            "-300",
            "--weekday-buckets",
            "full-week",
        ]);
        let mut config = Config::default();
        cli.overrides.apply(&mut config.analytics);

        assert_eq!(config.analytics.utc_offset_minutes, -300);
        assert_eq!(config.analytics.weekday_buckets, WeekdayBuckets::FullWeek);
        assert_eq!(config.analytics.expectancy_formula, ExpectancyFormula::Legacy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn out_of_range_utc_offset_override_is_rejected() {
        let cli = parse(&["--utc-offset", "1500", "stats", "--trades", "t.json"]);
        let mut config = Config::default();
        cli.overrides.apply(&mut config.analytics);

        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }
}
