use crate::infra::{build_catalog, parse_pool, parse_weight_override};
use clap::Args;
use priority_funding::catalog::RegionSource;
use priority_funding::config::AppConfig;
use priority_funding::error::AppError;
use priority_funding::funding::{
    FundingSnapshot, Indicator, PriorityFundingService, ScoringPolicy,
};
use priority_funding::telemetry;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct RankArgs {
    /// Country whose regions should be ranked (defaults to FUNDING_COUNTRY)
    #[arg(long)]
    pub(crate) country: Option<String>,
    /// Region CSV export to merge into the catalog before ranking
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Total funding pool to distribute (defaults to FUNDING_POOL)
    #[arg(long, value_parser = parse_pool)]
    pub(crate) pool: Option<f64>,
    /// Weight override as INDICATOR=VALUE; repeat for several indicators
    #[arg(long = "weight", value_parser = parse_weight_override)]
    pub(crate) weights: Vec<(Indicator, f64)>,
    /// Reject negative weights and negative score totals
    #[arg(long)]
    pub(crate) strict: bool,
    /// Only print the highest-priority N regions
    #[arg(long)]
    pub(crate) top: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CountriesArgs {
    /// Region CSV export to merge into the catalog before listing
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        country,
        csv,
        pool,
        weights,
        strict,
        top,
    } = args;

    let mut config = AppConfig::load()?;
    telemetry::init_for_cli(&config.telemetry)?;

    if let Some(country) = country {
        config.funding.default_country = country;
    }
    if csv.is_some() {
        config.funding.region_csv = csv;
    }
    if let Some(pool) = pool {
        config.funding.total_pool = pool;
    }
    if strict {
        config.funding.policy = ScoringPolicy::Strict;
    }

    let catalog = Arc::new(build_catalog(&config.funding)?);
    let service = PriorityFundingService::new(catalog, &config.funding)?;
    for (indicator, value) in weights {
        service.set_weight(indicator, value)?;
    }

    let snapshot = service.snapshot()?;
    print!("{}", render_ranking(&snapshot, top));
    Ok(())
}

pub(crate) fn run_countries(args: CountriesArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    telemetry::init_for_cli(&config.telemetry)?;
    if args.csv.is_some() {
        config.funding.region_csv = args.csv;
    }

    let catalog = build_catalog(&config.funding)?;
    println!("Available countries");
    for country in catalog.countries() {
        let center = match country.center {
            Some(point) => format!("{:.4}, {:.4}", point.latitude, point.longitude),
            None => "no map centre".to_string(),
        };
        println!(
            "- {} ({} regions, centre {})",
            country.name, country.region_count, center
        );
    }
    Ok(())
}

pub(crate) fn render_ranking(snapshot: &FundingSnapshot, top: Option<usize>) -> String {
    let mut out = String::new();
    out.push_str(&format!("Priority funding for {}\n", snapshot.label));
    out.push_str(&format!(
        "Pool: ${:.0} | policy: {} | weights: ld {} / wealth {} / pop {} / lum {}\n",
        snapshot.total_pool,
        snapshot.policy,
        snapshot.weights.land_degradation,
        snapshot.weights.wealth,
        snapshot.weights.population_trend,
        snapshot.weights.luminosity,
    ));

    out.push_str("\nRanked regions\n");
    let limit = top.unwrap_or(snapshot.regions.len());
    for view in snapshot.regions.iter().take(limit) {
        out.push_str(&format!(
            "{:>3}. {} | score {:.2} | suggested funding ${}\n",
            view.rank, view.name, view.score, view.funding_display
        ));
    }

    if limit < snapshot.regions.len() {
        out.push_str(&format!(
            "... {} more region(s)\n",
            snapshot.regions.len() - limit
        ));
    }

    out.push_str(&format!(
        "\nDisplayed total: ${} (pool ${:.0})\n",
        snapshot.rounded_total, snapshot.total_pool
    ));
    out
}
