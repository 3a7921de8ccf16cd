use crate::config::AppConfig;
use crate::error::AppError;
use crate::model::ImpactModel;
use crate::policy::domain::{FeatureVector, SourceAttribution};
use crate::policy::ranker::rank_policies;
use crate::policy::weights::compute_weights;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct WeightsArgs {
    /// Override the configured impact model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the configured impact model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Override the representative current AQI
    #[arg(long)]
    pub(crate) current_aqi: Option<f64>,
}

fn load_model(override_path: Option<PathBuf>) -> Result<ImpactModel, AppError> {
    let path = match override_path {
        Some(path) => path,
        None => AppConfig::load()?.model.artifact_path,
    };
    Ok(ImpactModel::load(path)?)
}

pub(crate) fn run_weights_report(args: WeightsArgs) -> Result<(), AppError> {
    let model = load_model(args.model)?;
    let weights = compute_weights(model.coefficients())?;

    println!("Sensitivity weights for impact model '{}'", model.name());
    println!("Intercept: {:+.3}", model.intercept());
    println!();
    for (feature, weight) in weights.iter() {
        println!(
            "- {:<11} weight {:.4} (coefficient {:+.4})",
            feature.key(),
            weight,
            model.coefficients()[feature.index()]
        );
    }
    println!();
    println!("Weights are absolute coefficients, L1-normalized to sum to 1.");

    Ok(())
}

// Representative winter readings for the configured city, used when no live
// feed is in the loop.
fn demo_pollutants() -> FeatureVector {
    FeatureVector::new([120.0, 90.0, 40.0, 8.0, 0.9, 15.0, 31.0, 42.0, 1.5])
}

fn demo_attribution() -> SourceAttribution {
    SourceAttribution::new([40.0, 10.0, 5.0, 20.0, 5.0])
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let model = load_model(args.model)?;
    let weights = compute_weights(model.coefficients())?;
    let current_aqi = args.current_aqi.unwrap_or(180.0);

    let pollutants = demo_pollutants();
    let attribution = demo_attribution();
    let assessment = rank_policies(&pollutants, current_aqi, &attribution, &weights, &model);

    println!("Policy impact demo (offline, representative readings)");
    println!("Impact model: {}", model.name());
    println!("Current AQI: {current_aqi}");

    println!("\nAttributed shares");
    for (source, share) in attribution.iter() {
        println!("- {:<15} {:>5.1}%", source.label(), share);
    }

    println!("\nRanked policy options (best improvement first)");
    for (source, outcome) in assessment.results.ranked() {
        println!(
            "- {:<15} change {:+7.2} -> estimated AQI {:.1}",
            source.label(),
            outcome.aqi_change,
            outcome.estimated_aqi
        );
    }

    let recommendation = assessment.recommendation;
    println!(
        "\nTop recommendation: curb {} emissions ({:+.2} AQI, estimated {:.1})",
        recommendation.policy.label(),
        recommendation.expected_change,
        recommendation.estimated_aqi
    );

    Ok(())
}
