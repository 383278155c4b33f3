// One-shot crop recommendation from the command line
//
// Usage: cargo run --bin recommend -- N P K TEMPERATURE HUMIDITY PH RAINFALL
//        MODEL_PATH=/path/to/RandomForest.json cargo run --bin recommend -- 90 42 43 20.9 82 6.5 202.9

use anyhow::Context;
use crop_advisor::{recommend, FeatureVector, RandomForest, ServerConfig, FORM_FIELDS};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.len() != FORM_FIELDS.len() {
        eprintln!("Usage: recommend {}", FORM_FIELDS.join(" "));
        anyhow::bail!("expected {} values, got {}", FORM_FIELDS.len(), args.len());
    }

    let features = FeatureVector::from_args(&args)?;

    let config = ServerConfig::from_env();
    let forest = RandomForest::load(&config.model_path)
        .with_context(|| format!("Failed to load model from {:?}", config.model_path))?;

    let recommendation = recommend(&forest, &features)?;

    println!("{}", serde_json::to_string_pretty(&recommendation)?);

    Ok(())
}
