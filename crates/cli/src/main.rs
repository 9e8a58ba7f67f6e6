use anyhow::Result;
use clap::{Parser, Subcommand};
use nearby_observability::{init_tracing, AppMetrics};
use nearby_pipeline::{RecommendPipeline, ServiceConfig};
use serde_json::{json, Value};

#[derive(Debug, Parser)]
#[command(name = "nearby")]
#[command(about = "Nearby Concierge CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search points of interest around a coordinate and print the
    /// response envelope.
    Recommend {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lng: f64,
        #[arg(long, default_value = "yoga")]
        category: String,
        #[arg(long)]
        radius: Option<u32>,
        #[arg(long, default_value = "zh")]
        locale: String,
        /// Training-sequence code to infer the user intent from.
        #[arg(long)]
        sequence: Option<String>,
        /// Explicit intent phrase; overrides --sequence.
        #[arg(long)]
        intent: Option<String>,
        /// Generate reasons with the language model instead of rules.
        #[arg(long, default_value_t = false)]
        llm: bool,
        #[arg(long, default_value_t = false)]
        no_reasons: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("nearby_cli");
    let cli = Cli::parse();

    let pipeline = RecommendPipeline::new(ServiceConfig::from_env(), AppMetrics::shared())?;

    match cli.command {
        Command::Recommend {
            lat,
            lng,
            category,
            radius,
            locale,
            sequence,
            intent,
            llm,
            no_reasons,
        } => {
            let mut params = json!({
                "lat": lat,
                "lng": lng,
                "bizType": category,
                "locale": locale,
                "enableReasons": !no_reasons,
                "useLLM": llm,
            });
            if let Some(radius) = radius {
                params["radius"] = json!(radius);
            }
            if let Some(sequence) = sequence {
                params["sequenceType"] = json!(sequence);
            }
            if let Some(intent) = intent {
                params["userIntent"] = json!(intent);
            }

            let envelope = match pipeline.recommend(&params).await {
                Ok(data) => json!({
                    "code": 200,
                    "message": "success",
                    "data": data,
                }),
                Err(err) => json!({
                    "code": err.envelope_code(),
                    "message": err.to_string(),
                    "data": Value::Null,
                }),
            };

            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
    }

    Ok(())
}
