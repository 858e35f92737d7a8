use crate::{
    config::{ConfigOverrides, PlannerConfig},
    error::{PlannerError, Result},
    schemas::Validator,
    types::{
        parse_days, BudgetBreakdown, BudgetTier, ItineraryRequest, PipelineOutcome, PipelineRun,
    },
    ItineraryPipeline, ModelClient,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs;
use tracing::{error, info};

fn command() -> Command {
    Command::new("trip-planner")
        .version("0.1.0")
        .about("Plan a trip with an LLM and recover a typed itinerary from whatever it returns")
        .arg(
            Arg::new("destination")
                .short('d')
                .long("destination")
                .value_name("PLACE")
                .help("Where the trip goes")
                .required(true),
        )
        .arg(
            Arg::new("origin")
                .short('o')
                .long("origin")
                .value_name("PLACE")
                .help("Where the trip starts"),
        )
        .arg(
            Arg::new("days")
                .short('n')
                .long("days")
                .value_name("COUNT")
                .help("Trip length in days, clamped to 1..=30")
                .default_value("3"),
        )
        .arg(
            Arg::new("budget")
                .short('b')
                .long("budget")
                .value_name("TIER")
                .help("Budget tier: budget, moderate, luxury or any label")
                .default_value("moderate"),
        )
        .arg(
            Arg::new("interests")
                .short('i')
                .long("interests")
                .value_name("LIST")
                .help("Comma-separated interests"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("Model name (or set MODEL env var)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("API key (or set OPENAI_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("API base URL (or set OPENAI_BASE_URL / OPENROUTER_BASE_URL env vars)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Request timeout in seconds")
                .default_value("120"),
        )
        .arg(
            Arg::new("raw-file")
                .short('r')
                .long("raw-file")
                .value_name("PATH")
                .help("Run the pipeline over saved model output instead of calling the model")
                .conflicts_with("mock"),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .help("Skip the model and print the offline itinerary")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("prose")
                .long("prose")
                .help("Ask the model for a prose plan instead of JSON")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["mock", "raw-file"]),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Validate model JSON against the full itinerary schema")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the outcome as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .help("Print the state trace and an outcome summary")
                .action(ArgAction::SetTrue),
        )
}

fn request_from(matches: &ArgMatches) -> Result<ItineraryRequest> {
    let destination = matches
        .get_one::<String>("destination")
        .map(String::as_str)
        .unwrap_or_default();
    let days = matches
        .get_one::<String>("days")
        .map(|raw| parse_days(raw))
        .unwrap_or_default();

    let mut request = ItineraryRequest::new(destination)?.with_days(i64::from(days));
    if let Some(origin) = matches.get_one::<String>("origin") {
        request = request.with_origin(origin);
    }
    if let Some(budget) = matches.get_one::<String>("budget") {
        request = request.with_budget(BudgetTier::parse(budget));
    }
    if let Some(interests) = matches.get_one::<String>("interests") {
        request = request.with_interests([interests]);
    }
    Ok(request)
}

fn overrides_from(matches: &ArgMatches) -> Result<ConfigOverrides> {
    let timeout_secs = matches
        .get_one::<String>("timeout")
        .map(|raw| {
            raw.parse::<u64>().map_err(|err| {
                PlannerError::Config(format!("invalid --timeout `{}`: {}", raw, err))
            })
        })
        .transpose()?;

    Ok(ConfigOverrides {
        api_key: matches.get_one::<String>("api-key").cloned(),
        base_url: matches.get_one::<String>("base-url").cloned(),
        model: matches.get_one::<String>("model").cloned(),
        timeout_secs,
        max_tokens: None,
    })
}

fn print_outcome(run: &PipelineRun, request: &ItineraryRequest) {
    match &run.outcome {
        PipelineOutcome::Structured { itinerary } => {
            println!(
                "{}",
                itinerary.render_text(&request.origin, &request.destination)
            );
        }
        PipelineOutcome::Partial { view, .. } | PipelineOutcome::Synthetic { view, .. } => {
            if view.has_no_days() {
                println!("{}", run.outcome.source_text().unwrap_or_default());
                return;
            }
            if let Some(summary) = &view.summary {
                println!("{}\n", summary);
            }
            for day in &view.days {
                println!("## {}\n{}\n", day.title, day.content);
            }
            if let Some(transport) = &view.transport {
                println!("{}\n", transport);
            }
            if !view.restaurants.is_empty() {
                println!("Dining:");
                for line in &view.restaurants {
                    println!("- {}", line);
                }
                println!();
            }
            println!("{}", budget_estimate_text(request));
        }
    }
}

/// Rough budget split shown next to prose itineraries, which carry no costs of their own.
fn budget_estimate_text(request: &ItineraryRequest) -> String {
    let estimate = BudgetBreakdown::estimate(request.days, &request.budget);
    format!(
        "Estimated budget ({} days, {}): ${}\n\
- Accommodation: ${}\n\
- Food: ${}\n\
- Activities: ${}\n\
- Transport: ${}",
        request.days,
        request.budget,
        estimate.sum(),
        estimate.accommodation,
        estimate.food,
        estimate.activities,
        estimate.transport
    )
}

async fn execute(matches: &ArgMatches, request: &ItineraryRequest) -> Result<PipelineRun> {
    let mut pipeline = ItineraryPipeline::new();
    if matches.get_flag("strict") {
        pipeline = pipeline.with_validator(Validator::Strict);
    }

    if let Some(path) = matches.get_one::<String>("raw-file") {
        info!("Processing saved model output from {}", path);
        let raw = fs::read_to_string(path).map_err(|err| {
            PlannerError::InvalidRequest(format!("cannot read `{}`: {}", path, err))
        })?;
        return Ok(pipeline.process(&raw));
    }

    if matches.get_flag("mock") {
        info!("Generating offline itinerary for {}", request.destination);
        return Ok(pipeline.synthesize(request));
    }

    let config = PlannerConfig::from_overrides(overrides_from(matches)?)?;
    info!("Using model: {}", config.model);
    info!("Base URL: {}", config.base_url);
    let client = ModelClient::from_config(&config);

    if matches.get_flag("prose") {
        Ok(pipeline.plan_prose(&client, request).await)
    } else {
        Ok(pipeline.plan(&client, request).await)
    }
}

/// CLI entry point for the trip planner
pub async fn run() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = command().get_matches();
    let json = matches.get_flag("json");

    let outcome = match request_from(&matches) {
        Ok(request) => execute(&matches, &request)
            .await
            .map(|run| (request, run)),
        Err(err) => Err(err),
    };

    let (request, run) = match outcome {
        Ok(done) => done,
        Err(err) => {
            error!("Planning failed: {}", err);
            if json {
                println!("{}", serde_json::to_string_pretty(&err.to_error_payload())?);
            }
            return Err(err.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&run.outcome)?);
    } else {
        print_outcome(&run, &request);
    }

    if matches.get_flag("trace") {
        println!("\n{}", run.explain());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn request_is_built_from_flags() {
        let matches = command().get_matches_from([
            "trip-planner",
            "--destination",
            "Paris",
            "--origin",
            "London",
            "--days",
            "45",
            "--budget",
            "luxury",
            "--interests",
            "food, art",
        ]);
        let request = request_from(&matches).unwrap();
        assert_eq!(request.destination, "Paris");
        assert_eq!(request.origin, "London");
        assert_eq!(request.days, 30);
        assert_eq!(request.budget, BudgetTier::Luxury);
        assert_eq!(request.interests, vec!["food", "art"]);
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let matches =
            command().get_matches_from(["trip-planner", "-d", "Rome", "--timeout", "soon"]);
        let err = overrides_from(&matches).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert_eq!(err.to_error_payload()["error"]["recoverable"], false);
    }

    #[test]
    fn prose_conflicts_with_offline_modes() {
        let result =
            command().try_get_matches_from(["trip-planner", "-d", "Rome", "--prose", "--mock"]);
        assert!(result.is_err());
    }

    #[test]
    fn estimate_text_follows_the_tier() {
        let request = ItineraryRequest::new("Rome")
            .unwrap()
            .with_days(2)
            .with_budget(BudgetTier::Luxury);
        let text = budget_estimate_text(&request);
        assert!(text.starts_with("Estimated budget (2 days, luxury): $800"));
        assert!(text.contains("- Accommodation: $320"));
    }

    #[tokio::test]
    async fn missing_raw_file_is_an_invalid_request() {
        let matches = command().get_matches_from([
            "trip-planner",
            "-d",
            "Rome",
            "--raw-file",
            "/nonexistent/response.txt",
        ]);
        let request = request_from(&matches).unwrap();
        let err = execute(&matches, &request).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn strict_flag_changes_the_validator() {
        let dir = std::env::temp_dir().join(format!("trip-planner-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("loose.txt");
        fs::write(&path, r#"{"days": [{"day": 1, "activities": [{"title": "Walk", "duration": 2}]}]}"#)
            .unwrap();
        let path = path.to_string_lossy().to_string();

        let loose = command().get_matches_from(["trip-planner", "-d", "Rome", "-r", &path]);
        let request = request_from(&loose).unwrap();
        assert!(execute(&loose, &request).await.unwrap().outcome.is_structured());

        let strict =
            command().get_matches_from(["trip-planner", "-d", "Rome", "-r", &path, "--strict"]);
        let run = execute(&strict, &request).await.unwrap();
        assert!(!run.outcome.is_structured());
    }
}
