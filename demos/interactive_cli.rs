use std::fs::File;
use std::io;
use std::io::Write;
use std::process;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use failure::format_err;
use churn_predictor_lib::{ArtifactLayout, ChatSession, ChurnPredictor, Result, SliderInput};

fn main() {
    env_logger::Builder::from_default_env()
        .default_format_timestamp_nanos(true)
        .init();

    let matches = App::new("churn-predictor")
        .about("Churn risk predictor, from slider values or a customer description")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("MODEL_PATH")
                .required(true)
                .takes_value(true)
                .index(1)
                .help("path to the model directory, or to a zip bundle of it"),
        )
        .arg(
            Arg::with_name("model_file")
                .long("model-file")
                .takes_value(true)
                .help("name of the classifier file in the model directory"),
        )
        .arg(
            Arg::with_name("feature_names_file")
                .long("feature-names-file")
                .takes_value(true)
                .help("name of the production feature names file"),
        )
        .arg(
            Arg::with_name("legacy_feature_names_file")
                .long("legacy-feature-names-file")
                .takes_value(true)
                .help("name of the legacy feature names file"),
        )
        .subcommand(
            SubCommand::with_name("slider")
                .about("Predicts the churn risk from the four slider values")
                .arg(slider_arg("tenure", "tenure in months, from 1 to 60", "12"))
                .arg(slider_arg("seats", "number of seats, from 1 to 50", "5"))
                .arg(slider_arg("mrr", "monthly recurring revenue, from 10 to 1000", "100"))
                .arg(slider_arg("monthly", "1 for monthly billing, 0 otherwise", "1")),
        )
        .subcommand(
            SubCommand::with_name("chat")
                .about("Describe customers in plain text, e.g. 'new customer 2 seats low revenue'"),
        )
        .get_matches();

    if let Err(error) = run(&matches) {
        eprintln!("Error: {}", error);
        for cause in error.iter_causes() {
            eprintln!("Caused by: {}", cause);
        }
        process::exit(1);
    }
}

fn slider_arg<'a, 'b>(name: &'a str, help: &'b str, default_value: &'a str) -> Arg<'a, 'b> {
    Arg::with_name(name)
        .long(name)
        .takes_value(true)
        .default_value(default_value)
        .help(help)
}

fn run(matches: &ArgMatches) -> Result<()> {
    println!("\nLoading the churn predictor...");
    let predictor = load_predictor(matches)?;

    match matches.subcommand() {
        ("slider", Some(slider_matches)) => {
            let input = SliderInput::new(
                parse_value(slider_matches, "tenure")?,
                parse_value(slider_matches, "seats")?,
                parse_value(slider_matches, "mrr")?,
                parse_value(slider_matches, "monthly")?,
            )?;
            let assessment = predictor.predict_sliders(&input)?;
            println!("{}", assessment);
        }
        ("chat", Some(_)) => chat(&predictor)?,
        _ => unreachable!(),
    }
    Ok(())
}

fn load_predictor(matches: &ArgMatches) -> Result<ChurnPredictor> {
    let model_path = matches.value_of("MODEL_PATH").unwrap();
    if model_path.ends_with(".zip") {
        return ChurnPredictor::from_zip(File::open(model_path)?);
    }
    let mut layout = ArtifactLayout::default();
    if let Some(model_file) = matches.value_of("model_file") {
        layout.model_file = model_file.to_string();
    }
    if let Some(names_file) = matches.value_of("feature_names_file") {
        layout.feature_names_file = names_file.to_string();
    }
    if let Some(names_file) = matches.value_of("legacy_feature_names_file") {
        layout.legacy_feature_names_file = names_file.to_string();
    }
    ChurnPredictor::from_path_with_layout(model_path, &layout)
}

fn parse_value(matches: &ArgMatches, name: &str) -> Result<u32> {
    let value = matches.value_of(name).unwrap_or_default();
    value
        .parse::<u32>()
        .map_err(|_| format_err!("'{}' is not a valid value for --{}", value, name))
}

fn chat(predictor: &ChurnPredictor) -> Result<()> {
    let mut session = ChatSession::new(predictor);
    println!("Describe a customer scenario, an empty line quits");
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut query = String::new();
        if io::stdin().read_line(&mut query)? == 0 || query.trim().is_empty() {
            break;
        }
        match session.submit(query.trim()) {
            Ok(prediction) => println!("{}", prediction),
            Err(error) => eprintln!("Error: {}", error),
        }
    }
    println!("{}", serde_json::to_string_pretty(session.transcript())?);
    Ok(())
}
