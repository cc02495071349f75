//! soundlaw CLI - Run sound-change evolution from JSON configuration.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use soundlaw::engine::{Engine, Optimisation, Outcome, metrics};
use soundlaw::schema::{
    DiacriticRecord, Diacritics, FeatureStrings, RewritePair, RuleDef, SegmentRecord, Segments,
    inventory,
};

/// A complete run description: tables, rules, words, and options.
#[derive(Debug, Serialize, Deserialize)]
struct RunConfig {
    segments: Vec<SegmentRecord>,
    diacritics: Vec<DiacriticRecord>,
    feature_strings: Vec<(String, String)>,
    rules: Vec<RuleDef>,
    words: Vec<String>,
    #[serde(default = "default_generations")]
    generations: usize,
    #[serde(default)]
    reverse: bool,
    #[serde(default = "default_metric")]
    metric: String,
    #[serde(default)]
    optimisation: Optimisation,
    #[serde(default)]
    rewrites: Vec<RewritePair>,
}

fn default_generations() -> usize {
    5
}

fn default_metric() -> String {
    "phonetic-product".to_string()
}

/// The metric registry: string keys to strategy objects. Lives in the CLI,
/// not the core.
fn metric_by_name(name: &str) -> Option<Box<dyn metrics::Metric>> {
    match name {
        "phonetic-product" => Some(Box::new(metrics::PhoneticProduct)),
        "weighted-phonetic-product" => Some(Box::new(metrics::WeightedPhoneticProduct)),
        "syllable-count" => Some(Box::new(metrics::SyllableCount)),
        "consonant-clusters" => Some(Box::new(metrics::ConsonantClusterCount)),
        "word-complexity" => Some(Box::new(metrics::WordComplexity)),
        "random" => Some(Box::new(metrics::RandomValue)),
        _ => None,
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json>", args[0]);
        eprintln!();
        eprintln!("Run sound-change evolution from a JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to a run configuration file");
        eprintln!();
        eprintln!("An example configuration is printed with the --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: RunConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    let segments = Segments::from_records(&config.segments).unwrap_or_else(|e| {
        eprintln!("Error in segment table: {}", e);
        std::process::exit(1);
    });
    let diacritics = Diacritics::from_records(&config.diacritics).unwrap_or_else(|e| {
        eprintln!("Error in diacritic table: {}", e);
        std::process::exit(1);
    });
    let feature_strings = FeatureStrings::from_records(&config.feature_strings)
        .unwrap_or_else(|e| {
            eprintln!("Error in feature-string catalog: {}", e);
            std::process::exit(1);
        });

    let engine =
        Engine::new(segments, diacritics, feature_strings, config.rules).unwrap_or_else(|e| {
            eprintln!("Error building engine: {}", e);
            std::process::exit(1);
        });

    let metric = metric_by_name(&config.metric).unwrap_or_else(|| {
        eprintln!("Unknown metric {:?}", config.metric);
        std::process::exit(1);
    });

    let run = engine
        .run(
            &config.words,
            config.generations,
            &config.rewrites,
            config.reverse,
            metric.as_ref(),
            config.optimisation,
        )
        .unwrap_or_else(|e| {
            eprintln!("Engine error: {}", e);
            std::process::exit(1);
        });

    println!("soundlaw evolution");
    println!("==================");
    println!("Direction: {}", if config.reverse { "reverse" } else { "forward" });
    println!("Metric: {}", config.metric);
    println!();

    for (before, after) in config.words.iter().zip(run.words.iter()) {
        println!("  {} -> {}", before, after);
    }

    println!();
    if run.applied.is_empty() {
        println!("No rules applied.");
    } else {
        println!("Applied rules:");
        for rule in &run.applied {
            println!("  {}: {}", rule.name, rule.description);
        }
    }

    match run.outcome {
        Outcome::Completed => println!("Completed {} generations.", config.generations),
        Outcome::StoppedEarly { generation } => {
            println!("Stopped early at generation {}: no applicable rules.", generation);
        }
    }
}

fn print_example_config() {
    let config = RunConfig {
        segments: inventory::segment_records().unwrap_or_default(),
        diacritics: inventory::diacritic_records(),
        feature_strings: inventory::feature_string_records().unwrap_or_default(),
        rules: inventory::rules(),
        words: inventory::sample_words(),
        generations: 5,
        reverse: false,
        metric: default_metric(),
        optimisation: Optimisation::Minimise,
        rewrites: vec![RewritePair {
            plain: "aa".to_string(),
            ipa: "aː".to_string(),
        }],
    };

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing example config: {}", e);
            std::process::exit(1);
        }
    }
}
