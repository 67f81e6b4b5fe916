//! Scribe CLI - terminal driver for the writing coach engine.
//!
//! This binary is the stand-in presentation layer: it owns the session
//! context, invokes one engine operation per subcommand, and prints
//! whatever the engine returns.
//!
//! ```text
//! scribe spark <topic> [material ...]      divergent angles on a topic
//! scribe dig <material>                    five Socratic follow-ups
//! scribe refine <draft>                    praise/diagnose/encourage critique
//! scribe check <draft> <example> [...]     echo detection + exercises
//! scribe hint <1|2|3> <context-or-theme>   inspiration ladder
//! ```
//!
//! `spark`, `dig` and `refine` call the Claude collaborator and need an
//! API key (from `~/.scribe/config.toml` or `ANTHROPIC_API_KEY`); `check`
//! and `hint` run entirely locally.

use anyhow::{Context, Result, bail};
use scribe_engine::{CognitiveEngine, EchoDetector, ScribeConfig, echo, ladder};
use scribe_providers::{ApiConfig, ClaudeClient};
use scribe_types::{InspirationLevel, SessionContext};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn usage() -> ! {
    eprintln!(
        "usage:
  scribe spark <topic> [material ...]
  scribe dig <material>
  scribe refine <draft>
  scribe check <draft> <example> [example ...]
  scribe hint <1|2|3> <context-or-theme>"
    );
    std::process::exit(2);
}

fn load_config() -> ScribeConfig {
    match ScribeConfig::load() {
        Ok(Some(config)) => config,
        Ok(None) => ScribeConfig::default(),
        Err(e) => {
            tracing::warn!("Ignoring broken config: {e}");
            ScribeConfig::default()
        }
    }
}

fn build_engine(config: &ScribeConfig) -> Result<CognitiveEngine<ClaudeClient>> {
    let api_key = config
        .resolve_api_key()
        .context("no API key: set ANTHROPIC_API_KEY or [api_keys] in ~/.scribe/config.toml")?;

    let mut api = ApiConfig::new(api_key)?;
    if let Some(app) = &config.app {
        if let Some(model) = &app.model {
            api = api.with_model(model);
        }
        if let Some(max_tokens) = app.max_tokens {
            api = api.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = app.temperature {
            api = api.with_temperature(temperature);
        }
    }

    Ok(CognitiveEngine::new(ClaudeClient::new(api)))
}

async fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else { usage() };

    match command.as_str() {
        "spark" => {
            let Some(topic) = args.get(1) else { usage() };
            let mut ctx = SessionContext::new(topic);
            for material in &args[2..] {
                ctx.add_material(material);
            }

            let engine = build_engine(&load_config())?;
            println!("{}", engine.spark(&ctx).await);
        }
        "dig" => {
            let Some(material) = args.get(1) else { usage() };

            let engine = build_engine(&load_config())?;
            let questions = engine.dig_material(material).await;
            if questions.is_empty() {
                println!("（没有得到可用的追问，请稍后再试）");
            }
            for (i, q) in questions.iter().enumerate() {
                println!("{}. [{}] {}", i + 1, q.category.as_str(), q.question);
                if let Some(hint) = &q.hint {
                    println!("   提示：{hint}");
                }
            }
        }
        "refine" => {
            let Some(draft) = args.get(1) else { usage() };
            let mut ctx = SessionContext::new("");
            ctx.draft.clone_from(draft);

            let engine = build_engine(&load_config())?;
            println!("{}", engine.refine(&ctx).await);
        }
        "check" => {
            if args.len() < 3 {
                usage();
            }
            let draft = &args[1];
            let examples: Vec<String> = args[2..].to_vec();

            let result = EchoDetector::new().check(draft, &examples);
            println!("相似度：{:.2}", result.score);
            if result.is_echo {
                let matched = result.matched_example.as_deref().unwrap_or_default();
                println!("检测到复述！原例句：{matched}");

                let exercise = echo::skeleton(matched);
                println!("\n仿写练习：{}", exercise.skeleton);
                println!("{}", exercise.hint);

                let mut rng = rand::rng();
                let fallback = echo::fill_in_blank(matched, &mut rng);
                if !fallback.options.is_empty() {
                    println!("\n备用填空：{}", fallback.sentence);
                    for (i, options) in fallback.options.iter().enumerate() {
                        println!("  第{}空：{}", i + 1, options.join(" / "));
                    }
                }
            } else {
                println!("未检测到复述，可以继续。");
            }
        }
        "hint" => {
            let (Some(level), Some(text)) = (args.get(1), args.get(2)) else {
                usage()
            };
            let level = match level.as_str() {
                "1" => InspirationLevel::One,
                "2" => InspirationLevel::Two,
                "3" => InspirationLevel::Three,
                _ => bail!("hint level must be 1, 2 or 3"),
            };

            let mut rng = rand::rng();
            match level {
                InspirationLevel::One => println!("{}", ladder::guidance(text, &mut rng)),
                InspirationLevel::Two => {
                    let example = ladder::examples(text, &mut rng);
                    println!("【{}】", example.kind.display_name());
                    println!("初阶：{}", example.basic);
                    println!("高阶：{}", example.advanced);
                }
                InspirationLevel::Three => println!("{}", ladder::analysis_by_name(text)),
            }
        }
        _ => usage(),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    run().await
}
