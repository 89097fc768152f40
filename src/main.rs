use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use cinemate::config::Config;
use cinemate::services::{
    assist::AssistHandler,
    cards::CardFormatter,
    engine::DialogueEngine,
    generation::OllamaClient,
    providers::{MetadataProvider, TmdbProvider},
};

const EXIT_WORDS: [&str; 3] = ["exit", "quit", "bye"];

fn print_header() {
    println!("{}", "Cinemate · Your Movie Buddy 🎬🍿✨".magenta());
    println!("Type 'exit' to quit. Ask for weekend picks, hidden gems, or say 'similar to Inception'.");
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the chat transcript
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cinemate=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let provider: Arc<dyn MetadataProvider> = Arc::new(TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));

    let mut engine = DialogueEngine::new(
        provider.clone(),
        CardFormatter::new(config.tmdb_image_url.clone()),
        config.recommendations_count,
    );

    let assist = config.cinemate_assist.then(|| {
        AssistHandler::new(
            provider.clone(),
            OllamaClient::new(config.ollama_url.clone(), config.ollama_model.clone()),
            CardFormatter::new(config.tmdb_image_url.clone()),
            config.recommendations_count,
        )
    });

    print_header();
    println!("{}", engine.opening().cyan());

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline(&"You: ".yellow().to_string()) {
            Ok(line) => {
                let user = line.trim();
                if user.is_empty() {
                    continue;
                }
                if EXIT_WORDS.contains(&user.to_lowercase().as_str()) {
                    break;
                }
                let _ = editor.add_history_entry(user);

                let result = match &assist {
                    Some(handler) => handler.reply(user).await,
                    None => engine.reply(user).await,
                };

                match result {
                    Ok(reply) => println!("{} {}", "Cinemate:".green(), reply),
                    Err(e) if e.is_transport() => {
                        tracing::error!(error = %e, "Metadata provider unreachable");
                        println!(
                            "{} {}",
                            "Cinemate:".green(),
                            "The movie catalog isn't answering right now. That's on the provider, not your taste — try again in a bit."
                                .red()
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Turn failed");
                        println!("{} {}", "Cinemate:".green(), "Something went sideways on my end. Mind trying that again?");
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!("{}", "Catch you later—happy watching! ✨".magenta());
    Ok(())
}
