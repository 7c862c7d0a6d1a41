use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use voicedesk::audio::SineHost;
use voicedesk::{
    load_seed_words, Config, FileCipher, InMemorySessionStore, InProcessJobQueue, JobQueue,
    RecorderConfig, RecordingController, SessionStore, StreamProfile, TranscriptionCoordinator,
    TranscriptionStatus, TranscriptionWorker, WavMetadata, WordDeck, XorFileCipher,
};

/// Demo seed set used when no seed file is given.
const DEMO_SEED_WORDS: &str = r#"{
  "words": [
    { "english": "meeting", "french": "réunion", "theme": "work" },
    { "english": "deadline", "french": "échéance", "theme": "work" },
    { "english": "budget", "french": "budget", "theme": "work" },
    { "english": "invoice", "french": "facture", "theme": "work" },
    { "english": "apple", "french": "pomme", "theme": "food" },
    { "english": "bread", "french": "pain", "theme": "food" }
  ]
}"#;

#[derive(Parser)]
#[command(name = "voicedesk", about = "Offline voice recorder and vocabulary trainer core")]
struct Cli {
    /// Config file (without extension), loaded via the config crate.
    #[arg(long, default_value = "config/voicedesk")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print format metadata of a WAV file.
    Inspect { path: PathBuf },
    /// Record from the synthesized demo input, then transcribe.
    Record {
        #[arg(long, default_value_t = 2)]
        seconds: u64,
        #[arg(long)]
        title: Option<String>,
    },
    /// Generate quiz questions from a seed word set.
    Quiz {
        #[arg(long)]
        seed_file: Option<PathBuf>,
        #[arg(long)]
        theme: Vec<String>,
        #[arg(long, default_value_t = 3)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("No config at {} ({}), using defaults", cli.config, e);
            Config::default()
        }
    };
    info!("{} starting", cfg.service.name);

    match cli.command {
        Command::Inspect { path } => {
            let metadata = WavMetadata::read(&path)?;
            println!(
                "{}: {} Hz, {} ch, {} bits, {:.1}s",
                path.display(),
                metadata.sample_rate,
                metadata.channels,
                metadata.bits_per_sample,
                metadata.duration_millis as f64 / 1000.0
            );
        }
        Command::Record { seconds, title } => {
            record_demo(&cfg, seconds, title).await?;
        }
        Command::Quiz {
            seed_file,
            theme,
            count,
        } => {
            quiz_demo(&cfg, seed_file, theme, count)?;
        }
    }

    Ok(())
}

async fn record_demo(cfg: &Config, seconds: u64, title: Option<String>) -> Result<()> {
    let store = Arc::new(InMemorySessionStore::new());
    let cipher: Arc<dyn FileCipher> = Arc::new(XorFileCipher::default());
    let cache_dir = PathBuf::from(&cfg.audio.cache_dir);

    let worker = Arc::new(TranscriptionWorker::new(
        store.clone() as Arc<dyn SessionStore>,
        cipher.clone(),
        cache_dir.clone(),
    ));
    let queue: Arc<dyn JobQueue> = Arc::new(InProcessJobQueue::new(worker));
    let coordinator = TranscriptionCoordinator::new(queue);

    let (error_tx, mut error_rx) = mpsc::unbounded_channel();
    let mut recorder_config = RecorderConfig::new(&cfg.audio.recordings_dir, cache_dir);
    recorder_config.profile = StreamProfile {
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
        bits_per_sample: 16,
    };
    let controller = RecordingController::new(
        recorder_config,
        Arc::new(SineHost),
        store.clone() as Arc<dyn SessionStore>,
        cipher,
        coordinator,
        error_tx,
    )?;

    controller.start_recording(title).await?;
    tokio::time::sleep(Duration::from_secs(seconds)).await;
    controller.stop_recording().await?;

    while let Ok(err) = error_rx.try_recv() {
        warn!("Recording error: {}", err);
    }

    // The first (and only) session in this demo store.
    let session_id = 1;
    for _ in 0..50 {
        if let Some(with_segments) = store.get_session_with_segments(session_id).await? {
            match with_segments.session.transcription_status {
                TranscriptionStatus::Completed | TranscriptionStatus::Failed => {
                    println!(
                        "Session {}: {:?}, {} ms, {} segment(s)",
                        session_id,
                        with_segments.session.transcription_status,
                        with_segments.session.duration_millis,
                        with_segments.segments.len()
                    );
                    for segment in &with_segments.segments {
                        println!(
                            "  [{} - {} ms] {}",
                            segment.start_millis, segment.end_millis, segment.text
                        );
                    }
                    if let Some(summary) = &with_segments.session.summary_json {
                        println!("Summary:\n{}", summary);
                    }
                    return Ok(());
                }
                _ => {}
            }
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    warn!("Transcription did not finish in time");
    Ok(())
}

fn quiz_demo(
    cfg: &Config,
    seed_file: Option<PathBuf>,
    themes: Vec<String>,
    count: usize,
) -> Result<()> {
    let seeds = match seed_file {
        Some(path) => voicedesk::vocab::load_seed_words_from_file(path)?,
        None => load_seed_words(DEMO_SEED_WORDS)?,
    };
    let mut deck = WordDeck::new();
    let now = chrono::Utc::now();
    deck.seed(seeds, now);

    let themes = if themes.is_empty() {
        cfg.quiz.themes.clone()
    } else {
        themes
    };
    let mut rng = rand::thread_rng();
    for _ in 0..count {
        let Some(question) =
            deck.generate_question(&themes, cfg.quiz.option_count, now, &mut rng)
        else {
            println!("No words available for a quiz question");
            break;
        };
        println!("{}", question.prompt);
        for (i, option) in question.options.iter().enumerate() {
            let marker = if option.is_correct { "*" } else { " " };
            println!("  {}{}. {}", marker, i + 1, option.text);
        }
        // Keep the demo moving: answer correctly so due words rotate.
        deck.record_answer(question.word.id, true, now);
    }
    Ok(())
}
