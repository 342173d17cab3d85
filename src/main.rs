use genstudio::{
    logger::{self, LoggerConfig},
    GenerationController, ReferenceFile, StudioConfig, SubmitOutcome,
};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::from_env())?;
    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = StudioConfig::from_env()?;
    logger::log_config_info(&config);

    let mut args = env::args().skip(1);
    let prompt = args
        .next()
        .unwrap_or_else(|| "a red bicycle leaning on a brick wall".to_string());
    let references: Vec<PathBuf> = args.map(PathBuf::from).collect();
    let out_dir = PathBuf::from(env::var("GENSTUDIO_OUT_DIR").unwrap_or_else(|_| ".".into()));

    let controller = GenerationController::with_gemini(&config);
    controller.set_prompt(prompt).await;

    let mut files = Vec::with_capacity(references.len());
    for path in &references {
        files.push(ReferenceFile::from_path(path).await?);
    }
    if !files.is_empty() {
        let kept = controller.add_attachments(files).await;
        log::info!("📎 Attached {} reference image(s)", kept);
    }

    match controller.submit().await {
        SubmitOutcome::Completed { added } => {
            log::info!("🖼️  Generated {} image(s)", added);
            for image in controller.history().await {
                let path = controller.download(&image.id, &out_dir).await?;
                println!("{}", path.display());
            }
        }
        SubmitOutcome::Failed => {
            let notice = controller.notice().await.unwrap_or_default();
            log::error!("{}", notice);
            std::process::exit(1);
        }
        SubmitOutcome::Skipped | SubmitOutcome::Busy => {
            log::warn!("Nothing was submitted");
        }
    }

    Ok(())
}
