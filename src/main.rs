//! ragbuddy - CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use ragbuddy::cli::{Args, Commands, Verbosity};
use ragbuddy::config::{Config, StoreBackend};
use ragbuddy::rag::{Answer, ItemOutcome, RagPipeline};
use ragbuddy::server;

fn init_tracing(verbosity: Verbosity) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbosity());

    let config = Config::load(args.config.clone()).context("Failed to load configuration")?;

    match args.command {
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
        Commands::Serve { bind } => {
            let bind_addr = bind.unwrap_or_else(|| config.server.bind_addr.clone());
            if config.store.backend == StoreBackend::Memory {
                tracing::warn!("memory store selected: documents are lost when the server stops");
            }
            let pipeline = Arc::new(RagPipeline::from_config(&config).await?);
            server::serve(&bind_addr, pipeline).await?;
        }
        Commands::Ingest { texts } => {
            let pipeline = RagPipeline::from_config(&config).await?;
            ingest(&pipeline, &texts).await?;
        }
        Commands::Ask {
            question,
            show_documents,
        } => {
            let pipeline = RagPipeline::from_config(&config).await?;
            let answer = ask(&pipeline, &question).await?;
            print_answer(&answer, show_documents);
        }
        Commands::Get { id } => {
            let pipeline = RagPipeline::from_config(&config).await?;
            let document = pipeline.get(id, &pipeline.scope()).await?;
            println!("{} {}", "Document".bold(), document.id.to_string().cyan());
            println!("{}", document.content);
            println!(
                "{}",
                format!("({} dimensions)", document.embedding.len()).dimmed()
            );
        }
        Commands::Delete { id } => {
            let pipeline = RagPipeline::from_config(&config).await?;
            pipeline.delete(id, &pipeline.scope()).await?;
            println!("{} document {}", "Deleted".green(), id);
        }
        Commands::Count => {
            let pipeline = RagPipeline::from_config(&config).await?;
            let total = pipeline.count(&pipeline.scope()).await?;
            println!("{} documents", total.to_string().cyan());
        }
    }

    Ok(())
}

async fn ingest(pipeline: &RagPipeline, texts: &[String]) -> Result<()> {
    let scope = pipeline.scope();

    if let [text] = texts {
        let id = pipeline.ingest(text, &scope).await?;
        println!("{} document {}", "Inserted".green(), id.to_string().cyan());
        return Ok(());
    }

    let report = pipeline.ingest_batch(texts, &scope).await;
    for (index, item) in report.items.iter().enumerate() {
        match item {
            ItemOutcome::Inserted { id } => {
                println!("  [{}] {} {}", index, "inserted".green(), id.to_string().cyan())
            }
            ItemOutcome::Failed { error } => {
                println!("  [{}] {} {}", index, "failed".red().bold(), error)
            }
            ItemOutcome::Skipped => println!("  [{}] {}", index, "skipped".yellow()),
        }
    }

    match report.failure() {
        None => {
            println!("{} {} documents", "Inserted".green(), report.items.len());
            Ok(())
        }
        Some((index, _)) => anyhow::bail!(
            "batch stopped at item {}; {} earlier documents remain stored",
            index,
            report.inserted_ids().len()
        ),
    }
}

/// Ask with Ctrl-C wired to the request's cancel handle
async fn ask(pipeline: &RagPipeline, question: &str) -> Result<Answer> {
    let (scope, handle) = pipeline.cancellable_scope();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    let result = pipeline.ask(question, &scope).await;
    interrupt.abort();
    Ok(result?)
}

fn print_answer(answer: &Answer, show_documents: bool) {
    println!("{}", answer.answer);

    if show_documents {
        println!();
        println!(
            "{}",
            format!(
                "{} retrieved, {} kept",
                answer.documents_retrieved, answer.documents_ranked
            )
            .dimmed()
        );
        for doc in &answer.ranked {
            println!(
                "  {} {}",
                format!("[{:.2}]", doc.score).cyan(),
                doc.content
            );
        }
    }
}
