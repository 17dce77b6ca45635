use clap::Parser;
use serde::Serialize;

mod app;
mod cards;
mod catalog;
mod cli;
mod config;
mod eid;
mod ranking;
mod search;
mod storage;
mod tags;
#[cfg(test)]
mod tests;
mod web;

use app::AppFactory;
use cards::CardCreate;
use cli::{CardAction, Command};
use search::SearchRequest;
use tags::parse_tags;

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    let filter = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let paths = AppFactory::get_paths()?;
    let app = AppFactory::create_app_service(&paths)?;

    match args.command {
        Command::Search {
            tags,
            limit,
            min_price,
            max_price,
            category,
            exact_only,
            scores,
        } => {
            let request = SearchRequest {
                tags: parse_tags(&tags),
                limit,
                min_price,
                max_price,
                category,
                exact_only,
            };
            let mut response = app.search(&request)?;
            if !scores {
                response.scores.clear();
            }
            print_json(&response)?;
        }

        Command::List { limit } => print_json(&app.list_products(limit)?)?,

        Command::Categories => print_json(&app.categories()?)?,

        Command::Stats => print_json(&app.stats()?)?,

        Command::Seed { force } => {
            let count = app.reseed(force)?;
            println!("catalog seeded with {count} products");
        }

        Command::Card { action } => match action {
            CardAction::Add {
                name,
                description,
                name_en,
                visual,
                tags,
                confidence,
                category,
            } => {
                let card = app.create_card(CardCreate {
                    name,
                    description,
                    name_en,
                    visual_representation: visual,
                    tags: parse_tags(&tags),
                    confidence_score: confidence,
                    category,
                })?;
                print_json(&card)?;
            }
            CardAction::List { limit } => print_json(&app.list_cards(limit)?)?,
            CardAction::Find { query, limit } => print_json(&app.find_cards(&query, limit)?)?,
        },

        Command::Daemon { listen } => {
            let listen = listen.unwrap_or_else(|| app.config().daemon.listen.clone());
            web::start_daemon(app, listen)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
