use std::path::Path;

use serde::Serialize;

use crate::{
    error::Result,
    error, info,
    spotify::options::MarketOptions,
    utils,
};

use super::app_client;

fn market_options(market: Option<String>) -> MarketOptions {
    MarketOptions { market }
}

/// Pretty-prints a fetched resource as JSON.
fn print_json<R: Serialize>(result: Result<R>) {
    let value = match result {
        Ok(value) => value,
        Err(e) => error!("Request failed. Err: {}", e),
    };
    match serde_json::to_string_pretty(&value) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Cannot render response. Err: {}", e),
    }
}

pub async fn album(credentials_path: &Path, id: &str, market: Option<String>) {
    let client = app_client(credentials_path).await;
    print_json(client.get_album(id, Some(&market_options(market))).await);
}

pub async fn artist(credentials_path: &Path, id: &str) {
    let client = app_client(credentials_path).await;
    print_json(client.get_artist(id).await);
}

pub async fn show(credentials_path: &Path, id: &str, market: Option<String>) {
    let client = app_client(credentials_path).await;
    print_json(client.get_show(id, Some(&market_options(market))).await);
}

pub async fn episode(credentials_path: &Path, id: &str, market: Option<String>) {
    let client = app_client(credentials_path).await;
    print_json(client.get_episode(id, Some(&market_options(market))).await);
}

pub async fn track(credentials_path: &Path, id: &str, market: Option<String>) {
    let client = app_client(credentials_path).await;
    print_json(client.get_track(id, Some(&market_options(market))).await);
}

pub async fn markets(credentials_path: &Path) {
    let client = app_client(credentials_path).await;
    match client.get_available_markets().await {
        Ok(markets) => {
            info!("{} markets", markets.markets.len());
            println!("{}", utils::join_comma(&markets.markets));
        }
        Err(e) => error!("Request failed. Err: {}", e),
    }
}

pub async fn genres(credentials_path: &Path) {
    let client = app_client(credentials_path).await;
    match client.get_available_genre_seeds().await {
        Ok(seeds) => {
            info!("{} genre seeds", seeds.genres.len());
            for genre in seeds.genres {
                println!("{genre}");
            }
        }
        Err(e) => error!("Request failed. Err: {}", e),
    }
}
