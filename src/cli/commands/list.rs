//! List requests command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_requests(config: &Config, recent: bool) -> anyhow::Result<()> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let requests = if recent {
        store.list_requests_by_recency().await?
    } else {
        store.list_requests_by_votes().await?
    };

    if requests.is_empty() {
        println!("No open requests.");
        return Ok(());
    }

    println!(
        "Open Requests ({}/{})",
        requests.len(),
        config.board.max_requests
    );
    println!("{:-<70}", "");

    for request in requests {
        println!(
            "#{:<4} {} [{} votes]",
            request.id.value(),
            request.anime_name,
            request.votes
        );
        println!(
            "      Status: {} | Episodes: {}/{}",
            request.status, request.uploaded_episodes, request.total_episodes
        );
    }

    Ok(())
}
