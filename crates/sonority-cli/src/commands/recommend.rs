use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use sonority_recommend::{
    parse_request, respond, RecommendRequest, Recommender, Response, ResponseBody,
    SpotifyClient,
};

/// Recommend songs for one (song, artist) pair.
pub async fn run_recommend(
    recommender: Option<&Recommender<SpotifyClient>>,
    song: String,
    artist: String,
    json: bool,
) -> Result<()> {
    let request = RecommendRequest::new(song.as_str(), artist.as_str());
    let response = respond(recommender, &request).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&response.body)?);
    } else if let ResponseBody::Songs { recommended_songs } = &response.body {
        println!("\n🎵 Recommended songs for '{}' by '{}':\n", song, artist);
        for (i, rec) in recommended_songs.iter().enumerate() {
            println!("  {:>2}. {} by {}", i + 1, rec.title, rec.artist);
        }
        if recommended_songs.is_empty() {
            println!("  (no similar songs in the catalog)");
        }
    }

    finish(&response)
}

/// Serve a JSON request read from a file or stdin.
pub async fn run_request(
    recommender: Option<&Recommender<SpotifyClient>>,
    input: Option<PathBuf>,
) -> Result<()> {
    let raw = match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read request from {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read request from stdin")?;
            buf
        }
    };

    let response = match parse_request(&raw) {
        Ok(request) => respond(recommender, &request).await,
        Err(response) => response,
    };
    println!("{}", serde_json::to_string_pretty(&response.body)?);

    finish(&response)
}

fn finish(response: &Response) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    match &response.body {
        ResponseBody::Error { error } => {
            anyhow::bail!("{} (status {})", error, response.status)
        }
        ResponseBody::Songs { .. } => {
            anyhow::bail!("request failed with status {}", response.status)
        }
    }
}
