use anyhow::{Result, anyhow};
use movies_app::rest_api::contract::MovieResponse;
use reqwest::{StatusCode, Url, header};
use serde_json::json;
use tracing::info;

pub async fn create_movie(
    client: &reqwest::Client,
    base_url: &Url,
    title: &str,
    year_of_release: i32,
    genres: &[&str],
) -> Result<MovieResponse> {
    let payload = json!({"title": title, "yearOfRelease": year_of_release, "genres": genres});
    let api_url = base_url.join("api/movies")?;

    let response = client.post(api_url).json(&payload).send().await?;
    info!("Movie Response: {:#?}", response);
    if response.status() != StatusCode::CREATED {
        return Err(anyhow!("Movie not created: {}", response.status()));
    }
    let location = response
        .headers()
        .get(header::LOCATION)
        .ok_or_else(|| anyhow!("Missing location"))?
        .to_str()?
        .to_string();

    let new_movie: MovieResponse = response.json().await?;
    if !location.ends_with(&new_movie.id.to_string()) {
        return Err(anyhow!("Invalid location {location}"));
    }
    Ok(new_movie)
}
