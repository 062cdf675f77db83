//! Wikipedia GeoSearch client for nearby sights

use async_trait::async_trait;
use haversine::{Location as HaversineLocation, Units, distance};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{info, instrument};

use super::http::send_json;
use super::{PoiProvider, UpstreamError};
use crate::models::{Attribution, PointOfInterest};

pub struct WikipediaClient {
    client: ClientWithMiddleware,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct GeoSearchResponse {
    #[serde(default)]
    query: Option<GeoSearchQuery>,
}

#[derive(Debug, Deserialize)]
struct GeoSearchQuery {
    #[serde(default)]
    geosearch: Vec<GeoSearchHit>,
}

#[derive(Debug, Deserialize)]
struct GeoSearchHit {
    pageid: u64,
    title: String,
    lat: Option<f64>,
    lon: Option<f64>,
    /// Distance from the search point in meters
    dist: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ExtractsResponse {
    #[serde(default)]
    query: Option<ExtractsQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractsQuery {
    #[serde(default)]
    pages: HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    pageid: Option<u64>,
    extract: Option<String>,
    fullurl: Option<String>,
}

impl WikipediaClient {
    pub fn new(client: ClientWithMiddleware, api_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
        }
    }

    async fn geosearch(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: u32,
        limit: usize,
    ) -> Result<Vec<GeoSearchHit>, UpstreamError> {
        let url = format!(
            "{}?action=query&list=geosearch&gscoord={}&gsradius={}&gslimit={}&format=json",
            self.api_url,
            urlencoding::encode(&format!("{latitude}|{longitude}")),
            radius_m,
            limit
        );
        let response: GeoSearchResponse = send_json(self.client.get(&url), "Wikipedia geosearch").await?;
        Ok(response.query.map(|q| q.geosearch).unwrap_or_default())
    }

    async fn extracts(&self, page_ids: &[u64]) -> Result<HashMap<u64, ExtractPage>, UpstreamError> {
        let ids = page_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join("|");
        let url = format!(
            "{}?action=query&prop=extracts%7Cinfo&pageids={}&exintro=1&explaintext=1&exlimit=max&inprop=url&format=json",
            self.api_url,
            urlencoding::encode(&ids)
        );
        let response: ExtractsResponse = send_json(self.client.get(&url), "Wikipedia extracts").await?;

        Ok(response
            .query
            .map(|q| q.pages)
            .unwrap_or_default()
            .into_values()
            .filter_map(|page| page.pageid.map(|id| (id, page)))
            .collect())
    }
}

fn distance_km(hit: &GeoSearchHit, latitude: f64, longitude: f64) -> Option<f64> {
    let km = match (hit.dist, hit.lat, hit.lon) {
        (Some(meters), _, _) => meters / 1000.0,
        (None, Some(lat), Some(lon)) => distance(
            HaversineLocation {
                latitude,
                longitude,
            },
            HaversineLocation {
                latitude: lat,
                longitude: lon,
            },
            Units::Kilometers,
        ),
        _ => return None,
    };
    Some((km * 100.0).round() / 100.0)
}

#[async_trait]
impl PoiProvider for WikipediaClient {
    #[instrument(skip(self))]
    async fn search(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: u32,
        limit: usize,
    ) -> Result<Vec<PointOfInterest>, UpstreamError> {
        let hits = self.geosearch(latitude, longitude, radius_m, limit).await?;
        if hits.is_empty() {
            info!("No Wikipedia pages near {:.4}, {:.4}", latitude, longitude);
            return Ok(Vec::new());
        }

        let page_ids: Vec<u64> = hits.iter().map(|hit| hit.pageid).collect();
        let mut details = self.extracts(&page_ids).await?;

        let pois: Vec<PointOfInterest> = hits
            .iter()
            .map(|hit| {
                let page = details.remove(&hit.pageid);
                PointOfInterest {
                    name: hit.title.clone(),
                    summary: page
                        .as_ref()
                        .and_then(|p| p.extract.as_deref())
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                    distance_km: distance_km(hit, latitude, longitude),
                    url: page.and_then(|p| p.fullurl),
                }
            })
            .collect();

        info!("Found {} sights from Wikipedia", pois.len());
        Ok(pois)
    }

    fn attribution(&self) -> Attribution {
        Attribution::new("Wikipedia", "https://www.wikipedia.org", "points of interest")
    }
}
