use reqwest::Url;

use crate::FetchError;

/// Substrings of hrefs that are never report downloads: social share links
/// and the morning bulletin, which repeats the previous evening's data.
const SKIPPED_HREF_PARTS: &[&str] = &["facebook", "linkedin", "whatsapp", "matutino"];

/// Collect report PDF links from the index page HTML.
///
/// Every `<a href>` mentioning `pdf` is kept unless it contains one of the
/// skipped substrings. Relative hrefs are resolved against `base_url`.
/// Document order is preserved and repeated links are dropped.
pub fn report_links_from_html(html: &str, base_url: &Url) -> Vec<String> {
    let document = scraper::Html::parse_document(html);
    let Ok(selector) = scraper::Selector::parse("a[href]") else {
        return vec![];
    };

    let mut links: Vec<String> = Vec::new();
    for element in document.select(&selector) {
        let href = element.value().attr("href").unwrap_or("").trim();
        if !href.contains("pdf") {
            continue;
        }
        if SKIPPED_HREF_PARTS.iter().any(|part| href.contains(part)) {
            continue;
        }
        let Ok(url) = base_url.join(href) else {
            tracing::debug!(href, "skipping unresolvable link");
            continue;
        };
        let url = url.to_string();
        if !links.contains(&url) {
            links.push(url);
        }
    }
    links
}

/// Download the index page and return its report links.
pub async fn fetch_report_links(
    client: &reqwest::Client,
    index_url: &str,
) -> Result<Vec<String>, FetchError> {
    let base = Url::parse(index_url).map_err(|_| FetchError::InvalidUrl(index_url.to_string()))?;

    let resp = client.get(base.clone()).send().await?;
    if !resp.status().is_success() {
        return Err(FetchError::Status {
            url: index_url.to_string(),
            status: resp.status(),
        });
    }
    let body = resp.text().await?;

    let links = report_links_from_html(&body, &base);
    tracing::info!(index_url, links = links.len(), "found report links");
    Ok(links)
}
