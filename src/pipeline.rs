use tracing::{error, info};

use crate::fetcher::PageFetcher;
use crate::parser::{detail, index};
use crate::writer::RecordWriter;

/// What happened to one index page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOutcome {
    pub page: usize,
    pub discovered: usize,
    pub saved: usize,
    /// Detail pages that could not be fetched; an empty record is still saved.
    pub missing: usize,
    pub write_errors: usize,
}

/// Scrape one index page and every detail page it links to, in order.
pub async fn scrape_page(fetcher: &PageFetcher, writer: &RecordWriter, page: usize) -> PageOutcome {
    let mut outcome = PageOutcome {
        page,
        ..Default::default()
    };

    let index_html = fetcher.fetch_index(page).await;
    let detail_urls = index::parse_index(index_html.as_deref(), fetcher.base_url());
    if index_html.is_none() {
        info!("page {}: 0 detail urls", page);
        return outcome;
    }

    for detail_url in detail_urls {
        outcome.discovered += 1;
        let detail_html = fetcher.fetch(detail_url.as_str()).await;
        if detail_html.is_none() {
            outcome.missing += 1;
        }
        let data = detail::parse_detail(detail_html.as_deref().unwrap_or_default());
        info!("get detail data {:?}", data);

        info!("saving data to json file");
        match writer.write(&data) {
            Ok(_) => {
                outcome.saved += 1;
                info!("data saved successfully");
            }
            Err(e) => {
                outcome.write_errors += 1;
                error!("failed to save {}: {}", detail_url, e);
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::Url;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn mount(server: &MockServer, route: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    fn fetcher_for(server: &MockServer) -> PageFetcher {
        PageFetcher::new(Url::parse(&server.uri()).unwrap(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn saves_one_file_per_detail_link() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/page/1",
            200,
            r#"<a href="/detail/1" class="name">A</a><a href="/detail/2" class="name">B</a>"#,
        )
        .await;
        mount(&server, "/detail/1", 200, r#"<h2>Alpha</h2><p class="score">9.0</p>"#).await;
        mount(&server, "/detail/2", 200, r#"<h2>Beta</h2>"#).await;

        let tmp = TempDir::new().unwrap();
        let writer = RecordWriter::new(tmp.path());
        let outcome = scrape_page(&fetcher_for(&server), &writer, 1).await;

        assert_eq!(
            outcome,
            PageOutcome {
                page: 1,
                discovered: 2,
                saved: 2,
                missing: 0,
                write_errors: 0,
            }
        );
        let alpha = RecordWriter::read(&tmp.path().join("Alpha.json")).unwrap();
        assert_eq!(alpha.score, Some(9.0));
        assert!(tmp.path().join("Beta.json").exists());
    }

    #[tokio::test]
    async fn missing_detail_still_writes_unnamed_record() {
        let server = MockServer::start().await;
        mount(&server, "/page/2", 200, r#"<a href="/detail/404" class="name">X</a>"#).await;
        mount(&server, "/detail/404", 404, "").await;

        let tmp = TempDir::new().unwrap();
        let writer = RecordWriter::new(tmp.path());
        let outcome = scrape_page(&fetcher_for(&server), &writer, 2).await;

        assert_eq!(outcome.missing, 1);
        assert_eq!(outcome.saved, 1);
        let record = RecordWriter::read(&tmp.path().join("None.json")).unwrap();
        assert_eq!(record, Default::default());
    }

    #[tokio::test]
    async fn failed_index_yields_nothing() {
        let server = MockServer::start().await;
        mount(&server, "/page/3", 500, "").await;

        let tmp = TempDir::new().unwrap();
        let writer = RecordWriter::new(tmp.path());
        let outcome = scrape_page(&fetcher_for(&server), &writer, 3).await;

        assert_eq!(outcome.discovered, 0);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn write_failure_is_counted_not_fatal() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/page/1",
            200,
            r#"<a href="/detail/1" class="name">A</a><a href="/detail/2" class="name">B</a>"#,
        )
        .await;
        mount(&server, "/detail/1", 200, "<h2>Alpha</h2>").await;
        mount(&server, "/detail/2", 200, "<h2>Beta</h2>").await;

        let tmp = TempDir::new().unwrap();
        let writer = RecordWriter::new(tmp.path().join("never-created"));
        let outcome = scrape_page(&fetcher_for(&server), &writer, 1).await;

        assert_eq!(outcome.discovered, 2);
        assert_eq!(outcome.write_errors, 2);
        assert_eq!(outcome.saved, 0);
    }
}
