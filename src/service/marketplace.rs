//! Client for the marketplace document service.
use crate::data::error::ResumeError;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use url::Url;

/// Every PDF starts with this marker.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Where résumé documents come from. Implementations must be cheap to share
/// between items (they are held behind an `Arc`).
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Downloads the résumé known to the service as `filename`.
    async fn fetch_resume(&self, filename: &str) -> Result<Bytes, ResumeError>;

    /// The server-hosted address of the same document, used for navigation.
    fn resume_url(&self, filename: &str) -> Url;
}

pub struct MarketplaceService {
    base_url: Url,
    client: reqwest::Client,
}

impl MarketplaceService {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<MarketplaceService> {
        let base_url = Url::parse(base_url)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        info!("Using document service at {base_url}");
        Ok(MarketplaceService { base_url, client })
    }
}

/// Checks the payload looks like a PDF before it gets anywhere near the renderer.
pub fn check_pdf_payload(filename: &str, payload: &[u8]) -> Result<(), ResumeError> {
    if payload.is_empty() {
        return Err(ResumeError::DecodeFailure(format!(
            "{filename}: empty response body"
        )));
    }
    if !payload.starts_with(PDF_MAGIC) {
        return Err(ResumeError::DecodeFailure(format!(
            "{filename}: response is not a PDF document"
        )));
    }
    Ok(())
}

#[async_trait]
impl DocumentService for MarketplaceService {
    async fn fetch_resume(&self, filename: &str) -> Result<Bytes, ResumeError> {
        let url = self.resume_url(filename);
        debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ResumeError::FetchFailure(format!("{filename}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResumeError::FetchFailure(format!(
                "{filename}: service answered {status}"
            )));
        }

        let payload = response
            .bytes()
            .await
            .map_err(|err| ResumeError::FetchFailure(format!("{filename}: {err}")))?;
        check_pdf_payload(filename, &payload)?;
        Ok(payload)
    }

    fn resume_url(&self, filename: &str) -> Url {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map(|mut segments| {
                segments.pop_if_empty().push("get-resume");
            })
            .ok();
        url.query_pairs_mut()
            .clear()
            .append_pair("filename", filename);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(base: &str) -> MarketplaceService {
        MarketplaceService::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn should_build_resume_url() {
        let svc = service("http://localhost:8080");
        assert_eq!(
            svc.resume_url("cv.pdf").as_str(),
            "http://localhost:8080/get-resume?filename=cv.pdf"
        );

        // base paths are kept and the filename is query-encoded
        let svc = service("https://api.example.com/marketplace");
        assert_eq!(
            svc.resume_url("jane doe&co.pdf").as_str(),
            "https://api.example.com/marketplace/get-resume?filename=jane+doe%26co.pdf"
        );
    }

    #[test]
    fn should_reject_non_pdf_payloads() {
        assert!(check_pdf_payload("a.pdf", b"%PDF-1.7\n...").is_ok());
        assert!(matches!(
            check_pdf_payload("a.pdf", b""),
            Err(ResumeError::DecodeFailure(_))
        ));
        assert!(matches!(
            check_pdf_payload("a.pdf", b"<html>not found</html>"),
            Err(ResumeError::DecodeFailure(_))
        ));
    }

    #[tokio::test]
    async fn should_fetch_resume_bytes() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get-resume"))
            .and(query_param("filename", "cv.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(b"%PDF-1.7 body".to_vec(), "application/pdf"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let svc = service(&mock_server.uri());
        let bytes = svc.fetch_resume("cv.pdf").await.unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.7 body");
    }

    #[tokio::test]
    async fn should_report_error_status_as_fetch_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get-resume"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let svc = service(&mock_server.uri());
        let err = svc.fetch_resume("missing.pdf").await.unwrap_err();
        assert!(matches!(err, ResumeError::FetchFailure(_)), "{err:?}");
    }

    #[tokio::test]
    async fn should_report_garbage_as_decode_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get-resume"))
            .respond_with(ResponseTemplate::new(200).set_body_string("definitely not a pdf"))
            .mount(&mock_server)
            .await;

        let svc = service(&mock_server.uri());
        let err = svc.fetch_resume("cv.pdf").await.unwrap_err();
        assert!(matches!(err, ResumeError::DecodeFailure(_)), "{err:?}");
    }

    #[tokio::test]
    async fn should_report_unreachable_service_as_fetch_failure() {
        // port 9 (discard) is reliably closed on test machines
        let svc = service("http://127.0.0.1:9");
        let err = svc.fetch_resume("cv.pdf").await.unwrap_err();
        assert!(matches!(err, ResumeError::FetchFailure(_)), "{err:?}");
    }
}
