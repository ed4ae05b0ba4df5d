use affordability_dash::{DashError, SpecSource};
use gloo_net::http::Request;
use serde_json::Value;

/// Loads chart specs relative to the page with `fetch`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchSource;

impl SpecSource for FetchSource {
    async fn fetch_spec(&self, path: &str) -> Result<Value, DashError> {
        let response = Request::get(path)
            .send()
            .await
            .map_err(|err| DashError::load(path, err.to_string()))?;
        if !response.ok() {
            return Err(DashError::load(
                path,
                format!("{} {}", response.status(), response.status_text()),
            ));
        }
        response
            .json::<Value>()
            .await
            .map_err(|err| DashError::load(path, err.to_string()))
    }
}
