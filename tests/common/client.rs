//! Thin reqwest wrapper used by the end-to-end tests.

pub struct TestClient {
    base_url: String,
    client: reqwest::Client,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub async fn health(&self) -> reqwest::Response {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .expect("Health request failed")
    }

    #[allow(dead_code)]
    pub async fn home(&self) -> reqwest::Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    pub async fn generate(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/v1/generate", self.base_url))
            .json(body)
            .send()
            .await
            .expect("Generate request failed")
    }

    #[allow(dead_code)]
    pub async fn generate_raw(&self, body: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/v1/generate", self.base_url))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Generate request failed")
    }
}
