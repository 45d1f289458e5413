use dues_service::config::{Config, DatabaseConfig, LimitsConfig, ServerConfig};
use dues_service::Application;
use rust_decimal_macros::dec;
use secrecy::Secret;

pub const TEST_TENANT_ID: &str = "test-tenant";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: mongodb::Database,
    pub db_name: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db_name = format!("dues_test_{}", uuid::Uuid::new_v4().simple());

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            database: DatabaseConfig {
                url: Secret::new(
                    std::env::var("TEST_MONGODB_URI")
                        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
                ),
                db_name: db_name.clone(),
            },
            limits: LimitsConfig {
                max_monthly_expected: dec!(1000000),
            },
            service_name: "dues-service-test".to_string(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);
        let db = app.db().clone();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// GET with the test tenant header.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header("X-Tenant-ID", TEST_TENANT_ID)
            .send()
            .await
            .expect("request failed")
    }

    /// POST a JSON body with the test tenant header.
    pub async fn post(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("X-Tenant-ID", TEST_TENANT_ID)
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    /// PUT a JSON body with the test tenant header.
    pub async fn put(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .header("X-Tenant-ID", TEST_TENANT_ID)
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    /// PATCH a JSON body with the test tenant header.
    pub async fn patch(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .patch(self.url(path))
            .header("X-Tenant-ID", TEST_TENANT_ID)
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    /// DELETE with the test tenant header.
    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .header("X-Tenant-ID", TEST_TENANT_ID)
            .send()
            .await
            .expect("request failed")
    }

    /// Create a type label, a tracked year and a client; returns the
    /// client's id. Most record tests start from this fixture.
    pub async fn seed_client(&self, name: &str, type_name: &str, year: i32, expected: &str) -> String {
        let resp = self
            .post("/types", &serde_json::json!({ "name": type_name }))
            .await;
        assert!(
            resp.status() == reqwest::StatusCode::CREATED
                || resp.status() == reqwest::StatusCode::CONFLICT,
            "type creation failed: {}",
            resp.status()
        );

        let resp = self.post("/years", &serde_json::json!({ "year": year })).await;
        assert!(
            resp.status() == reqwest::StatusCode::CREATED
                || resp.status() == reqwest::StatusCode::CONFLICT,
            "year creation failed: {}",
            resp.status()
        );

        let resp = self
            .post(
                "/clients",
                &serde_json::json!({
                    "name": name,
                    "type": type_name,
                    "monthly_expected": expected,
                }),
            )
            .await;
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
        let body: serde_json::Value = resp.json().await.expect("invalid json");
        body["id"].as_str().expect("missing client id").to_string()
    }

    /// Cleanup test database after test completes.
    pub async fn cleanup(&self) {
        self.db
            .drop(None)
            .await
            .expect("Failed to drop test database");
    }
}
