use std::sync::Arc;

use auth::Authenticator;
use auth::TokenCodec;
use marketplace_service::domain::product::service::ProductService;
use marketplace_service::domain::user::models::EmailAddress;
use marketplace_service::domain::user::service::UserService;
use marketplace_service::inbound::http::router::create_router;
use marketplace_service::outbound::repositories::InMemoryProductRepository;
use marketplace_service::outbound::repositories::InMemoryUserRepository;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin_password!";

/// Test application that spawns a real server on a random port.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    /// Codec sharing the server's secret, for forging expired or tampered
    /// tokens in tests.
    pub token_codec: TokenCodec,
    /// Direct handle for startup-time operations (admin bootstrap).
    pub user_service: Arc<UserService<InMemoryUserRepository>>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let user_repository = Arc::new(InMemoryUserRepository::new());
        let product_repository = Arc::new(InMemoryProductRepository::new());

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));
        let user_service = Arc::new(UserService::new(Arc::clone(&user_repository)));
        let product_service = Arc::new(ProductService::new(
            product_repository,
            Arc::clone(&user_repository),
        ));

        // Same bootstrap main performs when admin.enabled is set.
        let admin_hash = authenticator
            .hash_password(ADMIN_PASSWORD)
            .expect("Failed to hash admin password");
        user_service
            .ensure_admin(&admin_email(), &admin_hash)
            .await
            .expect("Failed to bootstrap admin");

        let router = create_router(
            Arc::clone(&user_service),
            product_service,
            Arc::clone(&authenticator),
        );

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            token_codec: TokenCodec::new(TEST_SECRET),
            user_service,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register an account through the public endpoint.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/users/register")
            .json(&json!({
                "name": name,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute register request")
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/users/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute login request");

        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "login failed for {}",
            email
        );

        let body: serde_json::Value = response.json().await.expect("Failed to parse login body");
        body["token"]
            .as_str()
            .expect("login response carries no token")
            .to_string()
    }

    /// Register a fresh account and log it in.
    pub async fn register_and_login(&self, name: &str, email: &str, password: &str) -> String {
        let response = self.register(name, email, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        self.login(email, password).await
    }

    /// Token for the bootstrapped admin.
    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Create a product and return its response body.
    pub async fn create_product(
        &self,
        token: &str,
        name: &str,
        description: &str,
        price: f64,
    ) -> serde_json::Value {
        let response = self
            .post_authenticated("/products", token)
            .json(&json!({
                "name": name,
                "description": description,
                "price": price
            }))
            .send()
            .await
            .expect("Failed to execute create product request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response
            .json()
            .await
            .expect("Failed to parse create product body")
    }
}

pub fn admin_email() -> EmailAddress {
    EmailAddress::new(ADMIN_EMAIL.to_string()).expect("admin email is valid")
}
