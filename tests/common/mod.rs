//! Shared fixtures for the integration tests

#![allow(dead_code)]

use autocenter::config::AppConfig;
use autocenter::prelude::*;
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;

pub struct TestApp {
    pub server: TestServer,
    pub host: Arc<ServerHost>,
    pub scheduler: Arc<ManualScheduler>,
    pub token: String,
}

impl TestApp {
    /// App with auth enabled, a manual scheduler and a fixed outcome
    pub fn new(outcome: Outcome) -> Self {
        Self::with_config(AppConfig::default(), outcome)
    }

    pub fn with_config(config: AppConfig, outcome: Outcome) -> Self {
        let scheduler = Arc::new(ManualScheduler::new());
        let (router, host) = ServerBuilder::new()
            .with_config(config)
            .with_scheduler(scheduler.clone())
            .with_outcome_decider(Arc::new(FixedOutcome(outcome)))
            .build_with_host()
            .expect("Failed to build app");

        let token = host
            .auth
            .issue("integration-tests")
            .expect("Failed to issue token")
            .token;
        let server = TestServer::try_new(router).expect("Failed to create test server");

        Self {
            server,
            host,
            scheduler,
            token,
        }
    }

    pub async fn create_dealer(&self, name: &str, email: &str, tier: &str) -> Value {
        let response = self
            .server
            .post("/dealers")
            .authorization_bearer(&self.token)
            .json(&json!({ "name": name, "email": email, "subscriptionTier": tier }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json()
    }

    pub async fn create_vehicle(&self, dealer_id: &str, model: &str, price: &str) -> Value {
        let response = self
            .server
            .post("/vehicles")
            .authorization_bearer(&self.token)
            .json(&json!({ "dealerId": dealer_id, "model": model, "price": price }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json()
    }

    pub async fn create_payment(&self, dealer_id: &str, amount: &str, method: &str) -> Value {
        let response = self
            .server
            .post("/payments")
            .authorization_bearer(&self.token)
            .json(&json!({ "dealerId": dealer_id, "amount": amount, "method": method }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json()
    }
}

/// A dealer inserted straight into the store
pub async fn insert_dealer(host: &ServerHost, name: &str, email: &str, tier: SubscriptionTier) -> Dealer {
    host.stores
        .dealers
        .insert(Dealer::new(name, email, tier))
        .await
        .expect("Failed to insert dealer")
}
