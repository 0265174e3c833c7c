//! Shared fixtures: an on-disk flow dataset and matching credentials.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use flowgraph::auth::{issue_token, SigningAlgorithm};
use flowgraph::{RecordStore, ReferenceIdentity, SharedSecret, TokenClaims, TokenVerifier};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const SECRET: &str = "integration-secret";
pub const UPSTREAM_DATA: &str = "upstream-session-data";

pub fn reference_claims() -> TokenClaims {
    let at = Utc.with_ymd_and_hms(2023, 10, 1, 12, 0, 0).unwrap();
    TokenClaims::issued_at(1_i64, UPSTREAM_DATA, at)
}

fn write(dir: &Path, file: &str, value: Value) {
    fs::write(dir.join(file), serde_json::to_vec_pretty(&value).unwrap()).unwrap();
}

/// Data directory holding the five collections and `demoToken.json`.
pub struct FlowFixture {
    pub dir: TempDir,
}

impl FlowFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let path = dir.path();

        write(
            path,
            "node.json",
            json!([
                {
                    "_id": "n1",
                    "name": "Welcome",
                    "createdAt": 1696161600000_i64,
                    "trigger": "t1",
                    "responses": ["r1", "r9"],
                    "postActions": ["a1"],
                    "type": "message",
                    "priority": 1.5
                },
                { "_id": "n2", "name": "Empty", "postActions": [] },
                { "_id": "n3", "name": "Bare" }
            ]),
        );
        write(
            path,
            "trigger.json",
            json!([
                { "_id": "t1", "name": "Greeting", "resourceTemplateId": "rt1" },
                { "_id": "t2", "name": "Orphan", "resourceTemplateId": "rt-missing" }
            ]),
        );
        write(
            path,
            "action.json",
            json!([{ "_id": "a1", "name": "Tag member", "resourceTemplateId": "rt1" }]),
        );
        write(
            path,
            "response.json",
            json!([{ "_id": "r1", "name": "Hello", "tags": ["greeting"] }]),
        );
        write(
            path,
            "resourceTemplate.json",
            json!([{ "_id": "rt1", "name": "Template", "type": "webhook", "published": true }]),
        );

        let identities = vec![ReferenceIdentity::from(reference_claims())];
        write(path, "demoToken.json", serde_json::to_value(identities).unwrap());

        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> RecordStore {
        RecordStore::load(self.path()).expect("Failed to load fixture store")
    }

    pub fn verifier(&self) -> TokenVerifier {
        let reference = ReferenceIdentity::load(&self.path().join("demoToken.json"))
            .expect("Failed to load reference identity");
        TokenVerifier::new(SharedSecret::new(SECRET), reference)
    }
}

pub fn token_for(claims: &TokenClaims, secret: &str) -> String {
    issue_token(claims, &SharedSecret::new(secret), SigningAlgorithm::HS256)
        .expect("Failed to issue token")
}

pub fn valid_token() -> String {
    token_for(&reference_claims(), SECRET)
}
