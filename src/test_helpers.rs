//! Test helper factories and mock state builders
//!
//! Provides a small fixture graph, mock AppState builders, and a one-shot
//! GET helper for router tests.
#![allow(dead_code)]

use crate::neo4j::mock::MockGraphStore;
use crate::tools::{QsarDatasetBuilder, StructureSearch};
use crate::{AppState, Config, QsarConfig, StructureSearchConfig};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// Mock state builders
// ============================================================================

/// Config pointing at a mock database and at tools that do not exist
pub fn test_config(namespace: Option<&str>) -> Config {
    Config {
        neo4j_uri: "bolt://mock:7687".to_string(),
        neo4j_user: "neo4j".to_string(),
        neo4j_password: "mock".to_string(),
        server_port: 0,
        data_config_path: PathBuf::from("assets/data.json"),
        namespace: namespace.map(str::to_string),
        structure_search: StructureSearchConfig {
            binary: "/nonexistent/jcsearch".to_string(),
            database: "DB:public.chemicals".to_string(),
            max_output_bytes: 1 << 20,
        },
        qsar: QsarConfig {
            interpreter: "/nonexistent/python3".to_string(),
            script_path: "make_qsar.py".to_string(),
            max_output_bytes: 1 << 20,
        },
    }
}

/// Build an AppState around a mock store from an explicit config
pub fn mock_app_state_from_config(store: Arc<MockGraphStore>, config: Config) -> AppState {
    let data_config = json!({
        "namespace": config.namespace.clone().unwrap_or_default(),
        "version": "test"
    });
    AppState {
        neo4j: store,
        structure_search: Arc::new(StructureSearch::new(&config.structure_search)),
        qsar: Arc::new(QsarDatasetBuilder::new(&config.qsar)),
        data_config: Arc::new(data_config),
        config: Arc::new(config),
    }
}

/// Create a mock AppState using the `ns0` namespace
pub fn mock_app_state(store: Arc<MockGraphStore>) -> AppState {
    mock_app_state_with_namespace(store, Some("ns0"))
}

pub fn mock_app_state_with_namespace(
    store: Arc<MockGraphStore>,
    namespace: Option<&str>,
) -> AppState {
    mock_app_state_from_config(store, test_config(namespace))
}

// ============================================================================
// Fixture graph
// ============================================================================

/// A small ComptoxAI-like graph.
///
/// ```text
/// (1 Bisphenol A)-[10 CHEMICALBINDSGENE]->(3 ESR1)
/// (2 Estradiol)  -[11 CHEMICALBINDSGENE]->(3 ESR1)
/// (3 ESR1)-[12 ns0__GENEASSOCIATESWITHDISEASE]->(5 Breast cancer)
/// (4 AR), (6 ns1__Chemical), (7 Resource) have no edges
/// (8 Agent 007) also carries the neosemantics `Resource` label, listed first
/// (9 Vitamin B7), (13 Ménière disease) have no edges
/// ```
pub async fn fixture_store() -> Arc<MockGraphStore> {
    let store = MockGraphStore::new();

    store
        .add_node(
            1,
            &["ns0__Chemical"],
            json!({
                "commonName": "Bisphenol A",
                "uri": "http://jdr.bio/ontologies/comptox.owl#chem_dtxsid7020182",
                "xrefDTXSID": "DTXSID7020182",
                "xrefPubchemCID": 6623,
                "molWeight": 228.29
            }),
        )
        .await;
    store
        .add_node(
            2,
            &["ns0__Chemical"],
            json!({
                "commonName": "Estradiol",
                "uri": "http://jdr.bio/ontologies/comptox.owl#chem_dtxsid0020573",
                "xrefDTXSID": "DTXSID0020573"
            }),
        )
        .await;
    store
        .add_node(
            3,
            &["ns0__Gene"],
            json!({
                "commonName": "ESR1",
                "uri": "http://jdr.bio/ontologies/comptox.owl#gene_esr1",
                "xrefNcbiGene": 2099
            }),
        )
        .await;
    store
        .add_node(
            4,
            &["ns0__Gene"],
            json!({
                "commonName": "AR",
                "uri": "http://jdr.bio/ontologies/comptox.owl#gene_ar",
                "xrefNcbiGene": 367
            }),
        )
        .await;
    store
        .add_node(
            5,
            &["ns0__Disease"],
            json!({
                "commonName": "Breast cancer",
                "uri": "http://jdr.bio/ontologies/comptox.owl#disease_breast_cancer"
            }),
        )
        .await;
    store
        .add_node(6, &["ns1__Chemical"], json!({"commonName": "Bisphenol A"}))
        .await;
    store
        .add_node(7, &["Resource"], json!({"uri": "urn:resource"}))
        .await;
    store
        .add_node(
            8,
            &["Resource", "ns0__Chemical"],
            json!({
                "commonName": "Agent 007",
                "uri": "http://jdr.bio/ontologies/comptox.owl#chem_agent_007",
                "xrefDTXSID": "DTXSID9000007"
            }),
        )
        .await;
    store
        .add_node(
            9,
            &["ns0__Chemical"],
            json!({
                "commonName": "Vitamin B7",
                "uri": "http://jdr.bio/ontologies/comptox.owl#chem_biotin",
                "xrefDTXSID": "DTXSID2022679"
            }),
        )
        .await;
    store
        .add_node(
            13,
            &["ns0__Disease"],
            json!({
                "commonName": "Ménière disease",
                "uri": "http://jdr.bio/ontologies/comptox.owl#disease_meniere"
            }),
        )
        .await;

    store.add_relationship(10, 1, 3, "CHEMICALBINDSGENE").await;
    store.add_relationship(11, 2, 3, "CHEMICALBINDSGENE").await;
    store
        .add_relationship(12, 3, 5, "ns0__GENEASSOCIATESWITHDISEASE")
        .await;

    Arc::new(store)
}

// ============================================================================
// Request helpers
// ============================================================================

/// Collect a response body as JSON
pub async fn read_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send one GET request through the router
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    (status, read_json(resp).await)
}
