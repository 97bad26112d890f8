//! Integration tests for document normalization

use api_survey_common::{HttpMethod, ProbeStatus};
use api_survey_parser::{normalize, DocumentVersion, Normalizer};
use serde_json::{json, Value};

fn petstore_v2() -> Value {
    json!({
        "swagger": "2.0",
        "info": {"title": "Swagger Petstore", "version": "1.0.7"},
        "host": "petstore.swagger.io",
        "basePath": "/v2",
        "schemes": ["https", "http"],
        "paths": {
            "/pet": {
                "post": {
                    "tags": ["pet"],
                    "summary": "Add a new pet to the store",
                    "operationId": "addPet"
                },
                "put": {
                    "tags": ["pet"],
                    "summary": "Update an existing pet",
                    "operationId": "updatePet"
                }
            },
            "/pet/{petId}": {
                "parameters": [{"name": "petId", "in": "path", "required": true}],
                "get": {
                    "tags": ["pet", "pet", "read"],
                    "summary": "Find pet by ID",
                    "description": "Returns a single pet",
                    "operationId": "getPetById"
                },
                "delete": {
                    "tags": ["pet"],
                    "operationId": "deletePet"
                }
            },
            "/store/inventory": {
                "get": {"operationId": "getInventory"}
            }
        }
    })
}

fn users_v3() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {"title": "Users", "version": "v1"},
        "servers": [{"url": "https://api.example.com"}],
        "paths": {
            "/users": {
                "get": {"summary": "List users"},
                "post": {"summary": "Create user"}
            },
            "/users/{id}": {
                "delete": {"summary": "Delete user"}
            }
        }
    })
}

#[test]
fn test_swagger2_petstore() {
    let normalized = Normalizer::new().normalize_document(&petstore_v2()).unwrap();

    assert_eq!(normalized.version, DocumentVersion::Swagger2);
    assert_eq!(normalized.info.title, "Swagger Petstore");
    assert_eq!(normalized.info.version, "1.0.7");
    assert_eq!(normalized.records.len(), 5);

    let pairs: Vec<(&str, HttpMethod)> = normalized
        .records
        .iter()
        .map(|r| (r.path.as_str(), r.method))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("/pet", HttpMethod::Post),
            ("/pet", HttpMethod::Put),
            ("/pet/{petId}", HttpMethod::Get),
            ("/pet/{petId}", HttpMethod::Delete),
            ("/store/inventory", HttpMethod::Get),
        ]
    );

    let get_pet = &normalized.records[2];
    assert_eq!(get_pet.full_url, "https://petstore.swagger.io/v2/pet/{petId}");
    assert_eq!(get_pet.summary, "Find pet by ID");
    assert_eq!(get_pet.description, "Returns a single pet");
    assert_eq!(get_pet.operation_id, "getPetById");
    assert_eq!(get_pet.tags, vec!["pet", "read"]);
    assert_eq!(get_pet.probe_status, ProbeStatus::NotRequested);

    let delete_pet = &normalized.records[3];
    assert_eq!(delete_pet.summary, "");
    assert_eq!(delete_pet.description, "");
    assert_eq!(delete_pet.display_name(), "deletePet");
}

#[test]
fn test_swagger2_without_schemes_defaults_to_http() {
    let doc = json!({
        "swagger": "2.0",
        "host": "localhost:8080",
        "paths": {"/health": {"get": {}}}
    });
    let records = normalize(&doc).unwrap();
    assert_eq!(records[0].full_url, "http://localhost:8080/health");
}

#[test]
fn test_openapi3_three_endpoint_document() {
    let records = normalize(&users_v3()).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].method, HttpMethod::Get);
    assert_eq!(records[0].full_url, "https://api.example.com/users");
    assert_eq!(records[1].method, HttpMethod::Post);
    assert_eq!(records[2].method, HttpMethod::Delete);
    assert_eq!(records[2].full_url, "https://api.example.com/users/{id}");
    assert!(records
        .iter()
        .all(|r| r.probe_status == ProbeStatus::NotRequested));
}

#[test]
fn test_openapi3_trailing_slash_server() {
    let doc = json!({
        "openapi": "3.1.0",
        "servers": [{"url": "https://api.example.com/v1/"}, {"url": "https://other"}],
        "paths": {"/users/": {"get": {}}}
    });
    let records = normalize(&doc).unwrap();
    assert_eq!(records[0].full_url, "https://api.example.com/v1/users/");
}

#[test]
fn test_openapi3_without_servers_uses_document_host() {
    let doc = json!({"openapi": "3.0.0", "paths": {"/ping": {"get": {}}}});

    let relative = normalize(&doc).unwrap();
    assert_eq!(relative[0].full_url, "/ping");

    let records = Normalizer::new()
        .with_document_url("http://10.0.0.5:8080/v3/api-docs")
        .normalize(&doc)
        .unwrap();
    assert_eq!(records[0].full_url, "http://10.0.0.5:8080/ping");
}

#[test]
fn test_protocol_relative_server_keeps_declared_host() {
    let doc = json!({
        "openapi": "3.0.0",
        "servers": [{"url": "//api.example.com/v1"}],
        "paths": {"/users": {"get": {}}}
    });
    let records = Normalizer::new()
        .with_document_url("https://docs.example.com/openapi.json")
        .normalize(&doc)
        .unwrap();
    assert_eq!(records[0].full_url, "https://api.example.com/v1/users");
}

#[test]
fn test_document_relative_server_keeps_document_directory() {
    let doc = json!({
        "openapi": "3.0.0",
        "servers": [{"url": "v1"}],
        "paths": {"/users": {"get": {}}}
    });
    let records = Normalizer::new()
        .with_document_url("https://h.example.com/svc/openapi.json")
        .normalize(&doc)
        .unwrap();
    assert_eq!(records[0].full_url, "https://h.example.com/svc/v1/users");
}

#[test]
fn test_swagger2_host_with_scheme() {
    let doc = json!({
        "swagger": "2.0",
        "host": "https://api.example.com/",
        "basePath": "/v2",
        "paths": {"/users": {"get": {}}}
    });
    let records = normalize(&doc).unwrap();
    assert_eq!(records[0].full_url, "https://api.example.com/v2/users");
}

#[test]
fn test_base_url_override() {
    let records = Normalizer::new()
        .with_base_url_override("http://staging.internal/")
        .normalize(&petstore_v2())
        .unwrap();
    assert!(records
        .iter()
        .all(|r| r.full_url.starts_with("http://staging.internal/pet")
            || r.full_url.starts_with("http://staging.internal/store")));
}

#[test]
fn test_malformed_entries_are_skipped() {
    let doc = json!({
        "openapi": "3.0.0",
        "servers": [{"url": "https://api.example.com"}],
        "paths": {
            "/broken": "not an object",
            "/partial": {
                "get": "also not an object",
                "post": {"summary": 42, "tags": ["ok", 7, null]}
            },
            "/fine": {"get": {}}
        }
    });
    let records = normalize(&doc).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].path, "/partial");
    assert_eq!(records[0].method, HttpMethod::Post);
    assert_eq!(records[0].summary, "");
    assert_eq!(records[0].tags, vec!["ok"]);
    assert_eq!(records[1].path, "/fine");
}

#[test]
fn test_record_count_matches_method_pairs() {
    for doc in [petstore_v2(), users_v3()] {
        let expected: usize = doc["paths"]
            .as_object()
            .unwrap()
            .values()
            .map(|item| {
                item.as_object()
                    .unwrap()
                    .keys()
                    .filter(|k| k.parse::<HttpMethod>().is_ok())
                    .count()
            })
            .sum();
        assert_eq!(normalize(&doc).unwrap().len(), expected);
    }
}

#[test]
fn test_normalization_is_idempotent() {
    for doc in [petstore_v2(), users_v3()] {
        let first = normalize(&doc).unwrap();
        let second = normalize(&doc).unwrap();
        assert_eq!(first, second);
    }
}
