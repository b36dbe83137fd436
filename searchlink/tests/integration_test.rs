//! Integration tests for searchlink

use std::sync::Arc;

use searchlink::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn server_for(mock: &MockServer) -> Server {
    let pool = Arc::new(ConnectionPool::new(PoolConfig::with_capacity(4)).unwrap());
    Server::with_pool(&mock.uri(), pool).unwrap()
}

#[tokio::test]
async fn test_status() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "name": "node-1",
            "version": {"number": "0.90.0", "snapshot_build": false}
        })))
        .mount(&mock)
        .await;

    let status = server_for(&mock).status().await.unwrap();
    assert_eq!(status.status, Some(200));
    assert_eq!(status.name, "node-1");
    assert_eq!(status.version.number, "0.90.0");
}

#[tokio::test]
async fn test_status_error_is_surfaced() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock)
        .await;

    let err = server_for(&mock).status().await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));
}

#[tokio::test]
async fn test_index_lifecycle() {
    let mock = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/test_index"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/test_index"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/test_index"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/test_index"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock)
        .await;

    let server = server_for(&mock);
    server.create_index("test_index").await.unwrap();
    assert!(server.has_index("test_index").await.unwrap());
    server.delete_index("test_index").await.unwrap();
    assert!(!server.has_index("test_index").await.unwrap());
}

#[tokio::test]
async fn test_create_index_with_settings() {
    let mock = MockServer::start().await;
    let settings = json!({
        "mappings": {
            "type1": {"properties": {"field1": {"type": "string", "index": "not_analyzed"}}}
        }
    });
    Mock::given(method("PUT"))
        .and(path("/test_mapping_index"))
        .and(body_json(settings.clone()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock)
        .await;

    server_for(&mock)
        .create_index_with_settings("test_mapping_index", settings)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_index_failure_names_index() {
    let mock = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/taken"))
        .respond_with(ResponseTemplate::new(400).set_body_string("IndexAlreadyExistsException"))
        .mount(&mock)
        .await;

    match server_for(&mock).create_index("taken").await.unwrap_err() {
        SearchError::UnexpectedStatus {
            operation,
            target,
            status,
            body,
        } => {
            assert_eq!(operation, "create_index");
            assert_eq!(target, "taken");
            assert_eq!(status, 400);
            assert!(body.contains("IndexAlreadyExists"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_put_then_get_round_trip() {
    let mock = MockServer::start().await;
    let content = json!({"name": "George", "age": 25});

    Mock::given(method("PUT"))
        .and(path("/test_index/person/1"))
        .and(body_json(content.clone()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true, "_id": "1"})))
        .expect(1)
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/test_index/person/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": "test_index",
            "_type": "person",
            "_id": "1",
            "_version": 1,
            "exists": true,
            "_source": content
        })))
        .mount(&mock)
        .await;

    let server = server_for(&mock);
    server
        .put_document("test_index", "person", "1", r#"{"name":"George","age":25}"#)
        .await
        .unwrap();

    let doc = server.get_document("test_index", "person", "1").await.unwrap();
    assert!(doc.exists);
    assert_eq!(doc.version, 1);
    assert_eq!(Value::Object(doc.source.unwrap()), content);
}

#[tokio::test]
async fn test_put_json_and_index_document() {
    #[derive(serde::Serialize)]
    struct Person {
        name: &'static str,
        age: u32,
    }

    let mock = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/people/person/7"))
        .and(body_json(json!({"name": "George", "age": 25})))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock)
        .await;

    let server = server_for(&mock);
    server
        .put_json("people", "person", "7", &Person { name: "George", age: 25 })
        .await
        .unwrap();

    let source = json!({"name": "George", "age": 25}).as_object().cloned().unwrap();
    server
        .index_document(&Document::new("people", "person", "7", source))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reserved_characters_stay_in_their_segment() {
    let mock = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/people/person/a%3Fb%2Fc"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/people/person/a%3Fb%2Fc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": "people",
            "_type": "person",
            "_id": "a?b/c",
            "found": true,
            "_source": {"name": "George"}
        })))
        .expect(1)
        .mount(&mock)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/odd%23index"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock)
        .await;
    Mock::given(method("PUT"))
        .and(path("/people/person/a"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock)
        .await;

    let server = server_for(&mock);
    server
        .put_document("people", "person", "a?b/c", r#"{"name":"George"}"#)
        .await
        .unwrap();

    let doc = server.get_document("people", "person", "a?b/c").await.unwrap();
    assert!(doc.exists);
    assert_eq!(doc.id, "a?b/c");

    assert!(server.has_index("odd#index").await.unwrap());
}

#[tokio::test]
async fn test_put_document_failure_names_document() {
    let mock = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/people/person/1"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&mock)
        .await;

    let err = server_for(&mock)
        .put_document("people", "person", "1", "{}")
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(409));
    assert!(err.to_string().contains("people/person/1"));
}

#[tokio::test]
async fn test_missing_document_is_not_an_error() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/people/person/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"exists": false})))
        .mount(&mock)
        .await;

    let doc = server_for(&mock)
        .get_document("people", "person", "404")
        .await
        .unwrap();
    assert!(!doc.exists);
    assert_eq!(doc.id, "404");
    assert_eq!(doc.doc_type, "person");
    assert!(doc.source.is_none());
}

#[tokio::test]
async fn test_get_document_server_error() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/people/person/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock)
        .await;

    let err = server_for(&mock)
        .get_document("people", "person", "1")
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::UnexpectedStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_get_document_fields() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/people/person/1"))
        .and(query_param("fields", "name,age"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": "people",
            "_type": "person",
            "_id": "1",
            "_version": 1,
            "exists": true,
            "fields": {"name": "George", "age": 25}
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let doc = server_for(&mock)
        .get_document_fields("people", "person", "1", &["name", "age"])
        .await
        .unwrap();
    assert!(doc.exists);
    assert_eq!(doc.source.unwrap()["name"], "George");
}

#[tokio::test]
async fn test_search_sends_body_and_decodes_hits() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test_search/person/_search"))
        .and(body_json(json!({
            "size": 5,
            "filtered": {
                "query": {"must": [{"match": {"name": "george"}}]},
                "filter": {"must": [{"term": {"age": 25}}]}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 2,
            "timed_out": false,
            "hits": {
                "total": 1,
                "max_score": 0.3,
                "hits": [{
                    "_index": "test_search",
                    "_type": "person",
                    "_id": "1",
                    "_score": 0.3,
                    "_source": {"name": "George", "age": 25}
                }]
            }
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let results = server_for(&mock)
        .search()
        .index("test_search")
        .doc_type("person")
        .limit(5)
        .must(json!({"match": {"name": "george"}}))
        .filter_must(json!({"term": {"age": 25}}))
        .execute()
        .await
        .unwrap();

    assert_eq!(results.took, 2);
    assert!(!results.timed_out);
    assert_eq!(results.hits.total, 1);
    assert_eq!(results.hits.max_score, Some(0.3));
    assert_eq!(results.hits.documents[0].id, "1");
    assert!(results.hits.documents[0].exists);
    assert_eq!(results.hits.documents[0].source.as_ref().unwrap()["age"], 25);
}

#[tokio::test]
async fn test_search_failure_names_index() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nowhere/_search"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock)
        .await;

    let err = server_for(&mock)
        .search()
        .index("nowhere")
        .execute()
        .await
        .unwrap_err();
    match err {
        SearchError::UnexpectedStatus { target, status, .. } => {
            assert_eq!(target, "nowhere");
            assert_eq!(status, 404);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_malformed_document_is_decode_error() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/people/person/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_version": "one"})))
        .mount(&mock)
        .await;

    let err = server_for(&mock)
        .get_document("people", "person", "1")
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Decode { .. }));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let pool = Arc::new(ConnectionPool::new(PoolConfig::with_capacity(1)).unwrap());
    let server = Server::with_pool("http://127.0.0.1:1", pool.clone()).unwrap();

    assert!(server.status().await.unwrap_err().is_transport());
    assert!(server.has_index("people").await.unwrap_err().is_transport());
    assert!(server.create_index("people").await.unwrap_err().is_transport());
    assert!(server.delete_index("people").await.unwrap_err().is_transport());
    assert!(
        server
            .put_document("people", "person", "1", "{}")
            .await
            .unwrap_err()
            .is_transport()
    );
    assert!(
        server
            .get_document("people", "person", "1")
            .await
            .unwrap_err()
            .is_transport()
    );
    assert!(
        server
            .search()
            .index("people")
            .execute()
            .await
            .unwrap_err()
            .is_transport()
    );

    assert_eq!(pool.idle_count(), 1);
}

// These tests need a search service on localhost:9200.
// Run with: cargo test -- --ignored

#[tokio::test]
#[ignore]
async fn test_live_document_round_trip() {
    let server = Server::connect("localhost", 9200).unwrap();
    let content = json!({"name": "George", "age": 25});

    server.create_index("searchlink_live_test").await.unwrap();
    assert!(server.has_index("searchlink_live_test").await.unwrap());

    server
        .put_document("searchlink_live_test", "person", "1", content.clone())
        .await
        .unwrap();
    let doc = server
        .get_document("searchlink_live_test", "person", "1")
        .await
        .unwrap();
    assert!(doc.exists);
    assert_eq!(Value::Object(doc.source.unwrap()), content);

    let missing = server
        .get_document("searchlink_live_test", "person", "missing")
        .await
        .unwrap();
    assert!(!missing.exists);

    server.delete_index("searchlink_live_test").await.unwrap();
    assert!(!server.has_index("searchlink_live_test").await.unwrap());
}
