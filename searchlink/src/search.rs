//! Search requests and results.

use searchlink_transport::Method;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::{
    document::Document,
    error::{Result, SearchError},
    query::BoolClauses,
    server::Server,
};

/// A structured search bound to a [`Server`].
///
/// # Example
///
/// ```rust,no_run
/// use searchlink::Server;
/// use serde_json::json;
///
/// # async fn run() -> searchlink::Result<()> {
/// let server = Server::connect("localhost", 9200)?;
/// let results = server
///     .search()
///     .index("people")
///     .limit(5)
///     .must(json!({"match": {"name": "george"}}))
///     .filter_must(json!({"term": {"age": 25}}))
///     .execute()
///     .await?;
///
/// println!("{} matches", results.hits.total);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SearchRequest {
    server: Server,
    index: String,
    doc_type: Option<String>,
    offset: u64,
    limit: u64,
    fields: Vec<String>,
    query: BoolClauses,
    filter: Option<BoolClauses>,
}

impl SearchRequest {
    pub(crate) fn new(server: Server) -> Self {
        Self {
            server,
            index: String::new(),
            doc_type: None,
            offset: 0,
            limit: 0,
            fields: Vec::new(),
            query: BoolClauses::default(),
            filter: None,
        }
    }

    /// Set the index to search. All indices are searched when unset.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    /// Restrict the search to one type.
    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Set pagination offset.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Set result size limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Return only the given fields.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the query clause set.
    pub fn query(mut self, clauses: BoolClauses) -> Self {
        self.query = clauses;
        self
    }

    /// Replace the filter clause set.
    pub fn filter(mut self, clauses: BoolClauses) -> Self {
        self.filter = Some(clauses);
        self
    }

    /// Add a must clause to the query.
    pub fn must(mut self, clause: impl Into<Value>) -> Self {
        self.query.must.push(clause.into());
        self
    }

    /// Add a must_not clause to the query.
    pub fn must_not(mut self, clause: impl Into<Value>) -> Self {
        self.query.must_not.push(clause.into());
        self
    }

    /// Add a should clause to the query.
    pub fn should(mut self, clause: impl Into<Value>) -> Self {
        self.query.should.push(clause.into());
        self
    }

    /// Add a must clause to the filter.
    pub fn filter_must(mut self, clause: impl Into<Value>) -> Self {
        self.filter
            .get_or_insert_with(BoolClauses::default)
            .must
            .push(clause.into());
        self
    }

    /// Add a must_not clause to the filter.
    pub fn filter_must_not(mut self, clause: impl Into<Value>) -> Self {
        self.filter
            .get_or_insert_with(BoolClauses::default)
            .must_not
            .push(clause.into());
        self
    }

    /// Add a should clause to the filter.
    pub fn filter_should(mut self, clause: impl Into<Value>) -> Self {
        self.filter
            .get_or_insert_with(BoolClauses::default)
            .should
            .push(clause.into());
        self
    }

    /// Path segments of the search endpoint, relative to the server.
    pub fn path_segments(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = Vec::with_capacity(3);
        if !self.index.is_empty() {
            segments.push(&self.index);
            if let Some(doc_type) = self.doc_type.as_deref() {
                segments.push(doc_type);
            }
        }
        segments.push("_search");
        segments
    }

    /// Build the search body.
    ///
    /// Pagination and projection keys are emitted only when set. Query and
    /// filter are wrapped together under `filtered` only when both hold
    /// clauses.
    pub fn to_request_body(&self) -> Value {
        let mut body = Map::new();

        if self.offset != 0 {
            body.insert("from".to_string(), json!(self.offset));
        }
        if self.limit != 0 {
            body.insert("size".to_string(), json!(self.limit));
        }
        if !self.fields.is_empty() {
            body.insert("fields".to_string(), json!(self.fields));
        }

        let query = (!self.query.is_empty()).then(|| self.query.to_json());
        let filter = self
            .filter
            .as_ref()
            .filter(|filter| !filter.is_empty())
            .map(BoolClauses::to_json);

        match (query, filter) {
            (Some(query), Some(filter)) => {
                body.insert(
                    "filtered".to_string(),
                    json!({ "query": query, "filter": filter }),
                );
            }
            (Some(query), None) => {
                body.insert("query".to_string(), query);
            }
            (None, Some(filter)) => {
                body.insert("filter".to_string(), filter);
            }
            (None, None) => {}
        }

        Value::Object(body)
    }

    /// Run the search.
    pub async fn execute(&self) -> Result<SearchResults> {
        let segments = self.path_segments();
        let body = self.to_request_body();
        debug!(index = %self.index, ?segments, "Executing search");

        let response = self.server.send(Method::GET, &segments, body).await?;

        if response.status_code() != 200 {
            warn!(index = %self.index, status = response.status_code(), "Search failed");
            return Err(SearchError::UnexpectedStatus {
                operation: "search",
                target: self.index.clone(),
                status: response.status_code(),
                body: response.text(),
            });
        }

        response
            .decode()
            .map_err(|e| SearchError::decode("search", e))
    }
}

/// Decoded response of a search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    /// Time taken in milliseconds.
    #[serde(default)]
    pub took: u64,
    /// Whether the search timed out before collecting every shard.
    #[serde(default)]
    pub timed_out: bool,
    /// Matching documents.
    #[serde(default)]
    pub hits: Hits,
}

/// Ranked hits of a search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hits {
    /// Total matching documents.
    #[serde(default, deserialize_with = "deserialize_total")]
    pub total: u64,
    /// Maximum score.
    #[serde(default)]
    pub max_score: Option<f64>,
    /// Matching documents, best first.
    ///
    /// Hits carry no existence flag of their own; each decodes with `exists`
    /// set.
    #[serde(default, rename = "hits", deserialize_with = "deserialize_hits")]
    pub documents: Vec<Document>,
}

/// `hits.total` is a bare count on older services and an object on newer ones.
#[derive(Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

fn deserialize_total<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TotalHits::deserialize(deserializer)? {
        TotalHits::Count(total) | TotalHits::Object { value: total } => total,
    })
}

fn deserialize_hits<'de, D>(deserializer: D) -> std::result::Result<Vec<Document>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut documents = Vec::<Document>::deserialize(deserializer)?;
    for document in &mut documents {
        document.exists = true;
    }
    Ok(documents)
}
